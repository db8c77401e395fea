//! Refinement level descriptions.

use serde::{Deserialize, Serialize};

/// One box of a refinement level as reported by the metadata source.
///
/// Bounds are inclusive cell-centered indices. The extra cell counts are the
/// negative-side margins; by convention they are mirrored onto the positive
/// sides when the in-memory patch is built.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxDescription {
    /// The inclusive low corner.
    pub low: [i64; 3],
    /// The inclusive high corner.
    pub high: [i64; 3],
    /// The per-axis extra (ghost) cell margins.
    #[serde(default)]
    pub extra: [u32; 3],
}

fn unit_ratio() -> [u32; 3] {
    [1, 1, 1]
}

fn unit_spacing() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

/// The description of one refinement level: its boxes and shared geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelDescription {
    /// The boxes of the level.
    pub boxes: Vec<BoxDescription>,
    /// The refinement ratio relative to the coarser level.
    #[serde(default = "unit_ratio")]
    pub refinement_ratio: [u32; 3],
    /// The physical cell spacing.
    #[serde(default = "unit_spacing")]
    pub spacing: [f64; 3],
    /// The physical position of cell index `[0, 0, 0]`.
    #[serde(default)]
    pub anchor: [f64; 3],
    /// Per-axis periodicity flags.
    #[serde(default)]
    pub periodic: [bool; 3],
}
