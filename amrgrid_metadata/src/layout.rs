//! Dataset-wide indexing conventions.

use serde::{Deserialize, Serialize};

/// How a backend indexes box reads relative to the stored samples.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexOrigin {
    /// Boxes include a ghost layer below the origin; low bounds start at -1.
    GhostLow,
    /// Boxes carry one layer of padding on every side.
    Padded,
}

fn three() -> usize {
    3
}

/// Dataset-wide layout conventions reported by the metadata source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetLayout {
    /// Whether the metadata source describes multiple boxes per level.
    #[serde(default)]
    pub multi_box: bool,
    /// The box indexing convention of the backend.
    pub origin: IndexOrigin,
    /// The spatial dimensionality of the dataset (2 or 3).
    #[serde(default = "three")]
    pub dimensionality: usize,
    /// Whether stored samples use the opposite byte order to the consumer.
    #[serde(default)]
    pub reverse_endian: bool,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            multi_box: false,
            origin: IndexOrigin::Padded,
            dimensionality: 3,
            reverse_endian: false,
        }
    }
}
