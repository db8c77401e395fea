//! Sample placement (centering) conventions.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The placement convention for the sample points of a grid variable.
///
/// A structured grid variable is sampled at cell centers, at nodes, or at the
/// centers of the faces perpendicular to one axis. Patch bounds are tracked
/// independently for each convention because they differ by one sample layer
/// on the grown axes.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Centering {
    /// Cell-centered samples (`CC`).
    #[serde(rename = "CC")]
    #[display("CC")]
    Cell,
    /// Node-centered samples (`NC`).
    #[serde(rename = "NC")]
    #[display("NC")]
    Node,
    /// Samples on the centers of X-perpendicular faces (`SFCX`).
    #[serde(rename = "SFCX")]
    #[display("SFCX")]
    FaceX,
    /// Samples on the centers of Y-perpendicular faces (`SFCY`).
    #[serde(rename = "SFCY")]
    #[display("SFCY")]
    FaceY,
    /// Samples on the centers of Z-perpendicular faces (`SFCZ`).
    #[serde(rename = "SFCZ")]
    #[display("SFCZ")]
    FaceZ,
}

/// An unknown centering name error.
#[derive(Clone, Debug, Error)]
#[error("unknown centering {0:?}, expected one of CC, NC, SFCX, SFCY, SFCZ")]
pub struct UnknownCenteringError(String);

impl Centering {
    /// All centerings, in storage order.
    pub const ALL: [Centering; 5] = [
        Centering::Cell,
        Centering::Node,
        Centering::FaceX,
        Centering::FaceY,
        Centering::FaceZ,
    ];

    /// The index of the centering in [`Centering::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Centering::Cell => 0,
            Centering::Node => 1,
            Centering::FaceX => 2,
            Centering::FaceY => 3,
            Centering::FaceZ => 4,
        }
    }

    /// The high-side growth of the sample box relative to the cell-centered box.
    ///
    /// Node-centered data carries one extra sample layer on every axis, and
    /// face-centered data carries one extra layer on its perpendicular axis.
    #[must_use]
    pub const fn node_offset(self) -> [i64; 3] {
        match self {
            Centering::Cell => [0, 0, 0],
            Centering::Node => [1, 1, 1],
            Centering::FaceX => [1, 0, 0],
            Centering::FaceY => [0, 1, 0],
            Centering::FaceZ => [0, 0, 1],
        }
    }

    /// The canonical string form of the centering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Centering::Cell => "CC",
            Centering::Node => "NC",
            Centering::FaceX => "SFCX",
            Centering::FaceY => "SFCY",
            Centering::FaceZ => "SFCZ",
        }
    }
}

impl FromStr for Centering {
    type Err = UnknownCenteringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CC" => Ok(Centering::Cell),
            "NC" => Ok(Centering::Node),
            "SFCX" => Ok(Centering::FaceX),
            "SFCY" => Ok(Centering::FaceY),
            "SFCZ" => Ok(Centering::FaceZ),
            _ => Err(UnknownCenteringError(s.to_string())),
        }
    }
}
