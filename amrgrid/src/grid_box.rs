//! Axis-aligned integer boxes and their geometric predicates.
//!
//! A [`GridBox`] is the inclusive `[low, high]` index region of a patch for
//! one centering. The [`intersects`](GridBox::intersects) and
//! [`touch`](GridBox::touch) predicates drive seam reconciliation during
//! domain decomposition.

use derive_more::Display;
use thiserror::Error;

/// A coordinate axis.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash)]
pub enum Axis {
    /// The X axis.
    #[display("x")]
    X,
    /// The Y axis.
    #[display("y")]
    Y,
    /// The Z axis.
    #[display("z")]
    Z,
}

impl Axis {
    /// All axes, in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The index of the axis.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// An invalid box corners error.
#[derive(Clone, Debug, Error)]
#[error("invalid box: low {low:?} exceeds high {high:?}")]
pub struct GridBoxError {
    /// The offending low corner.
    pub low: [i64; 3],
    /// The offending high corner.
    pub high: [i64; 3],
}

/// An axis-aligned integer box with inclusive corners.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Hash)]
#[display("[{low:?}, {high:?}]")]
pub struct GridBox {
    low: [i64; 3],
    high: [i64; 3],
}

/// The classified contact between two boxes returned by [`GridBox::touch`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Contact {
    /// The axis the contact occurs on.
    pub axis: Axis,
    /// The per-axis intersection sizes (`inter_high - inter_low`).
    pub sizes: [i64; 3],
    /// The number of axes with a zero-size intersection.
    pub zero_axes: usize,
}

impl GridBox {
    /// Create a new box from inclusive corners.
    ///
    /// # Errors
    /// Returns [`GridBoxError`] if `low` exceeds `high` on any axis.
    pub fn new(low: [i64; 3], high: [i64; 3]) -> Result<Self, GridBoxError> {
        if std::iter::zip(&low, &high).any(|(l, h)| l > h) {
            Err(GridBoxError { low, high })
        } else {
            Ok(Self { low, high })
        }
    }

    /// Create a new box from inclusive corners without validation.
    ///
    /// The caller must ensure `low[d] <= high[d]` on every axis.
    #[must_use]
    pub const fn from_corners(low: [i64; 3], high: [i64; 3]) -> Self {
        Self { low, high }
    }

    /// Create a new box spanning `extents` cells from the origin.
    #[must_use]
    pub const fn from_extents(extents: [i64; 3]) -> Self {
        Self {
            low: [0, 0, 0],
            high: [extents[0] - 1, extents[1] - 1, extents[2] - 1],
        }
    }

    /// The inclusive low corner.
    #[must_use]
    pub const fn low(&self) -> [i64; 3] {
        self.low
    }

    /// The inclusive high corner.
    #[must_use]
    pub const fn high(&self) -> [i64; 3] {
        self.high
    }

    /// The number of cells spanned on `axis`.
    #[must_use]
    pub const fn extent(&self, axis: Axis) -> i64 {
        let d = axis.index();
        self.high[d] - self.low[d] + 1
    }

    /// The number of cells spanned on each axis.
    #[must_use]
    pub fn extents(&self) -> [i64; 3] {
        [
            self.extent(Axis::X),
            self.extent(Axis::Y),
            self.extent(Axis::Z),
        ]
    }

    /// The total number of cells in the box.
    #[must_use]
    pub fn num_cells(&self) -> i64 {
        self.extents().iter().product()
    }

    /// Grow the box by per-side margins: `neg` is subtracted from the low
    /// corner and `pos` is added to the high corner, per axis.
    #[must_use]
    pub fn grow(&self, neg: [i64; 3], pos: [i64; 3]) -> Self {
        let mut low = self.low;
        let mut high = self.high;
        for d in 0..3 {
            low[d] -= neg[d];
            high[d] += pos[d];
        }
        Self { low, high }
    }

    /// The smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut low = self.low;
        let mut high = self.high;
        for d in 0..3 {
            low[d] = low[d].min(other.low[d]);
            high[d] = high[d].max(other.high[d]);
        }
        Self { low, high }
    }

    /// Returns true if the cell index is inside the box.
    #[must_use]
    pub fn contains(&self, index: [i64; 3]) -> bool {
        std::iter::zip(&self.low, &index).all(|(l, i)| l <= i)
            && std::iter::zip(&index, &self.high).all(|(i, h)| i <= h)
    }

    /// The intersection extents of two boxes, or [`None`] if they are
    /// disjoint or meet only on a face, edge, or corner.
    #[must_use]
    pub fn overlap(&self, other: &Self) -> Option<Self> {
        if self.intersects(other) {
            let mut low = [0; 3];
            let mut high = [0; 3];
            for d in 0..3 {
                low[d] = self.low[d].max(other.low[d]);
                high[d] = self.high[d].min(other.high[d]);
            }
            Some(Self { low, high })
        } else {
            None
        }
    }

    /// Returns true if the boxes overlap volumetrically on all three axes
    /// simultaneously.
    ///
    /// A zero-size intersection on any axis (a shared face plane) does not
    /// count as an intersection.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let mut product = 1;
        for d in 0..3 {
            let size = self.high[d].min(other.high[d]) - self.low[d].max(other.low[d]);
            if size < 0 {
                return false;
            }
            product *= size;
        }
        product > 0
    }

    /// Classify the contact between two boxes.
    ///
    /// Returns [`None`] if the boxes are disjoint on any axis. Otherwise the
    /// contact axis is the axis with the globally smallest intersection size,
    /// overridden by the zero-size axis when exactly one axis has a zero-size
    /// intersection (a face coincidence).
    ///
    /// The result is independent of argument order. The minimum-size
    /// heuristic can misclassify edge or corner contacts of boxes that are
    /// not face-aligned; consumers relying on output parity with the
    /// companion tools depend on that behavior.
    #[must_use]
    pub fn touch(&self, other: &Self) -> Option<Contact> {
        let mut sizes = [0; 3];
        for d in 0..3 {
            let inter_low = self.low[d].max(other.low[d]);
            let inter_high = self.high[d].min(other.high[d]);
            sizes[d] = inter_high - inter_low;
            if sizes[d] < 0 {
                return None;
            }
        }

        let zero_axes = sizes.iter().filter(|size| **size == 0).count();
        let mut axis = Axis::X;
        for candidate in [Axis::Y, Axis::Z] {
            if sizes[candidate.index()] < sizes[axis.index()] {
                axis = candidate;
            }
        }
        if zero_axes == 1 {
            for candidate in Axis::ALL {
                if sizes[candidate.index()] == 0 {
                    axis = candidate;
                }
            }
        }

        Some(Contact {
            axis,
            sizes,
            zero_axes,
        })
    }
}
