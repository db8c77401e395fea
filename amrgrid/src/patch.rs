//! Patches, levels, and per-timestep grid metadata.
//!
//! A [`Patch`] tracks one [`GridBox`] per [`Centering`] plus its extra
//! (ghost) cell margins and owning worker rank. A [`Level`] is an ordered
//! patch list sharing refinement ratio, spacing, anchor, and periodicity.
//! Patches and levels are built once per dataset open and replaced wholesale
//! by the decomposition pass; they are never mutated concurrently.

use amrgrid_metadata::{Centering, LevelDescription, VariableInfo};

use crate::grid_box::{Axis, GridBox, GridBoxError};

/// An axis-aligned patch of a structured grid, described per centering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch {
    /// Bounds per centering, indexed by [`Centering::index`].
    bounds: [GridBox; 5],
    /// Extra cell margins `[-x, -y, -z, +x, +y, +z]`.
    extra: [u32; 6],
    /// The owning worker rank, unset until decomposition stamps it.
    rank: Option<u32>,
}

impl Patch {
    /// Create a patch from its cell-centered box.
    ///
    /// The remaining centerings are derived by growing the high side by each
    /// centering's [`node_offset`](Centering::node_offset). The extra cell
    /// margins are mirrored from the negative sides onto the positive sides.
    #[must_use]
    pub fn from_cell_box(cell: GridBox, extra: [u32; 3]) -> Self {
        let mut patch = Self {
            bounds: [cell; 5],
            extra: [extra[0], extra[1], extra[2], extra[0], extra[1], extra[2]],
            rank: None,
        };
        patch.stamp_from_cell_box(cell);
        patch
    }

    /// Rewrite the cell-centered box and re-derive every other centering.
    pub fn set_cell_box(&mut self, cell: GridBox) {
        self.stamp_from_cell_box(cell);
    }

    fn stamp_from_cell_box(&mut self, cell: GridBox) {
        for centering in Centering::ALL {
            let offset = centering.node_offset();
            self.bounds[centering.index()] = GridBox::from_corners(
                cell.low(),
                [
                    cell.high()[0] + offset[0],
                    cell.high()[1] + offset[1],
                    cell.high()[2] + offset[2],
                ],
            );
        }
    }

    /// The bounds of the patch for `centering`.
    ///
    /// When `include_extra` is set the box is grown by the extra cell
    /// margins: the negative margins are subtracted from the low corner and
    /// the positive margins added to the high corner, per axis.
    #[must_use]
    pub fn bounds(&self, centering: Centering, include_extra: bool) -> GridBox {
        let bounds = self.bounds[centering.index()];
        if include_extra {
            bounds.grow(
                [
                    i64::from(self.extra[0]),
                    i64::from(self.extra[1]),
                    i64::from(self.extra[2]),
                ],
                [
                    i64::from(self.extra[3]),
                    i64::from(self.extra[4]),
                    i64::from(self.extra[5]),
                ],
            )
        } else {
            bounds
        }
    }

    /// Write the bounds and extra cell margins for `centering`.
    pub fn set_bounds(&mut self, centering: Centering, bounds: GridBox, extra: [u32; 6]) {
        self.bounds[centering.index()] = bounds;
        self.extra = extra;
    }

    /// The extra cell margins `[-x, -y, -z, +x, +y, +z]`.
    #[must_use]
    pub const fn extra_cells(&self) -> [u32; 6] {
        self.extra
    }

    /// The owning worker rank, if stamped.
    #[must_use]
    pub const fn rank(&self) -> Option<u32> {
        self.rank
    }

    /// Stamp the owning worker rank.
    pub fn set_rank(&mut self, rank: u32) {
        self.rank = Some(rank);
    }
}

/// An ordered patch list sharing refinement ratio, spacing, anchor, and
/// periodicity.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    patches: Vec<Patch>,
    refinement_ratio: [u32; 3],
    spacing: [f64; 3],
    anchor: [f64; 3],
    periodic: [bool; 3],
}

impl Level {
    /// Create a level from its patches and shared geometry.
    #[must_use]
    pub fn new(
        patches: Vec<Patch>,
        refinement_ratio: [u32; 3],
        spacing: [f64; 3],
        anchor: [f64; 3],
        periodic: [bool; 3],
    ) -> Self {
        Self {
            patches,
            refinement_ratio,
            spacing,
            anchor,
            periodic,
        }
    }

    /// Build a level from a metadata source description.
    ///
    /// # Errors
    /// Returns [`GridBoxError`] if any described box has a low corner
    /// exceeding its high corner.
    pub fn from_description(description: &LevelDescription) -> Result<Self, GridBoxError> {
        let patches = description
            .boxes
            .iter()
            .map(|grid_box| {
                Ok(Patch::from_cell_box(
                    GridBox::new(grid_box.low, grid_box.high)?,
                    grid_box.extra,
                ))
            })
            .collect::<Result<Vec<_>, GridBoxError>>()?;
        Ok(Self {
            patches,
            refinement_ratio: description.refinement_ratio,
            spacing: description.spacing,
            anchor: description.anchor,
            periodic: description.periodic,
        })
    }

    /// Create a level with the same shared geometry but a new patch list.
    #[must_use]
    pub fn with_patches(&self, patches: Vec<Patch>) -> Self {
        Self {
            patches,
            refinement_ratio: self.refinement_ratio,
            spacing: self.spacing,
            anchor: self.anchor,
            periodic: self.periodic,
        }
    }

    /// The patches of the level.
    #[must_use]
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// The number of patches in the level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Returns true if the level has no patches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// The refinement ratio relative to the coarser level.
    #[must_use]
    pub const fn refinement_ratio(&self) -> [u32; 3] {
        self.refinement_ratio
    }

    /// The physical cell spacing.
    #[must_use]
    pub const fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// The physical position of cell index `[0, 0, 0]`.
    #[must_use]
    pub const fn anchor(&self) -> [f64; 3] {
        self.anchor
    }

    /// Per-axis periodicity flags.
    #[must_use]
    pub const fn periodic(&self) -> [bool; 3] {
        self.periodic
    }

    /// The per-axis min/max bounds over all patches for one centering.
    ///
    /// Returns [`None`] for an empty level.
    #[must_use]
    pub fn extents(&self, centering: Centering, include_extra: bool) -> Option<GridBox> {
        self.patches
            .iter()
            .map(|patch| patch.bounds(centering, include_extra))
            .reduce(|a, b| a.union(&b))
    }

    /// The world-space bounds of the level: the anchor plus the spacing
    /// applied to the node-centered logical extents.
    ///
    /// Returns [`None`] for an empty level.
    #[must_use]
    pub fn physical_extents(&self) -> Option<([f64; 3], [f64; 3])> {
        let extents = self.extents(Centering::Node, false)?;
        let mut low = [0.0; 3];
        let mut high = [0.0; 3];
        for axis in Axis::ALL {
            let d = axis.index();
            low[d] = self.anchor[d] + self.spacing[d] * extents.low()[d] as f64;
            high[d] = self.anchor[d] + self.spacing[d] * extents.high()[d] as f64;
        }
        Some((low, high))
    }
}

/// The grid and variable listing of one timestep.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeStepInfo {
    /// The simulated time of the step.
    pub time: f64,
    /// The decomposed patch list of the step.
    pub level: Level,
    /// The variables present in the step.
    pub variables: Vec<VariableInfo>,
}
