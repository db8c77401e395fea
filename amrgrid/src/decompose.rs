//! Worker-count-aware domain decomposition.
//!
//! [`decompose`] repartitions the patch list of a [`Level`] so the patch
//! count is an exact multiple of the worker count, splitting each input box
//! into an approximately cubical sub-block grid and optionally reconciling
//! the seams between sub-boxes of multi-box metadata so shared cells are not
//! counted twice. The input level is left untouched; a new level is returned
//! for the caller to swap in.

use std::collections::HashSet;

use itertools::izip;
use log::debug;
use thiserror::Error;

use amrgrid_metadata::{Centering, DatasetLayout};

use crate::grid_box::{Axis, GridBox};
use crate::patch::{Level, Patch};

/// A domain decomposition error.
#[derive(Clone, Debug, Error)]
pub enum DecomposeError {
    /// The final patch count is not divisible by the worker count.
    #[error(
        "decomposed patch count {patches} is not a multiple of the worker count {workers}"
    )]
    IndivisiblePatchCount {
        /// The produced patch count.
        patches: usize,
        /// The requested worker count.
        workers: u32,
    },
    /// The worker count is zero.
    #[error("worker count must be non-zero")]
    ZeroWorkers,
}

/// Options for [`decompose`].
///
/// The default values are:
/// - `honor_extra_cells`: `true`
#[derive(Debug, Clone, Copy)]
pub struct DecomposeOptions {
    honor_extra_cells: bool,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self {
            honor_extra_cells: true,
        }
    }
}

impl DecomposeOptions {
    /// Return the honor extra cells setting.
    #[must_use]
    pub fn honor_extra_cells(&self) -> bool {
        self.honor_extra_cells
    }

    /// Set whether split patches keep the extra cell margins of their source box.
    pub fn set_honor_extra_cells(&mut self, honor_extra_cells: bool) -> &mut Self {
        self.honor_extra_cells = honor_extra_cells;
        self
    }

    /// Set whether split patches keep the extra cell margins of their source box.
    #[must_use]
    pub fn with_honor_extra_cells(mut self, honor_extra_cells: bool) -> Self {
        self.honor_extra_cells = honor_extra_cells;
        self
    }
}

/// Repartition `level` into a patch list whose size is a multiple of
/// `workers`.
///
/// Each input box is split into `c = max(b, n) / min(b, n)` sub-boxes (`b`
/// input boxes, `n` workers), laid out on a greedily factored block grid.
/// When the worker count is smaller than the input patch count, the level is
/// first collapsed to a single patch spanning `global`. Seams between
/// sub-boxes are reconciled when `layout` marks a multi-box source with more
/// than one input box. Owner ranks are stamped on the output: rank `r` owns
/// the contiguous patches `[r * k, (r + 1) * k)` with `k = patches / n`.
///
/// # Errors
/// Returns [`DecomposeError::ZeroWorkers`] if `workers` is zero, and
/// [`DecomposeError::IndivisiblePatchCount`] if the produced patch count is
/// not an exact multiple of `workers`.
pub fn decompose(
    level: &Level,
    workers: u32,
    global: GridBox,
    layout: &DatasetLayout,
    options: &DecomposeOptions,
) -> Result<Level, DecomposeError> {
    if workers == 0 {
        return Err(DecomposeError::ZeroWorkers);
    }
    let n = workers as usize;

    // Bootstrap: with fewer workers than input boxes (or no boxes at all),
    // collapse to a single patch spanning the global logical extent.
    let collapsed;
    let input: &[Patch] = if level.is_empty() || n < level.len() {
        collapsed = [Patch::from_cell_box(global, [0, 0, 0])];
        &collapsed
    } else {
        level.patches()
    };

    let b = input.len();
    let c = b.max(n) / b.min(n);
    let grid = block_grid(c);
    debug!("splitting {b} boxes for {n} workers: {c} sub-boxes each on a {grid:?} block grid");

    let mut patches = Vec::with_capacity(b * c);
    for patch in input {
        let extra = if options.honor_extra_cells() {
            let extra = patch.extra_cells();
            [extra[0], extra[1], extra[2]]
        } else {
            [0, 0, 0]
        };
        for sub in split_box(&patch.bounds(Centering::Cell, false), grid) {
            patches.push(Patch::from_cell_box(sub, extra));
        }
    }

    if layout.multi_box && b > 1 {
        reconcile_seams(&mut patches);
    }

    if patches.len() % n != 0 {
        return Err(DecomposeError::IndivisiblePatchCount {
            patches: patches.len(),
            workers,
        });
    }

    let per_rank = patches.len() / n;
    for (index, patch) in patches.iter_mut().enumerate() {
        patch.set_rank((index / per_rank) as u32);
    }

    Ok(level.with_patches(patches))
}

/// Factor `c` into an approximately cubical block grid `(gx, gy, gz)`.
///
/// The smallest integer divisor >= 2 is repeatedly extracted from the
/// remaining quotient and assigned round-robin to the axes x, y, z, x, ...;
/// a leftover prime remainder goes to whichever axis the round-robin cursor
/// points at.
fn block_grid(c: usize) -> [i64; 3] {
    let mut grid = [1_i64; 3];
    let mut axis = 0;
    let mut quotient = c;
    let mut divisor = 2;
    while divisor * divisor <= quotient {
        if quotient % divisor == 0 {
            grid[axis] *= divisor as i64;
            quotient /= divisor;
            axis = (axis + 1) % 3;
        } else {
            divisor += 1;
        }
    }
    if quotient > 1 {
        grid[axis] *= quotient as i64;
    }
    grid
}

/// Split `cell` into the sub-boxes of a block grid.
///
/// Each axis divides into a base block dimension and a residual; the
/// residual is absorbed into the final block along its axis so the sub-boxes
/// exactly tile `cell`.
fn split_box(cell: &GridBox, grid: [i64; 3]) -> Vec<GridBox> {
    let mut block_dim = [0_i64; 3];
    let mut residual = [0_i64; 3];
    for (dim, res, extent, blocks) in izip!(&mut block_dim, &mut residual, cell.extents(), grid) {
        *dim = extent / blocks;
        *res = extent % blocks;
    }

    let count = grid[0] * grid[1] * grid[2];
    let mut subs = Vec::with_capacity(count as usize);
    for index in 0..count {
        let block_id = [
            index % grid[0],
            (index / grid[0]) % grid[1],
            index / (grid[0] * grid[1]),
        ];
        let mut low = [0_i64; 3];
        let mut high = [0_i64; 3];
        for d in 0..3 {
            low[d] = cell.low()[d] + block_id[d] * block_dim[d];
            high[d] = low[d] + block_dim[d] - 1;
            if high[d] + residual[d] == cell.high()[d] {
                high[d] = cell.high()[d];
            }
        }
        subs.push(GridBox::from_corners(low, high));
    }
    subs
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
enum Side {
    Low,
    High,
}

/// Shift touching faces of adjacent patches inward so shared cells are
/// counted once.
///
/// For each qualifying pair the box with the smaller coordinate on the
/// contact axis gives up one cell from its high side, unless it is strictly
/// shorter than its neighbor on both non-contact axes, in which case the
/// neighbor gives up one cell from its low side instead. The edited map
/// keyed by `(patch, axis, side)` keeps a face from being shifted twice when
/// a patch touches several neighbors on the same side.
fn reconcile_seams(patches: &mut [Patch]) {
    let mut edited: HashSet<(usize, Axis, Side)> = HashSet::new();
    for i in 0..patches.len() {
        for j in (i + 1)..patches.len() {
            let a = patches[i].bounds(Centering::Cell, false);
            let b = patches[j].bounds(Centering::Cell, false);
            let Some(contact) = a.touch(&b) else {
                continue;
            };
            if contact.zero_axes >= 2 {
                continue;
            }
            let axis = contact.axis;
            let face_axes = Axis::ALL
                .into_iter()
                .filter(|candidate| *candidate != axis)
                .collect::<Vec<_>>();
            // The contact face must have positive extent on both of the
            // other axes.
            if face_axes
                .iter()
                .any(|candidate| contact.sizes[candidate.index()] <= 0)
            {
                continue;
            }

            let (lower, upper) = if a.low()[axis.index()] <= b.low()[axis.index()] {
                (i, j)
            } else {
                (j, i)
            };
            let lower_box = patches[lower].bounds(Centering::Cell, false);
            let upper_box = patches[upper].bounds(Centering::Cell, false);
            let lower_shorter = face_axes
                .iter()
                .all(|candidate| lower_box.extent(*candidate) < upper_box.extent(*candidate));

            if lower_shorter {
                // The strictly shorter lower box keeps its cells; the upper
                // box gives up its low-side layer.
                if upper_box.extent(axis) > 1 && edited.insert((upper, axis, Side::Low)) {
                    let mut low = upper_box.low();
                    low[axis.index()] += 1;
                    patches[upper].set_cell_box(GridBox::from_corners(low, upper_box.high()));
                }
            } else if lower_box.extent(axis) > 1 && edited.insert((lower, axis, Side::High)) {
                let mut high = lower_box.high();
                high[axis.index()] -= 1;
                patches[lower].set_cell_box(GridBox::from_corners(lower_box.low(), high));
            }
        }
    }
}
