//! The dataset facade consumed by the mesh-assembly layer.
//!
//! A [`Dataset`] wraps a [`DataFormatBackend`], builds the initial patch
//! list from the metadata source (or the backend's logic box when no
//! multi-box metadata exists), decomposes it for the configured worker
//! count, and serves per-patch bounds and typed variable reads. Query-time
//! failures are scoped to the single query: they are logged and surface as
//! "no data", never as a crash, and never affect other patches, variables,
//! or timesteps.

use std::path::Path;

use log::warn;
use thiserror::Error;

use amrgrid_metadata::{Centering, DatasetLayout, LevelDescription, VariableInfo};

use crate::backend::{BackendError, DataFormatBackend};
use crate::convert::{convert, query_box, ConvertError, GridData};
use crate::decompose::{decompose, DecomposeError, DecomposeOptions};
use crate::grid_box::{GridBox, GridBoxError};
use crate::patch::{Level, Patch, TimeStepInfo};

/// A dataset open failure.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The backend failed to open the dataset.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The layout marks a multi-box source but no level description was given.
    #[error("multi-box layout requires a level description")]
    MissingLevelDescription,
    /// The level description holds an invalid box.
    #[error(transparent)]
    InvalidBox(#[from] GridBoxError),
    /// Domain decomposition failed.
    #[error(transparent)]
    Decompose(#[from] DecomposeError),
}

/// A query failure that is not a "no data" outcome.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The backend read failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The typed conversion failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Options for [`Dataset::open`].
///
/// The default values are:
/// - `workers`: `1`
/// - `decompose`: [`DecomposeOptions::default`]
#[derive(Debug, Clone, Copy)]
pub struct DatasetOptions {
    workers: u32,
    decompose: DecomposeOptions,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            decompose: DecomposeOptions::default(),
        }
    }
}

impl DatasetOptions {
    /// Return the worker count.
    #[must_use]
    pub fn workers(&self) -> u32 {
        self.workers
    }

    /// Set the worker count the patch list is decomposed for.
    pub fn set_workers(&mut self, workers: u32) -> &mut Self {
        self.workers = workers;
        self
    }

    /// Set the worker count the patch list is decomposed for.
    #[must_use]
    pub fn with_workers(mut self, workers: u32) -> Self {
        self.workers = workers;
        self
    }

    /// Return the decomposition options.
    #[must_use]
    pub fn decompose(&self) -> &DecomposeOptions {
        &self.decompose
    }

    /// Set the decomposition options.
    pub fn set_decompose(&mut self, decompose: DecomposeOptions) -> &mut Self {
        self.decompose = decompose;
        self
    }

    /// Set the decomposition options.
    #[must_use]
    pub fn with_decompose(mut self, decompose: DecomposeOptions) -> Self {
        self.decompose = decompose;
        self
    }
}

/// An open dataset: a backend plus its decomposed per-timestep grids.
#[derive(Debug)]
pub struct Dataset<B: DataFormatBackend> {
    backend: B,
    layout: DatasetLayout,
    options: DatasetOptions,
    timesteps: Vec<TimeStepInfo>,
}

impl<B: DataFormatBackend> Dataset<B> {
    /// Open the dataset at `path` and decompose its patch list.
    ///
    /// In multi-box mode the initial patch list comes from `description`; in
    /// single-box mode it is the backend's logic box. The decomposed level
    /// is shared by every timestep.
    ///
    /// # Errors
    /// Returns [`OpenError`] if the backend fails to open, the description
    /// is missing or invalid, or decomposition fails.
    pub fn open(
        mut backend: B,
        path: &Path,
        layout: DatasetLayout,
        description: Option<&LevelDescription>,
        options: DatasetOptions,
    ) -> Result<Self, OpenError> {
        backend.open(path)?;

        let initial = if layout.multi_box {
            let description = description.ok_or(OpenError::MissingLevelDescription)?;
            Level::from_description(description)?
        } else {
            Level::new(
                vec![Patch::from_cell_box(backend.logic_box(), [0, 0, 0])],
                [1, 1, 1],
                [1.0, 1.0, 1.0],
                [0.0, 0.0, 0.0],
                [false, false, false],
            )
        };

        let global = GridBox::from_extents(backend.global_size());
        let level = decompose(
            &initial,
            options.workers(),
            global,
            &layout,
            options.decompose(),
        )?;

        let variables: Vec<VariableInfo> = backend
            .fields()
            .into_iter()
            .map(VariableInfo::from)
            .collect();
        let times = backend.times();
        let timesteps = (0..backend.num_timesteps())
            .map(|step| TimeStepInfo {
                time: times.get(step).copied().unwrap_or_default(),
                level: level.clone(),
                variables: variables.clone(),
            })
            .collect();

        Ok(Self {
            backend,
            layout,
            options,
            timesteps,
        })
    }

    /// The layout conventions of the dataset.
    #[must_use]
    pub const fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    /// The per-timestep grid and variable listings.
    #[must_use]
    pub fn timesteps(&self) -> &[TimeStepInfo] {
        &self.timesteps
    }

    /// The decomposed patch count per timestep.
    #[must_use]
    pub fn num_patches(&self) -> usize {
        self.timesteps.first().map_or(0, |step| step.level.len())
    }

    /// The bounds of one patch for `centering`.
    ///
    /// Returns [`None`] for an out-of-range patch index.
    #[must_use]
    pub fn patch_bounds(
        &self,
        patch: usize,
        centering: Centering,
        include_extra: bool,
    ) -> Option<GridBox> {
        self.timesteps
            .first()?
            .level
            .patches()
            .get(patch)
            .map(|patch| patch.bounds(centering, include_extra))
    }

    /// The bounds over all patches for `centering`.
    #[must_use]
    pub fn global_bounds(&self, centering: Centering, include_extra: bool) -> Option<GridBox> {
        self.timesteps
            .first()?
            .level
            .extents(centering, include_extra)
    }

    /// The contiguous patch range owned by worker `rank`.
    #[must_use]
    pub fn patches_for_rank(&self, rank: u32) -> &[Patch] {
        let Some(step) = self.timesteps.first() else {
            return &[];
        };
        let per_rank = step.level.len() / self.options.workers() as usize;
        let start = rank as usize * per_rank;
        let end = start + per_rank;
        if start >= step.level.len() {
            return &[];
        }
        &step.level.patches()[start..end.min(step.level.len())]
    }

    /// Read and convert `variable` over one patch of one timestep.
    ///
    /// Returns `Ok(None)`, with a logged warning, when the timestep or patch
    /// index is out of range, the variable is not among the backend's fields,
    /// or the backend has no bytes for the query.
    ///
    /// # Errors
    /// Returns [`QueryError`] if the backend read or the typed conversion
    /// fails outright.
    pub fn read_variable(
        &self,
        timestep: usize,
        patch: usize,
        variable: &str,
    ) -> Result<Option<GridData>, QueryError> {
        let Some(step) = self.timesteps.get(timestep) else {
            warn!("timestep {timestep} out of range");
            return Ok(None);
        };
        let Some(info) = step.variables.iter().find(|info| info.name == variable) else {
            warn!("variable {variable:?} not found at timestep {timestep}");
            return Ok(None);
        };
        let Some(patch) = step.level.patches().get(patch) else {
            warn!("patch {patch} out of range at timestep {timestep}");
            return Ok(None);
        };

        let requested = patch.bounds(
            info.centering,
            self.options.decompose().honor_extra_cells(),
        );
        let region = query_box(&requested, info.centering, &self.layout);
        let Some(raw) = self.backend.read(&region, timestep, variable)? else {
            warn!("no data for variable {variable:?} over {region} at timestep {timestep}");
            return Ok(None);
        };

        let grid = convert(
            raw,
            &info.descriptor(),
            &self.layout,
            self.backend.is_compressed(),
        )?;
        Ok(Some(grid))
    }
}
