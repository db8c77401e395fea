//! The data format backend interface.
//!
//! A [`DataFormatBackend`] is the external collaborator that supplies raw
//! bytes and field metadata for a concrete on-disk format. Its internals are
//! out of scope here; the trait pins down the contract the retrieval core
//! depends on.

mod memory;

use std::path::Path;

use thiserror::Error;

use amrgrid_metadata::FieldDescriptor;

use crate::grid_box::GridBox;

pub use memory::MemoryBackend;

/// A backend failure.
#[derive(Debug, Error)]
pub enum BackendError {
    /// An IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Any other backend failure.
    #[error("{0}")]
    Other(String),
}

/// Raw bytes returned by a backend for one box read.
///
/// The returned region may differ from the requested one, e.g. when the
/// format stores boundary layers alongside the interior samples. The byte
/// buffer is owned and transfers to the conversion layer.
#[derive(Clone, Debug)]
pub struct RawGridBuffer {
    /// The region the bytes actually cover.
    pub bounds: GridBox,
    /// The number of interleaved components per sample.
    pub num_components: usize,
    /// The sample bytes, x fastest.
    pub data: Vec<u8>,
}

/// The contract a concrete file format backend fulfils.
pub trait DataFormatBackend {
    /// Open the dataset at `path`.
    ///
    /// # Errors
    /// Returns [`BackendError`] if the dataset cannot be opened.
    fn open(&mut self, path: &Path) -> Result<(), BackendError>;

    /// The global logical size of the dataset in cells.
    fn global_size(&self) -> [i64; 3];

    /// The logical box of the dataset.
    ///
    /// Only consulted in single-box mode, when no multi-box metadata is
    /// available.
    fn logic_box(&self) -> GridBox;

    /// The fields present in the dataset.
    fn fields(&self) -> Vec<FieldDescriptor>;

    /// The time values of the timesteps.
    fn times(&self) -> Vec<f64>;

    /// The number of timesteps.
    fn num_timesteps(&self) -> usize;

    /// Read the bytes of `variable` over `region` at `timestep`.
    ///
    /// Returns [`None`] when the backend has no data for the query (missing
    /// variable, bad timestep); the caller treats this as a reported,
    /// non-fatal failure.
    ///
    /// # Errors
    /// Returns [`BackendError`] on an unrecoverable read failure.
    fn read(
        &self,
        region: &GridBox,
        timestep: usize,
        variable: &str,
    ) -> Result<Option<RawGridBuffer>, BackendError>;

    /// Whether the stored data is compressed.
    ///
    /// Compressed data is decompressed to native byte order in memory, so
    /// the conversion layer must not byte-swap it.
    fn is_compressed(&self) -> bool;
}
