//! `amrgrid` partitions block-structured (AMR-style) scientific grids
//! across worker processes and converts raw typed byte buffers into
//! component-correct, byte-order-correct numeric arrays for a renderer.
//!
//! The crate covers three concerns:
//! - the patch/level metadata model: per-centering bounds, extra (ghost)
//!   cell margins, and per-timestep variable listings
//!   ([`Patch`], [`Level`], [`TimeStepInfo`]),
//! - domain decomposition: splitting the input box list into a patch list
//!   whose size is a multiple of the worker count, with boundary-seam
//!   reconciliation for multi-box metadata sources ([`decompose`]),
//! - typed retrieval: adjusting query boxes to the backend's indexing
//!   convention and converting returned bytes into typed, vector-expanded,
//!   endian-corrected arrays ([`convert`], [`Dataset::read_variable`]).
//!
//! Concrete file formats implement [`DataFormatBackend`]; description types
//! shared with metadata sources live in [`amrgrid_metadata`].
//!
//! The core is synchronous and single-threaded: decomposition runs once per
//! worker at dataset open, and each `(timestep, patch, variable)` query is an
//! independent blocking computation over owned buffers. Worker processes are
//! expected to operate on disjoint contiguous patch ranges of the same
//! decomposition ([`Dataset::patches_for_rank`]).
//!
//! ## Example
//! ```rust
//! use amrgrid::{Dataset, DatasetOptions, GridBox, MemoryBackend, RawGridBuffer};
//! use amrgrid_metadata::{Centering, DatasetLayout, FieldDescriptor, NumericKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut backend = MemoryBackend::new([8, 8, 8]);
//! let values: Vec<f32> = (0..512).map(|i| i as f32).collect();
//! backend.add_field(
//!     FieldDescriptor {
//!         name: "density".to_string(),
//!         kind: NumericKind::Float32,
//!         centering: Centering::Cell,
//!         vector: false,
//!         num_components: 1,
//!     },
//!     vec![RawGridBuffer {
//!         bounds: GridBox::from_extents([8, 8, 8]),
//!         num_components: 1,
//!         data: values.iter().flat_map(|v| v.to_ne_bytes()).collect(),
//!     }],
//! );
//!
//! let dataset = Dataset::open(
//!     backend,
//!     std::path::Path::new("in-memory"),
//!     DatasetLayout::default(),
//!     None,
//!     DatasetOptions::default().with_workers(8),
//! )?;
//! assert_eq!(dataset.num_patches() % 8, 0);
//!
//! let grid = dataset.read_variable(0, 0, "density")?.expect("data");
//! assert_eq!(grid.num_tuples(), 512);
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//! `amrgrid` logs decomposition progress and reported, non-fatal query
//! failures using the [`log`] crate. A logging implementation must be
//! enabled to capture logs.
//!
//! ## Licence
//! `amrgrid` is licensed under either of
//!  - the Apache License, Version 2.0 or <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license or <http://opensource.org/licenses/MIT>, at your option.

mod grid_box;
pub use grid_box::{Axis, Contact, GridBox, GridBoxError};

mod patch;
pub use patch::{Level, Patch, TimeStepInfo};

mod decompose;
pub use decompose::{decompose, DecomposeError, DecomposeOptions};

mod backend;
pub use backend::{BackendError, DataFormatBackend, MemoryBackend, RawGridBuffer};

mod convert;
pub use convert::{convert, query_box, tuple_counts, ConvertError, GridData, TypedValues};

mod dataset;
pub use dataset::{Dataset, DatasetOptions, OpenError, QueryError};

/// Re-export of the description types crate.
pub use amrgrid_metadata as metadata;
