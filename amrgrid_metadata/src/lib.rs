//! Grid description metadata for the [`amrgrid`](https://docs.rs/amrgrid/latest/amrgrid/index.html) crate.
//!
//! This crate holds the pure description types shared between metadata
//! sources and the decomposition/retrieval core:
//!  - [`Centering`]: the five sample placement conventions,
//!  - [`NumericKind`]: the supported fixed-width numeric kinds,
//!  - [`VariableInfo`] / [`FieldDescriptor`]: per-variable listings,
//!  - [`DatasetLayout`] / [`IndexOrigin`]: dataset-wide indexing conventions,
//!  - [`LevelDescription`] / [`BoxDescription`]: the box list of a refinement level.
//!
//! All types serialize with [`serde`] so metadata sources (e.g. an XML or JSON
//! sidecar parser) can deserialize directly into them.
//!
//! ## Licence
//! `amrgrid_metadata` is licensed under either of
//!  - the Apache License, Version 2.0 or <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license or <http://opensource.org/licenses/MIT>, at your option.

mod centering;
pub use centering::{Centering, UnknownCenteringError};

mod numeric;
pub use numeric::{NumericKind, UnknownNumericKindError};

mod variable;
pub use variable::{FieldDescriptor, VariableInfo};

mod layout;
pub use layout::{DatasetLayout, IndexOrigin};

mod level;
pub use level::{BoxDescription, LevelDescription};
