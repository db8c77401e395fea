//! An in-memory backend for tests and examples.

use std::collections::HashMap;
use std::path::Path;

use amrgrid_metadata::FieldDescriptor;

use crate::backend::{BackendError, DataFormatBackend, RawGridBuffer};
use crate::grid_box::GridBox;

/// An in-memory [`DataFormatBackend`] holding one full-domain buffer per
/// `(timestep, variable)`.
///
/// Reads return the stored buffer with its own bounds regardless of the
/// requested region, exercising the consumers' handling of backends that
/// return a different region than requested.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    global_size: [i64; 3],
    logic_box: GridBox,
    fields: Vec<FieldDescriptor>,
    times: Vec<f64>,
    compressed: bool,
    buffers: HashMap<(usize, String), RawGridBuffer>,
}

impl MemoryBackend {
    /// Create a backend over a domain of `global_size` cells.
    #[must_use]
    pub fn new(global_size: [i64; 3]) -> Self {
        Self {
            global_size,
            logic_box: GridBox::from_extents(global_size),
            ..Self::default()
        }
    }

    /// Override the logical box reported for single-box mode.
    pub fn set_logic_box(&mut self, logic_box: GridBox) -> &mut Self {
        self.logic_box = logic_box;
        self
    }

    /// Mark the stored data as compressed.
    pub fn set_compressed(&mut self, compressed: bool) -> &mut Self {
        self.compressed = compressed;
        self
    }

    /// Register a field and its time series of buffers.
    ///
    /// `buffers` holds one [`RawGridBuffer`] per timestep, in step order. The
    /// time values grow by one per step on first registration.
    pub fn add_field(&mut self, field: FieldDescriptor, buffers: Vec<RawGridBuffer>) -> &mut Self {
        if self.times.len() < buffers.len() {
            self.times = (0..buffers.len()).map(|step| step as f64).collect();
        }
        for (step, buffer) in buffers.into_iter().enumerate() {
            self.buffers.insert((step, field.name.clone()), buffer);
        }
        self.fields.push(field);
        self
    }
}

impl DataFormatBackend for MemoryBackend {
    fn open(&mut self, _path: &Path) -> Result<(), BackendError> {
        Ok(())
    }

    fn global_size(&self) -> [i64; 3] {
        self.global_size
    }

    fn logic_box(&self) -> GridBox {
        self.logic_box
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields.clone()
    }

    fn times(&self) -> Vec<f64> {
        self.times.clone()
    }

    fn num_timesteps(&self) -> usize {
        self.times.len()
    }

    fn read(
        &self,
        _region: &GridBox,
        timestep: usize,
        variable: &str,
    ) -> Result<Option<RawGridBuffer>, BackendError> {
        Ok(self
            .buffers
            .get(&(timestep, variable.to_string()))
            .cloned())
    }

    fn is_compressed(&self) -> bool {
        self.compressed
    }
}

#[cfg(test)]
mod tests {
    use amrgrid_metadata::{Centering, NumericKind};

    use super::*;

    #[test]
    fn memory_backend_reads() {
        let mut backend = MemoryBackend::new([4, 4, 1]);
        backend.add_field(
            FieldDescriptor {
                name: "density".to_string(),
                kind: NumericKind::UInt8,
                centering: Centering::Cell,
                vector: false,
                num_components: 1,
            },
            vec![RawGridBuffer {
                bounds: GridBox::from_extents([4, 4, 1]),
                num_components: 1,
                data: (0..16).collect(),
            }],
        );

        assert_eq!(backend.num_timesteps(), 1);
        assert_eq!(backend.fields().len(), 1);

        let region = GridBox::from_extents([2, 2, 1]);
        let buffer = backend.read(&region, 0, "density").unwrap().unwrap();
        assert_eq!(buffer.data.len(), 16);
        assert!(backend.read(&region, 0, "missing").unwrap().is_none());
        assert!(backend.read(&region, 1, "density").unwrap().is_none());
    }
}
