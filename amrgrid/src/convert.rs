//! Typed conversion of raw backend bytes.
//!
//! [`convert`] turns the byte buffer of a box read into a typed,
//! vector-expanded, byte-order-corrected [`GridData`] for the mesh-assembly
//! layer. All ten numeric kinds flow through the same generic routine, so
//! the per-kind branches cannot diverge in behavior.

use thiserror::Error;

use amrgrid_metadata::{Centering, DatasetLayout, FieldDescriptor, IndexOrigin, NumericKind};

use crate::backend::RawGridBuffer;
use crate::grid_box::GridBox;

/// A typed conversion error.
#[derive(Clone, Debug, Error)]
pub enum ConvertError {
    /// The backend returned fewer bytes than the region requires.
    #[error("raw buffer holds {got} bytes, expected at least {expected} for kind {kind}")]
    ShortBuffer {
        /// The numeric kind being converted.
        kind: NumericKind,
        /// The byte count of the raw buffer.
        got: usize,
        /// The minimum byte count the region requires.
        expected: usize,
    },
    /// The returned region spans no samples.
    #[error("returned region {0} has no samples")]
    EmptyRegion(GridBox),
}

/// A typed, component-expanded output array.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValues {
    /// Signed 8-bit samples.
    Int8(Vec<i8>),
    /// Unsigned 8-bit samples.
    UInt8(Vec<u8>),
    /// Signed 16-bit samples.
    Int16(Vec<i16>),
    /// Unsigned 16-bit samples.
    UInt16(Vec<u16>),
    /// Signed 32-bit samples.
    Int32(Vec<i32>),
    /// Unsigned 32-bit samples.
    UInt32(Vec<u32>),
    /// Signed 64-bit samples.
    Int64(Vec<i64>),
    /// Unsigned 64-bit samples.
    UInt64(Vec<u64>),
    /// Single precision float samples.
    Float32(Vec<f32>),
    /// Double precision float samples.
    Float64(Vec<f64>),
}

impl TypedValues {
    /// The numeric kind of the samples.
    #[must_use]
    pub const fn kind(&self) -> NumericKind {
        match self {
            TypedValues::Int8(_) => NumericKind::Int8,
            TypedValues::UInt8(_) => NumericKind::UInt8,
            TypedValues::Int16(_) => NumericKind::Int16,
            TypedValues::UInt16(_) => NumericKind::UInt16,
            TypedValues::Int32(_) => NumericKind::Int32,
            TypedValues::UInt32(_) => NumericKind::UInt32,
            TypedValues::Int64(_) => NumericKind::Int64,
            TypedValues::UInt64(_) => NumericKind::UInt64,
            TypedValues::Float32(_) => NumericKind::Float32,
            TypedValues::Float64(_) => NumericKind::Float64,
        }
    }

    /// The number of values, components included.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            TypedValues::Int8(values) => values.len(),
            TypedValues::UInt8(values) => values.len(),
            TypedValues::Int16(values) => values.len(),
            TypedValues::UInt16(values) => values.len(),
            TypedValues::Int32(values) => values.len(),
            TypedValues::UInt32(values) => values.len(),
            TypedValues::Int64(values) => values.len(),
            TypedValues::UInt64(values) => values.len(),
            TypedValues::Float32(values) => values.len(),
            TypedValues::Float64(values) => values.len(),
        }
    }

    /// Returns true if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A converted output grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridData {
    /// The per-axis tuple counts.
    pub dims: [usize; 3],
    /// The number of components per tuple after expansion.
    pub num_components: usize,
    /// The typed values, x fastest, components interleaved.
    pub values: TypedValues,
}

impl GridData {
    /// The number of tuples (samples) in the grid.
    #[must_use]
    pub fn num_tuples(&self) -> usize {
        self.dims.iter().product()
    }
}

/// Adjust a requested box to the backend's indexing convention.
///
/// Under [`IndexOrigin::GhostLow`] the low bound is incremented and the
/// centering's high-side offset added on every axis; under
/// [`IndexOrigin::Padded`] the high bound shrinks by two on every axis,
/// compensating for the backend's one padding layer per side.
#[must_use]
pub fn query_box(requested: &GridBox, centering: Centering, layout: &DatasetLayout) -> GridBox {
    let mut low = requested.low();
    let mut high = requested.high();
    match layout.origin {
        IndexOrigin::GhostLow => {
            let offset = centering.node_offset();
            for d in 0..3 {
                low[d] += 1;
                high[d] += offset[d];
            }
        }
        IndexOrigin::Padded => {
            for d in 0..3 {
                high[d] -= 2;
            }
        }
    }
    GridBox::from_corners(low, high)
}

/// The per-axis tuple counts of a returned region.
///
/// For 2-D layouts the z tuple count is forced to one.
///
/// # Errors
/// Returns [`ConvertError::EmptyRegion`] if the region has a non-positive
/// extent on any counted axis.
pub fn tuple_counts(bounds: &GridBox, layout: &DatasetLayout) -> Result<[usize; 3], ConvertError> {
    let extents = bounds.extents();
    let mut dims = [0_usize; 3];
    for d in 0..3 {
        if d == 2 && layout.dimensionality == 2 {
            dims[2] = 1;
        } else if extents[d] > 0 {
            dims[d] = extents[d] as usize;
        } else {
            return Err(ConvertError::EmptyRegion(*bounds));
        }
    }
    Ok(dims)
}

/// Reverse the byte order of every `width`-byte word in `bytes`.
///
/// Applying the swap twice returns the original bytes. Trailing bytes that
/// do not fill a word are left untouched.
pub(crate) fn reverse_endianness(bytes: &mut [u8], width: usize) {
    match width {
        // single-byte kinds have no byte order
        1 => {}
        2 => {
            for chunk in bytes.chunks_exact_mut(2) {
                let word = u16::from_ne_bytes([chunk[0], chunk[1]]);
                chunk.copy_from_slice(&word.swap_bytes().to_ne_bytes());
            }
        }
        4 => {
            for chunk in bytes.chunks_exact_mut(4) {
                let word = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                chunk.copy_from_slice(&word.swap_bytes().to_ne_bytes());
            }
        }
        8 => {
            for chunk in bytes.chunks_exact_mut(8) {
                let word = u64::from_ne_bytes([
                    chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
                ]);
                chunk.copy_from_slice(&word.swap_bytes().to_ne_bytes());
            }
        }
        _ => {
            for chunk in bytes.chunks_exact_mut(width) {
                chunk.reverse();
            }
        }
    }
}

/// Convert the samples of one kind, expanding `src_components` interleaved
/// components per tuple to `dst_components`.
///
/// Copied components keep their order; destination components beyond the
/// source count stay zero-initialized.
fn convert_elements<T: bytemuck::Pod + Default>(
    kind: NumericKind,
    data: &[u8],
    num_tuples: usize,
    src_components: usize,
    dst_components: usize,
) -> Result<Vec<T>, ConvertError> {
    let expected = num_tuples * src_components * std::mem::size_of::<T>();
    if data.len() < expected {
        return Err(ConvertError::ShortBuffer {
            kind,
            got: data.len(),
            expected,
        });
    }
    let src: Vec<T> = bytemuck::pod_collect_to_vec(&data[..expected]);
    if src_components == dst_components {
        return Ok(src);
    }

    let copied = src_components.min(dst_components);
    let mut dst = vec![T::default(); num_tuples * dst_components];
    for tuple in 0..num_tuples {
        dst[tuple * dst_components..tuple * dst_components + copied]
            .copy_from_slice(&src[tuple * src_components..tuple * src_components + copied]);
    }
    Ok(dst)
}

macro_rules! typed_values_for_kind {
    ($kind:expr, $data:expr, $tuples:expr, $src:expr, $dst:expr; $($variant:ident => $ty:ty),* $(,)?) => {
        match $kind {
            $(NumericKind::$variant => TypedValues::$variant(convert_elements::<$ty>(
                $kind, $data, $tuples, $src, $dst,
            )?),)*
        }
    };
}

fn typed_values(
    kind: NumericKind,
    data: &[u8],
    num_tuples: usize,
    src_components: usize,
    dst_components: usize,
) -> Result<TypedValues, ConvertError> {
    Ok(typed_values_for_kind!(
        kind, data, num_tuples, src_components, dst_components;
        Int8 => i8,
        UInt8 => u8,
        Int16 => i16,
        UInt16 => u16,
        Int32 => i32,
        UInt32 => u32,
        Int64 => i64,
        UInt64 => u64,
        Float32 => f32,
        Float64 => f64,
    ))
}

/// Convert the raw bytes of a box read into a typed output grid.
///
/// The byte order is reversed only when the layout flags reversed endianness
/// AND the backend reports uncompressed data; compressed data is already in
/// native order in memory. Vector variables of layouts with dimensionality
/// below three expand to exactly three destination components per tuple.
///
/// # Errors
/// Returns [`ConvertError`] if the returned region is empty or the buffer is
/// shorter than the region requires.
pub fn convert(
    raw: RawGridBuffer,
    field: &FieldDescriptor,
    layout: &DatasetLayout,
    compressed: bool,
) -> Result<GridData, ConvertError> {
    let dims = tuple_counts(&raw.bounds, layout)?;
    let num_tuples = dims.iter().product();
    let src_components = raw.num_components.max(1);
    let dst_components = if field.vector && layout.dimensionality < 3 {
        3
    } else {
        src_components
    };

    let mut data = raw.data;
    if layout.reverse_endian && !compressed {
        reverse_endianness(&mut data, field.kind.size_of());
    }

    let values = typed_values(field.kind, &data, num_tuples, src_components, dst_components)?;
    Ok(GridData {
        dims,
        num_components: dst_components,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_field(kind: NumericKind) -> FieldDescriptor {
        FieldDescriptor {
            name: "scalar".to_string(),
            kind,
            centering: Centering::Cell,
            vector: false,
            num_components: 1,
        }
    }

    fn layout_3d() -> DatasetLayout {
        DatasetLayout {
            multi_box: false,
            origin: IndexOrigin::GhostLow,
            dimensionality: 3,
            reverse_endian: false,
        }
    }

    #[test]
    fn query_box_ghost_low() {
        let requested = GridBox::from_corners([-1, -1, -1], [10, 10, 10]);
        let layout = layout_3d();
        assert_eq!(
            query_box(&requested, Centering::Cell, &layout),
            GridBox::from_corners([0, 0, 0], [10, 10, 10])
        );
        assert_eq!(
            query_box(&requested, Centering::Node, &layout),
            GridBox::from_corners([0, 0, 0], [11, 11, 11])
        );
        assert_eq!(
            query_box(&requested, Centering::FaceY, &layout),
            GridBox::from_corners([0, 0, 0], [10, 11, 10])
        );
    }

    #[test]
    fn query_box_padded() {
        let mut layout = layout_3d();
        layout.origin = IndexOrigin::Padded;
        let requested = GridBox::from_corners([0, 0, 0], [11, 11, 11]);
        assert_eq!(
            query_box(&requested, Centering::Cell, &layout),
            GridBox::from_corners([0, 0, 0], [9, 9, 9])
        );
    }

    #[test]
    fn tuple_counts_force_flat_z_for_2d() {
        let bounds = GridBox::from_corners([0, 0, 0], [3, 3, 4]);
        assert_eq!(tuple_counts(&bounds, &layout_3d()).unwrap(), [4, 4, 5]);

        let mut layout = layout_3d();
        layout.dimensionality = 2;
        assert_eq!(tuple_counts(&bounds, &layout).unwrap(), [4, 4, 1]);
    }

    #[test]
    fn endian_swap_involution() {
        for width in [2, 4, 8] {
            let original: Vec<u8> = (0..48).collect();
            let mut swapped = original.clone();
            reverse_endianness(&mut swapped, width);
            assert_ne!(swapped, original);
            reverse_endianness(&mut swapped, width);
            assert_eq!(swapped, original);
        }

        let original: Vec<u8> = (0..4).collect();
        let mut bytes = original.clone();
        reverse_endianness(&mut bytes, 1);
        assert_eq!(bytes, original);
    }

    #[test]
    fn endian_swap_words() {
        let mut bytes = 0x0102_0304_u32.to_le_bytes().to_vec();
        reverse_endianness(&mut bytes, 4);
        assert_eq!(bytes, 0x0102_0304_u32.to_be_bytes());
    }

    #[test]
    fn scalar_float32_passthrough() {
        // A 4x4x1 float32 scalar on an uncompressed dataset without the
        // reverse endian flag comes through unmodified, in backend order.
        let values: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let raw = RawGridBuffer {
            bounds: GridBox::from_extents([4, 4, 1]),
            num_components: 1,
            data: values.iter().flat_map(|v| v.to_ne_bytes()).collect(),
        };
        let grid = convert(
            raw,
            &scalar_field(NumericKind::Float32),
            &layout_3d(),
            false,
        )
        .unwrap();
        assert_eq!(grid.dims, [4, 4, 1]);
        assert_eq!(grid.num_tuples(), 16);
        assert_eq!(grid.num_components, 1);
        assert_eq!(grid.values, TypedValues::Float32(values));
    }

    #[test]
    fn vector_expansion_zero_fills_third_component() {
        let mut layout = layout_3d();
        layout.dimensionality = 2;
        let field = FieldDescriptor {
            name: "velocity".to_string(),
            kind: NumericKind::Float64,
            centering: Centering::Cell,
            vector: true,
            num_components: 2,
        };
        let num_tuples = 9;
        let samples: Vec<f64> = (0..num_tuples * 2).map(|i| i as f64 + 1.0).collect();
        let raw = RawGridBuffer {
            bounds: GridBox::from_corners([0, 0, 0], [2, 2, 0]),
            num_components: 2,
            data: samples.iter().flat_map(|v| v.to_ne_bytes()).collect(),
        };
        let grid = convert(raw, &field, &layout, false).unwrap();
        assert_eq!(grid.num_components, 3);
        let TypedValues::Float64(values) = grid.values else {
            panic!("expected float64 values");
        };
        assert_eq!(values.len(), num_tuples * 3);
        for tuple in 0..num_tuples {
            assert_eq!(values[tuple * 3], samples[tuple * 2]);
            assert_eq!(values[tuple * 3 + 1], samples[tuple * 2 + 1]);
            assert_eq!(values[tuple * 3 + 2], 0.0);
        }
    }

    #[test]
    fn reverse_endian_swaps_uncompressed_only() {
        let mut layout = layout_3d();
        layout.reverse_endian = true;
        let raw = RawGridBuffer {
            bounds: GridBox::from_extents([2, 1, 1]),
            num_components: 1,
            data: vec![
                0x11, 0x22, 0x33, 0x44, //
                0x55, 0x66, 0x77, 0x88,
            ],
        };

        let swapped = convert(
            raw.clone(),
            &scalar_field(NumericKind::UInt32),
            &layout,
            false,
        )
        .unwrap();
        assert_eq!(
            swapped.values,
            TypedValues::UInt32(vec![
                u32::from_ne_bytes([0x44, 0x33, 0x22, 0x11]),
                u32::from_ne_bytes([0x88, 0x77, 0x66, 0x55]),
            ])
        );

        // compressed data is already in native order and must not be swapped
        let compressed = convert(raw, &scalar_field(NumericKind::UInt32), &layout, true).unwrap();
        assert_eq!(
            compressed.values,
            TypedValues::UInt32(vec![
                u32::from_ne_bytes([0x11, 0x22, 0x33, 0x44]),
                u32::from_ne_bytes([0x55, 0x66, 0x77, 0x88]),
            ])
        );
    }

    #[test]
    fn short_buffer_is_an_error() {
        let raw = RawGridBuffer {
            bounds: GridBox::from_extents([4, 4, 1]),
            num_components: 1,
            data: vec![0; 8],
        };
        assert!(matches!(
            convert(raw, &scalar_field(NumericKind::Float32), &layout_3d(), false),
            Err(ConvertError::ShortBuffer { expected: 64, .. })
        ));
    }

    #[test]
    fn every_kind_converts_identically() {
        // the ten kinds share one generic routine; spot-check widths and
        // values across the integer kinds
        let data: Vec<u8> = (0..16).collect();
        for kind in NumericKind::ALL {
            let num_tuples = 16 / kind.size_of();
            let values = typed_values(kind, &data, num_tuples, 1, 1).unwrap();
            assert_eq!(values.kind(), kind);
            assert_eq!(values.len(), num_tuples);
        }
        let values = typed_values(NumericKind::UInt16, &[0x01, 0x02, 0x03, 0x04], 2, 1, 1).unwrap();
        assert_eq!(
            values,
            TypedValues::UInt16(vec![
                u16::from_ne_bytes([0x01, 0x02]),
                u16::from_ne_bytes([0x03, 0x04]),
            ])
        );
    }
}
