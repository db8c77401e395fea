//! End-to-end dataset tests against the in-memory backend.

use std::path::Path;

use amrgrid::{
    Dataset, DatasetOptions, GridBox, MemoryBackend, RawGridBuffer, TypedValues,
};
use amrgrid_metadata::{Centering, DatasetLayout, FieldDescriptor, IndexOrigin, NumericKind};

fn scalar_field(name: &str, kind: NumericKind) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        kind,
        centering: Centering::Cell,
        vector: false,
        num_components: 1,
    }
}

fn float32_buffer(extents: [i64; 3], num_components: usize) -> RawGridBuffer {
    let num_values = (extents[0] * extents[1] * extents[2]) as usize * num_components;
    let values: Vec<f32> = (0..num_values).map(|i| i as f32).collect();
    RawGridBuffer {
        bounds: GridBox::from_extents(extents),
        num_components,
        data: values.iter().flat_map(|v| v.to_ne_bytes()).collect(),
    }
}

#[test]
fn single_box_dataset_decomposes_into_octants() {
    let mut backend = MemoryBackend::new([10, 10, 10]);
    backend.add_field(
        scalar_field("density", NumericKind::Float32),
        vec![float32_buffer([10, 10, 10], 1)],
    );

    let dataset = Dataset::open(
        backend,
        Path::new("in-memory"),
        DatasetLayout::default(),
        None,
        DatasetOptions::default().with_workers(8),
    )
    .unwrap();

    // a 10x10x10 box for 8 workers splits on a (2, 2, 2) block grid into
    // eight 5x5x5 octants tiling the box exactly
    assert_eq!(dataset.num_patches(), 8);
    let mut cells = 0;
    for patch in 0..8 {
        let bounds = dataset
            .patch_bounds(patch, Centering::Cell, false)
            .unwrap();
        assert_eq!(bounds.extents(), [5, 5, 5]);
        cells += bounds.num_cells();
        for other in patch + 1..8 {
            let other = dataset
                .patch_bounds(other, Centering::Cell, false)
                .unwrap();
            assert!(!bounds.intersects(&other));
        }
    }
    assert_eq!(cells, 1000);
    assert_eq!(
        dataset.global_bounds(Centering::Cell, false).unwrap(),
        GridBox::from_extents([10, 10, 10])
    );

    // each of the eight ranks owns exactly one patch, in index order
    for rank in 0..8 {
        let owned = dataset.patches_for_rank(rank);
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].rank(), Some(rank));
    }
}

#[test]
fn scalar_read_returns_backend_order() {
    let mut backend = MemoryBackend::new([4, 4, 1]);
    backend.add_field(
        scalar_field("pressure", NumericKind::Float32),
        vec![float32_buffer([4, 4, 1], 1)],
    );

    let dataset = Dataset::open(
        backend,
        Path::new("in-memory"),
        DatasetLayout::default(),
        None,
        DatasetOptions::default(),
    )
    .unwrap();

    // uncompressed, reverse_endian unset: 16 float32 values come through
    // unmodified in backend order
    let grid = dataset.read_variable(0, 0, "pressure").unwrap().unwrap();
    assert_eq!(grid.dims, [4, 4, 1]);
    assert_eq!(grid.num_components, 1);
    let TypedValues::Float32(values) = grid.values else {
        panic!("expected float32 values");
    };
    assert_eq!(values, (0..16).map(|i| i as f32).collect::<Vec<_>>());
}

#[test]
fn missing_queries_return_no_data() {
    let mut backend = MemoryBackend::new([4, 4, 4]);
    backend.add_field(
        scalar_field("density", NumericKind::Float32),
        vec![float32_buffer([4, 4, 4], 1)],
    );

    let dataset = Dataset::open(
        backend,
        Path::new("in-memory"),
        DatasetLayout::default(),
        None,
        DatasetOptions::default(),
    )
    .unwrap();

    assert!(dataset.read_variable(0, 0, "vorticity").unwrap().is_none());
    assert!(dataset.read_variable(9, 0, "density").unwrap().is_none());
    assert!(dataset.read_variable(0, 99, "density").unwrap().is_none());
    // a failed query leaves other queries untouched
    assert!(dataset.read_variable(0, 0, "density").unwrap().is_some());
}

#[test]
fn multi_box_dataset_reconciles_seams() {
    let description: amrgrid_metadata::LevelDescription = serde_json::from_str(
        r#"{
            "boxes": [
                {"low": [0, 0, 0], "high": [10, 9, 9]},
                {"low": [10, 0, 0], "high": [20, 9, 9]}
            ]
        }"#,
    )
    .unwrap();
    let layout = DatasetLayout {
        multi_box: true,
        origin: IndexOrigin::GhostLow,
        dimensionality: 3,
        reverse_endian: false,
    };

    let mut backend = MemoryBackend::new([21, 10, 10]);
    backend.add_field(
        scalar_field("density", NumericKind::Float64),
        vec![
            RawGridBuffer {
                bounds: GridBox::from_extents([21, 10, 10]),
                num_components: 1,
                data: vec![0; 21 * 10 * 10 * 8],
            },
            RawGridBuffer {
                bounds: GridBox::from_extents([21, 10, 10]),
                num_components: 1,
                data: vec![0; 21 * 10 * 10 * 8],
            },
        ],
    );

    let dataset = Dataset::open(
        backend,
        Path::new("in-memory"),
        layout,
        Some(&description),
        DatasetOptions::default().with_workers(4),
    )
    .unwrap();

    // two input boxes sharing the x = 10 cell layer split into four patches
    // with the shared layer counted once
    assert_eq!(dataset.num_patches(), 4);
    assert_eq!(dataset.timesteps().len(), 2);
    let bounds = (0..4)
        .map(|patch| dataset.patch_bounds(patch, Centering::Cell, false).unwrap())
        .collect::<Vec<_>>();
    let mut cells = 0;
    for (i, a) in bounds.iter().enumerate() {
        cells += a.num_cells();
        for b in bounds.iter().skip(i + 1) {
            assert!(!a.intersects(b));
        }
    }
    // 21 x 10 x 10 cells in total, none double-counted
    assert_eq!(cells, 2100);
}

#[test]
fn multi_box_layout_requires_a_description() {
    let layout = DatasetLayout {
        multi_box: true,
        origin: IndexOrigin::GhostLow,
        dimensionality: 3,
        reverse_endian: false,
    };
    let result = Dataset::open(
        MemoryBackend::new([8, 8, 8]),
        Path::new("in-memory"),
        layout,
        None,
        DatasetOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn vector_variable_expands_to_three_components() {
    let layout = DatasetLayout {
        multi_box: false,
        origin: IndexOrigin::Padded,
        dimensionality: 2,
        reverse_endian: false,
    };
    let mut backend = MemoryBackend::new([4, 4, 1]);
    backend.add_field(
        FieldDescriptor {
            name: "velocity".to_string(),
            kind: NumericKind::Float32,
            centering: Centering::Cell,
            vector: true,
            num_components: 2,
        },
        vec![float32_buffer([4, 4, 1], 2)],
    );

    let dataset = Dataset::open(
        backend,
        Path::new("in-memory"),
        layout,
        None,
        DatasetOptions::default(),
    )
    .unwrap();

    let grid = dataset.read_variable(0, 0, "velocity").unwrap().unwrap();
    assert_eq!(grid.num_components, 3);
    assert_eq!(grid.num_tuples(), 16);
    let TypedValues::Float32(values) = grid.values else {
        panic!("expected float32 values");
    };
    assert_eq!(values.len(), 48);
    for tuple in 0..16 {
        assert_eq!(values[tuple * 3], (tuple * 2) as f32);
        assert_eq!(values[tuple * 3 + 1], (tuple * 2 + 1) as f32);
        assert_eq!(values[tuple * 3 + 2], 0.0);
    }
}
