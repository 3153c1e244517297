//! Threshold labeling regression test
//!
//! Checks component counts on literal and pseudo-random grids, that every
//! component is connected and maximal, and that relabeling a label grid
//! reproduces it.
//!
//! Run with:
//! ```
//! cargo test -p floodlab-region --test conncomp_reg
//! ```

use floodlab_core::Grid;
use floodlab_region::{
    ConnectivityType, Neighborhood, ThresholdOptions, count_components,
    label_connected_components, offsets_for,
};
use floodlab_test::{RegParams, grid_from_rows, labels_connected, random_grid};

/// True if no two adjacent foreground samples carry different labels
fn components_are_maximal(grid: &Grid<u8>, labels: &Grid<u32>, conn: ConnectivityType) -> bool {
    let shape = grid.shape();
    let nb = Neighborhood::new(shape, conn).unwrap();
    let mut coord = vec![0usize; shape.ndim()];
    for p in 0..grid.len() {
        shape.coord_into(p, &mut coord);
        let lp = labels.data()[p];
        if (grid.data()[p] > 0) != (lp > 0) {
            return false;
        }
        for q in nb.neighbors(&coord, p) {
            if lp > 0 && grid.data()[q] > 0 && labels.data()[q] != lp {
                return false;
            }
        }
    }
    true
}

#[test]
fn conncomp_reg() {
    let mut rp = RegParams::new("conncomp");

    // --- 1-D literal grid ---
    let grid = Grid::from_data(&[10], vec![0u8, 0, 5, 5, 5, 0, 0, 5, 5, 0]).unwrap();
    let labeling = label_connected_components(&grid, &ThresholdOptions::new()).unwrap();
    let expected = Grid::from_data(&[10], vec![0u32, 0, 1, 1, 1, 0, 0, 2, 2, 0]).unwrap();
    rp.compare_values(2.0, labeling.count as f64, 0.0); // 1
    rp.compare_grids(&expected, &labeling.labels); // 2

    // --- 2-D literal grid: face vs full ---
    let grid = grid_from_rows(&[
        &[1u8, 1, 0, 0, 1],
        &[0, 1, 0, 1, 0],
        &[0, 0, 0, 0, 0],
        &[1, 0, 1, 1, 1],
    ])
    .unwrap();
    let face = label_connected_components(&grid, &ThresholdOptions::new()).unwrap();
    let full = label_connected_components(
        &grid,
        &ThresholdOptions::new().with_connectivity(ConnectivityType::Full),
    )
    .unwrap();
    rp.show("face labels", &face.labels);
    rp.compare_values(5.0, face.count as f64, 0.0); // 3
    rp.compare_values(4.0, full.count as f64, 0.0); // 4
    rp.compare_values(3.0, face.component_sizes()[0] as f64, 0.0); // 5

    // --- Pseudo-random grids ---
    for (i, dims) in [vec![64usize, 48], vec![16, 12, 9]].iter().enumerate() {
        let grid = random_grid(dims, 3, 100 + i as u64).unwrap();
        for conn in [ConnectivityType::Face, ConnectivityType::Full] {
            let options = ThresholdOptions::new()
                .with_threshold(1.0)
                .with_connectivity(conn);
            let labeling = label_connected_components(&grid, &options).unwrap();
            let foreground = grid.map(|v| if v > 1 { 1u8 } else { 0 });

            let offsets = offsets_for(dims.len(), conn).unwrap();
            rp.check(
                labels_connected(&labeling.labels, labeling.count, &offsets),
                "every component is connected",
            );
            rp.check(
                components_are_maximal(&foreground, &labeling.labels, conn),
                "no component touches another",
            );
            rp.check(
                labeling.component_sizes().iter().all(|&s| s > 0),
                "labels are dense",
            );
        }

        let face = count_components(&grid, &ThresholdOptions::new().with_threshold(1.0)).unwrap();
        let full = count_components(
            &grid,
            &ThresholdOptions::new()
                .with_threshold(1.0)
                .with_connectivity(ConnectivityType::Full),
        )
        .unwrap();
        eprintln!("{:?}: face = {}, full = {}", dims, face, full);
        rp.check(full <= face, "full connectivity merges face components");
    }

    assert!(rp.cleanup(), "conncomp regression test failed");
}

#[test]
fn conncomp_deterministic() {
    let grid = random_grid(&[40, 40], 4, 9).unwrap();
    let options = ThresholdOptions::new().with_threshold(2.0);
    let first = label_connected_components(&grid, &options).unwrap();
    let second = label_connected_components(&grid, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn conncomp_relabel_is_identity() {
    // Labels are issued in raster order, so labeling a label grid with
    // threshold 0 reproduces it exactly
    let grid = random_grid(&[30, 20], 2, 77).unwrap();
    let options = ThresholdOptions::new().with_threshold(1.0);
    let first = label_connected_components(&grid, &options).unwrap();
    let second =
        label_connected_components(&first.labels, &ThresholdOptions::new()).unwrap();
    assert_eq!(second.count, first.count);
    assert_eq!(second.labels, first.labels);
}

#[test]
fn conncomp_empty_and_uniform() {
    let empty = Grid::new(&[0, 4], 9u8).unwrap();
    let labeling = label_connected_components(&empty, &ThresholdOptions::new()).unwrap();
    assert_eq!(labeling.count, 0);
    assert!(labeling.labels.is_empty());

    let uniform = Grid::new(&[5, 5], 2u16).unwrap();
    let options = ThresholdOptions::new().with_threshold(2.0);
    assert_eq!(count_components(&uniform, &options).unwrap(), 0);
}
