//! Area opening regression test
//!
//! Checks peak survival on a hand-built profile for a range of area
//! thresholds, and structural properties of the surviving peaks on smooth
//! landscapes.
//!
//! Run with:
//! ```
//! cargo test -p floodlab-region --test area_opening_reg
//! ```

use floodlab_core::Grid;
use floodlab_region::{AreaOpeningOptions, ConnectivityType, label_area_opening, offsets_for};
use floodlab_test::{RegParams, labels_connected, sinusoid_landscape};

/// Four isolated peaks separated by zeros:
/// a stepped peak of area 4, a plateau of 5, a single spike, and a
/// symmetric ramp of 5
fn peak_profile() -> Grid<u8> {
    let values = vec![
        0u8, 3, 3, 7, 3, 0, 5, 5, 5, 5, 5, 0, 9, 0, 2, 4, 6, 4, 2, 0,
    ];
    Grid::from_data(&[values.len()], values).unwrap()
}

#[test]
fn area_opening_reg() {
    let mut rp = RegParams::new("area_opening");

    // --- Small plateau suppressed ---
    let levels = vec![1u8, 1, 1, 5, 5, 1, 1, 1, 9, 9, 9, 9, 1];
    let grid = Grid::from_data(&[levels.len()], levels).unwrap();
    let options = AreaOpeningOptions::new().with_area_threshold(3);
    let labeling = label_area_opening(&grid, &options).unwrap();
    rp.compare_values(1.0, labeling.count as f64, 0.0); // 1
    rp.compare_grids(
        &Grid::from_data(&[13], vec![0u32, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0]).unwrap(),
        &labeling.labels,
    ); // 2

    // --- Survivor counts on the peak profile ---
    let grid = peak_profile();
    let expected = [4u32, 3, 3, 3, 2, 0, 0];
    let mut previous = u32::MAX;
    for (i, &want) in expected.iter().enumerate() {
        let threshold = i + 1;
        let options = AreaOpeningOptions::new().with_area_threshold(threshold);
        let labeling = label_area_opening(&grid, &options).unwrap();
        eprintln!("area >= {}: {} peaks", threshold, labeling.count);
        rp.compare_values(want as f64, labeling.count as f64, 0.0);
        rp.check(labeling.count <= previous, "raising the area never adds peaks");
        rp.check(
            labeling.component_sizes().iter().all(|&s| s >= threshold),
            "surviving peaks reach the area threshold",
        );
        previous = labeling.count;
    }

    // At threshold 2 the stepped peak swallows its spike and the ramp
    // keeps its top three samples
    let labeling =
        label_area_opening(&grid, &AreaOpeningOptions::new().with_area_threshold(2)).unwrap();
    rp.show("area >= 2", &labeling.labels);
    rp.compare_grids(
        &Grid::from_data(
            &[20],
            vec![0u32, 1, 1, 1, 1, 0, 2, 2, 2, 2, 2, 0, 0, 0, 0, 3, 3, 3, 0, 0],
        )
        .unwrap(),
        &labeling.labels,
    );

    // --- Smooth landscapes ---
    for variant in 0..2 {
        let grid = sinusoid_landscape(100, 80, variant).unwrap();
        for conn in [ConnectivityType::Face, ConnectivityType::Full] {
            let options = AreaOpeningOptions::new()
                .with_area_threshold(50)
                .with_floor(120.0)
                .with_connectivity(conn);
            let labeling = label_area_opening(&grid, &options).unwrap();
            eprintln!("variant {} {:?}: {} peaks", variant, conn, labeling.count);
            let offsets = offsets_for(2, conn).unwrap();
            rp.check(
                labels_connected(&labeling.labels, labeling.count, &offsets),
                "peaks are connected",
            );
            rp.check(
                labeling
                    .labels
                    .data()
                    .iter()
                    .zip(grid.data())
                    .all(|(&l, &v)| l == 0 || v > 120),
                "peaks lie above the floor",
            );
            rp.check(
                labeling.component_sizes().iter().all(|&s| s >= 50),
                "peaks reach the area threshold",
            );
        }
    }

    assert!(rp.cleanup(), "area opening regression test failed");
}

#[test]
fn area_opening_degenerate_inputs() {
    let grid = peak_profile();
    let zero = AreaOpeningOptions::new().with_area_threshold(0);
    assert_eq!(label_area_opening(&grid, &zero).unwrap().count, 0);

    let high_floor = AreaOpeningOptions::new().with_floor(9.0);
    let labeling = label_area_opening(&grid, &high_floor).unwrap();
    assert_eq!(labeling.count, 0);
    assert!(labeling.labels.data().iter().all(|&l| l == 0));

    let empty = Grid::new(&[3, 0, 2], 1.0f64).unwrap();
    assert_eq!(
        label_area_opening(&empty, &AreaOpeningOptions::new())
            .unwrap()
            .count,
        0
    );
}

#[test]
fn area_opening_deterministic() {
    let grid = sinusoid_landscape(64, 64, 0).unwrap();
    let options = AreaOpeningOptions::new()
        .with_area_threshold(20)
        .with_floor(100.0);
    let first = label_area_opening(&grid, &options).unwrap();
    let second = label_area_opening(&grid, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn area_opening_wide_levels_match_narrow() {
    let grid = sinusoid_landscape(100, 80, 1).unwrap();
    let wide = grid.map(|v| v as i64 * 1_000_003);
    for threshold in [1, 20, 200] {
        let options = AreaOpeningOptions::new()
            .with_area_threshold(threshold)
            .with_floor(120.0);
        let narrow = label_area_opening(&grid, &options).unwrap();
        let stretched =
            label_area_opening(&wide, &options.with_floor(120.0 * 1_000_003.0)).unwrap();
        assert_eq!(stretched, narrow, "threshold {}", threshold);
    }
}
