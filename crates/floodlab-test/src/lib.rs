//! floodlab-test - Regression test framework for floodlab
//!
//! This crate provides the regression harness used by the floodlab test
//! suites together with deterministic synthetic inputs:
//!
//! - [`RegParams`] - numbered value and grid comparisons with a final report
//! - [`grid_from_rows`] - build small 2-D grids from literal rows
//! - [`random_grid`] / [`random_seeds`] - seeded pseudo-random inputs
//! - [`sinusoid_landscape`] - smooth multi-basin 2-D landscapes
//! - [`labels_connected`] - connectivity check for label grids
//!
//! # Usage
//!
//! ```ignore
//! use floodlab_test::RegParams;
//!
//! let mut rp = RegParams::new("conncomp");
//! rp.compare_values(2.0, labeling.count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use floodlab_core::{Grid, LabelGrid};
use rand::prelude::*;
use std::collections::VecDeque;

/// Build a 2-D grid from rows given top to bottom
///
/// Row `y`, column `x` becomes the sample at coordinate `[x, y]`.
pub fn grid_from_rows<T: Copy>(rows: &[&[T]]) -> TestResult<Grid<T>> {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    if rows.iter().any(|r| r.len() != width) {
        return Err(TestError::InvalidParameters(
            "all rows must have the same length".to_string(),
        ));
    }
    let data: Vec<T> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    Ok(Grid::from_data(&[width, height], data)?)
}

/// Generate a grid of uniformly distributed samples in `0..=max`
///
/// The same `seed` always produces the same grid.
pub fn random_grid(dims: &[usize], max: u8, seed: u64) -> TestResult<Grid<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::new(dims, 0u8)?;
    for v in grid.data_mut() {
        *v = rng.random_range(0..=max);
    }
    Ok(grid)
}

/// Place labels `1..=count` at distinct pseudo-random positions
pub fn random_seeds(dims: &[usize], count: u32, seed: u64) -> TestResult<LabelGrid> {
    let mut seeds = Grid::new(dims, 0u32)?;
    if count as usize > seeds.len() {
        return Err(TestError::InvalidParameters(format!(
            "cannot place {} seeds in {} samples",
            count,
            seeds.len()
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut label = 1u32;
    while label <= count {
        let index = rng.random_range(0..seeds.len());
        if seeds.data()[index] == 0 {
            seeds.data_mut()[index] = label;
            label += 1;
        }
    }
    Ok(seeds)
}

/// Smooth 8-bit landscape made of crossed sine and cosine waves
///
/// `variant` 0 produces short wavelengths (many basins), any other value
/// produces long wavelengths (few basins).
pub fn sinusoid_landscape(width: usize, height: usize, variant: u32) -> TestResult<Grid<u8>> {
    let mut grid = Grid::new(&[width, height], 0u8)?;
    for i in 0..height {
        for j in 0..width {
            let fi = i as f32;
            let fj = j as f32;
            let f = if variant == 0 {
                128.0
                    + 26.3 * (0.0438 * fi).sin()
                    + 33.4 * (0.0712 * fi).cos()
                    + 18.6 * (0.0561 * fj).sin()
                    + 23.6 * (0.0327 * fj).cos()
            } else {
                128.0
                    + 26.3 * (0.0238 * fi).sin()
                    + 33.4 * (0.0312 * fi).cos()
                    + 18.6 * (0.0261 * fj).sin()
                    + 23.6 * (0.0207 * fj).cos()
            };
            grid.data_mut()[i * width + j] = f.clamp(0.0, 255.0) as u8;
        }
    }
    Ok(grid)
}

/// Check that every label `1..=count` occupies one connected region
///
/// Adjacency is given as coordinate offsets, e.g. from
/// `floodlab_region::offsets_for`. A label with no samples counts as
/// connected.
pub fn labels_connected(labels: &LabelGrid, count: u32, offsets: &[Vec<isize>]) -> bool {
    let shape = labels.shape();
    let data = labels.data();
    let mut totals = vec![0usize; count as usize + 1];
    for &l in data {
        if l > count {
            return false;
        }
        totals[l as usize] += 1;
    }

    let mut seen = vec![false; data.len()];
    let mut reached = vec![0usize; count as usize + 1];
    let mut queue = VecDeque::new();
    let mut next = vec![0usize; shape.ndim()];

    for start in 0..data.len() {
        let label = data[start];
        if label == 0 || seen[start] {
            continue;
        }
        // A second region of a label already flooded
        if reached[label as usize] > 0 {
            return false;
        }
        seen[start] = true;
        queue.push_back(start);
        while let Some(i) = queue.pop_front() {
            reached[label as usize] += 1;
            let Some(coord) = shape.coord_of(i) else {
                continue;
            };
            for offset in offsets {
                let mut inside = true;
                for d in 0..coord.len() {
                    let c = coord[d] as isize + offset[d];
                    if c < 0 || c >= shape.dims()[d] as isize {
                        inside = false;
                        break;
                    }
                    next[d] = c as usize;
                }
                if !inside {
                    continue;
                }
                let Some(j) = shape.index_of(&next) else {
                    continue;
                };
                if !seen[j] && data[j] == label {
                    seen[j] = true;
                    queue.push_back(j);
                }
            }
        }
    }

    (1..=count as usize).all(|l| reached[l] == totals[l])
}
