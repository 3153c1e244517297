//! Threshold-based connected component labeling
//!
//! Samples strictly above a threshold are foreground. One raster sweep
//! registers each foreground sample in a [`DisjointSet`] and merges it with
//! the foreground neighbors that precede it in raster order; a second pass
//! flattens the forest and numbers the components.

use crate::connectivity::{ConnectivityType, Neighborhood};
use crate::error::RegionResult;
use crate::label::Labeling;
use crate::union_find::DisjointSet;
use floodlab_core::{Grid, Sample};

/// Options for threshold labeling
#[derive(Debug, Clone)]
pub struct ThresholdOptions {
    /// Samples strictly greater than this are foreground
    pub threshold: f64,
    /// Connectivity type for finding neighbors
    pub connectivity: ConnectivityType,
}

impl Default for ThresholdOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            connectivity: ConnectivityType::Face,
        }
    }
}

impl ThresholdOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Label the connected components of samples above a threshold
///
/// Components are numbered `1..=K` in raster order of their first sample;
/// background samples get 0.
///
/// # Examples
///
/// ```
/// use floodlab_core::Grid;
/// use floodlab_region::{ThresholdOptions, label_connected_components};
///
/// let grid = Grid::from_data(&[10], vec![0u8, 0, 5, 5, 5, 0, 0, 5, 5, 0]).unwrap();
/// let labeling = label_connected_components(&grid, &ThresholdOptions::new()).unwrap();
/// assert_eq!(labeling.count, 2);
/// assert_eq!(labeling.labels.data(), &[0, 0, 1, 1, 1, 0, 0, 2, 2, 0]);
/// ```
pub fn label_connected_components<T: Sample>(
    grid: &Grid<T>,
    options: &ThresholdOptions,
) -> RegionResult<Labeling> {
    let shape = grid.shape();
    if grid.is_empty() {
        return Ok(Labeling::empty(shape));
    }

    let data = grid.data();
    let threshold = options.threshold;
    let nb = Neighborhood::new(shape, options.connectivity)?;
    let preceding = nb.preceding();
    let mut forest = DisjointSet::new(data.len());
    let mut coord = vec![0usize; shape.ndim()];

    for (p, &value) in data.iter().enumerate() {
        if value.to_f64() > threshold {
            forest.make_set(p);
            for &k in &preceding {
                let Some(q) = nb.neighbor(&coord, p, k) else {
                    continue;
                };
                // Registered means above threshold and already swept
                if forest.contains(q) {
                    let r = forest.find(q);
                    let root = forest.find(p);
                    if r != root {
                        forest.attach(r, root);
                    }
                }
            }
        }
        shape.advance(&mut coord);
    }

    forest.flatten(0..data.len());
    let labeling = Labeling::from_forest(shape, &forest, |_| true)?;

    log::debug!(
        "threshold labeling: {} samples above {}, {} components",
        labeling.labels.data().iter().filter(|&&l| l > 0).count(),
        threshold,
        labeling.count
    );
    Ok(labeling)
}

/// Count the connected components of samples above a threshold
pub fn count_components<T: Sample>(
    grid: &Grid<T>,
    options: &ThresholdOptions,
) -> RegionResult<u32> {
    label_connected_components(grid, options).map(|labeling| labeling.count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2d(width: usize, rows: &[&[u8]]) -> Grid<u8> {
        let data: Vec<u8> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Grid::from_data(&[width, rows.len()], data).unwrap()
    }

    #[test]
    fn test_threshold_1d() {
        let grid = Grid::from_data(&[10], vec![0u8, 0, 5, 5, 5, 0, 0, 5, 5, 0]).unwrap();
        let labeling = label_connected_components(&grid, &ThresholdOptions::new()).unwrap();
        assert_eq!(labeling.count, 2);
        assert_eq!(labeling.labels.data(), &[0, 0, 1, 1, 1, 0, 0, 2, 2, 0]);
    }

    #[test]
    fn test_diagonal_connectivity() {
        // Two pixels touching only at a corner
        let grid = grid_2d(3, &[&[1, 0, 0], &[0, 1, 0], &[0, 0, 0]]);

        let face = label_connected_components(&grid, &ThresholdOptions::new()).unwrap();
        assert_eq!(face.count, 2);

        let full = label_connected_components(
            &grid,
            &ThresholdOptions::new().with_connectivity(ConnectivityType::Full),
        )
        .unwrap();
        assert_eq!(full.count, 1);
    }

    #[test]
    fn test_u_shape_merges() {
        // Both arms are labeled before the bottom row joins them
        let grid = grid_2d(
            5,
            &[
                &[1, 0, 0, 0, 1],
                &[1, 0, 0, 0, 1],
                &[1, 1, 1, 1, 1],
            ],
        );
        let labeling = label_connected_components(&grid, &ThresholdOptions::new()).unwrap();
        assert_eq!(labeling.count, 1);
        assert_eq!(labeling.label_at(&[4, 0]), Some(1));
        assert_eq!(labeling.label_at(&[2, 0]), Some(0));
    }

    #[test]
    fn test_uniform_below_threshold() {
        let grid = Grid::new(&[4, 4], 3u8).unwrap();
        let options = ThresholdOptions::new().with_threshold(3.0);
        let labeling = label_connected_components(&grid, &options).unwrap();
        assert_eq!(labeling.count, 0);
        assert!(labeling.labels.data().iter().all(|&l| l == 0));
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::new(&[0, 5], 1u8).unwrap();
        assert_eq!(count_components(&grid, &ThresholdOptions::new()).unwrap(), 0);
    }

    #[test]
    fn test_3d_face_components() {
        // Two voxels stacked along axis 2 form one face-connected component
        let mut grid = Grid::new(&[2, 2, 2], 0.0f32).unwrap();
        grid.set(&[0, 0, 0], 1.0).unwrap();
        grid.set(&[0, 0, 1], 1.0).unwrap();
        grid.set(&[1, 1, 1], 1.0).unwrap();
        let labeling = label_connected_components(&grid, &ThresholdOptions::new()).unwrap();
        assert_eq!(labeling.count, 2);
        assert_eq!(labeling.label_at(&[0, 0, 1]), labeling.label_at(&[0, 0, 0]));
    }
}
