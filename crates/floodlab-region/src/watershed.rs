//! Seeded watershed transform
//!
//! The intensity grid is treated as a topographic surface that is flooded
//! from labeled seed samples. A [`BucketQueue`] always releases the lowest
//! flood level first, and a sample is never flooded below the level the
//! front has already reached, so plateaus fill outward in FIFO order.
//!
//! Where the labels live during flooding is abstracted by [`FloodStore`]:
//!
//! - [`LabelBuffer`] keeps labels in a separate buffer (the default)
//! - [`InPlaceStore`] reuses an `i32` intensity buffer, marking assigned
//!   samples by their sign bit
//!
//! Both stores run through the same [`flood`] loop and produce identical
//! labels.

use crate::connectivity::{ConnectivityType, Neighborhood};
use crate::error::{RegionError, RegionResult};
use crate::extrema::label_local_minima;
use crate::label::Labeling;
use crate::ordering::{BucketQueue, EXCLUDED_LEVEL, FloodOrder};
use floodlab_core::{Grid, LabelGrid, Sample, Shape};

/// Options for watershed flooding
#[derive(Debug, Clone)]
pub struct WatershedOptions {
    /// Samples below this intensity are never flooded
    pub floor: Option<f64>,
    /// Connectivity type for finding neighbors
    pub connectivity: ConnectivityType,
}

impl Default for WatershedOptions {
    fn default() -> Self {
        Self {
            floor: None,
            connectivity: ConnectivityType::Full,
        }
    }
}

impl WatershedOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the intensity floor
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Storage for intensities and labels during flooding
pub trait FloodStore {
    /// Number of samples
    fn len(&self) -> usize;

    /// True if the store has no samples
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Intensity level of an unassigned sample ([`EXCLUDED_LEVEL`] if it has none)
    fn level(&self, index: usize) -> i64;

    /// True if the sample is unassigned and at or above the floor
    fn is_open(&self, index: usize) -> bool;

    /// Label of the sample (0 while unassigned)
    fn label(&self, index: usize) -> u32;

    /// Give the sample a label; it is never open afterwards
    fn assign(&mut self, index: usize, label: u32);
}

fn above_floor(value: f64, floor: Option<f64>) -> bool {
    !value.is_nan() && floor.is_none_or(|f| value >= f)
}

/// Separate label buffer over borrowed intensities
#[derive(Debug)]
pub struct LabelBuffer<'a, T> {
    data: &'a [T],
    labels: Vec<u32>,
    floor: Option<f64>,
}

impl<'a, T: Sample> LabelBuffer<'a, T> {
    /// Create an all-unassigned buffer for `data`
    pub fn new(data: &'a [T], floor: Option<f64>) -> Self {
        LabelBuffer {
            data,
            labels: vec![0; data.len()],
            floor,
        }
    }

    /// Consume the store and return the labels
    pub fn into_labels(self) -> Vec<u32> {
        self.labels
    }
}

impl<T: Sample> FloodStore for LabelBuffer<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn level(&self, index: usize) -> i64 {
        self.data[index].level()
    }

    #[inline]
    fn is_open(&self, index: usize) -> bool {
        self.labels[index] == 0 && above_floor(self.data[index].to_f64(), self.floor)
    }

    #[inline]
    fn label(&self, index: usize) -> u32 {
        self.labels[index]
    }

    #[inline]
    fn assign(&mut self, index: usize, label: u32) {
        self.labels[index] = label;
    }
}

/// Labels written over the intensities they replace
///
/// Intensities must be non-negative. An assigned sample stores `-label`,
/// so "assigned" is the sign bit and never overlaps the floor test.
#[derive(Debug)]
pub struct InPlaceStore<'a> {
    data: &'a mut [i32],
    floor: Option<f64>,
}

impl<'a> InPlaceStore<'a> {
    /// Wrap an intensity buffer
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidParameters` if any intensity is negative.
    pub fn new(data: &'a mut [i32], floor: Option<f64>) -> RegionResult<Self> {
        if let Some(pos) = data.iter().position(|&v| v < 0) {
            return Err(RegionError::InvalidParameters(format!(
                "in-place watershed needs non-negative intensities, found {} at index {}",
                data[pos], pos
            )));
        }
        Ok(InPlaceStore { data, floor })
    }

    /// Replace every sample by its label (0 where nothing arrived)
    pub fn finish(self) {
        for v in self.data.iter_mut() {
            *v = if *v < 0 { -*v } else { 0 };
        }
    }
}

impl FloodStore for InPlaceStore<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn level(&self, index: usize) -> i64 {
        let v = self.data[index];
        if v < 0 { EXCLUDED_LEVEL } else { v as i64 }
    }

    #[inline]
    fn is_open(&self, index: usize) -> bool {
        let v = self.data[index];
        v >= 0 && above_floor(v as f64, self.floor)
    }

    #[inline]
    fn label(&self, index: usize) -> u32 {
        let v = self.data[index];
        if v < 0 { v.unsigned_abs() } else { 0 }
    }

    #[inline]
    fn assign(&mut self, index: usize, label: u32) {
        debug_assert!(label > 0 && label <= i32::MAX as u32);
        self.data[index] = -(label as i32);
    }
}

/// Flood `store` outward from the non-zero entries of `seeds`
///
/// Seeds are labeled even when they lie below the floor; flooding only
/// ever enters open samples. Returns the number of queue pops.
///
/// # Errors
///
/// Returns `RegionError::Core` with `DataLength` if `store` or `seeds` do
/// not hold one entry per sample of `shape`, and fails as
/// [`Neighborhood::new`] does for the connectivity.
pub fn flood<S: FloodStore>(
    store: &mut S,
    shape: &Shape,
    seeds: &[u32],
    connectivity: ConnectivityType,
) -> RegionResult<usize> {
    for actual in [store.len(), seeds.len()] {
        if actual != shape.len() {
            return Err(floodlab_core::Error::DataLength {
                dims: shape.dims().to_vec(),
                expected: shape.len(),
                actual,
            }
            .into());
        }
    }
    if !seeds.iter().any(|&s| s > 0) {
        return Ok(0);
    }
    let nb = Neighborhood::new(shape, connectivity)?;

    // Every level a push can carry: seeds and samples the flood may enter
    let mut levels: Vec<i64> = seeds
        .iter()
        .enumerate()
        .filter(|&(i, &seed)| seed > 0 || store.is_open(i))
        .map(|(i, _)| store.level(i))
        .filter(|&l| l != EXCLUDED_LEVEL)
        .collect();
    // Only seeds without a level (NaN) are present
    if levels.is_empty() {
        levels.push(0);
    }
    let mut queue = BucketQueue::with_levels(&levels, FloodOrder::Ascending)?;
    let lowest = queue.min_level();

    for (i, &seed) in seeds.iter().enumerate() {
        if seed == 0 {
            continue;
        }
        let l = store.level(i);
        let l = if l == EXCLUDED_LEVEL { lowest } else { l };
        store.assign(i, seed);
        queue.push(i, l)?;
    }

    let mut coord = vec![0usize; shape.ndim()];
    let mut pops = 0usize;

    while let Some((p, current)) = queue.pop() {
        pops += 1;
        shape.coord_into(p, &mut coord);
        let label = store.label(p);
        for k in 0..nb.len() {
            let Some(n) = nb.neighbor(&coord, p, k) else {
                continue;
            };
            if !store.is_open(n) {
                continue;
            }
            let l = current.max(store.level(n));
            store.assign(n, label);
            queue.push(n, l)?;
        }
    }

    Ok(pops)
}

fn max_seed_label(seeds: &LabelGrid) -> u32 {
    seeds.data().iter().copied().max().unwrap_or(0)
}

/// Flood an intensity grid from labeled seeds
///
/// `seeds` must have the same shape as `intensity`; 0 means unseeded and
/// any positive value is a region label that is propagated unchanged.
/// Samples that no flood reaches keep label 0. The reported count is the
/// largest seed label.
///
/// # Examples
///
/// ```
/// use floodlab_core::Grid;
/// use floodlab_region::{ConnectivityType, WatershedOptions, watershed};
///
/// let intensity = Grid::new(&[3, 3], 10u8).unwrap();
/// let mut seeds = Grid::new(&[3, 3], 0u32).unwrap();
/// seeds.set(&[0, 0], 1).unwrap();
/// seeds.set(&[2, 2], 2).unwrap();
///
/// let options = WatershedOptions::new().with_connectivity(ConnectivityType::Face);
/// let labeling = watershed(&intensity, &seeds, &options).unwrap();
/// assert_eq!(labeling.labels.data(), &[1, 1, 1, 1, 1, 2, 1, 2, 2]);
/// ```
pub fn watershed<T: Sample>(
    intensity: &Grid<T>,
    seeds: &LabelGrid,
    options: &WatershedOptions,
) -> RegionResult<Labeling> {
    intensity.check_same_shape(seeds)?;
    let shape = intensity.shape();
    if intensity.is_empty() {
        return Ok(Labeling::empty(shape));
    }

    let mut store = LabelBuffer::new(intensity.data(), options.floor);
    let pops = flood(&mut store, shape, seeds.data(), options.connectivity)?;
    let count = max_seed_label(seeds);

    log::debug!(
        "watershed: {} samples, {} pops, labels up to {}",
        shape.len(),
        pops,
        count
    );
    Ok(Labeling {
        labels: Grid::from_shape_data(shape.clone(), store.into_labels())?,
        count,
    })
}

/// Flood an `i32` intensity grid in place
///
/// On return `grid` holds the labels instead of the intensities, exactly
/// as [`watershed`] would have produced them. Returns the largest seed
/// label.
///
/// # Errors
///
/// Returns `RegionError::InvalidParameters` if an intensity is negative or
/// a seed label does not fit in an `i32`; the grid is untouched in that
/// case.
pub fn watershed_in_place(
    grid: &mut Grid<i32>,
    seeds: &LabelGrid,
    options: &WatershedOptions,
) -> RegionResult<u32> {
    grid.check_same_shape(seeds)?;
    let count = max_seed_label(seeds);
    if count > i32::MAX as u32 {
        return Err(RegionError::InvalidParameters(format!(
            "seed label {} does not fit in-place storage",
            count
        )));
    }
    if grid.is_empty() {
        return Ok(0);
    }

    let shape = grid.shape().clone();
    let mut store = InPlaceStore::new(grid.data_mut(), options.floor)?;
    let pops = flood(&mut store, &shape, seeds.data(), options.connectivity)?;
    store.finish();

    log::debug!(
        "in-place watershed: {} samples, {} pops, labels up to {}",
        shape.len(),
        pops,
        count
    );
    Ok(count)
}

/// Watershed segmentation seeded by the regional minima of `grid`
///
/// Each regional minimum becomes one basin; basins are numbered in raster
/// order of their minimum.
pub fn watershed_segmentation<T: Sample>(
    grid: &Grid<T>,
    options: &WatershedOptions,
) -> RegionResult<Labeling> {
    let minima = label_local_minima(grid, options.connectivity)?;
    log::debug!("watershed segmentation: {} minima", minima.count);
    watershed(grid, &minima.labels, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner_seeds(dims: &[usize]) -> LabelGrid {
        let mut seeds = Grid::new(dims, 0u32).unwrap();
        let n = seeds.len();
        seeds.set_index(0, 1).unwrap();
        seeds.set_index(n - 1, 2).unwrap();
        seeds
    }

    #[test]
    fn test_uniform_corners_face() {
        let intensity = Grid::new(&[3, 3], 4u8).unwrap();
        let options = WatershedOptions::new().with_connectivity(ConnectivityType::Face);
        let labeling = watershed(&intensity, &corner_seeds(&[3, 3]), &options).unwrap();
        assert_eq!(labeling.count, 2);
        assert_eq!(labeling.labels.data(), &[1, 1, 1, 1, 1, 2, 1, 2, 2]);
    }

    #[test]
    fn test_ridge_separates_basins() {
        let intensity = Grid::from_data(&[7], vec![0u8, 1, 2, 9, 2, 1, 0]).unwrap();
        let options = WatershedOptions::new();
        let labeling = watershed(&intensity, &corner_seeds(&[7]), &options).unwrap();
        // The ridge goes to whichever basin reached it first: the left one
        assert_eq!(labeling.labels.data(), &[1, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_floor_blocks_flood() {
        let intensity = Grid::from_data(&[5], vec![5u8, 5, 1, 5, 5]).unwrap();
        let mut seeds = Grid::new(&[5], 0u32).unwrap();
        seeds.set_index(0, 1).unwrap();
        let options = WatershedOptions::new().with_floor(3.0);
        let labeling = watershed(&intensity, &seeds, &options).unwrap();
        assert_eq!(labeling.labels.data(), &[1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_no_seeds() {
        let intensity = Grid::new(&[4, 4], 1u8).unwrap();
        let seeds = Grid::new(&[4, 4], 0u32).unwrap();
        let labeling = watershed(&intensity, &seeds, &WatershedOptions::new()).unwrap();
        assert_eq!(labeling.count, 0);
        assert!(labeling.labels.data().iter().all(|&l| l == 0));
    }

    #[test]
    fn test_shape_mismatch() {
        let intensity = Grid::new(&[4, 4], 1u8).unwrap();
        let seeds = Grid::new(&[4, 3], 0u32).unwrap();
        assert!(matches!(
            watershed(&intensity, &seeds, &WatershedOptions::new()),
            Err(RegionError::Core(floodlab_core::Error::ShapeMismatch { .. }))
        ));
    }

    #[test]
    fn test_in_place_matches_buffer() {
        let data = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7, 9, 3];
        let intensity = Grid::from_data(&[4, 4], data).unwrap();
        let seeds = corner_seeds(&[4, 4]);
        let options = WatershedOptions::new().with_floor(2.0);

        let buffered = watershed(&intensity, &seeds, &options).unwrap();
        let mut grid = intensity.clone();
        let count = watershed_in_place(&mut grid, &seeds, &options).unwrap();

        assert_eq!(count, buffered.count);
        let in_place: Vec<u32> = grid.data().iter().map(|&v| v as u32).collect();
        assert_eq!(in_place, buffered.labels.data());
    }

    #[test]
    fn test_wide_intensity_range() {
        let intensity = Grid::from_data(&[4], vec![0i32, 5_000_000, 3, 0]).unwrap();
        let seeds = Grid::from_data(&[4], vec![1u32, 0, 0, 2]).unwrap();
        let options = WatershedOptions::new();

        let labeling = watershed(&intensity, &seeds, &options).unwrap();
        assert_eq!(labeling.count, 2);
        assert_eq!(labeling.labels.data(), &[1, 1, 2, 2]);

        let mut grid = intensity.clone();
        assert_eq!(watershed_in_place(&mut grid, &seeds, &options).unwrap(), 2);
        assert_eq!(grid.data(), &[1, 1, 2, 2]);
    }

    #[test]
    fn test_flood_rejects_short_buffers() {
        let shape = Shape::new(&[3, 3]).unwrap();
        let data = vec![0u8; 9];
        let mut store = LabelBuffer::new(&data, None);
        assert!(matches!(
            flood(&mut store, &shape, &[1, 0, 0], ConnectivityType::Face),
            Err(RegionError::Core(floodlab_core::Error::DataLength { actual: 3, .. }))
        ));

        let short = vec![0u8; 4];
        let mut store = LabelBuffer::new(&short, None);
        assert!(flood(&mut store, &shape, &[1; 9], ConnectivityType::Face).is_err());
        assert!(store.into_labels().iter().all(|&l| l == 0));
    }

    #[test]
    fn test_in_place_rejects_negative() {
        let mut grid = Grid::from_data(&[3], vec![0i32, -1, 2]).unwrap();
        let seeds = corner_seeds(&[3]);
        let result = watershed_in_place(&mut grid, &seeds, &WatershedOptions::new());
        assert!(matches!(result, Err(RegionError::InvalidParameters(_))));
        assert_eq!(grid.data(), &[0, -1, 2]);
    }

    #[test]
    fn test_segmentation_from_minima() {
        let grid = Grid::from_data(&[7], vec![1u8, 2, 3, 4, 3, 2, 1]).unwrap();
        let labeling = watershed_segmentation(&grid, &WatershedOptions::new()).unwrap();
        assert_eq!(labeling.count, 2);
        assert_eq!(labeling.labels.data(), &[1, 1, 1, 1, 2, 2, 2]);
    }
}
