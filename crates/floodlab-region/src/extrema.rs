//! Regional extrema (flat-zone) labeling
//!
//! A regional maximum is a connected flat zone with no strictly larger
//! neighbor; a regional minimum is the mirror image. Each sample is visited
//! once in raster order and compared against all of its in-bounds
//! neighbors. Out-of-bounds positions behave like the sample type's
//! "never wins" extreme and are simply skipped.
//!
//! Equal-valued neighbors that were already visited are merged into the
//! current sample's component. A component stays an extremum only while
//! every one of its samples does.

use crate::connectivity::{ConnectivityType, Neighborhood};
use crate::error::RegionResult;
use crate::label::Labeling;
use crate::union_find::DisjointSet;
use floodlab_core::{Grid, Sample};

/// Which kind of regional extremum to label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extremum {
    /// Flat zones with no strictly larger neighbor
    #[default]
    Maxima,
    /// Flat zones with no strictly smaller neighbor
    Minima,
}

/// Options for regional extrema labeling
#[derive(Debug, Clone, Default)]
pub struct ExtremaOptions {
    /// Maxima or minima
    pub extremum: Extremum,
    /// Samples beyond this bound are skipped and labeled 0: below it for
    /// maxima, above it for minima
    pub floor: Option<f64>,
    /// Connectivity type for finding neighbors
    pub connectivity: ConnectivityType,
}

impl ExtremaOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the kind of extremum
    pub fn with_extremum(mut self, extremum: Extremum) -> Self {
        self.extremum = extremum;
        self
    }

    /// Set the skip bound
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

impl Extremum {
    /// True if a neighbor valued `other` disqualifies a sample valued `value`
    #[inline]
    fn beats<T: Sample>(self, other: T, value: T) -> bool {
        match self {
            Extremum::Maxima => other > value,
            Extremum::Minima => other < value,
        }
    }

    #[inline]
    fn within<T: Sample>(self, value: T, floor: Option<f64>) -> bool {
        let v = value.to_f64();
        if v.is_nan() {
            return false;
        }
        match (self, floor) {
            (_, None) => true,
            (Extremum::Maxima, Some(f)) => v >= f,
            (Extremum::Minima, Some(f)) => v <= f,
        }
    }
}

/// Label the regional extrema of a grid
///
/// Every sample of a maximal (or minimal) flat zone gets that zone's label;
/// all other samples get 0. Labels are issued in raster order of each
/// zone's first sample.
///
/// # Examples
///
/// ```
/// use floodlab_core::Grid;
/// use floodlab_region::{ExtremaOptions, label_local_extrema};
///
/// let grid = Grid::from_data(&[7], vec![1u8, 4, 4, 2, 3, 1, 1]).unwrap();
/// let labeling = label_local_extrema(&grid, &ExtremaOptions::new()).unwrap();
/// assert_eq!(labeling.labels.data(), &[0, 1, 1, 0, 2, 0, 0]);
/// ```
pub fn label_local_extrema<T: Sample>(
    grid: &Grid<T>,
    options: &ExtremaOptions,
) -> RegionResult<Labeling> {
    let shape = grid.shape();
    if grid.is_empty() {
        return Ok(Labeling::empty(shape));
    }

    let data = grid.data();
    let extremum = options.extremum;
    let nb = Neighborhood::new(shape, options.connectivity)?;
    let mut forest = DisjointSet::new(data.len());
    let mut is_extremum_root = vec![false; data.len()];
    let mut coord = vec![0usize; shape.ndim()];

    for (p, &value) in data.iter().enumerate() {
        if !extremum.within(value, options.floor) {
            shape.advance(&mut coord);
            continue;
        }

        forest.make_set(p);
        is_extremum_root[p] = true;

        for k in 0..nb.len() {
            let Some(q) = nb.neighbor(&coord, p, k) else {
                continue;
            };
            let other = data[q];
            if extremum.beats(other, value) {
                is_extremum_root[p] = false;
            } else if other == value && forest.contains(q) {
                let r = forest.find(q);
                if r != p {
                    is_extremum_root[p] &= is_extremum_root[r];
                    is_extremum_root[r] = false;
                    forest.attach(r, p);
                }
            }
        }

        shape.advance(&mut coord);
    }

    forest.flatten(0..data.len());
    let labeling = Labeling::from_forest(shape, &forest, |root| is_extremum_root[root])?;

    log::debug!(
        "{:?} labeling: {} flat zones over {} samples",
        extremum,
        labeling.count,
        data.len()
    );
    Ok(labeling)
}

/// Label regional maxima with no skip bound
pub fn label_local_maxima<T: Sample>(
    grid: &Grid<T>,
    connectivity: ConnectivityType,
) -> RegionResult<Labeling> {
    let options = ExtremaOptions::new()
        .with_extremum(Extremum::Maxima)
        .with_connectivity(connectivity);
    label_local_extrema(grid, &options)
}

/// Label regional minima with no skip bound
pub fn label_local_minima<T: Sample>(
    grid: &Grid<T>,
    connectivity: ConnectivityType,
) -> RegionResult<Labeling> {
    let options = ExtremaOptions::new()
        .with_extremum(Extremum::Minima)
        .with_connectivity(connectivity);
    label_local_extrema(grid, &options)
}
