//! Geodesic reconstruction (grayscale seed fill)
//!
//! A marker grid is grown under a mask until nothing changes. Growth is
//! ordered by a [`BucketQueue`]: reconstruction by dilation releases the
//! highest marker level first and never lifts a sample above its mask
//! value; reconstruction by erosion is the mirror image.
//!
//! Two fill strategies reach the same fixed point:
//!
//! - [`FillStrategy::MaximaSeeded`] queues only the regional extrema of the
//!   marker and lets the flood visit everything else once
//! - [`FillStrategy::FullQueue`] queues every sample up front and skips
//!   stale entries when they are popped

use crate::connectivity::{ConnectivityType, Neighborhood};
use crate::error::RegionResult;
use crate::extrema::{ExtremaOptions, Extremum, label_local_extrema};
use crate::ordering::{BucketQueue, FloodOrder};
use floodlab_core::{Grid, Sample};

/// Direction of reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Grow the marker upward, bounded above by the mask
    #[default]
    Dilation,
    /// Grow the marker downward, bounded below by the mask
    Erosion,
}

impl Polarity {
    fn order(self) -> FloodOrder {
        match self {
            Polarity::Dilation => FloodOrder::Descending,
            Polarity::Erosion => FloodOrder::Ascending,
        }
    }

    fn extremum(self) -> Extremum {
        match self {
            Polarity::Dilation => Extremum::Maxima,
            Polarity::Erosion => Extremum::Minima,
        }
    }

    /// True if `a` is strictly further along the growth direction than `b`
    #[inline]
    fn better<T: Sample>(self, a: T, b: T) -> bool {
        match self {
            Polarity::Dilation => a > b,
            Polarity::Erosion => a < b,
        }
    }

    /// Value a neighbor can receive from `front`, limited by its mask
    #[inline]
    fn clip<T: Sample>(self, front: T, mask: T) -> T {
        if self.better(front, mask) { mask } else { front }
    }

    /// The further-grown of two values
    #[inline]
    fn pick<T: Sample>(self, a: T, b: T) -> T {
        if self.better(b, a) { b } else { a }
    }

    #[inline]
    fn qualifies<T: Sample>(self, value: T, floor: Option<f64>) -> bool {
        let v = value.to_f64();
        if v.is_nan() {
            return false;
        }
        match (self, floor) {
            (_, None) => true,
            (Polarity::Dilation, Some(f)) => v > f,
            (Polarity::Erosion, Some(f)) => v < f,
        }
    }
}

/// Order in which samples enter the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillStrategy {
    /// Seed from the marker's regional extrema only
    #[default]
    MaximaSeeded,
    /// Queue every sample before flooding
    FullQueue,
}

/// Options for geodesic reconstruction
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// Dilation or erosion
    pub polarity: Polarity,
    /// Marker values must be beyond this bound (above it for dilation,
    /// below it for erosion) to grow
    pub floor: Option<f64>,
    /// Queue filling strategy
    pub strategy: FillStrategy,
    /// Connectivity type for finding neighbors
    pub connectivity: ConnectivityType,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            polarity: Polarity::Dilation,
            floor: None,
            strategy: FillStrategy::MaximaSeeded,
            connectivity: ConnectivityType::Full,
        }
    }
}

impl ReconstructOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reconstruction direction
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Set the growth floor
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Set the queue filling strategy
    pub fn with_strategy(mut self, strategy: FillStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Reconstruct `marker` under `mask`, returning a new grid
///
/// The marker is expected to stay within the mask (`marker <= mask`
/// pointwise for dilation, `marker >= mask` for erosion). This is assumed,
/// not checked.
///
/// # Examples
///
/// ```
/// use floodlab_core::Grid;
/// use floodlab_region::{ReconstructOptions, reconstruct};
///
/// let mask = Grid::from_data(&[6], vec![5u8, 5, 1, 7, 7, 2]).unwrap();
/// let marker = Grid::from_data(&[6], vec![4u8, 0, 0, 0, 6, 0]).unwrap();
/// let filled = reconstruct(&marker, &mask, &ReconstructOptions::new()).unwrap();
/// assert_eq!(filled.data(), &[4, 4, 1, 6, 6, 2]);
/// ```
pub fn reconstruct<T: Sample>(
    marker: &Grid<T>,
    mask: &Grid<T>,
    options: &ReconstructOptions,
) -> RegionResult<Grid<T>> {
    let mut output = marker.clone();
    reconstruct_in_place(&mut output, mask, options)?;
    Ok(output)
}

/// Reconstruct `marker` under `mask`, overwriting `marker`
///
/// # Errors
///
/// Returns `RegionError::Core` with `ShapeMismatch` if the grids differ in
/// shape.
pub fn reconstruct_in_place<T: Sample>(
    marker: &mut Grid<T>,
    mask: &Grid<T>,
    options: &ReconstructOptions,
) -> RegionResult<()> {
    marker.check_same_shape(mask)?;
    if marker.is_empty() {
        return Ok(());
    }

    let polarity = options.polarity;
    let floor = options.floor;

    // Every value the marker can take comes from the marker or the mask
    let levels: Vec<i64> = marker
        .data()
        .iter()
        .chain(mask.data())
        .filter(|&&v| polarity.qualifies(v, floor))
        .map(|v| v.level())
        .collect();
    if levels.is_empty() {
        return Ok(());
    }
    let mut queue = BucketQueue::with_levels(&levels, polarity.order())?;

    let pops = match options.strategy {
        FillStrategy::MaximaSeeded => fill_from_extrema(marker, mask, options, &mut queue)?,
        FillStrategy::FullQueue => fill_full_queue(marker, mask, options, &mut queue)?,
    };

    log::debug!(
        "reconstruction ({:?}, {:?}): {} samples, {} pops",
        polarity,
        options.strategy,
        marker.len(),
        pops
    );
    Ok(())
}

fn fill_from_extrema<T: Sample>(
    marker: &mut Grid<T>,
    mask: &Grid<T>,
    options: &ReconstructOptions,
    queue: &mut BucketQueue,
) -> RegionResult<usize> {
    let polarity = options.polarity;
    let floor = options.floor;
    let extrema = label_local_extrema(
        &*marker,
        &ExtremaOptions::new()
            .with_extremum(polarity.extremum())
            .with_connectivity(options.connectivity),
    )?;

    let shape = marker.shape().clone();
    let nb = Neighborhood::new(&shape, options.connectivity)?;
    let mask = mask.data();
    let values = marker.data_mut();
    let mut queued = vec![false; values.len()];

    for (i, &label) in extrema.labels.data().iter().enumerate() {
        if label > 0 && polarity.qualifies(values[i], floor) {
            queued[i] = true;
            queue.push(i, values[i].level())?;
        }
    }

    let mut coord = vec![0usize; shape.ndim()];
    let mut pops = 0usize;
    while let Some((p, _)) = queue.pop() {
        pops += 1;
        shape.coord_into(p, &mut coord);
        let front = values[p];
        for k in 0..nb.len() {
            let Some(n) = nb.neighbor(&coord, p, k) else {
                continue;
            };
            let candidate = polarity.pick(values[n], polarity.clip(front, mask[n]));
            // A queued sample is only revisited if this front improves it
            if queued[n] && !polarity.better(candidate, values[n]) {
                continue;
            }
            queued[n] = true;
            if !polarity.qualifies(candidate, floor) {
                continue;
            }
            values[n] = candidate;
            queue.push(n, candidate.level())?;
        }
    }
    Ok(pops)
}

fn fill_full_queue<T: Sample>(
    marker: &mut Grid<T>,
    mask: &Grid<T>,
    options: &ReconstructOptions,
    queue: &mut BucketQueue,
) -> RegionResult<usize> {
    let polarity = options.polarity;
    let floor = options.floor;
    let shape = marker.shape().clone();
    let nb = Neighborhood::new(&shape, options.connectivity)?;
    let mask = mask.data();
    let values = marker.data_mut();

    for (i, &v) in values.iter().enumerate() {
        if polarity.qualifies(v, floor) {
            queue.push(i, v.level())?;
        }
    }

    let mut coord = vec![0usize; shape.ndim()];
    let mut pops = 0usize;
    while let Some((p, level)) = queue.pop() {
        pops += 1;
        let front = values[p];
        // Stale entry: the sample was improved and queued again
        if front.level() != level {
            continue;
        }
        shape.coord_into(p, &mut coord);
        for k in 0..nb.len() {
            let Some(n) = nb.neighbor(&coord, p, k) else {
                continue;
            };
            let clipped = polarity.clip(front, mask[n]);
            if polarity.better(clipped, values[n]) && polarity.qualifies(clipped, floor) {
                values[n] = clipped;
                queue.push(n, clipped.level())?;
            }
        }
    }
    Ok(pops)
}

/// Grayscale reconstruction by dilation of `seed` under `mask`
pub fn seedfill_gray<T: Sample>(
    seed: &Grid<T>,
    mask: &Grid<T>,
    connectivity: ConnectivityType,
) -> RegionResult<Grid<T>> {
    let options = ReconstructOptions::new().with_connectivity(connectivity);
    reconstruct(seed, mask, &options)
}

/// Grayscale reconstruction by erosion of `seed` over `mask`
pub fn seedfill_gray_inv<T: Sample>(
    seed: &Grid<T>,
    mask: &Grid<T>,
    connectivity: ConnectivityType,
) -> RegionResult<Grid<T>> {
    let options = ReconstructOptions::new()
        .with_polarity(Polarity::Erosion)
        .with_connectivity(connectivity);
    reconstruct(seed, mask, &options)
}
