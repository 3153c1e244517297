//! Area-filtered peak labeling (area opening)
//!
//! Samples above a floor are processed from the highest level down, as in
//! a max-tree construction. Each peak accumulates the area of everything
//! that flows into it. A peak that is still smaller than the area
//! threshold when it meets another component is absorbed; a peak that has
//! already reached the threshold stays separate and the sample joining it
//! becomes a dead branch. Surviving peaks with enough area are labeled.
//!
//! # Examples
//!
//! ```
//! use floodlab_core::Grid;
//! use floodlab_region::{AreaOpeningOptions, label_area_opening};
//!
//! let levels = vec![1u8, 1, 1, 5, 5, 1, 1, 1, 9, 9, 9, 9, 1];
//! let grid = Grid::from_data(&[levels.len()], levels).unwrap();
//! let options = AreaOpeningOptions::new().with_area_threshold(3);
//! let labeling = label_area_opening(&grid, &options).unwrap();
//! assert_eq!(labeling.count, 1);
//! assert_eq!(labeling.labels.data(), &[0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0]);
//! ```

use crate::connectivity::{ConnectivityType, Neighborhood};
use crate::error::RegionResult;
use crate::label::Labeling;
use crate::ordering::{EXCLUDED_LEVEL, FloodOrder, sort_by_level};
use crate::union_find::DisjointSet;
use floodlab_core::{Grid, Sample};

/// Options for area-filtered peak labeling
#[derive(Debug, Clone)]
pub struct AreaOpeningOptions {
    /// Minimum plateau area for a peak to survive; 0 finds nothing
    pub area_threshold: usize,
    /// Samples at or below this value are never processed
    pub floor: f64,
    /// Connectivity type for finding neighbors
    pub connectivity: ConnectivityType,
}

impl Default for AreaOpeningOptions {
    fn default() -> Self {
        Self {
            area_threshold: 1,
            floor: 0.0,
            connectivity: ConnectivityType::Face,
        }
    }
}

impl AreaOpeningOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum surviving area
    pub fn with_area_threshold(mut self, area_threshold: usize) -> Self {
        self.area_threshold = area_threshold;
        self
    }

    /// Set the processing floor
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Per-call scratch state of the area filter
struct PeakForest {
    forest: DisjointSet,
    active: Vec<bool>,
    area: Vec<usize>,
    area_threshold: usize,
}

impl PeakForest {
    fn new(len: usize, area_threshold: usize) -> Self {
        PeakForest {
            forest: DisjointSet::new(len),
            active: vec![false; len],
            area: vec![0; len],
            area_threshold,
        }
    }

    fn add(&mut self, p: usize) {
        self.forest.make_set(p);
        self.active[p] = true;
        self.area[p] = 1;
    }

    /// Merge root `r` into the current sample `p`, or retire `p`
    fn union(&mut self, r: usize, p: usize, same_level: bool) {
        if same_level || self.area[r] < self.area_threshold {
            self.area[p] += self.area[r];
            self.area[r] = 0;
            self.active[r] = false;
            self.forest.attach(r, p);
        } else {
            self.active[p] = false;
        }
    }

    fn survives(&self, root: usize) -> bool {
        self.active[root] && self.area[root] >= self.area_threshold
    }
}

/// Label the peaks whose accumulated area reaches the threshold
///
/// Levels are the samples' quantized values ([`Sample::level`]). An
/// `area_threshold` of 0, an empty grid, or a grid with nothing above the
/// floor all yield zero components.
pub fn label_area_opening<T: Sample>(
    grid: &Grid<T>,
    options: &AreaOpeningOptions,
) -> RegionResult<Labeling> {
    let shape = grid.shape();
    if grid.is_empty() || options.area_threshold == 0 {
        return Ok(Labeling::empty(shape));
    }

    let data = grid.data();
    let levels: Vec<i64> = data
        .iter()
        .map(|&v| {
            if v.to_f64() > options.floor {
                v.level()
            } else {
                EXCLUDED_LEVEL
            }
        })
        .collect();
    let order = sort_by_level(&levels, FloodOrder::Descending);
    if order.is_empty() {
        return Ok(Labeling::empty(shape));
    }

    let nb = Neighborhood::new(shape, options.connectivity)?;
    let mut peaks = PeakForest::new(data.len(), options.area_threshold);
    let mut coord = vec![0usize; shape.ndim()];

    for &p in &order {
        shape.coord_into(p, &mut coord);
        peaks.add(p);

        for k in 0..nb.len() {
            let Some(q) = nb.neighbor(&coord, p, k) else {
                continue;
            };
            // Registered neighbors are higher, or equal and earlier
            if !peaks.forest.contains(q) {
                continue;
            }
            let r = peaks.forest.find(q);
            if r == p {
                continue;
            }
            if !peaks.active[r] {
                peaks.active[p] = false;
                continue;
            }
            peaks.union(r, p, levels[r] == levels[p]);
        }
    }

    peaks.forest.flatten(order.iter().copied());
    let labeling = Labeling::from_forest(shape, &peaks.forest, |root| peaks.survives(root))?;

    log::debug!(
        "area opening: {} samples above floor {}, {} peaks with area >= {}",
        order.len(),
        options.floor,
        labeling.count,
        options.area_threshold
    );
    Ok(labeling)
}
