//! floodlab-region - Union-find labeling and flooding on N-dimensional grids
//!
//! This crate provides the labeling and flooding algorithms of floodlab,
//! all built on one shared foundation of neighbor offsets, a disjoint-set
//! forest, and level ordering:
//!
//! - **Threshold labeling** - Connected components of samples above a threshold
//! - **Regional extrema** - Maximal or minimal flat zones
//! - **Area opening** - Peaks that keep a minimum plateau area
//! - **Watershed** - Seeded flooding, with a separate or in-place label store
//! - **Geodesic reconstruction** - Marker growth bounded by a mask
//!
//! # Examples
//!
//! ## Labeling components
//!
//! ```
//! use floodlab_core::Grid;
//! use floodlab_region::{ConnectivityType, ThresholdOptions, label_connected_components};
//!
//! let mut grid = Grid::new(&[100, 100], 0u8).unwrap();
//! grid.set(&[10, 10], 1).unwrap();
//! grid.set(&[11, 10], 1).unwrap();
//! grid.set(&[50, 50], 1).unwrap();
//!
//! let options = ThresholdOptions::new().with_connectivity(ConnectivityType::Face);
//! let labeling = label_connected_components(&grid, &options).unwrap();
//! assert_eq!(labeling.count, 2);
//! assert_eq!(labeling.component_sizes(), vec![2, 1]);
//! ```
//!
//! ## Watershed segmentation
//!
//! ```
//! use floodlab_core::Grid;
//! use floodlab_region::{WatershedOptions, watershed_segmentation};
//!
//! let grid = Grid::from_data(&[7], vec![1u8, 2, 3, 4, 3, 2, 1]).unwrap();
//! let basins = watershed_segmentation(&grid, &WatershedOptions::default()).unwrap();
//! assert_eq!(basins.count, 2);
//! ```

pub mod area_opening;
pub mod conncomp;
pub mod connectivity;
pub mod error;
pub mod extrema;
pub mod label;
pub mod ordering;
pub mod seedfill;
pub mod union_find;
pub mod watershed;

// Re-export core types
pub use floodlab_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

// Re-export neighborhood types and functions
pub use connectivity::{
    ConnectivityType, MAX_FULL_NDIM, Neighborhood, index_deltas_for, offsets_for,
};

// Re-export forest and ordering types
pub use ordering::{
    BucketQueue, EXCLUDED_LEVEL, FloodOrder, LevelHistogram, MAX_LEVEL_RANGE, quantize,
    sort_by_level,
};
pub use union_find::DisjointSet;

// Re-export labeling types and functions
pub use area_opening::{AreaOpeningOptions, label_area_opening};
pub use conncomp::{ThresholdOptions, count_components, label_connected_components};
pub use extrema::{
    ExtremaOptions, Extremum, label_local_extrema, label_local_maxima, label_local_minima,
};
pub use label::Labeling;

// Re-export watershed types and functions
pub use watershed::{
    FloodStore, InPlaceStore, LabelBuffer, WatershedOptions, flood, watershed,
    watershed_in_place, watershed_segmentation,
};

// Re-export reconstruction types and functions
pub use seedfill::{
    FillStrategy, Polarity, ReconstructOptions, reconstruct, reconstruct_in_place, seedfill_gray,
    seedfill_gray_inv,
};
