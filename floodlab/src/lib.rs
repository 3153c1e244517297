//! floodlab - Flooding and union-find labeling on N-dimensional grids
//!
//! # Overview
//!
//! floodlab assigns integer component labels to the samples of an
//! N-dimensional scalar grid by simulating controlled flooding:
//!
//! - Threshold-based connected component labeling
//! - Regional maxima and minima (flat zones)
//! - Area opening (peaks with a minimum plateau area)
//! - Seeded watershed, optionally reusing the intensity buffer
//! - Geodesic reconstruction by dilation or erosion
//!
//! # Example
//!
//! ```
//! use floodlab::Grid;
//! use floodlab::region::{ThresholdOptions, label_connected_components};
//!
//! let grid = Grid::from_data(&[10], vec![0u8, 0, 5, 5, 5, 0, 0, 5, 5, 0]).unwrap();
//! let labeling = label_connected_components(&grid, &ThresholdOptions::new()).unwrap();
//! assert_eq!(labeling.count, 2);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use floodlab_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use floodlab_region as region;
