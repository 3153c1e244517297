//! Error types for floodlab-core
//!
//! Provides a unified error type for grid construction and addressing.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// floodlab-core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A shape needs at least one dimension
    #[error("invalid shape: a grid needs at least one dimension")]
    InvalidShape,

    /// The product of the extents does not fit in `usize`
    #[error("shape {0:?} overflows the addressable index space")]
    ShapeOverflow(Vec<usize>),

    /// Sample buffer length does not match the shape
    #[error("data length {actual} doesn't match shape {dims:?} = {expected}")]
    DataLength {
        dims: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Coordinate vector has the wrong number of components
    #[error("coordinate has {actual} components, grid has {expected} dimensions")]
    DimensionCount { expected: usize, actual: usize },

    /// Coordinate outside the grid
    #[error("coordinate {coord:?} out of bounds for shape {dims:?}")]
    CoordOutOfBounds { coord: Vec<usize>, dims: Vec<usize> },

    /// Flattened index outside the grid
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Two grids that must share a shape do not
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

/// Result type alias for floodlab-core operations
pub type Result<T> = std::result::Result<T, Error>;
