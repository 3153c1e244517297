//! floodlab-core - Basic data structures for the flooding engine
//!
//! This crate provides the fundamental data structures shared by every
//! floodlab algorithm:
//!
//! - [`Shape`] - Extents and strides of an N-dimensional grid
//! - [`Grid`] - Owned N-dimensional array of scalar samples
//! - [`LabelGrid`] - Integer label grid (0 = background)
//! - [`Sample`] - Scalar types that can be stored and flooded

pub mod error;
pub mod grid;
pub mod sample;
pub mod shape;

pub use error::{Error, Result};
pub use grid::{Grid, LabelGrid};
pub use sample::Sample;
pub use shape::Shape;
