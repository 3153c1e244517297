//! Grid - N-dimensional array of scalar samples
//!
//! `Grid<T>` stores one sample per position in flattened raster order
//! (see [`Shape`]). Labeling algorithms borrow grids read-only and return
//! a fresh [`LabelGrid`]; the in-place watershed takes `&mut Grid<i32>`.
//!
//! # Examples
//!
//! ```
//! use floodlab_core::Grid;
//!
//! let mut grid = Grid::new(&[3, 2], 0u8).unwrap();
//! grid.set(&[2, 1], 7).unwrap();
//! assert_eq!(grid.get(&[2, 1]), Some(7));
//! assert_eq!(grid.get_index(5), Some(7));
//! assert_eq!(grid.min_max(), Some((0, 7)));
//! ```

use crate::error::{Error, Result};
use crate::sample::Sample;
use crate::shape::Shape;

/// Integer label grid: 0 is background, 1..=K are components
pub type LabelGrid = Grid<u32>;

/// N-dimensional array of samples
///
/// # Memory Layout
///
/// Data is stored with axis 0 fastest and no padding. The sample at
/// coordinate `c` is at index `Σ c[d] * stride[d]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Create a grid with every sample set to `fill`
    ///
    /// # Errors
    ///
    /// Returns an error if `dims` is not a valid [`Shape`].
    pub fn new(dims: &[usize], fill: T) -> Result<Self> {
        let shape = Shape::new(dims)?;
        Ok(Self::filled(shape, fill))
    }

    /// Create a grid of an existing shape with every sample set to `fill`
    pub fn filled(shape: Shape, fill: T) -> Self {
        let data = vec![fill; shape.len()];
        Grid { shape, data }
    }

    /// Create a grid from samples in flattened order
    ///
    /// # Errors
    ///
    /// Returns `Error::DataLength` if `data.len()` differs from the sample
    /// count implied by `dims`.
    pub fn from_data(dims: &[usize], data: Vec<T>) -> Result<Self> {
        let shape = Shape::new(dims)?;
        Self::from_shape_data(shape, data)
    }

    /// Create a grid from an existing shape and samples
    pub fn from_shape_data(shape: Shape, data: Vec<T>) -> Result<Self> {
        if data.len() != shape.len() {
            return Err(Error::DataLength {
                dims: shape.dims().to_vec(),
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Grid { shape, data })
    }

    /// Get the grid shape
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Get the per-dimension extents
    #[inline]
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the grid holds no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the sample at a coordinate
    pub fn get(&self, coord: &[usize]) -> Option<T> {
        self.shape.index_of(coord).map(|i| self.data[i])
    }

    /// Get the sample at a flattened index
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<T> {
        self.data.get(index).copied()
    }

    /// Set the sample at a coordinate
    ///
    /// # Errors
    ///
    /// Returns `Error::CoordOutOfBounds` if the coordinate is outside the grid.
    pub fn set(&mut self, coord: &[usize], value: T) -> Result<()> {
        let index = self
            .shape
            .index_of(coord)
            .ok_or_else(|| Error::CoordOutOfBounds {
                coord: coord.to_vec(),
                dims: self.shape.dims().to_vec(),
            })?;
        self.data[index] = value;
        Ok(())
    }

    /// Set the sample at a flattened index
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `index >= len()`.
    pub fn set_index(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Get the samples in flattened order
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Get mutable access to the samples in flattened order
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid and return its samples
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every sample, producing a grid of the same shape
    pub fn map<U: Copy, F: FnMut(T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            shape: self.shape.clone(),
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// True if `other` has exactly the same extents
    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.shape == other.shape
    }

    /// Return `Error::ShapeMismatch` unless `other` has the same extents
    pub fn check_same_shape<U>(&self, other: &Grid<U>) -> Result<()> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                expected: self.shape.dims().to_vec(),
                actual: other.shape.dims().to_vec(),
            })
        }
    }
}

impl<T: Sample> Grid<T> {
    /// Get the minimum and maximum sample values
    ///
    /// Unordered samples (NaN) are skipped. Returns `None` for an empty grid
    /// or one with no ordered samples.
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut iter = self.data.iter().copied().filter(|v| v.partial_cmp(v).is_some());
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        }))
    }
}
