//! Shape - extents and strides of an N-dimensional grid
//!
//! Axis 0 varies fastest. For a 2-D grid with dims `[width, height]` the
//! sample at `(x, y)` lives at flattened index `y * width + x`, the same
//! raster layout as an image.
//!
//! # Examples
//!
//! ```
//! use floodlab_core::Shape;
//!
//! let shape = Shape::new(&[4, 3]).unwrap();
//! assert_eq!(shape.len(), 12);
//! assert_eq!(shape.strides(), &[1, 4]);
//! assert_eq!(shape.index_of(&[1, 2]), Some(9));
//! assert_eq!(shape.coord_of(9), Some(vec![1, 2]));
//! ```

use crate::error::{Error, Result};

/// Extents and row-major strides of an N-dimensional grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
    strides: Vec<usize>,
    len: usize,
}

impl Shape {
    /// Create a shape from per-dimension extents
    ///
    /// Zero extents are allowed and describe an empty grid.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidShape` if `dims` is empty and
    /// `Error::ShapeOverflow` if the sample count does not fit in `usize`.
    pub fn new(dims: &[usize]) -> Result<Self> {
        if dims.is_empty() {
            return Err(Error::InvalidShape);
        }

        let mut strides = Vec::with_capacity(dims.len());
        let mut len = 1usize;
        for &extent in dims {
            strides.push(len);
            len = len
                .checked_mul(extent)
                .ok_or_else(|| Error::ShapeOverflow(dims.to_vec()))?;
        }

        Ok(Shape {
            dims: dims.to_vec(),
            strides,
            len,
        })
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Per-dimension extents
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Per-dimension strides in the flattened index space
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Total number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if any extent is zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether a coordinate lies inside the grid
    pub fn contains(&self, coord: &[usize]) -> bool {
        coord.len() == self.dims.len() && coord.iter().zip(&self.dims).all(|(&c, &e)| c < e)
    }

    /// Flattened index of a coordinate, or `None` if it is out of bounds
    pub fn index_of(&self, coord: &[usize]) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(coord.iter().zip(&self.strides).map(|(c, s)| c * s).sum())
    }

    /// Coordinate of a flattened index, or `None` if it is out of bounds
    pub fn coord_of(&self, index: usize) -> Option<Vec<usize>> {
        if index >= self.len {
            return None;
        }
        let mut coord = vec![0; self.dims.len()];
        self.coord_into(index, &mut coord);
        Some(coord)
    }

    /// Write the coordinate of `index` into `coord` without allocating
    ///
    /// `index` must be in bounds and `coord` must have `ndim()` entries.
    pub fn coord_into(&self, index: usize, coord: &mut [usize]) {
        debug_assert!(index < self.len);
        debug_assert_eq!(coord.len(), self.dims.len());
        let mut rest = index;
        for d in (0..self.dims.len()).rev() {
            coord[d] = rest / self.strides[d];
            rest %= self.strides[d];
        }
    }

    /// Step `coord` to the next position in raster order
    ///
    /// Returns `false` once the last position has been passed, leaving
    /// `coord` back at the origin.
    pub fn advance(&self, coord: &mut [usize]) -> bool {
        for (c, &extent) in coord.iter_mut().zip(&self.dims) {
            *c += 1;
            if *c < extent {
                return true;
            }
            *c = 0;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_strides() {
        let shape = Shape::new(&[5, 4, 3]).unwrap();
        assert_eq!(shape.ndim(), 3);
        assert_eq!(shape.strides(), &[1, 5, 20]);
        assert_eq!(shape.len(), 60);
    }

    #[test]
    fn test_shape_rejects_zero_dims() {
        assert_eq!(Shape::new(&[]), Err(Error::InvalidShape));
    }

    #[test]
    fn test_shape_empty_extent() {
        let shape = Shape::new(&[4, 0]).unwrap();
        assert!(shape.is_empty());
        assert_eq!(shape.index_of(&[0, 0]), None);
        assert_eq!(shape.coord_of(0), None);
    }

    #[test]
    fn test_index_coord_inverse() {
        let shape = Shape::new(&[3, 4, 2]).unwrap();
        for index in 0..shape.len() {
            let coord = shape.coord_of(index).unwrap();
            assert_eq!(shape.index_of(&coord), Some(index));
        }
    }

    #[test]
    fn test_index_of_out_of_bounds() {
        let shape = Shape::new(&[3, 3]).unwrap();
        assert_eq!(shape.index_of(&[3, 0]), None);
        assert_eq!(shape.index_of(&[0, 0, 0]), None);
    }

    #[test]
    fn test_advance_visits_raster_order() {
        let shape = Shape::new(&[2, 3]).unwrap();
        let mut coord = vec![0, 0];
        let mut visited = vec![shape.index_of(&coord).unwrap()];
        while shape.advance(&mut coord) {
            visited.push(shape.index_of(&coord).unwrap());
        }
        assert_eq!(visited, (0..6).collect::<Vec<_>>());
        assert_eq!(coord, vec![0, 0]);
    }

    #[test]
    fn test_shape_overflow() {
        assert!(matches!(
            Shape::new(&[usize::MAX, 2]),
            Err(Error::ShapeOverflow(_))
        ));
    }
}
