//! Neighbor offsets on an N-dimensional grid
//!
//! A [`Neighborhood`] holds the relative offsets of one connectivity class
//! together with their constant flattened-index deltas for a given
//! [`Shape`]. Lookups are bounds-checked per dimension, so a traversal can
//! never produce an index outside the grid.

use crate::error::{RegionError, RegionResult};
use floodlab_core::Shape;

/// Highest dimension count for which full connectivity is enumerated
///
/// Full connectivity has 3^N - 1 offsets; beyond this the table alone
/// would dwarf any grid it is meant to traverse.
pub const MAX_FULL_NDIM: usize = 10;

/// Connectivity class for neighbor enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// Face-adjacent neighbors only (2·N offsets; 4-way in 2-D)
    #[default]
    Face,
    /// All neighbors including diagonals (3^N − 1 offsets; 8-way in 2-D)
    Full,
}

/// Enumerate the coordinate offsets of a connectivity class
///
/// The zero offset is never included. Face offsets are listed per axis as
/// `-1` then `+1`; full offsets are listed with axis 0 varying fastest.
///
/// # Errors
///
/// Returns `RegionError::InvalidParameters` for full connectivity with more
/// than [`MAX_FULL_NDIM`] dimensions.
pub fn offsets_for(ndim: usize, connectivity: ConnectivityType) -> RegionResult<Vec<Vec<isize>>> {
    let offsets = match connectivity {
        ConnectivityType::Face => {
            let mut offsets = Vec::with_capacity(2 * ndim);
            for d in 0..ndim {
                for step in [-1isize, 1] {
                    let mut offset = vec![0isize; ndim];
                    offset[d] = step;
                    offsets.push(offset);
                }
            }
            offsets
        }
        ConnectivityType::Full => {
            if ndim > MAX_FULL_NDIM {
                return Err(RegionError::InvalidParameters(format!(
                    "full connectivity supports at most {} dimensions, got {}",
                    MAX_FULL_NDIM, ndim
                )));
            }
            let total = 3usize.pow(ndim as u32);
            let mut offsets = Vec::with_capacity(total.saturating_sub(1));
            for k in 0..total {
                let mut rest = k;
                let offset: Vec<isize> = (0..ndim)
                    .map(|_| {
                        let digit = (rest % 3) as isize - 1;
                        rest /= 3;
                        digit
                    })
                    .collect();
                if offset.iter().any(|&o| o != 0) {
                    offsets.push(offset);
                }
            }
            offsets
        }
    };
    Ok(offsets)
}

/// Convert coordinate offsets to flattened-index deltas for `strides`
pub fn index_deltas_for(offsets: &[Vec<isize>], strides: &[usize]) -> Vec<isize> {
    offsets
        .iter()
        .map(|offset| {
            offset
                .iter()
                .zip(strides)
                .map(|(&o, &s)| o * s as isize)
                .sum()
        })
        .collect()
}

/// True if `offset` points to a position visited earlier in raster order
///
/// Raster order has axis 0 fastest, so the highest axis with a non-zero
/// component decides.
pub fn is_preceding(offset: &[isize]) -> bool {
    offset
        .iter()
        .rev()
        .find(|&&o| o != 0)
        .is_some_and(|&o| o < 0)
}

/// Neighbor offsets of a connectivity class bound to a grid shape
#[derive(Debug, Clone)]
pub struct Neighborhood {
    dims: Vec<usize>,
    offsets: Vec<Vec<isize>>,
    deltas: Vec<isize>,
}

impl Neighborhood {
    /// Derive the neighborhood of `connectivity` for `shape`
    ///
    /// # Errors
    ///
    /// Fails as [`offsets_for`] does.
    pub fn new(shape: &Shape, connectivity: ConnectivityType) -> RegionResult<Self> {
        let offsets = offsets_for(shape.ndim(), connectivity)?;
        let deltas = index_deltas_for(&offsets, shape.strides());
        Ok(Neighborhood {
            dims: shape.dims().to_vec(),
            offsets,
            deltas,
        })
    }

    /// Number of neighbor offsets
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True if there are no offsets (never the case for `ndim >= 1`)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Coordinate offsets
    pub fn offsets(&self) -> &[Vec<isize>] {
        &self.offsets
    }

    /// Flattened-index deltas, parallel to [`offsets`](Self::offsets)
    pub fn deltas(&self) -> &[isize] {
        &self.deltas
    }

    /// Positions (into `offsets()`) of the offsets visited before the
    /// center in raster order
    pub fn preceding(&self) -> Vec<usize> {
        (0..self.offsets.len())
            .filter(|&k| is_preceding(&self.offsets[k]))
            .collect()
    }

    /// Flattened index of neighbor `k` of the sample at `coord` / `index`
    ///
    /// Returns `None` when the neighbor falls outside the grid.
    #[inline]
    pub fn neighbor(&self, coord: &[usize], index: usize, k: usize) -> Option<usize> {
        let offset = &self.offsets[k];
        for d in 0..self.dims.len() {
            let c = coord[d] as isize + offset[d];
            if c < 0 || c >= self.dims[d] as isize {
                return None;
            }
        }
        Some((index as isize + self.deltas[k]) as usize)
    }

    /// Iterate over the in-bounds neighbors of the sample at `coord` / `index`
    pub fn neighbors<'a>(
        &'a self,
        coord: &'a [usize],
        index: usize,
    ) -> impl Iterator<Item = usize> + 'a {
        (0..self.offsets.len()).filter_map(move |k| self.neighbor(coord, index, k))
    }
}
