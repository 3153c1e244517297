//! Intensity ordering for flooding
//!
//! Two interchangeable strategies put samples in the order flooding needs:
//!
//! - [`sort_by_level`] - a stable counting sort of every sample by its
//!   quantized level, O(N + L) for N samples and L levels
//! - [`BucketQueue`] - an array of FIFO buckets, one per level, with O(1)
//!   push and amortized O(1) pop from the lowest (or highest) level
//!
//! Both work on integer levels produced by [`Sample::level`]; samples whose
//! level is [`EXCLUDED_LEVEL`] take no part in the ordering.

use crate::error::{RegionError, RegionResult};
use floodlab_core::Sample;
use std::collections::VecDeque;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Level marking a sample that is left out of the ordering
pub const EXCLUDED_LEVEL: i64 = i64::MIN;

/// Widest level range stored densely, one slot per level
///
/// Wider ranges fall back to ranking the distinct levels that occur, so a
/// histogram or bucket queue never holds more slots than there are samples.
pub const MAX_LEVEL_RANGE: usize = 1 << 20;

/// Direction in which levels are consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloodOrder {
    /// Lowest level first (watershed, reconstruction by erosion)
    #[default]
    Ascending,
    /// Highest level first (area opening, reconstruction by dilation)
    Descending,
}

/// Quantize every sample to its integer level
pub fn quantize<T: Sample>(data: &[T]) -> Vec<i64> {
    #[cfg(feature = "parallel")]
    {
        data.par_iter().map(|v| v.level()).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        data.iter().map(|v| v.level()).collect()
    }
}

fn check_range(min: i64, max: i64) -> RegionResult<usize> {
    let span = (max as i128 - min as i128 + 1) as u128;
    if span > MAX_LEVEL_RANGE as u128 {
        return Err(RegionError::LevelRangeTooLarge {
            min,
            max,
            limit: MAX_LEVEL_RANGE,
        });
    }
    Ok(span as usize)
}

/// Minimum and maximum of the non-excluded levels
pub fn level_range(levels: &[i64]) -> Option<(i64, i64)> {
    let fold = |acc: Option<(i64, i64)>, l: i64| -> Option<(i64, i64)> {
        if l == EXCLUDED_LEVEL {
            return acc;
        }
        Some(match acc {
            Some((lo, hi)) => (lo.min(l), hi.max(l)),
            None => (l, l),
        })
    };

    #[cfg(feature = "parallel")]
    {
        levels
            .par_iter()
            .fold(|| None, |acc, &l| fold(acc, l))
            .reduce(
                || None,
                |a, b| match (a, b) {
                    (Some((a0, a1)), Some((b0, b1))) => Some((a0.min(b0), a1.max(b1))),
                    (x, None) | (None, x) => x,
                },
            )
    }
    #[cfg(not(feature = "parallel"))]
    {
        levels.iter().fold(None, |acc, &l| fold(acc, l))
    }
}

/// Slot assignment for a set of levels
///
/// Ranges up to [`MAX_LEVEL_RANGE`] wide map `level - min` directly; wider
/// ranges map each level to its rank among the distinct levels present.
/// Both keep level order, so slot order is level order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LevelIndex {
    Dense { min: i64, span: usize },
    Ranked(Vec<i64>),
}

impl LevelIndex {
    fn from_levels(levels: &[i64]) -> Option<Self> {
        let (min, max) = level_range(levels)?;
        if let Ok(span) = check_range(min, max) {
            return Some(LevelIndex::Dense { min, span });
        }

        let mut distinct: Vec<i64> = levels
            .iter()
            .copied()
            .filter(|&l| l != EXCLUDED_LEVEL)
            .collect();
        #[cfg(feature = "parallel")]
        distinct.par_sort_unstable();
        #[cfg(not(feature = "parallel"))]
        distinct.sort_unstable();
        distinct.dedup();
        log::trace!(
            "levels {}..={} ranked into {} slots",
            min,
            max,
            distinct.len()
        );
        Some(LevelIndex::Ranked(distinct))
    }

    fn len(&self) -> usize {
        match self {
            LevelIndex::Dense { span, .. } => *span,
            LevelIndex::Ranked(distinct) => distinct.len(),
        }
    }

    #[inline]
    fn slot(&self, level: i64) -> Option<usize> {
        match self {
            LevelIndex::Dense { min, span } => {
                let offset = level as i128 - *min as i128;
                (0..*span as i128).contains(&offset).then_some(offset as usize)
            }
            LevelIndex::Ranked(distinct) => distinct.binary_search(&level).ok(),
        }
    }

    #[inline]
    fn level(&self, slot: usize) -> i64 {
        match self {
            LevelIndex::Dense { min, .. } => min + slot as i64,
            LevelIndex::Ranked(distinct) => distinct[slot],
        }
    }
}

/// Count of samples per level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelHistogram {
    index: LevelIndex,
    counts: Vec<usize>,
}

impl LevelHistogram {
    /// Build the histogram of the non-excluded levels
    ///
    /// Returns `None` when every level is excluded.
    pub fn from_levels(levels: &[i64]) -> Option<Self> {
        let index = LevelIndex::from_levels(levels)?;
        let slots = index.len();
        let tally = |counts: &mut [usize], chunk: &[i64]| {
            for &l in chunk {
                if let Some(slot) = index.slot(l) {
                    counts[slot] += 1;
                }
            }
        };

        #[cfg(feature = "parallel")]
        let counts = levels
            .par_chunks(1 << 16)
            .fold(
                || vec![0usize; slots],
                |mut acc, chunk| {
                    tally(acc.as_mut_slice(), chunk);
                    acc
                },
            )
            .reduce(
                || vec![0usize; slots],
                |mut a, b| {
                    a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                    a
                },
            );

        #[cfg(not(feature = "parallel"))]
        let counts = {
            let mut counts = vec![0usize; slots];
            tally(counts.as_mut_slice(), levels);
            counts
        };

        Some(LevelHistogram { index, counts })
    }

    /// Lowest level present
    pub fn min_level(&self) -> i64 {
        self.index.level(0)
    }

    /// Highest level present
    pub fn max_level(&self) -> i64 {
        self.index.level(self.counts.len() - 1)
    }

    /// Number of samples at `level`
    pub fn count(&self, level: i64) -> usize {
        self.index.slot(level).map_or(0, |slot| self.counts[slot])
    }

    /// Total number of counted samples
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Starting position of each level's run in a sorted permutation
    fn starts(&self, order: FloodOrder) -> Vec<usize> {
        let mut starts = vec![0usize; self.counts.len()];
        let mut running = 0usize;
        match order {
            FloodOrder::Ascending => {
                for (start, &count) in starts.iter_mut().zip(&self.counts) {
                    *start = running;
                    running += count;
                }
            }
            FloodOrder::Descending => {
                for (start, &count) in starts.iter_mut().zip(&self.counts).rev() {
                    *start = running;
                    running += count;
                }
            }
        }
        starts
    }
}

/// Stable counting sort of sample indices by level
///
/// Indices with [`EXCLUDED_LEVEL`] are omitted. Ties keep ascending index
/// order.
pub fn sort_by_level(levels: &[i64], order: FloodOrder) -> Vec<usize> {
    let Some(histogram) = LevelHistogram::from_levels(levels) else {
        return Vec::new();
    };

    let mut next = histogram.starts(order);
    let mut sorted = vec![0usize; histogram.total()];
    for (i, &l) in levels.iter().enumerate() {
        let Some(slot) = histogram.index.slot(l) else {
            continue;
        };
        sorted[next[slot]] = i;
        next[slot] += 1;
    }
    sorted
}

/// Hierarchical queue: one FIFO bucket per level
///
/// Pops always come from the lowest (ascending) or highest (descending)
/// non-empty bucket; within a bucket, entries leave in insertion order.
#[derive(Debug, Clone)]
pub struct BucketQueue {
    buckets: Vec<VecDeque<usize>>,
    index: LevelIndex,
    order: FloodOrder,
    cursor: usize,
    len: usize,
}

impl BucketQueue {
    /// Create an empty queue covering levels `min_level..=max_level`
    ///
    /// # Errors
    ///
    /// Returns `RegionError::LevelRangeTooLarge` if the range is wider than
    /// [`MAX_LEVEL_RANGE`], and `RegionError::InvalidParameters` if
    /// `min_level > max_level`.
    pub fn new(min_level: i64, max_level: i64, order: FloodOrder) -> RegionResult<Self> {
        if min_level > max_level {
            return Err(RegionError::InvalidParameters(format!(
                "empty level range {}..={}",
                min_level, max_level
            )));
        }
        let span = check_range(min_level, max_level)?;
        Ok(Self::from_index(
            LevelIndex::Dense {
                min: min_level,
                span,
            },
            order,
        ))
    }

    /// Create an empty queue for exactly the non-excluded `levels`
    ///
    /// Never fails on wide ranges: past [`MAX_LEVEL_RANGE`] only the
    /// distinct levels present get a bucket.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidParameters` if every level is excluded.
    pub fn with_levels(levels: &[i64], order: FloodOrder) -> RegionResult<Self> {
        let index = LevelIndex::from_levels(levels).ok_or_else(|| {
            RegionError::InvalidParameters("bucket queue needs at least one level".to_string())
        })?;
        Ok(Self::from_index(index, order))
    }

    fn from_index(index: LevelIndex, order: FloodOrder) -> Self {
        let slots = index.len();
        log::trace!(
            "bucket queue: {} buckets from level {} ({:?})",
            slots,
            index.level(0),
            order
        );
        let cursor = match order {
            FloodOrder::Ascending => slots - 1,
            FloodOrder::Descending => 0,
        };
        BucketQueue {
            buckets: vec![VecDeque::new(); slots],
            index,
            order,
            cursor,
            len: 0,
        }
    }

    /// Lowest level the queue accepts
    pub fn min_level(&self) -> i64 {
        self.index.level(0)
    }

    /// Highest level the queue accepts
    pub fn max_level(&self) -> i64 {
        self.index.level(self.buckets.len() - 1)
    }

    /// Number of queued entries
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no entries are queued
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True while some bucket still holds an entry
    #[inline]
    pub fn has_next(&self) -> bool {
        self.len > 0
    }

    /// Append `index` to the bucket for `level`
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidParameters` if the queue has no bucket
    /// for `level`; the queue is left unchanged.
    pub fn push(&mut self, index: usize, level: i64) -> RegionResult<()> {
        let pos = self.index.slot(level).ok_or_else(|| {
            RegionError::InvalidParameters(format!(
                "level {} has no bucket in {}..={}",
                level,
                self.min_level(),
                self.max_level()
            ))
        })?;

        self.buckets[pos].push_back(index);
        self.len += 1;
        match self.order {
            FloodOrder::Ascending if pos < self.cursor => self.cursor = pos,
            FloodOrder::Descending if pos > self.cursor => self.cursor = pos,
            _ => {}
        }
        Ok(())
    }

    /// Pop the oldest entry of the current extreme level
    ///
    /// Returns the index together with the level it was queued at.
    pub fn pop(&mut self) -> Option<(usize, i64)> {
        if self.len == 0 {
            return None;
        }
        while self.buckets[self.cursor].is_empty() {
            match self.order {
                FloodOrder::Ascending => self.cursor += 1,
                FloodOrder::Descending => self.cursor -= 1,
            }
        }
        let index = self.buckets[self.cursor].pop_front()?;
        self.len -= 1;
        Some((index, self.index.level(self.cursor)))
    }
}
