//! Label grids produced by the labeling and flooding algorithms

use crate::error::RegionResult;
use crate::union_find::DisjointSet;
use floodlab_core::{Grid, LabelGrid, Shape};

/// A label grid together with its number of components
///
/// Label 0 is background; components are numbered `1..=count`.
#[derive(Debug, Clone, PartialEq)]
pub struct Labeling {
    /// Per-sample component label
    pub labels: LabelGrid,
    /// Number of components `K`
    pub count: u32,
}

impl Labeling {
    /// All-background labeling of `shape`
    pub fn empty(shape: &Shape) -> Self {
        Labeling {
            labels: Grid::filled(shape.clone(), 0),
            count: 0,
        }
    }

    /// Label the components of a flattened forest whose roots pass `keep`
    pub(crate) fn from_forest<F>(
        shape: &Shape,
        forest: &DisjointSet,
        keep: F,
    ) -> RegionResult<Self>
    where
        F: FnMut(usize) -> bool,
    {
        let (labels, count) = forest.assign_labels(keep);
        Ok(Labeling {
            labels: Grid::from_shape_data(shape.clone(), labels)?,
            count,
        })
    }

    /// Label at a coordinate
    pub fn label_at(&self, coord: &[usize]) -> Option<u32> {
        self.labels.get(coord)
    }

    /// Pixel count for each component
    ///
    /// The index in the vector corresponds to (label - 1).
    pub fn component_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.count as usize];
        for &label in self.labels.data() {
            if label > 0 && label <= self.count {
                sizes[label as usize - 1] += 1;
            }
        }
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_labeling() {
        let shape = Shape::new(&[3, 2]).unwrap();
        let labeling = Labeling::empty(&shape);
        assert_eq!(labeling.count, 0);
        assert!(labeling.labels.data().iter().all(|&l| l == 0));
        assert!(labeling.component_sizes().is_empty());
    }

    #[test]
    fn test_component_sizes() {
        let labels = Grid::from_data(&[5], vec![1u32, 1, 0, 2, 1]).unwrap();
        let labeling = Labeling { labels, count: 2 };
        assert_eq!(labeling.component_sizes(), vec![3, 1]);
        assert_eq!(labeling.label_at(&[3]), Some(2));
    }
}
