//! The dataset interface the learners consume, plus two concrete providers.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::TreeError;

/// Labeled numeric dataset, the external collaborator every learner reads.
///
/// Implementations expose examples by integer row id; labels are zero-based
/// class ids in `[0, n_classes)`.
pub trait Dataset {
    /// Number of examples.
    fn len(&self) -> usize;

    /// Return `true` when the dataset holds no examples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Feature dimensionality `D`.
    fn dimensionality(&self) -> usize;

    /// Number of classes `C`.
    fn n_classes(&self) -> usize;

    /// Feature vector of example `index`, length `D`.
    fn point(&self, index: usize) -> &[f64];

    /// Class label of example `index`, in `[0, C)`.
    fn label(&self, index: usize) -> usize;
}

/// In-memory row-major dataset with validated construction.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MemoryDataset {
    points: Vec<Vec<f64>>,
    labels: Vec<usize>,
    n_classes: usize,
}

impl MemoryDataset {
    /// Build a dataset from row-major features and zero-based labels.
    ///
    /// The class count is `max(labels) + 1`.
    ///
    /// # Errors
    ///
    /// | Variant                             | When                           |
    /// |-------------------------------------|--------------------------------|
    /// | [`TreeError::EmptyDataset`]         | `points` is empty              |
    /// | [`TreeError::ZeroFeatures`]         | rows have zero feature columns |
    /// | [`TreeError::LabelCountMismatch`]   | `labels.len() != points.len()` |
    /// | [`TreeError::FeatureCountMismatch`] | rows have inconsistent lengths |
    /// | [`TreeError::NonFiniteValue`]       | any value is NaN or infinite   |
    pub fn from_rows(points: Vec<Vec<f64>>, labels: Vec<usize>) -> Result<Self, TreeError> {
        if points.is_empty() {
            return Err(TreeError::EmptyDataset);
        }
        let dimensionality = points[0].len();
        if dimensionality == 0 {
            return Err(TreeError::ZeroFeatures);
        }
        if labels.len() != points.len() {
            return Err(TreeError::LabelCountMismatch {
                expected: points.len(),
                got: labels.len(),
            });
        }
        for (example_index, row) in points.iter().enumerate() {
            if row.len() != dimensionality {
                return Err(TreeError::FeatureCountMismatch {
                    expected: dimensionality,
                    got: row.len(),
                    example_index,
                });
            }
            for (feature_index, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(TreeError::NonFiniteValue {
                        example_index,
                        feature_index,
                    });
                }
            }
        }
        let n_classes = labels.iter().max().copied().unwrap_or(0) + 1;
        Ok(Self { points, labels, n_classes })
    }
}

impl Dataset for MemoryDataset {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn dimensionality(&self) -> usize {
        self.points[0].len()
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn point(&self, index: usize) -> &[f64] {
        &self.points[index]
    }

    fn label(&self, index: usize) -> usize {
        self.labels[index]
    }
}

/// Resampled-with-replacement view over a base dataset.
///
/// Holds the drawn row ids plus the inclusion mask over the base dataset,
/// used by ensemble-level collaborators (out-of-bag bookkeeping). Growth runs
/// entirely against this view; the post-growth refinement pass deliberately
/// rescans the full base dataset and ignores the mask.
#[derive(Debug)]
pub struct BootstrapSample<'a, D: Dataset> {
    base: &'a D,
    indices: Vec<usize>,
    in_bag: Vec<bool>,
}

impl<'a, D: Dataset> BootstrapSample<'a, D> {
    /// Draw `n` examples with replacement from `base`.
    pub fn draw(base: &'a D, n: usize, rng: &mut ChaCha8Rng) -> Self {
        let mut in_bag = vec![false; base.len()];
        let mut indices = Vec::with_capacity(n);
        for _ in 0..n {
            let row = rng.gen_range(0..base.len());
            indices.push(row);
            in_bag[row] = true;
        }
        Self { base, indices, in_bag }
    }

    /// Return the inclusion mask over the base dataset: `true` where the base
    /// example was drawn at least once.
    #[must_use]
    pub fn inclusion_mask(&self) -> &[bool] {
        &self.in_bag
    }
}

impl<D: Dataset> Dataset for BootstrapSample<'_, D> {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn dimensionality(&self) -> usize {
        self.base.dimensionality()
    }

    fn n_classes(&self) -> usize {
        self.base.n_classes()
    }

    fn point(&self, index: usize) -> &[f64] {
        self.base.point(self.indices[index])
    }

    fn label(&self, index: usize) -> usize {
        self.base.label(self.indices[index])
    }
}
