//! Candidate-threshold generation for the online learner.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::dataset::Dataset;

/// Source of candidate threshold values, one feature at a time.
///
/// The online learner cannot sort a partition the way the batch sweep does,
/// so fresh leaves draw their candidate thresholds from a generator that
/// knows each feature's plausible range.
pub trait ThresholdGenerator {
    /// Feature space covered; must equal the dataset dimensionality.
    fn dimensionality(&self) -> usize;

    /// Draw one candidate threshold for `feature`.
    fn sample(&self, feature: usize, rng: &mut ChaCha8Rng) -> f64;
}

/// Uniform thresholds over a per-feature `[min, max]` range.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UniformThresholdGenerator {
    ranges: Vec<(f64, f64)>,
}

impl UniformThresholdGenerator {
    /// Build a generator from explicit per-feature ranges.
    #[must_use]
    pub fn new(ranges: Vec<(f64, f64)>) -> Self {
        Self { ranges }
    }

    /// Build a generator from the observed per-feature ranges of a dataset.
    #[must_use]
    pub fn from_dataset<D: Dataset>(dataset: &D) -> Self {
        let d = dataset.dimensionality();
        let mut ranges = vec![(f64::INFINITY, f64::NEG_INFINITY); d];
        for i in 0..dataset.len() {
            let point = dataset.point(i);
            for (f, range) in ranges.iter_mut().enumerate() {
                range.0 = range.0.min(point[f]);
                range.1 = range.1.max(point[f]);
            }
        }
        Self { ranges }
    }
}

impl ThresholdGenerator for UniformThresholdGenerator {
    fn dimensionality(&self) -> usize {
        self.ranges.len()
    }

    fn sample(&self, feature: usize, rng: &mut ChaCha8Rng) -> f64 {
        let (lo, hi) = self.ranges[feature];
        // Constant features collapse to a single value.
        if hi <= lo {
            return lo;
        }
        lo + rng.r#gen::<f64>() * (hi - lo)
    }
}
