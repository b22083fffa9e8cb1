//! Configuration builders for the batch and online tree learners.

/// Candidate-generation strategy used by the batch growth driver.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SplitStrategy {
    /// Exhaustive threshold sweep over a random feature subset.
    AxisAligned,
    /// Random sparse ±1 projections with the threshold fixed at zero.
    SparseProjection {
        /// Number of non-zero dimensions per projection.
        sparsity: usize,
    },
    /// Perpendicular-bisector hyperplanes between two sampled reference
    /// points of distinct classes.
    Hyperplane,
}

/// Whether to resample the dataset before growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BootstrapMode {
    /// Grow on the dataset as-is.
    Disabled,
    /// Draw examples with replacement before growth, then refit the leaf
    /// histograms from the full original dataset afterwards.
    Enabled {
        /// Number of examples to draw; `None` means the dataset size.
        n_examples: Option<usize>,
    },
}

/// Configuration for the batch tree learners.
///
/// Construct via [`GrowthConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter            | Default              |
/// |----------------------|----------------------|
/// | `strategy`           | `AxisAligned`        |
/// | `n_features`         | `None` (`⌈√D⌉`)      |
/// | `max_depth`          | 100                  |
/// | `min_split_examples` | 2                    |
/// | `min_child_examples` | 1                    |
/// | `smoothing`          | 1e-4                 |
/// | `bootstrap`          | `Disabled`           |
/// | `seed`               | 42                   |
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GrowthConfig {
    pub(crate) strategy: SplitStrategy,
    pub(crate) n_features: Option<usize>,
    pub(crate) max_depth: usize,
    pub(crate) min_split_examples: usize,
    pub(crate) min_child_examples: usize,
    pub(crate) smoothing: f64,
    pub(crate) bootstrap: BootstrapMode,
    pub(crate) seed: u64,
}

impl GrowthConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategy: SplitStrategy::AxisAligned,
            n_features: None,
            max_depth: 100,
            min_split_examples: 2,
            min_child_examples: 1,
            smoothing: 1e-4,
            bootstrap: BootstrapMode::Disabled,
            seed: 42,
        }
    }

    /// Set the candidate-generation strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the number of split candidates evaluated per node.
    ///
    /// For the axis-aligned strategy this is the number of features sampled
    /// without replacement; for the oblique strategies it is the number of
    /// random trials. `None` resolves to `⌈√D⌉`.
    #[must_use]
    pub fn with_n_features(mut self, n_features: Option<usize>) -> Self {
        self.n_features = n_features;
        self
    }

    /// Set the maximum tree depth (root depth is 0).
    ///
    /// A value of 0 forces the root to be a leaf.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of examples required to attempt a split.
    #[must_use]
    pub fn with_min_split_examples(mut self, min_split_examples: usize) -> Self {
        self.min_split_examples = min_split_examples;
        self
    }

    /// Set the minimum number of examples required in each child.
    #[must_use]
    pub fn with_min_child_examples(mut self, min_child_examples: usize) -> Self {
        self.min_child_examples = min_child_examples;
        self
    }

    /// Set the Laplace smoothing parameter for leaf probabilities.
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the bootstrap mode.
    #[must_use]
    pub fn with_bootstrap(mut self, bootstrap: BootstrapMode) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the candidate-generation strategy.
    #[must_use]
    pub fn strategy(&self) -> SplitStrategy {
        self.strategy
    }

    /// Return the configured candidate count per split, if set.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    /// Return the maximum depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the minimum examples required to split a node.
    #[must_use]
    pub fn min_split_examples(&self) -> usize {
        self.min_split_examples
    }

    /// Return the minimum examples required in each child.
    #[must_use]
    pub fn min_child_examples(&self) -> usize {
        self.min_child_examples
    }

    /// Return the leaf smoothing parameter.
    #[must_use]
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Return the bootstrap mode.
    #[must_use]
    pub fn bootstrap(&self) -> BootstrapMode {
        self.bootstrap
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the streaming (online) tree learner.
///
/// Construct via [`OnlineConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter             | Default             |
/// |-----------------------|---------------------|
/// | `n_features`          | `None` (`⌈√D⌉`)     |
/// | `n_thresholds`        | 10                  |
/// | `max_depth`           | 100                 |
/// | `min_split_examples`  | 2                   |
/// | `min_child_examples`  | 1                   |
/// | `min_split_objective` | 0.1                 |
/// | `smoothing`           | 1e-4                |
/// | `bootstrap_lambda`    | `None` (disabled)   |
/// | `seed`                | 42                  |
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OnlineConfig {
    pub(crate) n_features: Option<usize>,
    pub(crate) n_thresholds: usize,
    pub(crate) max_depth: usize,
    pub(crate) min_split_examples: usize,
    pub(crate) min_child_examples: usize,
    pub(crate) min_split_objective: f64,
    pub(crate) smoothing: f64,
    pub(crate) bootstrap_lambda: Option<f64>,
    pub(crate) seed: u64,
}

impl OnlineConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_features: None,
            n_thresholds: 10,
            max_depth: 100,
            min_split_examples: 2,
            min_child_examples: 1,
            min_split_objective: 0.1,
            smoothing: 1e-4,
            bootstrap_lambda: None,
            seed: 42,
        }
    }

    /// Set the number of candidate features sampled per fresh leaf.
    ///
    /// `None` resolves to `⌈√D⌉`.
    #[must_use]
    pub fn with_n_features(mut self, n_features: Option<usize>) -> Self {
        self.n_features = n_features;
        self
    }

    /// Set the number of candidate thresholds sampled per feature.
    #[must_use]
    pub fn with_n_thresholds(mut self, n_thresholds: usize) -> Self {
        self.n_thresholds = n_thresholds;
        self
    }

    /// Set the maximum tree depth (root depth is 0).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum leaf mass required to attempt a split.
    #[must_use]
    pub fn with_min_split_examples(mut self, min_split_examples: usize) -> Self {
        self.min_split_examples = min_split_examples;
        self
    }

    /// Set the candidate mass both children must exceed before a split is
    /// considered.
    #[must_use]
    pub fn with_min_child_examples(mut self, min_child_examples: usize) -> Self {
        self.min_child_examples = min_child_examples;
        self
    }

    /// Set the minimum information gain required to commit a split.
    #[must_use]
    pub fn with_min_split_objective(mut self, min_split_objective: f64) -> Self {
        self.min_split_objective = min_split_objective;
        self
    }

    /// Set the Laplace smoothing parameter for leaf probabilities.
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the online-bootstrap Poisson rate.
    ///
    /// `Some(λ)` replicates each update `K ~ Poisson(λ)` times (`K` may be
    /// zero, skipping the example). `None` applies every update exactly once.
    #[must_use]
    pub fn with_bootstrap_lambda(mut self, bootstrap_lambda: Option<f64>) -> Self {
        self.bootstrap_lambda = bootstrap_lambda;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the configured candidate feature count, if set.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    /// Return the number of candidate thresholds per feature.
    #[must_use]
    pub fn n_thresholds(&self) -> usize {
        self.n_thresholds
    }

    /// Return the maximum depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the minimum leaf mass required to attempt a split.
    #[must_use]
    pub fn min_split_examples(&self) -> usize {
        self.min_split_examples
    }

    /// Return the candidate mass both children must exceed.
    #[must_use]
    pub fn min_child_examples(&self) -> usize {
        self.min_child_examples
    }

    /// Return the minimum information gain required to commit a split.
    #[must_use]
    pub fn min_split_objective(&self) -> f64 {
        self.min_split_objective
    }

    /// Return the leaf smoothing parameter.
    #[must_use]
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Return the online-bootstrap Poisson rate, if enabled.
    #[must_use]
    pub fn bootstrap_lambda(&self) -> Option<f64> {
        self.bootstrap_lambda
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for OnlineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve an optional candidate count against the dataset dimensionality.
///
/// `None` resolves to `⌈√D⌉`, clamped to at least 1.
pub(crate) fn resolve_n_features(n_features: Option<usize>, dimensionality: usize) -> usize {
    match n_features {
        Some(n) => n,
        None => ((dimensionality as f64).sqrt().ceil() as usize).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::{GrowthConfig, OnlineConfig, SplitStrategy, resolve_n_features};

    #[test]
    fn growth_builder_chains() {
        let cfg = GrowthConfig::new()
            .with_strategy(SplitStrategy::Hyperplane)
            .with_n_features(Some(5))
            .with_max_depth(7)
            .with_min_split_examples(4)
            .with_min_child_examples(2)
            .with_smoothing(1.0)
            .with_seed(7);
        assert_eq!(cfg.strategy(), SplitStrategy::Hyperplane);
        assert_eq!(cfg.n_features(), Some(5));
        assert_eq!(cfg.max_depth(), 7);
        assert_eq!(cfg.min_split_examples(), 4);
        assert_eq!(cfg.min_child_examples(), 2);
        assert!((cfg.smoothing() - 1.0).abs() < f64::EPSILON);
        assert_eq!(cfg.seed(), 7);
    }

    #[test]
    fn online_builder_chains() {
        let cfg = OnlineConfig::new()
            .with_n_thresholds(3)
            .with_min_split_objective(0.5)
            .with_bootstrap_lambda(Some(1.0));
        assert_eq!(cfg.n_thresholds(), 3);
        assert!((cfg.min_split_objective() - 0.5).abs() < f64::EPSILON);
        assert_eq!(cfg.bootstrap_lambda(), Some(1.0));
    }

    #[test]
    fn default_feature_count_is_sqrt() {
        assert_eq!(resolve_n_features(None, 16), 4);
        assert_eq!(resolve_n_features(None, 10), 4);
        assert_eq!(resolve_n_features(None, 1), 1);
        assert_eq!(resolve_n_features(Some(9), 4), 9);
    }
}
