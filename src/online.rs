//! Streaming (online) tree induction.
//!
//! The online learner consumes examples one at a time: each example is routed
//! to its leaf, the leaf's candidate statistics absorb the label, and the
//! leaf splits in place once a candidate accumulates enough evidence. Unlike
//! the batch variants there is no terminal state — growth is an open-ended
//! fold over the input sequence.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Poisson};
use tracing::{debug, instrument};

use crate::TreeError;
use crate::config::{OnlineConfig, resolve_n_features};
use crate::dataset::Dataset;
use crate::histogram::ClassHistogram;
use crate::node::{NodeIndex, SplitRule};
use crate::split::sample_distinct;
use crate::threshold::ThresholdGenerator;
use crate::tree::Tree;

/// Bound on re-draws when two sampled thresholds land too close together.
const MAX_THRESHOLD_RETRIES: usize = 10;

/// Candidate statistics of one growing leaf.
///
/// One left/right histogram pair per (feature, threshold) candidate, flat
/// indexed as `threshold + n_thresholds * feature`. Dropped wholesale the
/// moment the leaf becomes internal.
#[derive(Debug, Clone)]
struct LeafStats {
    features: Vec<usize>,
    /// `thresholds[f]` holds the candidate thresholds for `features[f]`.
    thresholds: Vec<Vec<f64>>,
    total: ClassHistogram,
    left: Vec<ClassHistogram>,
    right: Vec<ClassHistogram>,
}

/// A tree under online growth: the node store plus per-leaf candidate
/// statistics.
#[derive(Debug, Clone)]
pub struct OnlineTree {
    tree: Tree,
    stats: Vec<Option<LeafStats>>,
}

impl OnlineTree {
    /// Create a tree with a single root leaf predicting the uniform
    /// distribution.
    #[must_use]
    pub fn new(dimensionality: usize, n_classes: usize) -> Self {
        let mut tree = Tree::new(dimensionality, n_classes);
        let uniform = ClassHistogram::new(n_classes).smoothed_log_posterior(1.0);
        tree.make_leaf(NodeIndex::new(0), uniform);
        Self { tree, stats: vec![None] }
    }

    /// Read access to the underlying tree.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Discard the candidate statistics and keep the grown tree.
    #[must_use]
    pub fn into_tree(self) -> Tree {
        self.tree
    }
}

/// Streaming tree learner.
///
/// Owns its seeded RNG and threshold generator, so independent learners can
/// run concurrently with reproducible randomness.
#[derive(Debug)]
pub struct OnlineLearner<G: ThresholdGenerator> {
    config: OnlineConfig,
    generator: G,
    poisson: Option<Poisson<f64>>,
    rng: ChaCha8Rng,
    n_features: usize,
}

impl<G: ThresholdGenerator> OnlineLearner<G> {
    /// Create a learner from a config and a threshold generator.
    ///
    /// # Errors
    ///
    /// | Variant                               | When                                   |
    /// |---------------------------------------|----------------------------------------|
    /// | [`TreeError::InvalidFeatureCount`]    | resolved `n_features` outside `[1, D]` |
    /// | [`TreeError::InvalidBootstrapLambda`] | `bootstrap_lambda` not positive finite |
    pub fn new(config: OnlineConfig, generator: G) -> Result<Self, TreeError> {
        let dimensionality = generator.dimensionality();
        let n_features = resolve_n_features(config.n_features, dimensionality);
        if n_features == 0 || n_features > dimensionality {
            return Err(TreeError::InvalidFeatureCount { n_features, dimensionality });
        }
        let poisson = match config.bootstrap_lambda {
            None => None,
            Some(lambda) => {
                if !lambda.is_finite() {
                    return Err(TreeError::InvalidBootstrapLambda { lambda });
                }
                Some(
                    Poisson::new(lambda)
                        .map_err(|_| TreeError::InvalidBootstrapLambda { lambda })?,
                )
            }
        };
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self { config, generator, poisson, rng, n_features })
    }

    /// Return the config this learner was built from.
    #[must_use]
    pub fn config(&self) -> &OnlineConfig {
        &self.config
    }

    /// Create an empty tree matching this learner's feature space.
    #[must_use]
    pub fn new_tree(&self, n_classes: usize) -> OnlineTree {
        OnlineTree::new(self.generator.dimensionality(), n_classes)
    }

    /// Fold an entire dataset, in row order, into the tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::ThresholdDimensionMismatch`] when the threshold
    /// generator and the dataset disagree on dimensionality, before any
    /// example is consumed.
    #[instrument(skip_all, fields(n_examples = dataset.len()))]
    pub fn fit_stream<D: Dataset>(
        &mut self,
        tree: &mut OnlineTree,
        dataset: &D,
    ) -> Result<(), TreeError> {
        if self.generator.dimensionality() != dataset.dimensionality() {
            return Err(TreeError::ThresholdDimensionMismatch {
                generator: self.generator.dimensionality(),
                dataset: dataset.dimensionality(),
            });
        }
        for i in 0..dataset.len() {
            self.observe(tree, dataset.point(i), dataset.label(i))?;
        }
        debug!(n_nodes = tree.tree().n_nodes(), "stream consumed");
        Ok(())
    }

    /// Consume a single labeled example.
    ///
    /// # Errors
    ///
    /// | Variant                                   | When                                          |
    /// |-------------------------------------------|-----------------------------------------------|
    /// | [`TreeError::ThresholdDimensionMismatch`] | generator and tree disagree on dimensionality |
    /// | [`TreeError::DimensionMismatch`]          | `x` has the wrong dimensionality              |
    pub fn observe(
        &mut self,
        tree: &mut OnlineTree,
        x: &[f64],
        label: usize,
    ) -> Result<(), TreeError> {
        // Candidate features are sampled from the generator's space, so a
        // wider generator would index past the end of `x` mid-update.
        if self.generator.dimensionality() != tree.tree.dimensionality() {
            return Err(TreeError::ThresholdDimensionMismatch {
                generator: self.generator.dimensionality(),
                dataset: tree.tree.dimensionality(),
            });
        }
        let leaf = tree.tree.find_leaf(x)?;
        let depth = tree.tree.node(leaf).depth();
        let n_classes = tree.tree.n_classes();

        if tree.stats[leaf.index()].is_none() {
            tree.stats[leaf.index()] = Some(self.fresh_stats(n_classes));
        }

        // Online bootstrap: replicate the update K ~ Poisson(λ) times.
        let replications = match &self.poisson {
            None => 1,
            Some(poisson) => poisson.sample(&mut self.rng) as usize,
        };

        let stats = tree.stats[leaf.index()]
            .as_mut()
            .expect("leaf statistics initialized above");
        for _ in 0..replications {
            stats.total.add_one(label);
            for (f, &feature) in stats.features.iter().enumerate() {
                for (t, &threshold) in stats.thresholds[f].iter().enumerate() {
                    let pair = t + self.config.n_thresholds * f;
                    if x[feature] < threshold {
                        stats.left[pair].add_one(label);
                    } else {
                        stats.right[pair].add_one(label);
                    }
                }
            }
        }

        // Leaf-stop test, mirroring the batch driver.
        if stats.total.mass() < self.config.min_split_examples
            || stats.total.is_pure()
            || depth >= self.config.max_depth
        {
            let log_probs = stats.total.smoothed_log_posterior(self.config.smoothing);
            tree.tree.make_leaf(leaf, log_probs);
            return Ok(());
        }

        // Scan the candidates with enough mass on both sides for the best
        // normalized information gain.
        let mut best_gain = 0.0;
        let mut best_pair: Option<(usize, usize)> = None;
        let node_entropy = stats.total.entropy();
        let node_mass = stats.total.mass() as f64;
        for f in 0..stats.features.len() {
            for t in 0..stats.thresholds[f].len() {
                let pair = t + self.config.n_thresholds * f;
                let left_mass = stats.left[pair].mass();
                let right_mass = stats.right[pair].mass();
                if left_mass > self.config.min_child_examples
                    && right_mass > self.config.min_child_examples
                {
                    let gain = (node_entropy
                        - stats.left[pair].entropy()
                        - stats.right[pair].entropy())
                        / node_mass;
                    if gain > best_gain {
                        best_gain = gain;
                        best_pair = Some((f, t));
                    }
                }
            }
        }

        let winner = best_pair.filter(|_| best_gain >= self.config.min_split_objective);
        let Some((f, t)) = winner else {
            let log_probs = stats.total.smoothed_log_posterior(self.config.smoothing);
            tree.tree.make_leaf(leaf, log_probs);
            return Ok(());
        };

        // Commit: the leaf becomes internal, children are seeded directly
        // from the winning candidate pair, and every candidate statistic is
        // discarded.
        let pair = t + self.config.n_thresholds * f;
        let rule = SplitRule::AxisAligned {
            feature: stats.features[f],
            threshold: stats.thresholds[f][t],
        };
        let stats = tree.stats[leaf.index()]
            .take()
            .expect("winning leaf owns its statistics");

        let left = tree.tree.split_node(leaf, rule);
        let right = NodeIndex::new(left.index() + 1);
        tree.tree.make_leaf(
            left,
            stats.left[pair].smoothed_log_posterior(self.config.smoothing),
        );
        tree.tree.make_leaf(
            right,
            stats.right[pair].smoothed_log_posterior(self.config.smoothing),
        );
        tree.stats.push(None);
        tree.stats.push(None);

        debug!(
            node = leaf.index(),
            gain = best_gain,
            n_nodes = tree.tree.n_nodes(),
            "leaf split in place"
        );
        Ok(())
    }

    /// Sample the candidate set for a freshly visited leaf.
    fn fresh_stats(&mut self, n_classes: usize) -> LeafStats {
        let dimensionality = self.generator.dimensionality();
        let n_thresholds = self.config.n_thresholds;
        let features = sample_distinct(dimensionality, self.n_features, &mut self.rng);

        let mut thresholds = Vec::with_capacity(features.len());
        for &feature in &features {
            let mut values: Vec<f64> = Vec::with_capacity(n_thresholds);
            for t in 0..n_thresholds {
                let mut value = self.generator.sample(feature, &mut self.rng);
                if t > 0 {
                    // Re-draw when the new threshold is nearly identical to
                    // the previous one.
                    let mut retries = 0;
                    while (value - values[t - 1]).abs() < 1e-6
                        && retries < MAX_THRESHOLD_RETRIES
                    {
                        value = self.generator.sample(feature, &mut self.rng);
                        retries += 1;
                    }
                }
                values.push(value);
            }
            thresholds.push(values);
        }

        let n_pairs = features.len() * n_thresholds;
        LeafStats {
            features,
            thresholds,
            total: ClassHistogram::new(n_classes),
            left: vec![ClassHistogram::new(n_classes); n_pairs],
            right: vec![ClassHistogram::new(n_classes); n_pairs],
        }
    }
}
