//! The batch growth driver shared by the three split-search variants.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument};

use crate::TreeError;
use crate::arena::PartitionArena;
use crate::config::{BootstrapMode, GrowthConfig, SplitStrategy, resolve_n_features};
use crate::dataset::{BootstrapSample, Dataset};
use crate::histogram::ClassHistogram;
use crate::node::NodeIndex;
use crate::oblique::{find_hyperplane_split, find_projection_split};
use crate::progress::GrowthProgress;
use crate::split::find_axis_split;
use crate::tree::Tree;

impl GrowthConfig {
    /// Grow a decision tree on the provided dataset.
    ///
    /// Growth is depth-first: a LIFO work list of pending nodes is drained,
    /// each popped node either becomes a leaf (too little mass, pure, depth
    /// budget exhausted, no usable candidate, or children too small) or is
    /// physically partitioned into a contiguous child pair. With bootstrap
    /// enabled, growth runs on a resampled view and the leaf histograms are
    /// refit from the full original dataset afterwards.
    ///
    /// # Errors
    ///
    /// | Variant                        | When                                      |
    /// |--------------------------------|-------------------------------------------|
    /// | [`TreeError::EmptyDataset`]    | the dataset holds no examples             |
    /// | [`TreeError::TooManyFeatures`] | resolved `n_features` is outside `[1, D]` |
    pub fn fit<D: Dataset>(&self, dataset: &D) -> Result<Tree, TreeError> {
        self.fit_inner(dataset, None)
    }

    /// Grow a decision tree, reporting progress along the way.
    ///
    /// `on_progress` is invoked with a [`GrowthProgress`] snapshot when
    /// growth starts, after every `every` resolved nodes, and once more on
    /// termination. The callback is purely observational.
    ///
    /// # Errors
    ///
    /// Same as [`GrowthConfig::fit`].
    pub fn fit_with_progress<D: Dataset>(
        &self,
        dataset: &D,
        every: usize,
        mut on_progress: impl FnMut(&GrowthProgress),
    ) -> Result<Tree, TreeError> {
        let callback: &mut dyn FnMut(&GrowthProgress) = &mut on_progress;
        self.fit_inner(dataset, Some((every.max(1), callback)))
    }

    #[instrument(skip_all, fields(n_examples = dataset.len(), strategy = ?self.strategy))]
    fn fit_inner<D: Dataset>(
        &self,
        dataset: &D,
        progress: Option<(usize, &mut dyn FnMut(&GrowthProgress))>,
    ) -> Result<Tree, TreeError> {
        if dataset.is_empty() {
            return Err(TreeError::EmptyDataset);
        }
        let dimensionality = dataset.dimensionality();
        let n_features = resolve_n_features(self.n_features, dimensionality);
        if n_features == 0 || n_features > dimensionality {
            return Err(TreeError::TooManyFeatures {
                requested: n_features,
                dimensionality,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let mut tree = match self.bootstrap {
            BootstrapMode::Disabled => grow(dataset, self, n_features, &mut rng, progress),
            BootstrapMode::Enabled { n_examples } => {
                let draw_count = n_examples.unwrap_or(dataset.len());
                let sample = BootstrapSample::draw(dataset, draw_count, &mut rng);
                grow(&sample, self, n_features, &mut rng, progress)
            }
        };

        if matches!(self.bootstrap, BootstrapMode::Enabled { .. }) {
            tree.refit_leaf_histograms(dataset, self.smoothing)?;
        }

        info!(
            n_nodes = tree.n_nodes(),
            n_leaves = tree.n_leaves(),
            depth = tree.depth(),
            "tree grown"
        );

        Ok(tree)
    }
}

/// Drain the work list until every node is a leaf or an internal split.
fn grow<D: Dataset>(
    storage: &D,
    config: &GrowthConfig,
    n_features: usize,
    rng: &mut ChaCha8Rng,
    mut progress: Option<(usize, &mut dyn FnMut(&GrowthProgress))>,
) -> Tree {
    let n_classes = storage.n_classes();
    let mut tree = Tree::new(storage.dimensionality(), n_classes);

    let mut arena = PartitionArena::new();
    arena.assign(NodeIndex::new(0), (0..storage.len()).collect());

    let mut work_list = vec![NodeIndex::new(0)];
    let mut state = GrowthProgress::start(storage.len());
    let mut resolved = 0usize;

    if let Some((_, on_progress)) = progress.as_mut() {
        on_progress(&state);
    }

    let mut hist = ClassHistogram::new(n_classes);

    while let Some(node) = work_list.pop() {
        let mut indices = arena.take(node);
        let depth = tree.node(node).depth();
        state.depth = state.depth.max(depth);

        hist.reset();
        for &i in &indices {
            hist.add_one(storage.label(i));
        }

        // Leaf-stop test: too little mass, pure, or depth budget exhausted.
        let must_stop = hist.mass() < config.min_split_examples
            || hist.is_pure()
            || depth >= config.max_depth;

        let candidate = if must_stop {
            None
        } else {
            match config.strategy {
                SplitStrategy::AxisAligned => {
                    find_axis_split(storage, &mut indices, &hist, n_features, rng)
                }
                SplitStrategy::SparseProjection { sparsity } => {
                    find_projection_split(storage, &indices, &hist, n_features, sparsity, rng)
                }
                SplitStrategy::Hyperplane => {
                    find_hyperplane_split(storage, &indices, &hist, n_features, rng)
                }
            }
        };

        // Degenerate-split test: no candidate, or a child would be too small.
        let split = candidate.filter(|c| {
            c.n_left >= config.min_child_examples && c.n_right >= config.min_child_examples
        });

        match split {
            None => {
                tree.make_leaf(node, hist.smoothed_log_posterior(config.smoothing));
                state.processed += indices.len();
            }
            Some(c) => {
                // Two-bucket scatter using the winning decision function.
                let mut left_indices = Vec::with_capacity(c.n_left);
                let mut right_indices = Vec::with_capacity(c.n_right);
                for &i in &indices {
                    if c.rule.goes_left(storage.point(i)) {
                        left_indices.push(i);
                    } else {
                        right_indices.push(i);
                    }
                }
                // A mismatch between search-time masses and the scatter means
                // the decision function routed an example inconsistently.
                assert_eq!(
                    left_indices.len(),
                    c.n_left,
                    "left partition residual: decision function and histogram disagree"
                );
                assert_eq!(
                    right_indices.len(),
                    c.n_right,
                    "right partition residual: decision function and histogram disagree"
                );

                let left = tree.split_node(node, c.rule);
                let right = NodeIndex::new(left.index() + 1);
                arena.assign(left, left_indices);
                arena.assign(right, right_indices);
                work_list.push(left);
                work_list.push(right);
            }
        }

        resolved += 1;
        state.n_nodes = tree.n_nodes();
        if let Some((every, on_progress)) = progress.as_mut()
            && resolved % *every == 0
        {
            on_progress(&state);
        }
    }

    state.terminated = true;
    if let Some((_, on_progress)) = progress.as_mut() {
        on_progress(&state);
    }

    debug!(n_nodes = tree.n_nodes(), "work list drained");
    tree
}
