//! Post-growth leaf-histogram refinement.
//!
//! When a tree is grown on a bootstrap resample, its leaf probabilities are
//! estimated from the resampled counts. This pass re-estimates them from the
//! full original dataset by routing every example through the finished tree;
//! the topology is never touched.

use tracing::{debug, instrument};

use crate::TreeError;
use crate::dataset::Dataset;
use crate::histogram::ClassHistogram;
use crate::node::NodeKind;
use crate::tree::Tree;

impl Tree {
    /// Recompute every leaf's smoothed log-probability vector from `dataset`.
    ///
    /// Each example is routed from the root with the recorded decision
    /// functions and accumulated at its leaf; leaves no example reaches get
    /// the uniform smoothed vector. Split parameters and tree structure are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DimensionMismatch`] when the dataset
    /// dimensionality differs from the one the tree was grown on.
    #[instrument(skip_all, fields(n_nodes = self.n_nodes(), n_examples = dataset.len()))]
    pub fn refit_leaf_histograms<D: Dataset>(
        &mut self,
        dataset: &D,
        smoothing: f64,
    ) -> Result<(), TreeError> {
        if dataset.dimensionality() != self.dimensionality {
            return Err(TreeError::DimensionMismatch {
                expected: self.dimensionality,
                got: dataset.dimensionality(),
            });
        }

        let mut leaf_hists: Vec<Option<ClassHistogram>> = vec![None; self.n_nodes()];
        for i in 0..dataset.len() {
            let leaf = self.find_leaf(dataset.point(i))?;
            leaf_hists[leaf.index()]
                .get_or_insert_with(|| ClassHistogram::new(self.n_classes))
                .add_one(dataset.label(i));
        }

        let empty = ClassHistogram::new(self.n_classes);
        let mut refit = 0usize;
        for (index, hist) in leaf_hists.iter().enumerate() {
            if self.nodes[index].is_leaf() {
                let hist = hist.as_ref().unwrap_or(&empty);
                self.nodes[index].kind = NodeKind::Leaf {
                    log_probs: hist.smoothed_log_posterior(smoothing),
                };
                refit += 1;
            }
        }

        debug!(n_leaves = refit, "leaf histograms refit");
        Ok(())
    }
}
