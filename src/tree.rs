//! Array-backed decision tree store.

use crate::TreeError;
use crate::node::{Node, NodeIndex, NodeKind, SplitRule};

/// A decision tree stored as a flat `Vec<Node>` with index references.
///
/// The root is node 0. Splitting a node allocates its children as a
/// contiguous pair, so the right child of an internal node always sits at
/// `left + 1` — node-id assignment order is part of the determinism contract
/// of the growth loop.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) dimensionality: usize,
    pub(crate) n_classes: usize,
}

impl Tree {
    /// Create a tree with a single pending root node.
    pub(crate) fn new(dimensionality: usize, n_classes: usize) -> Self {
        Self {
            nodes: vec![Node { depth: 0, kind: NodeKind::Pending }],
            dimensionality,
            n_classes,
        }
    }

    /// Return the dimensionality this tree was grown on.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    /// Return the number of classes this tree predicts over.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Return the total number of nodes in the store.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum node depth (0 for a single-leaf tree).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Return the root index.
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        NodeIndex::new(0)
    }

    /// Return a node by index.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    /// Resolve a node into a leaf, replacing any previous payload.
    pub(crate) fn make_leaf(&mut self, index: NodeIndex, log_probs: Vec<f64>) {
        let node = &mut self.nodes[index.index()];
        node.kind = NodeKind::Leaf { log_probs };
    }

    /// Resolve a node into a split, allocating the contiguous child pair.
    ///
    /// Returns the left child index; the right child is `left + 1`. Both
    /// children start out pending.
    pub(crate) fn split_node(&mut self, index: NodeIndex, rule: SplitRule) -> NodeIndex {
        let child_depth = self.nodes[index.index()].depth + 1;
        let left = NodeIndex::new(self.nodes.len());
        self.nodes.push(Node { depth: child_depth, kind: NodeKind::Pending });
        self.nodes.push(Node { depth: child_depth, kind: NodeKind::Pending });
        self.nodes[index.index()].kind = NodeKind::Split { rule, left };
        left
    }

    /// Walk the decision functions from the root and return the reached leaf.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DimensionMismatch`] when `x.len()` differs from
    /// the dimensionality the tree was grown on.
    pub fn find_leaf(&self, x: &[f64]) -> Result<NodeIndex, TreeError> {
        if x.len() != self.dimensionality {
            return Err(TreeError::DimensionMismatch {
                expected: self.dimensionality,
                got: x.len(),
            });
        }
        let mut index = NodeIndex::new(0);
        loop {
            match &self.nodes[index.index()].kind {
                NodeKind::Leaf { .. } => return Ok(index),
                NodeKind::Split { rule, left } => {
                    index = if rule.goes_left(x) {
                        *left
                    } else {
                        NodeIndex::new(left.index() + 1)
                    };
                }
                NodeKind::Pending => unreachable!("growth resolves every node"),
            }
        }
    }

    /// Return the smoothed class log-probability vector of the leaf reached
    /// by `x`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DimensionMismatch`] when `x.len()` differs from
    /// the dimensionality the tree was grown on.
    pub fn log_posterior(&self, x: &[f64]) -> Result<&[f64], TreeError> {
        let leaf = self.find_leaf(x)?;
        match &self.nodes[leaf.index()].kind {
            NodeKind::Leaf { log_probs } => Ok(log_probs),
            _ => unreachable!("find_leaf always ends at a leaf"),
        }
    }
}
