use std::fmt;

/// Index into a tree's `Vec<Node>` store, identifying a specific node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Create a new node index from a zero-based store position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based store index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decision function of an internal node.
///
/// The three batch learner variants differ only in the shape of their split
/// parameters, so the node store carries one tagged variant instead of three
/// near-identical tree types. Evaluation is shared by split search, the
/// physical partition step, and leaf lookup — all three must route an example
/// identically, or the post-scatter residual check fails.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SplitRule {
    /// Single-feature threshold: `x[feature] < threshold` goes left.
    AxisAligned {
        /// Feature column tested by this node.
        feature: usize,
        /// Threshold value.
        threshold: f64,
    },
    /// Sparse oblique split: `w·x < 0` goes left.
    Projection {
        /// Dense projection vector, non-zero in a handful of dimensions.
        weights: Vec<f64>,
    },
    /// Perpendicular-bisector split between two reference points:
    /// `⟨x,b⟩ − ⟨x,a⟩ < threshold` goes left.
    Hyperplane {
        /// First reference point.
        a: Vec<f64>,
        /// Second reference point.
        b: Vec<f64>,
        /// `½(‖b‖² − ‖a‖²)`.
        threshold: f64,
    },
}

#[inline]
fn dot(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| a * b).sum()
}

impl SplitRule {
    /// Evaluate the decision function: `true` routes `x` to the left child.
    #[must_use]
    pub fn goes_left(&self, x: &[f64]) -> bool {
        match self {
            SplitRule::AxisAligned { feature, threshold } => x[*feature] < *threshold,
            SplitRule::Projection { weights } => dot(weights, x) < 0.0,
            SplitRule::Hyperplane { a, b, threshold } => dot(x, b) - dot(x, a) < *threshold,
        }
    }
}

/// Payload of a node in the store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    /// Allocated but not yet resolved by the growth loop.
    Pending,
    /// Terminal node holding the smoothed class log-probability vector.
    Leaf {
        /// `log((n_c + α)/(mass + C·α))` per class.
        log_probs: Vec<f64>,
    },
    /// Branching node; the right child always sits at `left + 1`.
    Split {
        /// Decision function routing examples to the children.
        rule: SplitRule,
        /// Index of the left child node.
        left: NodeIndex,
    },
}

/// A node in a decision tree store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub(crate) depth: usize,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// Return the depth of this node (root depth is 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Return the node payload.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Return the split rule and left-child index for an internal node.
    #[must_use]
    pub fn split(&self) -> Option<(&SplitRule, NodeIndex)> {
        match &self.kind {
            NodeKind::Split { rule, left } => Some((rule, *left)),
            _ => None,
        }
    }

    /// Return the leaf log-probability vector, if this node is a leaf.
    #[must_use]
    pub fn log_probs(&self) -> Option<&[f64]> {
        match &self.kind {
            NodeKind::Leaf { log_probs } => Some(log_probs),
            _ => None,
        }
    }
}
