/// Snapshot of a batch growth run, handed to the progress callback.
///
/// Purely observational: nothing a callback does can affect growth.
/// `processed` counts examples that have reached a resolved leaf; it equals
/// `total` exactly when `terminated` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GrowthProgress {
    /// Growth has started.
    pub started: bool,
    /// Total number of training examples in the (possibly resampled) dataset.
    pub total: usize,
    /// Examples settled into leaves so far.
    pub processed: usize,
    /// Nodes allocated so far.
    pub n_nodes: usize,
    /// Deepest node popped so far.
    pub depth: usize,
    /// The work list is empty and the tree is fully grown.
    pub terminated: bool,
}

impl GrowthProgress {
    pub(crate) fn start(total: usize) -> Self {
        Self {
            started: true,
            total,
            processed: 0,
            n_nodes: 1,
            depth: 0,
            terminated: false,
        }
    }
}
