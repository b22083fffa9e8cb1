//! Ownership of example partitions during growth.
//!
//! While a tree is being grown, every pending node exclusively owns the index
//! set of examples routed to it. The arena is a growable table of owned
//! buffers addressed by node id; taking a buffer releases the slot, so a
//! resolved node can never be re-visited with stale indices.

use crate::node::NodeIndex;

#[derive(Debug, Default)]
pub(crate) struct PartitionArena {
    buffers: Vec<Option<Vec<usize>>>,
}

impl PartitionArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Hand ownership of `indices` to the pending node `index`.
    pub(crate) fn assign(&mut self, index: NodeIndex, indices: Vec<usize>) {
        let slot = index.index();
        if slot >= self.buffers.len() {
            self.buffers.resize_with(slot + 1, || None);
        }
        debug_assert!(self.buffers[slot].is_none(), "node {index} already owns a partition");
        self.buffers[slot] = Some(indices);
    }

    /// Take the partition owned by node `index`, releasing the slot.
    pub(crate) fn take(&mut self, index: NodeIndex) -> Vec<usize> {
        self.buffers[index.index()]
            .take()
            .expect("pending node owns a partition")
    }
}
