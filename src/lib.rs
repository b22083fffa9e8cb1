//! Decision-tree growth engines for random-forest ensembles.
//!
//! Provides batch tree induction with axis-aligned, sparse-projection, and
//! perpendicular-bisector hyperplane splits, plus a streaming learner that
//! grows a tree one labeled example at a time. Trees store smoothed
//! log-posterior class distributions at the leaves; growth is deterministic
//! given a seed.

mod arena;
mod bootstrap;
mod config;
mod dataset;
mod error;
mod grow;
mod histogram;
mod node;
mod oblique;
mod online;
mod progress;
mod split;
mod threshold;
mod tree;

pub use config::{BootstrapMode, GrowthConfig, OnlineConfig, SplitStrategy};
pub use dataset::{BootstrapSample, Dataset, MemoryDataset};
pub use error::TreeError;
pub use histogram::ClassHistogram;
pub use node::{Node, NodeIndex, NodeKind, SplitRule};
pub use online::{OnlineLearner, OnlineTree};
pub use progress::GrowthProgress;
pub use threshold::{ThresholdGenerator, UniformThresholdGenerator};
pub use tree::Tree;
