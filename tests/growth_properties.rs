//! Structural property tests for the batch growth driver.
//!
//! These tests verify the invariants growth guarantees regardless of split
//! strategy: leaves form an exact partition of the training data, pure nodes
//! stop, depth limits hold, and identical configs produce identical trees.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use thicket::{
    BootstrapMode, GrowthConfig, MemoryDataset, SplitStrategy, Tree, TreeError,
};

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic classification dataset
// ---------------------------------------------------------------------------

/// Generate a 240-sample, 6-feature, 3-class classification dataset.
///
/// Features 0-1 are informative (class * 3.0 + noise in [0, 0.5]),
/// features 2-5 are pure noise in [0, 0.5].
fn make_classification() -> MemoryDataset {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let n_samples = 240;
    let n_features = 6;
    let n_classes = 3;

    let mut points = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % n_classes;
        labels.push(class);
        let row: Vec<f64> = (0..n_features)
            .map(|f| {
                let base = if f < 2 { class as f64 * 3.0 } else { 0.0 };
                base + rng.r#gen::<f64>() * 0.5
            })
            .collect();
        points.push(row);
    }
    MemoryDataset::from_rows(points, labels).unwrap()
}

fn all_strategies() -> Vec<SplitStrategy> {
    vec![
        SplitStrategy::AxisAligned,
        SplitStrategy::SparseProjection { sparsity: 3 },
        SplitStrategy::Hyperplane,
    ]
}

/// Route every training example and count arrivals per leaf.
fn leaf_arrival_total(tree: &Tree, dataset: &MemoryDataset) -> usize {
    use thicket::Dataset;
    let mut total = 0;
    for i in 0..dataset.len() {
        tree.find_leaf(dataset.point(i)).unwrap();
        total += 1;
    }
    total
}

// ---------------------------------------------------------------------------
// Partition and routing invariants
// ---------------------------------------------------------------------------

#[test]
fn every_example_routes_to_a_leaf_under_all_strategies() {
    let dataset = make_classification();
    for strategy in all_strategies() {
        let tree = GrowthConfig::new()
            .with_strategy(strategy)
            .with_n_features(Some(4))
            .fit(&dataset)
            .unwrap();
        assert!(tree.n_nodes() > 1, "{strategy:?} should split this dataset");
        assert_eq!(leaf_arrival_total(&tree, &dataset), 240);
        // Arena trees hold exactly n_leaves = (n_nodes + 1) / 2 for binary
        // splits.
        assert_eq!(tree.n_leaves(), (tree.n_nodes() + 1) / 2, "{strategy:?}");
    }
}

#[test]
fn separable_scenario_splits_near_the_gap() {
    let dataset = MemoryDataset::from_rows(
        vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]],
        vec![0, 0, 1, 1],
    )
    .unwrap();
    let tree = GrowthConfig::new().fit(&dataset).unwrap();

    assert_eq!(tree.n_nodes(), 3);
    let low = tree.log_posterior(&[0.5]).unwrap();
    let high = tree.log_posterior(&[2.5]).unwrap();
    assert!(low[0] > low[1], "left region favors class 0");
    assert!(high[1] > high[0], "right region favors class 1");
}

#[test]
fn single_class_dataset_yields_one_leaf() {
    let dataset = MemoryDataset::from_rows(
        vec![vec![0.0, 1.0], vec![5.0, -2.0], vec![3.0, 3.0]],
        vec![1, 1, 1],
    )
    .unwrap();
    for strategy in all_strategies() {
        let tree = GrowthConfig::new().with_strategy(strategy).fit(&dataset).unwrap();
        assert_eq!(tree.n_nodes(), 1, "{strategy:?}: pure data never splits");
    }
}

// ---------------------------------------------------------------------------
// Stopping rules
// ---------------------------------------------------------------------------

#[test]
fn zero_max_depth_forces_a_root_leaf() {
    let dataset = make_classification();
    let tree = GrowthConfig::new().with_max_depth(0).fit(&dataset).unwrap();
    assert_eq!(tree.n_nodes(), 1);
    assert_eq!(tree.depth(), 0);
    // The root still carries the full class distribution.
    let lp = tree.log_posterior(&[0.0; 6]).unwrap();
    assert_eq!(lp.len(), 3);
}

#[test]
fn max_depth_bounds_the_tree() {
    let dataset = make_classification();
    for depth in [1, 2, 3] {
        let tree = GrowthConfig::new().with_max_depth(depth).fit(&dataset).unwrap();
        assert!(tree.depth() <= depth);
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn requesting_more_features_than_dimensions_fails_fast() {
    let dataset = make_classification();
    let err = GrowthConfig::new()
        .with_n_features(Some(7))
        .fit(&dataset)
        .unwrap_err();
    assert!(matches!(
        err,
        TreeError::TooManyFeatures { requested: 7, dimensionality: 6 }
    ));
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn identical_configs_grow_identical_trees() {
    let dataset = make_classification();
    for strategy in all_strategies() {
        let config = GrowthConfig::new().with_strategy(strategy).with_seed(9);
        let first = config.fit(&dataset).unwrap();
        let second = config.fit(&dataset).unwrap();
        assert_eq!(first, second, "{strategy:?}: growth must be reproducible");
    }
}

#[test]
fn different_seeds_may_differ_but_stay_valid() {
    let dataset = make_classification();
    let a = GrowthConfig::new().with_seed(1).fit(&dataset).unwrap();
    let b = GrowthConfig::new().with_seed(2).fit(&dataset).unwrap();
    assert_eq!(leaf_arrival_total(&a, &dataset), 240);
    assert_eq!(leaf_arrival_total(&b, &dataset), 240);
}

// ---------------------------------------------------------------------------
// Bootstrap and leaf refit
// ---------------------------------------------------------------------------

#[test]
fn bootstrap_growth_refits_leaves_from_the_full_dataset() {
    let dataset = make_classification();
    let tree = GrowthConfig::new()
        .with_bootstrap(BootstrapMode::Enabled { n_examples: None })
        .fit(&dataset)
        .unwrap();
    // Refit keeps the tree usable over the complete feature space.
    assert_eq!(leaf_arrival_total(&tree, &dataset), 240);
    let lp = tree.log_posterior(&[0.1, 0.1, 0.2, 0.2, 0.1, 0.3]).unwrap();
    assert_eq!(lp.len(), 3);
    assert!(lp.iter().all(|v| v.is_finite() && *v < 0.0));
}

#[test]
fn refit_preserves_structure_and_rewrites_payloads() {
    let dataset = make_classification();
    let grown = GrowthConfig::new().fit(&dataset).unwrap();
    let mut refit = grown.clone();
    refit.refit_leaf_histograms(&dataset, 1e-4).unwrap();

    assert_eq!(grown.n_nodes(), refit.n_nodes());
    assert_eq!(grown.depth(), refit.depth());
    // Payloads over the training data must agree after a same-data refit up
    // to the subtleties of identical histograms, so routing matches exactly.
    use thicket::Dataset;
    for i in 0..dataset.len() {
        assert_eq!(
            grown.find_leaf(dataset.point(i)).unwrap(),
            refit.find_leaf(dataset.point(i)).unwrap()
        );
    }
}

#[test]
fn progress_callback_observes_start_and_termination() {
    let dataset = make_classification();
    let mut snapshots = Vec::new();
    let tree = GrowthConfig::new()
        .fit_with_progress(&dataset, 1, |p| snapshots.push(p.clone()))
        .unwrap();

    assert!(snapshots.len() >= 2);
    let first = &snapshots[0];
    assert!(first.started);
    assert_eq!(first.processed, 0);
    let last = snapshots.last().unwrap();
    assert!(last.terminated);
    assert_eq!(last.n_nodes, tree.n_nodes());
}
