//! Criterion benchmarks for tree growth: batch strategies and the stream.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use thicket::{
    GrowthConfig, MemoryDataset, OnlineConfig, OnlineLearner, SplitStrategy,
    UniformThresholdGenerator,
};

fn make_classification(
    n_samples: usize,
    n_features: usize,
    n_classes: usize,
    seed: u64,
) -> MemoryDataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % n_classes;
        labels.push(class);
        let row: Vec<f64> = (0..n_features)
            .map(|f| {
                let base = if f < 3 { class as f64 * 3.0 } else { 0.0 };
                base + rng.r#gen::<f64>() * 0.5
            })
            .collect();
        points.push(row);
    }
    MemoryDataset::from_rows(points, labels).unwrap()
}

fn bench_grow_axis_aligned(c: &mut Criterion) {
    let dataset = make_classification(2000, 20, 5, 42);
    let cfg = GrowthConfig::new().with_seed(42);

    c.bench_function("grow_axis_2000x20_5class", |b| {
        b.iter(|| cfg.fit(&dataset).unwrap());
    });
}

fn bench_grow_projection(c: &mut Criterion) {
    let dataset = make_classification(2000, 20, 5, 42);
    let cfg = GrowthConfig::new()
        .with_strategy(SplitStrategy::SparseProjection { sparsity: 3 })
        .with_seed(42);

    c.bench_function("grow_projection_2000x20_5class", |b| {
        b.iter(|| cfg.fit(&dataset).unwrap());
    });
}

fn bench_grow_hyperplane(c: &mut Criterion) {
    let dataset = make_classification(2000, 20, 5, 42);
    let cfg = GrowthConfig::new()
        .with_strategy(SplitStrategy::Hyperplane)
        .with_seed(42);

    c.bench_function("grow_hyperplane_2000x20_5class", |b| {
        b.iter(|| cfg.fit(&dataset).unwrap());
    });
}

fn bench_online_stream(c: &mut Criterion) {
    let dataset = make_classification(2000, 20, 5, 42);
    let ranges = vec![(0.0, 12.5); 20];
    let cfg = OnlineConfig::new().with_n_thresholds(25).with_seed(42);

    c.bench_function("online_stream_2000x20_5class", |b| {
        b.iter(|| {
            let generator = UniformThresholdGenerator::new(ranges.clone());
            let mut learner = OnlineLearner::new(cfg.clone(), generator).unwrap();
            let mut tree = learner.new_tree(5);
            learner.fit_stream(&mut tree, &dataset).unwrap();
            tree.into_tree()
        });
    });
}

criterion_group!(
    benches,
    bench_grow_axis_aligned,
    bench_grow_projection,
    bench_grow_hyperplane,
    bench_online_stream
);
criterion_main!(benches);
