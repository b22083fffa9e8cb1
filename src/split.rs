//! Axis-aligned threshold search.

use rand::Rng;

use crate::dataset::Dataset;
use crate::histogram::ClassHistogram;
use crate::node::SplitRule;

/// Winning candidate returned by a split search.
#[derive(Debug, Clone)]
pub(crate) struct SplitCandidate {
    pub(crate) rule: SplitRule,
    /// `E_left + E_right` weighted entropy of the induced partition.
    pub(crate) objective: f64,
    pub(crate) n_left: usize,
    pub(crate) n_right: usize,
}

/// Sample `take` distinct indices from `[0, n)` by partial Fisher-Yates.
///
/// Returns the shuffled prefix of the identity permutation; `take` must not
/// exceed `n`.
pub(crate) fn sample_distinct(n: usize, take: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    for i in 0..take.min(n) {
        let j = rng.gen_range(i..n);
        order.swap(i, j);
    }
    order.truncate(take.min(n));
    order
}

/// Two adjacent feature values too close to carry a split boundary.
///
/// Relative test so near-zero-margin boundaries are treated as duplicates
/// regardless of the feature's scale.
#[inline]
fn nearly_equal(left: f64, right: f64) -> bool {
    (right - left).abs() < 1e-6 * (right + 1e-6).abs().max((left + 1e-6).abs())
}

/// Find the best axis-aligned threshold split for one node.
///
/// Samples `n_features` distinct features without replacement. For each, the
/// node's partition is sorted by that feature and a left/right histogram pair
/// is swept across the sorted order, moving one example at a time; every
/// distinct-value boundary is scored by `E_left + E_right` (lower is better)
/// and the threshold is the midpoint of the two adjacent values.
///
/// `indices` is reordered by the per-feature sorts; no ordering is promised
/// afterwards. Returns `None` when no boundary survives the duplicate skip.
pub(crate) fn find_axis_split<D: Dataset>(
    storage: &D,
    indices: &mut [usize],
    hist: &ClassHistogram,
    n_features: usize,
    rng: &mut impl Rng,
) -> Option<SplitCandidate> {
    let n = indices.len();
    if n < 2 {
        return None;
    }
    let n_classes = storage.n_classes();

    let mut left_hist = ClassHistogram::new(n_classes);
    let mut right_hist = ClassHistogram::new(n_classes);

    let mut best: Option<SplitCandidate> = None;

    for feature in sample_distinct(storage.dimensionality(), n_features, rng) {
        indices.sort_unstable_by(|&a, &b| {
            storage.point(a)[feature].total_cmp(&storage.point(b)[feature])
        });

        left_hist.reset();
        right_hist.clone_from(hist);

        let mut left_value = storage.point(indices[0])[feature];
        let mut left_class = storage.label(indices[0]);

        for m in 1..n {
            let example = indices[m];

            // Move the trailing example from the right to the left histogram.
            left_hist.add_one(left_class);
            right_hist.sub_one(left_class);

            let right_value = storage.point(example)[feature];

            if nearly_equal(left_value, right_value) {
                left_value = right_value;
                left_class = storage.label(example);
                continue;
            }

            let objective = left_hist.entropy() + right_hist.entropy();
            if best.as_ref().is_none_or(|b| objective < b.objective) {
                best = Some(SplitCandidate {
                    rule: SplitRule::AxisAligned {
                        feature,
                        threshold: 0.5 * (left_value + right_value),
                    },
                    objective,
                    n_left: left_hist.mass(),
                    n_right: right_hist.mass(),
                });
            }

            left_value = right_value;
            left_class = storage.label(example);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{find_axis_split, sample_distinct};
    use crate::dataset::{Dataset, MemoryDataset};
    use crate::histogram::ClassHistogram;
    use crate::node::SplitRule;

    fn node_histogram(ds: &MemoryDataset, indices: &[usize]) -> ClassHistogram {
        let mut hist = ClassHistogram::new(ds.n_classes());
        for &i in indices {
            hist.add_one(ds.label(i));
        }
        hist
    }

    #[test]
    fn sample_distinct_has_no_repeats() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sampled = sample_distinct(20, 8, &mut rng);
        assert_eq!(sampled.len(), 8);
        sampled.sort_unstable();
        sampled.dedup();
        assert_eq!(sampled.len(), 8);
    }

    #[test]
    fn separable_data_splits_in_the_gap() {
        let ds = MemoryDataset::from_rows(
            vec![vec![1.0], vec![2.0], vec![3.0], vec![10.0], vec![11.0], vec![12.0]],
            vec![0, 0, 0, 1, 1, 1],
        )
        .unwrap();
        let mut indices: Vec<usize> = (0..6).collect();
        let hist = node_histogram(&ds, &indices);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let cand = find_axis_split(&ds, &mut indices, &hist, 1, &mut rng)
            .expect("should find a split");
        let SplitRule::AxisAligned { feature, threshold } = cand.rule else {
            panic!("axis search must return an axis rule");
        };
        assert_eq!(feature, 0);
        assert!(threshold > 3.0 && threshold < 10.0, "threshold = {threshold}");
        assert_eq!(cand.n_left, 3);
        assert_eq!(cand.n_right, 3);
        // Perfect separation scores zero.
        assert!(cand.objective.abs() < 1e-9, "objective = {}", cand.objective);
    }

    #[test]
    fn constant_feature_yields_none() {
        let ds = MemoryDataset::from_rows(
            vec![vec![5.0], vec![5.0], vec![5.0], vec![5.0]],
            vec![0, 0, 1, 1],
        )
        .unwrap();
        let mut indices: Vec<usize> = (0..4).collect();
        let hist = node_histogram(&ds, &indices);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        assert!(find_axis_split(&ds, &mut indices, &hist, 1, &mut rng).is_none());
    }

    #[test]
    fn near_duplicate_values_are_skipped() {
        // The only boundary between the classes sits at a sub-epsilon margin,
        // so the search must refuse it and fall back to the wide boundary.
        let ds = MemoryDataset::from_rows(
            vec![vec![1.0], vec![1.0 + 1e-9], vec![1.0 + 2e-9], vec![50.0]],
            vec![0, 0, 1, 1],
        )
        .unwrap();
        let mut indices: Vec<usize> = (0..4).collect();
        let hist = node_histogram(&ds, &indices);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let cand = find_axis_split(&ds, &mut indices, &hist, 1, &mut rng)
            .expect("the wide boundary is still usable");
        let SplitRule::AxisAligned { threshold, .. } = cand.rule else {
            panic!("axis search must return an axis rule");
        };
        assert!(threshold > 2.0, "threshold = {threshold}");
        assert_eq!(cand.n_left, 3);
        assert_eq!(cand.n_right, 1);
    }

    #[test]
    fn picks_the_informative_feature() {
        // Feature 0 is noise shared by both classes, feature 1 separates.
        let ds = MemoryDataset::from_rows(
            vec![
                vec![3.0, 0.0],
                vec![1.0, 1.0],
                vec![2.0, 2.0],
                vec![1.0, 10.0],
                vec![3.0, 11.0],
                vec![2.0, 12.0],
            ],
            vec![0, 0, 0, 1, 1, 1],
        )
        .unwrap();
        let mut indices: Vec<usize> = (0..6).collect();
        let hist = node_histogram(&ds, &indices);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let cand = find_axis_split(&ds, &mut indices, &hist, 2, &mut rng)
            .expect("should find a split");
        let SplitRule::AxisAligned { feature, .. } = cand.rule else {
            panic!("axis search must return an axis rule");
        };
        assert_eq!(feature, 1);
    }
}
