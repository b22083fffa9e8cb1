//! Oblique split searches: sparse random projections and two-point
//! hyperplanes.
//!
//! Unlike the axis-aligned sweep, neither variant scans thresholds: a trial
//! fixes the whole decision function up front and is scored in one pass over
//! the partition. `n_features` plays the role of the trial count.

use rand::Rng;

use crate::dataset::Dataset;
use crate::histogram::ClassHistogram;
use crate::node::SplitRule;
use crate::split::SplitCandidate;

/// Score a fixed decision function over one partition.
///
/// Returns the filled left/right histogram pair masses and the weighted
/// entropy objective.
fn score_rule<D: Dataset>(
    storage: &D,
    indices: &[usize],
    hist: &ClassHistogram,
    rule: &SplitRule,
    left_hist: &mut ClassHistogram,
    right_hist: &mut ClassHistogram,
) -> (f64, usize, usize) {
    left_hist.reset();
    right_hist.clone_from(hist);
    for &i in indices {
        if rule.goes_left(storage.point(i)) {
            let class = storage.label(i);
            left_hist.add_one(class);
            right_hist.sub_one(class);
        }
    }
    (
        left_hist.entropy() + right_hist.entropy(),
        left_hist.mass(),
        right_hist.mass(),
    )
}

/// Find the best sparse random projection split for one node.
///
/// Each of `n_trials` trials draws a projection vector with `sparsity`
/// dimensions chosen uniformly at random (repeats overwrite), each assigned
/// ±1 and the whole vector scaled by `1/√sparsity`. The threshold is fixed
/// at zero.
pub(crate) fn find_projection_split<D: Dataset>(
    storage: &D,
    indices: &[usize],
    hist: &ClassHistogram,
    n_trials: usize,
    sparsity: usize,
    rng: &mut impl Rng,
) -> Option<SplitCandidate> {
    let dimensionality = storage.dimensionality();
    let n_classes = storage.n_classes();
    let scale = 1.0 / (sparsity as f64).sqrt();

    let mut left_hist = ClassHistogram::new(n_classes);
    let mut right_hist = ClassHistogram::new(n_classes);
    let mut best: Option<SplitCandidate> = None;

    for _ in 0..n_trials {
        let mut weights = vec![0.0; dimensionality];
        for _ in 0..sparsity {
            let dim = rng.gen_range(0..dimensionality);
            weights[dim] = f64::from(2 * rng.gen_range(0..2i32) - 1);
        }
        for w in &mut weights {
            *w *= scale;
        }
        let rule = SplitRule::Projection { weights };

        let (objective, n_left, n_right) =
            score_rule(storage, indices, hist, &rule, &mut left_hist, &mut right_hist);

        if best.as_ref().is_none_or(|b| objective < b.objective) {
            best = Some(SplitCandidate { rule, objective, n_left, n_right });
        }
    }

    best
}

/// Find the best two-point hyperplane split for one node.
///
/// Each trial samples two distinct non-empty classes uniformly among classes
/// present in the partition, then one example uniformly from each; the split
/// is the perpendicular bisector between the two reference points. Requires
/// at least two classes present (the caller never reaches here with a pure
/// node).
pub(crate) fn find_hyperplane_split<D: Dataset>(
    storage: &D,
    indices: &[usize],
    hist: &ClassHistogram,
    n_trials: usize,
    rng: &mut impl Rng,
) -> Option<SplitCandidate> {
    let n_classes = storage.n_classes();

    // Per-class example lists, used to sample the reference points.
    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for &i in indices {
        by_class[storage.label(i)].push(i);
    }
    let present: Vec<usize> = (0..n_classes).filter(|&c| !by_class[c].is_empty()).collect();
    if present.len() < 2 {
        return None;
    }

    let mut left_hist = ClassHistogram::new(n_classes);
    let mut right_hist = ClassHistogram::new(n_classes);
    let mut best: Option<SplitCandidate> = None;

    for _ in 0..n_trials {
        // Two distinct positions in the present-class list.
        let first = rng.gen_range(0..present.len());
        let mut second = rng.gen_range(0..present.len() - 1);
        if second >= first {
            second += 1;
        }

        let class_a = &by_class[present[first]];
        let class_b = &by_class[present[second]];
        let a = storage.point(class_a[rng.gen_range(0..class_a.len())]).to_vec();
        let b = storage.point(class_b[rng.gen_range(0..class_b.len())]).to_vec();

        let norm_a: f64 = a.iter().map(|v| v * v).sum();
        let norm_b: f64 = b.iter().map(|v| v * v).sum();
        let threshold = 0.5 * (norm_b - norm_a);

        let rule = SplitRule::Hyperplane { a, b, threshold };
        let (objective, n_left, n_right) =
            score_rule(storage, indices, hist, &rule, &mut left_hist, &mut right_hist);

        if best.as_ref().is_none_or(|cur| objective < cur.objective) {
            best = Some(SplitCandidate { rule, objective, n_left, n_right });
        }
    }

    best
}
