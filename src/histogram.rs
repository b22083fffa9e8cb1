//! Incremental class-count statistics for split evaluation.
//!
//! Every split candidate is scored from a pair of [`ClassHistogram`]s that are
//! updated one example at a time, so the entropy value has to be maintainable
//! in O(1) per update. The histogram caches the per-class `n·ln(n)` terms and
//! their running sum; `entropy()` then costs a single subtraction.

/// `n·ln(n)` with the `0·ln(0) = 0` convention.
#[inline]
fn xlogx(n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        let x = n as f64;
        x * x.ln()
    }
}

/// Per-class example counts with O(1) incremental weighted entropy.
///
/// The weighted entropy is `E = mass·ln(mass) − Σ_c n_c·ln(n_c)`. It is zero
/// for pure (and empty) histograms, non-negative otherwise, and additive
/// across disjoint partitions, so two sibling candidates can be compared by
/// `E_left + E_right` without any normalization.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassHistogram {
    counts: Vec<usize>,
    mass: usize,
    /// Cached `n_c·ln(n_c)` per class, kept in sync with `counts`.
    terms: Vec<f64>,
    term_sum: f64,
    /// Number of classes with a non-zero count.
    occupied: usize,
}

impl ClassHistogram {
    /// Create an empty histogram over `n_classes` classes.
    #[must_use]
    pub fn new(n_classes: usize) -> Self {
        Self {
            counts: vec![0; n_classes],
            mass: 0,
            terms: vec![0.0; n_classes],
            term_sum: 0.0,
            occupied: 0,
        }
    }

    /// Return the number of classes this histogram covers.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    /// Return the count for one class.
    #[must_use]
    pub fn at(&self, class: usize) -> usize {
        self.counts[class]
    }

    /// Return the total mass (sum of all counts).
    #[must_use]
    pub fn mass(&self) -> usize {
        self.mass
    }

    /// Return `true` when the entire mass sits in a single class.
    ///
    /// An empty histogram is not pure.
    #[must_use]
    pub fn is_pure(&self) -> bool {
        self.occupied == 1
    }

    /// Add one example of `class`.
    pub fn add_one(&mut self, class: usize) {
        let c = self.counts[class] + 1;
        if c == 1 {
            self.occupied += 1;
        }
        self.counts[class] = c;
        self.mass += 1;
        let term = xlogx(c);
        self.term_sum += term - self.terms[class];
        self.terms[class] = term;
    }

    /// Remove one example of `class`.
    ///
    /// The class count must be non-zero; removing from an empty class is an
    /// internal invariant violation.
    pub fn sub_one(&mut self, class: usize) {
        debug_assert!(self.counts[class] > 0, "sub_one on empty class {class}");
        let c = self.counts[class] - 1;
        if c == 0 {
            self.occupied -= 1;
        }
        self.counts[class] = c;
        self.mass -= 1;
        let term = xlogx(c);
        self.term_sum += term - self.terms[class];
        self.terms[class] = term;
    }

    /// Reset all counts to zero, keeping the class count.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.terms.fill(0.0);
        self.mass = 0;
        self.term_sum = 0.0;
        self.occupied = 0;
    }

    /// Return the weighted entropy `mass·ln(mass) − Σ_c n_c·ln(n_c)`.
    ///
    /// Lower is better when comparing candidate partitions; a pure or empty
    /// histogram scores exactly zero.
    #[must_use]
    pub fn entropy(&self) -> f64 {
        if self.mass == 0 {
            return 0.0;
        }
        xlogx(self.mass) - self.term_sum
    }

    /// Compute the smoothed leaf log-probability vector.
    ///
    /// `log((n_c + α) / (mass + C·α))` per class, α = `smoothing`. An empty
    /// histogram yields the uniform `−ln C` vector.
    #[must_use]
    pub fn smoothed_log_posterior(&self, smoothing: f64) -> Vec<f64> {
        let n_classes = self.counts.len();
        assert!(n_classes > 0, "leaf histogram has zero classes");
        let denom = self.mass as f64 + n_classes as f64 * smoothing;
        self.counts
            .iter()
            .map(|&c| ((c as f64 + smoothing) / denom).ln())
            .collect()
    }
}
