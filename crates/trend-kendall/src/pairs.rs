//! Pair enumeration and bounded sampling
//!
//! The pairwise scan is O(n²); for very large series a bounded, seeded subset
//! of pairs may be drawn instead. Sampling is an accuracy/performance trade
//! recorded on the result, not a silent relaxation: the statistic scales its
//! sums by `total / used` and reports `Sampled` mode.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The set of index pairs to evaluate for one analysis group
#[derive(Debug, Clone)]
pub struct PairSet {
    n: usize,
    total: usize,
    sampled: Option<Vec<(usize, usize)>>,
}

impl PairSet {
    /// Plan the scan: exhaustive, or a seeded sample when the full pair count
    /// exceeds `max_pairs`
    ///
    /// The sample is drawn without replacement from the triangular pair index
    /// space with a `ChaCha8Rng`; an unset seed defaults to zero so repeated
    /// runs stay deterministic.
    pub fn new(n: usize, max_pairs: Option<usize>, seed: Option<u64>) -> Self {
        let total = n.saturating_sub(1) * n / 2;
        let sampled = match max_pairs {
            Some(limit) if total > limit => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed.unwrap_or(0));
                let mut picks: Vec<(usize, usize)> =
                    rand::seq::index::sample(&mut rng, total, limit)
                        .into_iter()
                        .map(|k| unrank(n, k))
                        .collect();
                picks.sort_unstable();
                Some(picks)
            }
            _ => None,
        };
        Self { n, total, sampled }
    }

    /// An exhaustive scan over all pairs
    pub fn exhaustive(n: usize) -> Self {
        Self::new(n, None, None)
    }

    /// Full pair count `n(n-1)/2`
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of pairs that will actually be evaluated
    pub fn used(&self) -> usize {
        self.sampled.as_ref().map_or(self.total, Vec::len)
    }

    /// Whether this plan is a sample of the pair space
    pub fn is_sampled(&self) -> bool {
        self.sampled.is_some()
    }

    /// Scale factor from sampled sums to full-scan estimates
    pub fn scale(&self) -> f64 {
        if self.used() == 0 {
            1.0
        } else {
            self.total as f64 / self.used() as f64
        }
    }

    /// The sampled index pairs, if sampling is active
    pub fn sampled_indices(&self) -> Option<&[(usize, usize)]> {
        self.sampled.as_deref()
    }

    /// Number of observations the plan was built for
    pub fn n(&self) -> usize {
        self.n
    }

    /// Visit every planned pair in (i, j) index order with i < j
    pub fn for_each(&self, mut visit: impl FnMut(usize, usize)) {
        match &self.sampled {
            Some(picks) => {
                for &(i, j) in picks {
                    visit(i, j);
                }
            }
            None => {
                for i in 0..self.n {
                    for j in (i + 1)..self.n {
                        visit(i, j);
                    }
                }
            }
        }
    }
}

/// Map a linear pair rank to the (i, j) pair with i < j
///
/// Rank layout: pair (i, j) has rank `i*n - i(i+1)/2 + (j - i - 1)`, i.e.
/// row-major over the strict upper triangle.
fn unrank(n: usize, rank: usize) -> (usize, usize) {
    debug_assert!(rank < n.saturating_sub(1) * n / 2);
    // Binary search for the row: largest i with row_start(i) <= rank
    let row_start = |i: usize| i * n - i * (i + 1) / 2;
    let (mut lo, mut hi) = (0usize, n - 1);
    while lo + 1 < hi {
        let mid = (lo + hi) / 2;
        if row_start(mid) <= rank {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let i = lo;
    let j = i + 1 + (rank - row_start(i));
    (i, j)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustive_counts() {
        let pairs = PairSet::exhaustive(11);
        assert_eq!(pairs.total(), 55);
        assert_eq!(pairs.used(), 55);
        assert!(!pairs.is_sampled());
        assert_eq!(pairs.scale(), 1.0);

        let mut count = 0;
        pairs.for_each(|i, j| {
            assert!(i < j);
            count += 1;
        });
        assert_eq!(count, 55);
    }

    #[test]
    fn test_unrank_round_trip() {
        let n = 13;
        let mut rank = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                assert_eq!(unrank(n, rank), (i, j));
                rank += 1;
            }
        }
    }

    #[test]
    fn test_sampling_triggers_past_limit() {
        let pairs = PairSet::new(100, Some(500), Some(42));
        assert_eq!(pairs.total(), 4950);
        assert_eq!(pairs.used(), 500);
        assert!(pairs.is_sampled());
        assert!((pairs.scale() - 9.9).abs() < 1e-12);

        let mut seen = std::collections::HashSet::new();
        pairs.for_each(|i, j| {
            assert!(i < j && j < 100);
            assert!(seen.insert((i, j)), "pair drawn twice");
        });
        assert_eq!(seen.len(), 500);
    }

    #[test]
    fn test_sampling_is_deterministic_per_seed() {
        let a = PairSet::new(60, Some(100), Some(7));
        let b = PairSet::new(60, Some(100), Some(7));
        assert_eq!(a.sampled_indices(), b.sampled_indices());

        let c = PairSet::new(60, Some(100), Some(8));
        assert_ne!(a.sampled_indices(), c.sampled_indices());
    }

    #[test]
    fn test_no_sampling_below_limit() {
        let pairs = PairSet::new(10, Some(1000), Some(1));
        assert!(!pairs.is_sampled());
        assert_eq!(pairs.used(), 45);
    }

    #[test]
    fn test_degenerate_sizes() {
        assert_eq!(PairSet::exhaustive(0).total(), 0);
        assert_eq!(PairSet::exhaustive(1).total(), 0);
        PairSet::exhaustive(1).for_each(|_, _| panic!("no pairs expected"));
    }
}
