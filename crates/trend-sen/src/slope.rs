//! Sen's slope estimation
//!
//! The slope is the median of every valid pairwise slope under the active
//! comparison method; the intercept anchors the fitted line at the median
//! time and median value. Ambiguous entries (pairs whose slope would require
//! fabricating a censored value) either drop from the pool or stay as literal
//! zeros, per the configured sub-policy; either way each pool entry remembers
//! whether censoring touched it, so a censor-driven median can be flagged.

use crate::interval::{slope_interval, SlopeInterval};
use ordered_float::OrderedFloat;
use trend_core::{math, AnalysisConfig, MkTestMethod, Result, SensSlopeMethod};
use trend_kendall::{PairSet, PairSlope, PairwiseComparator};

/// Sen's slope, intercept, and confidence bounds for one analysis group
#[derive(Debug, Clone, PartialEq)]
pub struct SenEstimate {
    /// Median pairwise slope (NaN when the pool is empty)
    pub slope: f64,
    /// Intercept through (median time, median value); NaN when undefined
    pub intercept: f64,
    /// Confidence bounds on the slope
    pub interval: SlopeInterval,
    /// Number of entries in the slope pool
    pub n_slopes: usize,
    /// The median entry was touched by left censoring
    pub influenced_left: bool,
    /// The median entry was touched by right censoring
    pub influenced_right: bool,
}

/// One pool entry: a slope and the censoring that touched its pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeSample {
    /// Pairwise slope (zero for kept ambiguous entries)
    pub slope: f64,
    /// Pair touches a left-censored observation
    pub left: bool,
    /// Pair touches a right-censored observation
    pub right: bool,
}

/// Assemble the pairwise-slope pool for one analysis group
///
/// Equal-time pairs never enter the pool. Ambiguous pairs follow
/// `sens_slope_method`: dropped (`Nan`) or kept as literal zeros (`Lwp`).
/// The pool comes back sorted by slope.
pub fn slope_pool(
    cmp: &PairwiseComparator<'_>,
    pairs: &PairSet,
    config: &AnalysisConfig,
) -> Vec<SlopeSample> {
    let mut pool = Vec::new();
    pairs.for_each(|i, j| {
        let (left, right) = cmp.pair_censoring(i, j);
        match cmp.slope(i, j) {
            PairSlope::Defined(slope) => pool.push(SlopeSample { slope, left, right }),
            PairSlope::Ambiguous => {
                if config.sens_slope_method == SensSlopeMethod::Lwp {
                    pool.push(SlopeSample {
                        slope: 0.0,
                        left,
                        right,
                    });
                }
            }
            PairSlope::EqualTime => {}
        }
    });
    pool.sort_by_key(|sample| OrderedFloat(sample.slope));
    pool
}

/// Estimate the Sen's slope, intercept, and confidence interval
///
/// `var_s` is the tie-corrected variance from the Mann-Kendall statistic;
/// the interval ranks derive from it. An empty pool degrades every field to
/// NaN; only a malformed configuration errors.
pub fn sen_slope(
    cmp: &PairwiseComparator<'_>,
    pairs: &PairSet,
    var_s: f64,
    config: &AnalysisConfig,
) -> Result<SenEstimate> {
    let pool = slope_pool(cmp, pairs, config);
    let n_slopes = pool.len();

    if pool.is_empty() {
        return Ok(SenEstimate {
            slope: f64::NAN,
            intercept: f64::NAN,
            interval: slope_interval(&[], var_s, config.alpha, config.ci_method)?,
            n_slopes: 0,
            influenced_left: false,
            influenced_right: false,
        });
    }

    let (slope, influenced_left, influenced_right) = median_of_pool(&pool);
    let intercept = intercept_at_medians(cmp, slope);
    let sorted_slopes: Vec<f64> = pool.iter().map(|sample| sample.slope).collect();
    let interval = slope_interval(&sorted_slopes, var_s, config.alpha, config.ci_method)?;

    Ok(SenEstimate {
        slope,
        intercept,
        interval,
        n_slopes,
        influenced_left,
        influenced_right,
    })
}

/// Median of the sorted pool, with the censor flags of the entries that
/// produced it
///
/// The seasonal combiner calls this on the union of per-season pools; the
/// flags drive the censor-influence warnings. The pool must be non-empty.
pub fn median_of_pool(pool: &[SlopeSample]) -> (f64, bool, bool) {
    let n = pool.len();
    if n % 2 == 1 {
        let mid = &pool[n / 2];
        (mid.slope, mid.left, mid.right)
    } else {
        let a = &pool[n / 2 - 1];
        let b = &pool[n / 2];
        (
            (a.slope + b.slope) / 2.0,
            a.left || b.left,
            a.right || b.right,
        )
    }
}

/// Intercept so the fitted line passes through (median time, median value)
///
/// Substitution mode takes the value median over the shadow series; robust
/// mode only over uncensored values (all-censored leaves it NaN).
pub fn intercept_at_medians(cmp: &PairwiseComparator<'_>, slope: f64) -> f64 {
    let times: Vec<f64> = cmp.series().iter().map(|o| o.time()).collect();
    let median_time = math::median(&times);
    let median_value = match cmp.method() {
        MkTestMethod::Lwp => math::median(cmp.shadow().expect("substitution shadow")),
        MkTestMethod::Robust => {
            let exact: Vec<f64> = cmp
                .series()
                .iter()
                .filter(|o| !o.is_censored())
                .map(|o| o.value())
                .collect();
            math::median(&exact)
        }
    };
    median_value - slope * median_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use trend_core::{MkTestMethod, Observation, SensSlopeMethod};

    fn pool_and_estimate(
        series: &[Observation],
        config: &AnalysisConfig,
        var_s: f64,
    ) -> SenEstimate {
        let cmp = PairwiseComparator::new(series, config);
        let pairs = PairSet::exhaustive(series.len());
        sen_slope(&cmp, &pairs, var_s, config).unwrap()
    }

    #[test]
    fn test_clean_series_median_slope() {
        let series = vec![
            Observation::exact(0.0, 1.0),
            Observation::exact(1.0, 2.0),
            Observation::exact(2.0, 3.0),
            Observation::exact(3.0, 4.5),
        ];
        let estimate = pool_and_estimate(&series, &AnalysisConfig::default(), 0.0);
        // Slopes: 1, 1, 1, 1.1667, 1.25, 1.5 -> median 1.0833
        assert_abs_diff_eq!(estimate.slope, (1.0 + 7.0 / 6.0) / 2.0, epsilon = 1e-9);
        assert_eq!(estimate.n_slopes, 6);
        assert!(!estimate.influenced_left);
    }

    #[test]
    fn test_substitution_lt_mult_worked_example() {
        // (<10, 2000), (12, 2001), (20, 2002): lt_mult 0.5 -> median 7.5
        let series = vec![
            Observation::left_censored(2000.0, 10.0),
            Observation::exact(2001.0, 12.0),
            Observation::exact(2002.0, 20.0),
        ];
        let config = AnalysisConfig::default()
            .with_mk_test_method(MkTestMethod::Lwp)
            .with_lt_mult(0.5);
        let estimate = pool_and_estimate(&series, &config, 1.0);
        assert_abs_diff_eq!(estimate.slope, 7.5);
        assert!(estimate.influenced_left);

        // lt_mult 0.1 -> shadow 1.0 -> slopes 11, 9.5, 8 -> median 9.5
        let config = config.with_lt_mult(0.1);
        let estimate = pool_and_estimate(&series, &config, 1.0);
        assert_abs_diff_eq!(estimate.slope, 9.5);
    }

    #[test]
    fn test_robust_nan_vs_lwp_policy() {
        // '<5', 6, 7, '<8', 9, 10 at 2015..2020
        let series = vec![
            Observation::left_censored(2015.0, 5.0),
            Observation::exact(2016.0, 6.0),
            Observation::exact(2017.0, 7.0),
            Observation::left_censored(2018.0, 8.0),
            Observation::exact(2019.0, 9.0),
            Observation::exact(2020.0, 10.0),
        ];

        // Drop policy: only the six uncensored pairs survive, all slope 1
        let config = AnalysisConfig::default().with_sens_slope_method(SensSlopeMethod::Nan);
        let estimate = pool_and_estimate(&series, &config, 25.0);
        assert_abs_diff_eq!(estimate.slope, 1.0);
        assert_eq!(estimate.n_slopes, 6);
        assert!(!estimate.influenced_left);

        // Zero policy: nine censored-pair zeros swamp the median
        let config = AnalysisConfig::default().with_sens_slope_method(SensSlopeMethod::Lwp);
        let estimate = pool_and_estimate(&series, &config, 25.0);
        assert_abs_diff_eq!(estimate.slope, 0.0);
        assert_eq!(estimate.n_slopes, 15);
        assert!(estimate.influenced_left);
    }

    #[test]
    fn test_equal_time_pairs_never_pool() {
        let series = vec![
            Observation::exact(0.0, 1.0),
            Observation::exact(0.0, 9.0),
            Observation::exact(1.0, 2.0),
        ];
        let config = AnalysisConfig::default();
        let cmp = PairwiseComparator::new(&series, &config);
        let pairs = PairSet::exhaustive(series.len());
        let pool = slope_pool(&cmp, &pairs, &config);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_all_censored_robust_pool_empty() {
        let series = vec![
            Observation::left_censored(0.0, 5.0),
            Observation::left_censored(1.0, 5.0),
            Observation::left_censored(2.0, 5.0),
        ];
        let config = AnalysisConfig::default();
        let estimate = pool_and_estimate(&series, &config, 0.0);
        assert!(estimate.slope.is_nan());
        assert!(estimate.intercept.is_nan());
        assert_eq!(estimate.n_slopes, 0);
        assert!(estimate.interval.unattainable);
    }

    #[test]
    fn test_intercept_through_medians() {
        let series = vec![
            Observation::exact(0.0, 10.0),
            Observation::exact(1.0, 12.0),
            Observation::exact(2.0, 14.0),
        ];
        let estimate = pool_and_estimate(&series, &AnalysisConfig::default(), 0.0);
        assert_abs_diff_eq!(estimate.slope, 2.0);
        // Line through (1, 12): intercept 10
        assert_abs_diff_eq!(estimate.intercept, 10.0);
    }
}
