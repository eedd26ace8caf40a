//! The pairwise comparison oracle
//!
//! Assigns a trichotomous sign (or "ambiguous") to every observation pair
//! under the censoring rules. Two methods exist:
//!
//! - **Robust**: the sign is derived from provable set relations between the
//!   (possibly unbounded) true values. No numeric value is ever fabricated
//!   for a censored observation, so some pairs stay ambiguous and any pair
//!   touching a censored observation has no defined slope.
//! - **Substitution** (legacy `lwp`): a fully numeric shadow series is derived
//!   once per analysis (left-censored limits scaled by `lt_mult`, all
//!   right-censored rows collapsed onto one constant just above the series
//!   maximum) and every comparison is then ordinary arithmetic on shadows.

use std::cmp::Ordering;
use trend_core::{AnalysisConfig, CensorKind, MkTestMethod, Observation};

/// Sign of one time-ordered observation pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSign {
    /// The later value is provably smaller
    Decreasing,
    /// The values are provably equal
    Tied,
    /// The later value is provably larger
    Increasing,
    /// The ordering cannot be determined from the censored bounds
    Ambiguous,
}

impl PairSign {
    /// Contribution to the Mann-Kendall S sum (ambiguous counts as zero)
    pub fn value(self) -> i64 {
        match self {
            PairSign::Decreasing => -1,
            PairSign::Tied | PairSign::Ambiguous => 0,
            PairSign::Increasing => 1,
        }
    }
}

/// Slope of one observation pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairSlope {
    /// A computable slope (Δvalue / Δtime)
    Defined(f64),
    /// No slope is computable without fabricating a censored value
    Ambiguous,
    /// The pair shares a time coordinate
    EqualTime,
}

/// Comparison oracle for one analysis group, built once per call
///
/// Holds the series and, under substitution, the one-shot shadow values.
/// Indices passed to `sign`/`slope` must respect time order (`i` no later
/// than `j`), which the time-sorted series guarantees for `i < j`.
#[derive(Debug, Clone)]
pub struct PairwiseComparator<'a> {
    series: &'a [Observation],
    method: MkTestMethod,
    shadow: Option<Vec<f64>>,
}

impl<'a> PairwiseComparator<'a> {
    /// Build the oracle for a series under the given configuration
    pub fn new(series: &'a [Observation], config: &AnalysisConfig) -> Self {
        let shadow = match config.mk_test_method {
            MkTestMethod::Robust => None,
            MkTestMethod::Lwp => Some(shadow_series(series, config.lt_mult, config.gt_mult)),
        };
        Self {
            series,
            method: config.mk_test_method,
            shadow,
        }
    }

    /// Build a substitution oracle over a subset with an externally derived
    /// shadow
    ///
    /// The shadow series is derived once per analysis over the full series;
    /// seasonal partitions hand each group its gathered shadow slice through
    /// this constructor so the right-censor ceiling stays series-wide.
    pub fn with_shadow(series: &'a [Observation], shadow: Vec<f64>) -> Self {
        debug_assert_eq!(series.len(), shadow.len());
        Self {
            series,
            method: MkTestMethod::Lwp,
            shadow: Some(shadow),
        }
    }

    /// The underlying series
    pub fn series(&self) -> &[Observation] {
        self.series
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the series is empty
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The active comparison method
    pub fn method(&self) -> MkTestMethod {
        self.method
    }

    /// Shadow values (substitution method only)
    pub fn shadow(&self) -> Option<&[f64]> {
        self.shadow.as_deref()
    }

    /// Sign of the pair (i earlier, j later)
    pub fn sign(&self, i: usize, j: usize) -> PairSign {
        match &self.shadow {
            Some(shadow) => match shadow[j].partial_cmp(&shadow[i]) {
                Some(Ordering::Greater) => PairSign::Increasing,
                Some(Ordering::Less) => PairSign::Decreasing,
                Some(Ordering::Equal) => PairSign::Tied,
                None => PairSign::Ambiguous,
            },
            None => robust_sign(&self.series[i], &self.series[j]),
        }
    }

    /// Slope of the pair (i earlier, j later)
    pub fn slope(&self, i: usize, j: usize) -> PairSlope {
        let a = &self.series[i];
        let b = &self.series[j];
        let dt = b.time() - a.time();
        if dt == 0.0 {
            return PairSlope::EqualTime;
        }
        match &self.shadow {
            Some(shadow) => PairSlope::Defined((shadow[j] - shadow[i]) / dt),
            None => {
                if a.is_censored() || b.is_censored() {
                    PairSlope::Ambiguous
                } else {
                    PairSlope::Defined((b.value() - a.value()) / dt)
                }
            }
        }
    }

    /// Whether the pair touches a left- or right-censored observation
    pub fn pair_censoring(&self, i: usize, j: usize) -> (bool, bool) {
        let kinds = [self.series[i].censor(), self.series[j].censor()];
        (
            kinds.contains(&CensorKind::Left),
            kinds.contains(&CensorKind::Right),
        )
    }
}

/// Robust sign from provable set relations (a earlier, b later)
fn robust_sign(a: &Observation, b: &Observation) -> PairSign {
    use CensorKind::{Left, None as Exact, Right};
    match (a.censor(), b.censor()) {
        (Exact, Exact) => match b.value().partial_cmp(&a.value()) {
            Some(Ordering::Greater) => PairSign::Increasing,
            Some(Ordering::Less) => PairSign::Decreasing,
            Some(Ordering::Equal) => PairSign::Tied,
            None => PairSign::Ambiguous,
        },
        // b < Lb <= va proves a decrease
        (Exact, Left) => {
            if a.value() >= b.limit() {
                PairSign::Decreasing
            } else {
                PairSign::Ambiguous
            }
        }
        // a < La <= vb proves an increase
        (Left, Exact) => {
            if b.value() >= a.limit() {
                PairSign::Increasing
            } else {
                PairSign::Ambiguous
            }
        }
        // va <= Lb < b proves an increase
        (Exact, Right) => {
            if a.value() <= b.limit() {
                PairSign::Increasing
            } else {
                PairSign::Ambiguous
            }
        }
        // vb <= La < a proves a decrease
        (Right, Exact) => {
            if b.value() <= a.limit() {
                PairSign::Decreasing
            } else {
                PairSign::Ambiguous
            }
        }
        // Two values below (or two above) their limits can never be ordered
        (Left, Left) | (Right, Right) => PairSign::Ambiguous,
        // a < La <= Lb < b proves an increase
        (Left, Right) => {
            if a.limit() <= b.limit() {
                PairSign::Increasing
            } else {
                PairSign::Ambiguous
            }
        }
        // b < Lb <= La < a proves a decrease
        (Right, Left) => {
            if b.limit() <= a.limit() {
                PairSign::Decreasing
            } else {
                PairSign::Ambiguous
            }
        }
    }
}

/// Derive the substitution shadow series once per analysis
///
/// Left-censored rows become `limit * lt_mult`. Right-censored rows all
/// collapse onto a single constant slightly above the maximum of every
/// finite candidate (exact values, scaled left limits, and `limit * gt_mult`
/// for right-censored rows), so they compare greater than everything else
/// and tie with each other.
fn shadow_series(series: &[Observation], lt_mult: f64, gt_mult: f64) -> Vec<f64> {
    let mut max_candidate = f64::NEG_INFINITY;
    for obs in series {
        let candidate = match obs.censor() {
            CensorKind::None => obs.value(),
            CensorKind::Left => obs.limit() * lt_mult,
            CensorKind::Right => obs.limit() * gt_mult,
        };
        if candidate > max_candidate {
            max_candidate = candidate;
        }
    }
    let ceiling = if max_candidate.is_finite() {
        max_candidate + max_candidate.abs().max(1.0) * 1e-4
    } else {
        0.0
    };
    series
        .iter()
        .map(|obs| match obs.censor() {
            CensorKind::None => obs.value(),
            CensorKind::Left => obs.limit() * lt_mult,
            CensorKind::Right => ceiling,
        })
        .collect()
}
