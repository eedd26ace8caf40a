//! The Mann-Kendall statistic
//!
//! Aggregates pairwise signs into S, the tie-corrected variance of S, the
//! continuity-corrected Z, the two-sided p-value, and Kendall's tau-b.
//!
//! Tie handling generalizes the classical Kendall formula: the value-side
//! correction may include exact value ties, censor-level groups (observations
//! sharing the same bound), and the ambiguous-pair count, alongside the
//! classical tied-timestamp term. Degenerate variance never panics: Z and p
//! fall back to 0 and 1 with a flag the caller turns into an advisory.

use crate::compare::{PairSign, PairwiseComparator};
use crate::pairs::PairSet;
use std::f64::consts::SQRT_2;
use trend_core::{AnalysisConfig, CensorKind, MkTestMethod, Observation, TieBreakMethod};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of the Mann-Kendall computation for one analysis group
#[derive(Debug, Clone, PartialEq)]
pub struct MkStatistic {
    /// Sum of pairwise signs (scaled to the full pair space when sampled)
    pub s: f64,
    /// Tie-corrected variance of S
    pub var_s: f64,
    /// Continuity-corrected standard normal deviate (0 when S = 0)
    pub z: f64,
    /// Two-sided p-value
    pub p: f64,
    /// Kendall's tau-b
    pub tau: f64,
    /// Observations in the group
    pub n: usize,
    /// Ambiguous-pair count (scaled estimate when sampled)
    pub n_ambiguous: f64,
    /// Evaluated ambiguous pairs touching a left-censored observation
    pub ambiguous_left: usize,
    /// Evaluated ambiguous pairs touching a right-censored observation
    pub ambiguous_right: usize,
    /// Evaluated pairs sharing a time coordinate (excluded from S)
    pub equal_time_pairs: usize,
    /// Whether the variance collapsed (Z and p are fallback values)
    pub degenerate_variance: bool,
    /// Pairs not tied on the time axis (one factor of the tau denominator)
    pub non_tied_time_pairs: f64,
    /// Pairs not tied on the value axis (the other tau factor)
    pub non_tied_value_pairs: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct ScanAccum {
    s: i64,
    ambiguous: usize,
    ambiguous_left: usize,
    ambiguous_right: usize,
    equal_time: usize,
}

impl ScanAccum {
    fn merge(self, other: Self) -> Self {
        Self {
            s: self.s + other.s,
            ambiguous: self.ambiguous + other.ambiguous,
            ambiguous_left: self.ambiguous_left + other.ambiguous_left,
            ambiguous_right: self.ambiguous_right + other.ambiguous_right,
            equal_time: self.equal_time + other.equal_time,
        }
    }

    fn absorb(&mut self, cmp: &PairwiseComparator<'_>, i: usize, j: usize) {
        let series = cmp.series();
        if series[i].time() == series[j].time() {
            self.equal_time += 1;
            return;
        }
        match cmp.sign(i, j) {
            PairSign::Ambiguous => {
                self.ambiguous += 1;
                let (left, right) = cmp.pair_censoring(i, j);
                if left {
                    self.ambiguous_left += 1;
                }
                if right {
                    self.ambiguous_right += 1;
                }
            }
            sign => self.s += sign.value(),
        }
    }
}

/// Compute the Mann-Kendall statistic for one analysis group
///
/// The series must be sorted by time. `pairs` carries the scan plan (shared
/// with the slope estimator so a sampled analysis evaluates one consistent
/// pair subset).
pub fn mann_kendall(
    cmp: &PairwiseComparator<'_>,
    pairs: &PairSet,
    config: &AnalysisConfig,
) -> MkStatistic {
    let n = cmp.len();
    let scan = run_scan(cmp, pairs);
    let scale = pairs.scale();
    let s = scan.s as f64 * scale;
    let n_ambiguous = scan.ambiguous as f64 * scale;

    let value_groups = value_tie_groups(cmp, config);
    let time_groups = time_tie_groups(cmp.series());
    let var_s = tie_corrected_variance(
        n,
        &value_groups,
        &time_groups,
        n_ambiguous,
        config.tie_break_method,
    );

    let degenerate = !(var_s > 0.0);
    if degenerate {
        tracing::debug!(n, s, "variance of S collapsed; reporting degenerate Z/p");
    }

    let z = if degenerate { 0.0 } else { z_score(s, var_s) };
    let p = if degenerate { 1.0 } else { two_sided_p(z) };

    let (non_tied_time_pairs, non_tied_value_pairs) =
        non_tied_pairs(n, &value_groups, &time_groups, n_ambiguous);
    let tau = tau_b(s, non_tied_time_pairs, non_tied_value_pairs);

    MkStatistic {
        s,
        var_s: var_s.max(0.0),
        z,
        p,
        tau,
        n,
        n_ambiguous,
        ambiguous_left: scan.ambiguous_left,
        ambiguous_right: scan.ambiguous_right,
        equal_time_pairs: scan.equal_time,
        degenerate_variance: degenerate,
        non_tied_time_pairs,
        non_tied_value_pairs,
    }
}

/// Continuity-corrected standard normal deviate of S
///
/// Callers must have checked `var_s > 0`; S of zero maps to zero.
pub fn z_score(s: f64, var_s: f64) -> f64 {
    if s == 0.0 {
        0.0
    } else if s > 0.0 {
        (s - 1.0) / var_s.sqrt()
    } else {
        (s + 1.0) / var_s.sqrt()
    }
}

/// Two-sided p-value for a standard normal deviate
///
/// `2*(1 - Phi(|z|))`, computed as `erfc(|z| / sqrt(2))`.
pub fn two_sided_p(z: f64) -> f64 {
    statrs::function::erf::erfc(z.abs() / SQRT_2).clamp(0.0, 1.0)
}

fn run_scan(cmp: &PairwiseComparator<'_>, pairs: &PairSet) -> ScanAccum {
    if let Some(picks) = pairs.sampled_indices() {
        let mut acc = ScanAccum::default();
        for &(i, j) in picks {
            acc.absorb(cmp, i, j);
        }
        return acc;
    }

    let n = cmp.len();
    #[cfg(feature = "parallel")]
    {
        (0..n)
            .into_par_iter()
            .map(|i| {
                let mut acc = ScanAccum::default();
                for j in (i + 1)..n {
                    acc.absorb(cmp, i, j);
                }
                acc
            })
            .reduce(ScanAccum::default, ScanAccum::merge)
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut acc = ScanAccum::default();
        for i in 0..n {
            for j in (i + 1)..n {
                acc.absorb(cmp, i, j);
            }
        }
        acc
    }
}

/// Sizes of the value-side tie groups
///
/// Substitution mode ties are exact shadow-value ties (the collapsed
/// right-censor constant forms one group). Robust mode combines exact ties
/// among uncensored values with censor-level groups sharing (kind, limit).
fn value_tie_groups(cmp: &PairwiseComparator<'_>, config: &AnalysisConfig) -> Vec<usize> {
    match cmp.method() {
        MkTestMethod::Lwp => {
            let mut shadow = cmp.shadow().expect("substitution shadow").to_vec();
            run_lengths(&mut shadow)
        }
        MkTestMethod::Robust => {
            let mut exact: Vec<f64> = cmp
                .series()
                .iter()
                .filter(|o| !o.is_censored())
                .map(|o| o.value())
                .collect();
            let mut groups = run_lengths(&mut exact);
            if config.tie_break_method == TieBreakMethod::Standard {
                groups.extend(censor_level_groups(cmp.series()));
            }
            groups
        }
    }
}

/// Sizes of censor-level groups: censored observations sharing (kind, limit)
fn censor_level_groups(series: &[Observation]) -> Vec<usize> {
    let mut levels: Vec<(u8, f64)> = series
        .iter()
        .filter_map(|o| match o.censor() {
            CensorKind::None => None,
            CensorKind::Left => Some((0u8, o.limit())),
            CensorKind::Right => Some((1u8, o.limit())),
        })
        .collect();
    levels.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut groups = Vec::new();
    let mut run = 0usize;
    let mut prev: Option<(u8, f64)> = None;
    for level in levels {
        if prev == Some(level) {
            run += 1;
        } else {
            if run > 0 {
                groups.push(run);
            }
            run = 1;
            prev = Some(level);
        }
    }
    if run > 0 {
        groups.push(run);
    }
    groups
}

/// Sizes of tied-timestamp groups (series already sorted by time)
fn time_tie_groups(series: &[Observation]) -> Vec<usize> {
    let mut groups = Vec::new();
    let mut run = 0usize;
    let mut prev: Option<f64> = None;
    for obs in series {
        if prev == Some(obs.time()) {
            run += 1;
        } else {
            if run > 0 {
                groups.push(run);
            }
            run = 1;
            prev = Some(obs.time());
        }
    }
    if run > 0 {
        groups.push(run);
    }
    groups
}

fn run_lengths(values: &mut [f64]) -> Vec<usize> {
    values.sort_by(|a, b| a.total_cmp(b));
    let mut groups = Vec::new();
    let mut run = 0usize;
    let mut prev: Option<f64> = None;
    for &v in values.iter() {
        if prev == Some(v) {
            run += 1;
        } else {
            if run > 0 {
                groups.push(run);
            }
            run = 1;
            prev = Some(v);
        }
    }
    if run > 0 {
        groups.push(run);
    }
    groups
}

/// Tie-corrected variance of S
///
/// Standard: the classical two-axis Kendall correction (subtractive
/// `g(g-1)(2g+5)` terms plus both cross terms), with each ambiguous pair
/// subtracting the size-2 group term (18). Lwp: exact value ties only,
/// emulating the legacy script.
fn tie_corrected_variance(
    n: usize,
    value_groups: &[usize],
    time_groups: &[usize],
    n_ambiguous: f64,
    method: TieBreakMethod,
) -> f64 {
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let base = nf * (nf - 1.0) * (2.0 * nf + 5.0);
    let term = |g: usize| {
        let g = g as f64;
        g * (g - 1.0) * (2.0 * g + 5.0)
    };
    let sum_t: f64 = value_groups.iter().map(|&g| term(g)).sum();

    match method {
        TieBreakMethod::Lwp => (base - sum_t) / 18.0,
        TieBreakMethod::Standard => {
            let sum_u: f64 = time_groups.iter().map(|&g| term(g)).sum();
            // Each ambiguous pair acts as a tie group of two: 2*1*(2*2+5)
            let ambiguous_term = 18.0 * n_ambiguous;
            let mut var = (base - sum_t - sum_u - ambiguous_term) / 18.0;

            let pair2 = |g: usize| (g * (g - 1) / 2) as f64;
            let pair3 = |g: usize| {
                let g = g as f64;
                g * (g - 1.0) * (g - 2.0)
            };
            let t2: f64 = value_groups.iter().map(|&g| pair2(g)).sum();
            let u2: f64 = time_groups.iter().map(|&g| pair2(g)).sum();
            let t3: f64 = value_groups.iter().map(|&g| pair3(g)).sum();
            let u3: f64 = time_groups.iter().map(|&g| pair3(g)).sum();

            if n > 2 {
                var += t3 * u3 / (9.0 * nf * (nf - 1.0) * (nf - 2.0));
            }
            var += t2 * 2.0 * u2 * 2.0 / (2.0 * nf * (nf - 1.0));
            var
        }
    }
}

/// Non-tied pair counts per axis
///
/// The value side counts exact-tie pairs, censor-level-tie pairs, and
/// ambiguous pairs as tied; the time side counts tied-timestamp pairs.
fn non_tied_pairs(
    n: usize,
    value_groups: &[usize],
    time_groups: &[usize],
    n_ambiguous: f64,
) -> (f64, f64) {
    if n < 2 {
        return (0.0, 0.0);
    }
    let n0 = (n * (n - 1) / 2) as f64;
    let tied = |groups: &[usize]| -> f64 { groups.iter().map(|&g| (g * (g - 1) / 2) as f64).sum() };
    (
        (n0 - tied(time_groups)).max(0.0),
        (n0 - tied(value_groups) - n_ambiguous).max(0.0),
    )
}

/// Kendall's tau-b: S over the geometric mean of the non-tied pair counts
///
/// A fully tied axis has no defined tau and yields NaN.
pub fn tau_b(s: f64, non_tied_time_pairs: f64, non_tied_value_pairs: f64) -> f64 {
    let denom = (non_tied_time_pairs * non_tied_value_pairs).sqrt();
    if denom > 0.0 {
        s / denom
    } else {
        f64::NAN
    }
}
