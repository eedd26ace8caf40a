//! The trend analysis result record
//!
//! One fixed-shape record per analysis call, never mutated after return.
//! Statistic fields are `Option<f64>`: `None` on the fatal path (no statistic
//! computable), `Some(NaN)` where a specific value degrades (e.g. a
//! confidence-interval bound the slope pool cannot support). Advisory notes
//! accumulate in order as machine-checkable strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the detected trend, taken from the sign of S
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    /// S > 0
    Increasing,
    /// S < 0
    Decreasing,
    /// S == 0 or no statistic computable
    None,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::None => write!(f, "none"),
        }
    }
}

/// Whether the pair scan was exhaustive or a bounded seeded sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputationMode {
    /// Every eligible pair was evaluated
    Exact,
    /// A seeded subset of pairs was evaluated; statistics are approximate
    Sampled,
}

/// Machine-checkable advisory note strings
///
/// Collaborators match on these exact strings (or the `WARNING:` prefix), so
/// they are constants rather than formatted ad hoc.
pub mod notes {
    /// Fatal: fewer than two observations
    pub const TOO_FEW_OBSERVATIONS: &str = "fewer than 2 observations; no statistic computable";
    /// Fatal: all observations share one time coordinate
    pub const TOO_FEW_DISTINCT_TIMES: &str =
        "fewer than 2 distinct times; no statistic computable";
    /// Duplicate time coordinates detected (aggregation collaborator skipped?)
    pub const TIED_TIMESTAMPS: &str = "tied timestamps present";
    /// varS is not positive; Z and p fall back to 0 and 1
    pub const DEGENERATE_VARIANCE: &str = "variance of S is not positive; Z and p are degenerate";
    /// One value makes up more than half the series
    pub const LONG_IDENTICAL_RUN: &str = "over half of the values are a single repeated value";
    /// Every observation is censored at the same level
    pub const ALL_CENSORED_ONE_LEVEL: &str = "all observations censored at a single level";
    /// Group smaller than the configured minimum size
    pub const BELOW_MIN_SIZE: &str = "sample smaller than the configured minimum size";
    /// No valid pairwise slopes
    pub const EMPTY_SLOPE_POOL: &str = "no valid pairwise slopes; Sen slope undefined";
    /// The slope pool cannot support the requested alpha
    pub const CI_UNATTAINABLE: &str =
        "slope pool too small for the requested alpha; confidence interval undefined";
    /// The reported slope is driven by left-censored comparisons
    pub const SLOPE_LEFT_CENSORED: &str =
        "WARNING: Sen slope influenced by left-censored values";
    /// The reported slope is driven by right-censored comparisons
    pub const SLOPE_RIGHT_CENSORED: &str =
        "WARNING: Sen slope influenced by right-censored values";
    /// The hicensor pre-processing rule rewrote part of the series
    pub const HICENSOR_APPLIED: &str =
        "hicensor applied: values below the highest left-censor limit re-censored";
    /// One or more season groups were skipped
    pub const SEASONS_SKIPPED: &str = "seasons skipped for insufficient observations";
    /// The pair scan was sampled rather than exhaustive
    pub const SAMPLED_PAIRS: &str = "pair scan sampled; statistics are approximate";
}

/// Result of one trend analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Mann-Kendall S statistic
    pub s: Option<f64>,
    /// Tie-corrected variance of S
    pub var_s: Option<f64>,
    /// Continuity-corrected standard normal deviate
    pub z: Option<f64>,
    /// Two-sided p-value
    pub p: Option<f64>,
    /// Kendall's tau-b
    pub tau: Option<f64>,
    /// Sen's slope (median pairwise slope)
    pub slope: Option<f64>,
    /// Intercept through (median time, median value)
    pub intercept: Option<f64>,
    /// Lower confidence bound on the slope
    pub lower_ci: Option<f64>,
    /// Upper confidence bound on the slope
    pub upper_ci: Option<f64>,
    /// Confidence in the observed trend direction, `1 - p/2`
    pub confidence: Option<f64>,
    /// Confidence that the trend is decreasing
    pub confidence_decreasing: Option<f64>,
    /// Direction of the detected trend
    pub direction: TrendDirection,
    /// Category label from the classifier
    pub classification: String,
    /// Ordered data-quality advisories
    pub notes: Vec<String>,
    /// Number of observations analyzed
    pub n: usize,
    /// Number of censored observations
    pub n_censored: usize,
    /// Number of distinct (kind, limit) censor levels
    pub n_unique_censor_levels: usize,
    /// Exhaustive or sampled pair scan
    pub computation_mode: ComputationMode,
    /// Number of pairs actually evaluated
    pub pairs_used: usize,
    /// Labels of season groups skipped for insufficient observations
    pub seasons_skipped: Vec<String>,
}

impl TrendResult {
    /// A fatal result: no statistic computable, fields empty, note attached
    pub fn fatal(n: usize, n_censored: usize, n_unique_censor_levels: usize, note: &str) -> Self {
        Self {
            s: None,
            var_s: None,
            z: None,
            p: None,
            tau: None,
            slope: None,
            intercept: None,
            lower_ci: None,
            upper_ci: None,
            confidence: None,
            confidence_decreasing: None,
            direction: TrendDirection::None,
            classification: String::new(),
            notes: vec![note.to_string()],
            n,
            n_censored,
            n_unique_censor_levels,
            computation_mode: ComputationMode::Exact,
            pairs_used: 0,
            seasons_skipped: Vec::new(),
        }
    }

    /// Whether any statistic was computed at all
    pub fn is_fatal(&self) -> bool {
        self.s.is_none()
    }

    /// Whether the two-sided p-value is below the given significance level
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p.map(|p| p < alpha).unwrap_or(false)
    }

    /// Whether a note with this exact text (or prefix) was recorded
    pub fn has_note(&self, text: &str) -> bool {
        self.notes.iter().any(|n| n == text || n.starts_with(text))
    }
}

impl fmt::Display for TrendResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trend Analysis Result:")?;
        writeln!(f, "  n: {} ({} censored)", self.n, self.n_censored)?;
        match (self.s, self.p, self.slope) {
            (Some(s), Some(p), Some(slope)) => {
                writeln!(f, "  S: {s}, p: {p:.4}, slope: {slope:.4}")?;
            }
            _ => writeln!(f, "  no statistic computable")?,
        }
        if !self.classification.is_empty() {
            writeln!(f, "  classification: {}", self.classification)?;
        }
        for note in &self.notes {
            writeln!(f, "  note: {note}")?;
        }
        Ok(())
    }
}
