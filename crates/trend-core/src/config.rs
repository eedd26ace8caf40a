//! Analysis configuration
//!
//! One immutable configuration object threaded through every component call.
//! Each knob is orthogonal: the MK sign method, the slope-pool ambiguity
//! policy, the confidence-interval rank arithmetic, and the tie-correction
//! scheme can all be set independently.

use crate::classify::CategoryMap;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How pairwise signs are derived for the Mann-Kendall statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MkTestMethod {
    /// Derive signs from provable set relations between censored bounds;
    /// never fabricates a numeric value for a censored observation
    Robust,
    /// Legacy-compatibility substitution: censored values are replaced by a
    /// numeric shadow series once per analysis, then compared as ordinary
    /// numbers
    Lwp,
}

/// How ambiguous entries are treated in the Sen's-slope pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensSlopeMethod {
    /// Drop ambiguous pairs from the pool
    Nan,
    /// Keep ambiguous pairs as literal zero slopes
    Lwp,
}

/// How the slope confidence-interval ranks are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CiMethod {
    /// Integer rank indices into the sorted slope pool (Gilbert 1987)
    Direct,
    /// Linear interpolation between adjacent order statistics at the same
    /// real-valued ranks (legacy emulation)
    Lwp,
}

/// Which tie groups enter the variance correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreakMethod {
    /// Exact value ties, censor-level groups, ambiguous pairs, and tied
    /// timestamps
    Standard,
    /// Exact value ties only, emulating the legacy R script under
    /// non-aggregated censored data
    Lwp,
}

/// Season key for seasonal stratification
///
/// Calendar kinds interpret the time axis as seconds since the Unix epoch
/// (UTC). `Cycle` is calendar-free: the time axis is folded modulo `period`
/// and split into `bins` equal groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SeasonSpec {
    /// Calendar month (1-12)
    Month,
    /// Day of week (Monday = 0)
    DayOfWeek,
    /// Calendar quarter (1-4)
    Quarter,
    /// Hour of day (0-23)
    Hour,
    /// Ordinal day of year (1-366)
    DayOfYear,
    /// Caller-supplied period folded into equal bins
    Cycle { period: f64, bins: usize },
}

/// Immutable configuration for one trend analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Pairwise sign derivation method
    pub mk_test_method: MkTestMethod,
    /// Ambiguous-slope policy for the Sen pool
    pub sens_slope_method: SensSlopeMethod,
    /// Confidence-interval rank arithmetic
    pub ci_method: CiMethod,
    /// Variance tie-correction scheme
    pub tie_break_method: TieBreakMethod,
    /// Two-sided significance level for the slope CI, in (0, 1)
    pub alpha: f64,
    /// Substitution multiplier for left-censored limits
    pub lt_mult: f64,
    /// Substitution multiplier for right-censored limits
    pub gt_mult: f64,
    /// Re-censor all values below the highest left-censor limit at that limit
    pub hicensor: bool,
    /// Seasonal stratification; `None` analyzes the series as one group
    pub season: Option<SeasonSpec>,
    /// Minimum observations per season group; smaller groups are skipped
    pub min_size: Option<usize>,
    /// Confidence-category table for the classifier
    pub categories: CategoryMap,
    /// Upper bound on evaluated pairs; beyond it a seeded subset is drawn
    pub max_pairs: Option<usize>,
    /// Seed for the bounded-pair sampling mode
    pub seed: Option<u64>,
    /// Raise on fatal data cases instead of returning a degenerate result
    pub strict: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mk_test_method: MkTestMethod::Robust,
            sens_slope_method: SensSlopeMethod::Nan,
            ci_method: CiMethod::Direct,
            tie_break_method: TieBreakMethod::Standard,
            alpha: 0.05,
            lt_mult: 0.5,
            gt_mult: 1.0,
            hicensor: false,
            season: None,
            min_size: None,
            categories: CategoryMap::default(),
            max_pairs: None,
            seed: None,
            strict: false,
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with the default robust settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the MK sign method
    pub fn with_mk_test_method(mut self, method: MkTestMethod) -> Self {
        self.mk_test_method = method;
        self
    }

    /// Set the ambiguous-slope policy
    pub fn with_sens_slope_method(mut self, method: SensSlopeMethod) -> Self {
        self.sens_slope_method = method;
        self
    }

    /// Set the CI rank arithmetic
    pub fn with_ci_method(mut self, method: CiMethod) -> Self {
        self.ci_method = method;
        self
    }

    /// Set the variance tie-correction scheme
    pub fn with_tie_break_method(mut self, method: TieBreakMethod) -> Self {
        self.tie_break_method = method;
        self
    }

    /// Set the two-sided significance level
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the left-censor substitution multiplier
    pub fn with_lt_mult(mut self, lt_mult: f64) -> Self {
        self.lt_mult = lt_mult;
        self
    }

    /// Set the right-censor substitution multiplier
    pub fn with_gt_mult(mut self, gt_mult: f64) -> Self {
        self.gt_mult = gt_mult;
        self
    }

    /// Enable or disable the hicensor pre-processing rule
    pub fn with_hicensor(mut self, hicensor: bool) -> Self {
        self.hicensor = hicensor;
        self
    }

    /// Enable seasonal stratification
    pub fn with_season(mut self, season: SeasonSpec) -> Self {
        self.season = Some(season);
        self
    }

    /// Set the per-season minimum group size
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = Some(min_size);
        self
    }

    /// Replace the confidence-category table
    pub fn with_categories(mut self, categories: CategoryMap) -> Self {
        self.categories = categories;
        self
    }

    /// Bound the pair scan, drawing a seeded subset beyond `max_pairs`
    pub fn with_max_pairs(mut self, max_pairs: usize) -> Self {
        self.max_pairs = Some(max_pairs);
        self
    }

    /// Seed for the bounded-pair sampling mode
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable strict validation (fatal data cases become errors)
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Reject malformed configuration
    ///
    /// Called once at the top of an analysis; everything downstream may rely
    /// on these bounds.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::invalid_alpha(self.alpha));
        }
        if self.lt_mult <= 0.0 || !self.lt_mult.is_finite() {
            return Err(Error::invalid_multiplier("lt_mult", self.lt_mult));
        }
        if self.gt_mult <= 0.0 || !self.gt_mult.is_finite() {
            return Err(Error::invalid_multiplier("gt_mult", self.gt_mult));
        }
        if let Some(SeasonSpec::Cycle { period, bins }) = self.season {
            if period <= 0.0 || !period.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "Season period {period} must be positive and finite"
                )));
            }
            if bins == 0 {
                return Err(Error::InvalidParameter(
                    "Season bin count must be at least 1".to_string(),
                ));
            }
        }
        if let Some(0) = self.max_pairs {
            return Err(Error::InvalidParameter(
                "max_pairs must be at least 1".to_string(),
            ));
        }
        if self.categories.is_empty() {
            return Err(Error::InvalidParameter(
                "Category table must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective minimum season size (defaults to 4 under stratification)
    pub fn effective_min_size(&self) -> usize {
        match (self.min_size, self.season) {
            (Some(m), _) => m,
            (None, Some(_)) => 4,
            (None, None) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = AnalysisConfig::new()
            .with_mk_test_method(MkTestMethod::Lwp)
            .with_sens_slope_method(SensSlopeMethod::Lwp)
            .with_alpha(0.1)
            .with_lt_mult(0.1)
            .with_season(SeasonSpec::Month)
            .with_min_size(5)
            .with_strict(true);

        assert_eq!(config.mk_test_method, MkTestMethod::Lwp);
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.effective_min_size(), 5);
        assert!(config.strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_alpha() {
        assert!(AnalysisConfig::new().with_alpha(0.0).validate().is_err());
        assert!(AnalysisConfig::new().with_alpha(1.0).validate().is_err());
        assert!(AnalysisConfig::new().with_alpha(-0.5).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_multipliers() {
        assert!(AnalysisConfig::new().with_lt_mult(0.0).validate().is_err());
        assert!(AnalysisConfig::new()
            .with_gt_mult(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_rejects_bad_cycle() {
        let config = AnalysisConfig::new().with_season(SeasonSpec::Cycle {
            period: 0.0,
            bins: 4,
        });
        assert!(config.validate().is_err());

        let config = AnalysisConfig::new().with_season(SeasonSpec::Cycle {
            period: 7.0,
            bins: 0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_min_size_defaults() {
        assert_eq!(AnalysisConfig::new().effective_min_size(), 0);
        assert_eq!(
            AnalysisConfig::new()
                .with_season(SeasonSpec::Month)
                .effective_min_size(),
            4
        );
    }
}
