//! # Trend Stats
//!
//! Non-parametric trend detection for time series with censored
//! (detection-limit) observations, repeated values, seasonal cycles, and
//! irregular sampling.
//!
//! The workspace splits into focused crates, re-exported here:
//!
//! - [`trend_core`]: observation model, configuration, result record,
//!   confidence classifier
//! - [`trend_kendall`]: pairwise comparison oracle and the Mann-Kendall
//!   statistic
//! - [`trend_sen`]: Sen's slope estimator and its rank-based confidence
//!   interval
//! - [`trend_analysis`]: seasonal partitioning and the top-level driver
//!
//! # Example
//!
//! ```rust
//! use trend_stats::{analyze, AnalysisConfig, Observation};
//!
//! let series: Vec<Observation> = (2000..2011)
//!     .map(|year| Observation::exact(year as f64, 5.0 + 0.4 * (year - 2000) as f64))
//!     .collect();
//!
//! let result = analyze(&series, &AnalysisConfig::default()).unwrap();
//! assert!(result.is_significant(0.05));
//! assert!(result.classification.ends_with("Increasing"));
//! ```
//!
//! Censored observations enter the same pipeline through their constructors:
//!
//! ```rust
//! use trend_stats::{analyze, AnalysisConfig, Observation};
//!
//! let series = vec![
//!     Observation::left_censored(2015.0, 5.0),
//!     Observation::exact(2016.0, 6.0),
//!     Observation::exact(2017.0, 7.0),
//!     Observation::exact(2018.0, 9.0),
//!     Observation::exact(2019.0, 10.0),
//! ];
//! let result = analyze(&series, &AnalysisConfig::default()).unwrap();
//! assert_eq!(result.n_censored, 1);
//! ```

pub use trend_analysis::{analyze, season_index, season_label};
pub use trend_core::{
    censor_census, classify, distinct_times, has_tied_times, notes, AnalysisConfig, CategoryMap,
    CensorCensus, CensorKind, CiMethod, ComputationMode, Error, MkTestMethod, Observation,
    Result, SeasonSpec, SensSlopeMethod, TieBreakMethod, TrendDirection, TrendResult,
};
pub use trend_kendall::{
    mann_kendall, tau_b, two_sided_p, z_score, MkStatistic, PairSet, PairSign, PairSlope,
    PairwiseComparator,
};
pub use trend_sen::{sen_slope, slope_interval, SenEstimate, SlopeInterval, SlopeSample};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        analyze, AnalysisConfig, CategoryMap, CensorKind, CiMethod, MkTestMethod, Observation,
        SeasonSpec, SensSlopeMethod, TieBreakMethod, TrendDirection, TrendResult,
    };
}
