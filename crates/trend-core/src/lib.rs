//! Core types for censored-data trend analysis
//!
//! This crate holds the vocabulary shared by the whole workspace: the tagged
//! observation model, the immutable analysis configuration, the fixed-shape
//! result record with its advisory notes, and the confidence classifier. The
//! statistic and slope engines live in `trend-kendall` and `trend-sen`; the
//! seasonal driver lives in `trend-analysis`.

pub mod classify;
pub mod config;
pub mod error;
pub mod math;
pub mod observation;
pub mod result;

pub use classify::{classify, CategoryMap};
pub use config::{
    AnalysisConfig, CiMethod, MkTestMethod, SeasonSpec, SensSlopeMethod, TieBreakMethod,
};
pub use error::{Error, Result};
pub use observation::{
    censor_census, distinct_times, first_order_violation, has_tied_times, CensorCensus,
    CensorKind, Observation,
};
pub use result::{notes, ComputationMode, TrendDirection, TrendResult};
