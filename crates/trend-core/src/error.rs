//! Error types for trend analysis
//!
//! Provides a unified error type for all trend-stats crates.
//!
//! Data-quality problems (censoring ambiguity, degenerate variance, short
//! series) are *not* errors: they degrade to `NaN`/`None` fields plus an
//! advisory note on the result. Only programmer errors surface through this
//! type: malformed configuration, mismatched inputs, or a fatal data case
//! under strict validation.

use thiserror::Error;

/// Core error type for trend-statistic operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation (strict mode only)
    #[error("Insufficient data: expected at least {expected} observations, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for an alpha outside (0, 1)
    pub fn invalid_alpha(alpha: f64) -> Self {
        Self::InvalidParameter(format!("Significance level {alpha} must be in (0, 1)"))
    }

    /// Create an error for a non-positive censor multiplier
    pub fn invalid_multiplier(name: &str, value: f64) -> Self {
        Self::InvalidParameter(format!("Censor multiplier {name}={value} must be positive"))
    }

    /// Create an error for a series that is not sorted by time
    pub fn unsorted_series(index: usize) -> Self {
        Self::InvalidInput(format!(
            "Series must be sorted by time: order violated at index {index}"
        ))
    }
}
