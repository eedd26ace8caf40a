//! The observation model: one (time, value, censoring) sample
//!
//! Censoring is decided once, at construction, as a tagged variant. Nothing
//! downstream re-inspects string patterns or sentinel values: an observation
//! is either an exact measurement or a bound (`<L` / `>L`) and carries the
//! reported detection limit explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Censoring state of a single observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CensorKind {
    /// Exact (uncensored) measurement
    None,
    /// Value known only to be below the detection limit (`<L`)
    Left,
    /// Value known only to be above the detection limit (`>L`)
    Right,
}

impl CensorKind {
    /// Whether this observation carries a bound rather than a measurement
    pub fn is_censored(self) -> bool {
        !matches!(self, CensorKind::None)
    }
}

impl fmt::Display for CensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CensorKind::None => write!(f, "uncensored"),
            CensorKind::Left => write!(f, "left-censored"),
            CensorKind::Right => write!(f, "right-censored"),
        }
    }
}

/// One immutable (time, value, censoring) sample
///
/// Invariant: for an exact observation `limit == value`; for a censored
/// observation `limit` holds the reported bound and `value` must not be read
/// as a measurement. The constructors are the only way to build one, so the
/// invariant holds by construction.
///
/// Time is an already-normalized numeric axis (e.g. seconds since epoch, or
/// decimal years); the engine never parses datetimes itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    time: f64,
    value: f64,
    censor: CensorKind,
    limit: f64,
}

impl Observation {
    /// An exact (uncensored) measurement
    pub fn exact(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            censor: CensorKind::None,
            limit: value,
        }
    }

    /// A left-censored observation: true value < `limit`
    pub fn left_censored(time: f64, limit: f64) -> Self {
        Self {
            time,
            value: limit,
            censor: CensorKind::Left,
            limit,
        }
    }

    /// A right-censored observation: true value > `limit`
    pub fn right_censored(time: f64, limit: f64) -> Self {
        Self {
            time,
            value: limit,
            censor: CensorKind::Right,
            limit,
        }
    }

    /// Numeric time coordinate
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Exact measured value
    ///
    /// Only meaningful when `censor() == CensorKind::None`; for censored
    /// observations use `limit()`.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Censoring state
    pub fn censor(&self) -> CensorKind {
        self.censor
    }

    /// Reported detection limit (equal to `value()` when uncensored)
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Whether this observation is censored in either direction
    pub fn is_censored(&self) -> bool {
        self.censor.is_censored()
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.censor {
            CensorKind::None => write!(f, "({}, {})", self.time, self.value),
            CensorKind::Left => write!(f, "({}, <{})", self.time, self.limit),
            CensorKind::Right => write!(f, "({}, >{})", self.time, self.limit),
        }
    }
}

/// Summary of the censoring structure of a series
///
/// Computed in one pass and reused by the statistic, the slope estimator, and
/// the advisory notes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CensorCensus {
    /// Number of censored observations (either direction)
    pub n_censored: usize,
    /// Number of left-censored observations
    pub n_left: usize,
    /// Number of right-censored observations
    pub n_right: usize,
    /// Number of distinct (kind, limit) censor levels
    pub n_unique_levels: usize,
}

/// Scan a series for its censoring structure
pub fn censor_census(series: &[Observation]) -> CensorCensus {
    let mut census = CensorCensus::default();
    let mut levels: Vec<(CensorKind, f64)> = Vec::new();
    for obs in series {
        match obs.censor() {
            CensorKind::None => {}
            kind => {
                census.n_censored += 1;
                match kind {
                    CensorKind::Left => census.n_left += 1,
                    CensorKind::Right => census.n_right += 1,
                    CensorKind::None => unreachable!(),
                }
                let level = (kind, obs.limit());
                if !levels.iter().any(|&(k, l)| k == level.0 && l == level.1) {
                    levels.push(level);
                }
            }
        }
    }
    census.n_unique_levels = levels.len();
    census
}

/// Number of distinct time coordinates in a time-sorted series
pub fn distinct_times(series: &[Observation]) -> usize {
    let mut count = 0;
    let mut last: Option<f64> = None;
    for obs in series {
        if last != Some(obs.time()) {
            count += 1;
            last = Some(obs.time());
        }
    }
    count
}

/// Whether a time-sorted series contains duplicate time coordinates
pub fn has_tied_times(series: &[Observation]) -> bool {
    series.windows(2).any(|w| w[0].time() == w[1].time())
}

/// Verify the series is sorted by time, returning the first offending index
pub fn first_order_violation(series: &[Observation]) -> Option<usize> {
    series
        .windows(2)
        .position(|w| w[0].time() > w[1].time())
        .map(|i| i + 1)
}
