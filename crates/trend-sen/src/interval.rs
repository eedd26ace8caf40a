//! Rank-based confidence interval for the Sen's slope
//!
//! Follows the Gilbert (1987) construction: the interval endpoints are order
//! statistics of the sorted pairwise-slope pool, picked `C_alpha =
//! z_{1-alpha/2} * sqrt(varS)` ranks either side of the middle. The `Direct`
//! method uses integer ranks; the legacy `Lwp` method linearly interpolates
//! between adjacent order statistics at the same real-valued ranks.

use statrs::distribution::{ContinuousCDF, Normal};
use trend_core::{CiMethod, Error, Result};

/// Confidence bounds on the slope, `NaN` when the pool cannot support them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeInterval {
    /// Lower confidence bound
    pub lower: f64,
    /// Upper confidence bound
    pub upper: f64,
    /// The requested alpha exceeds what the slope pool can resolve
    pub unattainable: bool,
}

impl SlopeInterval {
    fn undefined() -> Self {
        Self {
            lower: f64::NAN,
            upper: f64::NAN,
            unattainable: true,
        }
    }
}

/// Compute the slope confidence interval from the sorted slope pool
///
/// `sorted_slopes` must be ascending and NaN-free. A pool too small for the
/// requested alpha (or an empty pool) yields NaN bounds rather than an
/// error; only a malformed alpha is a programmer error.
pub fn slope_interval(
    sorted_slopes: &[f64],
    var_s: f64,
    alpha: f64,
    method: CiMethod,
) -> Result<SlopeInterval> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(Error::invalid_alpha(alpha));
    }
    let ns = sorted_slopes.len();
    if ns == 0 {
        return Ok(SlopeInterval::undefined());
    }

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| Error::Computation(format!("Failed to create normal distribution: {e}")))?;
    let z = normal.inverse_cdf(1.0 - alpha / 2.0);
    let c_alpha = z * var_s.max(0.0).sqrt();

    if !c_alpha.is_finite() || c_alpha >= ns as f64 {
        return Ok(SlopeInterval::undefined());
    }

    // 1-indexed ranks into the sorted pool
    let lower_rank = (ns as f64 - c_alpha) / 2.0;
    let upper_rank = (ns as f64 + c_alpha) / 2.0 + 1.0;

    let (lower, upper) = match method {
        CiMethod::Direct => (
            pick(sorted_slopes, lower_rank.floor()),
            pick(sorted_slopes, upper_rank.ceil()),
        ),
        CiMethod::Lwp => (
            interpolate(sorted_slopes, lower_rank),
            interpolate(sorted_slopes, upper_rank),
        ),
    };

    Ok(SlopeInterval {
        lower,
        upper,
        unattainable: false,
    })
}

/// Order statistic at a 1-indexed rank, clamped into the pool
fn pick(sorted_slopes: &[f64], rank: f64) -> f64 {
    let ns = sorted_slopes.len();
    let index = (rank as isize - 1).clamp(0, ns as isize - 1) as usize;
    sorted_slopes[index]
}

/// Linear blend of the order statistics either side of a real-valued rank
fn interpolate(sorted_slopes: &[f64], rank: f64) -> f64 {
    let ns = sorted_slopes.len();
    if rank <= 1.0 {
        return sorted_slopes[0];
    }
    if rank >= ns as f64 {
        return sorted_slopes[ns - 1];
    }
    let base = rank.floor();
    let frac = rank - base;
    let index = base as usize - 1;
    sorted_slopes[index] + frac * (sorted_slopes[index + 1] - sorted_slopes[index])
}
