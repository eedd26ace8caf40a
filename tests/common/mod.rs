//! Shared helpers for the integration suites

use trend_stats::Observation;

/// Build an uncensored series from parallel time/value slices
pub fn exact_series(times: &[f64], values: &[f64]) -> Vec<Observation> {
    assert_eq!(times.len(), values.len());
    times
        .iter()
        .zip(values)
        .map(|(&t, &v)| Observation::exact(t, v))
        .collect()
}

/// Evenly spaced yearly series starting at 2000
pub fn yearly_series(values: &[f64]) -> Vec<Observation> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Observation::exact(2000.0 + i as f64, v))
        .collect()
}
