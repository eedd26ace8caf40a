//! Small numeric utilities shared across the trend-stats crates

/// Sort a copy of the data, placing NaN values at the end
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap(),
    });
    sorted
}

/// Median of a slice; NaN for an empty slice
///
/// NaN entries are ignored. Even-length medians average the two middle order
/// statistics.
pub fn median(data: &[f64]) -> f64 {
    let clean: Vec<f64> = data.iter().copied().filter(|v| !v.is_nan()).collect();
    if clean.is_empty() {
        return f64::NAN;
    }
    median_sorted(&sorted(&clean))
}

/// Median of already-sorted, NaN-free data; NaN for an empty slice
pub fn median_sorted(sorted_data: &[f64]) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        sorted_data[n / 2]
    } else {
        (sorted_data[n / 2 - 1] + sorted_data[n / 2]) / 2.0
    }
}
