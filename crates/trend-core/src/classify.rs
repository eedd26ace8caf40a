//! Confidence classification
//!
//! Maps a confidence value into a human-readable category using an ordered
//! threshold table, then appends the trend direction word. Stateless: it can
//! be re-run on an already-computed result with a different table, independent
//! of the alpha used at computation time.

use crate::result::TrendDirection;
use serde::{Deserialize, Serialize};

/// Ordered mapping of confidence lower bounds to category labels
///
/// Entries are kept sorted ascending by threshold; classification walks them
/// from highest to lowest and the first threshold at or below the confidence
/// wins. The default table is an IPCC-style likelihood ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMap {
    entries: Vec<(f64, String)>,
}

impl CategoryMap {
    /// Build a table from (lower bound, label) pairs
    ///
    /// Entries are sorted by threshold; duplicates keep their relative order.
    pub fn new<S, I>(entries: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (f64, S)>,
    {
        let mut entries: Vec<(f64, String)> = entries
            .into_iter()
            .map(|(threshold, label)| (threshold, label.into()))
            .collect();
        entries.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { entries }
    }

    /// The (threshold, label) entries, ascending by threshold
    pub fn entries(&self) -> &[(f64, String)] {
        &self.entries
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label for a confidence value: the highest threshold `<= confidence`
    ///
    /// Falls back to the lowest entry when the confidence sits below every
    /// threshold (e.g. a slightly negative value from numeric noise).
    pub fn label_for(&self, confidence: f64) -> &str {
        self.entries
            .iter()
            .rev()
            .find(|(threshold, _)| *threshold <= confidence)
            .or_else(|| self.entries.first())
            .map(|(_, label)| label.as_str())
            .unwrap_or("")
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::new([
            (0.0, "As Likely as Not"),
            (0.67, "Likely"),
            (0.90, "Very Likely"),
            (0.95, "Highly Likely"),
            (0.99, "Virtually Certain"),
        ])
    }
}

/// Classify a confidence value and direction into a category string
///
/// The direction word is appended for increasing/decreasing trends; a
/// directionless result keeps the bare category label.
pub fn classify(confidence: f64, direction: TrendDirection, table: &CategoryMap) -> String {
    let label = table.label_for(confidence);
    match direction {
        TrendDirection::Increasing => format!("{label} Increasing"),
        TrendDirection::Decreasing => format!("{label} Decreasing"),
        TrendDirection::None => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ladder() {
        let table = CategoryMap::default();
        assert_eq!(table.label_for(0.5), "As Likely as Not");
        assert_eq!(table.label_for(0.67), "Likely");
        assert_eq!(table.label_for(0.89), "Likely");
        assert_eq!(table.label_for(0.90), "Very Likely");
        assert_eq!(table.label_for(0.951), "Highly Likely");
        assert_eq!(table.label_for(0.999), "Virtually Certain");
        assert_eq!(table.label_for(1.0), "Virtually Certain");
    }

    #[test]
    fn test_below_lowest_threshold_falls_back() {
        let table = CategoryMap::new([(0.5, "High"), (0.2, "Low")]);
        assert_eq!(table.label_for(0.1), "Low");
        assert_eq!(table.label_for(-0.001), "Low");
    }

    #[test]
    fn test_direction_word() {
        let table = CategoryMap::default();
        assert_eq!(
            classify(0.97, TrendDirection::Increasing, &table),
            "Highly Likely Increasing"
        );
        assert_eq!(
            classify(0.92, TrendDirection::Decreasing, &table),
            "Very Likely Decreasing"
        );
        assert_eq!(
            classify(0.5, TrendDirection::None, &table),
            "As Likely as Not"
        );
    }

    #[test]
    fn test_custom_table_unsorted_input() {
        let table = CategoryMap::new([(0.9, "Strong"), (0.0, "Weak"), (0.5, "Moderate")]);
        assert_eq!(table.label_for(0.6), "Moderate");
        assert_eq!(table.label_for(0.95), "Strong");
        assert_eq!(table.entries()[0].1, "Weak");
    }
}
