//! # Seasonal Trend Analysis Driver
//!
//! Ties the engine together: season partitioning, per-group Mann-Kendall and
//! slope pools, additive pooling of S and varS across seasons, the combined
//! Sen's slope from the union pool, confidence classification, and advisory
//! assembly into one `TrendResult`.
//!
//! Comparisons never cross season boundaries; pooled significance assumes
//! season independence. Callers needing autocorrelation-corrected variance
//! inject it externally.

pub mod analysis;
pub mod season;

pub use analysis::analyze;
pub use season::{season_index, season_label};
