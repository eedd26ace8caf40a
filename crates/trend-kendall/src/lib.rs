//! # Censoring-Aware Mann-Kendall
//!
//! The pairwise comparison oracle and the Mann-Kendall trend statistic for
//! series with censored (detection-limit) observations.
//!
//! The oracle assigns each time-ordered pair a sign in {-1, 0, +1} or marks
//! it ambiguous; the statistic folds those signs into S, a tie-corrected
//! variance, the continuity-corrected Z, a two-sided p-value, and Kendall's
//! tau-b. The slope side of the engine lives in `trend-sen`, which shares the
//! oracle and the pair-scan plan defined here.

pub mod compare;
pub mod pairs;
pub mod statistic;

pub use compare::{PairSign, PairSlope, PairwiseComparator};
pub use pairs::PairSet;
pub use statistic::{mann_kendall, tau_b, two_sided_p, z_score, MkStatistic};
