//! The top-level trend analysis driver
//!
//! Runs the whole pipeline for one series: validation, optional hicensor
//! pre-processing, optional seasonal partition, the Mann-Kendall statistic
//! and slope pool per group, pooling across groups, classification, and
//! advisory-note assembly into one `TrendResult`.
//!
//! Data-quality problems never raise. The fatal cases (fewer than two
//! observations or two distinct times) return a result with empty statistic
//! fields and an explanatory note unless `strict` validation was requested.

use std::collections::BTreeMap;

use trend_core::{
    censor_census, classify, distinct_times, first_order_violation, has_tied_times, notes,
    AnalysisConfig, CensorCensus, CensorKind, ComputationMode, Error, Observation, Result,
    TrendDirection, TrendResult,
};
use trend_kendall::{mann_kendall, tau_b, two_sided_p, z_score, PairSet, PairwiseComparator};
use trend_sen::{intercept_at_medians, median_of_pool, slope_interval, slope_pool, SlopeSample};

use crate::season::{season_index, season_label};

/// Analyze one series under the given configuration
///
/// The series should be sorted by time; an unsorted series is sorted into a
/// working copy (or rejected under `strict`). Returns `Err` only for
/// programmer errors: malformed configuration, unrepresentable season
/// times, or fatal data cases under `strict`.
pub fn analyze(series: &[Observation], config: &AnalysisConfig) -> Result<TrendResult> {
    config.validate()?;

    let mut data: Vec<Observation> = series.to_vec();
    if let Some(index) = first_order_violation(&data) {
        if config.strict {
            return Err(Error::unsorted_series(index));
        }
        data.sort_by(|a, b| a.time().total_cmp(&b.time()));
    }

    let mut advisories: Vec<String> = Vec::new();

    if config.hicensor && apply_hicensor(&mut data) {
        advisories.push(notes::HICENSOR_APPLIED.to_string());
    }

    let census = censor_census(&data);
    let n = data.len();

    if n < 2 {
        if config.strict {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: n,
            });
        }
        return Ok(fatal_result(
            advisories,
            notes::TOO_FEW_OBSERVATIONS,
            n,
            &census,
            Vec::new(),
        ));
    }
    if distinct_times(&data) < 2 {
        if config.strict {
            return Err(Error::InvalidInput(
                "fewer than 2 distinct times in series".to_string(),
            ));
        }
        return Ok(fatal_result(
            advisories,
            notes::TOO_FEW_DISTINCT_TIMES,
            n,
            &census,
            Vec::new(),
        ));
    }

    if has_tied_times(&data) {
        advisories.push(notes::TIED_TIMESTAMPS.to_string());
    }
    if long_identical_run(&data) {
        advisories.push(notes::LONG_IDENTICAL_RUN.to_string());
    }
    if census.n_censored == n && census.n_unique_levels == 1 {
        advisories.push(notes::ALL_CENSORED_ONE_LEVEL.to_string());
    }
    if config.season.is_none() {
        if let Some(min_size) = config.min_size {
            if n < min_size {
                advisories.push(notes::BELOW_MIN_SIZE.to_string());
            }
        }
    }

    let full = PairwiseComparator::new(&data, config);
    let (groups, seasons_skipped) = partition(&data, config)?;
    if !seasons_skipped.is_empty() {
        advisories.push(format!(
            "{}: {}",
            notes::SEASONS_SKIPPED,
            seasons_skipped.join(", ")
        ));
    }

    if groups.is_empty() {
        if config.strict {
            return Err(Error::InsufficientData {
                expected: config.effective_min_size(),
                actual: 0,
            });
        }
        return Ok(fatal_result(
            advisories,
            notes::TOO_FEW_OBSERVATIONS,
            n,
            &census,
            seasons_skipped,
        ));
    }

    // Per-group statistics, pooled additively across seasons
    let group_totals: Vec<usize> = groups
        .iter()
        .map(|(_, indices)| indices.len() * (indices.len() - 1) / 2)
        .collect();
    let grand_total: usize = group_totals.iter().sum();

    let mut s_total = 0.0;
    let mut var_total = 0.0;
    let mut non_tied_time = 0.0;
    let mut non_tied_value = 0.0;
    let mut pairs_used = 0usize;
    let mut sampled = false;
    let mut pool: Vec<SlopeSample> = Vec::new();

    for (k, (label, indices)) in groups.iter().enumerate() {
        let group_obs: Vec<Observation> = indices.iter().map(|&i| data[i]).collect();
        let cmp = match full.shadow() {
            Some(shadow) => PairwiseComparator::with_shadow(
                &group_obs,
                indices.iter().map(|&i| shadow[i]).collect(),
            ),
            None => PairwiseComparator::new(&group_obs, config),
        };
        let pair_cap = config
            .max_pairs
            .map(|m| proportional_cap(m, group_totals[k], grand_total));
        let pairs = PairSet::new(
            group_obs.len(),
            pair_cap,
            Some(config.seed.unwrap_or(0).wrapping_add(k as u64)),
        );
        let mk = mann_kendall(&cmp, &pairs, config);
        tracing::debug!(
            group = label.as_str(),
            n = mk.n,
            s = mk.s,
            var_s = mk.var_s,
            "season group statistic"
        );

        s_total += mk.s;
        var_total += mk.var_s;
        non_tied_time += mk.non_tied_time_pairs;
        non_tied_value += mk.non_tied_value_pairs;
        pairs_used += pairs.used();
        sampled |= pairs.is_sampled();
        pool.extend(slope_pool(&cmp, &pairs, config));
    }

    pool.sort_by(|a, b| a.slope.total_cmp(&b.slope));

    let degenerate = !(var_total > 0.0);
    if degenerate {
        advisories.push(notes::DEGENERATE_VARIANCE.to_string());
    }
    if sampled {
        advisories.push(notes::SAMPLED_PAIRS.to_string());
    }

    let z = if degenerate {
        0.0
    } else {
        z_score(s_total, var_total)
    };
    let p = if degenerate { 1.0 } else { two_sided_p(z) };
    let tau = tau_b(s_total, non_tied_time, non_tied_value);

    // Combined slope from the union of per-season pools
    let (slope, intercept, lower_ci, upper_ci) = if pool.is_empty() {
        advisories.push(notes::EMPTY_SLOPE_POOL.to_string());
        (f64::NAN, f64::NAN, f64::NAN, f64::NAN)
    } else {
        let (slope, influenced_left, influenced_right) = median_of_pool(&pool);
        let intercept = intercept_at_medians(&full, slope);
        let sorted_slopes: Vec<f64> = pool.iter().map(|sample| sample.slope).collect();
        let interval = slope_interval(&sorted_slopes, var_total, config.alpha, config.ci_method)?;
        if interval.unattainable {
            advisories.push(notes::CI_UNATTAINABLE.to_string());
        }
        if influenced_left {
            advisories.push(notes::SLOPE_LEFT_CENSORED.to_string());
        }
        if influenced_right {
            advisories.push(notes::SLOPE_RIGHT_CENSORED.to_string());
        }
        (slope, intercept, interval.lower, interval.upper)
    };

    let direction = if s_total > 0.0 {
        TrendDirection::Increasing
    } else if s_total < 0.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::None
    };
    let confidence = 1.0 - p / 2.0;
    let confidence_decreasing = match direction {
        TrendDirection::Decreasing => 1.0 - p / 2.0,
        TrendDirection::Increasing => p / 2.0,
        TrendDirection::None => 0.5,
    };
    let classification = classify(confidence, direction, &config.categories);

    Ok(TrendResult {
        s: Some(s_total),
        var_s: Some(var_total),
        z: Some(z),
        p: Some(p),
        tau: Some(tau),
        slope: Some(slope),
        intercept: Some(intercept),
        lower_ci: Some(lower_ci),
        upper_ci: Some(upper_ci),
        confidence: Some(confidence),
        confidence_decreasing: Some(confidence_decreasing),
        direction,
        classification,
        notes: advisories,
        n,
        n_censored: census.n_censored,
        n_unique_censor_levels: census.n_unique_levels,
        computation_mode: if sampled {
            ComputationMode::Sampled
        } else {
            ComputationMode::Exact
        },
        pairs_used,
        seasons_skipped,
    })
}

/// Partition the series into season groups, skipping undersized ones
///
/// Returns time-ordered index groups in season-key order plus the labels of
/// skipped seasons. Without a season spec the whole series is one group.
fn partition(
    data: &[Observation],
    config: &AnalysisConfig,
) -> Result<(Vec<(String, Vec<usize>)>, Vec<String>)> {
    let spec = match config.season {
        None => {
            return Ok((vec![("all".to_string(), (0..data.len()).collect())], Vec::new()));
        }
        Some(spec) => spec,
    };

    let mut keyed: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, obs) in data.iter().enumerate() {
        keyed.entry(season_index(obs.time(), spec)?).or_default().push(i);
    }

    // A group below the minimum (or too small for any pair) is skipped and
    // recorded, never treated as zero-valued
    let min_size = config.effective_min_size().max(2);
    let mut groups = Vec::new();
    let mut skipped = Vec::new();
    for (key, indices) in keyed {
        let label = season_label(spec, key);
        if indices.len() < min_size {
            tracing::debug!(group = label.as_str(), n = indices.len(), "season skipped");
            skipped.push(label);
        } else {
            groups.push((label, indices));
        }
    }
    Ok((groups, skipped))
}

/// Re-censor everything below the highest left-censor limit at that limit
///
/// Corrects the "paper trend" a falling detection limit paints into a
/// censored record. Right-censored rows are untouched. Returns whether any
/// observation changed.
fn apply_hicensor(data: &mut [Observation]) -> bool {
    let max_left = data
        .iter()
        .filter(|o| o.censor() == CensorKind::Left)
        .map(|o| o.limit())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max_left.is_finite() {
        return false;
    }

    let mut changed = false;
    for obs in data.iter_mut() {
        let recensor = match obs.censor() {
            CensorKind::None => obs.value() < max_left,
            CensorKind::Left => obs.limit() < max_left,
            CensorKind::Right => false,
        };
        if recensor {
            *obs = Observation::left_censored(obs.time(), max_left);
            changed = true;
        }
    }
    changed
}

/// Whether one identical value (or censor level) makes up over half the series
fn long_identical_run(data: &[Observation]) -> bool {
    let mut keys: Vec<(u8, f64)> = data
        .iter()
        .map(|o| match o.censor() {
            CensorKind::None => (0u8, o.value()),
            CensorKind::Left => (1u8, o.limit()),
            CensorKind::Right => (2u8, o.limit()),
        })
        .collect();
    keys.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut longest = 0usize;
    let mut run = 0usize;
    let mut prev: Option<(u8, f64)> = None;
    for key in keys {
        if prev == Some(key) {
            run += 1;
        } else {
            run = 1;
            prev = Some(key);
        }
        longest = longest.max(run);
    }
    2 * longest > data.len()
}

fn proportional_cap(max_pairs: usize, group_total: usize, grand_total: usize) -> usize {
    if grand_total == 0 {
        return max_pairs;
    }
    let share = (max_pairs as f64 * group_total as f64 / grand_total as f64).ceil() as usize;
    share.max(1)
}

fn fatal_result(
    mut advisories: Vec<String>,
    note: &str,
    n: usize,
    census: &CensorCensus,
    seasons_skipped: Vec<String>,
) -> TrendResult {
    let mut result = TrendResult::fatal(n, census.n_censored, census.n_unique_levels, note);
    advisories.push(note.to_string());
    result.notes = advisories;
    result.seasons_skipped = seasons_skipped;
    result
}
