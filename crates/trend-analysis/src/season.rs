//! Season key extraction
//!
//! Partitions a numeric time axis into cyclical groups. Calendar kinds read
//! the axis as seconds since the Unix epoch (UTC); `Cycle` folds the axis
//! modulo a caller-supplied period into equal bins and never touches the
//! calendar, which suits decimal-year or simulation time axes.

use chrono::{DateTime, Datelike, Timelike, Utc};
use trend_core::{Error, Result, SeasonSpec};

/// Season group index for one time coordinate
pub fn season_index(time: f64, spec: SeasonSpec) -> Result<u32> {
    match spec {
        SeasonSpec::Cycle { period, bins } => {
            if !time.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "Time coordinate {time} is not finite"
                )));
            }
            let phase = time.rem_euclid(period) / period;
            let index = ((phase * bins as f64) as usize).min(bins - 1);
            Ok(index as u32)
        }
        _ => {
            let date = datetime_utc(time)?;
            Ok(match spec {
                SeasonSpec::Month => date.month(),
                SeasonSpec::DayOfWeek => date.weekday().num_days_from_monday(),
                SeasonSpec::Quarter => (date.month() - 1) / 3 + 1,
                SeasonSpec::Hour => date.hour(),
                SeasonSpec::DayOfYear => date.ordinal(),
                SeasonSpec::Cycle { .. } => unreachable!(),
            })
        }
    }
}

/// Human-readable label for a season group
pub fn season_label(spec: SeasonSpec, index: u32) -> String {
    match spec {
        SeasonSpec::Month => format!("month {index}"),
        SeasonSpec::DayOfWeek => format!("weekday {index}"),
        SeasonSpec::Quarter => format!("quarter {index}"),
        SeasonSpec::Hour => format!("hour {index}"),
        SeasonSpec::DayOfYear => format!("day {index}"),
        SeasonSpec::Cycle { .. } => format!("bin {index}"),
    }
}

fn datetime_utc(time: f64) -> Result<DateTime<Utc>> {
    if !time.is_finite() {
        return Err(Error::InvalidInput(format!(
            "Time coordinate {time} is not finite"
        )));
    }
    let secs = time.floor();
    let nanos = ((time - secs) * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(secs as i64, nanos.min(999_999_999)).ok_or_else(|| {
        Error::InvalidInput(format!(
            "Time coordinate {time} is outside the representable calendar range"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2021-03-15T14:30:00Z
    const T: f64 = 1_615_818_600.0;

    #[test]
    fn test_calendar_keys() {
        assert_eq!(season_index(T, SeasonSpec::Month).unwrap(), 3);
        assert_eq!(season_index(T, SeasonSpec::Quarter).unwrap(), 1);
        assert_eq!(season_index(T, SeasonSpec::Hour).unwrap(), 14);
        // 2021-03-15 is a Monday
        assert_eq!(season_index(T, SeasonSpec::DayOfWeek).unwrap(), 0);
        assert_eq!(season_index(T, SeasonSpec::DayOfYear).unwrap(), 74);
    }

    #[test]
    fn test_cycle_keys_are_calendar_free() {
        let spec = SeasonSpec::Cycle {
            period: 12.0,
            bins: 12,
        };
        assert_eq!(season_index(0.5, spec).unwrap(), 0);
        assert_eq!(season_index(11.9, spec).unwrap(), 11);
        assert_eq!(season_index(12.5, spec).unwrap(), 0);
        // Negative times fold forward
        assert_eq!(season_index(-0.5, spec).unwrap(), 11);
    }

    #[test]
    fn test_cycle_phase_never_overflows_bins() {
        let spec = SeasonSpec::Cycle {
            period: 1.0,
            bins: 4,
        };
        assert_eq!(season_index(0.999_999_9, spec).unwrap(), 3);
        assert_eq!(season_index(1.0, spec).unwrap(), 0);
    }

    #[test]
    fn test_non_finite_time_rejected() {
        assert!(season_index(f64::NAN, SeasonSpec::Month).is_err());
        assert!(season_index(
            f64::INFINITY,
            SeasonSpec::Cycle {
                period: 1.0,
                bins: 2
            }
        )
        .is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(season_label(SeasonSpec::Month, 3), "month 3");
        assert_eq!(season_label(SeasonSpec::DayOfWeek, 0), "weekday 0");
        assert_eq!(
            season_label(
                SeasonSpec::Cycle {
                    period: 7.0,
                    bins: 7
                },
                2
            ),
            "bin 2"
        );
    }
}
