//! Snow-age estimation from an hourly snowfall series.

use common::value_at;

/// Saturating lookback bound. Anything older reads as exactly 72 —
/// a "stale" sentinel, not a literal hour count.
pub const MAX_SNOW_AGE_HOURS: u32 = 72;

/// Hourly snowfall below this (cm) does not count as a snowfall event.
pub const QUALIFYING_SNOWFALL_CM: f64 = 0.1;

/// Hours since the last qualifying snowfall, scanning backward from
/// `current_index`. Returns 0 when the current hour itself qualifies;
/// returns `MAX_SNOW_AGE_HOURS` when the lookback window or the series
/// is exhausted first.
pub fn hours_since_snowfall(hourly_snowfall: &[f64], current_index: usize) -> u32 {
    for offset in 0..=MAX_SNOW_AGE_HOURS {
        let Some(index) = current_index.checked_sub(offset as usize) else {
            // Ran off the start of the series.
            return MAX_SNOW_AGE_HOURS;
        };
        if value_at(hourly_snowfall, index) > QUALIFYING_SNOWFALL_CM {
            return offset;
        }
    }
    MAX_SNOW_AGE_HOURS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_hour_snowfall_is_age_zero() {
        let mut series = vec![0.0; 10];
        series[7] = 0.2;
        assert_eq!(hours_since_snowfall(&series, 7), 0);
    }

    #[test]
    fn offset_counts_back_to_the_event() {
        let mut series = vec![0.0; 48];
        series[30] = 1.0;
        assert_eq!(hours_since_snowfall(&series, 42), 12);
    }

    #[test]
    fn threshold_excludes_trace_snowfall() {
        // Exactly 0.1 does not qualify.
        let series = vec![0.1, 0.0, 0.0];
        assert_eq!(hours_since_snowfall(&series, 2), MAX_SNOW_AGE_HOURS);
    }

    #[test]
    fn all_zero_series_saturates() {
        let series = vec![0.0; 100];
        assert_eq!(hours_since_snowfall(&series, 80), 72);
    }

    #[test]
    fn cap_applies_even_when_an_older_event_exists() {
        // True distance is 73 hours, past the lookback bound.
        let mut series = vec![0.0; 74];
        series[0] = 1.5;
        assert_eq!(hours_since_snowfall(&series, 73), 72);

        // One hour closer and the event is visible again.
        assert_eq!(hours_since_snowfall(&series, 72), 72);
        assert_eq!(hours_since_snowfall(&series, 71), 71);
    }

    #[test]
    fn short_series_saturates_instead_of_failing() {
        assert_eq!(hours_since_snowfall(&[], 5), MAX_SNOW_AGE_HOURS);
        assert_eq!(hours_since_snowfall(&[0.0, 0.0], 1), MAX_SNOW_AGE_HOURS);
        // Index past the end of the series reads as zeros.
        assert_eq!(hours_since_snowfall(&[5.0], 3), 3);
    }
}
