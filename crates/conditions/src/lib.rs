//! Pure condition analysis: snow-quality classification, snow age
//! estimation and best-window scoring.
//!
//! Everything in this crate is a total function over numeric input —
//! missing data arrives as 0 (see `common::value_at`) and no function
//! here can fail or panic.

pub mod classifier;
pub mod snow_age;
pub mod window;

pub use classifier::{classify, ConditionInputs, SnowQuality};
pub use snow_age::{hours_since_snowfall, MAX_SNOW_AGE_HOURS};
pub use window::{best_window, day_score, HORIZON_DAYS};

use chrono::{DateTime, Duration, Timelike, Utc};
use common::{value_at, ForecastSnapshot};

/// Index of the current hour within a snapshot's hourly block.
///
/// The hourly series starts at local midnight of the first forecast
/// day, so the offset into day 0 is the local wall-clock hour: UTC
/// time shifted by the snapshot's `utc_offset_seconds`.
pub fn current_hour_index(snapshot: &ForecastSnapshot, now: DateTime<Utc>) -> usize {
    let local = now + Duration::seconds(snapshot.utc_offset_seconds);
    local.hour() as usize
}

/// Derive the five classification signals from a snapshot at an hourly
/// index.
pub fn conditions_at(snapshot: &ForecastSnapshot, hour_index: usize) -> ConditionInputs {
    let hourly = &snapshot.hourly;
    ConditionInputs {
        temp_c: value_at(&hourly.temperature_2m, hour_index),
        wind_kmh: value_at(&hourly.wind_speed_10m, hour_index),
        snowfall_cm: value_at(&hourly.snowfall, hour_index),
        snow_age_hours: f64::from(hours_since_snowfall(&hourly.snowfall, hour_index)),
        humidity_pct: value_at(&hourly.relative_humidity_2m, hour_index),
    }
}
