//! Domain types shared across the service.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Location Types ────────────────────────────────────────────────────

/// Prefetch tier for a location.
///
/// Tier 1 locations are bulk-prefetched on every load cycle; tier 2
/// locations are fetched only when a caller asks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    Priority,
    OnDemand,
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::Priority),
            2 => Ok(Tier::OnDemand),
            other => Err(format!("invalid tier: {} (expected 1 or 2)", other)),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        match tier {
            Tier::Priority => 1,
            Tier::OnDemand => 2,
        }
    }
}

/// A ski location from the build-time dataset. Immutable for the
/// lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Summit elevation in meters.
    #[serde(default)]
    pub summit_m: f64,
    /// Base elevation in meters.
    #[serde(default)]
    pub base_m: f64,
    /// Vertical drop in meters.
    #[serde(default)]
    pub vertical_m: f64,
    pub tier: Tier,
}

// ── Forecast Types ────────────────────────────────────────────────────

/// Read a parallel forecast series at an index, substituting 0 for any
/// missing value. Consumers must never treat a short or absent series
/// as an error.
pub fn value_at(series: &[f64], index: usize) -> f64 {
    series.get(index).copied().unwrap_or(0.0)
}

/// Deserialize a numeric series, mapping JSON nulls to 0.
fn zero_nulls<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Option<f64>>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

/// Hourly forecast block: a time series plus parallel value arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub snowfall: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub snow_depth: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub temperature_2m: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub apparent_temperature: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub wind_speed_10m: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub wind_gusts_10m: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub wind_direction_10m: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub relative_humidity_2m: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub cloud_cover: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub weather_code: Vec<f64>,
}

/// Daily forecast block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub snowfall_sum: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub rain_sum: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub temperature_2m_max: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub temperature_2m_min: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub wind_speed_10m_max: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub precipitation_hours: Vec<f64>,
    #[serde(default, deserialize_with = "zero_nulls")]
    pub weather_code: Vec<f64>,
}

/// One forecast fetch for one location. Immutable per fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    #[serde(default)]
    pub hourly: HourlyBlock,
    #[serde(default)]
    pub daily: DailyBlock,
    #[serde(default)]
    pub timezone: String,
    /// Offset of the location's timezone from UTC, as reported by the
    /// provider. The hourly series is anchored to this timezone.
    #[serde(default)]
    pub utc_offset_seconds: i64,
}

// ── Load Status ───────────────────────────────────────────────────────

/// Per-location load state. Transitions: `Idle → Loading → {Done | Error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Idle,
    Loading,
    Done,
    Error,
}

// ── Alert Log ─────────────────────────────────────────────────────────

/// Persisted record of when each location last fired a powder alert.
/// Absent key = never fired. Entries are never removed by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertLog(HashMap<String, DateTime<Utc>>);

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fired(&self, location_id: &str) -> Option<DateTime<Utc>> {
        self.0.get(location_id).copied()
    }

    pub fn record_fire(&mut self, location_id: &str, at: DateTime<Utc>) {
        self.0.insert(location_id.to_string(), at);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── Window Scoring ────────────────────────────────────────────────────

/// The best-scoring day in the 7-day horizon. Recomputed on demand,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestWindow {
    pub day_index: usize,
    pub date: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_at_substitutes_zero_for_missing_indexes() {
        let series = vec![1.5, 0.0];
        assert_eq!(value_at(&series, 0), 1.5);
        assert_eq!(value_at(&series, 1), 0.0);
        assert_eq!(value_at(&series, 2), 0.0);
        assert_eq!(value_at(&[], 0), 0.0);
    }

    #[test]
    fn snapshot_tolerates_missing_and_null_fields() {
        let raw = r#"{
            "timezone": "Europe/Zurich",
            "utc_offset_seconds": 3600,
            "hourly": { "time": ["2026-01-05T00:00"], "snowfall": [null, 0.4] },
            "daily": { "snowfall_sum": [12.0] }
        }"#;
        let snapshot: ForecastSnapshot = serde_json::from_str(raw).expect("parse");

        assert_eq!(snapshot.utc_offset_seconds, 3600);
        assert_eq!(snapshot.hourly.snowfall, vec![0.0, 0.4]);
        assert!(snapshot.hourly.temperature_2m.is_empty());
        assert_eq!(value_at(&snapshot.daily.snowfall_sum, 0), 12.0);
        assert_eq!(value_at(&snapshot.daily.rain_sum, 0), 0.0);
    }

    #[test]
    fn tier_round_trips_through_numbers() {
        let loc: Location = serde_json::from_str(
            r#"{"id":"x","name":"X","latitude":1.0,"longitude":2.0,"tier":1}"#,
        )
        .expect("parse");
        assert_eq!(loc.tier, Tier::Priority);

        let back = serde_json::to_string(&loc).expect("serialize");
        assert!(back.contains("\"tier\":1"));

        let bad = serde_json::from_str::<Location>(
            r#"{"id":"x","name":"X","latitude":1.0,"longitude":2.0,"tier":3}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn alert_log_updates_without_removing_entries() {
        let mut log = AlertLog::new();
        assert!(log.last_fired("cham").is_none());

        let t0 = Utc::now();
        log.record_fire("cham", t0);
        log.record_fire("zermatt", t0);
        log.record_fire("cham", t0 + chrono::Duration::hours(7));

        assert_eq!(log.len(), 2);
        assert_eq!(log.last_fired("cham"), Some(t0 + chrono::Duration::hours(7)));
        assert_eq!(log.last_fired("zermatt"), Some(t0));
    }
}
