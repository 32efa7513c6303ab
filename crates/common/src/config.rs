//! Service configuration types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional path to a JSON location dataset. When unset, the
    /// built-in resort list is used.
    #[serde(default)]
    pub locations_path: Option<String>,

    /// Path of the persisted alert log.
    #[serde(default = "default_alert_log_path")]
    pub alert_log_path: String,

    /// Alerting parameters.
    #[serde(default)]
    pub alerts: AlertConfig,

    /// Cache parameters.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Bulk prefetch parameters.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Timing parameters (seconds).
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Powder-alert thresholds and cooldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Snowfall threshold in cm applied when a location has no
    /// override. 15.24 cm = 6 inches.
    #[serde(default = "default_threshold_cm")]
    pub default_threshold_cm: f64,

    /// Per-location threshold overrides in cm, keyed by location id.
    #[serde(default)]
    pub thresholds_cm: HashMap<String, f64>,

    /// Minimum elapsed time before the same location may fire again.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

/// Forecast cache parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Freshness window for forecast snapshots.
    #[serde(default = "default_forecast_ttl_secs")]
    pub forecast_ttl_secs: u64,
}

/// Bulk prefetch parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Locations fetched concurrently per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Settle delay between batches, in milliseconds.
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

/// Timing configuration (all values in seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Interval between prefetch + alert cycles.
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_alert_log_path() -> String {
    "alert_log.json".into()
}

fn default_threshold_cm() -> f64 {
    15.24
}

fn default_cooldown_secs() -> u64 {
    6 * 3600
}

fn default_forecast_ttl_secs() -> u64 {
    3600
}

fn default_batch_size() -> usize {
    10
}

fn default_batch_delay_ms() -> u64 {
    200
}

fn default_scan_interval() -> u64 {
    1800
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            default_threshold_cm: default_threshold_cm(),
            thresholds_cm: HashMap::new(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            forecast_ttl_secs: default_forecast_ttl_secs(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locations_path: None,
            alert_log_path: default_alert_log_path(),
            alerts: AlertConfig::default(),
            cache: CacheConfig::default(),
            loader: LoaderConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}
