//! Configuration loader — merges env vars, .env file, and config.toml.

use std::path::Path;

use common::config::AppConfig;
use common::Error;

fn parse_positive_f64(raw: &str, env_name: &str) -> Result<f64, Error> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{env_name} must be a number > 0")))?;
    if parsed <= 0.0 {
        return Err(Error::Config(format!("{env_name} must be a number > 0")));
    }
    Ok(parsed)
}

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

pub fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.alerts.default_threshold_cm <= 0.0 {
        issues.push("alerts.default_threshold_cm must be > 0".into());
    }
    for (id, threshold) in &config.alerts.thresholds_cm {
        if *threshold <= 0.0 {
            issues.push(format!("alerts.thresholds_cm.{} must be > 0", id));
        }
    }
    if config.alerts.cooldown_secs == 0 {
        issues.push("alerts.cooldown_secs must be > 0".into());
    }
    if config.cache.forecast_ttl_secs == 0 {
        issues.push("cache.forecast_ttl_secs must be > 0".into());
    }
    if config.loader.batch_size == 0 {
        issues.push("loader.batch_size must be > 0".into());
    }
    if config.timing.scan_interval_secs == 0 {
        issues.push("timing.scan_interval_secs must be > 0".into());
    }
    if config.alert_log_path.trim().is_empty() {
        issues.push("alert_log_path must not be empty".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load service configuration from environment and optional config file.
pub fn load_config() -> Result<AppConfig, Error> {
    // 1. Load .env file from the working directory or its parents.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = AppConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(path) = std::env::var("POWDER_LOCATIONS_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            config.locations_path = Some(trimmed.to_string());
        }
    }
    if let Ok(path) = std::env::var("POWDER_ALERT_LOG_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            config.alert_log_path = trimmed.to_string();
        }
    }
    if let Ok(raw) = std::env::var("POWDER_DEFAULT_THRESHOLD_CM") {
        config.alerts.default_threshold_cm =
            parse_positive_f64(&raw, "POWDER_DEFAULT_THRESHOLD_CM")?;
    }
    if let Ok(raw) = std::env::var("POWDER_COOLDOWN_SECS") {
        config.alerts.cooldown_secs = parse_positive_u64(&raw, "POWDER_COOLDOWN_SECS")?;
    }
    if let Ok(raw) = std::env::var("POWDER_FORECAST_TTL_SECS") {
        config.cache.forecast_ttl_secs = parse_positive_u64(&raw, "POWDER_FORECAST_TTL_SECS")?;
    }
    if let Ok(raw) = std::env::var("POWDER_BATCH_SIZE") {
        config.loader.batch_size = parse_positive_u64(&raw, "POWDER_BATCH_SIZE")? as usize;
    }
    if let Ok(raw) = std::env::var("POWDER_SCAN_INTERVAL_SECS") {
        config.timing.scan_interval_secs =
            parse_positive_u64(&raw, "POWDER_SCAN_INTERVAL_SECS")?;
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}
