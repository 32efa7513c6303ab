//! powder-watch: forecast intelligence daemon for a ski-condition
//! dashboard.
//!
//! Each cycle it:
//! 1. Bulk-prefetches forecasts for the tier-1 location set
//! 2. Refreshes the once-per-day condition summaries
//! 3. Evaluates powder alerts against thresholds and the cooldown
//! 4. Persists the merged alert log for the next cycle

mod config;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tokio::time::sleep;
use tracing::{error, info, warn};

use alert::{AlertEngine, LogNotifier, Notification, Notifier};
use common::config::AppConfig;
use common::locations::{default_resorts, load_locations, priority_locations};
use common::{AlertLog, ForecastSnapshot, Location};
use conditions::{best_window, classify, conditions_at, current_hour_index};
use open_meteo_client::OpenMeteoClient;
use store::{BatchLoader, DailyCache, TtlCache};

/// Ski-condition forecast intelligence daemon
#[derive(Parser)]
#[command(name = "powder-watch", about = "Ski-condition forecast intelligence daemon")]
struct Cli {
    /// Run a single prefetch + alert cycle and exit.
    #[arg(long)]
    once: bool,

    /// Run one cycle, print the condition report, and dispatch nothing.
    #[arg(long)]
    dry_run: bool,
}

/// Notifier used in dry-run mode: reports no permission, so the alert
/// pass is a guaranteed no-op.
struct MutedNotifier;

impl Notifier for MutedNotifier {
    fn permission_granted(&self) -> bool {
        false
    }

    fn notify(&self, _notification: &Notification) {}
}

fn load_alert_log(path: &Path) -> AlertLog {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(log) => log,
            Err(e) => {
                warn!("Alert log at {} is corrupt, starting fresh: {}", path.display(), e);
                AlertLog::new()
            }
        },
        Err(_) => AlertLog::new(),
    }
}

fn persist_alert_log(path: &Path, log: &AlertLog) {
    let write_result = serde_json::to_vec_pretty(log)
        .map_err(std::io::Error::other)
        .and_then(|payload| std::fs::write(path, payload));
    if let Err(e) = write_result {
        warn!("Failed to persist alert log to {}: {}", path.display(), e);
    }
}

/// Compose the once-per-day condition summary for a location. A
/// dashboard host replaces this with its text-generation provider; the
/// daemon only needs something cacheable and readable.
fn compose_summary(location: &Location, snapshot: &ForecastSnapshot) -> String {
    let hour = current_hour_index(snapshot, Utc::now());
    let inputs = conditions_at(snapshot, hour);
    let quality = classify(&inputs);

    match best_window(&snapshot.daily) {
        Some(window) => format!(
            "{}: {} at {:.1}°C, snow age {:.0}h. Best window {} (score {:.0}).",
            location.name,
            quality.label(),
            inputs.temp_c,
            inputs.snow_age_hours,
            window.date,
            window.score
        ),
        None => format!(
            "{}: {} at {:.1}°C, snow age {:.0}h. No daily forecast yet.",
            location.name,
            quality.label(),
            inputs.temp_c,
            inputs.snow_age_hours
        ),
    }
}

struct Service {
    config: AppConfig,
    locations: Vec<Location>,
    client: OpenMeteoClient,
    loader: BatchLoader,
    engine: AlertEngine,
    summaries: DailyCache<String>,
}

impl Service {
    fn fetch_fn(
        &self,
    ) -> impl Fn(Location) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<ForecastSnapshot, common::Error>> + Send>>
    {
        let client = self.client.clone();
        move |location: Location| {
            let client = client.clone();
            Box::pin(async move { client.fetch_forecast(&location).await })
        }
    }

    /// One full load + summary + alert cycle. Returns the merged alert
    /// log for the caller to persist.
    async fn run_cycle(&self, log: &AlertLog, notifier: &dyn Notifier) -> AlertLog {
        let priority = priority_locations(&self.locations);
        info!("Prefetching {} priority locations...", priority.len());

        let forecasts = self.loader.load_all(&priority, self.fetch_fn()).await;
        info!(
            "Prefetch complete: {}/{} locations loaded",
            forecasts.len(),
            priority.len()
        );

        self.refresh_summaries(&forecasts).await;

        let mut fired = 0usize;
        let mut on_fire = |_loc: &Location, _cm: f64| fired += 1;
        let merged = self.engine.evaluate(
            &self.locations,
            &forecasts,
            log,
            Utc::now(),
            notifier,
            Some(&mut on_fire),
        );
        info!("Alert evaluation complete: {} fired", fired);

        merged
    }

    async fn refresh_summaries(&self, forecasts: &HashMap<String, ForecastSnapshot>) {
        for location in &self.locations {
            let Some(snapshot) = forecasts.get(&location.id) else {
                continue;
            };
            let summary = self
                .summaries
                .get_or_fetch(&location.id, || {
                    let text = compose_summary(location, snapshot);
                    async move { Ok(text) }
                })
                .await;
            if let Err(e) = summary {
                warn!("Summary refresh failed for {}: {}", location.name, e);
            }
        }
    }

    fn print_condition_report(&self, forecasts: &HashMap<String, ForecastSnapshot>) {
        for location in &self.locations {
            let Some(snapshot) = forecasts.get(&location.id) else {
                info!("{}: no forecast loaded", location.name);
                continue;
            };

            let hour = current_hour_index(snapshot, Utc::now());
            let inputs = conditions_at(snapshot, hour);
            let quality = classify(&inputs);
            let window = best_window(&snapshot.daily);
            info!(
                "{}: {} (priority {}) — temp {:.1}°C wind {:.0}km/h snow age {:.0}h",
                location.name,
                quality.label(),
                quality.priority(),
                inputs.temp_c,
                inputs.wind_kmh,
                inputs.snow_age_hours
            );
            if let Some(w) = window {
                info!("  best window: {} (day {}, score {:.0})", w.date, w.day_index, w.score);
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "powder_watch=info,store=info,alert=info,open_meteo_client=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("❄️  powder-watch starting up...");

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Load the location dataset.
    let locations = match &cfg.locations_path {
        Some(path) => match load_locations(Path::new(path)) {
            Ok(l) => l,
            Err(e) => {
                error!("Location dataset error: {}", e);
                std::process::exit(1);
            }
        },
        None => default_resorts(),
    };

    let priority_count = priority_locations(&locations).len();
    info!(
        "Locations: {} total, {} priority (tier 1)",
        locations.len(),
        priority_count
    );
    info!(
        "Alerts: default≥{:.2}cm, {} overrides, cooldown {}s",
        cfg.alerts.default_threshold_cm,
        cfg.alerts.thresholds_cm.len(),
        cfg.alerts.cooldown_secs
    );
    info!(
        "Cache TTL: {}s; loader: batches of {} with {}ms pacing",
        cfg.cache.forecast_ttl_secs, cfg.loader.batch_size, cfg.loader.batch_delay_ms
    );

    let client = match OpenMeteoClient::new() {
        Ok(c) => c,
        Err(e) => {
            error!("HTTP client error: {}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(TtlCache::new(Duration::from_secs(
        cfg.cache.forecast_ttl_secs,
    )));
    let loader = BatchLoader::new(&cfg.loader, store.clone());
    let engine = AlertEngine::new(&cfg.alerts);

    let service = Service {
        locations,
        client,
        loader,
        engine,
        summaries: DailyCache::new(),
        config: cfg,
    };

    let log_path = Path::new(&service.config.alert_log_path).to_path_buf();
    let mut alert_log = load_alert_log(&log_path);
    info!(
        "Alert log: {} prior entries from {}",
        alert_log.len(),
        log_path.display()
    );

    // ── Dry-run mode ─────────────────────────────────────────────────
    if cli.dry_run {
        info!("Running single dry-run cycle (no notifications)...");
        let priority = priority_locations(&service.locations);
        let forecasts = service.loader.load_all(&priority, service.fetch_fn()).await;
        service.print_condition_report(&forecasts);

        let merged = service
            .engine
            .evaluate(
                &service.locations,
                &forecasts,
                &alert_log,
                Utc::now(),
                &MutedNotifier,
                None,
            );
        info!(
            "Dry-run complete: {} forecasts, alert log unchanged ({} entries)",
            forecasts.len(),
            merged.len()
        );
        return;
    }

    // ── Cycle loop ───────────────────────────────────────────────────
    let notifier = LogNotifier;
    loop {
        alert_log = service.run_cycle(&alert_log, &notifier).await;
        persist_alert_log(&log_path, &alert_log);

        if cli.once {
            info!("Single cycle complete.");
            return;
        }

        let interval = Duration::from_secs(service.config.timing.scan_interval_secs);
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            _ = sleep(interval) => {}
        }
    }

    info!("powder-watch shut down.");
}
