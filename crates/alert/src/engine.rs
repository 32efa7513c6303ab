//! Alert evaluation engine.
//!
//! Runs once over the cached forecasts after a load cycle drains (and
//! again on externally triggered re-checks). Each location is evaluated
//! independently; one bad location never blocks the rest, and the
//! returned log is always the input log plus the cycle's new
//! fired-at stamps.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use common::config::AlertConfig;
use common::{value_at, AlertLog, ForecastSnapshot, Location};

use crate::notify::{Notification, Notifier};

/// Days of daily snowfall considered per alert: today and tomorrow.
const ALERT_WINDOW_DAYS: usize = 2;

pub struct AlertEngine {
    default_threshold_cm: f64,
    thresholds_cm: HashMap<String, f64>,
    cooldown: Duration,
}

impl AlertEngine {
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            default_threshold_cm: config.default_threshold_cm,
            thresholds_cm: config.thresholds_cm.clone(),
            cooldown: Duration::seconds(config.cooldown_secs as i64),
        }
    }

    /// Threshold for a location: its override, else the default.
    pub fn threshold_cm(&self, location_id: &str) -> f64 {
        self.thresholds_cm
            .get(location_id)
            .copied()
            .unwrap_or(self.default_threshold_cm)
    }

    /// Maximum daily snowfall over the next 48 hours.
    fn candidate_snowfall_cm(snapshot: &ForecastSnapshot) -> f64 {
        (0..ALERT_WINDOW_DAYS)
            .map(|day| value_at(&snapshot.daily.snowfall_sum, day))
            .fold(0.0, f64::max)
    }

    /// Evaluate every location against its threshold and the cooldown,
    /// dispatching a notification per qualifying location.
    ///
    /// Returns the merged log: the input log with only qualifying
    /// entries restamped to `now`. Entries are never removed, including
    /// ids outside `locations`. When the notifier reports no
    /// permission, the input log comes back unchanged and nothing is
    /// dispatched.
    pub fn evaluate(
        &self,
        locations: &[Location],
        forecasts: &HashMap<String, ForecastSnapshot>,
        log: &AlertLog,
        now: DateTime<Utc>,
        notifier: &dyn Notifier,
        mut on_fire: Option<&mut dyn FnMut(&Location, f64)>,
    ) -> AlertLog {
        let mut merged = log.clone();

        if !notifier.permission_granted() {
            debug!("Notification permission not granted; skipping alert evaluation");
            return merged;
        }

        for location in locations {
            // No cached forecast is not an error; the location simply
            // sits this cycle out.
            let Some(snapshot) = forecasts.get(&location.id) else {
                continue;
            };

            let candidate_cm = Self::candidate_snowfall_cm(snapshot);
            let threshold_cm = self.threshold_cm(&location.id);
            if candidate_cm < threshold_cm {
                continue;
            }

            if let Some(last) = merged.last_fired(&location.id) {
                if now - last <= self.cooldown {
                    debug!(
                        "{}: {:.1}cm qualifies but cooldown is active",
                        location.id, candidate_cm
                    );
                    continue;
                }
            }

            info!(
                "Powder alert for {}: {:.1}cm >= {:.1}cm",
                location.name, candidate_cm, threshold_cm
            );
            notifier.notify(&Notification::powder_alert(location, candidate_cm));
            merged.record_fire(&location.id, now);
            if let Some(callback) = on_fire.as_mut() {
                callback(location, candidate_cm);
            }
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use common::{DailyBlock, Tier};

    use super::*;

    fn make_location(id: &str) -> Location {
        Location {
            id: id.into(),
            name: format!("{} resort", id),
            country: String::new(),
            region: "Test Range".into(),
            latitude: 46.0,
            longitude: 7.0,
            summit_m: 3000.0,
            base_m: 1500.0,
            vertical_m: 1500.0,
            tier: Tier::Priority,
        }
    }

    fn snapshot_with_snowfall(day0_cm: f64, day1_cm: f64) -> ForecastSnapshot {
        ForecastSnapshot {
            daily: DailyBlock {
                time: vec!["2026-01-05".into(), "2026-01-06".into()],
                snowfall_sum: vec![day0_cm, day1_cm],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Records every dispatched payload.
    #[derive(Default)]
    struct RecordingNotifier {
        granted: bool,
        sent: RefCell<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn granted() -> Self {
            Self {
                granted: true,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn permission_granted(&self) -> bool {
            self.granted
        }

        fn notify(&self, notification: &Notification) {
            self.sent.borrow_mut().push(notification.clone());
        }
    }

    fn engine_with_default(default_threshold_cm: f64) -> AlertEngine {
        AlertEngine::new(&AlertConfig {
            default_threshold_cm,
            ..Default::default()
        })
    }

    #[test]
    fn cooldown_suppresses_a_recent_repeat() {
        let engine = engine_with_default(15.24);
        let location = make_location("cham");
        let mut forecasts = HashMap::new();
        forecasts.insert("cham".to_string(), snapshot_with_snowfall(20.0, 0.0));

        let now = Utc::now();
        let mut log = AlertLog::new();
        log.record_fire("cham", now - Duration::seconds(1));

        let notifier = RecordingNotifier::granted();
        let merged = engine.evaluate(&[location], &forecasts, &log, now, &notifier, None);

        assert!(notifier.sent.borrow().is_empty());
        assert_eq!(merged, log);
    }

    #[test]
    fn fires_after_the_cooldown_elapses() {
        let engine = engine_with_default(15.24);
        let location = make_location("cham");
        let mut forecasts = HashMap::new();
        forecasts.insert("cham".to_string(), snapshot_with_snowfall(20.0, 0.0));

        let now = Utc::now();
        let mut log = AlertLog::new();
        log.record_fire("cham", now - Duration::hours(7));

        let notifier = RecordingNotifier::granted();
        let mut fired: Vec<(String, f64)> = Vec::new();
        let mut on_fire = |loc: &Location, cm: f64| fired.push((loc.id.clone(), cm));
        let merged = engine.evaluate(
            &[location],
            &forecasts,
            &log,
            now,
            &notifier,
            Some(&mut on_fire),
        );

        assert_eq!(notifier.sent.borrow().len(), 1);
        assert_eq!(merged.last_fired("cham"), Some(now));
        assert_eq!(fired, vec![("cham".to_string(), 20.0)]);
    }

    #[test]
    fn per_location_override_beats_the_default() {
        let mut config = AlertConfig {
            default_threshold_cm: 15.24,
            ..Default::default()
        };
        config.thresholds_cm.insert("cham".into(), 25.4);
        let engine = AlertEngine::new(&config);

        let mut forecasts = HashMap::new();
        forecasts.insert("cham".to_string(), snapshot_with_snowfall(20.0, 0.0));

        let notifier = RecordingNotifier::granted();
        let merged = engine.evaluate(
            &[make_location("cham")],
            &forecasts,
            &AlertLog::new(),
            Utc::now(),
            &notifier,
            None,
        );

        // 20cm clears the 15.24 default but not the 25.4 override.
        assert!(notifier.sent.borrow().is_empty());
        assert!(merged.last_fired("cham").is_none());
    }

    #[test]
    fn candidate_is_the_max_of_the_next_two_days() {
        let engine = engine_with_default(15.24);
        let mut forecasts = HashMap::new();
        // Day 0 below threshold, day 1 above.
        forecasts.insert("cham".to_string(), snapshot_with_snowfall(2.0, 18.0));

        let notifier = RecordingNotifier::granted();
        let merged = engine.evaluate(
            &[make_location("cham")],
            &forecasts,
            &AlertLog::new(),
            Utc::now(),
            &notifier,
            None,
        );

        assert_eq!(notifier.sent.borrow().len(), 1);
        assert!(merged.last_fired("cham").is_some());
        let sent = notifier.sent.borrow();
        assert!(sent[0].title.contains("cham resort"));
    }

    #[test]
    fn missing_forecast_skips_without_error() {
        let engine = engine_with_default(15.24);
        let notifier = RecordingNotifier::granted();
        let merged = engine.evaluate(
            &[make_location("cham")],
            &HashMap::new(),
            &AlertLog::new(),
            Utc::now(),
            &notifier,
            None,
        );

        assert!(notifier.sent.borrow().is_empty());
        assert!(merged.is_empty());
    }

    #[test]
    fn no_permission_is_a_complete_no_op() {
        let engine = engine_with_default(15.24);
        let mut forecasts = HashMap::new();
        forecasts.insert("cham".to_string(), snapshot_with_snowfall(50.0, 0.0));

        let mut log = AlertLog::new();
        log.record_fire("elsewhere", Utc::now() - Duration::days(3));

        let notifier = RecordingNotifier::default(); // permission denied
        let merged = engine.evaluate(
            &[make_location("cham")],
            &forecasts,
            &log,
            Utc::now(),
            &notifier,
            None,
        );

        assert!(notifier.sent.borrow().is_empty());
        assert_eq!(merged, log);
    }

    #[test]
    fn merged_log_keeps_entries_outside_the_evaluation_set() {
        let engine = engine_with_default(15.24);
        let mut forecasts = HashMap::new();
        forecasts.insert("cham".to_string(), snapshot_with_snowfall(20.0, 0.0));

        let retired = Utc::now() - Duration::days(30);
        let mut log = AlertLog::new();
        log.record_fire("closed-resort", retired);

        let now = Utc::now();
        let notifier = RecordingNotifier::granted();
        let merged = engine.evaluate(
            &[make_location("cham")],
            &forecasts,
            &log,
            now,
            &notifier,
            None,
        );

        assert_eq!(merged.last_fired("closed-resort"), Some(retired));
        assert_eq!(merged.last_fired("cham"), Some(now));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn one_location_firing_does_not_block_others() {
        let mut config = AlertConfig::default();
        config.thresholds_cm.insert("quiet".into(), 100.0);
        let engine = AlertEngine::new(&config);

        let mut forecasts = HashMap::new();
        forecasts.insert("cham".to_string(), snapshot_with_snowfall(20.0, 0.0));
        forecasts.insert("quiet".to_string(), snapshot_with_snowfall(20.0, 0.0));
        forecasts.insert("niseko".to_string(), snapshot_with_snowfall(0.0, 30.0));

        let notifier = RecordingNotifier::granted();
        let merged = engine.evaluate(
            &[
                make_location("cham"),
                make_location("quiet"),
                make_location("niseko"),
            ],
            &forecasts,
            &AlertLog::new(),
            Utc::now(),
            &notifier,
            None,
        );

        assert_eq!(notifier.sent.borrow().len(), 2);
        assert!(merged.last_fired("cham").is_some());
        assert!(merged.last_fired("quiet").is_none());
        assert!(merged.last_fired("niseko").is_some());
    }
}
