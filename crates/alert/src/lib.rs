//! Powder alerting: threshold evaluation with a per-location cooldown.

pub mod engine;
pub mod notify;

pub use engine::AlertEngine;
pub use notify::{LogNotifier, Notification, Notifier, ALERT_ICON_PATH};
