//! Notification surface.
//!
//! The engine only builds payloads and hands them to a `Notifier`; how
//! they reach the user (desktop notification, webhook, …) is the
//! host's concern.

use common::Location;
use serde::Serialize;
use tracing::info;

pub const ALERT_ICON_PATH: &str = "/icons/powder-192.png";

const CM_PER_INCH: f64 = 2.54;

/// Payload handed to the notification surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
}

impl Notification {
    pub fn powder_alert(location: &Location, snowfall_cm: f64) -> Self {
        let inches = snowfall_cm / CM_PER_INCH;
        Self {
            title: format!("❄️ Powder Alert: {}", location.name),
            body: format!(
                "{:.1}\" forecast in the next 48 hours — {}",
                inches, location.region
            ),
            icon: ALERT_ICON_PATH.to_string(),
        }
    }
}

/// Dispatch seam for notifications.
pub trait Notifier {
    /// Whether the host has notification permission. When this is
    /// false the whole alert evaluation is a no-op.
    fn permission_granted(&self) -> bool;

    fn notify(&self, notification: &Notification);
}

/// Notifier that writes alerts to the service log. Used by the daemon;
/// a dashboard host swaps in its own surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn permission_granted(&self) -> bool {
        true
    }

    fn notify(&self, notification: &Notification) {
        info!("{} — {}", notification.title, notification.body);
    }
}

#[cfg(test)]
mod tests {
    use common::Tier;

    use super::*;

    #[test]
    fn payload_reports_inches_and_region() {
        let location = Location {
            id: "niseko".into(),
            name: "Niseko United".into(),
            country: "Japan".into(),
            region: "Hokkaido".into(),
            latitude: 42.8,
            longitude: 140.69,
            summit_m: 1188.0,
            base_m: 255.0,
            vertical_m: 933.0,
            tier: Tier::Priority,
        };

        let n = Notification::powder_alert(&location, 25.4);
        assert_eq!(n.title, "❄️ Powder Alert: Niseko United");
        assert_eq!(n.body, "10.0\" forecast in the next 48 hours — Hokkaido");
        assert_eq!(n.icon, ALERT_ICON_PATH);
    }
}
