//! Open-Meteo forecast API client.
//!
//! Fetches hourly + daily forecast data from `api.open-meteo.com` for a
//! ski location. Any non-success status or structurally invalid body is
//! a hard fetch failure; the caller decides how to degrade.

use common::{Error, ForecastSnapshot, Location};
use tracing::debug;

const BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Forecast horizon requested from the provider. The dashboard only
/// scores 7 days but the snapshot carries the full horizon.
const FORECAST_DAYS: u8 = 16;

const HOURLY_FIELDS: &str = "snowfall,snow_depth,temperature_2m,apparent_temperature,\
wind_speed_10m,wind_gusts_10m,wind_direction_10m,relative_humidity_2m,cloud_cover,weather_code";

const DAILY_FIELDS: &str = "snowfall_sum,rain_sum,temperature_2m_max,temperature_2m_min,\
wind_speed_10m_max,precipitation_hours,weather_code";

const MAX_ERROR_BODY_CHARS: usize = 500;

/// First 500 characters of an error body, cut on character boundaries
/// so an arbitrary provider error page never panics the caller.
fn truncated(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Build the forecast request URL for a location. The location's own
/// timezone is resolved provider-side via `timezone=auto`.
pub fn forecast_url(latitude: f64, longitude: f64, elevation_m: f64) -> String {
    format!(
        "{BASE_URL}?latitude={latitude}&longitude={longitude}&elevation={elevation_m}\
&hourly={HOURLY_FIELDS}&daily={DAILY_FIELDS}&timezone=auto&forecast_days={FORECAST_DAYS}"
    )
}

/// Open-Meteo client with connection pooling and a request timeout.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent("powder-watch/0.1")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch a forecast snapshot at a location's summit elevation.
    pub async fn fetch_forecast(&self, location: &Location) -> Result<ForecastSnapshot, Error> {
        let url = forecast_url(location.latitude, location.longitude, location.summit_m);
        debug!("Fetching forecast: {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("request failed for {}: {}", location.name, e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Open-Meteo returned {} for {}: {}",
                status,
                location.name,
                truncated(&body)
            )));
        }

        let snapshot: ForecastSnapshot = resp
            .json()
            .await
            .map_err(|e| Error::Provider(format!("JSON parse error for {}: {}", location.name, e)))?;

        debug!(
            "Got {} hourly / {} daily entries for {} (tz {})",
            snapshot.hourly.time.len(),
            snapshot.daily.time.len(),
            location.name,
            snapshot.timezone
        );

        Ok(snapshot)
    }
}
