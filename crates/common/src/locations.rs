//! Location dataset loading.
//!
//! The dataset itself is produced by an offline build step; this module
//! only reads it. A small built-in list serves as the fallback so the
//! service runs without any dataset file.

use std::path::Path;

use crate::error::Error;
use crate::types::{Location, Tier};

/// Load the location dataset from a JSON file.
pub fn load_locations(path: &Path) -> Result<Vec<Location>, Error> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::Dataset(format!("failed to read {}: {}", path.display(), e)))?;
    let locations: Vec<Location> = serde_json::from_str(&contents)
        .map_err(|e| Error::Dataset(format!("failed to parse {}: {}", path.display(), e)))?;

    if locations.is_empty() {
        return Err(Error::Dataset(format!(
            "{} contains no locations",
            path.display()
        )));
    }
    Ok(locations)
}

/// Only the tier-1 (bulk prefetched) locations.
pub fn priority_locations(locations: &[Location]) -> Vec<Location> {
    locations
        .iter()
        .filter(|l| l.tier == Tier::Priority)
        .cloned()
        .collect()
}

/// Built-in resort list used when no dataset path is configured.
pub fn default_resorts() -> Vec<Location> {
    fn resort(
        id: &str,
        name: &str,
        country: &str,
        region: &str,
        latitude: f64,
        longitude: f64,
        summit_m: f64,
        base_m: f64,
        tier: Tier,
    ) -> Location {
        Location {
            id: id.into(),
            name: name.into(),
            country: country.into(),
            region: region.into(),
            latitude,
            longitude,
            summit_m,
            base_m,
            vertical_m: summit_m - base_m,
            tier,
        }
    }

    vec![
        resort(
            "chamonix",
            "Chamonix",
            "France",
            "Auvergne-Rhône-Alpes",
            45.9237,
            6.8694,
            3842.0,
            1035.0,
            Tier::Priority,
        ),
        resort(
            "zermatt",
            "Zermatt",
            "Switzerland",
            "Valais",
            46.0207,
            7.7491,
            3883.0,
            1620.0,
            Tier::Priority,
        ),
        resort(
            "whistler",
            "Whistler Blackcomb",
            "Canada",
            "British Columbia",
            50.1163,
            -122.9574,
            2284.0,
            675.0,
            Tier::Priority,
        ),
        resort(
            "niseko",
            "Niseko United",
            "Japan",
            "Hokkaido",
            42.8048,
            140.6874,
            1188.0,
            255.0,
            Tier::Priority,
        ),
        resort(
            "jackson-hole",
            "Jackson Hole",
            "United States",
            "Wyoming",
            43.5875,
            -110.8279,
            3185.0,
            1924.0,
            Tier::Priority,
        ),
        resort(
            "la-grave",
            "La Grave",
            "France",
            "Hautes-Alpes",
            45.0461,
            6.3069,
            3550.0,
            1450.0,
            Tier::OnDemand,
        ),
    ]
}
