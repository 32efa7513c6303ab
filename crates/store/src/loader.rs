//! Bulk prefetch of the priority location set.
//!
//! Locations are loaded in fixed-size batches; within a batch all
//! fetches run concurrently through the forecast cache, and a settle
//! delay is inserted between batches (never after the last) so the
//! prefetch does not burst the upstream API.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::future::join_all;
use tokio::time::sleep;
use tracing::{debug, warn};

use common::config::LoaderConfig;
use common::{Error, ForecastSnapshot, LoadStatus, Location};

use crate::cache::TtlCache;

pub struct BatchLoader {
    batch_size: usize,
    batch_delay: Duration,
    store: Arc<TtlCache<ForecastSnapshot>>,
    statuses: DashMap<String, LoadStatus>,
}

impl BatchLoader {
    pub fn new(config: &LoaderConfig, store: Arc<TtlCache<ForecastSnapshot>>) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            batch_delay: Duration::from_millis(config.batch_delay_ms),
            store,
            statuses: DashMap::new(),
        }
    }

    /// Load state for a location; `Idle` when it has never been touched.
    pub fn status(&self, location_id: &str) -> LoadStatus {
        self.statuses
            .get(location_id)
            .map(|s| *s.value())
            .unwrap_or(LoadStatus::Idle)
    }

    /// Prefetch every location, in batches. A single failed fetch is
    /// logged and marked `Error`; it never aborts the cycle, and this
    /// method itself never fails. On return every location is `Done`
    /// or `Error`.
    pub async fn load_all<F, Fut>(
        &self,
        locations: &[Location],
        fetch: F,
    ) -> HashMap<String, ForecastSnapshot>
    where
        F: Fn(Location) -> Fut,
        Fut: Future<Output = Result<ForecastSnapshot, Error>>,
    {
        let mut results = HashMap::new();
        let batches: Vec<&[Location]> = locations.chunks(self.batch_size).collect();
        let batch_count = batches.len();

        for (batch_index, batch) in batches.into_iter().enumerate() {
            debug!(
                "Loading batch {}/{} ({} locations)",
                batch_index + 1,
                batch_count,
                batch.len()
            );

            let outcomes = join_all(batch.iter().map(|loc| self.load_entry(loc, &fetch))).await;
            for (id, snapshot) in outcomes.into_iter().flatten() {
                results.insert(id, snapshot);
            }

            if batch_index + 1 < batch_count {
                sleep(self.batch_delay).await;
            }
        }

        results
    }

    /// Load a single location on demand. Same per-item contract as
    /// `load_all` — a failure is logged and marked, never raised.
    pub async fn load_one<F, Fut>(&self, location: &Location, fetch: F) -> Option<ForecastSnapshot>
    where
        F: Fn(Location) -> Fut,
        Fut: Future<Output = Result<ForecastSnapshot, Error>>,
    {
        self.load_entry(location, &fetch).await.map(|(_, s)| s)
    }

    async fn load_entry<F, Fut>(
        &self,
        location: &Location,
        fetch: &F,
    ) -> Option<(String, ForecastSnapshot)>
    where
        F: Fn(Location) -> Fut,
        Fut: Future<Output = Result<ForecastSnapshot, Error>>,
    {
        // A location already in flight must not be re-entered.
        if self.status(&location.id) == LoadStatus::Loading {
            debug!("{}: load already in flight, skipping", location.id);
            return None;
        }
        self.statuses
            .insert(location.id.clone(), LoadStatus::Loading);

        match self
            .store
            .get_or_fetch(&location.id, || fetch(location.clone()))
            .await
        {
            Ok(snapshot) => {
                self.statuses.insert(location.id.clone(), LoadStatus::Done);
                Some((location.id.clone(), snapshot))
            }
            Err(e) => {
                warn!("Forecast load failed for {}: {}", location.name, e);
                self.statuses.insert(location.id.clone(), LoadStatus::Error);
                None
            }
        }
    }
}
