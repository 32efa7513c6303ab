//! In-memory memoizing caches.
//!
//! Uses `DashMap` so load tasks and readers share the cache without an
//! outer lock. Freshness ages use `tokio::time::Instant`, which follows
//! the paused test clock.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use tokio::time::Instant;

use common::Error;

/// A cached value with its fetch timestamp. Fresh iff
/// `now − fetched_at < ttl`.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: Instant,
}

/// Time-boxed memoizing cache keyed by location id.
///
/// Concurrent `get_or_fetch` calls for the same expired key are NOT
/// coalesced: each caller runs its own fetch and the last write wins.
/// Duplicate fetches in that window are accepted, not prevented.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entries: DashMap<String, CacheEntry<T>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Return the cached value if fresh; otherwise run `fetch`, store
    /// the result stamped with the current time, and return it. A fetch
    /// error propagates and caches nothing, so the next call retries
    /// from scratch.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<T, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if let Some(entry) = self.entries.get(key) {
            if entry.fetched_at.elapsed() < self.ttl {
                return Ok(entry.value.clone());
            }
        }

        let value = fetch().await?;
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(value)
    }

    /// The cached value for a key if it is still fresh, without
    /// fetching.
    pub fn peek(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// All currently fresh entries, keyed as stored.
    pub fn fresh_entries(&self) -> HashMap<String, T> {
        self.entries
            .iter()
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| (entry.key().clone(), entry.value().value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Once-per-day cache keyed by `(location id, calendar date)`.
///
/// The date is taken from the wall clock in UTC at call time, not from
/// the location's own timezone, so invalidation happens at UTC
/// midnight everywhere. Entries have no TTL; the date key rolls them
/// over, and inserting for a new date evicts every older date's
/// entries so the map stays bounded by the location count.
#[derive(Debug, Default)]
pub struct DailyCache<T> {
    entries: DashMap<String, T>,
}

impl<T: Clone> DailyCache<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    fn key_for(location_id: &str, date: NaiveDate) -> String {
        format!("{}_{}", location_id, date)
    }

    pub async fn get_or_fetch<F, Fut>(&self, location_id: &str, fetch: F) -> Result<T, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        self.get_or_fetch_for_date(location_id, Utc::now().date_naive(), fetch)
            .await
    }

    /// Date-explicit variant used by tests and backfills.
    pub async fn get_or_fetch_for_date<F, Fut>(
        &self,
        location_id: &str,
        date: NaiveDate,
        fetch: F,
    ) -> Result<T, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let key = Self::key_for(location_id, date);
        if let Some(entry) = self.entries.get(&key) {
            return Ok(entry.value().clone());
        }

        let value = fetch().await?;
        let date_suffix = format!("_{}", date);
        self.entries.retain(|key, _| key.ends_with(&date_suffix));
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
