//! Dataset Cache Module
//! Explicit context owning the launch source and the time-limited dataset cache.

use super::loader::{CsvSource, LaunchDataset, LoadError};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CachedDataset {
    dataset: Arc<LaunchDataset>,
    loaded_at: Instant,
}

/// Holds at most one dataset, fresh for `ttl` after it was stored.
/// A zero TTL never expires; the entry then lives until `invalidate`.
pub struct DatasetCache {
    ttl: Duration,
    entry: Option<CachedDataset>,
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// The cached dataset if it is still fresh at `now`.
    pub fn get(&self, now: Instant) -> Option<Arc<LaunchDataset>> {
        self.entry
            .as_ref()
            .filter(|entry| !self.expired(entry, now))
            .map(|entry| Arc::clone(&entry.dataset))
    }

    pub fn store(&mut self, dataset: Arc<LaunchDataset>, now: Instant) {
        self.entry = Some(CachedDataset {
            dataset,
            loaded_at: now,
        });
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// True when an entry exists but its TTL has run out.
    pub fn is_stale(&self, now: Instant) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| self.expired(entry, now))
    }

    fn expired(&self, entry: &CachedDataset, now: Instant) -> bool {
        !self.ttl.is_zero() && now.saturating_duration_since(entry.loaded_at) >= self.ttl
    }
}

/// Everything the dashboard reads data through: one source, one cache.
pub struct DashboardContext {
    source: Arc<dyn CsvSource>,
    cache: DatasetCache,
}

impl DashboardContext {
    pub fn new(source: Arc<dyn CsvSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: DatasetCache::new(ttl),
        }
    }

    /// Shared handle to the source, for loading off the UI thread.
    pub fn source(&self) -> Arc<dyn CsvSource> {
        Arc::clone(&self.source)
    }

    pub fn describe_source(&self) -> String {
        self.source.describe()
    }

    pub fn cached(&self, now: Instant) -> Option<Arc<LaunchDataset>> {
        self.cache.get(now)
    }

    pub fn is_stale(&self, now: Instant) -> bool {
        self.cache.is_stale(now)
    }

    /// Drop the cached dataset so the next load goes back to the source.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Record the outcome of a load. Only successes are cached, so a failed
    /// fetch is retried on the next refresh.
    pub fn accept(
        &mut self,
        result: Result<LaunchDataset, LoadError>,
        now: Instant,
    ) -> Result<Arc<LaunchDataset>, LoadError> {
        let dataset = Arc::new(result?);
        self.cache.store(Arc::clone(&dataset), now);
        Ok(dataset)
    }
}
