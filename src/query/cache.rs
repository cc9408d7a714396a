//! Staleness-aware query cache
//!
//! Entries are keyed by [`QueryKey`] and hold type-erased data. Lookups:
//! - fresh entry: served from cache, no request
//! - stale entry: served immediately, refreshed in the background
//! - missing or invalidated entry: the request is awaited
//!
//! Requests for the same key are serialized through a per-key async lock, so
//! concurrent callers converge on one request and share its outcome, success
//! or failure. A failed request records its error but never drops previously
//! loaded data. The lock of a key is dropped once nobody waits on it.

use super::{QueryKey, QueryState};
use crate::error::{AppError, Result};
use dashmap::DashMap;
use std::any::Any;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

type ErasedData = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct CacheEntry {
    data: Option<ErasedData>,
    error: Option<Arc<AppError>>,
    updated_at: Option<Instant>,
    invalidated: bool,
    /// Bumped every time a request for the key completes
    settled: u64,
}

enum Lookup<T> {
    Fresh(Arc<T>, Instant),
    Stale(Arc<T>, Instant),
    Missing,
}

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub fetches: u64,
}

/// Query cache owned by the application state
#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, CacheEntry>,
    locks: DashMap<QueryKey, Arc<AsyncMutex<()>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a query through the cache
    pub async fn fetch_query<T, F, Fut>(
        self: &Arc<Self>,
        key: QueryKey,
        stale_time: Duration,
        fetcher: F,
    ) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        match self.lookup::<T>(&key, stale_time) {
            Lookup::Fresh(data, updated_at) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for {}", key);
                QueryState::success(data, updated_at, false)
            }
            Lookup::Stale(data, updated_at) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Serving stale {} and refreshing in background", key);

                let cache = Arc::clone(self);
                tokio::spawn(async move {
                    let _ = cache.refresh::<T, F, Fut>(key, stale_time, &fetcher).await;
                });

                QueryState::success(data, updated_at, true)
            }
            Lookup::Missing => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.refresh(key, stale_time, &fetcher).await
            }
        }
    }

    /// Fetch under the key lock and commit the outcome
    async fn refresh<T, F, Fut>(
        self: &Arc<Self>,
        key: QueryKey,
        stale_time: Duration,
        fetcher: &F,
    ) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let observed = self.settled_count(&key);
        let lock = self.lock_for(&key);
        let guard = lock.lock().await;

        let state = if let Some(state) = self.settled_since::<T>(&key, observed) {
            debug!("{} settled by a concurrent request", key);
            state
        } else if let Lookup::Fresh(data, updated_at) = self.lookup::<T>(&key, stale_time) {
            debug!("{} refreshed by a concurrent request", key);
            QueryState::success(data, updated_at, false)
        } else {
            self.fetch_and_commit(&key, fetcher).await
        };

        drop(guard);
        self.release_lock(&key, &lock);
        state
    }

    async fn fetch_and_commit<T, F, Fut>(&self, key: &QueryKey, fetcher: &F) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        debug!("Fetching {}", key);

        match fetcher().await {
            Ok(value) => {
                let data = Arc::new(value);
                let now = Instant::now();
                let erased: ErasedData = data.clone();
                let mut entry = self.entries.entry(key.clone()).or_default();
                entry.data = Some(erased);
                entry.error = None;
                entry.updated_at = Some(now);
                entry.invalidated = false;
                entry.settled += 1;
                QueryState::success(data, now, false)
            }
            Err(err) => {
                warn!("Query {} failed: {}", key, err);
                let err = Arc::new(err);
                let mut entry = self.entries.entry(key.clone()).or_default();
                entry.error = Some(Arc::clone(&err));
                entry.settled += 1;
                let previous = entry.data.clone().and_then(|d| d.downcast::<T>().ok());
                QueryState::failure(err, previous, entry.updated_at)
            }
        }
    }

    fn settled_count(&self, key: &QueryKey) -> u64 {
        self.entries.get(key).map_or(0, |entry| entry.settled)
    }

    /// Outcome of a request that completed after `observed` was read
    fn settled_since<T>(&self, key: &QueryKey, observed: u64) -> Option<QueryState<T>>
    where
        T: Send + Sync + 'static,
    {
        let entry = self.entries.get(key)?;
        if entry.settled == observed {
            return None;
        }

        let data = entry.data.clone().and_then(|d| d.downcast::<T>().ok());
        match &entry.error {
            Some(err) => Some(QueryState::failure(Arc::clone(err), data, entry.updated_at)),
            None => Some(QueryState::success(data?, entry.updated_at?, false)),
        }
    }

    fn lookup<T>(&self, key: &QueryKey, stale_time: Duration) -> Lookup<T>
    where
        T: Send + Sync + 'static,
    {
        let Some(entry) = self.entries.get(key) else {
            return Lookup::Missing;
        };
        if entry.invalidated {
            return Lookup::Missing;
        }

        let (Some(data), Some(updated_at)) = (entry.data.clone(), entry.updated_at) else {
            return Lookup::Missing;
        };
        let Ok(data) = data.downcast::<T>() else {
            warn!("Cached value for {} has an unexpected type", key);
            return Lookup::Missing;
        };

        if updated_at.elapsed() < stale_time {
            Lookup::Fresh(data, updated_at)
        } else {
            Lookup::Stale(data, updated_at)
        }
    }

    fn lock_for(&self, key: &QueryKey) -> Arc<AsyncMutex<()>> {
        self.locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Forget the lock of a key when only the map and `lock` hold it
    fn release_lock(&self, key: &QueryKey, lock: &Arc<AsyncMutex<()>>) {
        self.locks.remove_if(key, |_, held| {
            Arc::ptr_eq(held, lock) && Arc::strong_count(held) == 2
        });
    }

    /// Cached data for a key, regardless of staleness
    pub fn peek<T>(&self, key: &QueryKey) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.entries
            .get(key)
            .and_then(|entry| entry.data.clone())
            .and_then(|data| data.downcast::<T>().ok())
    }

    /// Last error recorded for a key
    pub fn last_error(&self, key: &QueryKey) -> Option<Arc<AppError>> {
        self.entries.get(key).and_then(|entry| entry.error.clone())
    }

    /// Force the next access of every entry of `resource` to refetch
    pub fn invalidate(&self, resource: &str) -> usize {
        let mut count = 0;
        for mut entry in self.entries.iter_mut() {
            if entry.key().resource() == resource {
                entry.value_mut().invalidated = true;
                count += 1;
            }
        }
        debug!("Invalidated {} entries of {}", count, resource);
        count
    }

    pub fn remove(&self, key: &QueryKey) {
        self.entries.remove(key);
        self.locks.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.locks.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
        }
    }
}
