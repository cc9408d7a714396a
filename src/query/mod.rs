//! Keyed query caching
//!
//! - `QueryKey` - normalized (resource, params) identity
//! - `QueryState` - loading/error/data snapshot handed to the views
//! - `QueryCache` - staleness-aware cache with per-key request dedup
//! - `QuerySlot` - generation-guarded holder for one UI slot

pub mod cache;
pub mod slot;

pub use cache::{CacheStats, QueryCache};
pub use slot::{QuerySlot, SlotTicket};

use crate::error::{AppError, Result};
use crate::filters::FilterParams;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Cache identity: resource name plus params sorted by key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    resource: String,
    params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            params: Vec::new(),
        }
    }

    /// Add or replace a parameter
    pub fn param(mut self, key: &str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        match self.params.binary_search_by(|(k, _)| k.as_str().cmp(key)) {
            Ok(index) => self.params[index].1 = value,
            Err(index) => self.params.insert(index, (key.to_string(), value)),
        }
        self
    }

    /// Add every constrained filter field; absent filters add nothing
    pub fn filters(self, filters: Option<&FilterParams>) -> Self {
        let Some(filters) = filters else {
            return self;
        };
        let params = filters.to_query();
        params.iter().fold(self, |key, (k, v)| key.param(k, v))
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            write!(f, "{}{}={}", if i == 0 { '?' } else { '&' }, k, v)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Disabled query: nothing requested, nothing loaded
    Idle,
    /// First load in flight, no data yet
    Loading,
    Success,
    Error,
}

/// Snapshot of a query
#[derive(Debug)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<Arc<AppError>>,
    /// Data is older than the staleness window
    pub is_stale: bool,
    /// A request is in flight (initial load or background refresh)
    pub is_fetching: bool,
    pub updated_at: Option<Instant>,
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_stale: self.is_stale,
            is_fetching: self.is_fetching,
            updated_at: self.updated_at,
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> QueryState<T> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_stale: false,
            is_fetching: false,
            updated_at: None,
        }
    }

    pub fn loading() -> Self {
        Self {
            status: QueryStatus::Loading,
            is_fetching: true,
            ..Self::idle()
        }
    }

    pub fn success(data: Arc<T>, updated_at: Instant, is_stale: bool) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            error: None,
            is_stale,
            is_fetching: is_stale,
            updated_at: Some(updated_at),
        }
    }

    /// Failed attempt; previously loaded data is kept
    pub fn failure(error: Arc<AppError>, previous: Option<Arc<T>>, updated_at: Option<Instant>) -> Self {
        Self {
            status: QueryStatus::Error,
            data: previous,
            error: Some(error),
            is_stale: true,
            is_fetching: false,
            updated_at,
        }
    }

    /// Mark a new request as started
    pub fn begin_fetch(&mut self) {
        self.is_fetching = true;
        if self.data.is_none() {
            self.status = QueryStatus::Loading;
            self.error = None;
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == QueryStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    /// Data of a settled query; `None` for an idle query
    pub fn into_result(self) -> Result<Option<Arc<T>>> {
        match (self.status, self.error) {
            (QueryStatus::Error, Some(error)) => Err(AppError::Shared(error)),
            _ => Ok(self.data),
        }
    }
}
