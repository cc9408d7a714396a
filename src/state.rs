//! Application state management

use crate::api::client::ApiClient;
use crate::api::{DashboardBackend, HttpBackend};
use crate::config::AppConfig;
use crate::error::Result;
use crate::filters::FilterProjector;
use crate::query::QueryCache;
use std::sync::Arc;
use std::time::Duration;

/// Resource families with their own staleness window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Lists and details
    Events,
    /// Aggregates
    Metrics,
}

/// Application state shared by all services
pub struct AppState {
    pub config: AppConfig,

    /// Backend the services query
    pub backend: Arc<dyn DashboardBackend>,

    /// Query cache, lives as long as the application
    pub cache: Arc<QueryCache>,

    /// Memoized filter projection of the dashboard filter panel
    pub projector: FilterProjector,
}

impl AppState {
    /// Create state talking to the configured REST backend
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ApiClient::new(&config)?;
        tracing::info!("Backend: {}", client.base_url());
        Ok(Self::with_backend(config, Arc::new(HttpBackend::new(client))))
    }

    /// Create state around any backend
    pub fn with_backend(config: AppConfig, backend: Arc<dyn DashboardBackend>) -> Self {
        Self {
            config,
            backend,
            cache: Arc::new(QueryCache::new()),
            projector: FilterProjector::new(),
        }
    }

    pub fn stale_time(&self, freshness: Freshness) -> Duration {
        match freshness {
            Freshness::Events => self.config.stale_times.events,
            Freshness::Metrics => self.config.stale_times.metrics,
        }
    }

    /// Tear down the cache
    pub fn shutdown(&self) {
        let stats = self.cache.stats();
        tracing::info!(
            "Shutting down: {} cached entries, {} hits, {} misses, {} fetches",
            self.cache.len(),
            stats.hits,
            stats.misses,
            stats.fetches
        );
        self.cache.clear();
    }
}
