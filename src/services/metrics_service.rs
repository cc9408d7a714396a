//! Metrics Service
//!
//! Aggregated dashboard data. Aggregates refresh less often than event
//! lists and use the metrics staleness window.

use super::resources;
use crate::api::types::{BrandTimeSeriesResponse, DashboardMetrics};
use crate::filters::FilterParams;
use crate::query::{QueryKey, QueryState};
use crate::state::{AppState, Freshness};
use std::sync::Arc;
use tracing::info;

pub struct MetricsService;

impl MetricsService {
    /// KPI totals for the filter scope
    pub async fn dashboard(
        state: &AppState,
        filters: Option<&FilterParams>,
    ) -> QueryState<DashboardMetrics> {
        let key = QueryKey::new(resources::DASHBOARD_METRICS).filters(filters);
        info!("MetricsService::dashboard - {}", key);

        let backend = Arc::clone(&state.backend);
        let filters = filters.cloned();
        state
            .cache
            .fetch_query(key, state.stale_time(Freshness::Metrics), move || {
                let backend = Arc::clone(&backend);
                let filters = filters.clone();
                async move { backend.dashboard_metrics(filters.as_ref()).await }
            })
            .await
    }

    /// Monthly item counts per brand
    pub async fn brand_time_series(
        state: &AppState,
        filters: Option<&FilterParams>,
    ) -> QueryState<BrandTimeSeriesResponse> {
        let key = QueryKey::new(resources::BRAND_TIME_SERIES).filters(filters);
        info!("MetricsService::brand_time_series - {}", key);

        let backend = Arc::clone(&state.backend);
        let filters = filters.cloned();
        state
            .cache
            .fetch_query(key, state.stale_time(Freshness::Metrics), move || {
                let backend = Arc::clone(&backend);
                let filters = filters.clone();
                async move { backend.brand_time_series(filters.as_ref()).await }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockBackend;
    use crate::tests::utils::state_with;

    #[tokio::test]
    async fn test_dashboard_metrics() {
        let backend = MockBackend::new().with_metrics(DashboardMetrics {
            total_events: 12,
            total_photos_analyzed: 2_847_650,
            total_athletes_identified: 45_200,
            total_brands_tracked: 38,
        });
        let state = state_with(backend.clone());

        let metrics = MetricsService::dashboard(&state, None).await;
        assert!(metrics.is_success());
        assert_eq!(metrics.data.unwrap().total_photos_analyzed, 2_847_650);
    }

    #[tokio::test]
    async fn test_backend_error_message_surfaces() {
        let backend = MockBackend::new().failing_metrics(503, "DB unavailable");
        let state = state_with(backend);

        let metrics = MetricsService::dashboard(&state, None).await;
        assert!(metrics.is_error());
        assert!(metrics.data.is_none());
        assert_eq!(metrics.error_message().as_deref(), Some("DB unavailable"));
    }

    #[tokio::test]
    async fn test_empty_and_missing_filters_share_entry() {
        let backend = MockBackend::new();
        let state = state_with(backend.clone());

        MetricsService::dashboard(&state, None).await;
        MetricsService::dashboard(&state, Some(&FilterParams::default())).await;
        assert_eq!(backend.calls("dashboard_metrics"), 1);
    }

    #[tokio::test]
    async fn test_filter_change_is_a_new_entry() {
        let backend = MockBackend::new();
        let state = state_with(backend.clone());
        let corrida = FilterParams {
            sport: Some("corrida".to_string()),
            ..Default::default()
        };
        let ciclismo = FilterParams {
            sport: Some("ciclismo".to_string()),
            ..Default::default()
        };

        MetricsService::brand_time_series(&state, Some(&corrida)).await;
        MetricsService::brand_time_series(&state, Some(&ciclismo)).await;
        MetricsService::brand_time_series(&state, Some(&corrida)).await;
        assert_eq!(backend.calls("brand_time_series"), 2);
        assert_eq!(backend.last_filters(), Some(ciclismo));
    }
}
