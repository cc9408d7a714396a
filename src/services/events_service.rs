//! Events Service
//!
//! Event list and per-event detail queries. Id-scoped queries stay idle
//! until an event is selected.

use super::{enabled_id, resources};
use crate::api::types::{Event, EventBrandsResponse, EventListResponse, EventProductsResponse};
use crate::filters::FilterParams;
use crate::query::{QueryKey, QueryState};
use crate::state::{AppState, Freshness};
use std::sync::Arc;
use tracing::info;

pub struct EventsService;

impl EventsService {
    /// Paginated event list
    pub async fn list(
        state: &AppState,
        limit: u32,
        offset: u32,
        filters: Option<&FilterParams>,
    ) -> QueryState<EventListResponse> {
        let key = QueryKey::new(resources::EVENTS)
            .param("limit", limit)
            .param("offset", offset)
            .filters(filters);
        info!("EventsService::list - {}", key);

        let backend = Arc::clone(&state.backend);
        let filters = filters.cloned();
        state
            .cache
            .fetch_query(key, state.stale_time(Freshness::Events), move || {
                let backend = Arc::clone(&backend);
                let filters = filters.clone();
                async move { backend.events(limit, offset, filters.as_ref()).await }
            })
            .await
    }

    /// Event detail; idle when no event is selected
    pub async fn detail(state: &AppState, event_id: Option<&str>) -> QueryState<Event> {
        let Some(event_id) = enabled_id(event_id) else {
            return QueryState::idle();
        };
        let key = QueryKey::new(resources::EVENT).param("id", &event_id);

        let backend = Arc::clone(&state.backend);
        state
            .cache
            .fetch_query(key, state.stale_time(Freshness::Events), move || {
                let backend = Arc::clone(&backend);
                let event_id = event_id.clone();
                async move { backend.event(&event_id).await }
            })
            .await
    }

    /// Brand summaries of an event; idle when no event is selected
    pub async fn brands(state: &AppState, event_id: Option<&str>) -> QueryState<EventBrandsResponse> {
        let Some(event_id) = enabled_id(event_id) else {
            return QueryState::idle();
        };
        let key = QueryKey::new(resources::EVENT_BRANDS).param("id", &event_id);

        let backend = Arc::clone(&state.backend);
        state
            .cache
            .fetch_query(key, state.stale_time(Freshness::Events), move || {
                let backend = Arc::clone(&backend);
                let event_id = event_id.clone();
                async move { backend.event_brands(&event_id).await }
            })
            .await
    }

    /// Product summaries of an event; idle when no event is selected
    pub async fn products(
        state: &AppState,
        event_id: Option<&str>,
    ) -> QueryState<EventProductsResponse> {
        let Some(event_id) = enabled_id(event_id) else {
            return QueryState::idle();
        };
        let key = QueryKey::new(resources::EVENT_PRODUCTS).param("id", &event_id);

        let backend = Arc::clone(&state.backend);
        state
            .cache
            .fetch_query(key, state.stale_time(Freshness::Events), move || {
                let backend = Arc::clone(&backend);
                let event_id = event_id.clone();
                async move { backend.event_products(&event_id).await }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::{sample_event, MockBackend};
    use crate::tests::utils::state_with;

    #[tokio::test]
    async fn test_list_scenario_single_request() {
        let backend = MockBackend::new().with_events(vec![
            sample_event("1", "corrida"),
            sample_event("2", "corrida"),
            sample_event("3", "corrida"),
        ]);
        let state = state_with(backend.clone());
        let filters = FilterParams {
            sport: Some("corrida".to_string()),
            ..Default::default()
        };

        let first = EventsService::list(&state, 10, 0, Some(&filters)).await;
        assert!(first.is_success());
        assert!(first.error.is_none());
        assert_eq!(first.data.as_ref().unwrap().events.len(), 3);

        let again = EventsService::list(&state, 10, 0, Some(&filters.clone())).await;
        assert_eq!(again.data.unwrap().events.len(), 3);
        assert_eq!(backend.calls("events"), 1);
        assert_eq!(backend.last_filters(), Some(filters));
    }

    #[tokio::test]
    async fn test_different_pages_are_different_entries() {
        let backend = MockBackend::new().with_events(vec![sample_event("1", "ciclismo")]);
        let state = state_with(backend.clone());

        EventsService::list(&state, 10, 0, None).await;
        EventsService::list(&state, 10, 10, None).await;
        assert_eq!(backend.calls("events"), 2);
    }

    #[tokio::test]
    async fn test_id_queries_idle_without_id() {
        let backend = MockBackend::new();
        let state = state_with(backend.clone());

        let detail = EventsService::detail(&state, None).await;
        let brands = EventsService::brands(&state, Some("  ")).await;
        let products = EventsService::products(&state, None).await;

        assert!(detail.is_idle() && !detail.is_loading() && detail.data.is_none());
        assert!(brands.is_idle());
        assert!(products.is_idle());
        assert_eq!(backend.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_id_queries_fetch_with_id() {
        let backend = MockBackend::new().with_events(vec![sample_event("evt-1", "triathlon")]);
        let state = state_with(backend.clone());

        let detail = EventsService::detail(&state, Some("evt-1")).await;
        assert_eq!(detail.data.unwrap().id, "evt-1");

        let brands = EventsService::brands(&state, Some("evt-1")).await;
        assert_eq!(brands.data.unwrap().event_id, "evt-1");
        assert_eq!(backend.calls("event"), 1);
        assert_eq!(backend.calls("event_brands"), 1);
    }

    #[tokio::test]
    async fn test_missing_event_surfaces_error() {
        let state = state_with(MockBackend::new());
        let detail = EventsService::detail(&state, Some("nope")).await;
        assert!(detail.is_error());
        assert_eq!(detail.error_message().as_deref(), Some("Evento não encontrado"));
    }
}
