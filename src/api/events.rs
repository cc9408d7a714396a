//! Event and metrics endpoints

use crate::api::client::{path_segment, ApiClient, QueryParams};
use crate::api::types::{
    BrandTimeSeriesResponse, DashboardMetrics, Event, EventBrandsResponse, EventListResponse,
    EventProductsResponse,
};
use crate::error::Result;
use crate::filters::FilterParams;

pub const DEFAULT_LIMIT: u32 = 100;
pub const DEFAULT_OFFSET: u32 = 0;

/// List events with pagination and filters
pub async fn get_events(
    client: &ApiClient,
    limit: u32,
    offset: u32,
    filters: Option<&FilterParams>,
) -> Result<EventListResponse> {
    client
        .get("/api/events", Some(events_query(limit, offset, filters)))
        .await
}

/// Single event by id
pub async fn get_event_by_id(client: &ApiClient, event_id: &str) -> Result<Event> {
    client
        .get(&format!("/api/events/{}", path_segment(event_id)), None)
        .await
}

/// Brand summaries for an event
pub async fn get_event_brands(client: &ApiClient, event_id: &str) -> Result<EventBrandsResponse> {
    client
        .get(&format!("/api/events/{}/brands", path_segment(event_id)), None)
        .await
}

/// Product summaries for an event
pub async fn get_event_products(
    client: &ApiClient,
    event_id: &str,
) -> Result<EventProductsResponse> {
    client
        .get(&format!("/api/events/{}/products", path_segment(event_id)), None)
        .await
}

/// Aggregated KPIs for the current filters
pub async fn get_dashboard_metrics(
    client: &ApiClient,
    filters: Option<&FilterParams>,
) -> Result<DashboardMetrics> {
    client
        .get("/api/metrics/dashboard", non_empty(metrics_query(filters)))
        .await
}

/// Monthly brand counts for the current filters
pub async fn get_brand_time_series(
    client: &ApiClient,
    filters: Option<&FilterParams>,
) -> Result<BrandTimeSeriesResponse> {
    client
        .get(
            "/api/metrics/brands/timeseries",
            non_empty(time_series_query(filters)),
        )
        .await
}

/// Query for `/api/events`; `brand` is not part of this contract
pub fn events_query(limit: u32, offset: u32, filters: Option<&FilterParams>) -> QueryParams {
    let mut params = QueryParams::new().with("limit", limit).with("offset", offset);
    if let Some(filters) = filters {
        filters.write_event_params(&mut params);
    }
    params
}

pub fn metrics_query(filters: Option<&FilterParams>) -> QueryParams {
    let mut params = QueryParams::new();
    if let Some(filters) = filters {
        filters.write_event_params(&mut params);
    }
    params
}

pub fn time_series_query(filters: Option<&FilterParams>) -> QueryParams {
    let mut params = metrics_query(filters);
    if let Some(filters) = filters {
        params.insert_opt("brand", filters.brand.as_deref());
    }
    params
}

fn non_empty(params: QueryParams) -> Option<QueryParams> {
    if params.is_empty() {
        None
    } else {
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_filters() -> FilterParams {
        FilterParams {
            sport: Some("corrida".to_string()),
            event_type: Some("prova".to_string()),
            location: None,
            date_from: NaiveDate::from_ymd_opt(2025, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2025, 1, 31),
            brand: Some("Nike".to_string()),
        }
    }

    #[test]
    fn test_events_query_omits_absent_filters_and_brand() {
        let params = events_query(10, 0, Some(&sample_filters()));
        assert_eq!(
            params.to_query_string(),
            "limit=10&offset=0&sport=corrida&event_type=prova&date_from=2025-01-01&date_to=2025-01-31"
        );
        assert_eq!(params.get("location"), None);
        assert_eq!(params.get("brand"), None);
    }

    #[test]
    fn test_metrics_query_empty_without_filters() {
        assert!(metrics_query(None).is_empty());
        assert!(metrics_query(Some(&FilterParams::default())).is_empty());
    }

    #[test]
    fn test_time_series_query_includes_brand() {
        let params = time_series_query(Some(&sample_filters()));
        assert_eq!(params.get("brand"), Some("Nike"));
        assert_eq!(params.get("sport"), Some("corrida"));
    }

    #[test]
    fn test_projection_does_not_mutate_filters() {
        let filters = sample_filters();
        let before = filters.clone();
        let _ = time_series_query(Some(&filters));
        assert_eq!(filters, before);
    }
}
