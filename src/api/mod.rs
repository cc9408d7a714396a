//! Backend API module

pub mod client;
pub mod events;
pub mod reports;
pub mod types;

use crate::error::Result;
use crate::filters::FilterParams;
use async_trait::async_trait;
use client::ApiClient;
use reports::{GenerateReportRequest, GenerateReportResponse, ReportStatusResponse};
use types::*;

/// Operations the dashboard needs from the analytics backend
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    /// Paginated, filtered event list
    async fn events(
        &self,
        limit: u32,
        offset: u32,
        filters: Option<&FilterParams>,
    ) -> Result<EventListResponse>;

    /// Single event
    async fn event(&self, event_id: &str) -> Result<Event>;

    /// Brand summaries of an event
    async fn event_brands(&self, event_id: &str) -> Result<EventBrandsResponse>;

    /// Product summaries of an event
    async fn event_products(&self, event_id: &str) -> Result<EventProductsResponse>;

    /// KPI aggregate
    async fn dashboard_metrics(&self, filters: Option<&FilterParams>) -> Result<DashboardMetrics>;

    /// Monthly brand counts
    async fn brand_time_series(
        &self,
        filters: Option<&FilterParams>,
    ) -> Result<BrandTimeSeriesResponse>;

    /// Trigger LLM report generation
    async fn generate_report(&self, request: &GenerateReportRequest)
        -> Result<GenerateReportResponse>;

    /// Report service availability
    async fn reports_status(&self) -> Result<ReportStatusResponse>;
}

/// [`DashboardBackend`] over the REST API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl DashboardBackend for HttpBackend {
    async fn events(
        &self,
        limit: u32,
        offset: u32,
        filters: Option<&FilterParams>,
    ) -> Result<EventListResponse> {
        events::get_events(&self.client, limit, offset, filters).await
    }

    async fn event(&self, event_id: &str) -> Result<Event> {
        events::get_event_by_id(&self.client, event_id).await
    }

    async fn event_brands(&self, event_id: &str) -> Result<EventBrandsResponse> {
        events::get_event_brands(&self.client, event_id).await
    }

    async fn event_products(&self, event_id: &str) -> Result<EventProductsResponse> {
        events::get_event_products(&self.client, event_id).await
    }

    async fn dashboard_metrics(&self, filters: Option<&FilterParams>) -> Result<DashboardMetrics> {
        events::get_dashboard_metrics(&self.client, filters).await
    }

    async fn brand_time_series(
        &self,
        filters: Option<&FilterParams>,
    ) -> Result<BrandTimeSeriesResponse> {
        events::get_brand_time_series(&self.client, filters).await
    }

    async fn generate_report(
        &self,
        request: &GenerateReportRequest,
    ) -> Result<GenerateReportResponse> {
        reports::generate_report(&self.client, request).await
    }

    async fn reports_status(&self) -> Result<ReportStatusResponse> {
        reports::get_reports_status(&self.client).await
    }
}
