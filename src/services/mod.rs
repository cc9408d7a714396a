//! Services Layer
//!
//! Cached data access used by the dashboard panels and the CLI commands.
//! Each query pairs a cache key with a backend call:
//!
//! ```text
//! Panel / Command --> Service --> QueryCache --> DashboardBackend --> REST API
//! ```
//!
//! # Services
//!
//! - `EventsService` - event list, event detail, event brands and products
//! - `MetricsService` - dashboard KPIs, brand time series
//! - `ReportsService` - report service status, report generation

pub mod events_service;
pub mod metrics_service;
pub mod reports_service;

pub use events_service::EventsService;
pub use metrics_service::MetricsService;
pub use reports_service::ReportsService;

/// Cache resource names
pub mod resources {
    pub const EVENTS: &str = "events";
    pub const EVENT: &str = "event";
    pub const EVENT_BRANDS: &str = "event-brands";
    pub const EVENT_PRODUCTS: &str = "event-products";
    pub const DASHBOARD_METRICS: &str = "dashboard-metrics";
    pub const BRAND_TIME_SERIES: &str = "brand-time-series";
    pub const REPORTS_STATUS: &str = "reports-status";
}

/// Identifier of an id-scoped query, `None` when the query is disabled
fn enabled_id(event_id: Option<&str>) -> Option<String> {
    event_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
