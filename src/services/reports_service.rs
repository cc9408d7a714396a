//! Reports Service
//!
//! Report generation is a mutation: it is never cached, and a successful
//! generation invalidates the cached service status.

use super::resources;
use crate::api::reports::{GenerateReportRequest, GenerateReportResponse, ReportStatusResponse};
use crate::error::Result;
use crate::query::{QueryKey, QueryState};
use crate::state::{AppState, Freshness};
use std::sync::Arc;
use tracing::{info, warn};

pub struct ReportsService;

impl ReportsService {
    /// Availability of the report generator
    pub async fn status(state: &AppState) -> QueryState<ReportStatusResponse> {
        let key = QueryKey::new(resources::REPORTS_STATUS);

        let backend = Arc::clone(&state.backend);
        state
            .cache
            .fetch_query(key, state.stale_time(Freshness::Metrics), move || {
                let backend = Arc::clone(&backend);
                async move { backend.reports_status().await }
            })
            .await
    }

    /// Generate a report
    pub async fn generate(
        state: &AppState,
        request: &GenerateReportRequest,
    ) -> Result<GenerateReportResponse> {
        info!(
            "ReportsService::generate - {}",
            request.report_type.as_str()
        );

        match state.backend.generate_report(request).await {
            Ok(report) => {
                let dropped = state.cache.invalidate(resources::REPORTS_STATUS);
                info!(
                    "Report generated in {}ms, invalidated {} status entries",
                    report.metadata.generation_time_ms, dropped
                );
                Ok(report)
            }
            Err(e) => {
                warn!("Report generation failed: {}", e);
                Err(e)
            }
        }
    }
}
