//! Report generation endpoints and helpers

use crate::api::client::ApiClient;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    MarketShare,
    AudienceSegmentation,
    EventMetrics,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::MarketShare => "market_share",
            ReportType::AudienceSegmentation => "audience_segmentation",
            ReportType::EventMetrics => "event_metrics",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportType::MarketShare => "Market Share",
            ReportType::AudienceSegmentation => "Segmentação de Público",
            ReportType::EventMetrics => "Métricas do Evento",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFocus {
    #[default]
    General,
    Brands,
    Products,
    Audience,
}

impl ReportFocus {
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportFocus::General => "Visão Geral",
            ReportFocus::Brands => "Marcas",
            ReportFocus::Products => "Produtos",
            ReportFocus::Audience => "Público",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketShareFilters {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceSegmentationFilters {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetricsFilters {
    pub event_id: String,
    #[serde(default)]
    pub focus: ReportFocus,
}

/// Filters of a report request; the variant is implied by the report type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportFilters {
    MarketShare(MarketShareFilters),
    AudienceSegmentation(AudienceSegmentationFilters),
    EventMetrics(EventMetricsFilters),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateReportRequest {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub filters: ReportFilters,
}

impl GenerateReportRequest {
    pub fn market_share(filters: MarketShareFilters) -> Self {
        Self {
            report_type: ReportType::MarketShare,
            filters: ReportFilters::MarketShare(filters),
        }
    }

    pub fn audience_segmentation(filters: AudienceSegmentationFilters) -> Self {
        Self {
            report_type: ReportType::AudienceSegmentation,
            filters: ReportFilters::AudienceSegmentation(filters),
        }
    }

    pub fn event_metrics(event_id: impl Into<String>, focus: ReportFocus) -> Self {
        Self {
            report_type: ReportType::EventMetrics,
            filters: ReportFilters::EventMetrics(EventMetricsFilters {
                event_id: event_id.into(),
                focus,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMetadata {
    pub total_events: u64,
    pub total_athletes: u64,
    pub total_items: u64,
    pub tokens_used: u64,
    pub model: String,
    pub generation_time_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateReportResponse {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub generated_at: String,
    pub filters_applied: Map<String, Value>,
    pub title: String,
    pub content: String,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStatusResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub message: String,
}

/// Generate a report through the LLM-backed endpoint
pub async fn generate_report(
    client: &ApiClient,
    request: &GenerateReportRequest,
) -> Result<GenerateReportResponse> {
    client.post("/api/reports/generate", request).await
}

/// Availability of the report service
pub async fn get_reports_status(client: &ApiClient) -> Result<ReportStatusResponse> {
    client.get("/api/reports/status", None).await
}

pub fn format_report_content(content: &str) -> String {
    content.trim().to_string()
}

/// `850ms` below one second, `2.3s` otherwise
pub fn format_generation_time(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}
