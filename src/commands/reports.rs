//! Report commands

use crate::api::reports::{
    format_generation_time, format_report_content, AudienceSegmentationFilters,
    GenerateReportRequest, GenerateReportResponse, MarketShareFilters, ReportFocus, ReportType,
};
use crate::error::{AppError, Result};
use crate::filters::DashboardFilters;
use crate::services::ReportsService;
use crate::state::AppState;
use crate::views::format::{format_date, format_number};
use chrono::NaiveDate;
use std::fmt::Write;

/// Report parameters as given on the command line
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sport: Option<String>,
    pub location: Option<String>,
    pub product_type: Option<String>,
    pub brands: Vec<String>,
    pub event_id: Option<String>,
    pub focus: ReportFocus,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reporting period, under the same bound as the filter panel
fn period(options: &ReportOptions) -> Result<(NaiveDate, NaiveDate)> {
    let mut period = DashboardFilters::new();
    period.set_date_from(options.date_from)?;
    period.set_date_to(options.date_to)?;
    match (period.date_from(), period.date_to()) {
        (Some(date_from), Some(date_to)) => Ok((date_from, date_to)),
        _ => Err(AppError::Validation(
            "Selecione o período do relatório".to_string(),
        )),
    }
}

/// Validate options and build the request for a report type
pub fn build_request(
    report_type: ReportType,
    options: &ReportOptions,
) -> Result<GenerateReportRequest> {
    let request = match report_type {
        ReportType::EventMetrics => {
            let event_id = non_blank(&options.event_id).ok_or_else(|| {
                AppError::Validation("Informe o evento do relatório".to_string())
            })?;
            GenerateReportRequest::event_metrics(event_id, options.focus)
        }
        ReportType::MarketShare => {
            let (date_from, date_to) = period(options)?;
            let brands: Vec<String> = options
                .brands
                .iter()
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty())
                .collect();
            GenerateReportRequest::market_share(MarketShareFilters {
                date_from,
                date_to,
                sport: non_blank(&options.sport),
                location: non_blank(&options.location),
                product_type: non_blank(&options.product_type),
                brands: (!brands.is_empty()).then_some(brands),
            })
        }
        ReportType::AudienceSegmentation => {
            let (date_from, date_to) = period(options)?;
            GenerateReportRequest::audience_segmentation(AudienceSegmentationFilters {
                date_from,
                date_to,
                sport: non_blank(&options.sport),
                location: non_blank(&options.location),
                product_type: non_blank(&options.product_type),
            })
        }
    };
    Ok(request)
}

/// Generate a report and render it
pub async fn generate_report(state: &AppState, request: &GenerateReportRequest) -> Result<String> {
    let report = ReportsService::generate(state, request).await?;
    Ok(render_report(&report))
}

fn render_report(report: &GenerateReportResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.title);
    let _ = writeln!(
        out,
        "{} | gerado em {}",
        report.report_type.display_name(),
        format_date(&report.generated_at)
    );
    out.push('\n');
    out.push_str(&format_report_content(&report.content));
    out.push_str("\n\n");

    let meta = &report.metadata;
    let _ = writeln!(
        out,
        "{} eventos | {} atletas | {} itens | {} tokens | {} | {}",
        format_number(meta.total_events),
        format_number(meta.total_athletes),
        format_number(meta.total_items),
        format_number(meta.tokens_used),
        meta.model,
        format_generation_time(meta.generation_time_ms)
    );
    out
}

/// Report generator availability
pub async fn show_status(state: &AppState) -> Result<String> {
    let status = ReportsService::status(state).await.into_result()?;
    let Some(status) = status else {
        return Ok(String::new());
    };

    let mut out = String::new();
    if status.available {
        let _ = write!(out, "Disponível");
        if let Some(model) = &status.model {
            let _ = write!(out, " (modelo: {})", model);
        }
    } else {
        let _ = write!(out, "Indisponível");
    }
    if !status.message.is_empty() {
        let _ = write!(out, ": {}", status.message);
    }
    out.push('\n');
    Ok(out)
}
