//! Event commands

use crate::api::types::{Event, EventProductsResponse};
use crate::error::{AppError, Result};
use crate::filters::DashboardFilters;
use crate::services::EventsService;
use crate::state::AppState;
use crate::views::format::{format_date, format_number, format_percent};
use crate::views::{BrandRanking, EventsTable, Panel};
use std::fmt::Write;

/// Brands shown for a single event
const EVENT_TOP_BRANDS: usize = 10;

/// Paginated events table
pub async fn list_events(
    state: &AppState,
    limit: u32,
    offset: u32,
    filters: &DashboardFilters,
) -> Result<String> {
    let params = state.projector.project(filters);
    let page = EventsService::list(state, limit, offset, Some(params.as_ref())).await;

    let panel = Panel::from_state(&page, EventsTable::from_response);
    page.into_result()?;
    Ok(panel.render("Nenhum evento encontrado"))
}

/// Event detail with its brands and products
pub async fn show_event(state: &AppState, event_id: &str) -> Result<String> {
    let event_id = event_id.trim();
    if event_id.is_empty() {
        return Err(AppError::Validation("Informe o id do evento".to_string()));
    }

    let (detail, brands, products) = futures_util::join!(
        EventsService::detail(state, Some(event_id)),
        EventsService::brands(state, Some(event_id)),
        EventsService::products(state, Some(event_id)),
    );

    let event = detail
        .into_result()?
        .ok_or_else(|| AppError::NotFound(format!("event {}", event_id)))?;

    let mut out = render_event(&event);
    let ranking = Panel::from_state(&brands, |b| {
        BrandRanking::from_summaries(&b.brands, EVENT_TOP_BRANDS)
    });
    out.push_str(&ranking.render("Nenhuma marca detectada\n"));
    let products = Panel::from_state(&products, |p| {
        (!p.products.is_empty()).then(|| render_products(p))
    });
    out.push_str(&products.render("Nenhum produto detectado\n"));
    Ok(out)
}

fn render_event(event: &Event) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", event.event_name);
    let _ = writeln!(
        out,
        "  {} | {} | {} | {}",
        event.sport.label(),
        event.event_type.label(),
        format_date(&event.event_date),
        event.event_location
    );
    let _ = writeln!(
        out,
        "  {} fotos | {} atletas estimados | {}",
        format_number(event.total_photos),
        format_number(event.total_athletes_estimated),
        event.status.label()
    );
    if let Some(processed_at) = &event.processed_at {
        let _ = writeln!(out, "  Processado em {}", format_date(processed_at));
    }
    out.push('\n');
    out
}

fn render_products(response: &EventProductsResponse) -> String {
    let mut out = String::from("Produtos Detectados\n");
    for product in &response.products {
        let _ = writeln!(
            out,
            "  {:<16} {:>10} itens  {:>7}",
            product.product_type,
            format_number(product.total_items),
            format_percent(product.product_share_percent)
        );
    }
    out
}
