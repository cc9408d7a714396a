//! Dashboard page: every panel loads independently into its own slot

use super::brand_ranking::DEFAULT_TOP_N;
use super::{BrandChart, BrandRanking, EventsTable, KpiCards, Panel, SportDistribution};
use crate::api::types::{
    BrandTimeSeriesResponse, DashboardMetrics, EventBrandsResponse, EventListResponse,
};
use crate::filters::DashboardFilters;
use crate::query::QuerySlot;
use crate::services::{EventsService, MetricsService};
use crate::state::AppState;
use tracing::debug;

pub const DEFAULT_EVENTS_LIMIT: u32 = 10;

pub struct Dashboard {
    pub metrics: QuerySlot<DashboardMetrics>,
    pub time_series: QuerySlot<BrandTimeSeriesResponse>,
    pub events: QuerySlot<EventListResponse>,
    pub brands: QuerySlot<EventBrandsResponse>,
    events_limit: u32,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DEFAULT_EVENTS_LIMIT)
    }
}

impl Dashboard {
    pub fn new(events_limit: u32) -> Self {
        Self {
            metrics: QuerySlot::new("dashboard-metrics"),
            time_series: QuerySlot::new("brand-time-series"),
            events: QuerySlot::new("events"),
            brands: QuerySlot::new("event-brands"),
            events_limit,
        }
    }

    /// Load all panels for the given filter panel state.
    /// The brand ranking follows the first event of the loaded page.
    pub async fn load(&self, state: &AppState, filters: &DashboardFilters) {
        let params = state.projector.project(filters);
        debug!("Loading dashboard with {} active filters", params.len());

        let events_then_brands = async {
            self.events
                .run(EventsService::list(
                    state,
                    self.events_limit,
                    0,
                    Some(params.as_ref()),
                ))
                .await;

            let first_event = self
                .events
                .current()
                .data
                .and_then(|page| page.events.first().map(|e| e.id.clone()));
            self.brands
                .run(EventsService::brands(state, first_event.as_deref()))
                .await;
        };

        futures_util::join!(
            self.metrics
                .run(MetricsService::dashboard(state, Some(params.as_ref()))),
            self.time_series
                .run(MetricsService::brand_time_series(state, Some(params.as_ref()))),
            events_then_brands,
        );
    }

    pub fn kpi_panel(&self) -> Panel<KpiCards> {
        Panel::from_state(&self.metrics.current(), |m| Some(KpiCards::from_metrics(m)))
    }

    pub fn chart_panel(&self) -> Panel<BrandChart> {
        Panel::from_state(&self.time_series.current(), |ts| {
            BrandChart::from_entries(&ts.data)
        })
    }

    pub fn sport_panel(&self) -> Panel<SportDistribution> {
        Panel::from_state(&self.events.current(), |page| {
            SportDistribution::from_events(&page.events)
        })
    }

    pub fn events_panel(&self) -> Panel<EventsTable> {
        Panel::from_state(&self.events.current(), EventsTable::from_response)
    }

    pub fn ranking_panel(&self) -> Panel<BrandRanking> {
        Panel::from_state(&self.brands.current(), |b| {
            BrandRanking::from_summaries(&b.brands, DEFAULT_TOP_N)
        })
    }

    /// Text of the whole page
    pub fn render(&self) -> String {
        [
            self.kpi_panel().render("Sem métricas disponíveis"),
            self.chart_panel().render("Sem dados temporais de marcas"),
            self.sport_panel().render("Nenhum evento encontrado"),
            self.events_panel().render("Nenhum evento encontrado"),
            self.ranking_panel().render("Nenhuma marca encontrada"),
        ]
        .join("\n")
    }
}
