//! Dashboard panels
//!
//! Every panel is derived from a [`QueryState`] and renders as plain text.
//! Builders are pure, so the same panel can back the CLI or any other
//! front end.

pub mod brand_chart;
pub mod brand_ranking;
pub mod dashboard;
pub mod events_table;
pub mod format;
pub mod kpi;
pub mod sport_distribution;

pub use brand_chart::BrandChart;
pub use brand_ranking::BrandRanking;
pub use dashboard::Dashboard;
pub use events_table::EventsTable;
pub use kpi::KpiCards;
pub use sport_distribution::SportDistribution;

use crate::query::{QueryState, QueryStatus};
use std::fmt;

pub const LOADING_TEXT: &str = "Carregando...";

/// Render state of one panel
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Loading,
    Error(String),
    Empty,
    Ready(T),
}

impl<T> Panel<T> {
    /// Build a panel from a query; `build` returns `None` for empty data.
    /// An idle (disabled) query renders as empty.
    pub fn from_state<D, F>(state: &QueryState<D>, build: F) -> Self
    where
        F: FnOnce(&D) -> Option<T>,
    {
        match state.status {
            QueryStatus::Loading => Panel::Loading,
            QueryStatus::Error => Panel::Error(state.error_message().unwrap_or_default()),
            QueryStatus::Idle => Panel::Empty,
            QueryStatus::Success => state
                .data
                .as_deref()
                .and_then(build)
                .map_or(Panel::Empty, Panel::Ready),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready(_))
    }
}

impl<T: fmt::Display> Panel<T> {
    /// Text of the panel, with the given placeholder for empty data
    pub fn render(&self, empty: &str) -> String {
        match self {
            Panel::Loading => LOADING_TEXT.to_string(),
            Panel::Error(message) => format!("Erro: {}", message),
            Panel::Empty => empty.to_string(),
            Panel::Ready(value) => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::Arc;
    use std::time::Instant;

    fn non_empty(values: &Vec<u32>) -> Option<usize> {
        (!values.is_empty()).then_some(values.len())
    }

    #[test]
    fn test_panel_states() {
        let loading: QueryState<Vec<u32>> = QueryState::loading();
        assert_eq!(Panel::from_state(&loading, non_empty), Panel::Loading);

        let idle: QueryState<Vec<u32>> = QueryState::idle();
        assert_eq!(Panel::from_state(&idle, non_empty), Panel::Empty);

        let empty = QueryState::success(Arc::new(Vec::new()), Instant::now(), false);
        assert_eq!(Panel::from_state(&empty, non_empty), Panel::Empty);

        let ready = QueryState::success(Arc::new(vec![1, 2]), Instant::now(), false);
        assert_eq!(Panel::from_state(&ready, non_empty), Panel::Ready(2));
    }

    #[test]
    fn test_error_wins_over_previous_data() {
        let error = Arc::new(AppError::Api {
            status: 503,
            message: "DB unavailable".to_string(),
        });
        let state = QueryState::failure(error, Some(Arc::new(vec![1])), Some(Instant::now()));
        let panel = Panel::from_state(&state, non_empty);

        assert_eq!(panel, Panel::Error("DB unavailable".to_string()));
        assert_eq!(panel.render("-"), "Erro: DB unavailable");
    }

    #[test]
    fn test_render_placeholders() {
        assert_eq!(Panel::<u32>::Loading.render("-"), LOADING_TEXT);
        assert_eq!(Panel::<u32>::Empty.render("Nenhuma marca encontrada"), "Nenhuma marca encontrada");
        assert_eq!(Panel::Ready(7).render("-"), "7");
    }
}
