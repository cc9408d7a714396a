//! Dashboard overview command

use crate::error::Result;
use crate::filters::DashboardFilters;
use crate::state::AppState;
use crate::views::Dashboard;
use tracing::warn;

/// Load every dashboard panel concurrently and render the page.
/// Panel failures are rendered in place; only a fully failed page is an error.
pub async fn show_dashboard(
    state: &AppState,
    filters: &DashboardFilters,
    events_limit: u32,
) -> Result<String> {
    let dashboard = Dashboard::new(events_limit);
    dashboard.load(state, filters).await;

    let metrics = dashboard.metrics.current();
    let events = dashboard.events.current();
    if metrics.is_error() && events.is_error() {
        warn!("Dashboard could not load any panel");
        metrics.into_result()?;
    }

    Ok(dashboard.render())
}
