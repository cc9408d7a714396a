//! Midiaz Dashboard - Event Brand Analytics Client
//!
//! Client for the Midiaz analytics backend: typed REST access, a
//! staleness-aware query cache, dashboard filters and text panels for
//! sports events, brand presence and LLM reports.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod query;
pub mod services;
pub mod state;
pub mod views;

#[cfg(test)]
mod tests;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "midiaz_dashboard=info";

/// Initialize tracing/logging; logs go to stderr so command output stays clean
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
