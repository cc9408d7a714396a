//! Test utilities and helpers for unit tests

use super::mocks::MockBackend;
use crate::config::AppConfig;
use crate::state::AppState;
use std::sync::Arc;

/// Application state around a mock backend with default staleness windows
pub fn state_with(backend: MockBackend) -> AppState {
    AppState::with_backend(AppConfig::default(), Arc::new(backend))
}
