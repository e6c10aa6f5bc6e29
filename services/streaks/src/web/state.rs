//! services/streaks/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::service::StreakService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StreakService>,
    pub config: Arc<Config>,
}
