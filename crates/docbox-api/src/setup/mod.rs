//! Application setup and initialization
//!
//! Initialization logic extracted from main.rs for better organization and
//! testability. Telemetry is initialized by the binary, not here, so tests
//! can build routers without touching the global subscriber.

pub mod health;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use docbox_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Storage first: a bad endpoint or missing bucket should abort startup.
    let object_storage = storage::setup_storage(&config)?;

    let state = Arc::new(AppState::new(object_storage, config.clone()));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
