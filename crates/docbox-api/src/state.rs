//! Application state.
//!
//! The storage backend is injected as a trait object so handlers never couple
//! to a concrete store and tests can substitute an in-memory implementation.

use docbox_core::Config;
use docbox_storage::ObjectStorage;
use std::sync::Arc;

/// Main application state: dependency-injected collaborators for the handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ObjectStorage>,
    pub config: Config,
}

impl AppState {
    pub fn new(storage: Arc<dyn ObjectStorage>, config: Config) -> Self {
        AppState { storage, config }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
