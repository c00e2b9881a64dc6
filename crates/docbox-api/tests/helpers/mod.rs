//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p docbox-api --test documents_test`.
//! Storage is an in-memory double; no MinIO or network access needed.

pub mod storage;

use axum_test::TestServer;
use docbox_api::constants;
use docbox_api::setup::routes;
use docbox_api::state::AppState;
use docbox_core::{BaseConfig, Config, StorageConfig};
use std::sync::Arc;
use storage::MockStorage;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus a handle on the storage double.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MockStorage>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn create_test_config() -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            http_rate_limit_per_minute: 10_000,
            upload_rate_limit_per_hour: 10_000,
            max_upload_size_bytes: 50 * 1024 * 1024,
            trusted_proxy_count: 1,
        },
        storage: StorageConfig {
            endpoint_host: "localhost".to_string(),
            endpoint_port: 9000,
            use_ssl: false,
            access_key: "test-access-key".to_string(),
            secret_key: "test-secret-key".to_string(),
            bucket: "documents".to_string(),
            region: "us-east-1".to_string(),
        },
    }
}

/// Setup test app with in-memory storage and permissive rate limits.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with_config(create_test_config())
}

pub fn setup_test_app_with_config(config: Config) -> TestApp {
    let storage = Arc::new(MockStorage::new());
    let state = Arc::new(AppState::new(storage.clone(), config.clone()));

    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, storage }
}
