//! Route configuration and setup

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::middleware::{rate_limit_middleware, HttpRateLimiter};
use crate::setup::health;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use docbox_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

const GLOBAL_RATE_LIMIT_MESSAGE: &str = "Too many requests. Please slow down.";
const UPLOAD_RATE_LIMIT_MESSAGE: &str = "Too many uploads. Please try again later.";

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let global_limiter = Arc::new(HttpRateLimiter::new(
        config.http_rate_limit_per_minute(),
        60,
        config.trusted_proxy_count(),
        GLOBAL_RATE_LIMIT_MESSAGE,
    ));
    let upload_limiter = Arc::new(HttpRateLimiter::new(
        config.upload_rate_limit_per_hour(),
        3600,
        config.trusted_proxy_count(),
        UPLOAD_RATE_LIMIT_MESSAGE,
    ));
    tracing::info!(
        rate_limit_per_minute = config.http_rate_limit_per_minute(),
        upload_rate_limit_per_hour = config.upload_rate_limit_per_hour(),
        "HTTP rate limiting enabled"
    );

    let api_routes = document_routes(state.clone(), upload_limiter).layer(
        axum::middleware::from_fn_with_state(global_limiter, rate_limit_middleware),
    );

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let app = public_routes(state)
        .merge(api_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::max(config.max_upload_size_bytes()))
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins().iter().map(|o| o.parse()).collect();

        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Probes and machine-readable documentation (no rate limiting).
fn public_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/health",
            get({
                let state = state.clone();
                move || async { health::health_check(state).await }
            }),
        )
        .route("/live", get(health::liveness_check))
        .route(
            "/ready",
            get({
                let state = state.clone();
                move || async { health::readiness_check(state).await }
            }),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Document routes. The upload route carries its own per-hour limiter in
/// addition to the global per-minute one.
fn document_routes(state: Arc<AppState>, upload_limiter: Arc<HttpRateLimiter>) -> Router {
    Router::new()
        .route(
            &format!("{}/documents", API_PREFIX),
            post(handlers::document_upload::upload_document).layer(
                axum::middleware::from_fn_with_state(upload_limiter, rate_limit_middleware),
            ),
        )
        .route(
            &format!("{}/documents/{{*key}}", API_PREFIX),
            get(handlers::document_download::download_document),
        )
        .with_state(state)
}
