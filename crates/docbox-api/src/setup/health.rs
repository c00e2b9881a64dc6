//! Liveness, readiness, and health probes.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Key that should never exist; a HEAD on it verifies connectivity without
/// creating objects.
const PROBE_KEY: &str = "health-check-non-existent-key";

/// Liveness probe - simple check that the process is running.
/// Always returns 200 if the process can respond.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive"
        })),
    )
}

/// Readiness probe - checks if the service can accept traffic.
/// The object store is the only critical dependency.
pub async fn readiness_check(state: Arc<AppState>) -> impl IntoResponse {
    let mut response = serde_json::json!({
        "status": "ready",
        "storage": "unknown"
    });

    let mut overall_ready = true;

    match tokio::time::timeout(PROBE_TIMEOUT, state.storage.exists(PROBE_KEY)).await {
        Ok(Ok(_)) => {
            response["storage"] = serde_json::json!("ready");
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage readiness check failed");
            response["storage"] = serde_json::json!(format!("not_ready: {}", e));
            overall_ready = false;
        }
        Err(_) => {
            tracing::error!("Storage readiness check timed out");
            response["storage"] = serde_json::json!("timeout");
            overall_ready = false;
        }
    }

    let status_code = if overall_ready {
        StatusCode::OK
    } else {
        response["status"] = serde_json::json!("not_ready");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

/// Aggregate health report. Storage trouble is reported as degraded but does
/// not flip the overall status; already-accepted uploads are not lost by a
/// transient store outage.
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    let mut response = serde_json::json!({
        "status": "healthy",
        "environment": state.config.environment(),
        "storage": "unknown"
    });

    match tokio::time::timeout(PROBE_TIMEOUT, state.storage.exists(PROBE_KEY)).await {
        Ok(Ok(_)) => {
            response["storage"] = serde_json::json!("healthy");
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Storage health check warning");
            response["storage"] = serde_json::json!(format!("degraded: {}", e));
        }
        Err(_) => {
            tracing::warn!("Storage health check timed out");
            response["storage"] = serde_json::json!("timeout");
        }
    }

    (StatusCode::OK, Json(response))
}
