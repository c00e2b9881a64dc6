use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use docbox_core::constants::DOWNLOAD_URL_TTL;
use docbox_core::models::DownloadLinkResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/documents/{key}",
    tag = "documents",
    params(
        ("key" = String, Path, description = "Storage key of the document (may contain slashes)")
    ),
    responses(
        (status = 200, description = "Presigned download URL", body = DownloadLinkResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(key = %key, operation = "download_document"))]
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let download_url = state
        .storage
        .presign_download(&key, DOWNLOAD_URL_TTL)
        .await?;

    Ok(Json(DownloadLinkResponse { download_url }))
}
