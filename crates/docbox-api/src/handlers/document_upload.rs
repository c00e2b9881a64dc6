use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use docbox_core::models::{DocumentUploadResponse, StoredDocument};
use docbox_core::AppError;
use docbox_storage::build_object_key;
use std::sync::Arc;

/// Parsed multipart upload request: one file plus optional key segments.
struct UploadRequest {
    data: Bytes,
    original_name: String,
    content_type: String,
    document_type: Option<String>,
    related_record_id: Option<String>,
}

/// Extract the upload from multipart form data.
///
/// Exactly one field named `document` must carry the file; `documentType` and
/// `relatedRecordId` are optional text fields. Unknown fields are ignored.
async fn extract_upload(mut multipart: Multipart) -> Result<UploadRequest, AppError> {
    let mut file: Option<(Bytes, String, String)> = None;
    let mut document_type: Option<String> = None;
    let mut related_record_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "document" => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'document'"
                            .to_string(),
                    ));
                }
                let original_name = field
                    .file_name()
                    .map(|s: &str| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let content_type = field
                    .content_type()
                    .map(|s: &str| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;
                file = Some((data, original_name, content_type));
            }
            "documentType" => {
                document_type = Some(field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read documentType: {}", e))
                })?);
            }
            "relatedRecordId" => {
                related_record_id = Some(field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read relatedRecordId: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let (data, original_name, content_type) =
        file.ok_or_else(|| AppError::InvalidInput("No file uploaded.".to_string()))?;

    Ok(UploadRequest {
        data,
        original_name,
        content_type,
        document_type,
        related_record_id,
    })
}

#[utoipa::path(
    post,
    path = "/api/v0/documents",
    tag = "documents",
    responses(
        (status = 201, description = "Document uploaded successfully", body = DocumentUploadResponse),
        (status = 400, description = "No file uploaded or invalid key segments", body = ErrorResponse),
        (status = 429, description = "Upload rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = extract_upload(multipart).await?;

    let key = build_object_key(
        upload.document_type.as_deref(),
        upload.related_record_id.as_deref(),
        &upload.original_name,
    )?;

    let size = upload.data.len() as i64;

    state
        .storage
        .put_object(&key, upload.data, &upload.content_type)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to upload document to storage");
            HttpAppError::from(e)
        })?;

    tracing::info!(
        key = %key,
        original_name = %upload.original_name,
        size_bytes = size,
        "Document stored"
    );

    let document = StoredDocument {
        key,
        original_name: upload.original_name,
        size,
        mime_type: upload.content_type,
    };

    Ok((
        StatusCode::CREATED,
        Json(DocumentUploadResponse::from(document)),
    ))
}
