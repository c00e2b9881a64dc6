//! OpenAPI documentation.
//! API version is in `docbox_core::constants::API_VERSION`.
//! Paths in handler annotations use placeholder /api/v0; they are transformed at runtime to the actual version.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use docbox_core::constants::API_VERSION;
use docbox_core::models;

/// Placeholder version used in handler path annotations (utoipa requires compile-time literals).
/// Replaced at runtime in the served OpenAPI spec with API_VERSION.
const OPENAPI_PATH_PLACEHOLDER: &str = "/api/v0";

/// Transforms path keys in the OpenAPI spec from placeholder to actual API version.
fn transform_openapi_paths(spec: &mut utoipa::openapi::OpenApi, version: &str) {
    let replacement = format!("/api/{}", version);
    if OPENAPI_PATH_PLACEHOLDER == replacement {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        let new_key = key.replacen(OPENAPI_PATH_PLACEHOLDER, &replacement, 1);
        spec.paths.paths.insert(new_key, item);
    }
}

/// Returns the OpenAPI spec with path placeholders replaced by the current API version.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_openapi_paths(&mut spec, API_VERSION);
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DocBox API",
        version = "0.1.0",
        description = "Document storage API (v0) for consular case files. Uploads land in an S3-compatible object store under typed keys; retrieval returns short-lived presigned download URLs. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::document_upload::upload_document,
        handlers::document_download::download_document,
    ),
    components(
        schemas(
            models::DocumentUploadResponse,
            models::DownloadLinkResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "documents", description = "Document upload and presigned download operations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_contains_document_paths() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/v0/documents"));
        assert!(spec.paths.paths.contains_key("/api/v0/documents/{key}"));
    }
}
