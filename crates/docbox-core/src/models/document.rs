use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One stored file. The object store owns the bytes; the application holds
/// only the key as a reference. Keys are immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub key: String,
    pub original_name: String,
    pub size: i64,
    pub mime_type: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentUploadResponse {
    pub message: String,
    pub key: String,
    #[serde(rename = "originalName")]
    pub original_name: String,
    pub size: i64,
    pub mimetype: String,
}

impl From<StoredDocument> for DocumentUploadResponse {
    fn from(doc: StoredDocument) -> Self {
        DocumentUploadResponse {
            message: "File uploaded successfully.".to_string(),
            key: doc.key,
            original_name: doc.original_name,
            size: doc.size,
            mimetype: doc.mime_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadLinkResponse {
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
}
