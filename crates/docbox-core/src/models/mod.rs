pub mod document;

pub use document::{DocumentUploadResponse, DownloadLinkResponse, StoredDocument};
