pub mod document_download;
pub mod document_upload;
