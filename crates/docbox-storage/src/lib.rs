//! DocBox Storage Library
//!
//! This crate provides the object storage abstraction and the S3/MinIO
//! implementation used by the DocBox API.
//!
//! # Storage key format
//!
//! Keys are built centrally in the [keys] module as
//! `{documentType}/{relatedRecordId}/{uuid}{extension}`, with the
//! related-record segment omitted when absent. Segments are validated before
//! composition; keys never contain `..`, a path separator inside a segment,
//! or a leading `/`. The UUID component makes every key globally unique, so
//! concurrent uploads with identical inputs cannot collide.

pub mod keys;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use keys::build_object_key;
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
