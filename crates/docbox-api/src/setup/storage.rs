//! Storage setup and initialization

use anyhow::{Context, Result};
use docbox_core::Config;
use docbox_storage::{ObjectStorage, S3Storage};
use std::sync::Arc;

/// Build the S3-compatible object store client from configuration.
///
/// Returned as a trait object so the rest of the application stays decoupled
/// from the concrete backend.
pub fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    tracing::info!(
        endpoint = %config.storage.endpoint_url(),
        bucket = %config.storage.bucket,
        region = %config.storage.region,
        "Initializing object storage"
    );

    let storage = S3Storage::new(&config.storage).context("Failed to initialize object storage")?;

    Ok(Arc::new(storage))
}
