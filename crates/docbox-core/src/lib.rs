//! DocBox Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! constants shared by the DocBox document storage service.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
