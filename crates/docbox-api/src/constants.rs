//! API constants.

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Versioned route prefix. Keep in sync with
/// `docbox_core::constants::API_VERSION`; handler path annotations use the
/// same literal because utoipa requires compile-time strings.
pub const API_PREFIX: &str = "/api/v0";
