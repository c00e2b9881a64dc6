//! Shared constants.

use std::time::Duration;

/// Lifetime of presigned download URLs. Fixed; not configurable per request.
pub const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(900);

/// Document type used when the caller supplies none.
pub const DEFAULT_DOCUMENT_TYPE: &str = "general";

/// Current API version, used to build the route prefix.
pub const API_VERSION: &str = "v0";
