//! Configuration module
//!
//! Environment-driven configuration for the API server and the object storage
//! backend. Storage credentials are validated at load time: a missing access
//! key, secret key, bucket, or endpoint is a startup error, never an
//! empty-string default.

use std::env;

// Common defaults
const SERVER_PORT: u16 = 4000;
const HTTP_RATE_LIMIT_PER_MINUTE: u32 = 100;
const UPLOAD_RATE_LIMIT_PER_HOUR: u32 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const STORAGE_PORT: u16 = 9000;
const STORAGE_REGION: &str = "us-east-1";

/// Server-level configuration.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_rate_limit_per_minute: u32,
    pub upload_rate_limit_per_hour: u32,
    pub max_upload_size_bytes: usize,
    pub trusted_proxy_count: usize,
}

/// Object store connection settings (MinIO or any S3-compatible provider).
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub endpoint_host: String,
    pub endpoint_port: u16,
    pub use_ssl: bool,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
}

impl StorageConfig {
    /// Full endpoint URL, e.g. `http://localhost:9000`.
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.endpoint_host, self.endpoint_port)
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            http_rate_limit_per_minute: env::var("HTTP_RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| HTTP_RATE_LIMIT_PER_MINUTE.to_string())
                .parse()
                .unwrap_or(HTTP_RATE_LIMIT_PER_MINUTE),
            upload_rate_limit_per_hour: env::var("UPLOAD_RATE_LIMIT_PER_HOUR")
                .unwrap_or_else(|_| UPLOAD_RATE_LIMIT_PER_HOUR.to_string())
                .parse()
                .unwrap_or(UPLOAD_RATE_LIMIT_PER_HOUR),
            max_upload_size_bytes: env::var("MAX_UPLOAD_SIZE_MB")
                .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_UPLOAD_SIZE_MB)
                * 1024
                * 1024,
            trusted_proxy_count: env::var("TRUSTED_PROXY_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
        };

        let storage = StorageConfig {
            endpoint_host: require_env("STORAGE_ENDPOINT")?,
            endpoint_port: env::var("STORAGE_PORT")
                .unwrap_or_else(|_| STORAGE_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("STORAGE_PORT must be a valid number"))?,
            use_ssl: env::var("STORAGE_USE_SSL")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
            access_key: require_env("STORAGE_ACCESS_KEY")?,
            secret_key: require_env("STORAGE_SECRET_KEY")?,
            bucket: require_env("STORAGE_BUCKET")?,
            region: env::var("STORAGE_REGION").unwrap_or_else(|_| STORAGE_REGION.to_string()),
        };

        Ok(Config { base, storage })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn http_rate_limit_per_minute(&self) -> u32 {
        self.base.http_rate_limit_per_minute
    }

    pub fn upload_rate_limit_per_hour(&self) -> u32 {
        self.base.upload_rate_limit_per_hour
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.base.max_upload_size_bytes
    }

    pub fn trusted_proxy_count(&self) -> usize {
        self.base.trusted_proxy_count
    }

    pub fn storage_bucket(&self) -> &str {
        &self.storage.bucket
    }
}

/// Read a required variable; a missing or empty value is a hard error.
fn require_env(name: &str) -> Result<String, anyhow::Error> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow::anyhow!("{} must be set", name)),
    }
}
