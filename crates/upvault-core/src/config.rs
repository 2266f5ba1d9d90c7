//! Configuration module
//!
//! Server configuration is read from the environment (with `.env` support) and
//! validated once at startup so misconfiguration fails fast.

use std::env;
use std::time::Duration;

use crate::constants::{DEFAULT_PRESIGNED_URL_TTL_SECS, MAX_PRESIGNED_URL_TTL_SECS};
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 4000;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const LOCAL_STORAGE_MAX_OBJECT_BYTES: usize = 50 * 1024 * 1024;
const MIN_SIGNING_SECRET_LEN: usize = 32;

/// Process-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
}

/// Object store settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, R2, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    pub local_storage_signing_secret: Option<String>,
    pub local_storage_max_object_bytes: usize,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub presigned_url_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        };

        let backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::S3,
        };

        let storage = StorageConfig {
            backend,
            s3_bucket: env::var("S3_BUCKET_NAME")
                .or_else(|_| env::var("S3_BUCKET"))
                .ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./data/objects".to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),
            local_storage_signing_secret: env::var("LOCAL_STORAGE_SIGNING_SECRET").ok(),
            local_storage_max_object_bytes: env::var("LOCAL_STORAGE_MAX_OBJECT_BYTES")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(LOCAL_STORAGE_MAX_OBJECT_BYTES),
        };

        let presigned_url_ttl_secs = env::var("PRESIGNED_URL_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_PRESIGNED_URL_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("PRESIGNED_URL_TTL_SECS must be a valid number"))?;

        Ok(Config {
            base,
            storage,
            presigned_url_ttl_secs,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.presigned_url_ttl_secs == 0 || self.presigned_url_ttl_secs > MAX_PRESIGNED_URL_TTL_SECS
        {
            return Err(anyhow::anyhow!(
                "PRESIGNED_URL_TTL_SECS must be between 1 and {}",
                MAX_PRESIGNED_URL_TTL_SECS
            ));
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.s3_bucket.as_deref().unwrap_or("").is_empty() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET_NAME must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                let secret_len = self
                    .storage
                    .local_storage_signing_secret
                    .as_ref()
                    .map(|s| s.len())
                    .unwrap_or(0);
                if secret_len < MIN_SIGNING_SECRET_LEN {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_SIGNING_SECRET must be at least {} characters long",
                        MIN_SIGNING_SECRET_LEN
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.storage.s3_bucket.as_deref()
    }

    /// S3_REGION, falling back to AWS_REGION
    pub fn s3_region(&self) -> Option<&str> {
        self.storage
            .s3_region
            .as_deref()
            .or(self.storage.aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.storage.s3_endpoint.as_deref()
    }

    pub fn presigned_url_ttl(&self) -> Duration {
        Duration::from_secs(self.presigned_url_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> Config {
        Config {
            base: BaseConfig {
                server_port: 4000,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                http_concurrency_limit: 100,
            },
            storage: StorageConfig {
                backend: StorageBackend::Local,
                s3_bucket: None,
                s3_region: None,
                s3_endpoint: None,
                aws_region: None,
                local_storage_path: "/tmp/upvault".to_string(),
                local_storage_base_url: "http://localhost:4000".to_string(),
                local_storage_signing_secret: Some("x".repeat(32)),
                local_storage_max_object_bytes: 1024,
            },
            presigned_url_ttl_secs: DEFAULT_PRESIGNED_URL_TTL_SECS,
        }
    }

    #[test]
    fn local_config_is_valid() {
        assert!(local_config().validate().is_ok());
    }

    #[test]
    fn short_signing_secret_is_rejected() {
        let mut config = local_config();
        config.storage.local_storage_signing_secret = Some("short".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn ttl_must_be_bounded() {
        let mut config = local_config();
        config.presigned_url_ttl_secs = 0;
        assert!(config.validate().is_err());
        config.presigned_url_ttl_secs = MAX_PRESIGNED_URL_TTL_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn s3_requires_bucket_and_region() {
        let mut config = local_config();
        config.storage.backend = StorageBackend::S3;
        assert!(config.validate().is_err());
        config.storage.s3_bucket = Some("uploads".to_string());
        assert!(config.validate().is_err());
        config.storage.aws_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.s3_region(), Some("eu-west-1"));
    }

    #[test]
    fn wildcard_cors_rejected_in_production() {
        let mut config = local_config();
        config.base.environment = "Production".to_string();
        assert!(config.is_production());
        assert!(config.validate().is_err());
        config.base.cors_origins = vec!["https://app.example.com".to_string()];
        assert!(config.validate().is_ok());
    }
}
