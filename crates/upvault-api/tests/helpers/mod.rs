//! Test helpers: build AppState and router over a temporary local store.
//!
//! Run from workspace root: `cargo test -p upvault-api`.

use axum_test::TestServer;
use std::sync::Arc;
use tempfile::TempDir;
use upvault_api::constants;
use upvault_api::setup::{routes, storage};
use upvault_api::state::AppState;
use upvault_core::{BaseConfig, Config, StorageBackend, StorageConfig};

pub const TEST_SIGNING_SECRET: &str = "test-signing-secret-0123456789abcdef";
pub const TEST_BASE_URL: &str = "http://localhost:4000";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Whether an object with `key` is present on disk.
    pub fn object_exists(&self, key: &str) -> bool {
        self.temp_dir.path().join(key).exists()
    }
}

pub fn create_test_config(temp_dir: &TempDir) -> Config {
    Config {
        base: BaseConfig {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            http_concurrency_limit: 100,
        },
        storage: StorageConfig {
            backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: temp_dir.path().to_string_lossy().to_string(),
            local_storage_base_url: TEST_BASE_URL.to_string(),
            local_storage_signing_secret: Some(TEST_SIGNING_SECRET.to_string()),
            local_storage_max_object_bytes: 1024 * 1024,
        },
        presigned_url_ttl_secs: 360,
    }
}

/// Setup test app with an isolated local store.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config = create_test_config(&temp_dir);
    config.validate().expect("test config is valid");

    let (storage, local_store) = storage::setup_storage(&config)
        .await
        .expect("setup storage");
    let state = Arc::new(AppState::new(config.clone(), storage, local_store));
    let router = routes::setup_routes(&config, state.clone())
        .await
        .expect("setup routes");

    TestApp {
        server: TestServer::new(router).expect("start test server"),
        state,
        temp_dir,
    }
}

/// Split a presigned local URL into its path and `(expires, signature)` query values.
pub fn split_presigned_url(url: &str) -> (String, String, String) {
    let without_base = url
        .strip_prefix(TEST_BASE_URL)
        .expect("presigned URL uses the configured base");
    let (path, query) = without_base.split_once('?').expect("presigned URL has a query");

    let mut expires = String::new();
    let mut signature = String::new();
    for pair in query.split('&') {
        if let Some(v) = pair.strip_prefix("expires=") {
            expires = v.to_string();
        } else if let Some(v) = pair.strip_prefix("signature=") {
            signature = v.to_string();
        }
    }

    (path.to_string(), expires, signature)
}
