//! Application setup and initialization
//!
//! Kept out of main.rs so integration tests can assemble the same router.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use crate::telemetry::{init_telemetry, LogFormat};
use anyhow::{Context, Result};
use std::sync::Arc;
use upvault_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    init_telemetry(LogFormat::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment(),
        backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let (storage, local_store) = storage::setup_storage(&config).await?;
    let state = Arc::new(AppState::new(config.clone(), storage, local_store));
    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
