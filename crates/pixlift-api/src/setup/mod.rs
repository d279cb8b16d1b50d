//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod services;
pub mod stores;

use crate::state::AppState;
use anyhow::{Context, Result};
use pixlift_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    // Initialize telemetry first
    crate::telemetry::init_telemetry(config.is_production());

    tracing::info!(
        environment = %config.environment,
        records_backend = %config.records_backend,
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    // Setup backends
    let records = stores::setup_records(&config).await?;
    let storage = stores::setup_storage(&config).await?;

    // Initialize the library and provider clients
    let state = services::initialize_services(&config, records, storage)?;

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
