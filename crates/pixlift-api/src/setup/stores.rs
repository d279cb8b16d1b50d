//! Record store and blob storage initialization

use anyhow::{Context, Result};
use pixlift_core::Config;
use pixlift_db::RecordStore;
use pixlift_storage::Storage;
use std::sync::Arc;

pub async fn setup_records(config: &Config) -> Result<Arc<dyn RecordStore>> {
    pixlift_db::create_record_store(config)
        .await
        .context("Failed to initialize record store")
}

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    pixlift_storage::create_storage(config)
        .await
        .context("Failed to initialize storage backend")
}
