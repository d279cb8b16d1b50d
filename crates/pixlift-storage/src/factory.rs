#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageError, StorageResult};
use pixlift_core::{Config, StorageBackend};
use std::env;
use std::sync::Arc;

/// Create a blob store backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let region = env::var("AWS_REGION")
                .or_else(|_| env::var("AWS_DEFAULT_REGION"))
                .map_err(|_| {
                    StorageError::ConfigError(
                        "AWS_REGION or AWS_DEFAULT_REGION not configured".to_string(),
                    )
                })?;
            let endpoint = env::var("AWS_ENDPOINT_URL").ok();

            let storage =
                S3Storage::new(config.storage_bucket.clone(), region, endpoint).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_url = env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| format!("http://{}/media", config.bind_addr()));

            let storage = LocalStorage::new(config.local_storage_path.clone(), base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
