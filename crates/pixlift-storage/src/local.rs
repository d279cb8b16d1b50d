use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem blob store implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for blob storage (e.g., "./data/storage")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8080/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys containing path traversal sequences that could escape
    /// the base storage directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let path = self.key_to_path(key)?;

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        // No real signing locally; the expiry parameter keeps the URL shape
        // consistent with the S3 backend so clients behave the same.
        let expires_at = chrono::Utc::now().timestamp() + expires_in.as_secs() as i64;
        Ok(format!(
            "{}/{}?expires={}",
            self.base_url.trim_end_matches('/'),
            key,
            expires_at
        ))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use uuid::Uuid;

    async fn test_storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path(), "http://localhost:8080/media".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_then_exists() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        let key = format!("{}/1700000000000-abc123.png", Uuid::new_v4());
        storage
            .put(&key, b"test data".to_vec(), "image/png")
            .await
            .unwrap();

        assert!(storage.exists(&key).await.unwrap());
        assert!(!storage.exists("missing.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        let result = storage.put("../escape.txt", b"x".to_vec(), "text/plain").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_ok() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        let result = storage.delete("nonexistent/file.png").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_blob() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        let key = format!("{}/1700000000000-xyz789.jpg", Uuid::new_v4());
        storage
            .put(&key, b"jpeg bytes".to_vec(), "image/jpeg")
            .await
            .unwrap();
        assert!(storage.exists(&key).await.unwrap());

        storage.delete(&key).await.unwrap();
        assert!(!storage.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_signed_url_carries_expiry() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        let key = format!("{}/1700000000000-url001.png", Uuid::new_v4());
        storage
            .put(&key, b"pixels".to_vec(), "image/png")
            .await
            .unwrap();

        let url = storage
            .signed_url(&key, Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(url.contains(&key));
        assert!(url.contains("expires="));
    }

    #[tokio::test]
    async fn test_signed_url_for_missing_blob_fails() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        let result = storage
            .signed_url("missing/blob.png", Duration::from_secs(3600))
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_many_reports_per_key_failures() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        let owner = Uuid::new_v4();
        let good = format!("{}/1700000000000-good01.png", owner);
        storage
            .put(&good, b"pixels".to_vec(), "image/png")
            .await
            .unwrap();

        let keys = vec![
            good.clone(),
            "../bad-key".to_string(),
            "never/existed.png".to_string(),
        ];
        let failures = storage.delete_many(&keys).await;

        // The traversal key fails; the existing and missing keys both succeed.
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "../bad-key");
        assert!(!storage.exists(&good).await.unwrap());
    }
}
