use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use pixlift_core::constants::{
    DEFAULT_PAGE_SIZE, MAX_BATCH_SIZE, MAX_PAGE_SIZE, SIGNED_URL_TTL, TOTAL_STORAGE_BYTES,
};
use pixlift_core::models::{
    GenerationSource, ItemMetadata, LibraryItemWithUrl, LibraryPage, LibraryUsage, MediaType,
    NewLibraryItem, SavedItem,
};
use pixlift_core::AppError;
use pixlift_storage::{generate_storage_key, Storage};
use uuid::Uuid;

use crate::records::RecordStore;

/// Coordinates blob storage and record persistence for user media libraries.
///
/// Saves upload the blob before inserting the record; when the insert fails
/// the blob is deleted again so storage does not accumulate orphans. Deletes
/// go blob first too, but there a blob failure is tolerated and only logged;
/// the record is removed either way.
#[derive(Clone)]
pub struct Library {
    records: Arc<dyn RecordStore>,
    storage: Arc<dyn Storage>,
    signed_url_ttl: Duration,
    quota_bytes: i64,
}

impl Library {
    pub fn new(records: Arc<dyn RecordStore>, storage: Arc<dyn Storage>) -> Self {
        Self::with_limits(records, storage, SIGNED_URL_TTL, TOTAL_STORAGE_BYTES)
    }

    pub fn with_limits(
        records: Arc<dyn RecordStore>,
        storage: Arc<dyn Storage>,
        signed_url_ttl: Duration,
        quota_bytes: i64,
    ) -> Self {
        Self {
            records,
            storage,
            signed_url_ttl,
            quota_bytes,
        }
    }

    /// Store one generated artifact for a user.
    ///
    /// `content_base64` may be a raw base64 payload or a full data URL; the
    /// data URL header is stripped before decoding. The blob is uploaded
    /// first, then the record is inserted. When the insert fails the blob is
    /// deleted again in a single compensation attempt that is never retried.
    #[tracing::instrument(skip(self, content_base64, metadata))]
    pub async fn save(
        &self,
        owner_id: Uuid,
        source: GenerationSource,
        content_base64: &str,
        content_type: &str,
        metadata: ItemMetadata,
    ) -> Result<SavedItem, AppError> {
        if content_type.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "content type is required".to_string(),
            ));
        }
        let bytes = decode_content(content_base64)?;
        let file_size_bytes = bytes.len() as i64;
        let media_type = MediaType::from_content_type(content_type);
        let storage_key = generate_storage_key(owner_id, content_type);

        self.storage.put(&storage_key, bytes, content_type).await?;

        let record = NewLibraryItem {
            owner_id,
            storage_key: storage_key.clone(),
            media_type,
            content_type: content_type.to_string(),
            metadata,
            file_size_bytes,
            source,
        };

        match self.records.insert(record).await {
            Ok(item) => {
                tracing::info!(
                    item_id = %item.id,
                    storage_key = %item.storage_key,
                    size_bytes = file_size_bytes,
                    "Library item saved"
                );
                Ok(SavedItem {
                    id: item.id,
                    storage_key: item.storage_key,
                })
            }
            Err(error) => {
                if let Err(cleanup_error) = self.storage.delete(&storage_key).await {
                    tracing::warn!(
                        storage_key = %storage_key,
                        %cleanup_error,
                        reconcile = true,
                        "Orphan blob cleanup failed after record insert error"
                    );
                }
                Err(AppError::RecordInsertFailed(error.detailed_message()))
            }
        }
    }

    /// One page of the owner's library, newest first.
    ///
    /// Each item carries a freshly signed URL; when signing fails for one
    /// item that item is still returned with `url: None` so a single broken
    /// blob cannot take down the whole page.
    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        owner_id: Uuid,
        media_type: Option<MediaType>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<LibraryPage, AppError> {
        let limit = match limit {
            Some(l) if l > 0 => l.min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        let offset = offset.unwrap_or(0).max(0);

        let (items, total) = self
            .records
            .page(owner_id, media_type, limit, offset)
            .await?;

        let mut with_urls = Vec::with_capacity(items.len());
        for item in items {
            let url = self.sign_item_url(item.id, &item.storage_key).await;
            with_urls.push(LibraryItemWithUrl { item, url });
        }

        Ok(LibraryPage {
            items: with_urls,
            total,
            has_more: offset + limit < total,
        })
    }

    /// Fetch a single owned item with a signed URL. Absent and foreign items
    /// yield the same `NotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<LibraryItemWithUrl, AppError> {
        let item = self
            .records
            .get(owner_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library item {} not found", id)))?;

        let url = self.sign_item_url(item.id, &item.storage_key).await;
        Ok(LibraryItemWithUrl { item, url })
    }

    /// Remove one item, blob first.
    ///
    /// A blob delete failure does not abort: the record is removed anyway
    /// and the key is logged with a reconciliation marker. A record delete
    /// failure after that surfaces as [`AppError::DeleteFailed`].
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let item = self
            .records
            .get(owner_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library item {} not found", id)))?;

        if let Err(error) = self.storage.delete(&item.storage_key).await {
            tracing::warn!(
                item_id = %id,
                storage_key = %item.storage_key,
                %error,
                reconcile = true,
                "Blob delete failed; removing record anyway"
            );
        }

        self.records
            .delete(owner_id, id)
            .await
            .map_err(|error| AppError::DeleteFailed(error.detailed_message()))?;

        tracing::info!(item_id = %id, "Library item deleted");
        Ok(())
    }

    /// Remove up to [`MAX_BATCH_SIZE`] items in one call.
    ///
    /// Ids the owner does not hold are skipped silently; the call fails with
    /// `NotFound` only when none of the ids matched. Blob deletes are best
    /// effort per key. Returns how many records were removed.
    #[tracing::instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn batch_delete(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Err(AppError::InvalidArgument(
                "ids must not be empty".to_string(),
            ));
        }
        if ids.len() > MAX_BATCH_SIZE {
            return Err(AppError::InvalidArgument(format!(
                "Cannot delete more than {} items at once",
                MAX_BATCH_SIZE
            )));
        }

        let owned = self.records.get_many(owner_id, ids).await?;
        if owned.is_empty() {
            return Err(AppError::NotFound(
                "No matching library items".to_string(),
            ));
        }

        let keys: Vec<String> = owned.iter().map(|item| item.storage_key.clone()).collect();
        for (key, error) in self.storage.delete_many(&keys).await {
            tracing::warn!(
                storage_key = %key,
                %error,
                reconcile = true,
                "Blob delete failed during batch delete"
            );
        }

        let owned_ids: Vec<Uuid> = owned.iter().map(|item| item.id).collect();
        let deleted = self
            .records
            .delete_many(owner_id, &owned_ids)
            .await
            .map_err(|error| AppError::DeleteFailed(error.detailed_message()))?;

        tracing::info!(deleted, skipped = ids.len() - owned.len(), "Batch delete finished");
        Ok(deleted)
    }

    /// Aggregate the owner's storage consumption against the fixed quota.
    /// Recomputed on every call from record sizes alone; blobs are never
    /// touched.
    #[tracing::instrument(skip(self))]
    pub async fn usage(&self, owner_id: Uuid) -> Result<LibraryUsage, AppError> {
        let rows = self.records.usage_rows(owner_id).await?;
        Ok(LibraryUsage::compute(&rows, self.quota_bytes))
    }

    async fn sign_item_url(&self, item_id: Uuid, storage_key: &str) -> Option<String> {
        match self.storage.signed_url(storage_key, self.signed_url_ttl).await {
            Ok(url) => Some(url),
            Err(error) => {
                tracing::warn!(
                    item_id = %item_id,
                    storage_key = %storage_key,
                    %error,
                    "Signed URL generation failed; listing item without URL"
                );
                None
            }
        }
    }
}

/// Decode save content, accepting both raw base64 and full data URLs.
fn decode_content(content: &str) -> Result<Vec<u8>, AppError> {
    let trimmed = content.trim();
    let encoded = match trimmed.split_once(',') {
        Some((header, rest)) if header.starts_with("data:") => rest,
        _ => trimmed,
    };
    if encoded.is_empty() {
        return Err(AppError::InvalidArgument(
            "content must not be empty".to_string(),
        ));
    }

    let bytes = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| AppError::InvalidArgument(format!("invalid base64 content: {}", e)))?;
    if bytes.is_empty() {
        return Err(AppError::InvalidArgument(
            "content must not be empty".to_string(),
        ));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRecordStore;
    use async_trait::async_trait;
    use pixlift_core::models::LibraryItem;
    use pixlift_core::StorageBackend;
    use pixlift_storage::{StorageError, StorageResult};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    // 1x1 transparent PNG
    const PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

    /// Blob store double with per-operation failure switches.
    #[derive(Default)]
    struct TestStorage {
        blobs: RwLock<HashMap<String, Vec<u8>>>,
        puts: AtomicUsize,
        fail_put: AtomicBool,
        fail_delete: AtomicBool,
        fail_sign: AtomicBool,
    }

    impl TestStorage {
        async fn blob_count(&self) -> usize {
            self.blobs.read().await.len()
        }
    }

    #[async_trait]
    impl Storage for TestStorage {
        async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<()> {
            if self.fail_put.load(Ordering::SeqCst) {
                return Err(StorageError::UploadFailed("injected put failure".to_string()));
            }
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.blobs.write().await.insert(key.to_string(), data);
            Ok(())
        }

        async fn delete(&self, key: &str) -> StorageResult<()> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(StorageError::DeleteFailed(
                    "injected delete failure".to_string(),
                ));
            }
            self.blobs.write().await.remove(key);
            Ok(())
        }

        async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
            if self.fail_sign.load(Ordering::SeqCst) {
                return Err(StorageError::BackendError(
                    "injected signing failure".to_string(),
                ));
            }
            if !self.blobs.read().await.contains_key(key) {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Ok(format!(
                "https://signed.test/{}?ttl={}",
                key,
                expires_in.as_secs()
            ))
        }

        async fn exists(&self, key: &str) -> StorageResult<bool> {
            Ok(self.blobs.read().await.contains_key(key))
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    /// Record store double whose every method fails, used to prove argument
    /// validation happens before any store access.
    struct FailingRecords;

    #[async_trait]
    impl RecordStore for FailingRecords {
        async fn insert(&self, _item: NewLibraryItem) -> Result<LibraryItem, AppError> {
            Err(AppError::Internal("injected insert failure".to_string()))
        }

        async fn page(
            &self,
            _owner_id: Uuid,
            _media_type: Option<MediaType>,
            _limit: i64,
            _offset: i64,
        ) -> Result<(Vec<LibraryItem>, i64), AppError> {
            Err(AppError::Internal("injected page failure".to_string()))
        }

        async fn get(&self, _owner_id: Uuid, _id: Uuid) -> Result<Option<LibraryItem>, AppError> {
            Err(AppError::Internal("injected get failure".to_string()))
        }

        async fn get_many(
            &self,
            _owner_id: Uuid,
            _ids: &[Uuid],
        ) -> Result<Vec<LibraryItem>, AppError> {
            Err(AppError::Internal("injected get_many failure".to_string()))
        }

        async fn delete(&self, _owner_id: Uuid, _id: Uuid) -> Result<bool, AppError> {
            Err(AppError::Internal("injected delete failure".to_string()))
        }

        async fn delete_many(&self, _owner_id: Uuid, _ids: &[Uuid]) -> Result<u64, AppError> {
            Err(AppError::Internal(
                "injected delete_many failure".to_string(),
            ))
        }

        async fn usage_rows(&self, _owner_id: Uuid) -> Result<Vec<(MediaType, i64)>, AppError> {
            Err(AppError::Internal("injected usage failure".to_string()))
        }
    }

    /// Record store that behaves normally until its delete switch is thrown.
    struct FlakyRecords {
        inner: MemoryRecordStore,
        fail_delete: AtomicBool,
    }

    impl FlakyRecords {
        fn new() -> Self {
            Self {
                inner: MemoryRecordStore::new(),
                fail_delete: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl RecordStore for FlakyRecords {
        async fn insert(&self, item: NewLibraryItem) -> Result<LibraryItem, AppError> {
            self.inner.insert(item).await
        }

        async fn page(
            &self,
            owner_id: Uuid,
            media_type: Option<MediaType>,
            limit: i64,
            offset: i64,
        ) -> Result<(Vec<LibraryItem>, i64), AppError> {
            self.inner.page(owner_id, media_type, limit, offset).await
        }

        async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<LibraryItem>, AppError> {
            self.inner.get(owner_id, id).await
        }

        async fn get_many(
            &self,
            owner_id: Uuid,
            ids: &[Uuid],
        ) -> Result<Vec<LibraryItem>, AppError> {
            self.inner.get_many(owner_id, ids).await
        }

        async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(AppError::Internal("injected delete failure".to_string()));
            }
            self.inner.delete(owner_id, id).await
        }

        async fn delete_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(AppError::Internal("injected delete failure".to_string()));
            }
            self.inner.delete_many(owner_id, ids).await
        }

        async fn usage_rows(&self, owner_id: Uuid) -> Result<Vec<(MediaType, i64)>, AppError> {
            self.inner.usage_rows(owner_id).await
        }
    }

    fn library() -> (Library, Arc<MemoryRecordStore>, Arc<TestStorage>) {
        let records = Arc::new(MemoryRecordStore::new());
        let storage = Arc::new(TestStorage::default());
        let library = Library::new(records.clone(), storage.clone());
        (library, records, storage)
    }

    async fn save_png(library: &Library, owner: Uuid) -> SavedItem {
        library
            .save(
                owner,
                GenerationSource::Generate,
                PNG_BASE64,
                "image/png",
                ItemMetadata::None,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn save_uploads_blob_then_inserts_record() {
        let (library, records, storage) = library();
        let owner = Uuid::new_v4();

        let saved = library
            .save(
                owner,
                GenerationSource::ProductEnhance,
                PNG_BASE64,
                "image/png",
                ItemMetadata::ProductEnhance {
                    prompt: Some("studio shot".to_string()),
                    model: Some("gemini-2.5-flash-image".to_string()),
                    style: Some("studio".to_string()),
                    platform: None,
                    aspect_ratio: Some("1:1".to_string()),
                },
            )
            .await
            .unwrap();

        assert!(saved.storage_key.starts_with(&format!("{}/", owner)));
        assert!(saved.storage_key.ends_with(".png"));
        assert!(storage.exists(&saved.storage_key).await.unwrap());

        let expected_size = general_purpose::STANDARD.decode(PNG_BASE64).unwrap().len() as i64;
        let item = records.get(owner, saved.id).await.unwrap().unwrap();
        assert_eq!(item.storage_key, saved.storage_key);
        assert_eq!(item.media_type, MediaType::Image);
        assert_eq!(item.content_type, "image/png");
        assert_eq!(item.file_size_bytes, expected_size);
        assert_eq!(item.source, GenerationSource::ProductEnhance);
        assert!(matches!(item.metadata, ItemMetadata::ProductEnhance { .. }));
    }

    #[tokio::test]
    async fn save_strips_data_url_header() {
        let (library, records, _storage) = library();
        let owner = Uuid::new_v4();

        let data_url = format!("data:image/png;base64,{}", PNG_BASE64);
        let saved = library
            .save(
                owner,
                GenerationSource::Generate,
                &data_url,
                "image/png",
                ItemMetadata::None,
            )
            .await
            .unwrap();

        let expected_size = general_purpose::STANDARD.decode(PNG_BASE64).unwrap().len() as i64;
        let item = records.get(owner, saved.id).await.unwrap().unwrap();
        assert_eq!(item.file_size_bytes, expected_size);
    }

    #[tokio::test]
    async fn save_rejects_garbage_without_touching_storage() {
        let (library, _records, storage) = library();
        let owner = Uuid::new_v4();

        for content in ["", "   ", "this is %% not base64", "data:image/png;base64,"] {
            let err = library
                .save(
                    owner,
                    GenerationSource::Generate,
                    content,
                    "image/png",
                    ItemMetadata::None,
                )
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)), "{content:?}");
        }

        let err = library
            .save(owner, GenerationSource::Generate, PNG_BASE64, "", ItemMetadata::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_upload_leaves_no_record() {
        let (library, records, storage) = library();
        let owner = Uuid::new_v4();
        storage.fail_put.store(true, Ordering::SeqCst);

        let err = library
            .save(
                owner,
                GenerationSource::Generate,
                PNG_BASE64,
                "image/png",
                ItemMetadata::None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BlobWriteFailed(_)));
        let (_, total) = records.page(owner, None, 50, 0).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn failed_insert_cleans_up_uploaded_blob() {
        let storage = Arc::new(TestStorage::default());
        let library = Library::new(Arc::new(FailingRecords), storage.clone());
        let owner = Uuid::new_v4();

        let err = library
            .save(
                owner,
                GenerationSource::Generate,
                PNG_BASE64,
                "image/png",
                ItemMetadata::None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RecordInsertFailed(_)));
        // The blob went up exactly once and was compensated away again.
        assert_eq!(storage.puts.load(Ordering::SeqCst), 1);
        assert_eq!(storage.blob_count().await, 0);
    }

    #[tokio::test]
    async fn failed_compensation_still_reports_insert_error() {
        let storage = Arc::new(TestStorage::default());
        let library = Library::new(Arc::new(FailingRecords), storage.clone());
        let owner = Uuid::new_v4();
        storage.fail_delete.store(true, Ordering::SeqCst);

        let err = library
            .save(
                owner,
                GenerationSource::Generate,
                PNG_BASE64,
                "image/png",
                ItemMetadata::None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RecordInsertFailed(_)));
        // Orphan blob remains; it is logged for reconciliation, not retried.
        assert_eq!(storage.blob_count().await, 1);
    }

    #[tokio::test]
    async fn list_clamps_limit_and_reports_has_more() {
        let (library, _records, _storage) = library();
        let owner = Uuid::new_v4();

        let mut saved_keys = Vec::new();
        for _ in 0..25 {
            saved_keys.push(save_png(&library, owner).await.storage_key);
        }

        let page = library.list(owner, None, None, None).await.unwrap();
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.total, 25);
        assert!(page.has_more);
        assert_eq!(page.items[0].item.storage_key, *saved_keys.last().unwrap());

        let page = library.list(owner, None, Some(100), None).await.unwrap();
        assert_eq!(page.items.len(), 25);
        assert!(!page.has_more);

        let page = library.list(owner, None, Some(0), None).await.unwrap();
        assert_eq!(page.items.len(), 20);

        let page = library.list(owner, None, Some(10), Some(20)).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert!(!page.has_more);
        assert_eq!(page.items[0].item.storage_key, saved_keys[4]);
    }

    #[tokio::test]
    async fn pagination_walk_visits_every_item_once() {
        let (library, _records, _storage) = library();
        let owner = Uuid::new_v4();

        for _ in 0..23 {
            save_png(&library, owner).await;
        }

        let mut seen = Vec::new();
        let mut offset = 0;
        loop {
            let page = library
                .list(owner, None, Some(10), Some(offset))
                .await
                .unwrap();
            for entry in &page.items {
                seen.push(entry.item.id);
            }
            if !page.has_more {
                break;
            }
            offset += 10;
        }

        assert_eq!(seen.len(), 23);
        let unique: std::collections::HashSet<_> = seen.iter().collect();
        assert_eq!(unique.len(), 23);
    }

    #[tokio::test]
    async fn list_survives_per_item_signing_failure() {
        let (library, _records, storage) = library();
        let owner = Uuid::new_v4();

        let broken = save_png(&library, owner).await;
        let intact = save_png(&library, owner).await;
        // Losing one blob must not take URLs away from the others.
        storage.delete(&broken.storage_key).await.unwrap();

        let page = library.list(owner, None, None, None).await.unwrap();
        assert_eq!(page.items.len(), 2);

        let by_id = |id: Uuid| page.items.iter().find(|e| e.item.id == id).unwrap();
        assert!(by_id(broken.id).url.is_none());
        let url = by_id(intact.id).url.as_deref().unwrap();
        assert!(url.contains(&intact.storage_key));
        assert!(url.contains("ttl=3600"));
    }

    #[tokio::test]
    async fn get_scopes_to_owner() {
        let (library, _records, _storage) = library();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let saved = save_png(&library, alice).await;

        let fetched = library.get(alice, saved.id).await.unwrap();
        assert_eq!(fetched.item.id, saved.id);
        assert!(fetched.url.is_some());

        let err = library.get(bob, saved.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_blob_and_record() {
        let (library, records, storage) = library();
        let owner = Uuid::new_v4();

        let saved = save_png(&library, owner).await;
        library.delete(owner, saved.id).await.unwrap();

        assert!(!storage.exists(&saved.storage_key).await.unwrap());
        assert!(records.get(owner, saved.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_tolerates_blob_failure() {
        let (library, records, storage) = library();
        let owner = Uuid::new_v4();

        let saved = save_png(&library, owner).await;
        storage.fail_delete.store(true, Ordering::SeqCst);

        library.delete(owner, saved.id).await.unwrap();

        // Record gone, orphan blob left behind for reconciliation.
        assert!(records.get(owner, saved.id).await.unwrap().is_none());
        assert_eq!(storage.blob_count().await, 1);
    }

    #[tokio::test]
    async fn delete_unknown_item_is_not_found() {
        let (library, _records, _storage) = library();
        let err = library.delete(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn record_delete_failure_surfaces_as_delete_failed() {
        let records = Arc::new(FlakyRecords::new());
        let storage = Arc::new(TestStorage::default());
        let library = Library::new(records.clone(), storage);
        let owner = Uuid::new_v4();

        let saved = save_png(&library, owner).await;
        records.fail_delete.store(true, Ordering::SeqCst);

        let err = library.delete(owner, saved.id).await.unwrap_err();
        assert!(matches!(err, AppError::DeleteFailed(_)));
    }

    #[tokio::test]
    async fn batch_delete_validates_before_touching_either_store() {
        // Every store access would fail loudly; only validation errors may
        // come back.
        let storage = Arc::new(TestStorage::default());
        storage.fail_delete.store(true, Ordering::SeqCst);
        let library = Library::new(Arc::new(FailingRecords), storage.clone());
        let owner = Uuid::new_v4();

        let err = library.batch_delete(owner, &[]).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let too_many: Vec<Uuid> = (0..21).map(|_| Uuid::new_v4()).collect();
        let err = library.batch_delete(owner, &too_many).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn batch_delete_ignores_foreign_ids_and_counts_owned() {
        let (library, records, storage) = library();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let a1 = save_png(&library, alice).await;
        let a2 = save_png(&library, alice).await;
        let a3 = save_png(&library, alice).await;
        let theirs = save_png(&library, bob).await;

        let deleted = library
            .batch_delete(alice, &[a1.id, a2.id, theirs.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(deleted, 2);

        assert!(records.get(alice, a3.id).await.unwrap().is_some());
        assert!(records.get(bob, theirs.id).await.unwrap().is_some());
        assert!(storage.exists(&theirs.storage_key).await.unwrap());
        assert!(!storage.exists(&a1.storage_key).await.unwrap());
        assert!(!storage.exists(&a2.storage_key).await.unwrap());
    }

    #[tokio::test]
    async fn batch_delete_with_zero_owned_is_not_found() {
        let (library, _records, _storage) = library();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let theirs = save_png(&library, bob).await;

        let err = library
            .batch_delete(alice, &[theirs.id, Uuid::new_v4()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn batch_delete_record_failure_is_delete_failed() {
        let records = Arc::new(FlakyRecords::new());
        let storage = Arc::new(TestStorage::default());
        let library = Library::new(records.clone(), storage);
        let owner = Uuid::new_v4();

        let saved = save_png(&library, owner).await;
        records.fail_delete.store(true, Ordering::SeqCst);

        let err = library.batch_delete(owner, &[saved.id]).await.unwrap_err();
        assert!(matches!(err, AppError::DeleteFailed(_)));
    }

    #[tokio::test]
    async fn usage_aggregates_against_quota() {
        let records = Arc::new(MemoryRecordStore::new());
        let storage = Arc::new(TestStorage::default());
        let library = Library::with_limits(
            records.clone(),
            storage,
            Duration::from_secs(3600),
            1_000,
        );
        let owner = Uuid::new_v4();

        for (media_type, content_type, size) in [
            (MediaType::Image, "image/png", 100),
            (MediaType::Image, "image/png", 150),
            (MediaType::Video, "video/mp4", 250),
        ] {
            records
                .insert(NewLibraryItem {
                    owner_id: owner,
                    storage_key: format!("{}/{}.bin", owner, Uuid::new_v4()),
                    media_type,
                    content_type: content_type.to_string(),
                    metadata: ItemMetadata::None,
                    file_size_bytes: size,
                    source: GenerationSource::Generate,
                })
                .await
                .unwrap();
        }

        let usage = library.usage(owner).await.unwrap();
        assert_eq!(usage.used_bytes, 500);
        assert_eq!(usage.total_bytes, 1_000);
        assert_eq!(usage.used_percent, 50.0);
        assert_eq!(usage.item_count, 3);
        assert_eq!(usage.images_count, 2);
        assert_eq!(usage.videos_count, 1);

        let empty = library.usage(Uuid::new_v4()).await.unwrap();
        assert_eq!(empty.used_bytes, 0);
        assert_eq!(empty.used_percent, 0.0);
    }
}
