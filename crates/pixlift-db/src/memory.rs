use chrono::Utc;
use pixlift_core::models::{LibraryItem, MediaType, NewLibraryItem};
use pixlift_core::AppError;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::records::RecordStore;

/// In-memory record store backing tests and database-less demo deployments.
///
/// Rows are kept in insertion order, so "newest first" is a reverse walk of
/// the vector even when two inserts land on the same timestamp.
#[derive(Default)]
pub struct MemoryRecordStore {
    rows: RwLock<Vec<LibraryItem>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, item: NewLibraryItem) -> Result<LibraryItem, AppError> {
        let stored = LibraryItem {
            id: Uuid::new_v4(),
            owner_id: item.owner_id,
            storage_key: item.storage_key,
            media_type: item.media_type,
            content_type: item.content_type,
            metadata: item.metadata,
            file_size_bytes: item.file_size_bytes,
            source: item.source,
            created_at: Utc::now(),
        };

        self.rows.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn page(
        &self,
        owner_id: Uuid,
        media_type: Option<MediaType>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<LibraryItem>, i64), AppError> {
        let rows = self.rows.read().await;
        let matching: Vec<&LibraryItem> = rows
            .iter()
            .rev()
            .filter(|item| item.owner_id == owner_id)
            .filter(|item| media_type.map_or(true, |t| item.media_type == t))
            .collect();

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<LibraryItem>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|item| item.id == id && item.owner_id == owner_id)
            .cloned())
    }

    async fn get_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<Vec<LibraryItem>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|item| item.owner_id == owner_id && ids.contains(&item.id))
            .cloned()
            .collect())
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|item| !(item.id == id && item.owner_id == owner_id));
        Ok(rows.len() < before)
    }

    async fn delete_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|item| !(item.owner_id == owner_id && ids.contains(&item.id)));
        Ok((before - rows.len()) as u64)
    }

    async fn usage_rows(&self, owner_id: Uuid) -> Result<Vec<(MediaType, i64)>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|item| item.owner_id == owner_id)
            .map(|item| (item.media_type, item.file_size_bytes))
            .collect())
    }
}
