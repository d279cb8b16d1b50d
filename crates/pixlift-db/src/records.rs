use async_trait::async_trait;
use pixlift_core::models::{LibraryItem, MediaType, NewLibraryItem};
use pixlift_core::AppError;
use uuid::Uuid;

/// Trait for library item record operations
/// This abstracts the persistence backend (PostgreSQL, in-memory)
///
/// Every read and write is scoped to an owner id; implementations must never
/// return or touch rows that belong to a different owner.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record and return the stored row with its generated id
    /// and creation timestamp.
    async fn insert(&self, item: NewLibraryItem) -> Result<LibraryItem, AppError>;

    /// One page of the owner's records, newest first, plus the total count
    /// of rows matching the same filter.
    async fn page(
        &self,
        owner_id: Uuid,
        media_type: Option<MediaType>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<LibraryItem>, i64), AppError>;

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<LibraryItem>, AppError>;

    /// Fetch the subset of `ids` that the owner actually holds. Unknown and
    /// foreign ids are simply absent from the result, not errors.
    async fn get_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<Vec<LibraryItem>, AppError>;

    /// Delete one owned record. Returns false when no row matched.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;

    /// Delete every owned record in `ids`, returning how many rows were
    /// removed.
    async fn delete_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError>;

    /// Per-item `(media_type, file_size_bytes)` pairs for the owner, used by
    /// usage aggregation.
    async fn usage_rows(&self, owner_id: Uuid) -> Result<Vec<(MediaType, i64)>, AppError>;
}
