use chrono::{DateTime, Utc};
use pixlift_core::models::{GenerationSource, ItemMetadata, LibraryItem, MediaType, NewLibraryItem};
use pixlift_core::AppError;
use sqlx::types::JsonValue;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::records::RecordStore;

/// Row shape of the `library_items` table. Metadata stays raw JSON at this
/// level and is parsed into [`ItemMetadata`] on the way out, so a malformed
/// metadata document never fails a whole page load.
#[derive(Debug, sqlx::FromRow)]
struct LibraryItemRow {
    id: Uuid,
    owner_id: Uuid,
    storage_key: String,
    media_type: MediaType,
    content_type: String,
    metadata: JsonValue,
    file_size_bytes: i64,
    source: GenerationSource,
    created_at: DateTime<Utc>,
}

impl LibraryItemRow {
    fn into_item(self) -> LibraryItem {
        LibraryItem {
            id: self.id,
            owner_id: self.owner_id,
            storage_key: self.storage_key,
            media_type: self.media_type,
            content_type: self.content_type,
            metadata: ItemMetadata::from_json_value(&self.metadata),
            file_size_bytes: self.file_size_bytes,
            source: self.source,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecordStore for PgRecordStore {
    #[tracing::instrument(skip(self, item), fields(db.table = "library_items", db.operation = "insert"))]
    async fn insert(&self, item: NewLibraryItem) -> Result<LibraryItem, AppError> {
        let row = sqlx::query_as::<Postgres, LibraryItemRow>(
            r#"
            INSERT INTO library_items (
                id, owner_id, storage_key, media_type, content_type,
                metadata, file_size_bytes, source
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(item.owner_id)
        .bind(&item.storage_key)
        .bind(item.media_type)
        .bind(&item.content_type)
        .bind(item.metadata.to_json_value())
        .bind(item.file_size_bytes)
        .bind(item.source)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_item())
    }

    #[tracing::instrument(skip(self), fields(db.table = "library_items", db.operation = "select_page"))]
    async fn page(
        &self,
        owner_id: Uuid,
        media_type: Option<MediaType>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<LibraryItem>, i64), AppError> {
        let (rows, total) = match media_type {
            Some(media_type) => {
                let rows = sqlx::query_as::<Postgres, LibraryItemRow>(
                    r#"
                    SELECT * FROM library_items
                    WHERE owner_id = $1 AND media_type = $2
                    ORDER BY created_at DESC
                    LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(owner_id)
                .bind(media_type)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<Postgres, i64>(
                    "SELECT COUNT(*) FROM library_items WHERE owner_id = $1 AND media_type = $2",
                )
                .bind(owner_id)
                .bind(media_type)
                .fetch_one(&self.pool)
                .await?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<Postgres, LibraryItemRow>(
                    r#"
                    SELECT * FROM library_items
                    WHERE owner_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(owner_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<Postgres, i64>(
                    "SELECT COUNT(*) FROM library_items WHERE owner_id = $1",
                )
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?;

                (rows, total)
            }
        };

        let items = rows.into_iter().map(LibraryItemRow::into_item).collect();
        Ok((items, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "library_items", db.operation = "select_one"))]
    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<LibraryItem>, AppError> {
        let row = sqlx::query_as::<Postgres, LibraryItemRow>(
            "SELECT * FROM library_items WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LibraryItemRow::into_item))
    }

    #[tracing::instrument(skip(self, ids), fields(db.table = "library_items", db.operation = "select_many", id_count = ids.len()))]
    async fn get_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<Vec<LibraryItem>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<Postgres, LibraryItemRow>(
            "SELECT * FROM library_items WHERE owner_id = $1 AND id = ANY($2)",
        )
        .bind(owner_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LibraryItemRow::into_item).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "library_items", db.operation = "delete"))]
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM library_items WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self, ids), fields(db.table = "library_items", db.operation = "delete_many", id_count = ids.len()))]
    async fn delete_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM library_items WHERE owner_id = $1 AND id = ANY($2)")
            .bind(owner_id)
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self), fields(db.table = "library_items", db.operation = "select_usage"))]
    async fn usage_rows(&self, owner_id: Uuid) -> Result<Vec<(MediaType, i64)>, AppError> {
        let rows = sqlx::query_as::<Postgres, (MediaType, i64)>(
            "SELECT media_type, file_size_bytes FROM library_items WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
