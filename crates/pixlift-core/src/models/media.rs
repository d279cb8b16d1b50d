use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

/// Media type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "media_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Classify a MIME type. Anything under `video/` is a video, everything
    /// else (including unknown types) is treated as an image.
    pub fn from_content_type(content_type: &str) -> MediaType {
        if content_type.to_lowercase().starts_with("video/") {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }
}

/// Which generation feature produced a library item. Informational only,
/// never used for access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "generation_source", rename_all = "kebab-case")
)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationSource {
    ProductEnhance,
    FashionMotion,
    Generate,
    Angles,
}

/// Per-source descriptive metadata (stored in library_items.metadata JSONB).
///
/// Internally tagged by "kind" so each source only carries the fields it
/// actually produces. Used for display and prompt re-use ("remix"), never
/// for access control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemMetadata {
    ProductEnhance {
        prompt: Option<String>,
        model: Option<String>,
        style: Option<String>,
        platform: Option<String>,
        aspect_ratio: Option<String>,
    },
    FashionMotion {
        prompt: Option<String>,
        model: Option<String>,
        aspect_ratio: Option<String>,
        duration_seconds: Option<u32>,
    },
    Generate {
        prompt: Option<String>,
        model: Option<String>,
        style: Option<String>,
        aspect_ratio: Option<String>,
    },
    Angles {
        prompt: Option<String>,
        model: Option<String>,
        rotation: Option<i32>,
        tilt: Option<i32>,
        zoom: Option<i32>,
    },
    None,
}

impl ItemMetadata {
    /// Parse the metadata JSONB column. Rows written by older builds or by
    /// hand may not match any variant; those degrade to `None` instead of
    /// failing the whole page load.
    pub fn from_json_value(v: &JsonValue) -> ItemMetadata {
        serde_json::from_value(v.clone()).unwrap_or(ItemMetadata::None)
    }

    pub fn to_json_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

impl Default for ItemMetadata {
    fn default() -> Self {
        ItemMetadata::None
    }
}

/// A persisted record of one generated artifact.
///
/// Immutable once created except for deletion; `created_at` is the sole
/// sort key for listing (newest first).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryItem {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub storage_key: String,
    pub media_type: MediaType,
    pub content_type: String,
    pub metadata: ItemMetadata,
    pub file_size_bytes: i64,
    pub source: GenerationSource,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the save operation; `id` and `created_at` are
/// assigned by the record store on insert.
#[derive(Debug, Clone)]
pub struct NewLibraryItem {
    pub owner_id: Uuid,
    pub storage_key: String,
    pub media_type: MediaType,
    pub content_type: String,
    pub metadata: ItemMetadata,
    pub file_size_bytes: i64,
    pub source: GenerationSource,
}

/// Result of a successful save.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedItem {
    pub id: Uuid,
    pub storage_key: String,
}

/// A library item annotated with a freshly minted signed URL.
///
/// `url` is `None` when signed-URL generation failed for this item; the
/// item is still listed so the client can show a placeholder tile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryItemWithUrl {
    #[serde(flatten)]
    pub item: LibraryItem,
    pub url: Option<String>,
}

/// One page of a library listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryPage {
    pub items: Vec<LibraryItemWithUrl>,
    pub total: i64,
    pub has_more: bool,
}
