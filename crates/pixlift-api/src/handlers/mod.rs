pub mod angles;
pub mod fashion_motion;
pub mod generate;
pub mod library;
pub mod product_enhance;

use pixlift_core::models::{GenerationSource, ItemMetadata};
use pixlift_db::Library;
use pixlift_genai::demo::{DEMO_IMAGE_BASE64, DEMO_IMAGE_MIME};
use pixlift_genai::GeneratedImage;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// One generated image artifact in a response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct Prediction {
    pub bytes_base64: String,
    pub mime_type: String,
    /// Set in demo mode, absent for real generations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<bool>,
}

impl Prediction {
    /// Deterministic 1x1 PNG stub returned when no API key is configured.
    pub fn demo() -> Self {
        Self {
            bytes_base64: DEMO_IMAGE_BASE64.to_string(),
            mime_type: DEMO_IMAGE_MIME.to_string(),
            placeholder: Some(true),
        }
    }
}

impl From<GeneratedImage> for Prediction {
    fn from(image: GeneratedImage) -> Self {
        Self {
            bytes_base64: image.data_base64,
            mime_type: image.mime_type,
            placeholder: None,
        }
    }
}

/// Persist one generated artifact for the user. Saving is best-effort: the
/// artifact bytes are already in the response, so a failed save is logged
/// and reported as a missing library id rather than failing the request.
pub(crate) async fn save_generated(
    library: &Library,
    owner_id: Uuid,
    source: GenerationSource,
    content_base64: &str,
    content_type: &str,
    metadata: ItemMetadata,
) -> Option<Uuid> {
    match library
        .save(owner_id, source, content_base64, content_type, metadata)
        .await
    {
        Ok(saved) => Some(saved.id),
        Err(e) => {
            tracing::warn!(
                error = %e,
                owner_id = %owner_id,
                source = ?source,
                "Failed to save generated artifact to library"
            );
            None
        }
    }
}
