//! Fashion motion video: animate a model wearing the product from a single
//! reference photo.

use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::save_generated;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use pixlift_core::models::{GenerationSource, ItemMetadata};
use pixlift_core::AppError;
use pixlift_genai::demo::{DEMO_VIDEO_BASE64, DEMO_VIDEO_MIME};
use pixlift_genai::prompts::FASHION_MOTION_PROMPT;
use pixlift_genai::{VideoRequest, VEO_VIDEO_MODEL};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

fn default_aspect_ratio() -> String {
    "9:16".to_string()
}

fn default_duration() -> u32 {
    6
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FashionMotionRequest {
    pub image_base64: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// "9:16" (portrait) or "16:9" (landscape)
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    /// 4, 6 or 8 seconds
    #[serde(default = "default_duration")]
    pub duration_seconds: u32,
    pub save_to_library: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoArtifact {
    pub bytes_base64: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FashionMotionResponse {
    pub success: bool,
    pub video: VideoArtifact,
    pub duration_seconds: u32,
    /// Set in demo mode, absent for real generations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_ids: Option<Vec<Uuid>>,
}

#[utoipa::path(
    post,
    path = "/api/fashion-motion",
    tag = "generation",
    request_body = FashionMotionRequest,
    responses(
        (status = 200, description = "Video generated", body = FashionMotionResponse),
        (status = 400, description = "Missing image or invalid parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "API key not allow-listed for video", body = ErrorResponse),
        (status = 429, description = "Provider quota exceeded", body = ErrorResponse),
        (status = 502, description = "Provider error", body = ErrorResponse),
        (status = 504, description = "Video generation timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(
        user_id = %user.user_id,
        aspect_ratio = %body.aspect_ratio,
        duration_seconds = body.duration_seconds,
        operation = "fashion_motion"
    )
)]
pub async fn fashion_motion(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<FashionMotionRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if body.image_base64.trim().is_empty() {
        return Err(AppError::InvalidArgument("image_base64 is required".to_string()).into());
    }
    if body.aspect_ratio != "9:16" && body.aspect_ratio != "16:9" {
        return Err(
            AppError::InvalidArgument("aspect_ratio must be 9:16 or 16:9".to_string()).into(),
        );
    }
    if !matches!(body.duration_seconds, 4 | 6 | 8) {
        return Err(
            AppError::InvalidArgument("duration_seconds must be 4, 6 or 8".to_string()).into(),
        );
    }

    let save = body.save_to_library.unwrap_or(true);

    let (video, demo) = match &state.genai.veo {
        Some(client) => {
            let request = VideoRequest {
                prompt: FASHION_MOTION_PROMPT.to_string(),
                image_base64: body.image_base64.clone(),
                mime_type: body.mime_type.clone(),
                aspect_ratio: body.aspect_ratio.clone(),
                duration_seconds: body.duration_seconds,
            };
            let generated = client.generate_video(&request).await?;
            (
                VideoArtifact {
                    bytes_base64: generated.data_base64,
                    mime_type: generated.mime_type,
                },
                None,
            )
        }
        None => (
            VideoArtifact {
                bytes_base64: DEMO_VIDEO_BASE64.to_string(),
                mime_type: DEMO_VIDEO_MIME.to_string(),
            },
            Some(true),
        ),
    };

    let library_ids = if save {
        let metadata = ItemMetadata::FashionMotion {
            prompt: Some(FASHION_MOTION_PROMPT.to_string()),
            model: Some(VEO_VIDEO_MODEL.to_string()),
            aspect_ratio: Some(body.aspect_ratio.clone()),
            duration_seconds: Some(body.duration_seconds),
        };
        let id = save_generated(
            &state.library,
            user.user_id,
            GenerationSource::FashionMotion,
            &video.bytes_base64,
            &video.mime_type,
            metadata,
        )
        .await;
        Some(id.into_iter().collect())
    } else {
        None
    };

    Ok(Json(FashionMotionResponse {
        success: true,
        video,
        duration_seconds: body.duration_seconds,
        demo,
        library_ids,
    }))
}
