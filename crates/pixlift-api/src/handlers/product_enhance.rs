//! Product photo enhancement: restage an uploaded product shot in a styled
//! scene sized for a marketplace platform.

use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{save_generated, Prediction};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use pixlift_core::models::{GenerationSource, ItemMetadata};
use pixlift_core::AppError;
use pixlift_genai::prompts::{enhance_style_prompt, platform_aspect_ratio};
use pixlift_genai::{ImageRequest, InlineImage, ResponseModalities, GEMINI_PRO_IMAGE_MODEL};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const MAX_IMAGES_PER_REQUEST: usize = 4;

fn default_style() -> String {
    "studio".to_string()
}

fn default_platform() -> String {
    "custom".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductEnhanceRequest {
    pub image_base64: String,
    pub mime_type: String,
    /// Scene preset: studio, lifestyle, minimalist, luxury, bold, natural
    #[serde(default = "default_style")]
    pub style: String,
    /// Marketplace preset driving the output aspect ratio
    #[serde(default = "default_platform")]
    pub platform: String,
    pub model: Option<String>,
    pub number_of_images: Option<usize>,
    /// Overrides the style preset prompt when present
    pub custom_prompt: Option<String>,
    pub save_to_library: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductEnhanceResponse {
    pub success: bool,
    pub predictions: Vec<Prediction>,
    pub style: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_ids: Option<Vec<Uuid>>,
}

#[utoipa::path(
    post,
    path = "/api/product-enhance",
    tag = "generation",
    request_body = ProductEnhanceRequest,
    responses(
        (status = 200, description = "Enhanced images generated", body = ProductEnhanceResponse),
        (status = 400, description = "Missing image", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Blocked by provider safety filters", body = ErrorResponse),
        (status = 429, description = "Provider quota exceeded", body = ErrorResponse),
        (status = 502, description = "Provider error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(
        user_id = %user.user_id,
        style = %body.style,
        platform = %body.platform,
        operation = "product_enhance"
    )
)]
pub async fn product_enhance(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<ProductEnhanceRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if body.image_base64.trim().is_empty() {
        return Err(AppError::InvalidArgument("image_base64 is required".to_string()).into());
    }
    if body.mime_type.trim().is_empty() {
        return Err(AppError::InvalidArgument("mime_type is required".to_string()).into());
    }

    let count = body
        .number_of_images
        .unwrap_or(1)
        .clamp(1, MAX_IMAGES_PER_REQUEST);
    let model = body
        .model
        .unwrap_or_else(|| GEMINI_PRO_IMAGE_MODEL.to_string());
    let aspect_ratio = platform_aspect_ratio(&body.platform).to_string();
    let prompt = match body.custom_prompt.as_deref() {
        Some(custom) if !custom.trim().is_empty() => custom.to_string(),
        _ => enhance_style_prompt(&body.style).to_string(),
    };
    let save = body.save_to_library.unwrap_or(true);

    let predictions: Vec<Prediction> = match &state.genai.gemini {
        Some(client) => {
            let request = ImageRequest {
                model: model.clone(),
                prompt: prompt.clone(),
                input_image: Some(InlineImage {
                    mime_type: body.mime_type.clone(),
                    data_base64: body.image_base64.clone(),
                }),
                aspect_ratio: Some(aspect_ratio.clone()),
                image_size: Some("1K".to_string()),
                modalities: ResponseModalities::ImageOnly,
            };
            client
                .generate_images(&request, count)
                .await?
                .into_iter()
                .map(Prediction::from)
                .collect()
        }
        None => (0..count).map(|_| Prediction::demo()).collect(),
    };

    let library_ids = if save {
        let mut ids = Vec::with_capacity(predictions.len());
        for prediction in &predictions {
            let metadata = ItemMetadata::ProductEnhance {
                prompt: Some(prompt.clone()),
                model: Some(model.clone()),
                style: Some(body.style.clone()),
                platform: Some(body.platform.clone()),
                aspect_ratio: Some(aspect_ratio.clone()),
            };
            if let Some(id) = save_generated(
                &state.library,
                user.user_id,
                GenerationSource::ProductEnhance,
                &prediction.bytes_base64,
                &prediction.mime_type,
                metadata,
            )
            .await
            {
                ids.push(id);
            }
        }
        Some(ids)
    } else {
        None
    };

    Ok(Json(ProductEnhanceResponse {
        success: true,
        predictions,
        style: body.style,
        platform: body.platform,
        library_ids,
    }))
}
