//! Text-to-image generation.

use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{save_generated, Prediction};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use pixlift_core::models::{GenerationSource, ItemMetadata};
use pixlift_core::AppError;
use pixlift_genai::prompts::enhanced_prompt;
use pixlift_genai::{ImageRequest, ResponseModalities, GEMINI_FLASH_IMAGE_MODEL};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const MAX_IMAGES_PER_REQUEST: usize = 4;

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub prompt: String,
    pub model: Option<String>,
    /// Creative style preset ("photo", "anime", ...); unknown styles pass
    /// the prompt through unchanged
    pub style: Option<String>,
    pub aspect_ratio: Option<String>,
    pub number_of_images: Option<usize>,
    pub save_to_library: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub success: bool,
    pub predictions: Vec<Prediction>,
    /// The enhanced prompt actually sent to the model
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_ids: Option<Vec<Uuid>>,
}

#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "generation",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Images generated", body = GenerateResponse),
        (status = 400, description = "Missing or invalid prompt", body = ErrorResponse),
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
        operation = "generate"
    )
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<GenerateRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if body.prompt.trim().is_empty() {
        return Err(AppError::InvalidArgument("prompt is required".to_string()).into());
    }

    let count = body
        .number_of_images
        .unwrap_or(1)
        .clamp(1, MAX_IMAGES_PER_REQUEST);
    let model = body
        .model
        .unwrap_or_else(|| GEMINI_FLASH_IMAGE_MODEL.to_string());
    let aspect_ratio = body.aspect_ratio.unwrap_or_else(|| "1:1".to_string());
    let prompt = enhanced_prompt(&body.prompt, body.style.as_deref());
    let save = body.save_to_library.unwrap_or(true);

    let predictions: Vec<Prediction> = match &state.genai.gemini {
        Some(client) => {
            let request = ImageRequest {
                model: model.clone(),
                prompt: prompt.clone(),
                input_image: None,
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
            let metadata = ItemMetadata::Generate {
                prompt: Some(prompt.clone()),
                model: Some(model.clone()),
                style: body.style.clone(),
                aspect_ratio: Some(aspect_ratio.clone()),
            };
            if let Some(id) = save_generated(
                &state.library,
                user.user_id,
                GenerationSource::Generate,
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

    Ok(Json(GenerateResponse {
        success: true,
        predictions,
        prompt,
        library_ids,
    }))
}
