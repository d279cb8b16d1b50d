//! Camera-angle regeneration: render the same product from a new viewpoint
//! described by rotation, tilt and zoom slider values.

use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{save_generated, Prediction};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use pixlift_core::models::{GenerationSource, ItemMetadata};
use pixlift_core::AppError;
use pixlift_genai::prompts::build_angle_prompt;
use pixlift_genai::{ImageRequest, InlineImage, ResponseModalities, GEMINI_FLASH_IMAGE_MODEL};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnglesRequest {
    pub image_base64: String,
    pub mime_type: String,
    /// Horizontal orbit in degrees, -180..=180
    #[serde(default)]
    pub rotation: i32,
    /// Camera elevation in degrees, -90..=90
    #[serde(default)]
    pub tilt: i32,
    /// Negative is wide, positive is close-up
    #[serde(default)]
    pub zoom: i32,
    pub model: Option<String>,
    pub save_to_library: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Angle {
    pub rotation: i32,
    pub tilt: i32,
    pub zoom: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnglesResponse {
    pub success: bool,
    pub prediction: Prediction,
    pub angle: Angle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_ids: Option<Vec<Uuid>>,
}

#[utoipa::path(
    post,
    path = "/api/angles",
    tag = "generation",
    request_body = AnglesRequest,
    responses(
        (status = 200, description = "Angle variant generated", body = AnglesResponse),
        (status = 400, description = "Missing image or slider out of range", body = ErrorResponse),
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
        rotation = body.rotation,
        tilt = body.tilt,
        zoom = body.zoom,
        operation = "angles"
    )
)]
pub async fn angles(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<AnglesRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if body.image_base64.trim().is_empty() {
        return Err(AppError::InvalidArgument("image_base64 is required".to_string()).into());
    }
    if body.mime_type.trim().is_empty() {
        return Err(AppError::InvalidArgument("mime_type is required".to_string()).into());
    }
    if !(-180..=180).contains(&body.rotation) {
        return Err(
            AppError::InvalidArgument("rotation must be between -180 and 180".to_string()).into(),
        );
    }
    if !(-90..=90).contains(&body.tilt) {
        return Err(
            AppError::InvalidArgument("tilt must be between -90 and 90".to_string()).into(),
        );
    }

    let model = body
        .model
        .unwrap_or_else(|| GEMINI_FLASH_IMAGE_MODEL.to_string());
    let prompt = build_angle_prompt(body.rotation, body.tilt, body.zoom);
    let save = body.save_to_library.unwrap_or(true);

    let prediction = match &state.genai.gemini {
        Some(client) => {
            let request = ImageRequest {
                model: model.clone(),
                prompt: prompt.clone(),
                input_image: Some(InlineImage {
                    mime_type: body.mime_type.clone(),
                    data_base64: body.image_base64.clone(),
                }),
                aspect_ratio: None,
                image_size: None,
                modalities: ResponseModalities::TextAndImage,
            };
            Prediction::from(client.generate_image(&request).await?)
        }
        None => Prediction::demo(),
    };

    let library_ids = if save {
        let metadata = ItemMetadata::Angles {
            prompt: Some(prompt),
            model: Some(model),
            rotation: Some(body.rotation),
            tilt: Some(body.tilt),
            zoom: Some(body.zoom),
        };
        let id = save_generated(
            &state.library,
            user.user_id,
            GenerationSource::Angles,
            &prediction.bytes_base64,
            &prediction.mime_type,
            metadata,
        )
        .await;
        Some(id.into_iter().collect())
    } else {
        None
    };

    Ok(Json(AnglesResponse {
        success: true,
        prediction,
        angle: Angle {
            rotation: body.rotation,
            tilt: body.tilt,
            zoom: body.zoom,
        },
        library_ids,
    }))
}
