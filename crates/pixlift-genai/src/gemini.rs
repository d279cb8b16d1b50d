//! Gemini image generation client
//!
//! Thin REST client for the `generateContent` endpoint. One request yields
//! one image, so multi-image generation fans out concurrent requests. The
//! base URL is injectable for tests.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::{extract_error_message, image_request_error, ProviderError};

/// Production API host. Tests point the client elsewhere.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default image model, fast and cheap.
pub const GEMINI_FLASH_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
/// High-fidelity image model. The only model that honors `imageSize`.
pub const GEMINI_PRO_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";

const IMAGE_TIMEOUT_SECS: u64 = 60;

/// Reference image sent inline with a generation request.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data_base64: String,
}

/// Which part kinds the model may answer with. Angle generation asks for
/// text alongside the image; the other routes want the image alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseModalities {
    ImageOnly,
    TextAndImage,
}

/// One image generation request.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    /// Reference image for image-to-image routes, absent for text-to-image.
    pub input_image: Option<InlineImage>,
    /// When absent no `imageConfig` is sent and the model picks freely.
    pub aspect_ratio: Option<String>,
    /// Only honored by the pro model; ignored for others.
    pub image_size: Option<String>,
    pub modalities: ResponseModalities,
}

/// A generated image as returned by the model.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub data_base64: String,
    pub mime_type: String,
}

pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(IMAGE_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            api_key,
            base_url,
        })
    }

    /// Generate a single image.
    pub async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<GeneratedImage, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, request.model, self.api_key
        );
        let body = build_request_body(request);

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(image_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = extract_error_message(&error_text)
                .unwrap_or_else(|| format!("API error: {}", status));
            tracing::error!(status = %status, error = %message, "Gemini API request failed");
            return Err(ProviderError::classify_image(&message));
        }

        let data: GenerateContentResponse = response.json().await.map_err(|error| {
            tracing::error!(%error, "Failed to parse Gemini response");
            ProviderError::Upstream(format!("Failed to parse Gemini response: {}", error))
        })?;

        data.into_inline_image().ok_or_else(|| {
            tracing::error!(model = %request.model, "No image data in Gemini response");
            ProviderError::Upstream("No image was generated".to_string())
        })
    }

    /// Generate `count` images concurrently. The REST endpoint returns one
    /// image per call, so this fans out and fails fast on the first error.
    pub async fn generate_images(
        &self,
        request: &ImageRequest,
        count: usize,
    ) -> Result<Vec<GeneratedImage>, ProviderError> {
        let tasks = (0..count).map(|_| self.generate_image(request));
        futures::future::try_join_all(tasks).await
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn build_request_body(request: &ImageRequest) -> serde_json::Value {
    let mut parts = Vec::new();
    if let Some(image) = &request.input_image {
        parts.push(json!({
            "inlineData": {
                "mimeType": image.mime_type,
                "data": image.data_base64
            }
        }));
    }
    parts.push(json!({ "text": request.prompt }));

    let modalities = match request.modalities {
        ResponseModalities::ImageOnly => json!(["Image"]),
        ResponseModalities::TextAndImage => json!(["Text", "Image"]),
    };

    let mut generation_config = json!({ "responseModalities": modalities });
    if let Some(aspect_ratio) = &request.aspect_ratio {
        let mut image_config = json!({ "aspectRatio": aspect_ratio });
        if request.model == GEMINI_PRO_IMAGE_MODEL {
            if let Some(size) = &request.image_size {
                image_config["imageSize"] = json!(size);
            }
        }
        generation_config["imageConfig"] = image_config;
    }

    json!({
        "contents": [{ "parts": parts }],
        "generationConfig": generation_config
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ContentPart>>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
    data: Option<String>,
}

impl GenerateContentResponse {
    /// First part carrying inline image data. Text parts are skipped since
    /// the text-and-image modality interleaves commentary with the image.
    fn into_inline_image(self) -> Option<GeneratedImage> {
        let inline = self
            .candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .find_map(|part| part.inline_data)?;

        Some(GeneratedImage {
            data_base64: inline.data?,
            mime_type: inline
                .mime_type
                .unwrap_or_else(|| "image/png".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_request(model: &str) -> ImageRequest {
        ImageRequest {
            model: model.to_string(),
            prompt: "a red sneaker".to_string(),
            input_image: None,
            aspect_ratio: Some("1:1".to_string()),
            image_size: Some("1K".to_string()),
            modalities: ResponseModalities::ImageOnly,
        }
    }

    #[test]
    fn test_text_only_body_has_single_text_part() {
        let body = build_request_body(&text_request(GEMINI_FLASH_IMAGE_MODEL));
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts.as_array().map(|a| a.len()), Some(1));
        assert_eq!(parts[0]["text"], "a red sneaker");
        assert_eq!(body["generationConfig"]["responseModalities"][0], "Image");
    }

    #[test]
    fn test_image_size_only_sent_for_pro_model() {
        let flash = build_request_body(&text_request(GEMINI_FLASH_IMAGE_MODEL));
        assert!(flash["generationConfig"]["imageConfig"]["imageSize"].is_null());
        assert_eq!(flash["generationConfig"]["imageConfig"]["aspectRatio"], "1:1");

        let pro = build_request_body(&text_request(GEMINI_PRO_IMAGE_MODEL));
        assert_eq!(pro["generationConfig"]["imageConfig"]["imageSize"], "1K");
    }

    #[test]
    fn test_reference_image_precedes_prompt_text() {
        let request = ImageRequest {
            model: GEMINI_FLASH_IMAGE_MODEL.to_string(),
            prompt: "rotate the camera".to_string(),
            input_image: Some(InlineImage {
                mime_type: "image/jpeg".to_string(),
                data_base64: "aGVsbG8=".to_string(),
            }),
            aspect_ratio: None,
            image_size: None,
            modalities: ResponseModalities::TextAndImage,
        };
        let body = build_request_body(&request);

        let parts = body["contents"][0]["parts"].as_array().cloned().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
        assert_eq!(parts[1]["text"], "rotate the camera");

        let modalities = body["generationConfig"]["responseModalities"].clone();
        assert_eq!(modalities[0], "Text");
        assert_eq!(modalities[1], "Image");
        // No aspect ratio requested, so no imageConfig at all.
        assert!(body["generationConfig"]["imageConfig"].is_null());
    }

    #[test]
    fn test_response_parsing_extracts_first_inline_image() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your image:" },
                        { "inlineData": { "mimeType": "image/webp", "data": "Zm9v" } }
                    ]
                }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let image = response.into_inline_image().unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.data_base64, "Zm9v");
    }

    #[test]
    fn test_response_without_inline_data_yields_none() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "sorry, cannot help" }] }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert!(response.into_inline_image().is_none());

        let empty: GenerateContentResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.into_inline_image().is_none());
    }

    #[test]
    fn test_missing_mime_type_defaults_to_png() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "data": "Zm9v" } }] }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.into_inline_image().unwrap().mime_type, "image/png");
    }

}
