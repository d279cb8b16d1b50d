//! Provider failure classification
//!
//! Errors coming back from the generation APIs are folded into a small set
//! of categories so handlers can answer with a stable status code and a
//! message safe to show end users. Classification is keyword-based over the
//! upstream error text, which is the only signal the REST APIs give us.
//! The `Quota`, `Safety`, `Permission` and `Timeout` payloads are already
//! user-facing; `Upstream` keeps the raw detail for logs only.

use pixlift_core::error::AppError;

/// Categorized generation provider failure.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// API quota or rate limit exhausted.
    #[error("{0}")]
    Quota(String),

    /// Content rejected by the provider's safety filters.
    #[error("{0}")]
    Safety(String),

    /// API key lacks access to the requested model.
    #[error("{0}")]
    Permission(String),

    /// Generation did not finish within the allotted time.
    #[error("{0}")]
    Timeout(String),

    /// Anything else: transport failures, malformed responses, empty results.
    #[error("{0}")]
    Upstream(String),
}

impl ProviderError {
    /// Classify an image-generation failure from its raw error text.
    pub fn classify_image(detail: &str) -> ProviderError {
        let lower = detail.to_lowercase();
        if lower.contains("quota") || detail.contains("429") {
            ProviderError::Quota("API quota exceeded. Please try again later.".to_string())
        } else if lower.contains("safety") {
            ProviderError::Safety("Image was blocked by safety filters.".to_string())
        } else if lower.contains("permission") {
            ProviderError::Permission(
                "Image model access not enabled. Please check your API permissions.".to_string(),
            )
        } else {
            ProviderError::Upstream(detail.to_string())
        }
    }

    /// Classify a video-generation failure from its raw error text.
    /// Same keywords as the image path, different user-facing wording.
    pub fn classify_video(detail: &str) -> ProviderError {
        let lower = detail.to_lowercase();
        if lower.contains("quota") || detail.contains("429") {
            ProviderError::Quota("API quota exceeded. Please try again later.".to_string())
        } else if lower.contains("safety") {
            ProviderError::Safety(
                "The image was blocked by safety filters. Please try a different image."
                    .to_string(),
            )
        } else if lower.contains("permission") {
            ProviderError::Permission(
                "Veo 3.1 access not enabled. Please check your API permissions.".to_string(),
            )
        } else {
            ProviderError::Upstream(detail.to_string())
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Quota(msg) => AppError::ProviderQuotaExceeded(msg),
            ProviderError::Safety(msg) => AppError::ProviderSafetyBlocked(msg),
            ProviderError::Permission(msg) => AppError::ProviderAccessDenied(msg),
            ProviderError::Timeout(msg) => AppError::ProviderTimeout(msg),
            ProviderError::Upstream(msg) => AppError::ProviderUpstream(msg),
        }
    }
}

/// Pull the human-readable message out of a JSON error body, if present.
/// Gemini and Veo both answer errors as `{"error": {"message": ...}}`.
pub(crate) fn extract_error_message(error_text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(error_text).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

/// Map a reqwest transport error on the image path.
pub(crate) fn image_request_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout("Image generation timed out. Please try again.".to_string())
    } else {
        ProviderError::Upstream(format!("Image request failed: {}", error))
    }
}

/// Map a reqwest transport error on the video path.
pub(crate) fn video_request_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout("Video generation timed out. Please try again.".to_string())
    } else {
        ProviderError::Upstream(format!("Video request failed: {}", error))
    }
}
