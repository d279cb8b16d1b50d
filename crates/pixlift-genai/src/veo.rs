//! Veo video generation client
//!
//! Video generation is a long-running operation: one request starts it, the
//! operation is polled until done, then the bytes are retrieved. Byte
//! retrieval tries three methods in order since the API has returned the
//! video as inline base64, as a fetchable URI, and as a file name for the
//! download endpoint depending on rollout.

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::{extract_error_message, video_request_error, ProviderError};

/// Veo model used for fashion motion videos.
pub const VEO_VIDEO_MODEL: &str = "veo-3.1-generate-preview";

const VIDEO_TIMEOUT_SECS: u64 = 300;
const MAX_POLL_ATTEMPTS: u32 = 30; // 5 minutes with 10-second intervals
const POLL_INTERVAL_SECS: u64 = 10;

/// One video generation request.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub prompt: String,
    /// Reference image the model animates.
    pub image_base64: String,
    pub mime_type: String,
    /// "9:16" or "16:9".
    pub aspect_ratio: String,
    /// 4, 6 or 8 seconds.
    pub duration_seconds: u32,
}

/// A generated video as returned by the model.
#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    pub data_base64: String,
    pub mime_type: String,
}

pub struct VeoClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl VeoClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(VIDEO_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            api_key,
            base_url,
        })
    }

    /// Run a full generation: start the operation, poll it to completion,
    /// retrieve the video bytes.
    pub async fn generate_video(
        &self,
        request: &VideoRequest,
    ) -> Result<GeneratedVideo, ProviderError> {
        let operation_name = self.start_generation(request).await?;
        let handle = self.wait_for_video(&operation_name).await?;
        self.fetch_video_bytes(&handle).await
    }

    async fn start_generation(&self, request: &VideoRequest) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:predictLongRunning?key={}",
            self.base_url, VEO_VIDEO_MODEL, self.api_key
        );
        let body = build_start_body(request);

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(video_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = extract_error_message(&error_text)
                .unwrap_or_else(|| format!("API error: {}", status));
            tracing::error!(status = %status, error = %message, "Veo start request failed");
            return Err(ProviderError::classify_video(&message));
        }

        let operation: StartedOperation = response.json().await.map_err(|error| {
            tracing::error!(%error, "Failed to parse Veo operation response");
            ProviderError::Upstream(format!("Failed to parse Veo operation response: {}", error))
        })?;

        operation.name.ok_or_else(|| {
            ProviderError::Upstream("Veo did not return an operation name".to_string())
        })
    }

    async fn get_operation(&self, operation_name: &str) -> Result<VideoOperation, ProviderError> {
        let url = format!(
            "{}/v1beta/{}?key={}",
            self.base_url, operation_name, self.api_key
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(video_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = extract_error_message(&error_text)
                .unwrap_or_else(|| format!("API error: {}", status));
            tracing::error!(status = %status, error = %message, "Veo operation poll failed");
            return Err(ProviderError::classify_video(&message));
        }

        response.json().await.map_err(|error| {
            tracing::error!(%error, "Failed to parse Veo operation status");
            ProviderError::Upstream(format!("Failed to parse Veo operation status: {}", error))
        })
    }

    /// Poll until the operation completes or the attempt limit runs out.
    async fn wait_for_video(&self, operation_name: &str) -> Result<VideoHandle, ProviderError> {
        for attempt in 0..MAX_POLL_ATTEMPTS {
            let operation = self.get_operation(operation_name).await?;

            if operation.done {
                return completed_video(operation_name, operation);
            }

            tracing::debug!(
                operation = %operation_name,
                attempt = attempt + 1,
                max_attempts = MAX_POLL_ATTEMPTS,
                "Waiting for video generation to complete"
            );
            sleep(Duration::from_secs(POLL_INTERVAL_SECS)).await;
        }

        Err(ProviderError::Timeout(
            "Video generation timed out. Please try again.".to_string(),
        ))
    }

    async fn fetch_video_bytes(
        &self,
        handle: &VideoHandle,
    ) -> Result<GeneratedVideo, ProviderError> {
        let mut mime_type = handle
            .mime_type
            .clone()
            .unwrap_or_else(|| "video/mp4".to_string());

        if let Some(bytes) = &handle.video_bytes {
            if !bytes.is_empty() {
                return Ok(GeneratedVideo {
                    data_base64: bytes.clone(),
                    mime_type,
                });
            }
        }

        if let Some(uri) = &handle.uri {
            match self.download(uri).await {
                Ok((data_base64, content_type)) => {
                    if let Some(ct) = content_type {
                        mime_type = ct;
                    }
                    return Ok(GeneratedVideo {
                        data_base64,
                        mime_type,
                    });
                }
                Err(error) => {
                    tracing::warn!(%error, "Video URI fetch failed, trying the download endpoint");
                }
            }
        }

        if let Some(name) = &handle.name {
            let url = format!("{}/v1beta/{}:download?key={}", self.base_url, name, self.api_key);
            match self.download(&url).await {
                Ok((data_base64, content_type)) => {
                    if let Some(ct) = content_type {
                        mime_type = ct;
                    }
                    return Ok(GeneratedVideo {
                        data_base64,
                        mime_type,
                    });
                }
                Err(error) => {
                    tracing::warn!(%error, "Video download endpoint fetch failed");
                }
            }
        }

        tracing::error!("All video retrieval methods failed");
        Err(ProviderError::Upstream(
            "Failed to retrieve video data. The video was generated but could not be downloaded."
                .to_string(),
        ))
    }

    async fn download(&self, url: &str) -> Result<(String, Option<String>), ProviderError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(video_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Upstream(format!(
                "Video download failed: {}",
                status
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let bytes = response.bytes().await.map_err(video_request_error)?;

        Ok((general_purpose::STANDARD.encode(&bytes), content_type))
    }
}

impl std::fmt::Debug for VeoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VeoClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn build_start_body(request: &VideoRequest) -> serde_json::Value {
    json!({
        "instances": [{
            "prompt": request.prompt,
            "image": {
                "bytesBase64Encoded": request.image_base64,
                "mimeType": request.mime_type
            }
        }],
        "parameters": {
            "aspectRatio": request.aspect_ratio,
            "durationSeconds": request.duration_seconds,
            "personGeneration": "allow_adult"
        }
    })
}

/// Resolve a finished operation into its video handle.
fn completed_video(
    operation_name: &str,
    operation: VideoOperation,
) -> Result<VideoHandle, ProviderError> {
    if let Some(error) = operation.error {
        let message = error.message.unwrap_or_else(|| "Unknown error".to_string());
        tracing::error!(operation = %operation_name, error = %message, "Video generation failed");
        return Err(ProviderError::classify_video(&message));
    }

    operation
        .response
        .and_then(OperationResponse::into_first_video)
        .ok_or_else(|| {
            tracing::error!(operation = %operation_name, "Operation finished without any video");
            ProviderError::Upstream(
                "No video was generated. Please try a different image.".to_string(),
            )
        })
}

#[derive(Debug, Deserialize)]
struct StartedOperation {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoOperation {
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    message: Option<String>,
}

/// Finished-operation payload. The REST API nests results under
/// `generateVideoResponse.generatedSamples`; older responses carried a
/// top-level `generatedVideos` list, so both are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    generate_video_response: Option<VideoResults>,
    generated_videos: Option<Vec<GeneratedVideoEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResults {
    generated_samples: Option<Vec<GeneratedVideoEntry>>,
    generated_videos: Option<Vec<GeneratedVideoEntry>>,
}

#[derive(Debug, Deserialize)]
struct GeneratedVideoEntry {
    video: Option<VideoHandle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoHandle {
    uri: Option<String>,
    name: Option<String>,
    mime_type: Option<String>,
    video_bytes: Option<String>,
}

impl OperationResponse {
    fn into_first_video(self) -> Option<VideoHandle> {
        let OperationResponse {
            generate_video_response,
            generated_videos,
        } = self;

        let entries = generated_videos.or_else(|| {
            generate_video_response
                .and_then(|results| results.generated_samples.or(results.generated_videos))
        })?;

        entries.into_iter().next()?.video
    }
}
