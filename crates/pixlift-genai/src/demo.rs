//! Demo mode detection and placeholder artifacts
//!
//! Without a real API key the generation routes answer with tiny placeholder
//! artifacts instead of failing, so the product can be explored before
//! provisioning provider access. The placeholder sentinel matches the value
//! shipped in the sample env file.

const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// 1x1 transparent PNG surfaced by the image routes in demo mode.
pub const DEMO_IMAGE_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
pub const DEMO_IMAGE_MIME: &str = "image/png";

/// Header-only MP4 container surfaced by the video route in demo mode.
pub const DEMO_VIDEO_BASE64: &str = "AAAAFGZ0eXBpc29tAAACAGlzb20AAAAIbWRhdA==";
pub const DEMO_VIDEO_MIME: &str = "video/mp4";

/// True when no usable provider key is configured.
pub fn is_demo_mode(api_key: Option<&str>) -> bool {
    match api_key {
        None => true,
        Some(key) => key.is_empty() || key == PLACEHOLDER_API_KEY,
    }
}
