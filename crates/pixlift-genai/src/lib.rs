//! Generation provider clients
//!
//! REST clients for the Gemini image and Veo video APIs, prompt
//! construction for the generation routes, provider error classification
//! and demo mode. Clients are constructed explicitly with their API key and
//! base URL and injected into handlers through application state.

pub mod demo;
pub mod error;
pub mod gemini;
pub mod prompts;
pub mod veo;

pub use demo::is_demo_mode;
pub use error::ProviderError;
pub use gemini::{
    GeminiClient, GeneratedImage, ImageRequest, InlineImage, ResponseModalities,
    GEMINI_API_BASE, GEMINI_FLASH_IMAGE_MODEL, GEMINI_PRO_IMAGE_MODEL,
};
pub use veo::{GeneratedVideo, VeoClient, VideoRequest, VEO_VIDEO_MODEL};
