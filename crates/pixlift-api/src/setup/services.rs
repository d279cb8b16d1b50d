//! Library and provider client initialization

use crate::state::{AppState, GenAiState};
use anyhow::{Context, Result};
use pixlift_core::Config;
use pixlift_db::{Library, RecordStore};
use pixlift_genai::{is_demo_mode, GeminiClient, VeoClient};
use pixlift_storage::Storage;
use std::sync::Arc;
use std::time::Duration;

pub fn initialize_services(
    config: &Config,
    records: Arc<dyn RecordStore>,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let library = Library::with_limits(
        records,
        storage,
        Duration::from_secs(config.signed_url_ttl_secs),
        config.library_quota_bytes,
    );

    let genai = match &config.gemini_api_key {
        Some(api_key) if !is_demo_mode(Some(api_key)) => {
            let gemini = GeminiClient::new(api_key.clone(), config.gemini_base_url.clone())
                .context("Failed to create Gemini client")?;
            let veo = VeoClient::new(api_key.clone(), config.gemini_base_url.clone())
                .context("Failed to create Veo client")?;
            tracing::info!("Gemini and Veo clients initialized");
            GenAiState {
                gemini: Some(Arc::new(gemini)),
                veo: Some(Arc::new(veo)),
            }
        }
        _ => {
            tracing::warn!("GEMINI_API_KEY not configured, generation endpoints run in demo mode");
            GenAiState {
                gemini: None,
                veo: None,
            }
        }
    };

    Ok(Arc::new(AppState {
        library,
        genai,
        config: config.clone(),
    }))
}
