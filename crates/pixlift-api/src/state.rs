//! Application state and sub-state extractors.
//!
//! AppState is split into domain sub-states so handlers can extract only what they need
//! via Axum's `FromRef`.

use pixlift_core::Config;
use pixlift_db::Library;
use pixlift_genai::{GeminiClient, VeoClient};
use std::sync::Arc;

// ----- Sub-state types -----

/// Generation provider clients. Both are `None` in demo mode (no API key configured),
/// in which case handlers return placeholder artifacts instead of calling out.
#[derive(Clone)]
pub struct GenAiState {
    pub gemini: Option<Arc<GeminiClient>>,
    pub veo: Option<Arc<VeoClient>>,
}

impl GenAiState {
    pub fn is_demo(&self) -> bool {
        self.gemini.is_none()
    }
}

// ----- Top-level state -----

#[derive(Clone)]
pub struct AppState {
    pub library: Library,
    pub genai: GenAiState,
    pub config: Config,
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for GenAiState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.genai.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
