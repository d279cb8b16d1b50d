//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixlift-api --test library_test` or
//! `cargo test -p pixlift-api`. Backends are the in-memory record store and a
//! tempdir-backed local blob store, so no Docker or Postgres is required. The
//! AI clients are left unset, which puts every generation route in demo mode.

pub mod auth;
pub mod fixtures;
pub mod seed;

use axum_test::TestServer;
use pixlift_api::setup::routes;
use pixlift_api::state::{AppState, GenAiState};
use pixlift_core::{Config, RecordsBackend, StorageBackend};
use pixlift_db::{Library, MemoryRecordStore, RecordStore};
use pixlift_storage::{LocalStorage, Storage};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Quota configured for test apps, echoed back by the usage endpoint.
pub const TEST_QUOTA_BYTES: i64 = 1_073_741_824;

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup test application with in-memory records, tempdir blob storage, and
/// no AI clients (demo mode).
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let records: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(
            temp_dir.path().to_path_buf(),
            "http://localhost:8080/media".to_string(),
        )
        .await
        .expect("Failed to create local storage"),
    );

    let config = create_test_config();
    let library = Library::with_limits(
        records,
        storage,
        Duration::from_secs(config.signed_url_ttl_secs),
        config.library_quota_bytes,
    );

    let state = Arc::new(AppState {
        library,
        genai: GenAiState {
            gemini: None,
            veo: None,
        },
        config: config.clone(),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server =
        TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        _temp_dir: temp_dir,
    }
}

fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "development".to_string(),
        cors_origins: vec!["*".to_string()],
        max_body_bytes: 50 * 1024 * 1024,
        database_url: None,
        db_max_connections: 5,
        db_timeout_seconds: 30,
        records_backend: RecordsBackend::Memory,
        storage_backend: StorageBackend::Local,
        storage_bucket: "user-media".to_string(),
        local_storage_path: "./data/storage".to_string(),
        jwt_secret: auth::TEST_JWT_SECRET.to_string(),
        gemini_api_key: None,
        gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
        signed_url_ttl_secs: 3600,
        library_quota_bytes: TEST_QUOTA_BYTES,
    }
}
