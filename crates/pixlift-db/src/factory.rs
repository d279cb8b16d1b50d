//! Record store setup and backend selection

use std::sync::Arc;

use pixlift_core::{AppError, Config, RecordsBackend};

use crate::memory::MemoryRecordStore;
use crate::records::RecordStore;

/// Connect to PostgreSQL and run pending migrations.
#[cfg(feature = "postgres")]
pub async fn setup_pool(config: &Config) -> Result<sqlx::PgPool, AppError> {
    use anyhow::Context;
    use sqlx::postgres::PgPoolOptions;
    use std::path::Path;
    use std::time::Duration;

    let database_url = config.database_url.as_deref().ok_or_else(|| {
        AppError::Internal("DATABASE_URL is required for the postgres records backend".to_string())
    })?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );

    // Run pending migrations on startup (path: workspace migrations/ from crate root)
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Factory function to create the record store for the configured backend
pub async fn create_record_store(config: &Config) -> Result<Arc<dyn RecordStore>, AppError> {
    match config.records_backend {
        #[cfg(feature = "postgres")]
        RecordsBackend::Postgres => {
            tracing::info!("Initializing PostgreSQL record store");
            let pool = setup_pool(config).await?;
            Ok(Arc::new(crate::postgres::PgRecordStore::new(pool)))
        }
        #[cfg(not(feature = "postgres"))]
        RecordsBackend::Postgres => Err(AppError::Internal(
            "RECORDS_BACKEND=postgres requires the postgres feature".to_string(),
        )),
        RecordsBackend::Memory => {
            tracing::info!("Initializing in-memory record store (records are not persisted)");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
    }
}
