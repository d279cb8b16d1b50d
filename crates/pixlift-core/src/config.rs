//! Application configuration loaded from environment variables.
//!
//! `Config::from_env()` reads every setting with a sensible development
//! default; `validate()` enforces the stricter rules a production boot
//! must satisfy (explicit CORS origins, a real JWT secret, a database URL
//! when the postgres record backend is selected).

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::{DEFAULT_STORAGE_BUCKET, TOTAL_STORAGE_BYTES};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;
const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;
const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Blob storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Record store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordsBackend {
    Postgres,
    Memory,
}

impl FromStr for RecordsBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(RecordsBackend::Postgres),
            "memory" => Ok(RecordsBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid records backend: {}", s)),
        }
    }
}

impl Display for RecordsBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RecordsBackend::Postgres => write!(f, "postgres"),
            RecordsBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_body_bytes: usize,

    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub records_backend: RecordsBackend,

    pub storage_backend: StorageBackend,
    pub storage_bucket: String,
    pub local_storage_path: String,

    pub jwt_secret: String,

    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,

    pub signed_url_ttl_secs: u64,
    pub library_quota_bytes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL").ok();

        // Default to postgres when a database URL is present, memory otherwise.
        let records_backend = env::var("RECORDS_BACKEND")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(if database_url.is_some() {
                RecordsBackend::Postgres
            } else {
                RecordsBackend::Memory
            });

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(StorageBackend::Local);

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            database_url,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DB_TIMEOUT_SECS),
            records_backend,
            storage_backend,
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| DEFAULT_STORAGE_BUCKET.to_string()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./data/storage".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            signed_url_ttl_secs: env::var("SIGNED_URL_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SIGNED_URL_TTL_SECS),
            library_quota_bytes: env::var("LIBRARY_QUOTA_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(TOTAL_STORAGE_BYTES),
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Enforce settings that must not fall back to development defaults.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() {
            if self.cors_origins.iter().any(|o| o == "*") {
                return Err(anyhow::anyhow!(
                    "CORS_ALLOWED_ORIGINS cannot be '*' in production. Please specify explicit origins."
                ));
            }
            if self.jwt_secret == DEV_JWT_SECRET {
                return Err(anyhow::anyhow!("JWT_SECRET must be set in production"));
            }
        }
        if self.records_backend == RecordsBackend::Postgres && self.database_url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be set when RECORDS_BACKEND is postgres"
            ));
        }
        if self.library_quota_bytes <= 0 {
            return Err(anyhow::anyhow!("LIBRARY_QUOTA_BYTES must be positive"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
