//! Pixlift Core Library
//!
//! This crate provides the domain models, error types, constants, and
//! configuration shared across all Pixlift components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, RecordsBackend, StorageBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    GenerationSource, ItemMetadata, LibraryItem, LibraryItemWithUrl, LibraryPage, LibraryUsage,
    MediaType, NewLibraryItem, SavedItem,
};
