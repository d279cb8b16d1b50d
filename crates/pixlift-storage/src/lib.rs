//! Pixlift Storage Library
//!
//! This crate provides the blob store abstraction and its backends. It
//! includes the `Storage` trait plus S3-compatible and local filesystem
//! implementations.
//!
//! # Storage key format
//!
//! Keys are owner-scoped: `{owner_id}/{unix_millis}-{random6}.{ext}`, where
//! the extension derives from the MIME subtype. Keys must not contain `..`
//! or a leading `/`. Key generation is centralized in the `keys` module so
//! all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_storage_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use pixlift_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
