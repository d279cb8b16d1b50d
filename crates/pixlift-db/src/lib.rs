//! Record persistence and the media library service.
//!
//! This crate owns the `library_items` table. [`RecordStore`] abstracts the
//! row-level operations with a PostgreSQL implementation for real deployments
//! and an in-memory one for tests and database-less demo runs. [`Library`]
//! sits on top and coordinates records with blob storage: saves upload the
//! blob before inserting the record (and clean the blob up again when the
//! insert fails), deletes remove the blob before the record.
//
// Row-level store trait
pub mod records;
//
// Backends
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
//
// Blob + record coordination
pub mod library;
//
// Backend selection from configuration
pub mod factory;

pub use factory::create_record_store;
pub use library::Library;
pub use memory::MemoryRecordStore;
#[cfg(feature = "postgres")]
pub use postgres::PgRecordStore;
pub use records::RecordStore;
