//! Data models for the media library.

mod media;
mod usage;

pub use media::{
    GenerationSource, ItemMetadata, LibraryItem, LibraryItemWithUrl, LibraryPage, MediaType,
    NewLibraryItem, SavedItem,
};
pub use usage::LibraryUsage;
