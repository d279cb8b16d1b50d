//! Shared constants for the media library.

use std::time::Duration;

/// Lifetime of signed URLs handed out by list/get responses.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

/// Default page size for library listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard cap on the page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 50;

/// Maximum number of ids accepted by a single batch delete.
pub const MAX_BATCH_SIZE: usize = 20;

/// Fixed per-user storage quota (1 GiB).
pub const TOTAL_STORAGE_BYTES: i64 = 1_073_741_824;

/// Default bucket/container holding user media blobs.
pub const DEFAULT_STORAGE_BUCKET: &str = "user-media";
