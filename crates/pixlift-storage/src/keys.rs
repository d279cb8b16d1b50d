//! Shared key generation for storage backends.
//!
//! Key format: `{owner_id}/{unix_millis}-{random6}.{ext}`. The timestamp
//! plus random suffix keeps concurrent saves by the same owner from ever
//! colliding on a key.

use rand::{distr::Alphanumeric, Rng};
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 6;
const FALLBACK_EXTENSION: &str = "bin";

/// Derive a file extension from a MIME type. The subtype is used directly,
/// with `jpeg` normalized to `jpg`; unrecognizable types fall back to a
/// generic binary extension.
pub fn extension_for(content_type: &str) -> &str {
    match content_type.split('/').nth(1) {
        Some("jpeg") => "jpg",
        Some(subtype) if !subtype.is_empty() => subtype,
        _ => FALLBACK_EXTENSION,
    }
}

/// Generate a globally-unique storage key for one owner's artifact.
pub fn generate_storage_key(owner_id: Uuid, content_type: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!(
        "{}/{}-{}.{}",
        owner_id,
        millis,
        suffix,
        extension_for(content_type)
    )
}
