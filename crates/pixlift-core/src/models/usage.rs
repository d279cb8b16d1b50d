use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::MediaType;

/// Storage consumption for one owner against the fixed quota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LibraryUsage {
    pub used_bytes: i64,
    pub total_bytes: i64,
    /// Percent of quota used, rounded to one decimal place.
    pub used_percent: f64,
    pub item_count: i64,
    pub images_count: i64,
    pub videos_count: i64,
}

impl LibraryUsage {
    /// Aggregate `(media_type, file_size_bytes)` projections into a usage
    /// summary. Recomputed on every call; nothing is cached.
    pub fn compute(rows: &[(MediaType, i64)], total_bytes: i64) -> LibraryUsage {
        let used_bytes: i64 = rows.iter().map(|(_, size)| size).sum();
        let images_count = rows
            .iter()
            .filter(|(kind, _)| *kind == MediaType::Image)
            .count() as i64;
        let videos_count = rows
            .iter()
            .filter(|(kind, _)| *kind == MediaType::Video)
            .count() as i64;

        let used_percent = if total_bytes > 0 {
            (used_bytes as f64 / total_bytes as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        LibraryUsage {
            used_bytes,
            total_bytes,
            used_percent,
            item_count: rows.len() as i64,
            images_count,
            videos_count,
        }
    }
}
