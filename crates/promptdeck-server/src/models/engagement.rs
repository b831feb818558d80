//! Engagement - Copy and favorite counters

use chrono::{DateTime, Utc};
use promptdeck::{EngagementCounts, FavoriteRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Set favorite request
#[derive(Debug, Deserialize, ToSchema)]
pub struct FavoriteRequest {
    /// Desired end state; repeating a request is harmless
    pub favorite: bool,
}

/// Engagement counters for one prompt
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EngagementCountsResponse {
    pub prompt_id: u32,
    pub copy_count: u64,
    pub favorite_count: u64,
}

impl From<EngagementCounts> for EngagementCountsResponse {
    fn from(counts: EngagementCounts) -> Self {
        Self {
            prompt_id: counts.prompt_id.0,
            copy_count: counts.copy_count,
            favorite_count: counts.favorite_count,
        }
    }
}

/// One of the caller's favorites
#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteResponse {
    pub prompt_id: u32,
    pub favorited_at: DateTime<Utc>,
}

impl From<FavoriteRecord> for FavoriteResponse {
    fn from(record: FavoriteRecord) -> Self {
        Self {
            prompt_id: record.prompt_id.0,
            favorited_at: record.favorited_at,
        }
    }
}

/// Favorite state after a set-favorite request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteStateResponse {
    pub prompt_id: u32,
    pub favorited: bool,
    pub favorite_count: u64,
}
