//! Engagement - Copy/favorite signals and action outcomes
//!
//! Pure domain types without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::PromptId;

/// An authenticated user session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserSession {
    pub user_id: String,
    /// Bearer token presented to the engagement service
    pub token: String,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }
}

/// Server-side engagement counters for one prompt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngagementCounts {
    pub prompt_id: PromptId,
    pub copy_count: u64,
    pub favorite_count: u64,
}

/// A user's favorite as recorded by the engagement service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub prompt_id: PromptId,
    pub user_id: String,
    pub favorited_at: DateTime<Utc>,
}

/// Non-fatal conditions reported by engagement actions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngagementCondition {
    /// Clipboard write failed; counters were still updated
    ClipboardDenied,
    /// No session; nothing was changed
    Unauthenticated,
    /// Engagement service rejected or failed the request; retryable
    SyncFailed,
}

impl std::fmt::Display for EngagementCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngagementCondition::ClipboardDenied => write!(f, "clipboard_denied"),
            EngagementCondition::Unauthenticated => write!(f, "unauthenticated"),
            EngagementCondition::SyncFailed => write!(f, "sync_failed"),
        }
    }
}

/// Result of mirroring prompt text to the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardStatus {
    Copied,
    Denied { reason: String },
}

impl ClipboardStatus {
    pub fn is_copied(&self) -> bool {
        matches!(self, ClipboardStatus::Copied)
    }
}

/// Result of a favorite toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteStatus {
    /// The engagement service accepted the latest desired state
    Synced,
    /// Another request for the same prompt is in flight; this toggle
    /// will be folded into its follow-up request
    Queued,
    /// No session was available
    Unauthenticated,
    /// The request failed and the local state was rolled back
    SyncFailed { reason: String },
}

impl FavoriteStatus {
    pub fn condition(&self) -> Option<EngagementCondition> {
        match self {
            FavoriteStatus::Synced | FavoriteStatus::Queued => None,
            FavoriteStatus::Unauthenticated => Some(EngagementCondition::Unauthenticated),
            FavoriteStatus::SyncFailed { .. } => Some(EngagementCondition::SyncFailed),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, FavoriteStatus::SyncFailed { .. })
    }
}
