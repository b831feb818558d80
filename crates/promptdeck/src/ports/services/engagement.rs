//! Engagement Service Port
//!
//! Abstract interface for the system of record for copy and favorite
//! counts.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, EngagementCounts, PromptId, UserSession};

/// Engagement service interface
///
/// # Delivery semantics
///
/// `increment_copy_count` may be delivered more than once; the counter is
/// advisory. `set_favorite` carries the desired end state rather than a
/// delta, so repeating it is harmless and the latest call wins.
#[async_trait]
pub trait EngagementService: Send + Sync {
    /// Record one copy of a prompt
    async fn increment_copy_count(&self, prompt_id: PromptId) -> Result<(), DomainError>;

    /// Create or update the favorite flag of `session`'s user for a prompt
    async fn set_favorite(
        &self,
        prompt_id: PromptId,
        session: &UserSession,
        desired: bool,
    ) -> Result<(), DomainError>;

    /// Prompt ids the session's user has favorited
    async fn list_favorites(&self, session: &UserSession) -> Result<Vec<PromptId>, DomainError>;

    /// Current counters for every known prompt
    async fn fetch_counts(&self) -> Result<Vec<EngagementCounts>, DomainError>;
}
