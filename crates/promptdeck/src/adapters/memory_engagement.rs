//! In-Memory Engagement Service
//!
//! Process-local system of record for copy and favorite counts. Backs the
//! HTTP engagement server and doubles as a test fixture.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{DomainError, EngagementCounts, FavoriteRecord, PromptId, UserSession};
use crate::ports::EngagementService;

#[derive(Default)]
struct EngagementState {
    copies: HashMap<PromptId, u64>,
    /// prompt -> user -> favorited at
    favorites: HashMap<PromptId, HashMap<String, DateTime<Utc>>>,
}

/// In-memory implementation of `EngagementService`
#[derive(Default)]
pub struct InMemoryEngagementService {
    state: RwLock<EngagementState>,
}

impl InMemoryEngagementService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing copy counts
    pub fn with_copy_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (PromptId, u64)>,
    {
        let state = EngagementState {
            copies: counts.into_iter().filter(|(_, n)| *n > 0).collect(),
            favorites: HashMap::new(),
        };
        Self {
            state: RwLock::new(state),
        }
    }

    /// Counters for one prompt; zero when nothing was recorded
    pub async fn counts_for(&self, prompt_id: PromptId) -> EngagementCounts {
        let state = self.state.read().await;
        EngagementCounts {
            prompt_id,
            copy_count: state.copies.get(&prompt_id).copied().unwrap_or(0),
            favorite_count: state
                .favorites
                .get(&prompt_id)
                .map(|users| users.len() as u64)
                .unwrap_or(0),
        }
    }

    /// A user's favorites, newest first
    pub async fn favorites_of(&self, user_id: &str) -> Vec<FavoriteRecord> {
        let state = self.state.read().await;
        let mut records: Vec<FavoriteRecord> = state
            .favorites
            .iter()
            .filter_map(|(prompt_id, users)| {
                users.get(user_id).map(|at| FavoriteRecord {
                    prompt_id: *prompt_id,
                    user_id: user_id.to_string(),
                    favorited_at: *at,
                })
            })
            .collect();
        records.sort_by(|a, b| {
            b.favorited_at
                .cmp(&a.favorited_at)
                .then(a.prompt_id.cmp(&b.prompt_id))
        });
        records
    }
}

#[async_trait]
impl EngagementService for InMemoryEngagementService {
    async fn increment_copy_count(&self, prompt_id: PromptId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        *state.copies.entry(prompt_id).or_insert(0) += 1;
        Ok(())
    }

    async fn set_favorite(
        &self,
        prompt_id: PromptId,
        session: &UserSession,
        desired: bool,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let users = state.favorites.entry(prompt_id).or_default();
        if desired {
            users
                .entry(session.user_id.clone())
                .or_insert_with(Utc::now);
        } else {
            users.remove(&session.user_id);
            if users.is_empty() {
                state.favorites.remove(&prompt_id);
            }
        }
        Ok(())
    }

    async fn list_favorites(&self, session: &UserSession) -> Result<Vec<PromptId>, DomainError> {
        let state = self.state.read().await;
        let mut ids: Vec<PromptId> = state
            .favorites
            .iter()
            .filter(|(_, users)| users.contains_key(&session.user_id))
            .map(|(prompt_id, _)| *prompt_id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn fetch_counts(&self) -> Result<Vec<EngagementCounts>, DomainError> {
        let ids: BTreeSet<PromptId> = {
            let state = self.state.read().await;
            state
                .copies
                .keys()
                .chain(state.favorites.keys())
                .copied()
                .collect()
        };
        let mut counts = Vec::with_capacity(ids.len());
        for id in ids {
            counts.push(self.counts_for(id).await);
        }
        Ok(counts)
    }
}
