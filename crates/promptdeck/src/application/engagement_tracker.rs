//! Engagement Tracker (Use Case)
//!
//! The only writer of prompt engagement counters. Copy and favorite
//! actions update local state optimistically, then reconcile with the
//! engagement service.
//!
//! Ordering rules:
//! - copy requests for the same prompt never overlap (per-prompt lane)
//! - favorite requests for the same prompt and user never overlap; toggles
//!   arriving while one is in flight collapse into a single follow-up
//!   request carrying the latest desired state
//! - requests for different prompts run concurrently

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::application::CatalogService;
use crate::domain::{
    ClipboardStatus, DomainError, EngagementCondition, FavoriteStatus, Locale, PromptId,
    UserSession,
};
use crate::ports::{Clipboard, EngagementService, LocaleProvider, SessionProvider};

/// How long the "copied" acknowledgment stays visible
pub const COPIED_ACK_WINDOW: Duration = Duration::from_secs(2);

/// Tracker behavior settings
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub copied_ack_window: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            copied_ack_window: COPIED_ACK_WINDOW,
        }
    }
}

/// Transient acknowledgment shown after a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopiedAck {
    pub issued_at: Instant,
    pub window: Duration,
}

impl CopiedAck {
    pub fn expires_at(&self) -> Instant {
        self.issued_at + self.window
    }

    pub fn is_active_at(&self, now: Instant) -> bool {
        now < self.expires_at()
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Instant::now())
    }
}

/// Handle on the background copy-count request
///
/// Dropping it detaches the request; it still runs to completion.
#[derive(Debug)]
pub struct CopySync {
    handle: JoinHandle<Result<(), DomainError>>,
}

impl CopySync {
    /// Wait for the engagement service to acknowledge the copy
    pub async fn wait(self) -> Result<(), DomainError> {
        self.handle
            .await
            .map_err(|e| DomainError::ExternalService(format!("copy sync task failed: {e}")))?
    }
}

/// Result of `EngagementTracker::record_copy`
#[derive(Debug)]
pub struct CopyOutcome {
    pub prompt_id: PromptId,
    /// The text placed (or attempted) on the clipboard
    pub text: String,
    pub clipboard: ClipboardStatus,
    /// Local copy count after the increment
    pub copy_count: u64,
    pub acknowledgment: CopiedAck,
    pub sync: CopySync,
}

impl CopyOutcome {
    pub fn condition(&self) -> Option<EngagementCondition> {
        match self.clipboard {
            ClipboardStatus::Copied => None,
            ClipboardStatus::Denied { .. } => Some(EngagementCondition::ClipboardDenied),
        }
    }
}

/// Result of `EngagementTracker::toggle_favorite`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteOutcome {
    pub prompt_id: PromptId,
    pub status: FavoriteStatus,
    /// Local favorite state after this call
    ///
    /// Always false for `Unauthenticated`: without a session there is no
    /// user whose favorites could be consulted.
    pub favorited: bool,
    pub favorite_count: u64,
}

impl FavoriteOutcome {
    pub fn condition(&self) -> Option<EngagementCondition> {
        self.status.condition()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FavoriteKey {
    prompt_id: PromptId,
    user_id: String,
}

#[derive(Debug, Default)]
struct FavoriteSlot {
    /// Last state acknowledged by the engagement service
    confirmed: bool,
    /// Optimistic state shown to the user
    local: bool,
    in_flight: bool,
    /// Toggles arrived while a request was in flight
    pending: bool,
}

/// Application service for copy and favorite actions
pub struct EngagementTracker<E: EngagementService> {
    catalog: Arc<CatalogService>,
    engagement: Arc<E>,
    clipboard: Arc<dyn Clipboard>,
    locale: Arc<dyn LocaleProvider>,
    sessions: Arc<dyn SessionProvider>,
    config: TrackerConfig,
    copy_lanes: Mutex<HashMap<PromptId, Arc<Mutex<()>>>>,
    acks: Mutex<HashMap<PromptId, CopiedAck>>,
    favorites: Arc<Mutex<HashMap<FavoriteKey, FavoriteSlot>>>,
}

impl<E: EngagementService + 'static> EngagementTracker<E> {
    pub fn new(
        catalog: Arc<CatalogService>,
        engagement: Arc<E>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            catalog,
            engagement,
            clipboard,
            locale: Arc::new(Locale::NATIVE),
            sessions: Arc::new(None::<UserSession>),
            config: TrackerConfig::default(),
            copy_lanes: Mutex::new(HashMap::new()),
            acks: Mutex::new(HashMap::new()),
            favorites: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_locale(mut self, locale: Arc<dyn LocaleProvider>) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_sessions(mut self, sessions: Arc<dyn SessionProvider>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &Arc<CatalogService> {
        &self.catalog
    }

    /// Copy a prompt's visible text and count the copy
    ///
    /// The clipboard is written first. A refused clipboard is reported in
    /// the outcome but never stops the count. The local count always goes
    /// up by one; the service request runs in the background and is not
    /// rolled back on failure.
    pub async fn record_copy(&self, prompt_id: PromptId) -> Result<CopyOutcome, DomainError> {
        let locale = self.locale.current_locale();
        let text = self
            .catalog
            .display_body(prompt_id, locale)
            .await
            .ok_or_else(|| DomainError::not_found("Prompt", prompt_id))?;

        let clipboard = match self.clipboard.write_text(&text) {
            Ok(()) => ClipboardStatus::Copied,
            Err(e) => {
                tracing::warn!("Clipboard write for prompt {} failed: {}", prompt_id, e);
                ClipboardStatus::Denied {
                    reason: e.to_string(),
                }
            }
        };

        let copy_count = self
            .catalog
            .increment_copy_count(prompt_id)
            .await
            .ok_or_else(|| DomainError::not_found("Prompt", prompt_id))?;

        let acknowledgment = CopiedAck {
            issued_at: Instant::now(),
            window: self.config.copied_ack_window,
        };
        self.acks.lock().await.insert(prompt_id, acknowledgment);

        let lane = self.copy_lane(prompt_id).await;
        let engagement = Arc::clone(&self.engagement);
        let handle = tokio::spawn(async move {
            let _turn = lane.lock().await;
            let result = engagement.increment_copy_count(prompt_id).await;
            if let Err(e) = &result {
                tracing::warn!(
                    "Copy count sync for prompt {} failed, keeping local count: {}",
                    prompt_id,
                    e
                );
            }
            result
        });

        Ok(CopyOutcome {
            prompt_id,
            text,
            clipboard,
            copy_count,
            acknowledgment,
            sync: CopySync { handle },
        })
    }

    /// Whether the "copied" acknowledgment for a prompt is still showing
    pub async fn is_copied(&self, prompt_id: PromptId) -> bool {
        let mut acks = self.acks.lock().await;
        match acks.get(&prompt_id) {
            Some(ack) if ack.is_active() => true,
            Some(_) => {
                acks.remove(&prompt_id);
                false
            }
            None => false,
        }
    }

    /// Toggle the favorite using the session provider's current session
    pub async fn toggle_favorite_current(
        &self,
        prompt_id: PromptId,
    ) -> Result<FavoriteOutcome, DomainError> {
        let session = self.sessions.current_session();
        self.toggle_favorite(prompt_id, session.as_ref()).await
    }

    /// Toggle a prompt's favorite flag for the session's user
    ///
    /// Without a session nothing changes. Otherwise the local flag and
    /// count flip immediately. If no request is in flight this call sends
    /// it and keeps sending one coalesced follow-up per burst of toggles
    /// that arrived meanwhile; if one is in flight this call returns
    /// `Queued`. A failed request restores the last confirmed state.
    pub async fn toggle_favorite(
        &self,
        prompt_id: PromptId,
        session: Option<&UserSession>,
    ) -> Result<FavoriteOutcome, DomainError> {
        let prompt = self
            .catalog
            .get(prompt_id)
            .await
            .ok_or_else(|| DomainError::not_found("Prompt", prompt_id))?;

        let session = match session {
            Some(session) => session,
            None => {
                return Ok(FavoriteOutcome {
                    prompt_id,
                    status: FavoriteStatus::Unauthenticated,
                    favorited: false,
                    favorite_count: prompt.favorite_count(),
                });
            }
        };

        let key = FavoriteKey {
            prompt_id,
            user_id: session.user_id.clone(),
        };

        let desired = {
            let mut slots = self.favorites.lock().await;
            let slot = slots.entry(key.clone()).or_default();
            slot.local = !slot.local;
            let desired = slot.local;
            let favorite_count = self
                .catalog
                .adjust_favorite_count(prompt_id, desired)
                .await
                .unwrap_or_default();

            if slot.in_flight {
                slot.pending = true;
                tracing::debug!(
                    "Favorite toggle for prompt {} queued behind in-flight request",
                    prompt_id
                );
                return Ok(FavoriteOutcome {
                    prompt_id,
                    status: FavoriteStatus::Queued,
                    favorited: desired,
                    favorite_count,
                });
            }
            slot.in_flight = true;
            desired
        };

        // The request loop owns its state so that dropping this future
        // cannot leave the slot marked in flight.
        let handle = tokio::spawn(drive_favorite(
            Arc::clone(&self.engagement),
            Arc::clone(&self.catalog),
            Arc::clone(&self.favorites),
            key,
            session.clone(),
            desired,
        ));
        handle
            .await
            .map_err(|e| DomainError::ExternalService(format!("favorite sync task failed: {e}")))
    }

    /// Local (optimistic) favorite state of a prompt for a user
    pub async fn is_favorite(&self, prompt_id: PromptId, user_id: &str) -> bool {
        let key = FavoriteKey {
            prompt_id,
            user_id: user_id.to_string(),
        };
        self.favorites
            .lock()
            .await
            .get(&key)
            .map(|slot| slot.local)
            .unwrap_or(false)
    }

    /// Load the user's favorites from the engagement service
    ///
    /// Slots with a request in flight keep their optimistic state.
    /// Returns the number of favorites the service reported.
    pub async fn sync_favorites(&self, session: &UserSession) -> Result<usize, DomainError> {
        let favorites = self.engagement.list_favorites(session).await?;
        let mut slots = self.favorites.lock().await;

        for (key, slot) in slots.iter_mut() {
            if key.user_id == session.user_id && !slot.in_flight {
                slot.confirmed = false;
                slot.local = false;
            }
        }
        for prompt_id in &favorites {
            let slot = slots
                .entry(FavoriteKey {
                    prompt_id: *prompt_id,
                    user_id: session.user_id.clone(),
                })
                .or_default();
            slot.confirmed = true;
            if !slot.in_flight {
                slot.local = true;
            }
        }

        tracing::info!(
            "Synced {} favorites for user {}",
            favorites.len(),
            session.user_id
        );
        Ok(favorites.len())
    }

    /// Replace local counters with the engagement service's values
    pub async fn reconcile_counts(&self) -> Result<usize, DomainError> {
        let counts = self.engagement.fetch_counts().await?;
        let applied = self.catalog.apply_counts(&counts).await;
        tracing::info!("Reconciled engagement counts for {} prompts", applied);
        Ok(applied)
    }

    async fn copy_lane(&self, prompt_id: PromptId) -> Arc<Mutex<()>> {
        let mut lanes = self.copy_lanes.lock().await;
        Arc::clone(lanes.entry(prompt_id).or_default())
    }
}

/// Send favorite requests for one slot until no toggle is pending
///
/// Clears `in_flight` on every exit path.
async fn drive_favorite<E: EngagementService>(
    engagement: Arc<E>,
    catalog: Arc<CatalogService>,
    favorites: Arc<Mutex<HashMap<FavoriteKey, FavoriteSlot>>>,
    key: FavoriteKey,
    session: UserSession,
    mut desired: bool,
) -> FavoriteOutcome {
    let prompt_id = key.prompt_id;
    loop {
        tracing::debug!("Dispatching favorite={} for prompt {}", desired, prompt_id);
        let result = engagement.set_favorite(prompt_id, &session, desired).await;

        let mut slots = favorites.lock().await;
        let slot = slots.entry(key.clone()).or_default();

        match result {
            Ok(()) => {
                slot.confirmed = desired;
                if slot.pending {
                    slot.pending = false;
                    desired = slot.local;
                    continue;
                }
                slot.in_flight = false;
                let favorited = slot.local;
                drop(slots);

                return FavoriteOutcome {
                    prompt_id,
                    status: FavoriteStatus::Synced,
                    favorited,
                    favorite_count: favorite_count(&catalog, prompt_id).await,
                };
            }
            Err(e) => {
                let optimistic = slot.local;
                slot.local = slot.confirmed;
                slot.pending = false;
                slot.in_flight = false;
                let confirmed = slot.confirmed;
                drop(slots);

                if optimistic != confirmed {
                    catalog.adjust_favorite_count(prompt_id, confirmed).await;
                }
                tracing::warn!(
                    "Favorite sync for prompt {} failed, rolled back to {}: {}",
                    prompt_id,
                    confirmed,
                    e
                );

                return FavoriteOutcome {
                    prompt_id,
                    status: FavoriteStatus::SyncFailed {
                        reason: e.to_string(),
                    },
                    favorited: confirmed,
                    favorite_count: favorite_count(&catalog, prompt_id).await,
                };
            }
        }
    }
}

async fn favorite_count(catalog: &CatalogService, prompt_id: PromptId) -> u64 {
    catalog
        .get(prompt_id)
        .await
        .map(|prompt| prompt.favorite_count())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryEngagementService;
    use crate::domain::entities::fixtures::sample_prompts;
    use crate::domain::{Catalog, DisplayMode, EngagementCounts};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Semaphore;

    /// Clipboard double that records writes or refuses them
    #[derive(Default)]
    struct FakeClipboard {
        deny: bool,
        writes: StdMutex<Vec<String>>,
    }

    impl Clipboard for FakeClipboard {
        fn write_text(&self, text: &str) -> Result<(), DomainError> {
            if self.deny {
                return Err(DomainError::ClipboardDenied("permission denied".to_string()));
            }
            self.writes.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// Engagement double whose requests wait on a gate
    struct GatedEngagement {
        gate: Semaphore,
        copy_gate: Semaphore,
        fail: bool,
        favorite_calls: StdMutex<Vec<(PromptId, bool)>>,
        copy_calls: AtomicUsize,
        copies_started: StdMutex<Vec<PromptId>>,
    }

    impl GatedEngagement {
        fn open() -> Self {
            Self::new(Semaphore::MAX_PERMITS, false)
        }

        fn new(permits: usize, fail: bool) -> Self {
            Self {
                gate: Semaphore::new(permits),
                copy_gate: Semaphore::new(Semaphore::MAX_PERMITS),
                fail,
                favorite_calls: StdMutex::new(Vec::new()),
                copy_calls: AtomicUsize::new(0),
                copies_started: StdMutex::new(Vec::new()),
            }
        }

        /// Hold copy requests until permits are added to `copy_gate`
        fn with_closed_copy_gate(mut self) -> Self {
            self.copy_gate = Semaphore::new(0);
            self
        }

        fn copies_started(&self) -> Vec<PromptId> {
            self.copies_started.lock().unwrap().clone()
        }

        fn calls(&self) -> Vec<(PromptId, bool)> {
            self.favorite_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EngagementService for GatedEngagement {
        async fn increment_copy_count(&self, prompt_id: PromptId) -> Result<(), DomainError> {
            self.copies_started.lock().unwrap().push(prompt_id);
            self.copy_gate.acquire().await.unwrap().forget();
            self.copy_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DomainError::ExternalService("unavailable".to_string()));
            }
            Ok(())
        }

        async fn set_favorite(
            &self,
            prompt_id: PromptId,
            _session: &UserSession,
            desired: bool,
        ) -> Result<(), DomainError> {
            self.favorite_calls.lock().unwrap().push((prompt_id, desired));
            self.gate.acquire().await.unwrap().forget();
            if self.fail {
                return Err(DomainError::ExternalService("unavailable".to_string()));
            }
            Ok(())
        }

        async fn list_favorites(&self, _session: &UserSession) -> Result<Vec<PromptId>, DomainError> {
            Ok(vec![PromptId(214)])
        }

        async fn fetch_counts(&self) -> Result<Vec<EngagementCounts>, DomainError> {
            Ok(Vec::new())
        }
    }

    fn catalog() -> Arc<CatalogService> {
        Arc::new(CatalogService::new(Catalog::new(sample_prompts()).unwrap()))
    }

    fn session() -> UserSession {
        UserSession::new("alice", "token-alice")
    }

    async fn in_flight(tracker: &EngagementTracker<GatedEngagement>, prompt_id: PromptId) -> bool {
        let key = FavoriteKey {
            prompt_id,
            user_id: session().user_id,
        };
        tracker
            .favorites
            .lock()
            .await
            .get(&key)
            .map(|slot| slot.in_flight)
            .unwrap_or(false)
    }

    async fn wait_for_calls(engagement: &GatedEngagement, n: usize) {
        while engagement.calls().len() < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_copy_writes_visible_text_and_counts() {
        let catalog = catalog();
        let clipboard = Arc::new(FakeClipboard::default());
        let engagement = Arc::new(GatedEngagement::open());
        let tracker = EngagementTracker::new(catalog.clone(), engagement.clone(), clipboard.clone());

        catalog.toggle_display(PromptId(214), Locale::Zh).await.unwrap();
        let outcome = tracker.record_copy(PromptId(214)).await.unwrap();

        assert_eq!(outcome.copy_count, 1);
        assert_eq!(outcome.condition(), None);
        assert_eq!(outcome.text, "请根据以下提示撰写一份【报告主题】调研报告。");
        assert_eq!(clipboard.writes.lock().unwrap().as_slice(), &[outcome.text.clone()]);
        outcome.sync.wait().await.unwrap();
        assert_eq!(engagement.copy_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_copy_uses_fallback_text_for_fallback_locale() {
        let catalog = catalog();
        let clipboard = Arc::new(FakeClipboard::default());
        let tracker = EngagementTracker::new(
            catalog.clone(),
            Arc::new(GatedEngagement::open()),
            clipboard.clone(),
        )
        .with_locale(Arc::new(Locale::En));

        let outcome = tracker.record_copy(PromptId(214)).await.unwrap();
        assert_eq!(outcome.text, "Please write a research report on a topic of [Topic].");
        assert_eq!(
            catalog.display_mode(PromptId(214)).await,
            DisplayMode::Primary
        );
    }

    #[tokio::test]
    async fn test_copy_counts_even_when_clipboard_denied() {
        let catalog = catalog();
        let clipboard = Arc::new(FakeClipboard {
            deny: true,
            ..Default::default()
        });
        let tracker =
            EngagementTracker::new(catalog.clone(), Arc::new(GatedEngagement::open()), clipboard);

        for expected in 1..=3 {
            let outcome = tracker.record_copy(PromptId(5)).await.unwrap();
            assert_eq!(outcome.copy_count, expected);
            assert_eq!(outcome.condition(), Some(EngagementCondition::ClipboardDenied));
            outcome.sync.wait().await.unwrap();
        }
        assert_eq!(catalog.get(PromptId(5)).await.unwrap().copy_count(), 3);
    }

    #[tokio::test]
    async fn test_copy_sync_failure_keeps_local_count() {
        let catalog = catalog();
        let tracker = EngagementTracker::new(
            catalog.clone(),
            Arc::new(GatedEngagement::new(0, true)),
            Arc::new(FakeClipboard::default()),
        );

        let outcome = tracker.record_copy(PromptId(5)).await.unwrap();
        assert!(outcome.sync.wait().await.is_err());
        assert_eq!(catalog.get(PromptId(5)).await.unwrap().copy_count(), 1);
    }

    #[tokio::test]
    async fn test_copy_unknown_prompt() {
        let tracker = EngagementTracker::new(
            catalog(),
            Arc::new(GatedEngagement::open()),
            Arc::new(FakeClipboard::default()),
        );
        assert!(matches!(
            tracker.record_copy(PromptId(1)).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_copied_ack_expires_after_window() {
        let tracker = EngagementTracker::new(
            catalog(),
            Arc::new(GatedEngagement::open()),
            Arc::new(FakeClipboard::default()),
        );

        assert!(!tracker.is_copied(PromptId(5)).await);
        let outcome = tracker.record_copy(PromptId(5)).await.unwrap();
        assert_eq!(outcome.acknowledgment.window, Duration::from_secs(2));
        assert!(tracker.is_copied(PromptId(5)).await);

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(tracker.is_copied(PromptId(5)).await);
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!tracker.is_copied(PromptId(5)).await);
    }

    #[tokio::test]
    async fn test_favorite_requires_session() {
        let catalog = catalog();
        let engagement = Arc::new(GatedEngagement::open());
        let tracker = EngagementTracker::new(
            catalog.clone(),
            engagement.clone(),
            Arc::new(FakeClipboard::default()),
        );

        let outcome = tracker.toggle_favorite_current(PromptId(5)).await.unwrap();
        assert_eq!(outcome.status, FavoriteStatus::Unauthenticated);
        assert_eq!(outcome.condition(), Some(EngagementCondition::Unauthenticated));
        assert_eq!(catalog.get(PromptId(5)).await.unwrap().favorite_count(), 0);
        assert!(engagement.calls().is_empty());
    }

    #[tokio::test]
    async fn test_signed_out_toggle_reports_not_favorited() {
        let catalog = catalog();
        let engagement = Arc::new(GatedEngagement::open());
        let tracker = EngagementTracker::new(
            catalog.clone(),
            engagement.clone(),
            Arc::new(FakeClipboard::default()),
        );

        let on = tracker
            .toggle_favorite(PromptId(5), Some(&session()))
            .await
            .unwrap();
        assert!(on.favorited);

        let signed_out = tracker.toggle_favorite(PromptId(5), None).await.unwrap();
        assert_eq!(signed_out.status, FavoriteStatus::Unauthenticated);
        assert!(!signed_out.favorited);
        assert_eq!(signed_out.favorite_count, 1);
        assert!(tracker.is_favorite(PromptId(5), "alice").await);
        assert_eq!(engagement.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_favorite_toggle_syncs() {
        let catalog = catalog();
        let engagement = Arc::new(GatedEngagement::open());
        let tracker = EngagementTracker::new(
            catalog.clone(),
            engagement.clone(),
            Arc::new(FakeClipboard::default()),
        )
        .with_sessions(Arc::new(Some(session())));

        let on = tracker.toggle_favorite_current(PromptId(5)).await.unwrap();
        assert_eq!(on.status, FavoriteStatus::Synced);
        assert!(on.favorited);
        assert_eq!(on.favorite_count, 1);

        let off = tracker.toggle_favorite_current(PromptId(5)).await.unwrap();
        assert!(!off.favorited);
        assert_eq!(off.favorite_count, 0);
        assert_eq!(engagement.calls(), vec![(PromptId(5), true), (PromptId(5), false)]);
    }

    #[tokio::test]
    async fn test_favorite_failure_rolls_back() {
        let catalog = catalog();
        let tracker = EngagementTracker::new(
            catalog.clone(),
            Arc::new(GatedEngagement::new(Semaphore::MAX_PERMITS, true)),
            Arc::new(FakeClipboard::default()),
        );

        let outcome = tracker
            .toggle_favorite(PromptId(5), Some(&session()))
            .await
            .unwrap();
        assert!(outcome.status.is_retryable());
        assert_eq!(outcome.condition(), Some(EngagementCondition::SyncFailed));
        assert!(!outcome.favorited);
        assert_eq!(outcome.favorite_count, 0);
        assert!(!tracker.is_favorite(PromptId(5), "alice").await);
    }

    #[tokio::test]
    async fn test_rapid_toggles_coalesce_into_one_follow_up() {
        let catalog = catalog();
        let engagement = Arc::new(GatedEngagement::new(0, false));
        let tracker = Arc::new(EngagementTracker::new(
            catalog.clone(),
            engagement.clone(),
            Arc::new(FakeClipboard::default()),
        ));

        let first = {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                tracker
                    .toggle_favorite(PromptId(214), Some(&session()))
                    .await
            })
        };
        wait_for_calls(&engagement, 1).await;
        assert!(tracker.is_favorite(PromptId(214), "alice").await);

        let second = tracker
            .toggle_favorite(PromptId(214), Some(&session()))
            .await
            .unwrap();
        let third = tracker
            .toggle_favorite(PromptId(214), Some(&session()))
            .await
            .unwrap();
        assert_eq!(second.status, FavoriteStatus::Queued);
        assert!(!second.favorited);
        assert_eq!(third.status, FavoriteStatus::Queued);
        assert!(third.favorited);
        // Only the first request has been dispatched so far
        assert_eq!(engagement.calls().len(), 1);

        engagement.gate.add_permits(10);
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.status, FavoriteStatus::Synced);
        assert!(first.favorited);
        assert_eq!(first.favorite_count, 1);

        let calls = engagement.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], (PromptId(214), true));
    }

    #[tokio::test]
    async fn test_follow_up_carries_final_state() {
        let engagement = Arc::new(GatedEngagement::new(0, false));
        let tracker = Arc::new(EngagementTracker::new(
            catalog(),
            engagement.clone(),
            Arc::new(FakeClipboard::default()),
        ));

        let first = {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                tracker
                    .toggle_favorite(PromptId(5), Some(&session()))
                    .await
            })
        };
        wait_for_calls(&engagement, 1).await;
        tracker
            .toggle_favorite(PromptId(5), Some(&session()))
            .await
            .unwrap();

        engagement.gate.add_permits(10);
        let first = first.await.unwrap().unwrap();
        assert!(!first.favorited);
        assert_eq!(first.favorite_count, 0);
        assert_eq!(
            engagement.calls(),
            vec![(PromptId(5), true), (PromptId(5), false)]
        );
    }

    #[tokio::test]
    async fn test_dropped_toggle_still_settles_slot() {
        let engagement = Arc::new(GatedEngagement::new(0, false));
        let tracker = Arc::new(EngagementTracker::new(
            catalog(),
            engagement.clone(),
            Arc::new(FakeClipboard::default()),
        ));

        let first = {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                tracker
                    .toggle_favorite(PromptId(5), Some(&session()))
                    .await
            })
        };
        wait_for_calls(&engagement, 1).await;
        first.abort();
        assert!(first.await.unwrap_err().is_cancelled());

        engagement.gate.add_permits(10);
        while in_flight(&tracker, PromptId(5)).await {
            tokio::task::yield_now().await;
        }

        for expected in [false, true, false] {
            let outcome = tracker
                .toggle_favorite(PromptId(5), Some(&session()))
                .await
                .unwrap();
            assert_eq!(outcome.status, FavoriteStatus::Synced);
            assert_eq!(outcome.favorited, expected);
        }
        assert_eq!(
            engagement.calls(),
            vec![
                (PromptId(5), true),
                (PromptId(5), false),
                (PromptId(5), true),
                (PromptId(5), false),
            ]
        );
    }

    #[tokio::test]
    async fn test_copy_requests_serialize_per_prompt() {
        let engagement = Arc::new(GatedEngagement::open().with_closed_copy_gate());
        let tracker = EngagementTracker::new(
            catalog(),
            engagement.clone(),
            Arc::new(FakeClipboard::default()),
        );

        let first = tracker.record_copy(PromptId(5)).await.unwrap();
        let second = tracker.record_copy(PromptId(5)).await.unwrap();
        assert_eq!(second.copy_count, 2);

        while engagement.copies_started().is_empty() {
            tokio::task::yield_now().await;
        }
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        // The second copy of prompt 5 waits for the first to finish
        assert_eq!(engagement.copies_started(), vec![PromptId(5)]);

        // Another prompt is not held up by prompt 5
        let other = tracker.record_copy(PromptId(214)).await.unwrap();
        while engagement.copies_started().len() < 2 {
            tokio::task::yield_now().await;
        }
        assert_eq!(engagement.copies_started(), vec![PromptId(5), PromptId(214)]);

        engagement.copy_gate.add_permits(3);
        first.sync.wait().await.unwrap();
        second.sync.wait().await.unwrap();
        other.sync.wait().await.unwrap();
        assert_eq!(
            engagement.copies_started(),
            vec![PromptId(5), PromptId(214), PromptId(5)]
        );
        assert_eq!(engagement.copy_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_different_prompts_do_not_serialize() {
        let engagement = Arc::new(GatedEngagement::new(0, false));
        let tracker = Arc::new(EngagementTracker::new(
            catalog(),
            engagement.clone(),
            Arc::new(FakeClipboard::default()),
        ));

        let mut handles = Vec::new();
        for id in [5, 214, 251] {
            let tracker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move {
                tracker
                    .toggle_favorite(PromptId(id), Some(&session()))
                    .await
            }));
        }
        // All three are in flight at once
        wait_for_calls(&engagement, 3).await;

        engagement.gate.add_permits(3);
        for handle in handles {
            assert_eq!(
                handle.await.unwrap().unwrap().status,
                FavoriteStatus::Synced
            );
        }
    }

    #[tokio::test]
    async fn test_sync_favorites_and_reconcile_counts() {
        let catalog = catalog();
        let engagement = Arc::new(InMemoryEngagementService::new());
        let alice = session();
        engagement.set_favorite(PromptId(251), &alice, true).await.unwrap();
        engagement.increment_copy_count(PromptId(251)).await.unwrap();

        let tracker = EngagementTracker::new(
            catalog.clone(),
            engagement.clone(),
            Arc::new(FakeClipboard::default()),
        );

        assert_eq!(tracker.sync_favorites(&alice).await.unwrap(), 1);
        assert!(tracker.is_favorite(PromptId(251), "alice").await);
        assert_eq!(tracker.reconcile_counts().await.unwrap(), 1);
        let prompt = catalog.get(PromptId(251)).await.unwrap();
        assert_eq!(prompt.copy_count(), 1);
        assert_eq!(prompt.favorite_count(), 1);

        // The next toggle starts from server truth and removes the favorite
        let outcome = tracker
            .toggle_favorite(PromptId(251), Some(&alice))
            .await
            .unwrap();
        assert!(!outcome.favorited);
        assert_eq!(outcome.favorite_count, 0);
        assert!(engagement.list_favorites(&alice).await.unwrap().is_empty());
    }
}
