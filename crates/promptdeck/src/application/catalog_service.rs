//! Catalog Application Service
//!
//! Owns the in-memory catalog, its tag index and the per-prompt display
//! mode. Everything outside this crate sees the catalog read-only; the
//! engagement counters are only written through `EngagementTracker`.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::{
    Catalog, CatalogFilter, CatalogQuery, DisplayMode, DomainError, EngagementCounts, Locale,
    LocalizationSelector, Prompt, PromptDisplay, PromptId, TagIndex,
};
use crate::ports::ContentSource;

struct CatalogState {
    catalog: Catalog,
    index: TagIndex,
    modes: HashMap<PromptId, DisplayMode>,
}

impl CatalogState {
    fn new(catalog: Catalog) -> Self {
        let index = TagIndex::build(catalog.prompts());
        Self {
            catalog,
            index,
            modes: HashMap::new(),
        }
    }

    fn mode(&self, id: PromptId) -> DisplayMode {
        self.modes.get(&id).copied().unwrap_or_default()
    }
}

/// Application service for catalog reads and display state
pub struct CatalogService {
    state: RwLock<CatalogState>,
}

impl CatalogService {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            state: RwLock::new(CatalogState::new(catalog)),
        }
    }

    /// Load, validate and index the prompts of a content source
    pub async fn from_source(source: &dyn ContentSource) -> Result<Self, DomainError> {
        let prompts = source.load().await?;
        let catalog = Catalog::new(prompts)?;
        tracing::info!("Loaded catalog with {} prompts", catalog.len());
        Ok(Self::new(catalog))
    }

    /// Swap in a new prompt collection and rebuild the tag index
    ///
    /// Display modes survive for prompts that are still present.
    pub async fn replace(&self, prompts: Vec<Prompt>) -> Result<(), DomainError> {
        let catalog = Catalog::new(prompts)?;
        let mut state = self.state.write().await;
        let mut next = CatalogState::new(catalog);
        next.modes = std::mem::take(&mut state.modes)
            .into_iter()
            .filter(|(id, _)| next.catalog.contains(*id))
            .collect();
        *state = next;
        tracing::info!(
            "Catalog replaced: {} prompts, {} tags",
            state.catalog.len(),
            state.index.len()
        );
        Ok(())
    }

    /// Filtered, ordered snapshot of the catalog
    pub async fn query(&self, filter: &CatalogFilter, locale: Locale) -> Vec<Prompt> {
        let state = self.state.read().await;
        CatalogQuery::new(&state.catalog, &state.index).evaluate(filter, locale)
    }

    /// Number of matches for `filter`, ignoring offset and limit
    pub async fn count(&self, filter: &CatalogFilter, locale: Locale) -> usize {
        let state = self.state.read().await;
        CatalogQuery::new(&state.catalog, &state.index).count(filter, locale)
    }

    pub async fn get(&self, id: PromptId) -> Option<Prompt> {
        self.state.read().await.catalog.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.catalog.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.catalog.is_empty()
    }

    pub async fn tag_counts(&self) -> Vec<(String, usize)> {
        self.state.read().await.index.tag_counts()
    }

    pub async fn display_mode(&self, id: PromptId) -> DisplayMode {
        self.state.read().await.mode(id)
    }

    /// Toggle the body shown for a prompt
    ///
    /// Returns the new mode. Has no effect in the fallback locale or for
    /// prompts without an alternate body.
    pub async fn toggle_display(
        &self,
        id: PromptId,
        locale: Locale,
    ) -> Result<DisplayMode, DomainError> {
        let mut state = self.state.write().await;
        let current = state.mode(id);
        let prompt = state
            .catalog
            .get(id)
            .ok_or_else(|| DomainError::not_found("Prompt", id))?;
        let next = LocalizationSelector::toggle_mode(prompt, locale, current);
        if next != current {
            state.modes.insert(id, next);
        }
        Ok(next)
    }

    /// Visible text of a prompt in its current display mode
    pub async fn display(&self, id: PromptId, locale: Locale) -> Option<PromptDisplay> {
        let state = self.state.read().await;
        let prompt = state.catalog.get(id)?;
        Some(LocalizationSelector::render(prompt, locale, state.mode(id)))
    }

    /// Body text a copy action should place on the clipboard
    pub(crate) async fn display_body(&self, id: PromptId, locale: Locale) -> Option<String> {
        let state = self.state.read().await;
        let prompt = state.catalog.get(id)?;
        Some(LocalizationSelector::resolve_body(prompt, locale, state.mode(id)).to_string())
    }

    pub(crate) async fn increment_copy_count(&self, id: PromptId) -> Option<u64> {
        let mut state = self.state.write().await;
        state.catalog.get_mut(id).map(Prompt::increment_copy_count)
    }

    pub(crate) async fn adjust_favorite_count(&self, id: PromptId, favorited: bool) -> Option<u64> {
        let mut state = self.state.write().await;
        state
            .catalog
            .get_mut(id)
            .map(|prompt| prompt.adjust_favorite_count(favorited))
    }

    /// Overwrite counters with server values; unknown ids are skipped
    pub(crate) async fn apply_counts(&self, counts: &[EngagementCounts]) -> usize {
        let mut state = self.state.write().await;
        let mut applied = 0;
        for entry in counts {
            if let Some(prompt) = state.catalog.get_mut(entry.prompt_id) {
                prompt.set_counts(entry.copy_count, entry.favorite_count);
                applied += 1;
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::fixtures::sample_prompts;

    fn service() -> CatalogService {
        CatalogService::new(Catalog::new(sample_prompts()).unwrap())
    }

    #[tokio::test]
    async fn test_toggle_display_round_trip() {
        let service = service();
        let id = PromptId(214);
        let primary = service.display(id, Locale::Zh).await.unwrap();

        assert_eq!(
            service.toggle_display(id, Locale::Zh).await.unwrap(),
            DisplayMode::Alternate
        );
        let alternate = service.display(id, Locale::Zh).await.unwrap();
        assert_ne!(alternate.body, primary.body);

        service.toggle_display(id, Locale::Zh).await.unwrap();
        assert_eq!(service.display(id, Locale::Zh).await.unwrap(), primary);
    }

    #[tokio::test]
    async fn test_toggle_display_is_noop_in_fallback_locale() {
        let service = service();
        let id = PromptId(214);
        assert_eq!(
            service.toggle_display(id, Locale::En).await.unwrap(),
            DisplayMode::Primary
        );
        assert_eq!(service.display_mode(id).await, DisplayMode::Primary);
    }

    #[tokio::test]
    async fn test_toggle_unknown_prompt() {
        let service = service();
        assert!(matches!(
            service.toggle_display(PromptId(1), Locale::Zh).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_replace_rebuilds_index() {
        let service = service();
        service.toggle_display(PromptId(5), Locale::Zh).await.unwrap();

        let prompts = vec![sample_prompts()[0].clone().with_tags(["translation"])];
        service.replace(prompts).await.unwrap();

        assert_eq!(service.len().await, 1);
        assert_eq!(service.tag_counts().await, vec![("translation".to_string(), 1)]);
        let filter = CatalogFilter::default().with_tag("ai");
        assert!(service.query(&filter, Locale::Zh).await.is_empty());
        assert_eq!(service.display_mode(PromptId(5)).await, DisplayMode::Alternate);
    }

    #[tokio::test]
    async fn test_apply_counts_skips_unknown() {
        let service = service();
        let applied = service
            .apply_counts(&[
                EngagementCounts {
                    prompt_id: PromptId(5),
                    copy_count: 42,
                    favorite_count: 3,
                },
                EngagementCounts {
                    prompt_id: PromptId(999),
                    copy_count: 1,
                    favorite_count: 1,
                },
            ])
            .await;
        assert_eq!(applied, 1);
        let prompt = service.get(PromptId(5)).await.unwrap();
        assert_eq!(prompt.copy_count(), 42);
        assert_eq!(prompt.favorite_count(), 3);
    }
}
