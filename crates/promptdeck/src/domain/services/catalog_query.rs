//! CatalogQuery - Filtered, ordered views over the catalog
//!
//! Tag membership, text search and the display window are independent
//! predicates. Tag membership runs first because it is answered by the
//! index; substring search only scans the survivors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Catalog, Prompt};
use crate::domain::services::{LocalizationSelector, TagIndex};
use crate::domain::value_objects::{DisplayMode, Locale, SortKey, TagMatchMode};

/// Filter options for a catalog query
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Selected tags; empty means no tag constraint
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// How selected tags combine
    #[serde(default)]
    pub tag_match: TagMatchMode,
    /// Case-insensitive substring over title and body of the active locale
    #[serde(default)]
    pub search_text: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
    /// Number of leading results to skip
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of results to return
    #[serde(default)]
    pub limit: Option<usize>,
}

impl CatalogFilter {
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_tag_match(mut self, mode: TagMatchMode) -> Self {
        self.tag_match = mode;
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_window(mut self, offset: usize, limit: Option<usize>) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// Lowercased search needle, if it constrains anything
    fn needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
    }
}

/// Read-only query over a catalog and its tag index
pub struct CatalogQuery<'a> {
    catalog: &'a Catalog,
    index: &'a TagIndex,
}

impl<'a> CatalogQuery<'a> {
    pub fn new(catalog: &'a Catalog, index: &'a TagIndex) -> Self {
        Self { catalog, index }
    }

    /// Evaluate `filter` against the catalog as seen in `locale`
    ///
    /// Returns owned copies; the catalog is never touched. Identical
    /// inputs always produce identical sequences.
    pub fn evaluate(&self, filter: &CatalogFilter, locale: Locale) -> Vec<Prompt> {
        let tagged = if filter.tags.is_empty() {
            None
        } else {
            Some(match filter.tag_match {
                TagMatchMode::Any => self.index.query_any(&filter.tags),
                TagMatchMode::All => self.index.query_all(&filter.tags),
            })
        };
        let needle = filter.needle();

        let mut matched: Vec<&Prompt> = self
            .catalog
            .prompts()
            .iter()
            .filter(|prompt| tagged.as_ref().map_or(true, |ids| ids.contains(&prompt.id)))
            .filter(|prompt| {
                needle
                    .as_deref()
                    .map_or(true, |needle| matches_text(prompt, locale, needle))
            })
            .collect();

        match filter.sort {
            SortKey::WeightDesc => {
                matched.sort_by(|a, b| b.weight.cmp(&a.weight).then(a.id.cmp(&b.id)))
            }
            SortKey::IdAsc => matched.sort_by_key(|prompt| prompt.id),
        }

        matched
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Number of prompts matching `filter`, ignoring the display window
    pub fn count(&self, filter: &CatalogFilter, locale: Locale) -> usize {
        let unbounded = CatalogFilter {
            offset: 0,
            limit: None,
            ..filter.clone()
        };
        self.evaluate(&unbounded, locale).len()
    }
}

fn matches_text(prompt: &Prompt, locale: Locale, needle: &str) -> bool {
    let title = LocalizationSelector::resolve_title(prompt, locale);
    let body = LocalizationSelector::resolve_body(prompt, locale, DisplayMode::Primary);
    title.to_lowercase().contains(needle) || body.to_lowercase().contains(needle)
}
