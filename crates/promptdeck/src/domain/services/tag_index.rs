//! TagIndex - Tag to prompt lookup
//!
//! A derived view over the catalog. It has no lifecycle of its own and
//! must be rebuilt whenever the prompt collection changes.

use std::collections::{BTreeSet, HashMap};

use crate::domain::entities::{Prompt, PromptId};

/// Mapping from tag to the ids of the prompts carrying it
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    by_tag: HashMap<String, BTreeSet<PromptId>>,
}

impl TagIndex {
    /// Build the index in one pass over every tag occurrence
    pub fn build<'a, I>(prompts: I) -> Self
    where
        I: IntoIterator<Item = &'a Prompt>,
    {
        let mut by_tag: HashMap<String, BTreeSet<PromptId>> = HashMap::new();
        for prompt in prompts {
            for tag in &prompt.tags {
                by_tag.entry(tag.clone()).or_default().insert(prompt.id);
            }
        }
        Self { by_tag }
    }

    /// Prompts carrying `tag`; empty for a tag nobody uses
    pub fn query(&self, tag: &str) -> BTreeSet<PromptId> {
        self.by_tag.get(tag).cloned().unwrap_or_default()
    }

    /// Prompts carrying at least one of `tags`
    pub fn query_any<I, S>(&self, tags: I) -> BTreeSet<PromptId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids = BTreeSet::new();
        for tag in tags {
            if let Some(set) = self.by_tag.get(tag.as_ref()) {
                ids.extend(set.iter().copied());
            }
        }
        ids
    }

    /// Prompts carrying every one of `tags`
    ///
    /// An empty tag list yields an empty set; callers treat "no tags
    /// selected" as "no constraint" before reaching the index.
    pub fn query_all<I, S>(&self, tags: I) -> BTreeSet<PromptId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result: Option<BTreeSet<PromptId>> = None;
        for tag in tags {
            let set = match self.by_tag.get(tag.as_ref()) {
                Some(set) => set,
                None => return BTreeSet::new(),
            };
            result = Some(match result {
                None => set.clone(),
                Some(acc) => acc.intersection(set).copied().collect(),
            });
        }
        result.unwrap_or_default()
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Every tag with the number of prompts carrying it, sorted by tag
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .by_tag
            .iter()
            .map(|(tag, ids)| (tag.clone(), ids.len()))
            .collect();
        counts.sort_by(|a, b| a.0.cmp(&b.0));
        counts
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}
