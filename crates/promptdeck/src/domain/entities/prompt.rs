//! Prompt - A reusable chat prompt with bilingual content
//!
//! Pure domain entity without infrastructure dependencies.
//! Content fields are fixed once the catalog is built; only the
//! engagement counters change, and only from inside this crate.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::Locale;

/// Stable prompt identifier assigned by the content source
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct PromptId(pub u32);

impl std::fmt::Display for PromptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PromptId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(PromptId)
            .map_err(|_| format!("Invalid prompt id: {}", s))
    }
}

impl From<u32> for PromptId {
    fn from(id: u32) -> Self {
        PromptId(id)
    }
}

/// Text in the native locale plus its fallback translation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedText {
    pub native: String,
    pub fallback: String,
}

impl LocalizedText {
    pub fn new(native: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            native: native.into(),
            fallback: fallback.into(),
        }
    }

    /// Pick the variant for a locale
    pub fn get(&self, locale: Locale) -> &str {
        if locale.is_native() {
            &self.native
        } else {
            &self.fallback
        }
    }
}

/// Prompt - A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prompt {
    pub id: PromptId,
    pub title: LocalizedText,
    pub body: LocalizedText,
    /// Plain-language restatement of the native body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_body: Option<String>,
    pub remark: LocalizedText,
    /// Display order is insertion order
    #[serde(default)]
    pub tags: Vec<String>,
    /// Popularity score, used as the default sort key
    #[serde(default)]
    pub weight: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    copy_count: u64,
    #[serde(default)]
    favorite_count: u64,
}

impl Prompt {
    /// Create a prompt with no tags, zero weight and zero counters
    pub fn new(id: PromptId, title: LocalizedText, body: LocalizedText, remark: LocalizedText) -> Self {
        Self {
            id,
            title,
            body,
            alternate_body: None,
            remark,
            tags: Vec::new(),
            weight: 0,
            website: None,
            copy_count: 0,
            favorite_count: 0,
        }
    }

    /// Set the native plain-language restatement
    pub fn with_alternate_body(mut self, alternate: impl Into<String>) -> Self {
        self.alternate_body = Some(alternate.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_weight(mut self, weight: u64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// Seed engagement counters from the content source
    pub fn with_counts(mut self, copy_count: u64, favorite_count: u64) -> Self {
        self.copy_count = copy_count;
        self.favorite_count = favorite_count;
        self
    }

    pub fn copy_count(&self) -> u64 {
        self.copy_count
    }

    pub fn favorite_count(&self) -> u64 {
        self.favorite_count
    }

    /// The alternate body, if a non-blank one exists
    pub fn alternate(&self) -> Option<&str> {
        self.alternate_body
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    pub fn has_alternate(&self) -> bool {
        self.alternate().is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Check the content invariants
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.native.trim().is_empty() {
            return Err(DomainError::Validation(format!(
                "prompt {} has an empty native title",
                self.id
            )));
        }
        if self.body.native.trim().is_empty() {
            return Err(DomainError::Validation(format!(
                "prompt {} has an empty native body",
                self.id
            )));
        }
        Ok(())
    }

    pub(crate) fn increment_copy_count(&mut self) -> u64 {
        self.copy_count = self.copy_count.saturating_add(1);
        self.copy_count
    }

    pub(crate) fn adjust_favorite_count(&mut self, favorited: bool) -> u64 {
        self.favorite_count = if favorited {
            self.favorite_count.saturating_add(1)
        } else {
            self.favorite_count.saturating_sub(1)
        };
        self.favorite_count
    }

    pub(crate) fn set_counts(&mut self, copy_count: u64, favorite_count: u64) {
        self.copy_count = copy_count;
        self.favorite_count = favorite_count;
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Small catalog modelled on real entries
    pub fn sample_prompts() -> Vec<Prompt> {
        vec![
            Prompt::new(
                PromptId(5),
                LocalizedText::new("充当英语翻译和改进者", "Act as an English Translator and Improver"),
                LocalizedText::new(
                    "I want you to act as an English translator, spelling corrector and improver.",
                    "I want you to act as an English translator, spelling corrector and improver.",
                ),
                LocalizedText::new("将其他语言翻译成英文。", "Translate other languages into English."),
            )
            .with_alternate_body("我希望你能担任英语翻译、拼写校对和修辞改进的角色。")
            .with_tags(["ai"])
            .with_weight(1173),
            Prompt::new(
                PromptId(214),
                LocalizedText::new("调研报告助手", "Research Report"),
                LocalizedText::new(
                    "Please write a research report on a topic of [主题]. Respond in Chinese.",
                    "Please write a research report on a topic of [Topic].",
                ),
                LocalizedText::new("来自 @b3ue 的投稿。", "Contributed by @b3ue."),
            )
            .with_alternate_body("请根据以下提示撰写一份【报告主题】调研报告。")
            .with_tags(["contribute", "article"])
            .with_weight(1837),
            Prompt::new(
                PromptId(251),
                LocalizedText::new("写作标题生成器", "Article Title Generator"),
                LocalizedText::new(
                    "I want you to act as a title generator for written pieces. Respond in Chinese.",
                    "I want you to act as a title generator for written pieces.",
                ),
                LocalizedText::new("个人使用的提示词。", "Personal prompt."),
            )
            .with_tags(["contribute", "article"])
            .with_weight(2400),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(title: &str, body: &str) -> Prompt {
        Prompt::new(
            PromptId(1),
            LocalizedText::new(title, "Title"),
            LocalizedText::new(body, "Body"),
            LocalizedText::default(),
        )
    }

    #[test]
    fn test_validate_requires_native_title_and_body() {
        assert!(prompt("标题", "内容").validate().is_ok());
        assert!(matches!(
            prompt("  ", "内容").validate(),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            prompt("标题", "").validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_blank_alternate_is_absent() {
        let p = prompt("标题", "内容").with_alternate_body("   ");
        assert!(!p.has_alternate());
        assert_eq!(p.alternate(), None);
    }

    #[test]
    fn test_favorite_count_never_underflows() {
        let mut p = prompt("标题", "内容");
        assert_eq!(p.adjust_favorite_count(false), 0);
        assert_eq!(p.adjust_favorite_count(true), 1);
        assert_eq!(p.increment_copy_count(), 1);
    }

    #[test]
    fn test_prompt_id_parse() {
        assert_eq!("214".parse::<PromptId>(), Ok(PromptId(214)));
        assert!("abc".parse::<PromptId>().is_err());
    }
}
