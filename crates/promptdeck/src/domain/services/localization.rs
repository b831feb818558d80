//! LocalizationSelector - Picks the visible text of a prompt
//!
//! Resolution is total: every prompt, locale and mode combination has a
//! defined result, including prompts without an alternate body.

use serde::Serialize;

use crate::domain::entities::{Prompt, PromptId};
use crate::domain::value_objects::{DisplayMode, Locale};

/// Resolved, display-ready text of one prompt
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PromptDisplay {
    pub id: PromptId,
    pub locale: Locale,
    pub mode: DisplayMode,
    pub title: String,
    pub body: String,
    pub remark: String,
    /// Whether toggling would change the body
    pub can_toggle: bool,
}

/// Stateless resolver for bilingual prompt content
pub struct LocalizationSelector;

impl LocalizationSelector {
    /// Body text for `locale` and `mode`
    ///
    /// The fallback locale has no secondary variant, so `mode` only
    /// matters for the native locale. A missing alternate shows the
    /// primary body.
    pub fn resolve_body(prompt: &Prompt, locale: Locale, mode: DisplayMode) -> &str {
        if !locale.is_native() {
            return &prompt.body.fallback;
        }
        match mode {
            DisplayMode::Primary => &prompt.body.native,
            DisplayMode::Alternate => prompt.alternate().unwrap_or(prompt.body.native.as_str()),
        }
    }

    pub fn resolve_title(prompt: &Prompt, locale: Locale) -> &str {
        prompt.title.get(locale)
    }

    pub fn resolve_remark(prompt: &Prompt, locale: Locale) -> &str {
        prompt.remark.get(locale)
    }

    /// Whether the body can be toggled in `locale`
    pub fn can_toggle(prompt: &Prompt, locale: Locale) -> bool {
        locale.is_native() && prompt.has_alternate()
    }

    /// Next display mode after a toggle request
    ///
    /// A no-op for the fallback locale and for prompts without an
    /// alternate body; otherwise flips the mode.
    pub fn toggle_mode(prompt: &Prompt, locale: Locale, mode: DisplayMode) -> DisplayMode {
        if Self::can_toggle(prompt, locale) {
            mode.toggled()
        } else {
            mode
        }
    }

    pub fn render(prompt: &Prompt, locale: Locale, mode: DisplayMode) -> PromptDisplay {
        PromptDisplay {
            id: prompt.id,
            locale,
            mode,
            title: Self::resolve_title(prompt, locale).to_string(),
            body: Self::resolve_body(prompt, locale, mode).to_string(),
            remark: Self::resolve_remark(prompt, locale).to_string(),
            can_toggle: Self::can_toggle(prompt, locale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::fixtures::sample_prompts;

    #[test]
    fn test_native_primary_and_alternate() {
        let prompts = sample_prompts();
        let prompt = &prompts[1];
        assert_eq!(
            LocalizationSelector::resolve_body(prompt, Locale::Zh, DisplayMode::Primary),
            prompt.body.native
        );
        assert_eq!(
            LocalizationSelector::resolve_body(prompt, Locale::Zh, DisplayMode::Alternate),
            "请根据以下提示撰写一份【报告主题】调研报告。"
        );
    }

    #[test]
    fn test_fallback_locale_ignores_mode() {
        for prompt in sample_prompts() {
            let mut mode = DisplayMode::Primary;
            for _ in 0..3 {
                assert_eq!(
                    LocalizationSelector::resolve_body(&prompt, Locale::En, mode),
                    prompt.body.fallback
                );
                mode = LocalizationSelector::toggle_mode(&prompt, Locale::En, mode);
                assert_eq!(mode, DisplayMode::Primary);
            }
        }
    }

    #[test]
    fn test_toggle_twice_restores_text() {
        let prompts = sample_prompts();
        let prompt = &prompts[0];
        let start = DisplayMode::Primary;
        let once = LocalizationSelector::toggle_mode(prompt, Locale::Zh, start);
        let twice = LocalizationSelector::toggle_mode(prompt, Locale::Zh, once);
        assert_ne!(
            LocalizationSelector::resolve_body(prompt, Locale::Zh, once),
            LocalizationSelector::resolve_body(prompt, Locale::Zh, start)
        );
        assert_eq!(twice, start);
        assert_eq!(
            LocalizationSelector::resolve_body(prompt, Locale::Zh, twice),
            LocalizationSelector::resolve_body(prompt, Locale::Zh, start)
        );
    }

    #[test]
    fn test_missing_alternate_shows_primary() {
        let prompts = sample_prompts();
        let prompt = &prompts[2];
        assert!(!LocalizationSelector::can_toggle(prompt, Locale::Zh));
        assert_eq!(
            LocalizationSelector::resolve_body(prompt, Locale::Zh, DisplayMode::Alternate),
            prompt.body.native
        );
        assert_eq!(
            LocalizationSelector::toggle_mode(prompt, Locale::Zh, DisplayMode::Primary),
            DisplayMode::Primary
        );
    }

    #[test]
    fn test_render_titles_follow_locale() {
        let prompts = sample_prompts();
        let prompt = &prompts[1];
        let zh = LocalizationSelector::render(prompt, Locale::Zh, DisplayMode::Primary);
        let en = LocalizationSelector::render(prompt, Locale::En, DisplayMode::Primary);
        assert_eq!(zh.title, "调研报告助手");
        assert_eq!(en.title, "Research Report");
        assert_eq!(en.remark, "Contributed by @b3ue.");
        assert!(zh.can_toggle);
        assert!(!en.can_toggle);
    }
}
