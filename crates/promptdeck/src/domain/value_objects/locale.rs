//! Locale - Active display language

use serde::{Deserialize, Serialize};

/// Display locale for prompt content
///
/// Prompt content is authored in Chinese (the native locale) with an
/// English fallback translation. Only the native locale carries the
/// alternate "plain restatement" of a prompt body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    /// The locale the catalog content was originally written in
    pub const NATIVE: Locale = Locale::Zh;

    pub fn is_native(self) -> bool {
        self == Self::NATIVE
    }

    /// Resolve a BCP 47 style tag such as `zh-CN` or `en-US`.
    ///
    /// Only the primary subtag is considered. Anything that is not the
    /// native language resolves to the fallback locale, so this never fails.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if primary == "zh" {
            Locale::Zh
        } else {
            Locale::En
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Zh => write!(f, "zh"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s.split(['-', '_']).next().unwrap_or_default();
        match primary.to_lowercase().as_str() {
            "zh" => Ok(Locale::Zh),
            "en" => Ok(Locale::En),
            _ => Err(format!("Unknown locale: {}", s)),
        }
    }
}
