//! TagMatchMode - How selected tags combine in catalog filters

use serde::{Deserialize, Serialize};

/// Tag matching mode for catalog filtering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TagMatchMode {
    /// Match any of the selected tags (OR)
    #[default]
    Any,
    /// Match all of the selected tags (AND)
    All,
}

impl std::str::FromStr for TagMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" | "or" => Ok(TagMatchMode::Any),
            "all" | "and" => Ok(TagMatchMode::All),
            _ => Err(format!("Unknown tag match mode: {}", s)),
        }
    }
}
