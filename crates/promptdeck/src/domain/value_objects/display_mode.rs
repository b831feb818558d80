//! DisplayMode - Which variant of a prompt body is shown

use serde::{Deserialize, Serialize};

/// Two-state display toggle for a prompt body
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// The prompt text itself
    #[default]
    Primary,
    /// The plain-language restatement (native locale only)
    Alternate,
}

impl DisplayMode {
    /// Flip between the two modes
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Primary => DisplayMode::Alternate,
            DisplayMode::Alternate => DisplayMode::Primary,
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::Primary => write!(f, "primary"),
            DisplayMode::Alternate => write!(f, "alternate"),
        }
    }
}

impl std::str::FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" => Ok(DisplayMode::Primary),
            "alternate" => Ok(DisplayMode::Alternate),
            _ => Err(format!("Unknown display mode: {}", s)),
        }
    }
}
