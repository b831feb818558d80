//! SortKey - Ordering of catalog query results

use serde::{Deserialize, Serialize};

/// Sort order for catalog queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest weight first, equal weights by ascending id
    #[default]
    WeightDesc,
    /// Ascending prompt id
    IdAsc,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::WeightDesc => write!(f, "weight_desc"),
            SortKey::IdAsc => write!(f, "id_asc"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "weight_desc" | "weight" => Ok(SortKey::WeightDesc),
            "id_asc" | "id" => Ok(SortKey::IdAsc),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}
