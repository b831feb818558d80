//! Domain Services
//!
//! Stateless logic over domain entities:
//! - TagIndex: tag to prompt lookup
//! - LocalizationSelector: visible text for a locale and display mode
//! - CatalogQuery: filtered, ordered catalog views

mod catalog_query;
mod localization;
mod tag_index;

pub use catalog_query::*;
pub use localization::*;
pub use tag_index::*;
