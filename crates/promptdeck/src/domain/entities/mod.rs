//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Prompt: Bilingual prompt content with engagement counters
//! - Catalog: The collection of prompts, unique by id
//! - Engagement: Sessions, counters and action outcomes

mod catalog;
mod engagement;
mod prompt;

pub use catalog::*;
pub use engagement::*;
pub use prompt::*;
