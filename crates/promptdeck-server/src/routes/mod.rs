//! PromptDeck API Routes
//!
//! - /prompts - Catalog reads (tag filter, search, sort, locale)
//! - /tags - Tag counts
//! - /catalog - Full catalog documents for clients that render locally
//! - /prompts/:id/copy - Copy counter
//! - /prompts/:id/favorite, /favorites - Per-user favorites (bearer session)
//! - /engagement - Counters for every prompt

pub mod engagement;
pub mod prompt;
pub mod swagger;
