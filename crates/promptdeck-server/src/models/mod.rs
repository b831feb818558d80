//! PromptDeck API Data Models
//!
//! - Prompt: Catalog reads in a chosen locale and display mode
//! - Engagement: Copy and favorite counters

mod engagement;
mod prompt;

pub use engagement::*;
pub use prompt::*;
