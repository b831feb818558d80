//! Adapters
//!
//! Port implementations shared by the server and the CLI.

mod json_content;
mod memory_engagement;

pub use json_content::*;
pub use memory_engagement::*;
