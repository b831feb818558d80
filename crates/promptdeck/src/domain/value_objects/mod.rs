//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod display_mode;
mod locale;
mod sort_key;
mod tag_match_mode;

pub use display_mode::*;
pub use locale::*;
pub use sort_key::*;
pub use tag_match_mode::*;
