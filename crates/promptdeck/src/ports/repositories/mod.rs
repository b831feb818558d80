//! Repository Ports
//!
//! Abstract interfaces for loading catalog content.

mod content_source;

pub use content_source::*;
