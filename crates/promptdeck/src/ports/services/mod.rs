//! Service Ports
//!
//! Abstract interfaces for external services.

mod clipboard;
mod engagement;
mod locale;
mod session;

pub use clipboard::*;
pub use engagement::*;
pub use locale::*;
pub use session::*;
