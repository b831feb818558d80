//! Clipboard Port
//!
//! Abstract interface for the system clipboard.

use crate::domain::errors::DomainError;

/// System clipboard interface
///
/// Implementations report refusals as `DomainError::ClipboardDenied`.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), DomainError>;
}
