//! Content Source Port
//!
//! Abstract interface for the system that supplies prompt content.
//! The catalog never writes back to it.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Prompt};

/// Supplier of the immutable prompt attribute set
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Load every prompt in display order
    async fn load(&self) -> Result<Vec<Prompt>, DomainError>;
}
