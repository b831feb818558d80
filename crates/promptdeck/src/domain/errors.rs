//! Domain Errors
//!
//! Error types for domain operations.

use thiserror::Error;

use crate::domain::entities::PromptId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Content source error: {0}")]
    Content(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Clipboard access denied: {0}")]
    ClipboardDenied(String),

    #[error("Authentication required")]
    Unauthenticated,
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: PromptId) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }
}
