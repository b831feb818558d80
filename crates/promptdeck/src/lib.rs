//! PromptDeck Domain Library
//!
//! Core types and interfaces for the PromptDeck prompt catalog.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Prompt, Catalog, UserSession)
//!   - `value_objects/`: Immutable value types (Locale, DisplayMode, SortKey, TagMatchMode)
//!   - `services/`: Pure domain services (TagIndex, LocalizationSelector, CatalogQuery)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Content loading interfaces
//!   - `services/`: External service interfaces (engagement, session, locale, clipboard)
//!
//! - **Application** (`application/`): Use cases over the ports
//!   - `CatalogService`: Catalog state, tag index, per-prompt display mode
//!   - `EngagementTracker`: Copy and favorite actions with optimistic updates
//!
//! - **Adapters** (`adapters/`): Implementations shared by the binaries
//!
//! # Usage
//!
//! ```rust,ignore
//! use promptdeck::{CatalogFilter, CatalogService, EngagementTracker, Locale};
//! ```

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use adapters::{parse_catalog, InMemoryEngagementService, JsonContentSource, PromptDocument};
pub use application::{
    CatalogService, CopiedAck, CopyOutcome, CopySync, EngagementTracker, FavoriteOutcome,
    TrackerConfig,
};
pub use domain::{
    Catalog, CatalogFilter, CatalogQuery, ClipboardStatus, DisplayMode, DomainError,
    EngagementCondition, EngagementCounts, FavoriteRecord, FavoriteStatus, Locale,
    LocalizationSelector, LocalizedText, Prompt, PromptDisplay, PromptId, SortKey, TagIndex,
    TagMatchMode, UserSession,
};
pub use ports::{Clipboard, ContentSource, EngagementService, LocaleProvider, SessionProvider};
