//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the catalog state and external services.

mod catalog_service;
mod engagement_tracker;

pub use catalog_service::CatalogService;
pub use engagement_tracker::{
    CopiedAck, CopyOutcome, CopySync, EngagementTracker, FavoriteOutcome, TrackerConfig,
    COPIED_ACK_WINDOW,
};
