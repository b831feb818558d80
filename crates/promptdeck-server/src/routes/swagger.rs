//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    // Engagement models
    EngagementCountsResponse,
    FavoriteRequest,
    FavoriteResponse,
    FavoriteStateResponse,
    // Prompt models
    PromptListResponse,
    PromptResponse,
    TagResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Prompt endpoints
        super::prompt::list_prompts,
        super::prompt::get_prompt,
        super::prompt::list_tags,
        super::prompt::get_catalog,
        // Engagement endpoints
        super::engagement::record_copy,
        super::engagement::set_favorite,
        super::engagement::list_favorites,
        super::engagement::list_counts,
    ),
    info(
        title = "PromptDeck API",
        version = "0.1.0",
        description = "Bilingual prompt catalog with copy and favorite counters.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Prompt", description = "Prompt - Catalog reads in zh or en"),
        (name = "Engagement", description = "Engagement - Copy counts and per-user favorites"),
    ),
    components(
        schemas(
            // Prompt
            PromptResponse,
            PromptListResponse,
            TagResponse,
            // Engagement
            EngagementCountsResponse,
            FavoriteRequest,
            FavoriteResponse,
            FavoriteStateResponse,
        )
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
