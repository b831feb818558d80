use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use promptdeck::{
    Catalog, CatalogService, ContentSource, InMemoryEngagementService, JsonContentSource,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod auth;
mod config;
mod error;
mod models;
mod routes;

use auth::SessionRegistry;
use config::ServerConfig;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub engagement: Arc<InMemoryEngagementService>,
    pub sessions: Arc<SessionRegistry>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "PromptDeck API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_router(state: AppState) -> Router {
    // Protected routes (require a bearer session)
    let protected_routes = routes::engagement::protected_router().layer(
        middleware::from_fn_with_state(state.sessions.clone(), auth::session_middleware),
    );

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(routes::prompt::router())
        .merge(routes::engagement::public_router())
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("PromptDeck API initializing...");

    let config = ServerConfig::from_env()?;

    let sessions = match config.sessions.as_deref() {
        Some(entries) => SessionRegistry::parse(entries)
            .map_err(anyhow::Error::msg)
            .context("Invalid PROMPTDECK_SESSIONS")?,
        None => {
            tracing::warn!("No PROMPTDECK_SESSIONS set - favorites are unavailable");
            SessionRegistry::default()
        }
    };
    tracing::info!("{} session token(s) registered", sessions.len());

    let source = JsonContentSource::new(&config.catalog_path);
    let prompts = source
        .load()
        .await
        .with_context(|| format!("Failed to load catalog from {}", source.path().display()))?;
    let engagement =
        InMemoryEngagementService::with_copy_counts(prompts.iter().map(|p| (p.id, p.copy_count())));
    let catalog = CatalogService::new(Catalog::new(prompts)?);
    tracing::info!("Catalog loaded: {} prompts", catalog.len().await);

    let state = AppState {
        catalog: Arc::new(catalog),
        engagement: Arc::new(engagement),
        sessions: Arc::new(sessions),
    };

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("PromptDeck API listening on {}", config.bind);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
