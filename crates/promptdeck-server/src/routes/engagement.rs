//! Engagement Routes - Copy and favorite counters

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use promptdeck::{CatalogFilter, EngagementService, Locale, PromptId, SortKey, UserSession};

use crate::error::ApiError;
use crate::models::{
    EngagementCountsResponse, FavoriteRequest, FavoriteResponse, FavoriteStateResponse,
};
use crate::AppState;

async fn ensure_prompt(state: &AppState, id: PromptId) -> Result<(), ApiError> {
    if state.catalog.get(id).await.is_some() {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("Prompt {id} not found")))
    }
}

/// Record a copy
#[utoipa::path(
    post,
    path = "/prompts/{id}/copy",
    params(
        ("id" = u32, Path, description = "Prompt ID")
    ),
    responses(
        (status = 200, description = "Copy recorded", body = EngagementCountsResponse),
        (status = 404, description = "Prompt not found")
    ),
    tag = "Engagement"
)]
pub async fn record_copy(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<EngagementCountsResponse>, ApiError> {
    let id = PromptId(id);
    ensure_prompt(&state, id).await?;

    state.engagement.increment_copy_count(id).await?;
    let counts = state.engagement.counts_for(id).await;
    tracing::debug!("Copy recorded for prompt {id} (total {})", counts.copy_count);

    Ok(Json(counts.into()))
}

/// Set the caller's favorite flag
#[utoipa::path(
    put,
    path = "/prompts/{id}/favorite",
    params(
        ("id" = u32, Path, description = "Prompt ID")
    ),
    request_body = FavoriteRequest,
    responses(
        (status = 200, description = "Favorite state stored", body = FavoriteStateResponse),
        (status = 401, description = "Missing or unknown session"),
        (status = 404, description = "Prompt not found")
    ),
    security(("bearer" = [])),
    tag = "Engagement"
)]
pub async fn set_favorite(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<u32>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<Json<FavoriteStateResponse>, ApiError> {
    let id = PromptId(id);
    ensure_prompt(&state, id).await?;

    state
        .engagement
        .set_favorite(id, &session, payload.favorite)
        .await?;
    let counts = state.engagement.counts_for(id).await;
    tracing::debug!(
        "User {} set favorite={} on prompt {id}",
        session.user_id,
        payload.favorite
    );

    Ok(Json(FavoriteStateResponse {
        prompt_id: id.0,
        favorited: payload.favorite,
        favorite_count: counts.favorite_count,
    }))
}

/// List the caller's favorites
#[utoipa::path(
    get,
    path = "/favorites",
    responses(
        (status = 200, description = "Favorites, newest first", body = Vec<FavoriteResponse>),
        (status = 401, description = "Missing or unknown session")
    ),
    security(("bearer" = [])),
    tag = "Engagement"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Json<Vec<FavoriteResponse>> {
    let favorites = state
        .engagement
        .favorites_of(&session.user_id)
        .await
        .into_iter()
        .map(FavoriteResponse::from)
        .collect();
    Json(favorites)
}

/// Counters for every prompt in the catalog
#[utoipa::path(
    get,
    path = "/engagement",
    responses(
        (status = 200, description = "Counters in id order", body = Vec<EngagementCountsResponse>)
    ),
    tag = "Engagement"
)]
pub async fn list_counts(State(state): State<AppState>) -> Json<Vec<EngagementCountsResponse>> {
    let filter = CatalogFilter::default().with_sort(SortKey::IdAsc);
    let prompts = state.catalog.query(&filter, Locale::NATIVE).await;

    let mut counts = Vec::with_capacity(prompts.len());
    for prompt in &prompts {
        counts.push(state.engagement.counts_for(prompt.id).await.into());
    }
    Json(counts)
}

/// Routes open to anonymous callers
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/prompts/:id/copy", post(record_copy))
        .route("/engagement", get(list_counts))
}

/// Routes behind the session middleware
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/prompts/:id/favorite", put(set_favorite))
        .route("/favorites", get(list_favorites))
}
