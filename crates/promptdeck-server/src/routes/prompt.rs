//! Prompt Routes - Catalog reads
//!
//! Counts in responses come from the engagement store, not the loaded
//! catalog, so they reflect copies and favorites recorded since startup.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use promptdeck::{CatalogFilter, Locale, Prompt, PromptId, SortKey};

use crate::error::ApiError;
use crate::models::{PromptListQuery, PromptListResponse, PromptQuery, PromptResponse, TagResponse};
use crate::AppState;

/// List prompts
#[utoipa::path(
    get,
    path = "/prompts",
    params(PromptListQuery),
    responses(
        (status = 200, description = "Matching prompts", body = PromptListResponse),
        (status = 400, description = "Invalid sort, match or mode")
    ),
    tag = "Prompt"
)]
pub async fn list_prompts(
    State(state): State<AppState>,
    Query(query): Query<PromptListQuery>,
) -> Result<Json<PromptListResponse>, ApiError> {
    let locale = query.locale();
    let mode = query.mode()?;
    let filter = query.to_filter()?;

    let total = state.catalog.count(&filter, locale).await;
    let prompts = state.catalog.query(&filter, locale).await;

    let mut items = Vec::with_capacity(prompts.len());
    for prompt in &prompts {
        let counts = state.engagement.counts_for(prompt.id).await;
        items.push(PromptResponse::new(prompt, locale, mode, counts));
    }

    Ok(Json(PromptListResponse {
        total,
        offset: filter.offset,
        items,
    }))
}

/// Get prompt by ID
#[utoipa::path(
    get,
    path = "/prompts/{id}",
    params(
        ("id" = u32, Path, description = "Prompt ID"),
        PromptQuery
    ),
    responses(
        (status = 200, description = "Prompt found", body = PromptResponse),
        (status = 404, description = "Prompt not found")
    ),
    tag = "Prompt"
)]
pub async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<PromptQuery>,
) -> Result<Json<PromptResponse>, ApiError> {
    let id = PromptId(id);
    let mode = query.mode()?;
    let prompt = state
        .catalog
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Prompt {id} not found")))?;
    let counts = state.engagement.counts_for(id).await;

    Ok(Json(PromptResponse::new(&prompt, query.locale(), mode, counts)))
}

/// List tags with prompt counts
#[utoipa::path(
    get,
    path = "/tags",
    responses(
        (status = 200, description = "Tags in name order", body = Vec<TagResponse>)
    ),
    tag = "Prompt"
)]
pub async fn list_tags(State(state): State<AppState>) -> Json<Vec<TagResponse>> {
    let tags = state
        .catalog
        .tag_counts()
        .await
        .into_iter()
        .map(|(tag, count)| TagResponse { tag, count })
        .collect();
    Json(tags)
}

/// Full catalog with live counters, in id order
#[utoipa::path(
    get,
    path = "/catalog",
    responses(
        (status = 200, description = "Every prompt with both locales and the alternate body")
    ),
    tag = "Prompt"
)]
pub async fn get_catalog(State(state): State<AppState>) -> Json<Vec<Prompt>> {
    let filter = CatalogFilter::default().with_sort(SortKey::IdAsc);
    let prompts = state.catalog.query(&filter, Locale::NATIVE).await;

    let mut catalog = Vec::with_capacity(prompts.len());
    for prompt in prompts {
        let counts = state.engagement.counts_for(prompt.id).await;
        catalog.push(prompt.with_counts(counts.copy_count, counts.favorite_count));
    }
    Json(catalog)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/prompts", get(list_prompts))
        .route("/prompts/:id", get(get_prompt))
        .route("/tags", get(list_tags))
        .route("/catalog", get(get_catalog))
}
