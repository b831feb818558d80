//! Prompt - Catalog read models

use promptdeck::{
    CatalogFilter, DisplayMode, EngagementCounts, Locale, LocalizationSelector, Prompt, SortKey,
    TagMatchMode,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;

/// Catalog listing query
///
/// GET /prompts?tags=contribute,article&match=any&q=report&sort=weight_desc&locale=zh
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PromptListQuery {
    /// Comma-separated tags
    pub tags: Option<String>,
    /// How tags combine: any (default) or all
    #[serde(rename = "match")]
    pub tag_match: Option<String>,
    /// Case-insensitive text search over title and body
    pub q: Option<String>,
    /// weight_desc (default) or id_asc
    pub sort: Option<String>,
    /// Display locale such as zh or en-US (default zh)
    pub locale: Option<String>,
    /// primary (default) or alternate
    pub mode: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl PromptListQuery {
    pub fn locale(&self) -> Locale {
        self.locale
            .as_deref()
            .map(Locale::from_tag)
            .unwrap_or(Locale::NATIVE)
    }

    pub fn mode(&self) -> Result<DisplayMode, ApiError> {
        parse_mode(self.mode.as_deref())
    }

    pub fn to_filter(&self) -> Result<CatalogFilter, ApiError> {
        let tags = self
            .tags
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let tag_match: TagMatchMode = self
            .tag_match
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(ApiError::BadRequest)?
            .unwrap_or_default();

        let sort: SortKey = self
            .sort
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(ApiError::BadRequest)?
            .unwrap_or_default();

        Ok(CatalogFilter {
            tags,
            tag_match,
            search_text: self.q.clone(),
            sort,
            offset: self.offset.unwrap_or(0),
            limit: self.limit,
        })
    }
}

/// Single prompt query
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PromptQuery {
    /// Display locale such as zh or en-US (default zh)
    pub locale: Option<String>,
    /// primary (default) or alternate
    pub mode: Option<String>,
}

impl PromptQuery {
    pub fn locale(&self) -> Locale {
        self.locale
            .as_deref()
            .map(Locale::from_tag)
            .unwrap_or(Locale::NATIVE)
    }

    pub fn mode(&self) -> Result<DisplayMode, ApiError> {
        parse_mode(self.mode.as_deref())
    }
}

fn parse_mode(mode: Option<&str>) -> Result<DisplayMode, ApiError> {
    mode.map(str::parse)
        .transpose()
        .map_err(ApiError::BadRequest)
        .map(Option::unwrap_or_default)
}

/// A prompt resolved for display
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromptResponse {
    pub id: u32,
    /// Locale the text was resolved for
    pub locale: String,
    /// primary or alternate
    pub mode: String,
    pub title: String,
    pub body: String,
    pub remark: String,
    /// Whether an alternate body exists for this locale
    pub can_toggle: bool,
    pub tags: Vec<String>,
    pub weight: u64,
    pub website: Option<String>,
    pub copy_count: u64,
    pub favorite_count: u64,
}

impl PromptResponse {
    pub fn new(prompt: &Prompt, locale: Locale, mode: DisplayMode, counts: EngagementCounts) -> Self {
        let display = LocalizationSelector::render(prompt, locale, mode);
        Self {
            id: prompt.id.0,
            locale: locale.to_string(),
            mode: display.mode.to_string(),
            title: display.title,
            body: display.body,
            remark: display.remark,
            can_toggle: display.can_toggle,
            tags: prompt.tags.clone(),
            weight: prompt.weight,
            website: prompt.website.clone(),
            copy_count: counts.copy_count,
            favorite_count: counts.favorite_count,
        }
    }
}

/// A page of catalog results
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromptListResponse {
    /// Matches before offset and limit
    pub total: usize,
    pub offset: usize,
    pub items: Vec<PromptResponse>,
}

/// A tag with the number of prompts carrying it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TagResponse {
    pub tag: String,
    pub count: usize,
}
