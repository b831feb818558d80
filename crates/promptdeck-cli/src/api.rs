//! PromptDeck API Client
//!
//! Talks to `promptdeck-server`. Implements the engagement and content
//! ports so the tracker and catalog service can run against the server.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use promptdeck::{
    ContentSource, DomainError, EngagementCounts, EngagementService, Prompt, PromptId, UserSession,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// API Client for PromptDeck
pub struct PromptDeckClient {
    client: Client,
    base_url: String,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct CountsResponse {
    pub prompt_id: u32,
    pub copy_count: u64,
    pub favorite_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteEntry {
    pub prompt_id: u32,
}

#[derive(Debug, Serialize)]
pub struct FavoriteRequest {
    pub favorite: bool,
}

impl From<CountsResponse> for EngagementCounts {
    fn from(resp: CountsResponse) -> Self {
        Self {
            prompt_id: PromptId(resp.prompt_id),
            copy_count: resp.copy_count,
            favorite_count: resp.favorite_count,
        }
    }
}

impl PromptDeckClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// Full catalog with both locales
    pub async fn fetch_catalog(&self) -> Result<Vec<Prompt>> {
        let resp = self
            .client
            .get(self.url("/catalog"))
            .send()
            .await
            .context("Failed to connect to PromptDeck API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse catalog")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DomainError> {
        let resp = request.send().await.map_err(|e| {
            DomainError::ExternalService(format!("Failed to connect to PromptDeck API: {e}"))
        })?;

        match resp.status() {
            status if status.is_success() => Ok(resp),
            StatusCode::UNAUTHORIZED => Err(DomainError::Unauthenticated),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(DomainError::ExternalService(format!(
                    "API error ({status}): {body}"
                )))
            }
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DomainError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl ContentSource for PromptDeckClient {
    async fn load(&self) -> Result<Vec<Prompt>, DomainError> {
        self.fetch_catalog()
            .await
            .map_err(|e| DomainError::Content(format!("{e:#}")))
    }
}

#[async_trait]
impl EngagementService for PromptDeckClient {
    async fn increment_copy_count(&self, prompt_id: PromptId) -> Result<(), DomainError> {
        let request = self
            .client
            .post(self.url(&format!("/prompts/{prompt_id}/copy")));
        self.send(request).await?;
        Ok(())
    }

    async fn set_favorite(
        &self,
        prompt_id: PromptId,
        session: &UserSession,
        desired: bool,
    ) -> Result<(), DomainError> {
        let request = self
            .client
            .put(self.url(&format!("/prompts/{prompt_id}/favorite")))
            .bearer_auth(&session.token)
            .json(&FavoriteRequest { favorite: desired });
        self.send(request).await?;
        Ok(())
    }

    async fn list_favorites(&self, session: &UserSession) -> Result<Vec<PromptId>, DomainError> {
        let request = self
            .client
            .get(self.url("/favorites"))
            .bearer_auth(&session.token);
        let favorites: Vec<FavoriteEntry> = self.send_json(request).await?;
        Ok(favorites
            .into_iter()
            .map(|entry| PromptId(entry.prompt_id))
            .collect())
    }

    async fn fetch_counts(&self) -> Result<Vec<EngagementCounts>, DomainError> {
        let counts: Vec<CountsResponse> =
            self.send_json(self.client.get(self.url("/engagement"))).await?;
        Ok(counts.into_iter().map(EngagementCounts::from).collect())
    }
}
