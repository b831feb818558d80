//! JSON Content Source
//!
//! Loads prompts from a JSON array on disk. Two document shapes are
//! accepted: the nested per-language layout and the older flat layout
//! with `_en` suffixed fields. In both, Chinese is the native locale and
//! `description` / `desc_cn` holds the plain restatement.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, LocalizedText, Prompt, PromptId};
use crate::ports::ContentSource;

/// Native-language block of a nested document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeContent {
    pub title: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub remark: String,
}

/// Fallback-language block of a nested document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackContent {
    pub title: String,
    pub prompt: String,
    #[serde(default)]
    pub remark: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedDocument {
    pub id: PromptId,
    pub zh: NativeContent,
    pub en: FallbackContent,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub weight: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatDocument {
    pub id: PromptId,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_cn: Option<String>,
    #[serde(default)]
    pub remark: String,
    pub title_en: String,
    pub desc_en: String,
    #[serde(default)]
    pub remark_en: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub weight: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub count: u64,
}

/// One prompt as stored in a catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptDocument {
    Nested(NestedDocument),
    Flat(FlatDocument),
}

impl From<PromptDocument> for Prompt {
    fn from(doc: PromptDocument) -> Self {
        match doc {
            PromptDocument::Nested(doc) => {
                let mut prompt = Prompt::new(
                    doc.id,
                    LocalizedText::new(doc.zh.title, doc.en.title),
                    LocalizedText::new(doc.zh.prompt, doc.en.prompt),
                    LocalizedText::new(doc.zh.remark, doc.en.remark),
                )
                .with_tags(doc.tags)
                .with_weight(doc.weight)
                .with_counts(doc.count, 0);
                prompt.alternate_body = doc.zh.description;
                prompt.website = doc.website;
                prompt
            }
            PromptDocument::Flat(doc) => {
                let mut prompt = Prompt::new(
                    doc.id,
                    LocalizedText::new(doc.title, doc.title_en),
                    LocalizedText::new(doc.description, doc.desc_en),
                    LocalizedText::new(doc.remark, doc.remark_en),
                )
                .with_tags(doc.tags)
                .with_weight(doc.weight)
                .with_counts(doc.count, 0);
                prompt.alternate_body = doc.desc_cn;
                prompt.website = doc.website;
                prompt
            }
        }
    }
}

/// Parse a catalog file's contents
pub fn parse_catalog(json: &str) -> Result<Vec<Prompt>, DomainError> {
    let docs: Vec<PromptDocument> = serde_json::from_str(json)
        .map_err(|e| DomainError::Content(format!("Failed to parse catalog: {e}")))?;
    Ok(docs.into_iter().map(Prompt::from).collect())
}

/// Content source backed by a JSON file
pub struct JsonContentSource {
    path: PathBuf,
}

impl JsonContentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContentSource for JsonContentSource {
    async fn load(&self) -> Result<Vec<Prompt>, DomainError> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::Content(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        let prompts = parse_catalog(&json)?;
        tracing::debug!(
            "Read {} prompt documents from {}",
            prompts.len(),
            self.path.display()
        );
        Ok(prompts)
    }
}
