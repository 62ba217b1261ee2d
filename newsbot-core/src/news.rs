//! Remote news search client.
//!
//! The search service returns engine records with upper-case field names
//! (`TITLE`, `REDUCE_CONTENTS`, `DATE`, `DOCID`); highlight markers and markup
//! are still embedded in the text fields. Cleaning happens in [`RawNewsRecord::into_article`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::Article;
use crate::text::clean_text;

/// Placeholder replaced with the record's document id in the link template.
pub const DOCID_PLACEHOLDER: &str = "{docid}";

pub fn render_link(template: &str, docid: &str) -> String {
    template.replace(DOCID_PLACEHOLDER, docid)
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Search for `query`, returning at most `limit` raw records from offset 0.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<RawNewsRecord>, NewsError>;

    /// Build the public article link for a document id.
    fn link_for(&self, docid: &str) -> String;
}

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API error ({code}): {message}")]
    Api { code: u16, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawNewsRecord {
    #[serde(rename = "TITLE", default)]
    pub title: Option<String>,
    #[serde(rename = "REDUCE_CONTENTS", default)]
    pub contents: Option<String>,
    #[serde(rename = "DATE", default)]
    pub date: Option<String>,
    #[serde(rename = "DOCID", default)]
    pub docid: Option<String>,
}

impl RawNewsRecord {
    /// Clean the text fields and attach the link. `None` when the cleaned title is empty.
    pub fn into_article(self, link_for: impl FnOnce(&str) -> String) -> Option<Article> {
        let title = clean_text(self.title.as_deref().unwrap_or_default());
        if title.trim().is_empty() {
            return None;
        }

        let docid = self.docid.unwrap_or_default();
        Some(Article {
            title,
            article: clean_text(self.contents.as_deref().unwrap_or_default()),
            date: clean_text(self.date.as_deref().unwrap_or_default()),
            link: link_for(&docid),
        })
    }
}

/// The engine answers either with a bare record array or wrapped in `result`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Bare(Vec<RawNewsRecord>),
    Wrapped {
        #[serde(default)]
        result: Vec<RawNewsRecord>,
    },
}

impl SearchResponse {
    fn into_records(self) -> Vec<RawNewsRecord> {
        match self {
            SearchResponse::Bare(records) => records,
            SearchResponse::Wrapped { result } => result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchApiConfig {
    pub base_url: String,
    pub collection: String,
    pub link_template: String,
}

#[derive(Debug, Clone)]
pub struct SearchApiClient {
    client: Client,
    config: SearchApiConfig,
}

impl SearchApiClient {
    pub fn new(config: SearchApiConfig) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl NewsSource for SearchApiClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<RawNewsRecord>, NewsError> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("query", query),
                ("collection", self.config.collection.as_str()),
                ("offset", "0"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NewsError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.into_records())
    }

    fn link_for(&self, docid: &str) -> String {
        render_link(&self.config.link_template, docid)
    }
}
