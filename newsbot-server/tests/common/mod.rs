//! Shared fixtures for the server integration tests: wiremock-backed
//! providers plus an in-memory article store.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use newsbot_core::completion::{AnthropicClient, CompletionConfig};
use newsbot_core::embeddings::{EmbeddingConfig, OpenAiEmbeddingClient};
use newsbot_core::models::{EmbeddedArticle, SimilarityResult};
use newsbot_core::news::{SearchApiClient, SearchApiConfig};
use newsbot_core::store::{ArticleStore, StoreError, StoreHealth};
use newsbot_server::pipeline::{Pipeline, PipelineSettings};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_DIMENSIONS: usize = 8;
pub const LINK_TEMPLATE: &str = "https://news.test/view/{docid}";

pub fn news_record(title: &str, contents: &str, docid: &str) -> serde_json::Value {
    json!({
        "TITLE": title,
        "REDUCE_CONTENTS": contents,
        "DATE": "20240501",
        "DOCID": docid,
    })
}

pub fn test_vector() -> Vec<f32> {
    (0..TEST_DIMENSIONS).map(|i| i as f32 / TEST_DIMENSIONS as f32).collect()
}

/// Mount a completion answer on `POST /v1/messages`.
pub async fn mount_completion(server: &MockServer, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-anthropic-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": answer }]
        })))
        .mount(server)
        .await;
}

/// Mount a news search result on `GET /search`.
pub async fn mount_news(server: &MockServer, records: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": records })))
        .mount(server)
        .await;
}

/// Mount a fixed embedding on `POST /embeddings`.
pub async fn mount_embeddings(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": test_vector() }]
        })))
        .mount(server)
        .await;
}

/// Build a pipeline whose three HTTP providers all point at `server`.
pub fn wiremock_pipeline(server: &MockServer, store: Arc<MemoryStore>) -> Pipeline {
    let completion = AnthropicClient::with_base_url(
        CompletionConfig::new(
            Some("test-anthropic-key".to_string()),
            "claude-test".to_string(),
            20,
        ),
        server.uri(),
    )
    .expect("Failed to create completion client");

    let news = SearchApiClient::new(SearchApiConfig {
        base_url: format!("{}/search", server.uri()),
        collection: "news".to_string(),
        link_template: LINK_TEMPLATE.to_string(),
    })
    .expect("Failed to create news client");

    let embedding = OpenAiEmbeddingClient::with_base_url(
        EmbeddingConfig::new(
            Some("test-openai-key".to_string()),
            "text-embedding-test".to_string(),
            TEST_DIMENSIONS,
        ),
        server.uri(),
    )
    .expect("Failed to create embedding client");

    Pipeline::new(
        Arc::new(completion),
        Arc::new(news),
        Arc::new(embedding),
        store,
        PipelineSettings::default(),
    )
}

// ----------------------------------------------------------------------------

/// In-memory store: records every batch and answers matches from a canned list.
pub struct MemoryStore {
    results: Vec<SimilarityResult>,
    fail_writes: bool,
    batches: Mutex<Vec<Vec<EmbeddedArticle>>>,
}

impl MemoryStore {
    pub fn new(links: &[(&str, f64)]) -> Self {
        Self {
            results: links
                .iter()
                .map(|(link, similarity)| SimilarityResult {
                    link: link.to_string(),
                    similarity: *similarity,
                })
                .collect(),
            fail_writes: false,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn batches(&self) -> Vec<Vec<EmbeddedArticle>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn persist(&self, articles: &[EmbeddedArticle]) -> Result<u64, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.batches.lock().unwrap().push(articles.to_vec());
        Ok(articles.len() as u64)
    }

    async fn match_articles(
        &self,
        _query_embedding: Vec<f32>,
        threshold: f64,
        match_count: u32,
    ) -> Result<Vec<SimilarityResult>, StoreError> {
        Ok(self
            .results
            .iter()
            .filter(|r| r.similarity > threshold)
            .take(match_count as usize)
            .cloned()
            .collect())
    }

    async fn health(&self) -> Result<StoreHealth, StoreError> {
        Ok(StoreHealth {
            postgresql: "PostgreSQL (memory)".to_string(),
            pgvector: "memory".to_string(),
        })
    }
}
