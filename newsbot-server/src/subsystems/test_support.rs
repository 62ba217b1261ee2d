//! In-memory provider stubs shared by the subsystem and pipeline unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use newsbot_core::completion::{CompletionBackend, CompletionError};
use newsbot_core::embeddings::{EmbeddingBackend, EmbeddingError};
use newsbot_core::models::{Article, EmbeddedArticle, SimilarityResult};
use newsbot_core::news::{render_link, NewsError, NewsSource, RawNewsRecord};
use newsbot_core::store::{ArticleStore, StoreError, StoreHealth};

pub const TEST_LINK_TEMPLATE: &str = "https://news.test/{docid}";

pub fn article(link: &str, body: &str) -> Article {
    Article {
        title: format!("제목 {}", link),
        article: body.to_string(),
        date: "2024-05-01".to_string(),
        link: link.to_string(),
    }
}

pub fn raw_record(title: &str, contents: &str, docid: &str) -> RawNewsRecord {
    RawNewsRecord {
        title: Some(title.to_string()),
        contents: Some(contents.to_string()),
        date: Some("2024-05-01".to_string()),
        docid: Some(docid.to_string()),
    }
}

pub fn similarity(link: &str, score: f64) -> SimilarityResult {
    SimilarityResult {
        link: link.to_string(),
        similarity: score,
    }
}

// ----------------------------------------------------------------------------

pub struct StubCompletion {
    answer: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl StubCompletion {
    pub fn ok(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for StubCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer.clone().ok_or(CompletionError::Api {
            code: 503,
            message: "stub unavailable".to_string(),
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

// ----------------------------------------------------------------------------

pub struct StubNews {
    records: Option<Vec<RawNewsRecord>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl StubNews {
    pub fn ok(records: Vec<RawNewsRecord>) -> Self {
        Self {
            records: Some(records),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            records: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsSource for StubNews {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<RawNewsRecord>, NewsError> {
        self.calls.lock().unwrap().push((query.to_string(), limit));
        self.records.clone().ok_or(NewsError::Api {
            code: 502,
            message: "stub transport failure".to_string(),
        })
    }

    fn link_for(&self, docid: &str) -> String {
        render_link(TEST_LINK_TEMPLATE, docid)
    }
}

// ----------------------------------------------------------------------------

pub struct StubEmbedder {
    dimensions: usize,
    fail_on: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl StubEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail_on: None,
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }

    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Some(Duration::from_millis(ms));
        self
    }

    /// Deterministic vector derived from the text.
    pub fn vector_for(text: &str, dimensions: usize) -> Vec<f32> {
        let seed: usize = text.bytes().map(usize::from).sum();
        (0..dimensions)
            .map(|i| ((seed + i) % 13) as f32 / 13.0)
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingBackend for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on.as_deref() == Some(text) {
            return Err(EmbeddingError::Api {
                code: 500,
                message: "stub embedding failure".to_string(),
            });
        }
        Ok(Self::vector_for(text, self.dimensions))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "stub"
    }
}

// ----------------------------------------------------------------------------

pub struct StubStore {
    results: Vec<SimilarityResult>,
    fail_writes: bool,
    fail_reads: bool,
    persisted: Mutex<Vec<Vec<EmbeddedArticle>>>,
    match_queries: Mutex<Vec<(Vec<f32>, f64, u32)>>,
}

impl StubStore {
    pub fn new(results: Vec<SimilarityResult>) -> Self {
        Self {
            results,
            fail_writes: false,
            fail_reads: false,
            persisted: Mutex::new(Vec::new()),
            match_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn persisted(&self) -> Vec<Vec<EmbeddedArticle>> {
        self.persisted.lock().unwrap().clone()
    }

    pub fn match_queries(&self) -> Vec<(Vec<f32>, f64, u32)> {
        self.match_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleStore for StubStore {
    async fn persist(&self, articles: &[EmbeddedArticle]) -> Result<u64, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.persisted.lock().unwrap().push(articles.to_vec());
        Ok(articles.len() as u64)
    }

    async fn match_articles(
        &self,
        query_embedding: Vec<f32>,
        threshold: f64,
        match_count: u32,
    ) -> Result<Vec<SimilarityResult>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        self.match_queries
            .lock()
            .unwrap()
            .push((query_embedding, threshold, match_count));
        Ok(self.results.clone())
    }

    async fn health(&self) -> Result<StoreHealth, StoreError> {
        Ok(StoreHealth {
            postgresql: "PostgreSQL 16 (stub)".to_string(),
            pgvector: "0.7.0".to_string(),
        })
    }
}
