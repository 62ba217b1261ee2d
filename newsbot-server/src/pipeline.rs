//! Request pipeline: keywords → fetch → embed → store → similarity → reply.
//!
//! Providers are injected as trait objects so the whole flow runs against
//! stubs in tests. Stage failures follow [`Stage::policy`].

use std::sync::Arc;

use newsbot_core::completion::{AnthropicClient, CompletionBackend, CompletionConfig};
use newsbot_core::embeddings::{EmbeddingBackend, EmbeddingError};
use newsbot_core::models::{ReplyEnvelope, SkillRequest};
use newsbot_core::news::{NewsSource, SearchApiClient, SearchApiConfig};
use newsbot_core::store::{ArticleStore, PgArticleStore, StoreError};
use newsbot_core::{NewsbotConfig, NewsbotError};
use sqlx::PgPool;
use thiserror::Error;

use crate::stage::Stage;
use crate::subsystems::retrieve::MatchParams;
use crate::subsystems::{embedder, ingest, keywords, news, respond, retrieve};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Embedding batch failed: {0}")]
    EmbeddingBatch(#[from] EmbeddingError),

    #[error("Storage write failed: {0}")]
    StorageWrite(#[from] StoreError),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl PipelineError {
    /// True when the caller sent a bad request rather than a provider failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::MalformedRequest(_))
    }
}

/// Tunable per-request parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub news_limit: u32,
    pub max_concurrency: usize,
    pub matching: MatchParams,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            news_limit: 20,
            max_concurrency: 8,
            matching: MatchParams::default(),
        }
    }
}

impl From<&NewsbotConfig> for PipelineSettings {
    fn from(config: &NewsbotConfig) -> Self {
        Self {
            news_limit: config.news.limit,
            max_concurrency: config.embedding.max_concurrency,
            matching: MatchParams {
                threshold: config.similarity.threshold,
                match_count: config.similarity.match_count,
            },
        }
    }
}

pub struct Pipeline {
    completion: Arc<dyn CompletionBackend>,
    news: Arc<dyn NewsSource>,
    embedder: Arc<dyn EmbeddingBackend>,
    store: Arc<dyn ArticleStore>,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        completion: Arc<dyn CompletionBackend>,
        news: Arc<dyn NewsSource>,
        embedder: Arc<dyn EmbeddingBackend>,
        store: Arc<dyn ArticleStore>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            completion,
            news,
            embedder,
            store,
            settings,
        }
    }

    /// Build the production providers from config. API keys come from the environment.
    pub fn from_config(config: &NewsbotConfig, pool: PgPool) -> Result<Self, NewsbotError> {
        let mut completion_config =
            CompletionConfig::new(None, config.keywords.model.clone(), config.keywords.max_tokens);
        completion_config.api_version = config.keywords.api_version.clone();
        let completion =
            AnthropicClient::with_base_url(completion_config, config.keywords.base_url.clone())?;

        let news = SearchApiClient::new(SearchApiConfig {
            base_url: config.news.base_url.clone(),
            collection: config.news.collection.clone(),
            link_template: config.news.link_template.clone(),
        })?;

        let embedding = embedder::create_backend_from_config(config)?;

        Ok(Self::new(
            Arc::new(completion),
            Arc::new(news),
            Arc::new(embedding),
            Arc::new(PgArticleStore::new(pool)),
            PipelineSettings::from(config),
        ))
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn ArticleStore {
        self.store.as_ref()
    }

    /// Validate the webhook payload, then run the pipeline on its utterance.
    pub async fn handle(&self, request: &SkillRequest) -> Result<ReplyEnvelope, PipelineError> {
        let utterance = request.utterance().ok_or_else(|| {
            PipelineError::MalformedRequest("userRequest.utterance is required".to_string())
        })?;
        self.run(utterance).await
    }

    pub async fn run(&self, utterance: &str) -> Result<ReplyEnvelope, PipelineError> {
        tracing::info!(utterance = %utterance, "Handling news search request");

        let keywords = keywords::extract_keywords(self.completion.as_ref(), utterance).await;

        let articles =
            news::fetch_news(self.news.as_ref(), &keywords, self.settings.news_limit).await;

        let embedded = Stage::Embed.abort(
            embedder::embed_articles(
                self.embedder.as_ref(),
                articles,
                self.settings.max_concurrency,
            )
            .await,
        )?;

        Stage::Store.abort(ingest::persist_articles(self.store.as_ref(), &embedded).await)?;

        let results = retrieve::find_similar(
            self.embedder.as_ref(),
            self.store.as_ref(),
            utterance,
            self.settings.matching,
        )
        .await;

        Ok(respond::format_reply(&results))
    }
}
