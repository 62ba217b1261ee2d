//! Embedder subsystem: attaches an embedding vector to every fetched article
//!
//! This subsystem is responsible for:
//! - Building the embedding backend from the application config
//! - Embedding article bodies concurrently, at most `max_concurrency` in flight
//! - Failing the whole batch when any single call fails (no partial results)

use futures::stream::{self, StreamExt, TryStreamExt};
use newsbot_core::{
    embeddings::{
        EmbeddingBackend, EmbeddingConfig, EmbeddingError, OpenAiEmbeddingClient,
        OPENAI_DIMENSIONS,
    },
    models::{Article, EmbeddedArticle},
    NewsbotConfig,
};

/// Create the embedding backend from the application config.
///
/// Reads `OPENAI_API_KEY` from the environment.
pub fn create_backend_from_config(
    config: &NewsbotConfig,
) -> Result<OpenAiEmbeddingClient, EmbeddingError> {
    // news_articles.embedding is a vector(1536) column
    if config.embedding.dimensions as usize != OPENAI_DIMENSIONS {
        tracing::warn!(
            configured = config.embedding.dimensions,
            column = OPENAI_DIMENSIONS,
            "Embedding dimensions differ from the news_articles column; inserts will fail"
        );
    }

    let mut client_config = EmbeddingConfig::new(
        None,
        config.embedding.model.clone(),
        config.embedding.dimensions as usize,
    );
    client_config.max_retries = config.embedding.max_retries;
    client_config.retry_delay_ms = config.embedding.retry_delay_ms;

    OpenAiEmbeddingClient::with_base_url(client_config, config.embedding.base_url.clone())
}

/// Embed every article body, keeping article order.
///
/// All-or-nothing: the first failure is returned and no partial list is produced.
pub async fn embed_articles(
    backend: &dyn EmbeddingBackend,
    articles: Vec<Article>,
    max_concurrency: usize,
) -> Result<Vec<EmbeddedArticle>, EmbeddingError> {
    let total = articles.len();

    let embedded: Vec<EmbeddedArticle> = stream::iter(articles)
        .map(|article| async move {
            let embedding = backend.embed(&article.article).await?;
            Ok::<_, EmbeddingError>(EmbeddedArticle::new(article, embedding))
        })
        .buffered(max_concurrency.max(1))
        .try_collect()
        .await?;

    tracing::info!(
        backend = backend.name(),
        count = total,
        "Embedded article batch"
    );
    Ok(embedded)
}

/// Embed a single query text (the user's utterance).
pub async fn embed_query(
    backend: &dyn EmbeddingBackend,
    text: &str,
) -> Result<Vec<f32>, EmbeddingError> {
    backend.embed_query(text).await
}

// ============================================================================
// TESTS
// ============================================================================
