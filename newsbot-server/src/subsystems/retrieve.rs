//! Retrieval subsystem: semantic search over stored news articles
//!
//! - Embeds the utterance through the embedding backend's query path
//! - Calls the store's similarity function with the threshold and match count
//! - Any failure degrades to an empty result ("no matches")

use newsbot_core::embeddings::EmbeddingBackend;
use newsbot_core::models::SimilarityResult;
use newsbot_core::store::ArticleStore;

use crate::stage::Stage;
use crate::subsystems::embedder;

/// Similarity search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchParams {
    /// Minimum similarity score (cosine, 0–1) for a stored article to qualify.
    pub threshold: f64,
    /// Maximum number of results.
    pub match_count: u32,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            threshold: 0.78,
            match_count: 5,
        }
    }
}

/// Find stored articles similar to `query`, best first.
pub async fn find_similar(
    backend: &dyn EmbeddingBackend,
    store: &dyn ArticleStore,
    query: &str,
    params: MatchParams,
) -> Vec<SimilarityResult> {
    let query_vector = match embedder::embed_query(backend, query).await {
        Ok(v) => v,
        Err(e) => {
            Stage::Similarity.report(&e);
            return Vec::new();
        }
    };

    let results = Stage::Similarity.degrade(
        store
            .match_articles(query_vector, params.threshold, params.match_count)
            .await,
    );

    tracing::info!(
        matches = results.len(),
        threshold = params.threshold,
        match_count = params.match_count,
        "Similarity search complete"
    );
    results
}
