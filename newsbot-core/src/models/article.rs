use serde::{Deserialize, Serialize};

/// A cleaned news article as returned by the fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Body text.
    pub article: String,
    pub date: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedArticle {
    #[serde(flatten)]
    pub article: Article,
    pub embedding: Vec<f32>,
}

impl EmbeddedArticle {
    pub fn new(article: Article, embedding: Vec<f32>) -> Self {
        Self { article, embedding }
    }
}

/// One row returned by `match_news_articles`, best match first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SimilarityResult {
    pub link: String,
    pub similarity: f64,
}
