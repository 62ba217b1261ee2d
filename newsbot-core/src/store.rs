//! Article store backed by PostgreSQL + pgvector.
//!
//! Writes are append-only bulk inserts into `news_articles`; reads go through the
//! `match_news_articles` SQL function (see `migrations/`).

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

use crate::models::{EmbeddedArticle, SimilarityResult};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("match_count {0} exceeds the SQL integer range")]
    MatchCountOutOfRange(u32),
}

/// Versions reported by the backing database.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreHealth {
    pub postgresql: String,
    pub pgvector: String,
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Append every record in one statement. Returns the number of rows written.
    async fn persist(&self, articles: &[EmbeddedArticle]) -> Result<u64, StoreError>;

    /// Nearest stored articles scoring above `threshold`, best first, at most `match_count`.
    async fn match_articles(
        &self,
        query_embedding: Vec<f32>,
        threshold: f64,
        match_count: u32,
    ) -> Result<Vec<SimilarityResult>, StoreError>;

    async fn health(&self) -> Result<StoreHealth, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn persist(&self, articles: &[EmbeddedArticle]) -> Result<u64, StoreError> {
        if articles.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO news_articles (title, article, date, link, embedding) ",
        );
        builder.push_values(articles, |mut row, a| {
            row.push_bind(a.article.title.as_str())
                .push_bind(a.article.article.as_str())
                .push_bind(a.article.date.as_str())
                .push_bind(a.article.link.as_str())
                .push_bind(Vector::from(a.embedding.clone()));
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn match_articles(
        &self,
        query_embedding: Vec<f32>,
        threshold: f64,
        match_count: u32,
    ) -> Result<Vec<SimilarityResult>, StoreError> {
        let limit =
            i32::try_from(match_count).map_err(|_| StoreError::MatchCountOutOfRange(match_count))?;
        let vector = Vector::from(query_embedding);

        let rows = sqlx::query_as::<_, SimilarityResult>(
            "SELECT link, similarity FROM match_news_articles($1::vector, $2, $3)",
        )
        .bind(&vector)
        .bind(threshold)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn health(&self) -> Result<StoreHealth, StoreError> {
        let postgresql = crate::db::health_check(&self.pool).await?;
        let pgvector = match crate::db::check_pgvector(&self.pool).await {
            Ok(v) => v,
            Err(e) => format!("unavailable: {}", e),
        };
        Ok(StoreHealth {
            postgresql,
            pgvector,
        })
    }
}
