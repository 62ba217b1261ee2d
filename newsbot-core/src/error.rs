use thiserror::Error;

use crate::completion::CompletionError;
use crate::embeddings::EmbeddingError;
use crate::news::NewsError;

/// Startup-level errors (configuration, connections, provider construction).
#[derive(Error, Debug)]
pub enum NewsbotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Completion client error: {0}")]
    Completion(#[from] CompletionError),

    #[error("News search client error: {0}")]
    News(#[from] NewsError),

    #[error("Embedding client error: {0}")]
    Embedding(#[from] EmbeddingError),
}
