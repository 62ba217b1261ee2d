pub mod completion;
pub mod config;
pub mod db;
pub mod embeddings;
pub mod error;
pub mod models;
pub mod news;
pub mod store;
pub mod text;

pub use completion::{AnthropicClient, CompletionBackend, CompletionConfig, CompletionError};
pub use config::NewsbotConfig;
pub use embeddings::{
    EmbeddingBackend, EmbeddingConfig, EmbeddingError, OpenAiEmbeddingClient, OPENAI_DIMENSIONS,
};
pub use error::NewsbotError;
pub use news::{NewsError, NewsSource, RawNewsRecord, SearchApiClient, SearchApiConfig};
pub use store::{ArticleStore, PgArticleStore, StoreError, StoreHealth};
