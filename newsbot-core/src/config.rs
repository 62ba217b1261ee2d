use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::NewsbotError;

#[derive(Debug, Deserialize, Clone)]
pub struct NewsbotConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub keywords: KeywordsConfig,
    pub news: NewsConfig,
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Keyword extraction model (chat-completion provider).
#[derive(Debug, Deserialize, Clone)]
pub struct KeywordsConfig {
    pub model: String,
    #[serde(default = "default_keyword_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,
    #[serde(default = "default_completion_api_version")]
    pub api_version: String,
}

/// Remote news search endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct NewsConfig {
    pub base_url: String,
    pub collection: String,
    /// Article link template; `{docid}` is replaced with the record's document id.
    pub link_template: String,
    #[serde(default = "default_news_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimensions: u32,
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default)]
    pub max_retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimilarityConfig {
    pub threshold: f64,
    pub match_count: u32,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: 0.78,
            match_count: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

fn default_keyword_max_tokens() -> u32 {
    20
}

fn default_completion_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_completion_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_news_limit() -> u32 {
    20
}

fn default_embedding_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_concurrency() -> usize {
    8
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl NewsbotConfig {
    /// Load from a TOML file, then apply `NEWSBOT__SECTION__KEY` environment overrides.
    pub fn load(path: &str) -> Result<Self, NewsbotError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("NEWSBOT").separator("__"))
            .build()?;
        Ok(s.try_deserialize()?)
    }
}
