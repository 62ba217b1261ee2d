use newsbot_core::models::EmbeddedArticle;
use newsbot_core::store::{ArticleStore, StoreError};

/// Persist the embedded batch with a single append. Write failures propagate.
pub async fn persist_articles(
    store: &dyn ArticleStore,
    articles: &[EmbeddedArticle],
) -> Result<u64, StoreError> {
    let written = store.persist(articles).await?;
    tracing::info!(rows = written, "Stored embedded articles");
    Ok(written)
}
