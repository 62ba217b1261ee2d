//! News fetcher: searches the remote engine and converts its records into
//! cleaned [`Article`]s. Transport failures degrade to an empty list.

use newsbot_core::models::Article;
use newsbot_core::news::NewsSource;

use crate::stage::Stage;

pub async fn fetch_news(source: &dyn NewsSource, query: &str, limit: u32) -> Vec<Article> {
    let records = Stage::Fetch.degrade(source.search(query, limit).await);
    let received = records.len();

    let articles: Vec<Article> = records
        .into_iter()
        .filter_map(|record| record.into_article(|docid| source.link_for(docid)))
        .collect();

    tracing::info!(
        query = %query,
        received,
        kept = articles.len(),
        "Fetched news articles"
    );
    articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystems::test_support::{raw_record, StubNews};

    #[tokio::test]
    async fn test_fetch_drops_untitled_records() {
        let source = StubNews::ok(vec![
            raw_record("<!HS>삼성전자<!HE> 신고가", "본문", "1"),
            raw_record("", "제목 없는 기사", "2"),
            raw_record("<!HS><!HE>", "마커만 있는 제목", "3"),
        ]);

        let articles = fetch_news(&source, "삼성전자", 20).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "삼성전자 신고가");
        assert_eq!(articles[0].link, "https://news.test/1");
    }

    #[tokio::test]
    async fn test_fetch_preserves_order_and_cleans_body() {
        let source = StubNews::ok(vec![
            raw_record("첫째", "a\n\n\nb", "10"),
            raw_record("둘째", "<h4>머리</h4>c", "11"),
        ]);

        let articles = fetch_news(&source, "q", 20).await;
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["첫째", "둘째"]);
        assert_eq!(articles[0].article, "a\nb");
        assert_eq!(articles[1].article, "c");
    }

    #[tokio::test]
    async fn test_fetch_passes_query_and_limit() {
        let source = StubNews::ok(vec![]);
        fetch_news(&source, "현대차 기아", 40).await;
        assert_eq!(source.calls(), vec![("현대차 기아".to_string(), 40)]);
    }

    #[tokio::test]
    async fn test_fetch_never_fails_on_transport_error() {
        let source = StubNews::failing();
        let articles = fetch_news(&source, "삼성전자", 20).await;
        assert!(articles.is_empty());
    }
}
