//! Bounded, newest-first news list for a symbol.
//!
//! Sources deliver loosely-populated headlines; the aggregator fills every
//! display field (placeholders for anything missing), drops duplicate links,
//! orders by publication time and caps the list length.

use analysis_core::format::truncate;
use analysis_core::{AnalysisError, NewsItem, NewsSource, RawNewsItem, Symbol};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_MAX_ARTICLES: usize = 5;
/// Largest article count accepted from the command line or environment.
pub const MAX_ARTICLE_LIMIT: usize = 50;
pub const MAX_SUMMARY_CHARS: usize = 600;

pub const NO_TITLE: &str = "No title";
pub const UNKNOWN_SOURCE: &str = "Unknown";
pub const UNKNOWN_DATE: &str = "Unknown date";
pub const NO_URL: &str = "#";
pub const NO_SUMMARY: &str = "No summary available";

#[derive(Clone)]
pub struct NewsAggregator {
    source: Arc<dyn NewsSource>,
}

impl NewsAggregator {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self { source }
    }

    /// Fetch at most `max_articles` items, most recent first.
    /// An empty list is a valid answer; source failures are returned as errors.
    pub async fn fetch_news(&self, symbol: &Symbol, max_articles: usize) -> Result<Vec<NewsItem>, AnalysisError> {
        if max_articles == 0 {
            return Ok(Vec::new());
        }

        // Over-fetch a little: duplicates are dropped after the fact.
        let raw = self.source.fetch_headlines(symbol, max_articles.saturating_mul(2)).await?;
        let items = normalize(raw, max_articles);
        tracing::info!("Collected {} news articles for {}", items.len(), symbol);
        Ok(items)
    }
}

/// Deduplicate, order newest-first (unknown dates last) and bound the list.
pub fn normalize(raw: Vec<RawNewsItem>, max_articles: usize) -> Vec<NewsItem> {
    let mut seen_urls = HashSet::new();
    let mut unique: Vec<RawNewsItem> = raw
        .into_iter()
        .filter(|item| match clean(item.url.as_deref()) {
            Some(url) => seen_urls.insert(url.to_string()),
            None => true,
        })
        .collect();

    // `None` sorts below any date, so undated items land last. The sort is
    // stable: equal dates keep source order.
    unique.sort_by_key(|item| Reverse(item.published_at));

    unique
        .into_iter()
        .take(max_articles)
        .map(to_news_item)
        .collect()
}

fn to_news_item(raw: RawNewsItem) -> NewsItem {
    NewsItem {
        title: clean(raw.title.as_deref()).unwrap_or(NO_TITLE).to_string(),
        source: clean(raw.source.as_deref()).unwrap_or(UNKNOWN_SOURCE).to_string(),
        date: raw
            .published_at
            .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        url: clean(raw.url.as_deref()).unwrap_or(NO_URL).to_string(),
        summary: clean(raw.summary.as_deref())
            .map(|s| truncate(s, MAX_SUMMARY_CHARS))
            .unwrap_or_else(|| NO_SUMMARY.to_string()),
        published_at: raw.published_at,
    }
}

fn clean(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap())
    }

    fn raw(title: &str, url: &str, published_at: Option<DateTime<Utc>>) -> RawNewsItem {
        RawNewsItem {
            title: Some(title.to_string()),
            source: Some("Reuters".to_string()),
            published_at,
            url: Some(url.to_string()),
            summary: None,
        }
    }

    #[test]
    fn test_orders_most_recent_first_and_bounds() {
        let items = normalize(
            vec![
                raw("old", "https://x/1", at(1)),
                raw("undated", "https://x/2", None),
                raw("newest", "https://x/3", at(9)),
                raw("middle", "https://x/4", at(5)),
            ],
            3,
        );
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "middle", "old"]);
    }

    #[test]
    fn test_undated_items_sort_last() {
        let items = normalize(vec![raw("undated", "https://x/1", None), raw("dated", "https://x/2", at(3))], 5);
        assert_eq!(items[0].title, "dated");
        assert_eq!(items[1].title, "undated");
        assert_eq!(items[1].date, UNKNOWN_DATE);
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let items = normalize(
            vec![RawNewsItem {
                title: Some("   ".to_string()),
                ..Default::default()
            }],
            5,
        );
        let item = &items[0];
        assert_eq!(item.title, NO_TITLE);
        assert_eq!(item.source, UNKNOWN_SOURCE);
        assert_eq!(item.date, UNKNOWN_DATE);
        assert_eq!(item.url, NO_URL);
        assert_eq!(item.summary, NO_SUMMARY);
    }

    #[test]
    fn test_duplicate_urls_collapsed() {
        let items = normalize(
            vec![raw("a", "https://x/1", at(2)), raw("a again", "https://x/1", at(3))],
            5,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "a");
    }

    #[test]
    fn test_long_summary_truncated() {
        let mut item = raw("t", "https://x/1", at(1));
        item.summary = Some("word ".repeat(200));
        let items = normalize(vec![item], 5);
        assert!(items[0].summary.ends_with("..."));
        assert!(items[0].summary.chars().count() <= MAX_SUMMARY_CHARS + 3);
    }

    #[test]
    fn test_date_format() {
        let items = normalize(vec![raw("t", "https://x/1", at(14))], 5);
        assert_eq!(items[0].date, "2024-03-01 14:00 UTC");
    }

    struct StaticSource(Vec<RawNewsItem>);

    #[async_trait]
    impl NewsSource for StaticSource {
        async fn fetch_headlines(&self, _symbol: &Symbol, limit: usize) -> Result<Vec<RawNewsItem>, AnalysisError> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl NewsSource for FailingSource {
        async fn fetch_headlines(&self, _symbol: &Symbol, _limit: usize) -> Result<Vec<RawNewsItem>, AnalysisError> {
            Err(AnalysisError::ApiError("HTTP 503".to_string()))
        }
    }

    #[tokio::test]
    async fn test_fetch_news_bounded() {
        let source = StaticSource((0..12).map(|i| raw("t", &format!("https://x/{}", i), at(i))).collect());
        let aggregator = NewsAggregator::new(Arc::new(source));
        let symbol = Symbol::parse("AAPL").unwrap();

        let items = aggregator.fetch_news(&symbol, DEFAULT_MAX_ARTICLES).await.unwrap();
        assert_eq!(items.len(), DEFAULT_MAX_ARTICLES);
        assert!(items.windows(2).all(|w| w[0].published_at >= w[1].published_at));

        assert!(aggregator.fetch_news(&symbol, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_huge_limit_does_not_overflow() {
        let source = StaticSource((0..3).map(|i| raw("t", &format!("https://x/{}", i), at(i))).collect());
        let aggregator = NewsAggregator::new(Arc::new(source));
        let symbol = Symbol::parse("AAPL").unwrap();

        let items = aggregator.fetch_news(&symbol, usize::MAX).await.unwrap();
        assert_eq!(items.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_source_is_not_an_error() {
        let aggregator = NewsAggregator::new(Arc::new(StaticSource(Vec::new())));
        let symbol = Symbol::parse("BTC-USD").unwrap();
        assert!(aggregator.fetch_news(&symbol, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let aggregator = NewsAggregator::new(Arc::new(FailingSource));
        let symbol = Symbol::parse("AAPL").unwrap();
        assert!(aggregator.fetch_news(&symbol, 5).await.is_err());
    }
}
