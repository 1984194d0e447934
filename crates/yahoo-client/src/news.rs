use analysis_core::RawNewsItem;
use chrono::DateTime;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub news: Vec<SearchNewsItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchNewsItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Unix seconds
    #[serde(default)]
    pub provider_publish_time: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl From<SearchNewsItem> for RawNewsItem {
    fn from(item: SearchNewsItem) -> Self {
        RawNewsItem {
            title: item.title,
            source: item.publisher,
            published_at: item
                .provider_publish_time
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            url: item.link,
            summary: item.summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_news_conversion() {
        let response: SearchResponse = serde_json::from_value(json!({
            "quotes": [],
            "news": [
                {
                    "uuid": "a1",
                    "title": "Apple beats earnings expectations",
                    "publisher": "Reuters",
                    "link": "https://example.com/a1",
                    "providerPublishTime": 1704240000,
                    "type": "STORY"
                },
                { "uuid": "a2" }
            ]
        }))
        .unwrap();

        let items: Vec<RawNewsItem> = response.news.into_iter().map(RawNewsItem::from).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source.as_deref(), Some("Reuters"));
        assert_eq!(items[0].published_at.unwrap().timestamp(), 1704240000);
        assert!(items[0].summary.is_none());
        assert!(items[1].title.is_none());
        assert!(items[1].published_at.is_none());
    }

    #[test]
    fn test_missing_news_array() {
        let response: SearchResponse = serde_json::from_value(json!({ "quotes": [] })).unwrap();
        assert!(response.news.is_empty());
    }
}
