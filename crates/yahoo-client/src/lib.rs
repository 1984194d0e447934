use analysis_core::{
    AnalysisError, AssetKind, AssetMetadata, AssetOverview, FinancialMetrics, MarketDataProvider,
    NewsSource, Period, PriceSeries, RawNewsItem, Symbol,
};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

mod auth;
mod chart;
mod news;
mod quote_summary;

use auth::CrumbCache;
use chart::ChartEnvelope;
use news::SearchResponse;
use quote_summary::{QuoteSummary, SUMMARY_MODULES};

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const MAX_ATTEMPTS: u32 = 3;
const RATE_LIMIT_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// One quoteSummary round trip.
enum SummaryAttempt {
    Fetched(Option<QuoteSummary>),
    CrumbRejected,
}

/// Yahoo Finance client for price history, quote summaries and news search.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
    crumb: Arc<CrumbCache>,
}

impl YahooClient {
    pub fn new(config: YahooConfig) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            crumb: Arc::new(CrumbCache::default()),
        }
    }

    /// Send a request with automatic 429 retry.
    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, AnalysisError> {
        let request = builder.build().map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        for attempt in 0..MAX_ATTEMPTS {
            let req_clone = request.try_clone()
                .ok_or_else(|| AnalysisError::ApiError("Cannot clone request".to_string()))?;
            let response = self.client.execute(req_clone).await
                .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            let Some(wait) = retry_wait(attempt) else {
                break;
            };
            tracing::warn!(
                "Yahoo 429 rate limited, waiting {}s before retry {}/{}",
                wait.as_secs(),
                attempt + 1,
                MAX_ATTEMPTS - 1
            );
            tokio::time::sleep(wait).await;
        }

        Err(AnalysisError::ApiError(format!("Rate limited by Yahoo after {} attempts", MAX_ATTEMPTS)))
    }

    /// Get daily bars for a symbol
    pub async fn get_chart(&self, symbol: &Symbol, period: Period) -> Result<PriceSeries, AnalysisError> {
        let ticker = symbol.provider_ticker();
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let response = self.send_request(
            self.client.get(&url).query(&[("range", period.as_range()), ("interval", "1d")])
        ).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AnalysisError::SymbolNotFound(symbol.to_string()));
        }
        if !status.is_success() {
            return Err(AnalysisError::ApiError(format!(
                "Chart HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let envelope: ChartEnvelope = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        let bars = chart::bars_from_chart(envelope, symbol.as_str())?;
        tracing::debug!("Fetched {} bars for {} ({})", bars.len(), symbol, ticker);
        Ok(PriceSeries::new(bars))
    }

    /// Session crumb, fetched once and reused until Yahoo rejects it.
    async fn session_crumb(&self) -> Result<String, AnalysisError> {
        self.crumb.get_or_refresh(|| self.fetch_crumb()).await
    }

    /// Pick up the session cookie, then trade it for a crumb.
    async fn fetch_crumb(&self) -> Result<String, AnalysisError> {
        // Only the cookie matters here; the page itself is an error page.
        if let Err(e) = self
            .client
            .get(auth::COOKIE_URL)
            .header(header::REFERER, auth::REFERER)
            .send()
            .await
        {
            tracing::warn!("Yahoo cookie request failed: {}", e);
        }

        let url = format!("{}/v1/test/getcrumb", self.base_url);
        let response = self
            .send_request(self.client.get(&url).header(header::REFERER, auth::REFERER))
            .await?;
        let status = response.status();
        let body = response.text().await.map_err(|e| AnalysisError::ApiError(e.to_string()))?;
        if !status.is_success() {
            return Err(AnalysisError::ApiError(format!("getcrumb HTTP {}: {}", status, body)));
        }

        let crumb = auth::parse_crumb(&body)
            .ok_or_else(|| AnalysisError::ApiError("Yahoo returned no usable crumb".to_string()))?;
        tracing::debug!("Obtained Yahoo session crumb");
        Ok(crumb)
    }

    /// Get the quote summary modules for a symbol. `None` when Yahoo has no record.
    /// A rejected crumb is refreshed and the request retried once.
    async fn get_quote_summary(&self, symbol: &Symbol) -> Result<Option<QuoteSummary>, AnalysisError> {
        if let SummaryAttempt::Fetched(summary) = self.quote_summary_attempt(symbol).await? {
            return Ok(summary);
        }

        tracing::warn!("Yahoo rejected the session crumb, refreshing");
        self.crumb.invalidate().await;
        match self.quote_summary_attempt(symbol).await? {
            SummaryAttempt::Fetched(summary) => Ok(summary),
            SummaryAttempt::CrumbRejected => Err(AnalysisError::ApiError(
                "quoteSummary rejected a freshly issued crumb".to_string(),
            )),
        }
    }

    async fn quote_summary_attempt(&self, symbol: &Symbol) -> Result<SummaryAttempt, AnalysisError> {
        let crumb = self.session_crumb().await?;
        let url = format!(
            "{}/v10/finance/quoteSummary/{}",
            self.base_url,
            symbol.provider_ticker()
        );

        let response = self.send_request(
            self.client
                .get(&url)
                .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())])
        ).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(SummaryAttempt::Fetched(None));
        }
        let body = response.text().await.map_err(|e| AnalysisError::ApiError(e.to_string()))?;
        let json: Option<serde_json::Value> = serde_json::from_str(&body).ok();

        if status == StatusCode::UNAUTHORIZED
            || json.as_ref().is_some_and(quote_summary::is_crumb_rejection)
        {
            return Ok(SummaryAttempt::CrumbRejected);
        }
        if !status.is_success() {
            return Err(AnalysisError::ApiError(format!("quoteSummary HTTP {}: {}", status, body)));
        }

        let json = json.ok_or_else(|| AnalysisError::ApiError("quoteSummary body is not JSON".to_string()))?;
        QuoteSummary::from_response(&json).map(SummaryAttempt::Fetched)
    }

    /// Get recent news headlines for a symbol
    pub async fn search_news(&self, symbol: &Symbol, limit: usize) -> Result<Vec<RawNewsItem>, AnalysisError> {
        let url = format!("{}/v1/finance/search", self.base_url);
        let ticker = symbol.provider_ticker();
        let news_count = limit.to_string();

        let response = self.send_request(
            self.client.get(&url).query(&[
                ("q", ticker.as_str()),
                ("quotesCount", "0"),
                ("newsCount", news_count.as_str()),
            ])
        ).await?;

        if !response.status().is_success() {
            return Err(AnalysisError::ApiError(format!(
                "Search HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        Ok(search.news.into_iter().map(RawNewsItem::from).collect())
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new(YahooConfig::default())
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch_price_series(&self, symbol: &Symbol, period: Period) -> Result<PriceSeries, AnalysisError> {
        self.get_chart(symbol, period).await
    }

    async fn fetch_metadata(&self, symbol: &Symbol) -> Result<Option<AssetMetadata>, AnalysisError> {
        self.fetch_overview(symbol).await.0
    }

    async fn fetch_metrics(&self, symbol: &Symbol) -> Result<Option<FinancialMetrics>, AnalysisError> {
        self.fetch_overview(symbol).await.1
    }

    /// Profile and ratios both come from one quoteSummary call.
    async fn fetch_overview(&self, symbol: &Symbol) -> AssetOverview {
        split_overview(self.get_quote_summary(symbol).await, symbol.kind())
    }
}

fn split_overview(summary: Result<Option<QuoteSummary>, AnalysisError>, kind: AssetKind) -> AssetOverview {
    match summary {
        Ok(Some(summary)) => (Ok(summary.metadata(kind)), Ok(summary.metrics(kind))),
        Ok(None) => (Ok(None), Ok(None)),
        Err(e) => (Err(e.clone()), Err(e)),
    }
}

/// Wait before retrying after a 429; `None` once the attempts are spent.
fn retry_wait(attempt: u32) -> Option<Duration> {
    (attempt + 1 < MAX_ATTEMPTS).then_some(RATE_LIMIT_WAIT)
}

#[async_trait]
impl NewsSource for YahooClient {
    async fn fetch_headlines(&self, symbol: &Symbol, limit: usize) -> Result<Vec<RawNewsItem>, AnalysisError> {
        self.search_news(symbol, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = YahooClient::new(YahooConfig {
            base_url: "http://localhost:9000/".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_no_wait_after_final_rate_limit() {
        assert_eq!(retry_wait(0), Some(RATE_LIMIT_WAIT));
        assert_eq!(retry_wait(MAX_ATTEMPTS - 2), Some(RATE_LIMIT_WAIT));
        assert_eq!(retry_wait(MAX_ATTEMPTS - 1), None);
    }

    #[test]
    fn test_overview_split_from_one_summary() {
        let json = serde_json::json!({
            "quoteSummary": {
                "result": [{
                    "price": { "longName": "Apple Inc.", "regularMarketPrice": { "raw": 191.45 } },
                    "summaryDetail": { "trailingPE": { "raw": 29.7 } }
                }],
                "error": null
            }
        });
        let summary = QuoteSummary::from_response(&json);
        let (metadata, metrics) = split_overview(summary, AssetKind::Stock);
        assert!(matches!(metadata, Ok(Some(AssetMetadata::Stock(_)))));
        assert!(matches!(metrics, Ok(Some(FinancialMetrics::Equity(_)))));

        let (metadata, metrics) = split_overview(Ok(None), AssetKind::Crypto);
        assert!(matches!(metadata, Ok(None)));
        assert!(matches!(metrics, Ok(None)));

        let failed = Err(AnalysisError::ApiError("quoteSummary HTTP 500".to_string()));
        let (metadata, metrics) = split_overview(failed, AssetKind::Stock);
        assert!(matches!(metadata, Err(AnalysisError::ApiError(_))));
        assert!(matches!(metrics, Err(AnalysisError::ApiError(_))));
    }

    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_live_chart() {
        let client = YahooClient::default();
        let symbol = Symbol::parse("AAPL").unwrap();
        let series = client.get_chart(&symbol, Period::Month1).await.unwrap();
        assert!(!series.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_live_quote_summary_with_crumb() {
        let client = YahooClient::default();
        let symbol = Symbol::parse("AAPL").unwrap();
        let (metadata, metrics) = client.fetch_overview(&symbol).await;
        assert!(metadata.unwrap().is_some());
        assert!(metrics.unwrap().is_some());
    }
}
