use analysis_core::{AnalysisError, MarketDataProvider, NewsSource, Period, Symbol};
use chrono::Utc;
use news_aggregator::NewsAggregator;
use recommendation_engine::{
    ApiCredential, CompletionProvider, GeminiClient, RecommendationEngine, RecommendationInput,
};
use sentiment_analysis::SentimentSummarizer;
use std::sync::Arc;
use yahoo_client::YahooClient;

pub mod config;
pub mod report;
pub mod view;

pub use config::ReportConfig;
pub use report::{AssetReport, Section};
pub use view::{sections, Block, SectionView};

/// Runs the full pipeline for one symbol.
pub struct AnalysisOrchestrator {
    market: Arc<dyn MarketDataProvider>,
    news: NewsAggregator,
    sentiment: SentimentSummarizer,
    recommender: RecommendationEngine,
    max_news_articles: usize,
    period: Period,
}

impl AnalysisOrchestrator {
    /// Yahoo Finance for market data and news, Gemini for recommendations.
    pub fn new(config: &ReportConfig) -> Self {
        let yahoo = Arc::new(YahooClient::new(config.yahoo_config()));
        let gemini = Arc::new(GeminiClient::new(config.gemini_config()));
        Self::with_providers(yahoo.clone(), yahoo, gemini, config)
    }

    pub fn with_providers(
        market: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsSource>,
        completion: Arc<dyn CompletionProvider>,
        config: &ReportConfig,
    ) -> Self {
        Self {
            market,
            news: NewsAggregator::new(news),
            sentiment: SentimentSummarizer::new(),
            recommender: RecommendationEngine::new(completion),
            max_news_articles: config.max_news_articles,
            period: config.history_period,
        }
    }

    /// Build a report for `symbol_text`.
    ///
    /// Only an unparseable symbol or a failed price fetch is an error; every
    /// other failure degrades its own section.
    pub async fn analyze(
        &self,
        symbol_text: &str,
        credential: Option<&ApiCredential>,
    ) -> Result<AssetReport, AnalysisError> {
        let symbol = Symbol::parse(symbol_text)?;
        tracing::info!(
            "Starting analysis for {} ({}, period {})",
            symbol,
            symbol.kind().label(),
            self.period.as_range()
        );

        let (price_result, (metadata_result, metrics_result), news_result) = tokio::join!(
            self.market.fetch_price_series(&symbol, self.period),
            self.market.fetch_overview(&symbol),
            self.news.fetch_news(&symbol, self.max_news_articles),
        );

        let price_series = match price_result {
            Ok(series) if !series.is_empty() => series,
            Ok(_) => {
                tracing::warn!("No price history for {}", symbol);
                return Err(AnalysisError::SymbolNotFound(symbol.to_string()));
            }
            Err(e) => {
                tracing::warn!("Price history for {} failed: {}", symbol, e);
                return Err(e);
            }
        };
        tracing::info!("Bars count for {}: {}", symbol, price_series.len());

        let metadata = Section::from_fetch(metadata_result, "asset information", &symbol);
        let metrics = Section::from_fetch(metrics_result, "financial metrics", &symbol);
        let news = match news_result {
            Ok(items) => Section::Available(items),
            Err(e) => {
                tracing::warn!("News for {} unavailable: {}", symbol, e);
                Section::Unavailable(e.to_string())
            }
        };

        let articles = news.available().map(Vec::as_slice).unwrap_or(&[]);
        tracing::info!("Running sentiment analysis with {} articles", articles.len());
        let sentiment = self.sentiment.summarize(articles);

        let input = RecommendationInput {
            symbol: &symbol,
            price_series: &price_series,
            metadata: metadata.available(),
            metrics: metrics.available(),
            news: articles,
        };
        let recommendation = self.recommender.recommend(credential, &input).await;

        let price_digest = price_series.digest();
        tracing::info!(
            "Analysis complete for {}: {} / sentiment {}",
            symbol,
            recommendation.recommendation.action,
            sentiment.trend
        );

        Ok(AssetReport {
            kind: symbol.kind(),
            symbol,
            generated_at: Utc::now(),
            price_series,
            price_digest,
            recommendation,
            metadata,
            metrics,
            news,
            sentiment,
        })
    }
}
