use analysis_core::{
    AnalysisError, AssetKind, AssetMetadata, FinancialMetrics, NewsItem, PriceDigest, PriceSeries,
    SentimentResult, Symbol,
};
use chrono::{DateTime, Utc};
use recommendation_engine::RecommendationOutcome;
use serde::{Serialize, Serializer};

/// One independently degrading part of a report.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Available(T),
    Unavailable(String),
}

impl<T> Section<T> {
    pub fn available(&self) -> Option<&T> {
        match self {
            Section::Available(value) => Some(value),
            Section::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Section::Available(_))
    }

    /// `Empty` and errors both become `Unavailable`, with a warning logged.
    pub(crate) fn from_fetch(result: Result<Option<T>, AnalysisError>, what: &str, symbol: &Symbol) -> Self {
        match result {
            Ok(Some(value)) => Section::Available(value),
            Ok(None) => {
                tracing::warn!("No {} returned for {}", what, symbol);
                Section::Unavailable(format!("no {} returned", what))
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {} for {}: {}", what, symbol, e);
                Section::Unavailable(e.to_string())
            }
        }
    }
}

/// Everything rendered for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct AssetReport {
    pub symbol: Symbol,
    pub kind: AssetKind,
    pub generated_at: DateTime<Utc>,
    /// Serialized as the display window only.
    #[serde(rename = "price_history", serialize_with = "serialize_display_window")]
    pub price_series: PriceSeries,
    pub price_digest: Option<PriceDigest>,
    pub recommendation: RecommendationOutcome,
    pub metadata: Section<AssetMetadata>,
    pub metrics: Section<FinancialMetrics>,
    pub news: Section<Vec<NewsItem>>,
    pub sentiment: SentimentResult,
}

impl AssetReport {
    /// News list, empty when the section is unavailable.
    pub fn articles(&self) -> &[NewsItem] {
        self.news.available().map(Vec::as_slice).unwrap_or(&[])
    }
}

fn serialize_display_window<S: Serializer>(series: &PriceSeries, serializer: S) -> Result<S::Ok, S::Error> {
    series.display_window().serialize(serializer)
}
