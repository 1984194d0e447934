use async_trait::async_trait;
use crate::{AnalysisError, AssetMetadata, FinancialMetrics, Period, PriceSeries, RawNewsItem, Symbol};

/// Profile and ratio results for one symbol, each failing on its own.
pub type AssetOverview = (
    Result<Option<AssetMetadata>, AnalysisError>,
    Result<Option<FinancialMetrics>, AnalysisError>,
);

/// Source of price history, profile and ratio data keyed by symbol
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `period`. Unknown symbols yield `AnalysisError::SymbolNotFound`.
    async fn fetch_price_series(&self, symbol: &Symbol, period: Period) -> Result<PriceSeries, AnalysisError>;

    /// Profile shaped by the symbol's asset kind; `None` when the provider has nothing.
    async fn fetch_metadata(&self, symbol: &Symbol) -> Result<Option<AssetMetadata>, AnalysisError>;

    /// Ratios shaped by the symbol's asset kind; `None` when the provider has nothing.
    async fn fetch_metrics(&self, symbol: &Symbol) -> Result<Option<FinancialMetrics>, AnalysisError>;

    /// Profile and ratios together. Providers that serve both from one
    /// upstream call override this to make that call once.
    async fn fetch_overview(&self, symbol: &Symbol) -> AssetOverview {
        (self.fetch_metadata(symbol).await, self.fetch_metrics(symbol).await)
    }
}

/// Raw headline feed
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_headlines(&self, symbol: &Symbol, limit: usize) -> Result<Vec<RawNewsItem>, AnalysisError>;
}
