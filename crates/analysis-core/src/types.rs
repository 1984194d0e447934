use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnalysisError;
use crate::stats;

/// Number of daily bars shown on the price chart (~1 trading year).
pub const DISPLAY_WINDOW: usize = 252;

/// Exchange prefix for Indonesia Stock Exchange listings (`IDX:BBCA`).
const IDX_PREFIX: &str = "IDX:";

/// Asset kind, derived from symbol syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Stock,
    Crypto,
}

impl AssetKind {
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Stock => "Stock",
            AssetKind::Crypto => "Cryptocurrency",
        }
    }
}

/// Instrument identifier as typed by the user: `AAPL`, `IDX:BBCA`, `BTC-USD`.
///
/// A hyphen marks a cryptocurrency pair; everything else is an equity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, AnalysisError> {
        let normalized = input.trim().to_uppercase();
        if normalized.is_empty() || normalized == IDX_PREFIX {
            return Err(AnalysisError::InvalidSymbol(input.to_string()));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(AnalysisError::InvalidSymbol(input.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> AssetKind {
        if self.0.contains('-') {
            AssetKind::Crypto
        } else {
            AssetKind::Stock
        }
    }

    /// Ticker in the upstream provider's notation. `IDX:BBCA` becomes `BBCA.JK`.
    pub fn provider_ticker(&self) -> String {
        match self.0.strip_prefix(IDX_PREFIX) {
            Some(ticker) => format!("{}.JK", ticker),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// History length requested from the price provider. Bars are always daily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    Month1,
    Month3,
    Month6,
    Year1,
    Year2,
    Year5,
    Year10,
    YearToDate,
    #[default]
    Max,
}

impl Period {
    pub fn as_range(&self) -> &'static str {
        match self {
            Period::Month1 => "1mo",
            Period::Month3 => "3mo",
            Period::Month6 => "6mo",
            Period::Year1 => "1y",
            Period::Year2 => "2y",
            Period::Year5 => "5y",
            Period::Year10 => "10y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1mo" => Ok(Period::Month1),
            "3mo" => Ok(Period::Month3),
            "6mo" => Ok(Period::Month6),
            "1y" => Ok(Period::Year1),
            "2y" => Ok(Period::Year2),
            "5y" => Ok(Period::Year5),
            "10y" => Ok(Period::Year10),
            "ytd" => Ok(Period::YearToDate),
            "max" => Ok(Period::Max),
            other => Err(AnalysisError::InvalidData(format!("unknown period {:?}", other))),
        }
    }
}

/// Daily price history, always in ascending chronological order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent `DISPLAY_WINDOW` bars, or the full series when shorter.
    pub fn display_window(&self) -> &[Bar] {
        let start = self.bars.len().saturating_sub(DISPLAY_WINDOW);
        &self.bars[start..]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Compact statistics used in place of the raw series.
    pub fn digest(&self) -> Option<PriceDigest> {
        let first = self.bars.first()?;
        let last = self.bars.last()?;
        let window = self.display_window();
        let window_first = window.first()?;

        let closes = self.closes();
        let window_closes: Vec<f64> = window.iter().map(|b| b.close).collect();
        let window_volumes: Vec<f64> = window.iter().map(|b| b.volume).collect();

        let change_pct = if window_first.close != 0.0 {
            Some((last.close - window_first.close) / window_first.close * 100.0)
        } else {
            None
        };

        Some(PriceDigest {
            first_date: first.timestamp.date_naive(),
            last_date: last.timestamp.date_naive(),
            bar_count: self.bars.len(),
            last_close: last.close,
            window_change_pct: change_pct,
            window_high: window.iter().map(|b| b.high).fold(f64::MIN, f64::max),
            window_low: window.iter().map(|b| b.low).fold(f64::MAX, f64::min),
            average_volume: stats::mean(&window_volumes),
            annualized_volatility: stats::annualized_volatility(&window_closes),
            sma_50: stats::trailing_sma(&closes, 50),
            sma_200: stats::trailing_sma(&closes, 200),
        })
    }
}

/// Statistical summary of a price series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceDigest {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub bar_count: usize,
    pub last_close: f64,
    /// Percent change across the display window
    pub window_change_pct: Option<f64>,
    pub window_high: f64,
    pub window_low: f64,
    pub average_volume: f64,
    pub annualized_volatility: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockProfile {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub exchange: Option<String>,
    pub market_cap: Option<f64>,
    pub employees: Option<u64>,
    pub website: Option<String>,
    pub business_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CryptoProfile {
    pub name: Option<String>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub description: Option<String>,
}

/// Company or coin profile. The attribute sets differ per asset kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AssetMetadata {
    Stock(StockProfile),
    Crypto(CryptoProfile),
}

impl AssetMetadata {
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetMetadata::Stock(_) => AssetKind::Stock,
            AssetMetadata::Crypto(_) => AssetKind::Crypto,
        }
    }
}

/// Equity valuation and profitability ratios. Ratios are fractions (0.05 = 5%).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquityMetrics {
    pub current_price: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub price_to_book: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub profit_margins: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub gross_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub current_ratio: Option<f64>,
    pub beta: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub book_value: Option<f64>,
    pub target_mean_price: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CryptoMetrics {
    pub current_price: Option<f64>,
    /// 24h change as a fraction
    pub change_24h: Option<f64>,
    pub volume_24h: Option<f64>,
    pub volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub max_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub average_volume_10d: Option<f64>,
    pub average_volume_3m: Option<f64>,
    pub market_dominance: Option<f64>,
    pub beta: Option<f64>,
    pub ytd_return: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FinancialMetrics {
    Equity(EquityMetrics),
    Crypto(CryptoMetrics),
}

impl FinancialMetrics {
    pub fn kind(&self) -> AssetKind {
        match self {
            FinancialMetrics::Equity(_) => AssetKind::Stock,
            FinancialMetrics::Crypto(_) => AssetKind::Crypto,
        }
    }
}

/// News headline as delivered by a source, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNewsItem {
    pub title: Option<String>,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub summary: Option<String>,
}

/// Normalized news article; every display field is populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub source: String,
    pub date: String,
    pub url: String,
    pub summary: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Qualitative bucket for aggregate news sentiment, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    StronglyNegative,
    Negative,
    Neutral,
    Positive,
    StronglyPositive,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::StronglyNegative => "strongly negative",
            TrendLabel::Negative => "negative",
            TrendLabel::Neutral => "neutral",
            TrendLabel::Positive => "positive",
            TrendLabel::StronglyPositive => "strongly positive",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Aggregate score in [-1.0, 1.0]
    pub score: f64,
    pub trend: TrendLabel,
    pub summary: String,
    pub key_topics: Vec<String>,
    pub positive_articles: usize,
    pub negative_articles: usize,
    pub neutral_articles: usize,
}

impl SentimentResult {
    pub fn neutral(summary: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            trend: TrendLabel::Neutral,
            summary: summary.into(),
            key_topics: Vec::new(),
            positive_articles: 0,
            negative_articles: 0,
            neutral_articles: 0,
        }
    }
}

/// Discrete recommendation action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    #[default]
    Neutral,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Neutral => "NEUTRAL",
        }
    }

    /// Lenient parse used on model output. Unknown labels are neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "BUY" | "STRONG BUY" => Action::Buy,
            "SELL" | "STRONG SELL" => Action::Sell,
            _ => Action::Neutral,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    pub summary: String,
    pub risk_factors: Vec<String>,
    pub detailed_analysis: String,
}

impl Recommendation {
    /// Placeholder used when no usable model output exists.
    pub fn neutral_fallback(summary: impl Into<String>) -> Self {
        Self {
            action: Action::Neutral,
            summary: summary.into(),
            risk_factors: Vec::new(),
            detailed_analysis: String::new(),
        }
    }
}
