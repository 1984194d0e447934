//! Display-ready rows for the four report sections. Missing values are
//! already rendered as `N/A` here so front ends only lay text out.

use crate::report::AssetReport;
use analysis_core::format::{self, NOT_AVAILABLE};
use analysis_core::{AssetKind, AssetMetadata, CryptoMetrics, EquityMetrics, FinancialMetrics, DISPLAY_WINDOW};

pub const COMPANY_INFO_UNAVAILABLE: &str = "Company information not available";
pub const CRYPTO_INFO_UNAVAILABLE: &str = "Cryptocurrency information not available";
pub const METRICS_UNAVAILABLE: &str = "Financial metrics not available";

pub fn no_news_message(symbol: &str) -> String {
    format!("No recent news found for {}", symbol)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph { heading: String, text: String },
    Bullets { heading: String, items: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub title: String,
    pub rows: Vec<(String, String)>,
    pub blocks: Vec<Block>,
    pub notice: Option<String>,
}

impl SectionView {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
            blocks: Vec::new(),
            notice: None,
        }
    }

    fn row(mut self, label: &str, value: String) -> Self {
        self.rows.push((label.to_string(), value));
        self
    }

    /// Value for `label`, if the row exists.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

/// The four sections in display order.
pub fn sections(report: &AssetReport) -> Vec<SectionView> {
    vec![
        recommendation_view(report),
        profile_view(report),
        metrics_view(report),
        news_view(report),
    ]
}

pub fn recommendation_view(report: &AssetReport) -> SectionView {
    let digest = report.price_digest.as_ref();
    let outcome = &report.recommendation;
    let rec = &outcome.recommendation;
    let window = report.price_series.len().min(DISPLAY_WINDOW);

    let mut view = SectionView::new("Analysis & Recommendation")
        .row("Asset Type", report.kind.label().to_string())
        .row("Latest Close", format::price(digest.map(|d| d.last_close)))
        .row(
            &format!("Change ({} bars)", window),
            format::signed_percent(digest.and_then(|d| d.window_change_pct)),
        )
        .row(
            "Range",
            match digest {
                Some(d) => format!(
                    "{} - {}",
                    format::price(Some(d.window_low)),
                    format::price(Some(d.window_high))
                ),
                None => NOT_AVAILABLE.to_string(),
            },
        )
        .row("Annualized Volatility", format::percent_of_ratio(digest.and_then(|d| d.annualized_volatility)))
        .row("Recommendation", rec.action.to_string());

    view.blocks.push(Block::Paragraph {
        heading: "Analysis Summary".to_string(),
        text: non_empty_or(&rec.summary, "No summary available"),
    });
    if !rec.risk_factors.is_empty() {
        view.blocks.push(Block::Bullets {
            heading: "Risk Factors".to_string(),
            items: rec.risk_factors.clone(),
        });
    }
    view.blocks.push(Block::Paragraph {
        heading: "Detailed Analysis".to_string(),
        text: non_empty_or(&rec.detailed_analysis, "No detailed analysis available"),
    });
    view.notice = outcome.notice();
    view
}

fn non_empty_or(text: &str, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text.to_string()
    }
}

pub fn profile_view(report: &AssetReport) -> SectionView {
    let (title, placeholder) = match report.kind {
        AssetKind::Stock => ("Company Information", COMPANY_INFO_UNAVAILABLE),
        AssetKind::Crypto => ("Cryptocurrency Information", CRYPTO_INFO_UNAVAILABLE),
    };

    // A profile of the other asset kind is treated as missing.
    match report.metadata.available().filter(|m| m.kind() == report.kind) {
        Some(AssetMetadata::Stock(p)) => {
            let mut view = SectionView::new(title)
                .row("Name", format::text(p.name.as_deref()))
                .row("Sector", format::text(p.sector.as_deref()))
                .row("Industry", format::text(p.industry.as_deref()))
                .row("Country", format::text(p.country.as_deref()))
                .row("Exchange", format::text(p.exchange.as_deref()))
                .row("Market Cap", format::compact_money(p.market_cap))
                .row("Employees", format::count(p.employees))
                .row("Website", format::text(p.website.as_deref()));
            view.blocks.push(Block::Paragraph {
                heading: "Business Summary".to_string(),
                text: format::text(p.business_summary.as_deref()),
            });
            view
        }
        Some(AssetMetadata::Crypto(p)) => {
            let mut view = SectionView::new(title)
                .row("Name", format::text(p.name.as_deref()))
                .row("Category", "Cryptocurrency".to_string())
                .row("Market", "Cryptocurrency".to_string())
                .row("Market Cap", format::compact_money(p.market_cap))
                .row("24h Volume", format::compact_money(p.volume_24h))
                .row("Circulating Supply", format::compact(p.circulating_supply));
            view.blocks.push(Block::Paragraph {
                heading: "Description".to_string(),
                text: format::text(p.description.as_deref()),
            });
            view
        }
        None => {
            let mut view = SectionView::new(title);
            view.notice = Some(placeholder.to_string());
            view
        }
    }
}

pub fn metrics_view(report: &AssetReport) -> SectionView {
    match report.metrics.available().filter(|m| m.kind() == report.kind) {
        Some(FinancialMetrics::Equity(m)) => equity_rows(SectionView::new("Financial Metrics"), m),
        Some(FinancialMetrics::Crypto(m)) => crypto_rows(SectionView::new("Financial Metrics"), m),
        None => {
            let mut view = SectionView::new("Financial Metrics");
            view.notice = Some(METRICS_UNAVAILABLE.to_string());
            view
        }
    }
}

fn equity_rows(view: SectionView, m: &EquityMetrics) -> SectionView {
    view.row("Current Price", format::price(m.current_price))
        .row("P/E Ratio", format::number(m.trailing_pe))
        .row("EPS", format::number(m.trailing_eps))
        .row("Dividend Yield", format::percent_of_ratio(m.dividend_yield))
        .row("52 Week High", format::price(m.fifty_two_week_high))
        .row("52 Week Low", format::price(m.fifty_two_week_low))
        .row("Price to Book", format::number(m.price_to_book))
        .row("Return on Equity", format::percent_of_ratio(m.return_on_equity))
        .row("Profit Margin", format::percent_of_ratio(m.profit_margins))
        .row("Debt to Equity", format::number(m.debt_to_equity))
        .row("Revenue Growth", format::percent_of_ratio(m.revenue_growth))
        .row("Gross Margin", format::percent_of_ratio(m.gross_margins))
        .row("Operating Margin", format::percent_of_ratio(m.operating_margins))
        .row("Quick Ratio", format::number(m.quick_ratio))
        .row("Current Ratio", format::number(m.current_ratio))
        .row("Beta", format::number(m.beta))
        .row("Shares Outstanding", format::compact(m.shares_outstanding))
        .row("Book Value", format::price(m.book_value))
        .row("Target Mean Price", format::price(m.target_mean_price))
}

fn crypto_rows(view: SectionView, m: &CryptoMetrics) -> SectionView {
    view.row("Current Price", format::price(m.current_price))
        .row("24h Change", format::percent_of_ratio(m.change_24h))
        .row("24h Volume", format::compact_money(m.volume_24h))
        .row("Volume", format::compact(m.volume))
        .row("Market Cap", format::compact_money(m.market_cap))
        .row("Circulating Supply", format::compact(m.circulating_supply))
        .row("52 Week High", format::price(m.fifty_two_week_high))
        .row("52 Week Low", format::price(m.fifty_two_week_low))
        .row("Max Supply", format::compact(m.max_supply))
        .row("Total Supply", format::compact(m.total_supply))
        .row("Avg Volume (10d)", format::compact(m.average_volume_10d))
        .row("Avg Volume (3m)", format::compact(m.average_volume_3m))
        .row("Market Dominance", format::percent_of_ratio(m.market_dominance))
        .row("Beta", format::number(m.beta))
        .row("YTD Return", format::percent_of_ratio(m.ytd_return))
}

pub fn news_view(report: &AssetReport) -> SectionView {
    let sentiment = &report.sentiment;
    let topics = if sentiment.key_topics.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        sentiment.key_topics.join(", ")
    };

    let mut view = SectionView::new("News & Sentiment")
        .row("Sentiment Score", format!("{:+.2}", sentiment.score))
        .row("Trend", sentiment.trend.to_string())
        .row(
            "Articles",
            format!(
                "{} positive / {} negative / {} neutral",
                sentiment.positive_articles, sentiment.negative_articles, sentiment.neutral_articles
            ),
        )
        .row("Key Topics", topics);

    view.blocks.push(Block::Paragraph {
        heading: "Sentiment Summary".to_string(),
        text: sentiment.summary.clone(),
    });

    let articles = report.articles();
    if articles.is_empty() {
        view.notice = Some(no_news_message(report.symbol.as_str()));
    } else {
        view.blocks.push(Block::Bullets {
            heading: "Recent News".to_string(),
            items: articles
                .iter()
                .map(|a| format!("{}\n{} | {}\n{}\n{}", a.title, a.source, a.date, a.summary, a.url))
                .collect(),
        });
    }
    view
}
