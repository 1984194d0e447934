//! Prompt assembly. The model sees a digest of the price history, a curated
//! subset of profile and metric fields, and condensed headlines.

use analysis_core::format::{self, NOT_AVAILABLE};
use analysis_core::{
    AssetMetadata, CryptoMetrics, EquityMetrics, FinancialMetrics, NewsItem, PriceSeries, Symbol,
    DISPLAY_WINDOW,
};

pub const NEWS_SUMMARY_CHARS: usize = 200;
const DESCRIPTION_CHARS: usize = 500;

/// Everything the engine needs for one recommendation.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput<'a> {
    pub symbol: &'a Symbol,
    pub price_series: &'a PriceSeries,
    pub metadata: Option<&'a AssetMetadata>,
    pub metrics: Option<&'a FinancialMetrics>,
    pub news: &'a [NewsItem],
}

const RESPONSE_FORMAT: &str = r#"Respond with a single JSON object and nothing else, using exactly these keys:
{
  "recommendation": "BUY" | "SELL" | "NEUTRAL",
  "summary": "two or three sentence overview",
  "risk_factors": ["risk", "..."],
  "detailed_analysis": "multi-paragraph rationale covering price action, fundamentals and news"
}"#;

pub fn build_prompt(input: &RecommendationInput<'_>) -> String {
    let kind = input.symbol.kind().label();
    let mut lines = vec![
        format!(
            "You are an experienced financial analyst. Analyze the {} {} using the data below \
             and give a BUY, SELL or NEUTRAL recommendation. Missing values are marked {}.",
            kind.to_lowercase(),
            input.symbol,
            NOT_AVAILABLE
        ),
        String::new(),
        "## Price history".to_string(),
    ];
    lines.extend(price_lines(input.price_series));

    lines.push(String::new());
    lines.push("## Profile".to_string());
    lines.extend(profile_lines(input.metadata));

    lines.push(String::new());
    lines.push("## Key metrics".to_string());
    lines.extend(metric_lines(input.metrics));

    lines.push(String::new());
    lines.push("## Recent news".to_string());
    lines.extend(news_lines(input.news));

    lines.push(String::new());
    lines.push(RESPONSE_FORMAT.to_string());
    lines.join("\n")
}

fn price_lines(series: &PriceSeries) -> Vec<String> {
    let Some(d) = series.digest() else {
        return vec!["- No price history available".to_string()];
    };
    let window = d.bar_count.min(DISPLAY_WINDOW);
    vec![
        format!("- Coverage: {} to {} ({} daily bars)", d.first_date, d.last_date, d.bar_count),
        format!("- Latest close: {}", format::price(Some(d.last_close))),
        format!("- Change over last {} bars: {}", window, format::signed_percent(d.window_change_pct)),
        format!(
            "- Range over last {} bars: {} - {}",
            window,
            format::price(Some(d.window_low)),
            format::price(Some(d.window_high))
        ),
        format!("- Average daily volume: {}", format::compact(Some(d.average_volume))),
        format!("- Annualized volatility: {}", format::percent_of_ratio(d.annualized_volatility)),
        format!("- 50-day SMA: {}", format::price(d.sma_50)),
        format!("- 200-day SMA: {}", format::price(d.sma_200)),
    ]
}

fn profile_lines(metadata: Option<&AssetMetadata>) -> Vec<String> {
    match metadata {
        Some(AssetMetadata::Stock(p)) => vec![
            format!("- Name: {}", format::text(p.name.as_deref())),
            format!("- Sector: {}", format::text(p.sector.as_deref())),
            format!("- Industry: {}", format::text(p.industry.as_deref())),
            format!("- Country: {}", format::text(p.country.as_deref())),
            format!("- Market cap: {}", format::compact_money(p.market_cap)),
            format!("- Business summary: {}", short_text(p.business_summary.as_deref())),
        ],
        Some(AssetMetadata::Crypto(p)) => vec![
            format!("- Name: {}", format::text(p.name.as_deref())),
            format!("- Market cap: {}", format::compact_money(p.market_cap)),
            format!("- 24h volume: {}", format::compact_money(p.volume_24h)),
            format!("- Circulating supply: {}", format::compact(p.circulating_supply)),
            format!("- Description: {}", short_text(p.description.as_deref())),
        ],
        None => vec![format!("- {}", NOT_AVAILABLE)],
    }
}

fn short_text(value: Option<&str>) -> String {
    format::truncate(&format::text(value), DESCRIPTION_CHARS)
}

fn metric_lines(metrics: Option<&FinancialMetrics>) -> Vec<String> {
    match metrics {
        Some(FinancialMetrics::Equity(m)) => equity_lines(m),
        Some(FinancialMetrics::Crypto(m)) => crypto_lines(m),
        None => vec![format!("- {}", NOT_AVAILABLE)],
    }
}

fn equity_lines(m: &EquityMetrics) -> Vec<String> {
    vec![
        format!("- Current price: {}", format::price(m.current_price)),
        format!("- P/E (trailing): {}", format::number(m.trailing_pe)),
        format!("- EPS (trailing): {}", format::number(m.trailing_eps)),
        format!("- Dividend yield: {}", format::percent_of_ratio(m.dividend_yield)),
        format!("- Price/Book: {}", format::number(m.price_to_book)),
        format!("- Return on equity: {}", format::percent_of_ratio(m.return_on_equity)),
        format!("- Profit margin: {}", format::percent_of_ratio(m.profit_margins)),
        format!("- Debt/Equity: {}", format::number(m.debt_to_equity)),
        format!("- Revenue growth: {}", format::percent_of_ratio(m.revenue_growth)),
        format!("- Beta: {}", format::number(m.beta)),
        format!(
            "- 52-week range: {} - {}",
            format::price(m.fifty_two_week_low),
            format::price(m.fifty_two_week_high)
        ),
        format!("- Analyst target (mean): {}", format::price(m.target_mean_price)),
    ]
}

fn crypto_lines(m: &CryptoMetrics) -> Vec<String> {
    vec![
        format!("- Current price: {}", format::price(m.current_price)),
        format!("- 24h change: {}", format::percent_of_ratio(m.change_24h)),
        format!("- 24h volume: {}", format::compact_money(m.volume_24h)),
        format!("- Market cap: {}", format::compact_money(m.market_cap)),
        format!("- Circulating supply: {}", format::compact(m.circulating_supply)),
        format!("- Max supply: {}", format::compact(m.max_supply)),
        format!(
            "- 52-week range: {} - {}",
            format::price(m.fifty_two_week_low),
            format::price(m.fifty_two_week_high)
        ),
        format!("- YTD return: {}", format::percent_of_ratio(m.ytd_return)),
    ]
}

fn news_lines(news: &[NewsItem]) -> Vec<String> {
    if news.is_empty() {
        return vec!["- No recent news available".to_string()];
    }
    news.iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "{}. {} ({}, {})\n   {}",
                i + 1,
                item.title,
                item.source,
                item.date,
                format::truncate(&item.summary, NEWS_SUMMARY_CHARS)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{Bar, StockProfile};
    use chrono::{Duration, TimeZone, Utc};

    fn series(n: usize) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
        PriceSeries::new(
            (0..n)
                .map(|i| {
                    let close = 100.0 + i as f64;
                    Bar {
                        timestamp: start + Duration::days(i as i64),
                        open: close,
                        high: close + 1.0,
                        low: close - 1.0,
                        close,
                        volume: 1_000_000.0,
                    }
                })
                .collect(),
        )
    }

    fn news_item(summary: &str) -> NewsItem {
        NewsItem {
            title: "Apple unveils new chip".to_string(),
            source: "Reuters".to_string(),
            date: "2024-03-01 12:00 UTC".to_string(),
            url: "https://example.com/1".to_string(),
            summary: summary.to_string(),
            published_at: None,
        }
    }

    #[test]
    fn test_prompt_uses_digest_not_raw_series() {
        let symbol = Symbol::parse("AAPL").unwrap();
        let series = series(300);
        let prompt = build_prompt(&RecommendationInput {
            symbol: &symbol,
            price_series: &series,
            metadata: None,
            metrics: None,
            news: &[],
        });

        assert!(prompt.contains("stock AAPL"));
        assert!(prompt.contains("(300 daily bars)"));
        assert!(prompt.contains("Latest close: $399.00"));
        assert!(prompt.contains("No recent news available"));
        assert!(prompt.contains("\"recommendation\""));
        assert!(prompt.contains("\"risk_factors\""));
        // No bar-by-bar dump
        assert!(!prompt.contains("$150.00"));
    }

    #[test]
    fn test_missing_fields_render_not_available() {
        let symbol = Symbol::parse("AAPL").unwrap();
        let series = series(10);
        let metadata = AssetMetadata::Stock(StockProfile {
            name: Some("Apple Inc.".to_string()),
            ..Default::default()
        });
        let metrics = FinancialMetrics::Equity(EquityMetrics {
            current_price: Some(190.5),
            ..Default::default()
        });
        let prompt = build_prompt(&RecommendationInput {
            symbol: &symbol,
            price_series: &series,
            metadata: Some(&metadata),
            metrics: Some(&metrics),
            news: &[],
        });

        assert!(prompt.contains("- Name: Apple Inc."));
        assert!(prompt.contains("- Sector: N/A"));
        assert!(prompt.contains("- Current price: $190.50"));
        assert!(prompt.contains("- Dividend yield: N/A"));
        assert!(prompt.contains("- 50-day SMA: N/A"));
    }

    #[test]
    fn test_news_summaries_truncated() {
        let symbol = Symbol::parse("BTC-USD").unwrap();
        let series = series(5);
        let long = "x".repeat(500);
        let news = vec![news_item(&long)];
        let prompt = build_prompt(&RecommendationInput {
            symbol: &symbol,
            price_series: &series,
            metadata: None,
            metrics: None,
            news: &news,
        });

        assert!(prompt.contains("cryptocurrency BTC-USD"));
        assert!(prompt.contains("1. Apple unveils new chip (Reuters, 2024-03-01 12:00 UTC)"));
        assert!(prompt.contains(&format!("{}...", "x".repeat(NEWS_SUMMARY_CHARS))));
        assert!(!prompt.contains(&"x".repeat(NEWS_SUMMARY_CHARS + 1)));
    }
}
