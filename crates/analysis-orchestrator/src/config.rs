use analysis_core::Period;
use anyhow::{bail, Context, Result};
use recommendation_engine::GeminiConfig;
use std::env;
use std::ops::RangeInclusive;
use std::time::Duration;
use yahoo_client::YahooConfig;

/// Accepted values for the news article count.
pub const NEWS_ARTICLE_RANGE: RangeInclusive<usize> = 1..=news_aggregator::MAX_ARTICLE_LIMIT;

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_temperature: f32,
    pub yahoo_base_url: String,
    pub http_timeout_secs: u64,
    pub max_news_articles: usize,
    pub history_period: Period,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            gemini_model: recommendation_engine::gemini::DEFAULT_MODEL.to_string(),
            gemini_base_url: recommendation_engine::gemini::DEFAULT_BASE_URL.to_string(),
            gemini_temperature: recommendation_engine::gemini::DEFAULT_TEMPERATURE,
            yahoo_base_url: yahoo_client::DEFAULT_BASE_URL.to_string(),
            http_timeout_secs: 30,
            max_news_articles: news_aggregator::DEFAULT_MAX_ARTICLES,
            history_period: Period::Max,
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            gemini_model: lookup("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            gemini_temperature: lookup("GEMINI_TEMPERATURE")
                .unwrap_or_else(|| defaults.gemini_temperature.to_string())
                .parse()
                .context("GEMINI_TEMPERATURE must be a number")?,
            yahoo_base_url: lookup("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            http_timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| defaults.http_timeout_secs.to_string())
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            max_news_articles: news_limit(lookup("MAX_NEWS_ARTICLES"), defaults.max_news_articles)?,
            history_period: lookup("HISTORY_PERIOD")
                .unwrap_or_else(|| defaults.history_period.as_range().to_string())
                .parse()
                .context("HISTORY_PERIOD must be one of 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max")?,
        };
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn yahoo_config(&self) -> YahooConfig {
        YahooConfig {
            base_url: self.yahoo_base_url.clone(),
            timeout: self.timeout(),
        }
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            base_url: self.gemini_base_url.clone(),
            model: self.gemini_model.clone(),
            temperature: self.gemini_temperature,
            timeout: self.timeout(),
        }
    }
}

fn news_limit(value: Option<String>, default: usize) -> Result<usize> {
    let Some(value) = value else {
        return Ok(default);
    };
    let limit: usize = value
        .trim()
        .parse()
        .context("MAX_NEWS_ARTICLES must be a whole number")?;
    if !NEWS_ARTICLE_RANGE.contains(&limit) {
        bail!(
            "MAX_NEWS_ARTICLES must be between {} and {}, got {}",
            NEWS_ARTICLE_RANGE.start(),
            NEWS_ARTICLE_RANGE.end(),
            limit
        );
    }
    Ok(limit)
}
