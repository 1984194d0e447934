use analysis_core::{NewsItem, SentimentResult, TrendLabel};
use std::collections::HashSet;

pub mod lexicon;

use lexicon::{NEGATIVE_WORDS, NEGATION_WORDS, POSITIVE_WORDS};

const NEGATION_WINDOW: usize = 3;
const MAX_TOPICS: usize = 5;

/// Raw article scores are squashed with tanh(score / SCORE_SCALE).
const SCORE_SCALE: f64 = 3.0;

/// Trend bucket edges. Boundary values fall into the bucket closer to neutral.
const STRONG_THRESHOLD: f64 = 0.5;
const NEUTRAL_BAND: f64 = 0.15;

/// News event type with importance weight for aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NewsEventType {
    Earnings,       // Earnings reports, guidance
    MergersAcq,     // M&A, buyouts, spinoffs
    Regulatory,     // FDA, SEC, antitrust
    AnalystAction,  // Upgrades, downgrades, initiations
    Management,     // CEO changes, board reshuffles
    Product,        // Product launches, recalls
    Legal,          // Lawsuits, settlements
    Macro,          // Fed, economic data
    General,        // Catch-all
}

impl NewsEventType {
    fn importance_weight(&self) -> f64 {
        match self {
            NewsEventType::Earnings => 2.0,
            NewsEventType::MergersAcq => 2.5,
            NewsEventType::Regulatory => 2.0,
            NewsEventType::AnalystAction => 1.5,
            NewsEventType::Management => 1.3,
            NewsEventType::Product => 1.2,
            NewsEventType::Legal => 1.5,
            NewsEventType::Macro => 0.8,
            NewsEventType::General => 1.0,
        }
    }

    fn topic(&self) -> Option<&'static str> {
        match self {
            NewsEventType::Earnings => Some("Earnings"),
            NewsEventType::MergersAcq => Some("Mergers & Acquisitions"),
            NewsEventType::Regulatory => Some("Regulation"),
            NewsEventType::AnalystAction => Some("Analyst Ratings"),
            NewsEventType::Management => Some("Leadership"),
            NewsEventType::Product => Some("Products"),
            NewsEventType::Legal => Some("Legal"),
            NewsEventType::Macro => Some("Macroeconomy"),
            NewsEventType::General => None,
        }
    }
}

fn classify_event(title: &str, summary: &str) -> NewsEventType {
    let text = format!("{} {}", title, summary).to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

    if has(&["earnings", "quarterly", "guidance", " eps"])
        || (text.contains("revenue") && has(&["beat", "miss", "report"]))
        || (text.contains("profit") && text.contains("quarter"))
    {
        NewsEventType::Earnings
    } else if has(&["acqui", "merger", "buyout", "takeover", "spinoff", "spin-off"]) {
        NewsEventType::MergersAcq
    } else if has(&["fda", "sec ", "regulat", "approval", "antitrust", "compliance", "etf"]) {
        NewsEventType::Regulatory
    } else if has(&["upgrade", "downgrade", "price target", "initiat", "analyst", "rating"]) {
        NewsEventType::AnalystAction
    } else if has(&["ceo", "cfo", "board", "executive", "resign", "appoint"]) {
        NewsEventType::Management
    } else if has(&["launch", "product", "recall", "patent", "innovation"]) {
        NewsEventType::Product
    } else if has(&["lawsuit", "litigation", "settlement", "sued", "court", "indictment"]) {
        NewsEventType::Legal
    } else if has(&["fed ", "federal reserve", "interest rate", "inflation", "gdp", "unemployment"]) {
        NewsEventType::Macro
    } else {
        NewsEventType::General
    }
}

/// Map an aggregate score in [-1, 1] to its trend bucket.
pub fn trend_for_score(score: f64) -> TrendLabel {
    if score > STRONG_THRESHOLD {
        TrendLabel::StronglyPositive
    } else if score > NEUTRAL_BAND {
        TrendLabel::Positive
    } else if score >= -NEUTRAL_BAND {
        TrendLabel::Neutral
    } else if score >= -STRONG_THRESHOLD {
        TrendLabel::Negative
    } else {
        TrendLabel::StronglyNegative
    }
}

/// Lexicon-based news sentiment. Pure function of its input.
pub struct SentimentSummarizer {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
    negation: HashSet<&'static str>,
}

impl SentimentSummarizer {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
            negation: NEGATION_WORDS.iter().copied().collect(),
        }
    }

    /// Positive minus negative lexicon hits; a negation word up to
    /// `NEGATION_WINDOW` words earlier flips the hit.
    fn analyze_text(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();
        let words: Vec<&str> = text_lower
            .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '.' | '!' | '?' | ':' | '"' | '(' | ')'))
            .filter(|w| !w.is_empty())
            .collect();

        let negation_positions: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| self.negation.contains(*w))
            .map(|(i, _)| i)
            .collect();

        let mut score: i32 = 0;
        for (i, word) in words.iter().enumerate() {
            let is_positive = self.positive.contains(*word);
            let is_negative = self.negative.contains(*word);
            if !is_positive && !is_negative {
                continue;
            }

            let negated = negation_positions
                .iter()
                .any(|&neg_pos| neg_pos < i && (i - neg_pos) <= NEGATION_WINDOW);

            let polarity = if is_positive { 1 } else { -1 };
            score += if negated { -polarity } else { polarity };
        }

        score as f64
    }

    /// Title hits count double.
    fn analyze_article(&self, article: &NewsItem) -> f64 {
        self.analyze_text(&article.title) * 2.0 + self.analyze_text(&article.summary)
    }

    pub fn summarize(&self, news: &[NewsItem]) -> SentimentResult {
        if news.is_empty() {
            return SentimentResult::neutral("No recent news articles were available to analyze.");
        }

        let mut total_score = 0.0;
        let mut total_weight = 0.0;
        let mut positive_count = 0;
        let mut negative_count = 0;
        let mut neutral_count = 0;
        // (event, count) in order of first appearance
        let mut event_counts: Vec<(NewsEventType, usize)> = Vec::new();

        for article in news {
            let raw = self.analyze_article(article);
            let event = classify_event(&article.title, &article.summary);
            let weight = event.importance_weight();

            total_score += raw * weight;
            total_weight += weight;

            if raw > 0.0 {
                positive_count += 1;
            } else if raw < 0.0 {
                negative_count += 1;
            } else {
                neutral_count += 1;
            }

            match event_counts.iter_mut().find(|(e, _)| *e == event) {
                Some((_, count)) => *count += 1,
                None => event_counts.push((event, 1)),
            }
        }

        let weighted_mean = if total_weight > 0.0 { total_score / total_weight } else { 0.0 };
        let score = (weighted_mean / SCORE_SCALE).tanh().clamp(-1.0, 1.0);
        let trend = trend_for_score(score);

        // Stable sort keeps first-appearance order among equal counts.
        event_counts.sort_by(|a, b| b.1.cmp(&a.1));
        let key_topics: Vec<String> = event_counts
            .iter()
            .filter_map(|(event, _)| event.topic())
            .take(MAX_TOPICS)
            .map(str::to_string)
            .collect();

        tracing::debug!(
            "Sentiment over {} articles: score {:.3} ({}), topics {:?}",
            news.len(),
            score,
            trend,
            key_topics
        );

        let summary = narrative(news.len(), trend, positive_count, negative_count, neutral_count, &key_topics);

        SentimentResult {
            score,
            trend,
            summary,
            key_topics,
            positive_articles: positive_count,
            negative_articles: negative_count,
            neutral_articles: neutral_count,
        }
    }
}

impl Default for SentimentSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

fn narrative(
    total: usize,
    trend: TrendLabel,
    positive: usize,
    negative: usize,
    neutral: usize,
    topics: &[String],
) -> String {
    let mut text = format!(
        "Analysis of {} recent article{} shows {} sentiment ({} positive, {} negative, {} neutral).",
        total,
        if total == 1 { "" } else { "s" },
        trend,
        positive,
        negative,
        neutral
    );
    if !topics.is_empty() {
        let lowered: Vec<String> = topics.iter().map(|t| t.to_lowercase()).collect();
        text.push_str(&format!(" Coverage centers on {}.", lowered.join(", ")));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, summary: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            source: "Test Wire".to_string(),
            date: "2024-03-01 12:00 UTC".to_string(),
            url: "#".to_string(),
            summary: summary.to_string(),
            published_at: None,
        }
    }

    #[test]
    fn test_empty_news_is_neutral_zero() {
        let result = SentimentSummarizer::new().summarize(&[]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.trend, TrendLabel::Neutral);
        assert!(result.key_topics.is_empty());
    }

    #[test]
    fn test_positive_news() {
        let news = vec![
            article("Apple shares surge to record high after strong earnings beat", "Growth momentum continues"),
            article("Analysts upgrade Apple citing robust iPhone demand", "Price target raised"),
        ];
        let result = SentimentSummarizer::new().summarize(&news);
        assert!(result.score > NEUTRAL_BAND);
        assert!(result.trend >= TrendLabel::Positive);
        assert_eq!(result.positive_articles, 2);
        assert!(result.key_topics.contains(&"Earnings".to_string()));
    }

    #[test]
    fn test_negative_news() {
        let news = vec![
            article("Bitcoin plunge deepens as fear grips market", "Losses mount amid crash warning"),
            article("Exchange faces lawsuit and investigation", "Regulators probe default risk"),
        ];
        let result = SentimentSummarizer::new().summarize(&news);
        assert!(result.score < -NEUTRAL_BAND);
        assert!(result.trend <= TrendLabel::Negative);
        assert_eq!(result.negative_articles, 2);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let s = SentimentSummarizer::new();
        assert!(s.analyze_text("results were strong") > 0.0);
        assert!(s.analyze_text("results were not strong") < 0.0);
        assert!(s.analyze_text("no sign of decline") > 0.0);
    }

    #[test]
    fn test_mixed_news_score_bounded_and_deterministic() {
        let news = vec![
            article("Apple beats revenue estimates", "Strong services growth"),
            article("Apple faces antitrust lawsuit in Europe", "Regulatory risk rises"),
            article("Apple announces developer conference dates", "No summary available"),
        ];
        let s = SentimentSummarizer::new();
        let a = s.summarize(&news);
        let b = s.summarize(&news);
        assert!((-1.0..=1.0).contains(&a.score));
        assert_eq!(a.score, b.score);
        assert_eq!(a.trend, b.trend);
        assert_eq!(a.key_topics, b.key_topics);
        assert_eq!(a.positive_articles + a.negative_articles + a.neutral_articles, 3);
    }

    #[test]
    fn test_trend_thresholds() {
        assert_eq!(trend_for_score(0.0), TrendLabel::Neutral);
        assert_eq!(trend_for_score(0.15), TrendLabel::Neutral);
        assert_eq!(trend_for_score(-0.15), TrendLabel::Neutral);
        assert_eq!(trend_for_score(0.16), TrendLabel::Positive);
        assert_eq!(trend_for_score(0.5), TrendLabel::Positive);
        assert_eq!(trend_for_score(0.51), TrendLabel::StronglyPositive);
        assert_eq!(trend_for_score(-0.5), TrendLabel::Negative);
        assert_eq!(trend_for_score(-0.51), TrendLabel::StronglyNegative);
        assert_eq!(trend_for_score(1.0), TrendLabel::StronglyPositive);
        assert_eq!(trend_for_score(-1.0), TrendLabel::StronglyNegative);
    }

    #[test]
    fn test_trend_monotonic() {
        let mut previous = TrendLabel::StronglyNegative;
        for i in -100..=100 {
            let label = trend_for_score(i as f64 / 100.0);
            assert!(label >= previous);
            previous = label;
        }
    }

    #[test]
    fn test_topics_ordered_by_frequency() {
        let news = vec![
            article("CEO steps down", ""),
            article("Quarterly earnings preview", ""),
            article("Earnings guidance lifted", ""),
            article("Weekend market wrap", ""),
        ];
        let result = SentimentSummarizer::new().summarize(&news);
        assert_eq!(result.key_topics, vec!["Earnings".to_string(), "Leadership".to_string()]);
        assert!(result.summary.contains("4 recent articles"));
    }
}
