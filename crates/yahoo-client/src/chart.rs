use analysis_core::{AnalysisError, Bar};
use chrono::DateTime;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<YahooErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QuoteColumns {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct YahooErrorBody {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl YahooErrorBody {
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }
}

fn value_at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

/// Convert a chart response into bars. Rows with a missing OHLC value are skipped.
pub(crate) fn bars_from_chart(envelope: ChartEnvelope, symbol: &str) -> Result<Vec<Bar>, AnalysisError> {
    if let Some(err) = envelope.chart.error {
        if err.is_not_found() {
            return Err(AnalysisError::SymbolNotFound(symbol.to_string()));
        }
        return Err(AnalysisError::ApiError(format!(
            "{}: {}",
            err.code,
            err.description.unwrap_or_default()
        )));
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AnalysisError::SymbolNotFound(symbol.to_string()))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        ) else {
            continue;
        };
        let Some(timestamp) = DateTime::from_timestamp(*ts, 0) else {
            continue;
        };
        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume: value_at(&quote.volume, i).unwrap_or(0.0),
        });
    }

    if bars.is_empty() {
        return Err(AnalysisError::SymbolNotFound(symbol.to_string()));
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> ChartEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parses_bars_and_skips_null_rows() {
        let env = envelope(json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "AAPL" },
                    "timestamp": [1704153600, 1704240000, 1704326400],
                    "indicators": { "quote": [{
                        "open":   [185.0, null, 184.2],
                        "high":   [188.4, 186.0, 186.4],
                        "low":    [183.9, 183.4, 183.4],
                        "close":  [185.6, 184.3, 184.0],
                        "volume": [82488700, 58414500, null]
                    }]}
                }],
                "error": null
            }
        }));

        let bars = bars_from_chart(env, "AAPL").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 185.6);
        assert_eq!(bars[1].open, 184.2);
        assert_eq!(bars[1].volume, 0.0);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn test_not_found_error_maps_to_symbol_not_found() {
        let env = envelope(json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }));
        assert!(matches!(bars_from_chart(env, "ZZZZ"), Err(AnalysisError::SymbolNotFound(s)) if s == "ZZZZ"));
    }

    #[test]
    fn test_other_errors_are_api_errors() {
        let env = envelope(json!({
            "chart": { "result": null, "error": { "code": "Bad Request", "description": "Invalid input" } }
        }));
        assert!(matches!(bars_from_chart(env, "AAPL"), Err(AnalysisError::ApiError(_))));
    }

    #[test]
    fn test_empty_result_is_not_found() {
        let env = envelope(json!({
            "chart": { "result": [{ "indicators": { "quote": [{}] } }], "error": null }
        }));
        assert!(matches!(bars_from_chart(env, "AAPL"), Err(AnalysisError::SymbolNotFound(_))));
    }
}
