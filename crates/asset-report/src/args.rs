use analysis_core::Period;
use analysis_orchestrator::config::NEWS_ARTICLE_RANGE;
use recommendation_engine::ApiCredential;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: asset-report <SYMBOL> [OPTIONS]

Symbols:
  AAPL, MSFT        US stocks
  IDX:BBCA          Indonesian stocks (IDX: prefix)
  BTC-USD, ETH-USD  Cryptocurrencies (BASE-QUOTE)

Options:
  --news <N>        Number of news articles to include, 1-50 (default 5)
  --period <P>      History period: 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max (default max)
  --json            Print the report as JSON
  --api-key <KEY>   Gemini API key (default: GEMINI_API_KEY)
  -h, --help        Show this help";

#[derive(Debug, Error, PartialEq)]
pub enum UsageError {
    #[error("missing <SYMBOL> argument")]
    MissingSymbol,

    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("invalid value for {flag}: {value:?}")]
    InvalidValue { flag: &'static str, value: String },

    #[error("unexpected argument {0:?}")]
    Unexpected(String),
}

#[derive(Debug, PartialEq)]
pub struct Cli {
    pub symbol: String,
    pub news: Option<usize>,
    pub period: Option<Period>,
    pub json: bool,
    pub api_key: Option<ApiCredential>,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Report(Cli),
    Help,
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<Command, UsageError> {
    let mut symbol = None;
    let mut news = None;
    let mut period = None;
    let mut json = false;
    let mut api_key = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--json" => json = true,
            "--news" => {
                let value = iter.next().ok_or(UsageError::MissingValue("--news"))?;
                let count = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| NEWS_ARTICLE_RANGE.contains(n))
                    .ok_or_else(|| UsageError::InvalidValue {
                        flag: "--news",
                        value: value.clone(),
                    })?;
                news = Some(count);
            }
            "--period" => {
                let value = iter.next().ok_or(UsageError::MissingValue("--period"))?;
                period = Some(value.parse().map_err(|_| UsageError::InvalidValue {
                    flag: "--period",
                    value: value.clone(),
                })?);
            }
            "--api-key" => {
                let value = iter.next().ok_or(UsageError::MissingValue("--api-key"))?;
                api_key = Some(ApiCredential::new(value.as_str()).ok_or(UsageError::MissingValue("--api-key"))?);
            }
            flag if flag.starts_with("--") => return Err(UsageError::Unexpected(flag.to_string())),
            value if symbol.is_none() => symbol = Some(value.to_string()),
            value => return Err(UsageError::Unexpected(value.to_string())),
        }
    }

    Ok(Command::Report(Cli {
        symbol: symbol.ok_or(UsageError::MissingSymbol)?,
        news,
        period,
        json,
        api_key,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, UsageError> {
        let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_args(&owned)
    }

    fn cli(args: &[&str]) -> Cli {
        match parse(args).unwrap() {
            Command::Report(cli) => cli,
            Command::Help => panic!("expected a report command"),
        }
    }

    #[test]
    fn test_symbol_only() {
        let cli = cli(&["AAPL"]);
        assert_eq!(cli.symbol, "AAPL");
        assert_eq!(cli.news, None);
        assert!(!cli.json);
        assert!(cli.api_key.is_none());
    }

    #[test]
    fn test_all_options() {
        let cli = cli(&["--json", "BTC-USD", "--news", "8", "--period", "1y", "--api-key", "k-123"]);
        assert_eq!(cli.symbol, "BTC-USD");
        assert_eq!(cli.news, Some(8));
        assert_eq!(cli.period, Some(Period::Year1));
        assert!(cli.json);
        assert_eq!(cli.api_key.as_ref().map(|k| k.expose()), Some("k-123"));
    }

    #[test]
    fn test_help() {
        assert_eq!(parse(&["AAPL", "--help"]).unwrap(), Command::Help);
    }

    #[test]
    fn test_usage_errors() {
        assert_eq!(parse(&[]).unwrap_err(), UsageError::MissingSymbol);
        assert_eq!(parse(&["AAPL", "--news"]).unwrap_err(), UsageError::MissingValue("--news"));
        assert!(matches!(parse(&["AAPL", "--news", "many"]), Err(UsageError::InvalidValue { .. })));
        for out_of_range in ["0", "51", "18446744073709551615"] {
            assert_eq!(
                parse(&["AAPL", "--news", out_of_range]).unwrap_err(),
                UsageError::InvalidValue { flag: "--news", value: out_of_range.to_string() }
            );
        }
        assert_eq!(cli(&["AAPL", "--news", "50"]).news, Some(50));
        assert!(matches!(parse(&["AAPL", "--period", "forever"]), Err(UsageError::InvalidValue { .. })));
        assert_eq!(parse(&["AAPL", "MSFT"]).unwrap_err(), UsageError::Unexpected("MSFT".to_string()));
        assert_eq!(parse(&["AAPL", "--verbose"]).unwrap_err(), UsageError::Unexpected("--verbose".to_string()));
    }
}
