//! asset-report: stock and crypto analysis report with an AI recommendation.
//!
//! Usage:
//!   asset-report AAPL
//!   asset-report IDX:BBCA --news 8
//!   asset-report BTC-USD --period 1y --json

use analysis_orchestrator::{AnalysisOrchestrator, ReportConfig};
use anyhow::Context;
use recommendation_engine::{ApiCredential, CredentialStore};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;
mod render;

use args::{parse_args, Cli, Command, USAGE};

const SYMBOL_HINT: &str =
    "Check the symbol and try again. Examples: AAPL (US stock), IDX:BBCA (Indonesian stock), BTC-USD (cryptocurrency).";

fn init_tracing() {
    let json_logging = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "asset_report=info,analysis_orchestrator=info,yahoo_client=warn".into());

    // stdout carries the report; logs go to stderr.
    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(Command::Report(cli)) => cli,
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = ReportConfig::from_env().context("Invalid configuration")?;
    if let Some(news) = cli.news {
        config.max_news_articles = news;
    }
    if let Some(period) = cli.period {
        config.history_period = period;
    }

    // Held in memory for this run only.
    let mut credentials = CredentialStore::new();
    let credential = cli.api_key.or_else(|| {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .and_then(ApiCredential::new)
    });
    match credential {
        Some(credential) => credentials.set(credential),
        None => tracing::warn!("GEMINI_API_KEY not set; the recommendation section will be skipped"),
    }

    let orchestrator = AnalysisOrchestrator::new(&config);
    let result = orchestrator.analyze(&cli.symbol, credentials.get()).await;
    credentials.clear();

    let report = match result {
        Ok(report) => report,
        Err(e) if e.is_terminal() => {
            eprintln!("error: {}\n{}", e, SYMBOL_HINT);
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e).context(format!("Analysis of {} failed", cli.symbol)),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        println!("{}", render::render_text(&report));
    }

    Ok(ExitCode::SUCCESS)
}
