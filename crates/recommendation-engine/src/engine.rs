use crate::credential::ApiCredential;
use crate::decode::decode_recommendation;
use crate::prompt::{build_prompt, RecommendationInput};
use crate::CompletionProvider;
use analysis_core::Recommendation;
use serde::Serialize;
use std::sync::Arc;

pub const CREDENTIAL_MISSING_NOTICE: &str =
    "Gemini API key not configured. Set GEMINI_API_KEY or pass --api-key to enable AI recommendations.";
pub const FALLBACK_SUMMARY: &str = "Unable to generate an AI recommendation at this time.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RecommendationStatus {
    Generated,
    /// The call failed or its output could not be decoded.
    Degraded(String),
    CredentialMissing,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationOutcome {
    pub recommendation: Recommendation,
    pub status: RecommendationStatus,
}

impl RecommendationOutcome {
    /// User-facing notice for anything other than a generated result.
    pub fn notice(&self) -> Option<String> {
        match &self.status {
            RecommendationStatus::Generated => None,
            RecommendationStatus::Degraded(reason) => {
                Some(format!("AI recommendation unavailable: {}", reason))
            }
            RecommendationStatus::CredentialMissing => Some(CREDENTIAL_MISSING_NOTICE.to_string()),
        }
    }
}

/// Single-shot recommendation generator. No caching and no retries.
#[derive(Clone)]
pub struct RecommendationEngine {
    provider: Arc<dyn CompletionProvider>,
}

impl RecommendationEngine {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Never fails: remote and decode errors become a neutral fallback.
    pub async fn recommend(
        &self,
        credential: Option<&ApiCredential>,
        input: &RecommendationInput<'_>,
    ) -> RecommendationOutcome {
        let Some(credential) = credential else {
            tracing::info!("No API credential set, skipping recommendation for {}", input.symbol);
            return RecommendationOutcome {
                recommendation: Recommendation::neutral_fallback(CREDENTIAL_MISSING_NOTICE),
                status: RecommendationStatus::CredentialMissing,
            };
        };

        let prompt = build_prompt(input);
        tracing::debug!("Recommendation prompt for {} is {} chars", input.symbol, prompt.len());

        let result = match self.provider.complete(&prompt, credential).await {
            Ok(text) => decode_recommendation(&text),
            Err(e) => Err(e),
        };

        match result {
            Ok(recommendation) => {
                tracing::info!(
                    "Recommendation for {}: {} ({} risk factors)",
                    input.symbol,
                    recommendation.action,
                    recommendation.risk_factors.len()
                );
                RecommendationOutcome {
                    recommendation,
                    status: RecommendationStatus::Generated,
                }
            }
            Err(e) => {
                tracing::warn!("Recommendation for {} failed: {}", input.symbol, e);
                RecommendationOutcome {
                    recommendation: Recommendation::neutral_fallback(FALLBACK_SUMMARY),
                    status: RecommendationStatus::Degraded(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LlmError, LlmResult};
    use analysis_core::{Action, PriceSeries, Symbol};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        reply: Result<String, String>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self { reply: Ok(text.to_string()), calls: AtomicUsize::new(0) })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self { reply: Err(message.to_string()), calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, _prompt: &str, _credential: &ApiCredential) -> LlmResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(LlmError::ServiceUnavailable)
        }
    }

    async fn run(provider: Arc<ScriptedProvider>, credential: Option<&ApiCredential>) -> RecommendationOutcome {
        let symbol = Symbol::parse("AAPL").unwrap();
        let series = PriceSeries::default();
        let input = RecommendationInput {
            symbol: &symbol,
            price_series: &series,
            metadata: None,
            metrics: None,
            news: &[],
        };
        RecommendationEngine::new(provider).recommend(credential, &input).await
    }

    #[tokio::test]
    async fn test_generated_recommendation() {
        let provider = ScriptedProvider::ok(r#"{"recommendation":"BUY","summary":"Good","risk_factors":["Rates"]}"#);
        let credential = ApiCredential::new("key").unwrap();
        let outcome = run(provider.clone(), Some(&credential)).await;

        assert_eq!(outcome.status, RecommendationStatus::Generated);
        assert_eq!(outcome.recommendation.action, Action::Buy);
        assert!(outcome.notice().is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remote_error_falls_back_to_neutral() {
        let provider = ScriptedProvider::failing("Status: 503");
        let credential = ApiCredential::new("key").unwrap();
        let outcome = run(provider, Some(&credential)).await;

        assert_eq!(outcome.recommendation.action, Action::Neutral);
        assert!(outcome.recommendation.risk_factors.is_empty());
        assert_eq!(outcome.recommendation.summary, FALLBACK_SUMMARY);
        assert!(matches!(outcome.status, RecommendationStatus::Degraded(ref r) if r.contains("503")));
        assert!(outcome.notice().is_some());
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back_to_neutral() {
        let provider = ScriptedProvider::ok("I think you should buy it.");
        let credential = ApiCredential::new("key").unwrap();
        let outcome = run(provider, Some(&credential)).await;

        assert_eq!(outcome.recommendation.action, Action::Neutral);
        assert!(matches!(outcome.status, RecommendationStatus::Degraded(_)));
    }

    #[tokio::test]
    async fn test_missing_credential_skips_call() {
        let provider = ScriptedProvider::ok(r#"{"recommendation":"BUY"}"#);
        let outcome = run(provider.clone(), None).await;

        assert_eq!(outcome.status, RecommendationStatus::CredentialMissing);
        assert_eq!(outcome.recommendation.action, Action::Neutral);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.notice().as_deref(), Some(CREDENTIAL_MISSING_NOTICE));
    }
}
