//! LLM-backed BUY/SELL/NEUTRAL recommendations.

use async_trait::async_trait;

pub mod credential;
pub mod decode;
pub mod engine;
pub mod error;
pub mod gemini;
pub mod prompt;

pub use credential::{ApiCredential, CredentialStore};
pub use decode::decode_recommendation;
pub use engine::{
    RecommendationEngine, RecommendationOutcome, RecommendationStatus, CREDENTIAL_MISSING_NOTICE,
    FALLBACK_SUMMARY,
};
pub use error::{LlmError, LlmResult};
pub use gemini::{GeminiClient, GeminiConfig};
pub use prompt::{build_prompt, RecommendationInput};

/// Text-generation backend
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str, credential: &ApiCredential) -> LlmResult<String>;
}
