//! Model client seams and the direct generation path
//!
//! [`ModelClient`] is the raw "prompt in, text out" call. [`PrGenerator`] is
//! the caller-facing "commits and diff in, validated result out" operation,
//! implemented directly on top of a model (here) or through a relay
//! (`relay_client`).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::ai::prompts::PromptBuilder;
use crate::ai::response::{self, GenerationResult};
use crate::error::{PrPleaseError, Result};

/// Default bound on a single model call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A generative-language endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `prompt` and return the model's raw text. Single attempt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Anything that turns commits and a cleaned diff into PR content
#[async_trait]
pub trait PrGenerator: Send + Sync {
    async fn generate(&self, commits: &[String], diff: &str) -> Result<GenerationResult>;
}

/// Await `future`, failing with [`PrPleaseError::Timeout`] once `limit` elapses
pub async fn with_timeout<T, F>(limit: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Model call timed out");
            Err(PrPleaseError::Timeout(limit))
        }
    }
}

/// Prompt builder → model → response parser, bounded by a timeout
#[derive(Clone)]
pub struct DirectGenerator {
    model: Arc<dyn ModelClient>,
    prompts: PromptBuilder,
    timeout: Duration,
}

impl DirectGenerator {
    pub fn new(model: Arc<dyn ModelClient>, prompts: PromptBuilder, timeout: Duration) -> Self {
        Self {
            model,
            prompts,
            timeout,
        }
    }
}

#[async_trait]
impl PrGenerator for DirectGenerator {
    async fn generate(&self, commits: &[String], diff: &str) -> Result<GenerationResult> {
        let prompt = self.prompts.build(commits, diff);
        tracing::debug!(prompt_length = prompt.len(), "Sending prompt to model");

        let raw = with_timeout(self.timeout, self.model.generate(&prompt)).await?;
        response::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StalledModel;

    #[async_trait]
    impl ModelClient for StalledModel {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            std::future::pending().await
        }
    }

    fn commits() -> Vec<String> {
        vec!["fix: null check".to_string()]
    }

    #[tokio::test]
    async fn test_direct_generator_parses_model_output() {
        let mut model = MockModelClient::new();
        model
            .expect_generate()
            .withf(|prompt: &str| prompt.contains("fix: null check") && prompt.contains("if (a)"))
            .times(1)
            .returning(|_| Ok(r###"{"title":"fix: guard null","description":"## Summary\nok"}"###.to_string()));

        let generator = DirectGenerator::new(Arc::new(model), PromptBuilder::default(), DEFAULT_TIMEOUT);
        let result = generator.generate(&commits(), "if (a)").await.unwrap();

        assert_eq!(result.title, "fix: guard null");
        assert_eq!(result.description, "## Summary\nok");
    }

    #[tokio::test]
    async fn test_direct_generator_surfaces_invalid_output() {
        let mut model = MockModelClient::new();
        model
            .expect_generate()
            .returning(|_| Ok("Sure! Here is your PR".to_string()));

        let generator = DirectGenerator::new(Arc::new(model), PromptBuilder::default(), DEFAULT_TIMEOUT);
        let err = generator.generate(&commits(), "").await.unwrap_err();
        assert!(matches!(err, PrPleaseError::InvalidModelResponse(_)));
    }

    #[tokio::test]
    async fn test_direct_generator_propagates_provider_errors() {
        let mut model = MockModelClient::new();
        model
            .expect_generate()
            .returning(|_| Err(PrPleaseError::ProviderError("quota exceeded".to_string())));

        let generator = DirectGenerator::new(Arc::new(model), PromptBuilder::default(), DEFAULT_TIMEOUT);
        let err = generator.generate(&commits(), "").await.unwrap_err();
        assert!(matches!(err, PrPleaseError::ProviderError(ref m) if m == "quota exceeded"));
    }

    #[tokio::test]
    async fn test_stalled_model_times_out() {
        let generator = DirectGenerator::new(
            Arc::new(StalledModel),
            PromptBuilder::default(),
            Duration::from_millis(50),
        );

        let err = generator.generate(&commits(), "diff").await.unwrap_err();
        assert!(matches!(err, PrPleaseError::Timeout(limit) if limit == Duration::from_millis(50)));
        assert_eq!(err.to_string(), "Request timed out after 50 ms");
    }
}
