//! Caller-facing generation pipeline
//!
//! `{commits, prUrl}` in, `{title, description}` out: fetch the PR diff,
//! filter and clean it, then hand it to the configured generator.

use std::sync::Arc;

use crate::ai::generator::{DirectGenerator, ModelClient, PrGenerator, DEFAULT_TIMEOUT};
use crate::ai::prompts::PromptBuilder;
use crate::ai::{GeminiClient, GenerationResult, RelayClient};
use crate::core::config::{GenerationMode, Settings};
use crate::diff::{sanitize, DiffFetcher, FilterPolicy};
use crate::error::{PrPleaseError, Result};

/// What the UI side sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrRequest {
    /// Commit messages, in the order they were listed
    pub commits: Vec<String>,
    /// Pull request page URL
    pub pr_url: String,
}

pub struct Pipeline {
    fetcher: DiffFetcher,
    policy: FilterPolicy,
    generator: Arc<dyn PrGenerator>,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn PrGenerator>) -> Self {
        Self {
            fetcher: DiffFetcher::default(),
            policy: FilterPolicy::default(),
            generator,
        }
    }

    /// Build a pipeline for the mode in `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let generator: Arc<dyn PrGenerator> = match settings.mode {
            GenerationMode::Local => {
                let api_key = settings.api_key().ok_or_else(|| {
                    PrPleaseError::InvalidConfiguration(
                        "Gemini API Key is missing for Local mode.".to_string(),
                    )
                })?;
                let model = GeminiClient::new(api_key, settings.model.clone())
                    .with_base_url(settings.base_url.as_deref());
                tracing::debug!(model = model.model_name(), "Calling Gemini directly");
                Arc::new(DirectGenerator::new(
                    Arc::new(model) as Arc<dyn ModelClient>,
                    PromptBuilder::default(),
                    DEFAULT_TIMEOUT,
                ))
            }
            GenerationMode::Remote => {
                tracing::debug!(service_url = %settings.service_url, "Generating through relay");
                Arc::new(RelayClient::new(settings.service_url.clone()))
            }
        };
        Ok(Self::new(generator))
    }

    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch the diff behind `request.pr_url` and generate PR content
    pub async fn run(&self, request: &PrRequest) -> Result<GenerationResult> {
        let raw = self.fetcher.fetch(&request.pr_url).await?;
        self.run_with_diff(&request.commits, &raw).await
    }

    /// Generate PR content for an already retrieved raw diff
    pub async fn run_with_diff(&self, commits: &[String], raw_diff: &str) -> Result<GenerationResult> {
        let cleaned = sanitize(raw_diff, &self.policy);
        tracing::debug!(
            raw_length = raw_diff.len(),
            cleaned_length = cleaned.len(),
            commit_count = commits.len(),
            "Sanitized diff"
        );
        self.generator.generate(commits, &cleaned).await
    }
}
