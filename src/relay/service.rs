//! Relay-side generation: credential check, cache, model call

use std::sync::Arc;

use crate::ai::generator::{DirectGenerator, ModelClient, PrGenerator};
use crate::ai::{GeminiClient, GenerationResult};
use crate::error::{PrPleaseError, Result};
use crate::relay::cache::{cache_key, ResponseCache};
use crate::relay::config::RelayConfig;

/// Error text returned when the relay has no provider credential
pub const MISSING_KEY_MESSAGE: &str = "Service Configuration Error: Missing Gemini API Key.";

/// Handles `/generate` requests for the relay
pub struct RelayService {
    /// `None` when no API key is configured
    generator: Option<DirectGenerator>,
    cache: Arc<ResponseCache>,
}

impl RelayService {
    pub fn new(model: Option<Arc<dyn ModelClient>>, cache: Arc<ResponseCache>, config: &RelayConfig) -> Self {
        let generator =
            model.map(|model| DirectGenerator::new(model, config.prompt_builder(), config.timeout));
        Self { generator, cache }
    }

    /// Build the service with a Gemini client from `config`
    pub fn from_config(config: &RelayConfig) -> Self {
        let model = config.api_key.clone().map(|key| {
            let client = GeminiClient::new(key, config.model.clone())
                .with_base_url(config.gemini_base_url.as_deref());
            tracing::info!(model = client.model_name(), "Gemini client configured");
            Arc::new(client) as Arc<dyn ModelClient>
        });
        Self::new(model, Arc::new(ResponseCache::new(config.cache_capacity)), config)
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Answer from cache when possible, otherwise call the model and cache the result
    ///
    /// Concurrent requests for the same key may both reach the model.
    pub async fn generate(&self, commits: &[String], diff: &str) -> Result<GenerationResult> {
        tracing::info!(
            commit_count = commits.len(),
            diff_length = diff.len(),
            "Received generation request"
        );

        let Some(generator) = &self.generator else {
            return Err(PrPleaseError::InvalidConfiguration(MISSING_KEY_MESSAGE.to_string()));
        };

        let key = cache_key(commits, diff);
        if let Some(cached) = self.cache.get(&key) {
            tracing::info!("Serving from cache");
            return Ok(cached);
        }

        let result = generator.generate(commits, diff).await?;
        self.cache.put(key, result.clone());
        Ok(result)
    }
}

/// Short client-facing text for a relay failure
///
/// Provider bodies and internal details stay in the server log.
pub fn client_message(err: &PrPleaseError) -> String {
    match err {
        PrPleaseError::InvalidConfiguration(message) => message.clone(),
        PrPleaseError::Timeout(_)
        | PrPleaseError::InvalidModelResponse(_)
        | PrPleaseError::IncompleteModelResponse(_) => err.to_string(),
        _ => "Failed to generate content".to_string(),
    }
}
