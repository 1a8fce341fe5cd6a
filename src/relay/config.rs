//! Relay runtime configuration

use std::time::Duration;

use secrecy::SecretString;

use crate::ai::gemini::DEFAULT_MODEL;
use crate::ai::prompts::{PromptBuilder, DEFAULT_MAX_COMMITS, DEFAULT_MAX_DIFF_LENGTH};
use crate::relay::cache::DEFAULT_CACHE_CAPACITY;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Origin allowed when no extension identifier is configured
pub const ANY_ORIGIN: &str = "*";

/// Everything the relay needs at startup
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// Bound on a single model call
    pub timeout: Duration,
    pub max_commits: usize,
    pub max_diff_length: usize,
    pub model: String,
    /// Without it every `/generate` fails with a configuration error
    pub api_key: Option<SecretString>,
    /// Alternate Gemini base URL
    pub gemini_base_url: Option<String>,
    /// CORS origin; `None` allows any origin
    pub extension_id: Option<String>,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
    /// 0 disables eviction
    pub cache_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_commits: DEFAULT_MAX_COMMITS,
            max_diff_length: DEFAULT_MAX_DIFF_LENGTH,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            gemini_base_url: None,
            extension_id: None,
            rate_limit_max: DEFAULT_RATE_LIMIT_MAX,
            rate_limit_window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl RelayConfig {
    /// Value for `Access-Control-Allow-Origin`
    pub fn allowed_origin(&self) -> &str {
        self.extension_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(ANY_ORIGIN)
    }

    pub fn prompt_builder(&self) -> PromptBuilder {
        PromptBuilder::new(self.max_commits, self.max_diff_length)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
