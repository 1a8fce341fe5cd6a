//! CLI command definitions using clap
//!
//! Defines the command structure for the `prplease` CLI tool.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use secrecy::SecretString;

use crate::ai::gemini::DEFAULT_MODEL;
use crate::core::config::GenerationMode;
use crate::relay::config::{
    RelayConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RATE_LIMIT_MAX,
    DEFAULT_RATE_LIMIT_WINDOW_SECS, DEFAULT_TIMEOUT_MS,
};

/// prplease - PR title and description drafts from your diff
#[derive(Parser, Debug)]
#[command(name = "prplease", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the relay service
    Serve(ServeArgs),

    /// Generate a PR title and description for a pull request
    Generate(GenerateArgs),

    /// Check that a relay service is reachable
    Ping(PingArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Serve
// ─────────────────────────────────────────────────────────────────────────────

/// Relay settings; every flag can also come from the environment
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "RELAY_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Model call timeout in milliseconds
    #[arg(long = "timeout-ms", env = "TIMEOUT", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Commit messages kept per prompt
    #[arg(long, env = "MAX_COMMITS_LENGTH", default_value_t = crate::ai::prompts::DEFAULT_MAX_COMMITS)]
    pub max_commits: usize,

    /// Diff characters kept per prompt
    #[arg(long, env = "MAX_DIFF_LENGTH", default_value_t = crate::ai::prompts::DEFAULT_MAX_DIFF_LENGTH)]
    pub max_diff_length: usize,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, hide = true)]
    pub api_key: Option<String>,

    /// Alternate Gemini base URL
    #[arg(long, env = "GOOGLE_GEMINI_BASE_URL")]
    pub gemini_base_url: Option<String>,

    /// Origin allowed by CORS (defaults to any origin)
    #[arg(long, env = "EXTENSION_ID")]
    pub extension_id: Option<String>,

    /// Requests allowed per rate-limit window
    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = DEFAULT_RATE_LIMIT_MAX)]
    pub rate_limit_max: u32,

    /// Rate-limit window in seconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = DEFAULT_RATE_LIMIT_WINDOW_SECS)]
    pub rate_limit_window: u64,

    /// Cached responses kept (0 = unbounded)
    #[arg(long, env = "CACHE_CAPACITY", default_value_t = crate::relay::cache::DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,
}

impl ServeArgs {
    pub fn into_config(self) -> RelayConfig {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        RelayConfig {
            host: self.host,
            port: self.port,
            timeout: Duration::from_millis(self.timeout_ms),
            max_commits: self.max_commits,
            max_diff_length: self.max_diff_length,
            model: self.model,
            api_key: non_empty(self.api_key).map(SecretString::from),
            gemini_base_url: non_empty(self.gemini_base_url),
            extension_id: non_empty(self.extension_id),
            rate_limit_max: self.rate_limit_max,
            rate_limit_window: Duration::from_secs(self.rate_limit_window),
            cache_capacity: self.cache_capacity,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generate
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Pull request URL (".diff" is appended when missing)
    pub pr_url: String,

    /// Commit message, repeat for several
    #[arg(short = 'c', long = "commit")]
    pub commits: Vec<String>,

    /// File with one commit message per line
    #[arg(long)]
    pub commits_file: Option<PathBuf>,

    /// Override the configured generation mode
    #[arg(long)]
    pub mode: Option<GenerationMode>,

    /// Override the configured relay URL
    #[arg(long)]
    pub service_url: Option<String>,

    /// Override the configured Gemini model
    #[arg(long)]
    pub model: Option<String>,

    /// Override the configured Gemini base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Diff lines kept per file before truncation
    #[arg(long, default_value_t = crate::diff::filter::DEFAULT_MAX_LINES_PER_FILE)]
    pub max_lines_per_file: usize,

    /// Extra filename pattern to skip, on top of lock files and `.env`
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Ping
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Relay URL (defaults to the configured one)
    #[arg(long)]
    pub service_url: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: ConfigKey,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: ConfigKey,
    },

    /// Remove a configuration value
    Remove {
        /// Configuration key
        key: ConfigKey,
    },
}

/// Available configuration keys
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigKey {
    /// Generation mode (local or remote)
    #[value(name = "mode")]
    Mode,

    /// Gemini API key (stored obfuscated)
    #[value(name = "api-key")]
    ApiKey,

    /// Relay service URL
    #[value(name = "service-url")]
    ServiceUrl,

    /// Alternate Gemini base URL
    #[value(name = "base-url")]
    BaseUrl,

    /// Gemini model selection
    #[value(name = "model")]
    Model,
}
