//! Client settings management
//!
//! Handles loading and saving the settings the generator runs with:
//! - Generation mode (direct Gemini call or relay)
//! - Obfuscated Gemini API key
//! - Relay URL, alternate Gemini base URL and model

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use directories::ProjectDirs;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::ai::gemini::DEFAULT_MODEL;
use crate::ai::relay_client::DEFAULT_SERVICE_URL;
use crate::core::obfuscation::{deobfuscate_api_key, obfuscate_api_key};
use crate::error::{PrPleaseError, Result};

/// Environment variable overriding the stored API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Where generation happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Call Gemini directly with the user's own key
    #[default]
    Local,
    /// Send commits and diff to a relay service
    Remote,
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMode::Local => write!(f, "local"),
            GenerationMode::Remote => write!(f, "remote"),
        }
    }
}

/// Persisted client settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub mode: GenerationMode,

    /// API key, obfuscated with [`obfuscate_api_key`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_encoded: Option<String>,

    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Alternate Gemini base URL for local mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,
}

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            api_key_encoded: None,
            service_url: default_service_url(),
            base_url: None,
            model: default_model(),
        }
    }
}

impl Settings {
    /// Load settings from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(Settings::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the settings file path
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "prplease", "prplease")
            .ok_or_else(|| PrPleaseError::Config("Could not determine config directory".into()))?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Store `plaintext` obfuscated
    pub fn set_api_key(&mut self, plaintext: &str) {
        self.api_key_encoded = Some(obfuscate_api_key(plaintext.trim()));
    }

    pub fn clear_api_key(&mut self) {
        self.api_key_encoded = None;
    }

    /// Stored key, decoded. Empty or undecodable keys count as absent.
    pub fn stored_api_key(&self) -> Option<SecretString> {
        self.api_key_encoded
            .as_deref()
            .map(deobfuscate_api_key)
            .filter(|key| !key.is_empty())
            .map(SecretString::from)
    }

    /// Key to use: environment first, then the stored key
    pub fn api_key(&self) -> Option<SecretString> {
        std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from)
            .or_else(|| self.stored_api_key())
    }
}
