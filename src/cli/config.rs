//! Configuration CLI command handlers

use crate::ai::gemini::{is_known_model, DEFAULT_MODEL, MODEL_OPTIONS};
use crate::ai::relay_client::{validate_service_url, DEFAULT_SERVICE_URL};
use crate::cli::commands::{ConfigCommand, ConfigKey};
use crate::core::config::{GenerationMode, Settings};
use crate::core::obfuscation::mask_api_key;
use crate::error::{PrPleaseError, Result};

/// Handle configuration commands
pub fn handle_config(command: ConfigCommand) -> Result<()> {
    let mut settings = Settings::load()?;
    match command {
        ConfigCommand::Set { key, value } => {
            let message = apply_set(&mut settings, key, &value)?;
            settings.save()?;
            println!("{}", message);
        }
        ConfigCommand::Get { key } => println!("{}", describe(&settings, key)),
        ConfigCommand::Remove { key } => {
            let message = apply_remove(&mut settings, key);
            settings.save()?;
            println!("{}", message);
        }
    }
    Ok(())
}

/// Validate and store `value`; returns the confirmation line
fn apply_set(settings: &mut Settings, key: ConfigKey, value: &str) -> Result<String> {
    let value = value.trim();
    match key {
        ConfigKey::Mode => {
            settings.mode = match value {
                "local" => GenerationMode::Local,
                "remote" => GenerationMode::Remote,
                other => {
                    return Err(PrPleaseError::InvalidInput(format!(
                        "Invalid mode '{}'. Use 'local' or 'remote'.",
                        other
                    )))
                }
            };
            Ok(format!("Generation mode set to: {}", settings.mode))
        }
        ConfigKey::ApiKey => {
            if value.is_empty() {
                return Err(PrPleaseError::InvalidInput("Please enter an API key".to_string()));
            }
            settings.set_api_key(value);
            Ok("Gemini API key has been stored (obfuscated, not encrypted).".to_string())
        }
        ConfigKey::ServiceUrl => {
            validate_service_url(value)?;
            settings.service_url = value.to_string();
            Ok(format!("Service URL set to: {}", value))
        }
        ConfigKey::BaseUrl => {
            validate_service_url(value)?;
            settings.base_url = Some(value.to_string());
            Ok(format!("Gemini base URL set to: {}", value))
        }
        ConfigKey::Model => {
            if !is_known_model(value) {
                return Err(PrPleaseError::InvalidInput(format!(
                    "Invalid model '{}'. Available models: {}",
                    value,
                    MODEL_OPTIONS.join(", ")
                )));
            }
            settings.model = value.to_string();
            Ok(format!("Gemini model set to: {}", value))
        }
    }
}

fn describe(settings: &Settings, key: ConfigKey) -> String {
    match key {
        ConfigKey::Mode => format!("Generation mode: {}", settings.mode),
        ConfigKey::ApiKey => match settings.stored_api_key() {
            Some(key) => format!("Gemini API key: {}", mask_api_key(&key)),
            None => "Gemini API key: Not configured".to_string(),
        },
        ConfigKey::ServiceUrl => format!("Service URL: {}", settings.service_url),
        ConfigKey::BaseUrl => format!(
            "Gemini base URL: {}",
            settings.base_url.as_deref().unwrap_or("(provider default)")
        ),
        ConfigKey::Model => format!("Gemini model: {}", settings.model),
    }
}

fn apply_remove(settings: &mut Settings, key: ConfigKey) -> String {
    match key {
        ConfigKey::Mode => {
            settings.mode = GenerationMode::default();
            format!("Generation mode reset to default: {}", settings.mode)
        }
        ConfigKey::ApiKey => {
            settings.clear_api_key();
            "Gemini API key has been removed.".to_string()
        }
        ConfigKey::ServiceUrl => {
            settings.service_url = DEFAULT_SERVICE_URL.to_string();
            format!("Service URL reset to default: {}", DEFAULT_SERVICE_URL)
        }
        ConfigKey::BaseUrl => {
            settings.base_url = None;
            "Gemini base URL reset to the provider default.".to_string()
        }
        ConfigKey::Model => {
            settings.model = DEFAULT_MODEL.to_string();
            format!("Gemini model reset to default: {}", DEFAULT_MODEL)
        }
    }
}
