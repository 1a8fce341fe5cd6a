//! Custom error types for prplease
//!
//! Every pipeline stage reports failures through [`PrPleaseError`]; the
//! caller-facing boundary turns them into short user-facing messages.

use std::time::Duration;

use thiserror::Error;

/// Generic message shown when an error text is unsafe to display verbatim.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while generating the PR description. Please try again.";

/// Main error type for prplease
#[derive(Error, Debug)]
pub enum PrPleaseError {
    /// The PR diff could not be retrieved
    #[error("{0}")]
    FetchFailure(String),

    /// Bad URL scheme, malformed URL or missing credential
    #[error("{0}")]
    InvalidConfiguration(String),

    /// The model call exceeded its time bound
    #[error("Request timed out after {}", describe_duration(.0))]
    Timeout(Duration),

    /// Model output was not valid JSON
    #[error("The AI returned an invalid response. Please try again.")]
    InvalidModelResponse(String),

    /// Model output parsed but a required field is missing or empty
    #[error("The AI response is missing required {0} field. Please try again.")]
    IncompleteModelResponse(String),

    /// Non-2xx answer from the model provider or the relay
    #[error("{0}")]
    ProviderError(String),

    /// Persisted settings could not be located or are invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Network request error
    #[error("Network request failed: {0}\n\n  → Check your internet connection.")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Settings file is invalid: {0}")]
    Toml(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),
}

impl PrPleaseError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PrPleaseError::Timeout(_)
                | PrPleaseError::InvalidModelResponse(_)
                | PrPleaseError::IncompleteModelResponse(_)
        )
    }

    /// Message safe to show in a constrained UI surface.
    ///
    /// Text that looks like markup is replaced with a generic message.
    pub fn display_message(&self) -> String {
        display_safe(&self.to_string())
    }
}

impl From<toml::de::Error> for PrPleaseError {
    fn from(err: toml::de::Error) -> Self {
        PrPleaseError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for PrPleaseError {
    fn from(err: toml::ser::Error) -> Self {
        PrPleaseError::Toml(err.to_string())
    }
}

/// Whole seconds when exact, milliseconds otherwise
fn describe_duration(limit: &Duration) -> String {
    let millis = limit.as_millis();
    match millis {
        1000 => "1 second".to_string(),
        m if m % 1000 == 0 => format!("{} seconds", m / 1000),
        m => format!("{} ms", m),
    }
}

/// Return `text` unless it contains markup characters
pub fn display_safe(text: &str) -> String {
    if text.trim().is_empty() || text.contains('<') || text.contains('>') {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        text.to_string()
    }
}

/// Result type alias using PrPleaseError
pub type Result<T> = std::result::Result<T, PrPleaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_is_replaced() {
        let err = PrPleaseError::ProviderError("<html><body>Bad Gateway</body></html>".into());
        assert_eq!(err.display_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_plain_message_is_kept() {
        let err = PrPleaseError::FetchFailure(
            "Failed to fetch PR diff. Make sure the PR URL is accessible.".into(),
        );
        assert_eq!(
            err.display_message(),
            "Failed to fetch PR diff. Make sure the PR URL is accessible."
        );
    }

    #[test]
    fn test_timeout_is_distinct_and_retryable() {
        let err = PrPleaseError::Timeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "Request timed out after 60 seconds");
        assert!(err.is_retryable());
        assert!(!PrPleaseError::InvalidConfiguration("x".into()).is_retryable());
    }

    #[test]
    fn test_timeout_message_keeps_sub_second_limits() {
        let cases = [
            (Duration::from_millis(250), "Request timed out after 250 ms"),
            (Duration::from_millis(1500), "Request timed out after 1500 ms"),
            (Duration::from_secs(1), "Request timed out after 1 second"),
        ];
        for (limit, expected) in cases {
            assert_eq!(PrPleaseError::Timeout(limit).to_string(), expected);
        }
    }

    #[test]
    fn test_incomplete_names_the_field() {
        let err = PrPleaseError::IncompleteModelResponse("description".into());
        assert!(err.to_string().contains("description"));
    }
}
