//! Client for the prplease relay service
//!
//! The relay holds the provider credential; this side only sends the commit
//! list and the cleaned diff.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ai::generator::{with_timeout, PrGenerator, DEFAULT_TIMEOUT};
use crate::ai::response::{self, GenerationResult};
use crate::error::{PrPleaseError, Result};

/// Relay address used when none is configured
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:3000";

const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https"];

/// Body of `POST /generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub commits: Vec<String>,
    pub diff: String,
}

/// Body of `GET /ping`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Validate a relay base URL; only HTTP and HTTPS are accepted
pub fn validate_service_url(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw.trim())
        .map_err(|_| PrPleaseError::InvalidConfiguration("Invalid service URL format.".to_string()))?;

    if !ALLOWED_URL_SCHEMES.contains(&parsed.scheme()) {
        return Err(PrPleaseError::InvalidConfiguration(format!(
            "Invalid URL scheme: {}:. Only HTTP and HTTPS are allowed.",
            parsed.scheme()
        )));
    }
    Ok(parsed)
}

/// Join `path` onto a validated base with exactly one slash
pub fn endpoint(base: &Url, path: &str) -> String {
    let base = base.as_str();
    if base.ends_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Relayed transport
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    service_url: String,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            service_url: service_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Liveness check against `GET /ping`
    pub async fn ping(&self) -> Result<PingResponse> {
        let base = validate_service_url(&self.service_url)?;
        let url = endpoint(&base, "ping");

        let request = async {
            let response = self.client.get(&url).send().await?;
            if !response.status().is_success() {
                return Err(PrPleaseError::ProviderError(format!(
                    "Service error ({})",
                    response.status()
                )));
            }
            Ok(response.json::<PingResponse>().await?)
        };
        with_timeout(self.timeout, request).await
    }

    async fn post_generate(&self, url: &str, body: &GenerateRequest) -> Result<GenerationResult> {
        let response = self.client.post(url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Failed to communicate with service.".to_string());
            tracing::debug!(%status, %message, "Relay rejected generation request");
            return Err(PrPleaseError::ProviderError(message));
        }

        let text = response.text().await?;
        response::parse(&text)
    }
}

#[async_trait]
impl PrGenerator for RelayClient {
    async fn generate(&self, commits: &[String], diff: &str) -> Result<GenerationResult> {
        // Scheme check happens before any network I/O.
        let base = validate_service_url(&self.service_url)?;
        let url = endpoint(&base, "generate");

        let body = GenerateRequest {
            commits: commits.to_vec(),
            diff: diff.to_string(),
        };
        with_timeout(self.timeout, self.post_generate(&url, &body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_and_https_are_accepted() {
        assert!(validate_service_url("http://localhost:3000").is_ok());
        assert!(validate_service_url("https://relay.example.com/api/").is_ok());
    }

    #[test]
    fn test_other_schemes_are_rejected() {
        for url in ["ftp://relay.example.com", "file:///etc/passwd", "javascript:alert(1)"] {
            let err = validate_service_url(url).unwrap_err();
            assert!(
                matches!(err, PrPleaseError::InvalidConfiguration(ref m) if m.starts_with("Invalid URL scheme")),
                "{url} -> {err:?}"
            );
        }
    }

    #[test]
    fn test_malformed_url_is_rejected() {
        let err = validate_service_url("localhost 3000").unwrap_err();
        assert!(matches!(err, PrPleaseError::InvalidConfiguration(ref m) if m == "Invalid service URL format."));
    }

    #[test]
    fn test_endpoint_joins_with_single_slash() {
        let with_slash = validate_service_url("https://relay.example.com/api/").unwrap();
        assert_eq!(endpoint(&with_slash, "generate"), "https://relay.example.com/api/generate");

        let bare = validate_service_url("http://localhost:3000").unwrap();
        // Url normalises an empty path to "/"
        assert_eq!(endpoint(&bare, "generate"), "http://localhost:3000/generate");
    }

    #[tokio::test]
    async fn test_invalid_scheme_fails_before_network() {
        let client = RelayClient::new("ftp://relay.example.com");
        let err = client.generate(&[], "diff").await.unwrap_err();
        assert!(matches!(err, PrPleaseError::InvalidConfiguration(_)));
    }
}
