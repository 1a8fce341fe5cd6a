//! PR diff retrieval

use reqwest::Client;
use url::Url;

use crate::error::{PrPleaseError, Result};

const DIFF_SUFFIX: &str = ".diff";

/// Message surfaced when the diff cannot be downloaded
pub const FETCH_FAILURE_MESSAGE: &str =
    "Failed to fetch PR diff. Make sure the PR URL is accessible.";

/// Derive the diff URL for a pull request page URL
///
/// `https://github.com/o/r/pull/7` becomes `https://github.com/o/r/pull/7.diff`;
/// URLs already ending in `.diff` are kept.
pub fn diff_url(pr_url: &str) -> Result<String> {
    let trimmed = pr_url.trim().trim_end_matches('/');

    let parsed = Url::parse(trimmed)
        .map_err(|_| PrPleaseError::FetchFailure(format!("Invalid PR URL: {}", trimmed)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PrPleaseError::FetchFailure(format!(
            "Invalid PR URL scheme: {}:. Only HTTP and HTTPS are allowed.",
            parsed.scheme()
        )));
    }

    if trimmed.ends_with(DIFF_SUFFIX) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}{}", trimmed, DIFF_SUFFIX))
    }
}

/// Downloads unified diffs for pull requests
#[derive(Debug, Clone, Default)]
pub struct DiffFetcher {
    client: Client,
}

impl DiffFetcher {
    /// Fetch the raw diff behind `pr_url`
    pub async fn fetch(&self, pr_url: &str) -> Result<String> {
        let url = diff_url(pr_url)?;
        tracing::debug!(%url, "Fetching PR diff");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(error = %e, "Diff request failed");
            PrPleaseError::FetchFailure(FETCH_FAILURE_MESSAGE.to_string())
        })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Diff request was rejected");
            return Err(PrPleaseError::FetchFailure(FETCH_FAILURE_MESSAGE.to_string()));
        }

        response
            .text()
            .await
            .map_err(|_| PrPleaseError::FetchFailure(FETCH_FAILURE_MESSAGE.to_string()))
    }
}
