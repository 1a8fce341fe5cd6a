//! Model response parsing and validation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PrPleaseError, Result};

/// Generated PR content. Both fields are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// PR title
    pub title: String,
    /// PR description (markdown)
    pub description: String,
}

/// Remove a ```` ```json ```` / ```` ``` ```` fence wrapped around the payload
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    unfenced.strip_suffix("```").unwrap_or(unfenced).trim()
}

/// Parse raw model text into a validated [`GenerationResult`]
///
/// The markdown inside `description` is returned verbatim.
pub fn parse(raw: &str) -> Result<GenerationResult> {
    let payload = strip_code_fence(raw);

    let value: Value = serde_json::from_str(payload).map_err(|e| {
        tracing::debug!(error = %e, "Model response is not JSON");
        PrPleaseError::InvalidModelResponse(e.to_string())
    })?;

    let object = value.as_object().ok_or_else(|| {
        PrPleaseError::InvalidModelResponse("expected a JSON object".to_string())
    })?;

    let title = required_field(object, "title")?;
    let description = required_field(object, "description")?;

    Ok(GenerationResult { title, description })
}

fn required_field(object: &serde_json::Map<String, Value>, field: &str) -> Result<String> {
    match object.get(field).and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(PrPleaseError::IncompleteModelResponse(field.to_string())),
    }
}
