//! Shared plumbing for provider REST calls — error mapping and config
//! field extraction.

use relayhub_domain::error::{ConfigurationError, ProviderError, RelayHubError};

/// Map a transport-level reqwest failure onto the domain error.
pub(crate) fn transport(provider: &str, err: reqwest::Error) -> RelayHubError {
    if err.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
        }
        .into()
    } else {
        ProviderError::Transport {
            provider: provider.to_string(),
            detail: err.to_string(),
        }
        .into()
    }
}

/// Pass a 2xx response through, turn anything else into a
/// [`ProviderError::Status`] carrying the body.
pub(crate) async fn expect_success(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, RelayHubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        provider: provider.to_string(),
        status: status.as_u16(),
        body,
    }
    .into())
}

/// A 2xx response whose JSON did not contain what we needed.
pub(crate) fn missing_data(provider: &str, field: &'static str) -> RelayHubError {
    ProviderError::MissingData {
        provider: provider.to_string(),
        field,
    }
    .into()
}

/// Extract a required, non-empty string field from a hook config.
pub(crate) fn require_str(
    config: &serde_json::Value,
    field: &'static str,
) -> Result<String, RelayHubError> {
    config
        .get(field)
        .and_then(serde_json::Value::as_str)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| ConfigurationError::MissingField(field).into())
}

/// Extract an optional string field from a hook config.
pub(crate) fn optional_str(config: &serde_json::Value, field: &str) -> Option<String> {
    config
        .get(field)
        .and_then(serde_json::Value::as_str)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Deserialize a whole hook config into a typed struct.
pub(crate) fn parse_config<T: serde::de::DeserializeOwned>(
    config: &serde_json::Value,
) -> Result<T, RelayHubError> {
    serde_json::from_value(config.clone())
        .map_err(|err| ConfigurationError::Invalid(err.to_string()).into())
}
