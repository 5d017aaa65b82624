//! OAuth token endpoint adapter.
//!
//! Exchanges a stored `refresh_token` for a fresh access token against
//! each provider's token URL. Google, Spotify and GitHub all accept the
//! same `application/x-www-form-urlencoded` refresh grant, so one client
//! covers them all; per-provider URLs and credentials come from config.

use std::collections::HashMap;

use serde::Deserialize;

use relayhub_app::ports::{TokenEndpoint, TokenGrant};
use relayhub_domain::error::{ConfigurationError, RefreshError, RelayHubError};

const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Token URL and client credentials for one OAuth provider.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

fn default_expires_in() -> i64 {
    DEFAULT_EXPIRES_IN_SECS
}

/// HTTP implementation of the [`TokenEndpoint`] port.
pub struct HttpTokenEndpoint {
    client: reqwest::Client,
    providers: HashMap<String, OAuthClient>,
}

impl HttpTokenEndpoint {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            providers: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_provider(mut self, name: impl Into<String>, oauth: OAuthClient) -> Self {
        self.providers.insert(name.into(), oauth);
        self
    }
}

impl TokenEndpoint for HttpTokenEndpoint {
    async fn refresh(
        &self,
        provider: &str,
        refresh_token: &str,
    ) -> Result<TokenGrant, RelayHubError> {
        let oauth = self.providers.get(provider).ok_or_else(|| {
            ConfigurationError::Invalid(format!("no oauth client configured for {provider}"))
        })?;
        let response = self
            .client
            .post(&oauth.token_url)
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", oauth.client_id.as_str()),
                ("client_secret", oauth.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|err| crate::http::transport(provider, err))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefreshError {
                provider: provider.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }
        let parsed: RefreshResponse = response
            .json()
            .await
            .map_err(|err| crate::http::transport(provider, err))?;
        Ok(TokenGrant {
            access_token: parsed.access_token,
            expires_in_secs: parsed.expires_in,
            refresh_token: parsed.refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_fail_for_unconfigured_provider() {
        let endpoint = HttpTokenEndpoint::new(reqwest::Client::new());
        let result = endpoint.refresh("spotify", "tok").await;
        assert!(matches!(result, Err(RelayHubError::Configuration(_))));
    }

    #[test]
    fn should_default_expiry_when_response_omits_it() {
        let parsed: RefreshResponse =
            serde_json::from_str(r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(parsed.expires_in, DEFAULT_EXPIRES_IN_SECS);
        assert!(parsed.refresh_token.is_none());
    }

    #[test]
    fn should_parse_rotated_refresh_token() {
        let parsed: RefreshResponse = serde_json::from_str(
            r#"{"access_token": "abc", "expires_in": 1800, "refresh_token": "next"}"#,
        )
        .unwrap();
        assert_eq!(parsed.expires_in, 1800);
        assert_eq!(parsed.refresh_token.as_deref(), Some("next"));
    }
}
