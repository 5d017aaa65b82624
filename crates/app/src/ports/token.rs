//! Token ports — provider refresh endpoint and the access-token source
//! handed to hooks.

use std::future::Future;

use async_trait::async_trait;

use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::UserId;

/// Fresh token material returned by a provider's token endpoint.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    /// Lifetime of the new access token, in seconds.
    pub expires_in_secs: i64,
    /// Present only when the provider rotates refresh tokens.
    pub refresh_token: Option<String>,
}

/// A provider's OAuth token endpoint (`grant_type=refresh_token`).
pub trait TokenEndpoint {
    /// Exchange a refresh token for a new grant.
    fn refresh(
        &self,
        provider: &str,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenGrant, RelayHubError>> + Send;
}

/// Hands evaluators and executors a currently-valid access token for a
/// (user, provider) pair, refreshing transparently when needed.
#[async_trait]
pub trait AccessTokens: Send + Sync {
    /// Return a valid access token.
    ///
    /// # Errors
    ///
    /// [`RelayHubError::Credential`] when the account is not linked or has
    /// no refresh token; [`RelayHubError::Refresh`] when the provider
    /// rejects the refresh.
    async fn access_token(&self, owner: UserId, provider: &str) -> Result<String, RelayHubError>;
}
