//! Token lifecycle service — keeps provider access tokens valid.
//!
//! `valid_token` returns the cached access token while it is comfortably
//! inside its lifetime, and otherwise refreshes through the provider's
//! token endpoint, persisting the new material before returning. Refreshes
//! for the same (user, provider) pair are single-flighted through a
//! per-credential async lock: with rotating refresh tokens, a duplicate
//! refresh can invalidate the credential.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;

use relayhub_domain::error::{CredentialError, RelayHubError};
use relayhub_domain::id::UserId;
use relayhub_domain::time;

use crate::ports::{AccessTokens, CredentialRepository, TokenEndpoint};

/// Default safety margin: refresh when the token expires within 5 minutes.
const DEFAULT_MARGIN_SECS: i64 = 300;

/// Token lifecycle manager over a credential store and a refresh endpoint.
pub struct TokenService<C, E> {
    credentials: C,
    endpoint: E,
    margin: Duration,
    locks: Mutex<HashMap<(UserId, String), Arc<tokio::sync::Mutex<()>>>>,
}

impl<C, E> TokenService<C, E>
where
    C: CredentialRepository + Send + Sync,
    E: TokenEndpoint + Send + Sync,
{
    /// Create a service with the default 5-minute refresh margin.
    pub fn new(credentials: C, endpoint: E) -> Self {
        Self::with_margin(credentials, endpoint, Duration::seconds(DEFAULT_MARGIN_SECS))
    }

    /// Create a service with a custom refresh margin.
    pub fn with_margin(credentials: C, endpoint: E, margin: Duration) -> Self {
        Self {
            credentials,
            endpoint,
            margin,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, owner: UserId, provider: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(
            locks
                .entry((owner, provider.to_string()))
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }

    /// Return a currently-valid access token for (owner, provider).
    ///
    /// # Errors
    ///
    /// - [`RelayHubError::Credential`] when no credential exists or it has
    ///   no refresh token
    /// - [`RelayHubError::Refresh`] when the provider rejects the refresh
    /// - storage errors from the credential repository
    #[tracing::instrument(skip(self), fields(owner = %owner))]
    pub async fn valid_token(
        &self,
        owner: UserId,
        provider: &str,
    ) -> Result<String, RelayHubError> {
        let lock = self.lock_for(owner, provider);
        let _guard = lock.lock().await;

        let credential = self.credentials.get(owner, provider).await?.ok_or_else(|| {
            CredentialError::NotLinked {
                provider: provider.to_string(),
            }
        })?;
        let Some(refresh_token) = credential.refresh_token.clone() else {
            return Err(CredentialError::NoRefreshToken {
                provider: provider.to_string(),
            }
            .into());
        };

        if !credential.expires_within(self.margin, time::now()) {
            return Ok(credential.access_token);
        }

        let grant = self.endpoint.refresh(provider, &refresh_token).await?;
        let expires_at = time::now() + Duration::seconds(grant.expires_in_secs);
        self.credentials
            .update_tokens(
                owner,
                provider,
                &grant.access_token,
                expires_at,
                grant.refresh_token.as_deref(),
            )
            .await?;
        tracing::debug!(provider, "access token refreshed");
        Ok(grant.access_token)
    }
}

#[async_trait]
impl<C, E> AccessTokens for TokenService<C, E>
where
    C: CredentialRepository + Send + Sync,
    E: TokenEndpoint + Send + Sync,
{
    async fn access_token(&self, owner: UserId, provider: &str) -> Result<String, RelayHubError> {
        self.valid_token(owner, provider).await
    }
}
