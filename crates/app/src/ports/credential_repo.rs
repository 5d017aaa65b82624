//! Credential store port — per-user, per-provider OAuth records.

use std::future::Future;

use relayhub_domain::credential::Credential;
use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::UserId;
use relayhub_domain::time::Timestamp;

/// Repository for OAuth credentials.
///
/// Records are created when a user links a provider (out of scope here);
/// the engine only reads them and writes refreshed token material.
pub trait CredentialRepository {
    /// Get the credential for a (user, provider) pair, if linked.
    fn get(
        &self,
        owner: UserId,
        provider: &str,
    ) -> impl Future<Output = Result<Option<Credential>, RelayHubError>> + Send;

    /// Insert or replace a credential.
    fn upsert(
        &self,
        credential: Credential,
    ) -> impl Future<Output = Result<Credential, RelayHubError>> + Send;

    /// Persist refreshed token material. `refresh_token` is `None` when the
    /// provider did not rotate it; the stored value is then kept.
    fn update_tokens(
        &self,
        owner: UserId,
        provider: &str,
        access_token: &str,
        expires_at: Timestamp,
        refresh_token: Option<&str>,
    ) -> impl Future<Output = Result<(), RelayHubError>> + Send;
}
