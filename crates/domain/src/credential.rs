//! Credential — per-user, per-provider OAuth state.

use serde::{Deserialize, Serialize};

use crate::id::{CredentialId, UserId};
use crate::time::Timestamp;

/// OAuth credential linking a user to a provider account.
///
/// The access token is valid only while `now < expires_at`; the refresh
/// token is the durable secret that regenerates it. A record without a
/// refresh token cannot be refreshed and is a permanent failure for that
/// (user, provider) pair until the account is re-linked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: CredentialId,
    pub owner_id: UserId,
    /// Provider name, e.g. `"google"`, `"spotify"`, `"github"`.
    pub provider: String,
    /// The provider's own identifier for the linked account.
    pub provider_account_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Timestamp,
}

impl Credential {
    /// Whether the access token is expired (or will be within `margin`)
    /// at instant `now`.
    #[must_use]
    pub fn expires_within(&self, margin: chrono::Duration, now: Timestamp) -> bool {
        now >= self.expires_at - margin
    }
}
