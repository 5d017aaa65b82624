//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`RelayHubError`] via `#[from]` at port boundaries. Adapter-internal
//! errors (sqlx, reqwest, …) are boxed into [`RelayHubError::Storage`] or
//! mapped onto [`ProviderError`] so the domain stays free of IO crates.

/// Top-level error for the relayhub engine.
#[derive(Debug, thiserror::Error)]
pub enum RelayHubError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// No evaluator or executor is registered for a (service, kind) pair.
    #[error("unknown hook")]
    UnknownHook(#[from] UnknownHookError),

    /// A required config field is missing or has the wrong shape.
    /// The hook is aborted before any outbound call; no retry.
    #[error("configuration error")]
    Configuration(#[from] ConfigurationError),

    /// No usable credential for a (user, provider) pair. Permanent until
    /// the account is re-linked.
    #[error("credential error")]
    Credential(#[from] CredentialError),

    /// The provider rejected a token refresh.
    #[error("token refresh error")]
    Refresh(#[from] RefreshError),

    /// A provider API call failed (non-2xx, transport error, timeout, or
    /// a response missing expected data). The next cycle is the retry.
    #[error("provider error")]
    Provider(#[from] ProviderError),

    /// A storage adapter failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The automation name is empty.
    #[error("automation name must not be empty")]
    EmptyName,

    /// An action or reaction binding has an empty service or kind.
    #[error("{role} {field} must not be empty")]
    EmptyHookField {
        /// `"action"` or `"reaction"`.
        role: &'static str,
        /// `"service"` or `"kind"`.
        field: &'static str,
    },
}

/// A referenced record does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Entity kind, e.g. `"Automation"`.
    pub entity: &'static str,
    /// Identifier that failed to resolve.
    pub id: String,
}

/// The registry has no implementation for a (service, kind) pair.
#[derive(Debug, thiserror::Error)]
#[error("no {role} registered for {service}/{kind}")]
pub struct UnknownHookError {
    /// `"evaluator"` or `"executor"`.
    pub role: &'static str,
    pub service: String,
    pub kind: String,
}

/// Hook config is missing required data or fails to deserialize.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("missing config field `{0}`")]
    MissingField(&'static str),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// No usable credential for a (user, provider) pair.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("no linked {provider} account")]
    NotLinked { provider: String },

    #[error("{provider} credential has no refresh token")]
    NoRefreshToken { provider: String },
}

/// The provider's token endpoint rejected a refresh attempt.
#[derive(Debug, thiserror::Error)]
#[error("{provider} rejected token refresh ({status}): {body}")]
pub struct RefreshError {
    pub provider: String,
    pub status: u16,
    /// Provider error body, verbatim.
    pub body: String,
}

/// A call to a provider REST API failed.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Non-2xx response.
    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// Connection, DNS, or protocol failure before a response arrived.
    #[error("{provider} request failed: {detail}")]
    Transport { provider: String, detail: String },

    /// The call exceeded its deadline.
    #[error("{provider} call timed out")]
    Timeout { provider: String },

    /// A 2xx response did not contain the data the caller needed
    /// (e.g. "most recent issue" lookup returned nothing).
    #[error("{provider} response missing `{field}`")]
    MissingData {
        provider: String,
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_unknown_hook_with_pair() {
        let err = UnknownHookError {
            role: "evaluator",
            service: "timer".to_string(),
            kind: "time_reached".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no evaluator registered for timer/time_reached"
        );
    }

    #[test]
    fn should_convert_configuration_error_into_top_level() {
        let err: RelayHubError = ConfigurationError::MissingField("webhook_url").into();
        assert!(matches!(err, RelayHubError::Configuration(_)));
    }

    #[test]
    fn should_display_refresh_error_with_provider_body() {
        let err = RefreshError {
            provider: "spotify".to_string(),
            status: 400,
            body: "invalid_grant".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "spotify rejected token refresh (400): invalid_grant"
        );
    }

    #[test]
    fn should_keep_source_chain_for_storage_errors() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = RelayHubError::Storage(Box::new(inner));
        assert!(std::error::Error::source(&err).is_some());
    }
}
