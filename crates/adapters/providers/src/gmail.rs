//! Gmail hooks — the `new_email` evaluator and the `send_email` executor.
//!
//! Both authenticate with the shared `google` credential, so linking a
//! Google account once covers Gmail and YouTube alike.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use chrono::TimeZone;
use serde::Deserialize;

use relayhub_app::ports::{AccessTokens, ConditionEvaluator, EffectExecutor};
use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::UserId;
use relayhub_domain::time::Timestamp;

const PROVIDER: &str = "google";
const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageDetail {
    /// Epoch milliseconds, serialized as a string by the Gmail API.
    #[serde(rename = "internalDate")]
    internal_date: String,
}

/// Fires when the newest message in the inbox arrived after the
/// automation's watermark.
pub struct NewEmailEvaluator {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl NewEmailEvaluator {
    #[must_use]
    pub fn new(client: reqwest::Client, tokens: Arc<dyn AccessTokens>) -> Self {
        Self {
            client,
            tokens,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn newest_message_date(&self, token: &str) -> Result<Option<Timestamp>, RelayHubError> {
        let response = self
            .client
            .get(format!("{}/users/me/messages", self.api_base))
            .query(&[("maxResults", "1")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let response = crate::http::expect_success(PROVIDER, response).await?;
        let list: MessageList = response
            .json()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let Some(newest) = list.messages.first() else {
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/users/me/messages/{}", self.api_base, newest.id))
            .query(&[("format", "minimal")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let response = crate::http::expect_success(PROVIDER, response).await?;
        let detail: MessageDetail = response
            .json()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let millis: i64 = detail
            .internal_date
            .parse()
            .map_err(|_| crate::http::missing_data(PROVIDER, "internalDate"))?;
        let received = chrono::Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| crate::http::missing_data(PROVIDER, "internalDate"))?;
        Ok(Some(received))
    }
}

#[async_trait]
impl ConditionEvaluator for NewEmailEvaluator {
    async fn evaluate(
        &self,
        owner: UserId,
        _config: &serde_json::Value,
        last_triggered: Option<Timestamp>,
    ) -> Result<bool, RelayHubError> {
        // First evaluation only seeds the watermark; skip the API calls.
        let Some(last) = last_triggered else {
            return Ok(false);
        };
        let token = self.tokens.access_token(owner, PROVIDER).await?;
        match self.newest_message_date(&token).await? {
            Some(received) => Ok(received > last),
            None => Ok(false),
        }
    }

    fn seeds_watermark(&self) -> bool {
        true
    }
}

/// Sends a plain-text email from the linked account.
pub struct SendEmailExecutor {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl SendEmailExecutor {
    #[must_use]
    pub fn new(client: reqwest::Client, tokens: Arc<dyn AccessTokens>) -> Self {
        Self {
            client,
            tokens,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl EffectExecutor for SendEmailExecutor {
    async fn execute(
        &self,
        owner: UserId,
        config: &serde_json::Value,
    ) -> Result<(), RelayHubError> {
        let to = crate::http::require_str(config, "to")?;
        let subject = crate::http::require_str(config, "subject")?;
        let body = crate::http::require_str(config, "body")?;

        let token = self.tokens.access_token(owner, PROVIDER).await?;
        let raw = URL_SAFE.encode(build_mime(&to, &subject, &body));
        let response = self
            .client
            .post(format!("{}/users/me/messages/send", self.api_base))
            .bearer_auth(token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        crate::http::expect_success(PROVIDER, response).await?;
        Ok(())
    }
}

/// RFC 2822 message with a plain-text body, ready for base64url framing.
fn build_mime(to: &str, subject: &str, body: &str) -> String {
    format!(
        "To: {to}\r\nSubject: {subject}\r\nContent-Type: text/plain; charset=\"UTF-8\"\r\n\r\n{body}"
    )
}
