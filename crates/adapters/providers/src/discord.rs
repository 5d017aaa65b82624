//! Discord webhook executor. No OAuth involved; the webhook URL itself
//! is the credential.

use async_trait::async_trait;

use relayhub_app::ports::EffectExecutor;
use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::UserId;

const PROVIDER: &str = "discord";

/// Posts a message to a Discord webhook.
pub struct WebhookExecutor {
    client: reqwest::Client,
}

impl WebhookExecutor {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EffectExecutor for WebhookExecutor {
    async fn execute(
        &self,
        _owner: UserId,
        config: &serde_json::Value,
    ) -> Result<(), RelayHubError> {
        // Validate everything before touching the network.
        let webhook_url = crate::http::require_str(config, "webhook_url")?;
        let message = crate::http::require_str(config, "message")?;
        let username = crate::http::optional_str(config, "username");

        let mut payload = serde_json::json!({ "content": message });
        if let Some(username) = username {
            payload["username"] = serde_json::Value::String(username);
        }
        let response = self
            .client
            .post(&webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        crate::http::expect_success(PROVIDER, response).await?;
        Ok(())
    }
}
