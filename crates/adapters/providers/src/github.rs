//! GitHub executors — issue creation and issue comments.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use relayhub_app::ports::{AccessTokens, EffectExecutor};
use relayhub_domain::error::{ConfigurationError, RelayHubError};
use relayhub_domain::id::UserId;

const PROVIDER: &str = "github";
const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "relayhub";

fn request(builder: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
    builder
        .header("User-Agent", USER_AGENT)
        .header("Accept", "application/vnd.github+json")
        .bearer_auth(token)
}

/// Opens an issue on a repository.
pub struct CreateIssueExecutor {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl CreateIssueExecutor {
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
impl EffectExecutor for CreateIssueExecutor {
    async fn execute(
        &self,
        owner: UserId,
        config: &serde_json::Value,
    ) -> Result<(), RelayHubError> {
        let repo_owner = crate::http::require_str(config, "repo_owner")?;
        let repo_name = crate::http::require_str(config, "repo_name")?;
        let title = crate::http::require_str(config, "title")?;
        let body = crate::http::optional_str(config, "body");

        let token = self.tokens.access_token(owner, PROVIDER).await?;
        let mut payload = serde_json::json!({ "title": title });
        if let Some(body) = body {
            payload["body"] = serde_json::Value::String(body);
        }
        let response = request(
            self.client
                .post(format!("{}/repos/{repo_owner}/{repo_name}/issues", self.api_base)),
            &token,
        )
        .json(&payload)
        .send()
        .await
        .map_err(|err| crate::http::transport(PROVIDER, err))?;
        crate::http::expect_success(PROVIDER, response).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct IssueRef {
    number: u64,
}

/// Comments on an issue, either a specific number or the most recently
/// opened one.
pub struct AddCommentExecutor {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl AddCommentExecutor {
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

    async fn latest_issue_number(
        &self,
        token: &str,
        repo_owner: &str,
        repo_name: &str,
    ) -> Result<u64, RelayHubError> {
        let response = request(
            self.client
                .get(format!("{}/repos/{repo_owner}/{repo_name}/issues", self.api_base))
                .query(&[
                    ("sort", "created"),
                    ("direction", "desc"),
                    ("per_page", "1"),
                ]),
            token,
        )
        .send()
        .await
        .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let response = crate::http::expect_success(PROVIDER, response).await?;
        let issues: Vec<IssueRef> = response
            .json()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        issues
            .first()
            .map(|issue| issue.number)
            .ok_or_else(|| crate::http::missing_data(PROVIDER, "issue"))
    }
}

#[async_trait]
impl EffectExecutor for AddCommentExecutor {
    async fn execute(
        &self,
        owner: UserId,
        config: &serde_json::Value,
    ) -> Result<(), RelayHubError> {
        let repo_owner = crate::http::require_str(config, "repo_owner")?;
        let repo_name = crate::http::require_str(config, "repo_name")?;
        let comment = crate::http::require_str(config, "comment")?;
        let issue_option = crate::http::require_str(config, "issue_option")?;

        let token = self.tokens.access_token(owner, PROVIDER).await?;
        let issue_number = match issue_option.as_str() {
            "specific" => config
                .get("issue_number")
                .and_then(serde_json::Value::as_u64)
                .ok_or(ConfigurationError::MissingField("issue_number"))?,
            "last" => {
                self.latest_issue_number(&token, &repo_owner, &repo_name)
                    .await?
            }
            other => {
                return Err(ConfigurationError::Invalid(format!(
                    "issue_option must be \"specific\" or \"last\", got {other:?}"
                ))
                .into());
            }
        };
        let response = request(
            self.client.post(format!(
                "{}/repos/{repo_owner}/{repo_name}/issues/{issue_number}/comments",
                self.api_base
            )),
            &token,
        )
        .json(&serde_json::json!({ "body": comment }))
        .send()
        .await
        .map_err(|err| crate::http::transport(PROVIDER, err))?;
        crate::http::expect_success(PROVIDER, response).await?;
        Ok(())
    }
}
