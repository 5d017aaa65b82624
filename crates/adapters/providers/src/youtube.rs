//! YouTube hooks — channel upload evaluator and video executors.
//!
//! Channel configs accept a raw channel id, a handle, or a free-text
//! channel name; everything that is not already an id is resolved
//! through the Data API before the upload query.

use std::sync::Arc;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::DateTime;
use regex::Regex;
use serde::Deserialize;

use relayhub_app::ports::{AccessTokens, ConditionEvaluator, EffectExecutor};
use relayhub_domain::error::{ConfigurationError, RelayHubError};
use relayhub_domain::id::UserId;
use relayhub_domain::time::Timestamp;

const PROVIDER: &str = "google";
const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

static CHANNEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UC[0-9A-Za-z_-]{22}$").unwrap());

static VIDEO_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|youtu\.be/|shorts/)([A-Za-z0-9_-]{11})").unwrap());

/// Pull the 11-character video id out of a config that carries either a
/// `video_id` field or a video URL in any of the common shapes.
fn extract_video_id(config: &serde_json::Value) -> Result<String, RelayHubError> {
    if let Some(id) = crate::http::optional_str(config, "video_id") {
        return Ok(id);
    }
    let url = crate::http::optional_str(config, "url")
        .or_else(|| crate::http::optional_str(config, "video_url"))
        .ok_or(ConfigurationError::MissingField("url"))?;
    VIDEO_URL
        .captures(&url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| crate::http::missing_data(PROVIDER, "video_url"))
}

#[derive(Debug, Deserialize)]
struct ChannelList {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SearchList {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchId,
    #[serde(default)]
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchId {
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchSnippet {
    #[serde(rename = "publishedAt")]
    published_at: String,
}

/// Fires when the channel published a video after the watermark.
pub struct NewVideoEvaluator {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl NewVideoEvaluator {
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

    async fn channel_by_handle(
        &self,
        token: &str,
        handle: &str,
    ) -> Result<Option<String>, RelayHubError> {
        let response = self
            .client
            .get(format!("{}/channels", self.api_base))
            .query(&[("part", "id"), ("forHandle", handle)])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let response = crate::http::expect_success(PROVIDER, response).await?;
        let list: ChannelList = response
            .json()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        Ok(list.items.into_iter().next().map(|item| item.id))
    }

    async fn resolve_channel_id(
        &self,
        token: &str,
        channel: &str,
    ) -> Result<String, RelayHubError> {
        if CHANNEL_ID.is_match(channel) {
            return Ok(channel.to_string());
        }
        // Handle lookup tolerates both "@name" and bare "name".
        let handle = channel.strip_prefix('@').unwrap_or(channel);
        if let Some(id) = self.channel_by_handle(token, &format!("@{handle}")).await? {
            return Ok(id);
        }
        if let Some(id) = self.channel_by_handle(token, handle).await? {
            return Ok(id);
        }
        // Last resort: a channel search by name.
        let response = self
            .client
            .get(format!("{}/search", self.api_base))
            .query(&[
                ("part", "snippet"),
                ("type", "channel"),
                ("maxResults", "1"),
                ("q", channel),
            ])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let response = crate::http::expect_success(PROVIDER, response).await?;
        let list: SearchList = response
            .json()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        list.items
            .into_iter()
            .next()
            .and_then(|item| item.id.channel_id)
            .ok_or_else(|| crate::http::missing_data(PROVIDER, "channelId"))
    }

    async fn newest_upload_at(
        &self,
        token: &str,
        channel_id: &str,
    ) -> Result<Option<Timestamp>, RelayHubError> {
        let response = self
            .client
            .get(format!("{}/search", self.api_base))
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("order", "date"),
                ("maxResults", "1"),
                ("channelId", channel_id),
            ])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let response = crate::http::expect_success(PROVIDER, response).await?;
        let list: SearchList = response
            .json()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let Some(snippet) = list.items.into_iter().next().and_then(|item| item.snippet) else {
            return Ok(None);
        };
        let published_at = DateTime::parse_from_rfc3339(&snippet.published_at)
            .map_err(|_| crate::http::missing_data(PROVIDER, "publishedAt"))?;
        Ok(Some(published_at.to_utc()))
    }
}

#[async_trait]
impl ConditionEvaluator for NewVideoEvaluator {
    async fn evaluate(
        &self,
        owner: UserId,
        config: &serde_json::Value,
        last_triggered: Option<Timestamp>,
    ) -> Result<bool, RelayHubError> {
        let channel = crate::http::require_str(config, "channel")?;
        let Some(last) = last_triggered else {
            return Ok(false);
        };
        let token = self.tokens.access_token(owner, PROVIDER).await?;
        let channel_id = self.resolve_channel_id(&token, &channel).await?;
        match self.newest_upload_at(&token, &channel_id).await? {
            Some(published_at) => Ok(published_at > last),
            None => Ok(false),
        }
    }

    fn seeds_watermark(&self) -> bool {
        true
    }
}

/// Rates a video "like" on behalf of the linked account.
pub struct LikeVideoExecutor {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl LikeVideoExecutor {
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
impl EffectExecutor for LikeVideoExecutor {
    async fn execute(
        &self,
        owner: UserId,
        config: &serde_json::Value,
    ) -> Result<(), RelayHubError> {
        let video_id = extract_video_id(config)?;
        let token = self.tokens.access_token(owner, PROVIDER).await?;
        let response = self
            .client
            .post(format!("{}/videos/rate", self.api_base))
            .query(&[("id", video_id.as_str()), ("rating", "like")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        crate::http::expect_success(PROVIDER, response).await?;
        Ok(())
    }
}

/// Appends a video to one of the user's playlists.
pub struct AddToPlaylistExecutor {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl AddToPlaylistExecutor {
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
impl EffectExecutor for AddToPlaylistExecutor {
    async fn execute(
        &self,
        owner: UserId,
        config: &serde_json::Value,
    ) -> Result<(), RelayHubError> {
        let playlist_id = crate::http::require_str(config, "playlist_id")?;
        let video_id = extract_video_id(config)?;
        let token = self.tokens.access_token(owner, PROVIDER).await?;
        let response = self
            .client
            .post(format!("{}/playlistItems", self.api_base))
            .query(&[("part", "snippet")])
            .bearer_auth(token)
            .json(&serde_json::json!({
                "snippet": {
                    "playlistId": playlist_id,
                    "resourceId": {
                        "kind": "youtube#video",
                        "videoId": video_id,
                    },
                },
            }))
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        crate::http::expect_success(PROVIDER, response).await?;
        Ok(())
    }
}

/// Posts a top-level comment on a video.
pub struct PostCommentExecutor {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl PostCommentExecutor {
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
impl EffectExecutor for PostCommentExecutor {
    async fn execute(
        &self,
        owner: UserId,
        config: &serde_json::Value,
    ) -> Result<(), RelayHubError> {
        let comment = crate::http::require_str(config, "comment")?;
        let video_id = extract_video_id(config)?;
        let token = self.tokens.access_token(owner, PROVIDER).await?;
        let response = self
            .client
            .post(format!("{}/commentThreads", self.api_base))
            .query(&[("part", "snippet")])
            .bearer_auth(token)
            .json(&serde_json::json!({
                "snippet": {
                    "videoId": video_id,
                    "topLevelComment": {
                        "snippet": { "textOriginal": comment },
                    },
                },
            }))
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        crate::http::expect_success(PROVIDER, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoTokens;

    #[async_trait]
    impl AccessTokens for NoTokens {
        async fn access_token(
            &self,
            _owner: UserId,
            _provider: &str,
        ) -> Result<String, RelayHubError> {
            panic!("should not be called")
        }
    }

    #[test]
    fn should_recognize_canonical_channel_ids() {
        assert!(CHANNEL_ID.is_match("UCdQw4w9WgXcQdQw4w9WgXcQ"));
        assert!(!CHANNEL_ID.is_match("@somehandle"));
        assert!(!CHANNEL_ID.is_match("UCshort"));
    }

    #[test]
    fn should_extract_video_id_from_common_url_shapes() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        ] {
            let config = serde_json::json!({"url": url});
            assert_eq!(extract_video_id(&config).unwrap(), "dQw4w9WgXcQ");
        }
    }

    #[test]
    fn should_accept_video_url_as_alternate_key() {
        let config = serde_json::json!({"video_url": "https://youtu.be/dQw4w9WgXcQ"});
        assert_eq!(extract_video_id(&config).unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn should_prefer_explicit_video_id_over_url() {
        let config = serde_json::json!({
            "video_id": "AAAAAAAAAAA",
            "video_url": "https://youtu.be/dQw4w9WgXcQ",
        });
        assert_eq!(extract_video_id(&config).unwrap(), "AAAAAAAAAAA");
    }

    #[test]
    fn should_reject_config_without_video_reference() {
        let config = serde_json::json!({});
        assert!(matches!(
            extract_video_id(&config),
            Err(RelayHubError::Configuration(_))
        ));
    }

    #[test]
    fn should_reject_unparseable_video_url() {
        let config = serde_json::json!({"url": "https://example.test/not-a-video"});
        assert!(matches!(
            extract_video_id(&config),
            Err(RelayHubError::Provider(_))
        ));
    }

    #[tokio::test]
    async fn should_require_channel_before_anything_else() {
        let evaluator = NewVideoEvaluator::new(reqwest::Client::new(), Arc::new(NoTokens));
        let result = evaluator
            .evaluate(UserId::new(), &serde_json::json!({}), None)
            .await;
        assert!(matches!(result, Err(RelayHubError::Configuration(_))));
    }

    #[tokio::test]
    async fn should_not_call_provider_before_watermark_is_seeded() {
        let evaluator = NewVideoEvaluator::new(reqwest::Client::new(), Arc::new(NoTokens));
        let triggered = evaluator
            .evaluate(
                UserId::new(),
                &serde_json::json!({"channel": "@somecreator"}),
                None,
            )
            .await
            .unwrap();
        assert!(!triggered);
        assert!(evaluator.seeds_watermark());
    }

    #[test]
    fn should_parse_search_payload_variants() {
        let list: SearchList = serde_json::from_str(
            r#"{"items": [{"id": {"kind": "youtube#channel", "channelId": "UCx"}}]}"#,
        )
        .unwrap();
        assert_eq!(list.items[0].id.channel_id.as_deref(), Some("UCx"));

        let list: SearchList = serde_json::from_str(
            r#"{"items": [{"id": {"videoId": "v1"}, "snippet": {"publishedAt": "2024-06-01T12:00:00Z", "title": "t"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            list.items[0].snippet.as_ref().unwrap().published_at,
            "2024-06-01T12:00:00Z"
        );
    }
}
