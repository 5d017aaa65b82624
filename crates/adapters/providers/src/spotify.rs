//! Spotify hooks — saved-track evaluator and player executors.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use relayhub_app::ports::{AccessTokens, ConditionEvaluator, EffectExecutor};
use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::UserId;
use relayhub_domain::time::Timestamp;

const PROVIDER: &str = "spotify";
const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

#[derive(Debug, Deserialize)]
struct SavedTracks {
    #[serde(default)]
    items: Vec<SavedTrack>,
}

#[derive(Debug, Deserialize)]
struct SavedTrack {
    added_at: String,
}

/// Fires when a track was saved to the library after the watermark.
pub struct NewSavedTrackEvaluator {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl NewSavedTrackEvaluator {
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

    async fn newest_saved_at(&self, token: &str) -> Result<Option<Timestamp>, RelayHubError> {
        let response = self
            .client
            .get(format!("{}/me/tracks", self.api_base))
            .query(&[("limit", "1")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let response = crate::http::expect_success(PROVIDER, response).await?;
        let tracks: SavedTracks = response
            .json()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        let Some(newest) = tracks.items.first() else {
            return Ok(None);
        };
        let added_at = DateTime::parse_from_rfc3339(&newest.added_at)
            .map_err(|_| crate::http::missing_data(PROVIDER, "added_at"))?;
        Ok(Some(added_at.to_utc()))
    }
}

#[async_trait]
impl ConditionEvaluator for NewSavedTrackEvaluator {
    async fn evaluate(
        &self,
        owner: UserId,
        _config: &serde_json::Value,
        last_triggered: Option<Timestamp>,
    ) -> Result<bool, RelayHubError> {
        let Some(last) = last_triggered else {
            return Ok(false);
        };
        let token = self.tokens.access_token(owner, PROVIDER).await?;
        match self.newest_saved_at(&token).await? {
            Some(added_at) => Ok(added_at > last),
            None => Ok(false),
        }
    }

    fn seeds_watermark(&self) -> bool {
        true
    }
}

/// Skips to the next track on the user's active device.
pub struct SkipTrackExecutor {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl SkipTrackExecutor {
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
impl EffectExecutor for SkipTrackExecutor {
    async fn execute(
        &self,
        owner: UserId,
        _config: &serde_json::Value,
    ) -> Result<(), RelayHubError> {
        let token = self.tokens.access_token(owner, PROVIDER).await?;
        let response = self
            .client
            .post(format!("{}/me/player/next", self.api_base))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        crate::http::expect_success(PROVIDER, response).await?;
        Ok(())
    }
}

/// Starts playback of a playlist on the user's active device.
pub struct PlayPlaylistExecutor {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    api_base: String,
}

impl PlayPlaylistExecutor {
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
impl EffectExecutor for PlayPlaylistExecutor {
    async fn execute(
        &self,
        owner: UserId,
        config: &serde_json::Value,
    ) -> Result<(), RelayHubError> {
        let playlist_uri = crate::http::require_str(config, "playlist_uri")?;
        let token = self.tokens.access_token(owner, PROVIDER).await?;
        let response = self
            .client
            .put(format!("{}/me/player/play", self.api_base))
            .bearer_auth(token)
            .json(&serde_json::json!({ "context_uri": playlist_uri }))
            .send()
            .await
            .map_err(|err| crate::http::transport(PROVIDER, err))?;
        crate::http::expect_success(PROVIDER, response).await?;
        Ok(())
    }
}
