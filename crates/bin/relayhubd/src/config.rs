//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `relayhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional (though without OAuth client
//! credentials only the timer and discord services are usable).
//! Environment variables take precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Scheduler tuning.
    pub scheduler: SchedulerConfig,
    /// Reference clock settings.
    pub time: TimeConfig,
    /// Per-provider OAuth client credentials.
    pub oauth: OAuthConfig,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Scheduler tuning knobs.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between cycle starts.
    pub interval_secs: u64,
    /// In-memory cooldown latch window, in seconds.
    pub cooldown_secs: i64,
    /// Maximum automations processed concurrently within a cycle.
    pub concurrency: usize,
    /// Deadline for a single evaluator or executor call, in seconds.
    pub item_timeout_secs: u64,
}

/// Reference clock configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Fixed UTC offset (whole hours) for timer conditions.
    pub utc_offset_hours: i32,
    /// Optional external time service URL; falls back to the system
    /// clock when unset or unreachable.
    pub worldtime_url: Option<String>,
}

/// OAuth client credentials for one provider.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
}

impl OAuthClientConfig {
    /// Whether both client credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Per-provider OAuth sections.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    pub google: OAuthClientConfig,
    pub spotify: OAuthClientConfig,
    pub github: OAuthClientConfig,
}

impl Config {
    /// Load configuration from `relayhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("relayhub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("RELAYHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("RELAYHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RELAYHUB_INTERVAL_SECS") {
            if let Ok(secs) = val.parse() {
                self.scheduler.interval_secs = secs;
            }
        }
        for (provider, env_prefix) in [
            (&mut self.oauth.google, "RELAYHUB_GOOGLE"),
            (&mut self.oauth.spotify, "RELAYHUB_SPOTIFY"),
            (&mut self.oauth.github, "RELAYHUB_GITHUB"),
        ] {
            if let Ok(val) = std::env::var(format!("{env_prefix}_CLIENT_ID")) {
                provider.client_id = val;
            }
            if let Ok(val) = std::env::var(format!("{env_prefix}_CLIENT_SECRET")) {
                provider.client_secret = val;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "scheduler interval must be non-zero".to_string(),
            ));
        }
        if self.scheduler.concurrency == 0 {
            return Err(ConfigError::Validation(
                "scheduler concurrency must be non-zero".to_string(),
            ));
        }
        if !(-14..=14).contains(&self.time.utc_offset_hours) {
            return Err(ConfigError::Validation(format!(
                "utc_offset_hours {} out of range -14..=14",
                self.time.utc_offset_hours
            )));
        }
        Ok(())
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:relayhub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "relayhubd=info,relayhub=info".to_string(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 120,
            cooldown_secs: 120,
            concurrency: 4,
            item_timeout_secs: 30,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 0,
            worldtime_url: None,
        }
    }
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            google: OAuthClientConfig {
                token_url: "https://oauth2.googleapis.com/token".to_string(),
                ..OAuthClientConfig::default()
            },
            spotify: OAuthClientConfig {
                token_url: "https://accounts.spotify.com/api/token".to_string(),
                ..OAuthClientConfig::default()
            },
            github: OAuthClientConfig {
                token_url: "https://github.com/login/oauth/access_token".to_string(),
                ..OAuthClientConfig::default()
            },
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
