//! Time sources for the time-based evaluators.
//!
//! [`WorldTimeSource`] asks an external time service for the current
//! wall-clock time; any failure falls back to local system UTC converted
//! to the configured reference offset. [`SystemTimeSource`] skips the
//! network entirely.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use tracing::debug;

use relayhub_app::ports::TimeSource;

/// Local system clock in a fixed reference offset.
pub struct SystemTimeSource {
    offset: FixedOffset,
}

impl SystemTimeSource {
    /// Create a source reporting time at the given reference offset.
    #[must_use]
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

#[async_trait]
impl TimeSource for SystemTimeSource {
    async fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

#[derive(Debug, Deserialize)]
struct WorldTimeResponse {
    datetime: String,
}

/// Best-effort external time service with local fallback.
pub struct WorldTimeSource {
    client: reqwest::Client,
    url: String,
    offset: FixedOffset,
}

impl WorldTimeSource {
    /// Create a source querying `url` (a worldtimeapi-compatible endpoint
    /// returning `{"datetime": <rfc3339>}`), falling back to the system
    /// clock at `offset`.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            client,
            url: url.into(),
            offset,
        }
    }

    async fn fetch(&self) -> Option<DateTime<FixedOffset>> {
        let response = self.client.get(&self.url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let parsed: WorldTimeResponse = response.json().await.ok()?;
        DateTime::parse_from_rfc3339(&parsed.datetime)
            .ok()
            .map(|dt| dt.with_timezone(&self.offset))
    }
}

#[async_trait]
impl TimeSource for WorldTimeSource {
    async fn now(&self) -> DateTime<FixedOffset> {
        match self.fetch().await {
            Some(now) => now,
            None => {
                debug!("external time service unavailable, using system clock");
                Utc::now().with_timezone(&self.offset)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_report_system_time_at_reference_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let source = SystemTimeSource::new(offset);
        let now = source.now().await;
        assert_eq!(now.offset(), &offset);
    }

    #[tokio::test]
    async fn should_fall_back_to_system_clock_when_service_unreachable() {
        let offset = FixedOffset::east_opt(0).unwrap();
        // Reserved TEST-NET-1 address: the request fails fast.
        let source = WorldTimeSource::new(
            reqwest::Client::builder()
                .timeout(std::time::Duration::from_millis(200))
                .build()
                .unwrap(),
            "http://192.0.2.1/api/timezone/Etc/UTC",
            offset,
        );
        let before = Utc::now();
        let now = source.now().await.with_timezone(&Utc);
        let after = Utc::now();
        assert!(now >= before - chrono::Duration::seconds(1));
        assert!(now <= after + chrono::Duration::seconds(1));
    }

    #[test]
    fn should_parse_world_time_payload() {
        let parsed: WorldTimeResponse =
            serde_json::from_str(r#"{"datetime": "2024-06-01T14:30:00+02:00"}"#).unwrap();
        let dt = DateTime::parse_from_rfc3339(&parsed.datetime).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
    }
}
