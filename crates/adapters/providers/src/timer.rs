//! Timer evaluators — time-of-day, calendar-date, and weekday conditions.
//!
//! All three are pure predicates over the clock supplied by a
//! [`TimeSource`]; no token or provider API is involved.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime};
use serde::Deserialize;

use relayhub_app::ports::{ConditionEvaluator, TimeSource};
use relayhub_domain::error::{ConfigurationError, RelayHubError};
use relayhub_domain::id::UserId;
use relayhub_domain::time::Timestamp;

#[derive(Debug, Deserialize)]
struct TimeReachedConfig {
    hour: u32,
    minute: u32,
}

/// Fires once per calendar day when the time of day passes the target.
pub struct TimeReachedEvaluator {
    clock: Arc<dyn TimeSource>,
}

impl TimeReachedEvaluator {
    #[must_use]
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl ConditionEvaluator for TimeReachedEvaluator {
    async fn evaluate(
        &self,
        _owner: UserId,
        config: &serde_json::Value,
        last_triggered: Option<Timestamp>,
    ) -> Result<bool, RelayHubError> {
        let config: TimeReachedConfig = crate::http::parse_config(config)?;
        let target = NaiveTime::from_hms_opt(config.hour, config.minute, 0).ok_or_else(|| {
            ConfigurationError::Invalid(format!(
                "{}:{:02} is not a valid time of day",
                config.hour, config.minute
            ))
        })?;
        let now = self.clock.now().await;
        Ok(time_reached(now, target, last_triggered))
    }
}

/// `true` when `now` is at or past `target` and the condition has not
/// already fired today at or after the target time.
fn time_reached(now: DateTime<FixedOffset>, target: NaiveTime, last: Option<Timestamp>) -> bool {
    if now.time() < target {
        return false;
    }
    match last {
        None => true,
        Some(last) => {
            let last_local = last.with_timezone(&now.timezone());
            last_local.date_naive() != now.date_naive() || last_local.time() < target
        }
    }
}

#[derive(Debug, Deserialize)]
struct DateReachedConfig {
    date: NaiveDate,
}

/// Fires when today's date (in the reference timezone) equals the target.
pub struct DateReachedEvaluator {
    clock: Arc<dyn TimeSource>,
}

impl DateReachedEvaluator {
    #[must_use]
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl ConditionEvaluator for DateReachedEvaluator {
    async fn evaluate(
        &self,
        _owner: UserId,
        config: &serde_json::Value,
        _last_triggered: Option<Timestamp>,
    ) -> Result<bool, RelayHubError> {
        let config: DateReachedConfig = crate::http::parse_config(config)?;
        let now = self.clock.now().await;
        Ok(now.date_naive() == config.date)
    }
}

#[derive(Debug, Deserialize)]
struct DayOfWeekConfig {
    day_of_week: u32,
}

/// Fires when today's weekday matches (0 = Sunday .. 6 = Saturday).
pub struct DayOfWeekEvaluator {
    clock: Arc<dyn TimeSource>,
}

impl DayOfWeekEvaluator {
    #[must_use]
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl ConditionEvaluator for DayOfWeekEvaluator {
    async fn evaluate(
        &self,
        _owner: UserId,
        config: &serde_json::Value,
        _last_triggered: Option<Timestamp>,
    ) -> Result<bool, RelayHubError> {
        let config: DayOfWeekConfig = crate::http::parse_config(config)?;
        if config.day_of_week > 6 {
            return Err(ConfigurationError::Invalid(format!(
                "day_of_week {} out of range 0..=6",
                config.day_of_week
            ))
            .into());
        }
        let now = self.clock.now().await;
        Ok(now.weekday().num_days_from_sunday() == config.day_of_week)
    }
}
