//! Time source port — wall-clock for the time-based evaluators.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Supplies the current wall-clock time in the engine's fixed reference
/// timezone. Implementations may consult an external time service; they
/// must fall back to local system UTC (converted to the reference offset)
/// rather than fail.
#[async_trait]
pub trait TimeSource: Send + Sync {
    /// Current time in the reference timezone.
    async fn now(&self) -> DateTime<FixedOffset>;
}
