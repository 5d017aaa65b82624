//! Hook ports — the per-(service, kind) condition and effect contracts.

use async_trait::async_trait;

use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::UserId;
use relayhub_domain::time::Timestamp;

/// Decides whether an automation's action condition fires right now.
///
/// Evaluators are pure with respect to engine state: the durable
/// `last_triggered` watermark is the only trigger history they may consult.
#[async_trait]
pub trait ConditionEvaluator: Send + Sync {
    /// Return `true` when the condition fires.
    ///
    /// # Errors
    ///
    /// Credential, refresh, and provider errors bubble up; the scheduler
    /// contains them per automation and treats them as "no trigger".
    async fn evaluate(
        &self,
        owner: UserId,
        config: &serde_json::Value,
        last_triggered: Option<Timestamp>,
    ) -> Result<bool, RelayHubError>;

    /// Whether a non-firing first evaluation (`last_triggered == None`)
    /// should make the scheduler persist an initial watermark. Event-based
    /// evaluators return `true`; without the seed their watermark would
    /// never advance and they would never fire.
    fn seeds_watermark(&self) -> bool {
        false
    }
}

/// Performs an automation's reaction against the target provider.
#[async_trait]
pub trait EffectExecutor: Send + Sync {
    /// Execute the reaction. `Err` is a failed execution; side effects are
    /// limited to outbound provider calls.
    async fn execute(&self, owner: UserId, config: &serde_json::Value)
        -> Result<(), RelayHubError>;
}
