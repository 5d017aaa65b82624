//! Hook registry — (service, kind) → evaluator/executor resolution.
//!
//! Built once at startup by the composition root; the scheduler only does
//! map lookups, never runtime type-string branching.

use std::collections::HashMap;
use std::sync::Arc;

use relayhub_domain::automation::HookBinding;
use relayhub_domain::error::{RelayHubError, UnknownHookError};

use crate::ports::{ConditionEvaluator, EffectExecutor};

type Pair = (String, String);

/// Immutable-after-startup map from (service, kind) pairs to hook
/// implementations.
#[derive(Default)]
pub struct HookRegistry {
    evaluators: HashMap<Pair, Arc<dyn ConditionEvaluator>>,
    executors: HashMap<Pair, Arc<dyn EffectExecutor>>,
}

impl HookRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a condition evaluator for an action pair.
    pub fn register_evaluator(
        &mut self,
        service: impl Into<String>,
        kind: impl Into<String>,
        evaluator: Arc<dyn ConditionEvaluator>,
    ) {
        self.evaluators
            .insert((service.into(), kind.into()), evaluator);
    }

    /// Register an effect executor for a reaction pair.
    pub fn register_executor(
        &mut self,
        service: impl Into<String>,
        kind: impl Into<String>,
        executor: Arc<dyn EffectExecutor>,
    ) {
        self.executors
            .insert((service.into(), kind.into()), executor);
    }

    /// Resolve the evaluator for an action binding.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::UnknownHook`] when no evaluator is
    /// registered for the pair.
    pub fn evaluator(
        &self,
        binding: &HookBinding,
    ) -> Result<Arc<dyn ConditionEvaluator>, RelayHubError> {
        self.evaluators
            .get(&(binding.service.clone(), binding.kind.clone()))
            .cloned()
            .ok_or_else(|| {
                UnknownHookError {
                    role: "evaluator",
                    service: binding.service.clone(),
                    kind: binding.kind.clone(),
                }
                .into()
            })
    }

    /// Resolve the executor for a reaction binding.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::UnknownHook`] when no executor is
    /// registered for the pair.
    pub fn executor(&self, binding: &HookBinding) -> Result<Arc<dyn EffectExecutor>, RelayHubError> {
        self.executors
            .get(&(binding.service.clone(), binding.kind.clone()))
            .cloned()
            .ok_or_else(|| {
                UnknownHookError {
                    role: "executor",
                    service: binding.service.clone(),
                    kind: binding.kind.clone(),
                }
                .into()
            })
    }

    /// Registered action pairs, for catalog conformance checks.
    pub fn evaluator_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.evaluators
            .keys()
            .map(|(s, k)| (s.as_str(), k.as_str()))
    }

    /// Registered reaction pairs, for catalog conformance checks.
    pub fn executor_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.executors.keys().map(|(s, k)| (s.as_str(), k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relayhub_domain::id::UserId;
    use relayhub_domain::time::Timestamp;

    struct NeverFires;

    #[async_trait]
    impl ConditionEvaluator for NeverFires {
        async fn evaluate(
            &self,
            _owner: UserId,
            _config: &serde_json::Value,
            _last_triggered: Option<Timestamp>,
        ) -> Result<bool, RelayHubError> {
            Ok(false)
        }
    }

    struct NoopExecutor;

    #[async_trait]
    impl EffectExecutor for NoopExecutor {
        async fn execute(
            &self,
            _owner: UserId,
            _config: &serde_json::Value,
        ) -> Result<(), RelayHubError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_resolve_registered_evaluator() {
        let mut registry = HookRegistry::new();
        registry.register_evaluator("timer", "time_reached", Arc::new(NeverFires));

        let binding = HookBinding::new("timer", "time_reached", serde_json::json!({}));
        let evaluator = registry.evaluator(&binding).unwrap();
        let fired = evaluator
            .evaluate(UserId::new(), &binding.config, None)
            .await
            .unwrap();
        assert!(!fired);
    }

    #[test]
    fn should_return_unknown_hook_for_unregistered_evaluator() {
        let registry = HookRegistry::new();
        let binding = HookBinding::new("timer", "time_reached", serde_json::json!({}));
        let result = registry.evaluator(&binding);
        assert!(matches!(result, Err(RelayHubError::UnknownHook(_))));
    }

    #[test]
    fn should_return_unknown_hook_for_unregistered_executor() {
        let mut registry = HookRegistry::new();
        registry.register_executor("discord", "send_webhook_message", Arc::new(NoopExecutor));

        let binding = HookBinding::new("discord", "other_kind", serde_json::json!({}));
        let result = registry.executor(&binding);
        assert!(matches!(result, Err(RelayHubError::UnknownHook(_))));
    }

    #[test]
    fn should_list_registered_pairs() {
        let mut registry = HookRegistry::new();
        registry.register_evaluator("timer", "time_reached", Arc::new(NeverFires));
        registry.register_executor("discord", "send_webhook_message", Arc::new(NoopExecutor));

        let actions: Vec<_> = registry.evaluator_pairs().collect();
        let reactions: Vec<_> = registry.executor_pairs().collect();
        assert_eq!(actions, vec![("timer", "time_reached")]);
        assert_eq!(reactions, vec![("discord", "send_webhook_message")]);
    }
}
