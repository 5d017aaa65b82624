//! Scheduler (hook executor) — drives recurring evaluation cycles.
//!
//! A single timer ticks at a fixed interval. Each tick runs one cycle:
//! load the active automations, fan them out on a bounded worker pool,
//! evaluate each automation's condition, and on trigger run its reaction
//! and persist the new `last_triggered` watermark. A tick that lands while
//! a cycle is still running is skipped outright — no queuing, no backlog.
//!
//! Every error is contained at the per-automation boundary: an evaluator
//! or executor failing (or timing out) is logged and never stops the rest
//! of the cycle. The next cycle is the only retry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use relayhub_domain::automation::Automation;
use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::AutomationId;
use relayhub_domain::time::{self, Timestamp};

use crate::ports::AutomationRepository;
use crate::registry::HookRegistry;

/// Tuning knobs for the scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Cadence between cycle starts.
    pub interval: std::time::Duration,
    /// In-memory latch window: an automation that fired more recently than
    /// this is skipped without evaluation, absorbing sub-interval re-ticks
    /// and clock skew.
    pub cooldown: chrono::Duration,
    /// Maximum automations processed concurrently within a cycle.
    pub concurrency: usize,
    /// Deadline for a single evaluator or executor call.
    pub item_timeout: std::time::Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: std::time::Duration::from_secs(120),
            cooldown: chrono::Duration::minutes(2),
            concurrency: 4,
            item_timeout: std::time::Duration::from_secs(30),
        }
    }
}

/// Counters for one completed cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Automations whose condition was evaluated.
    pub evaluated: usize,
    /// Automations whose condition fired.
    pub triggered: usize,
    /// Automations skipped by the cooldown latch.
    pub skipped: usize,
    /// Automations aborted by an error or timeout before a verdict.
    pub failed: usize,
}

enum ItemOutcome {
    Skipped,
    NotTriggered,
    Triggered,
    Failed,
}

impl CycleReport {
    fn absorb(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::NotTriggered => self.evaluated += 1,
            ItemOutcome::Triggered => {
                self.evaluated += 1;
                self.triggered += 1;
            }
            ItemOutcome::Failed => self.failed += 1,
        }
    }
}

/// The orchestrating loop: registry read → evaluate → execute → write-back.
pub struct HookExecutor<AR> {
    automations: AR,
    registry: Arc<HookRegistry>,
    config: SchedulerConfig,
    /// automation id → instant it last fired, process lifetime only.
    latch: Mutex<HashMap<AutomationId, Timestamp>>,
    /// Held for the duration of a cycle; `try_lock` failure means a cycle
    /// is already running and the tick is dropped.
    cycle_guard: tokio::sync::Mutex<()>,
    limiter: Arc<Semaphore>,
}

impl<AR> HookExecutor<AR>
where
    AR: AutomationRepository + Send + Sync + 'static,
{
    /// Create a scheduler over the given registry accessor and hook set.
    #[must_use]
    pub fn new(automations: AR, registry: Arc<HookRegistry>, config: SchedulerConfig) -> Self {
        let limiter = Arc::new(Semaphore::new(config.concurrency.max(1)));
        Self {
            automations,
            registry,
            config,
            latch: Mutex::new(HashMap::new()),
            cycle_guard: tokio::sync::Mutex::new(()),
            limiter,
        }
    }

    /// Seed the in-memory latch from durable `last_triggered` values so a
    /// restart does not re-fire automations that fired just before it.
    ///
    /// # Errors
    ///
    /// Propagates the registry listing error.
    pub async fn rehydrate(&self) -> Result<usize, RelayHubError> {
        let automations = self.automations.get_active().await?;
        let mut latch = self.latch_map();
        let mut seeded = 0;
        for automation in automations {
            if let Some(ts) = automation.last_triggered {
                latch.insert(automation.id, ts);
                seeded += 1;
            }
        }
        Ok(seeded)
    }

    /// Run cycles until `shutdown` flips. In-flight work finishes before
    /// the loop returns; ticks landing mid-cycle are skipped.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval = ?self.config.interval, "scheduler started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    Arc::clone(&self).run_cycle().await;
                }
                _ = shutdown.changed() => {
                    info!("scheduler stopping");
                    break;
                }
            }
        }
    }

    /// Run a single cycle. Returns `None` when another cycle was already
    /// in progress (the tick is dropped entirely).
    pub async fn run_cycle(self: Arc<Self>) -> Option<CycleReport> {
        let Ok(_guard) = self.cycle_guard.try_lock() else {
            debug!("cycle already in progress, skipping tick");
            return None;
        };

        let automations = match self.automations.get_active().await {
            Ok(list) => list,
            Err(err) => {
                warn!(error = %err, "failed to list active automations, empty cycle");
                return Some(CycleReport::default());
            }
        };
        debug!(count = automations.len(), "cycle started");

        let mut tasks = JoinSet::new();
        for automation in automations {
            let Ok(permit) = Arc::clone(&self.limiter).acquire_owned().await else {
                break;
            };
            let this = Arc::clone(&self);
            tasks.spawn(async move {
                let outcome = this.process_one(automation).await;
                drop(permit);
                outcome
            });
        }

        let mut report = CycleReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => report.absorb(&outcome),
                Err(err) => {
                    warn!(error = %err, "automation task aborted");
                    report.failed += 1;
                }
            }
        }
        debug!(?report, "cycle finished");
        Some(report)
    }

    /// Evaluate one automation and, on trigger, run its reaction.
    /// Per-automation ordering: evaluate → latch → execute → write-back.
    async fn process_one(&self, automation: Automation) -> ItemOutcome {
        let now = time::now();
        if self.latched(automation.id, now) {
            debug!(automation = %automation.id, "inside cooldown window, skipping");
            return ItemOutcome::Skipped;
        }

        let evaluator = match self.registry.evaluator(&automation.action) {
            Ok(evaluator) => evaluator,
            Err(err) => {
                warn!(automation = %automation.id, action = %automation.action, error = %err,
                      "no evaluator for action");
                return ItemOutcome::Failed;
            }
        };

        let verdict = tokio::time::timeout(
            self.config.item_timeout,
            evaluator.evaluate(
                automation.owner_id,
                &automation.action.config,
                automation.last_triggered,
            ),
        )
        .await;
        let triggered = match verdict {
            Ok(Ok(triggered)) => triggered,
            Ok(Err(err)) => {
                warn!(automation = %automation.id, action = %automation.action, error = %err,
                      "condition evaluation failed");
                return ItemOutcome::Failed;
            }
            Err(_) => {
                warn!(automation = %automation.id, action = %automation.action,
                      "condition evaluation timed out");
                return ItemOutcome::Failed;
            }
        };

        if !triggered {
            if automation.last_triggered.is_none() && evaluator.seeds_watermark() {
                // First sight of an event-based automation: record the
                // watermark so later items have something to compare against.
                if let Err(err) = self.automations.set_last_triggered(automation.id, now).await {
                    warn!(automation = %automation.id, error = %err, "failed to seed watermark");
                }
            }
            return ItemOutcome::NotTriggered;
        }

        // Latch before the reaction runs to minimize the duplicate-fire
        // window if another tick lands mid-execution.
        self.latch_map().insert(automation.id, now);
        info!(automation = %automation.id, action = %automation.action, "condition fired");

        match self.registry.executor(&automation.reaction) {
            Ok(executor) => {
                let run = tokio::time::timeout(
                    self.config.item_timeout,
                    executor.execute(automation.owner_id, &automation.reaction.config),
                )
                .await;
                match run {
                    Ok(Ok(())) => {
                        info!(automation = %automation.id, reaction = %automation.reaction,
                              "reaction executed");
                    }
                    Ok(Err(err)) => {
                        warn!(automation = %automation.id, reaction = %automation.reaction,
                              error = %err, "reaction failed");
                    }
                    Err(_) => {
                        warn!(automation = %automation.id, reaction = %automation.reaction,
                              "reaction timed out");
                    }
                }
            }
            Err(err) => {
                warn!(automation = %automation.id, reaction = %automation.reaction, error = %err,
                      "no executor for reaction");
            }
        }

        // The trigger occurrence is consumed whether or not the reaction
        // succeeded; the watermark always advances.
        if let Err(err) = self.automations.set_last_triggered(automation.id, now).await {
            warn!(automation = %automation.id, error = %err, "failed to persist last_triggered");
        }
        ItemOutcome::Triggered
    }

    fn latched(&self, id: AutomationId, now: Timestamp) -> bool {
        self.latch_map()
            .get(&id)
            .is_some_and(|last| now.signed_duration_since(*last) < self.config.cooldown)
    }

    fn latch_map(&self) -> std::sync::MutexGuard<'_, HashMap<AutomationId, Timestamp>> {
        self.latch
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use relayhub_domain::automation::HookBinding;
    use relayhub_domain::error::ProviderError;
    use relayhub_domain::id::UserId;

    use crate::ports::{ConditionEvaluator, EffectExecutor};

    // ── In-memory automation repo ──────────────────────────────────

    #[derive(Default)]
    struct InMemoryAutomationRepo {
        store: Mutex<HashMap<AutomationId, Automation>>,
    }

    impl InMemoryAutomationRepo {
        fn with(automations: Vec<Automation>) -> Self {
            let map: HashMap<_, _> = automations.into_iter().map(|a| (a.id, a)).collect();
            Self {
                store: Mutex::new(map),
            }
        }

        fn last_triggered(&self, id: AutomationId) -> Option<Timestamp> {
            self.store
                .lock()
                .unwrap()
                .get(&id)
                .and_then(|a| a.last_triggered)
        }
    }

    impl AutomationRepository for InMemoryAutomationRepo {
        fn create(
            &self,
            automation: Automation,
        ) -> impl Future<Output = Result<Automation, RelayHubError>> + Send {
            self.store
                .lock()
                .unwrap()
                .insert(automation.id, automation.clone());
            async { Ok(automation) }
        }

        fn get_by_id(
            &self,
            id: AutomationId,
        ) -> impl Future<Output = Result<Option<Automation>, RelayHubError>> + Send {
            let found = self.store.lock().unwrap().get(&id).cloned();
            async { Ok(found) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<Automation>, RelayHubError>> + Send {
            let all: Vec<_> = self.store.lock().unwrap().values().cloned().collect();
            async { Ok(all) }
        }

        fn get_active(
            &self,
        ) -> impl Future<Output = Result<Vec<Automation>, RelayHubError>> + Send {
            let active: Vec<_> = self
                .store
                .lock()
                .unwrap()
                .values()
                .filter(|a| a.active)
                .cloned()
                .collect();
            async { Ok(active) }
        }

        fn update(
            &self,
            automation: Automation,
        ) -> impl Future<Output = Result<Automation, RelayHubError>> + Send {
            self.store
                .lock()
                .unwrap()
                .insert(automation.id, automation.clone());
            async { Ok(automation) }
        }

        fn set_last_triggered(
            &self,
            id: AutomationId,
            at: Timestamp,
        ) -> impl Future<Output = Result<(), RelayHubError>> + Send {
            if let Some(automation) = self.store.lock().unwrap().get_mut(&id) {
                automation.last_triggered = Some(at);
                automation.updated_at = at;
            }
            async { Ok(()) }
        }
    }

    // ── Stub hooks ─────────────────────────────────────────────────

    struct StubEvaluator {
        verdict: Result<bool, fn() -> RelayHubError>,
        delay: Option<std::time::Duration>,
        seeds: bool,
        calls: AtomicUsize,
    }

    impl StubEvaluator {
        fn firing() -> Self {
            Self {
                verdict: Ok(true),
                delay: None,
                seeds: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn quiet() -> Self {
            Self {
                verdict: Ok(false),
                ..Self::firing()
            }
        }

        fn failing() -> Self {
            Self {
                verdict: Err(|| {
                    ProviderError::Transport {
                        provider: "stub".to_string(),
                        detail: "boom".to_string(),
                    }
                    .into()
                }),
                ..Self::firing()
            }
        }

        fn seeding() -> Self {
            Self {
                seeds: true,
                ..Self::quiet()
            }
        }

        fn slow(delay: std::time::Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::firing()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConditionEvaluator for StubEvaluator {
        async fn evaluate(
            &self,
            _owner: UserId,
            _config: &serde_json::Value,
            _last_triggered: Option<Timestamp>,
        ) -> Result<bool, RelayHubError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.verdict {
                Ok(verdict) => Ok(*verdict),
                Err(make) => Err(make()),
            }
        }

        fn seeds_watermark(&self) -> bool {
            self.seeds
        }
    }

    struct SpyExecutor {
        fail: bool,
        executions: AtomicUsize,
    }

    impl SpyExecutor {
        fn succeeding() -> Self {
            Self {
                fail: false,
                executions: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                executions: AtomicUsize::new(0),
            }
        }

        fn executions(&self) -> usize {
            self.executions.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EffectExecutor for SpyExecutor {
        async fn execute(
            &self,
            _owner: UserId,
            _config: &serde_json::Value,
        ) -> Result<(), RelayHubError> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Status {
                    provider: "stub".to_string(),
                    status: 500,
                    body: "oops".to_string(),
                }
                .into());
            }
            Ok(())
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn automation(action_kind: &str) -> Automation {
        Automation::builder()
            .name(format!("rule {action_kind}"))
            .action(HookBinding::new("stub", action_kind, serde_json::json!({})))
            .reaction(HookBinding::new("stub", "react", serde_json::json!({})))
            .build()
            .unwrap()
    }

    fn executor_with(
        automations: Vec<Automation>,
        registry: HookRegistry,
        config: SchedulerConfig,
    ) -> Arc<HookExecutor<InMemoryAutomationRepo>> {
        Arc::new(HookExecutor::new(
            InMemoryAutomationRepo::with(automations),
            Arc::new(registry),
            config,
        ))
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_trigger_and_execute_reaction() {
        let auto = automation("fire");
        let id = auto.id;
        let evaluator = Arc::new(StubEvaluator::firing());
        let reaction = Arc::new(SpyExecutor::succeeding());
        let mut registry = HookRegistry::new();
        registry.register_evaluator(
            "stub",
            "fire",
            Arc::clone(&evaluator) as Arc<dyn ConditionEvaluator>,
        );
        registry.register_executor(
            "stub",
            "react",
            Arc::clone(&reaction) as Arc<dyn EffectExecutor>,
        );

        let executor = executor_with(vec![auto], registry, SchedulerConfig::default());
        let report = Arc::clone(&executor).run_cycle().await.unwrap();

        assert_eq!(report.triggered, 1);
        assert_eq!(reaction.executions(), 1);
        assert!(executor.automations.last_triggered(id).is_some());
    }

    #[tokio::test]
    async fn should_skip_overlapping_cycle() {
        let evaluator = Arc::new(StubEvaluator::slow(std::time::Duration::from_millis(100)));
        let reaction = Arc::new(SpyExecutor::succeeding());
        let mut registry = HookRegistry::new();
        registry.register_evaluator(
            "stub",
            "fire",
            Arc::clone(&evaluator) as Arc<dyn ConditionEvaluator>,
        );
        registry.register_executor(
            "stub",
            "react",
            Arc::clone(&reaction) as Arc<dyn EffectExecutor>,
        );

        let executor = executor_with(vec![automation("fire")], registry, SchedulerConfig::default());
        let (first, second) = tokio::join!(
            Arc::clone(&executor).run_cycle(),
            Arc::clone(&executor).run_cycle()
        );

        // Exactly one of the two ticks ran a cycle.
        assert_eq!(
            usize::from(first.is_some()) + usize::from(second.is_some()),
            1
        );
        assert_eq!(evaluator.calls(), 1);
    }

    #[tokio::test]
    async fn should_isolate_evaluator_errors_between_automations() {
        let failing = Arc::new(StubEvaluator::failing());
        let firing = Arc::new(StubEvaluator::firing());
        let reaction = Arc::new(SpyExecutor::succeeding());
        let mut registry = HookRegistry::new();
        registry.register_evaluator(
            "stub",
            "broken",
            Arc::clone(&failing) as Arc<dyn ConditionEvaluator>,
        );
        registry.register_evaluator(
            "stub",
            "fire",
            Arc::clone(&firing) as Arc<dyn ConditionEvaluator>,
        );
        registry.register_executor(
            "stub",
            "react",
            Arc::clone(&reaction) as Arc<dyn EffectExecutor>,
        );

        let executor = executor_with(
            vec![automation("broken"), automation("fire")],
            registry,
            SchedulerConfig::default(),
        );
        let report = Arc::clone(&executor).run_cycle().await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.triggered, 1);
        assert_eq!(reaction.executions(), 1);
    }

    #[tokio::test]
    async fn should_skip_recently_fired_automation_via_latch() {
        let evaluator = Arc::new(StubEvaluator::firing());
        let reaction = Arc::new(SpyExecutor::succeeding());
        let mut registry = HookRegistry::new();
        registry.register_evaluator(
            "stub",
            "fire",
            Arc::clone(&evaluator) as Arc<dyn ConditionEvaluator>,
        );
        registry.register_executor(
            "stub",
            "react",
            Arc::clone(&reaction) as Arc<dyn EffectExecutor>,
        );

        let executor = executor_with(vec![automation("fire")], registry, SchedulerConfig::default());
        let first = Arc::clone(&executor).run_cycle().await.unwrap();
        let second = Arc::clone(&executor).run_cycle().await.unwrap();

        assert_eq!(first.triggered, 1);
        assert_eq!(second.skipped, 1);
        assert_eq!(second.triggered, 0);
        assert_eq!(reaction.executions(), 1);
    }

    #[tokio::test]
    async fn should_advance_watermark_even_when_reaction_fails() {
        let auto = automation("fire");
        let id = auto.id;
        let evaluator = Arc::new(StubEvaluator::firing());
        let reaction = Arc::new(SpyExecutor::failing());
        let mut registry = HookRegistry::new();
        registry.register_evaluator(
            "stub",
            "fire",
            Arc::clone(&evaluator) as Arc<dyn ConditionEvaluator>,
        );
        registry.register_executor(
            "stub",
            "react",
            Arc::clone(&reaction) as Arc<dyn EffectExecutor>,
        );

        let executor = executor_with(vec![auto], registry, SchedulerConfig::default());
        let report = Arc::clone(&executor).run_cycle().await.unwrap();

        assert_eq!(report.triggered, 1);
        assert_eq!(reaction.executions(), 1);
        assert!(executor.automations.last_triggered(id).is_some());
    }

    #[tokio::test]
    async fn should_seed_watermark_for_event_evaluator_without_firing() {
        let auto = automation("watch");
        let id = auto.id;
        let evaluator = Arc::new(StubEvaluator::seeding());
        let reaction = Arc::new(SpyExecutor::succeeding());
        let mut registry = HookRegistry::new();
        registry.register_evaluator(
            "stub",
            "watch",
            Arc::clone(&evaluator) as Arc<dyn ConditionEvaluator>,
        );
        registry.register_executor(
            "stub",
            "react",
            Arc::clone(&reaction) as Arc<dyn EffectExecutor>,
        );

        let executor = executor_with(vec![auto], registry, SchedulerConfig::default());
        let report = Arc::clone(&executor).run_cycle().await.unwrap();

        assert_eq!(report.triggered, 0);
        assert_eq!(reaction.executions(), 0);
        // Watermark seeded, latch untouched.
        assert!(executor.automations.last_triggered(id).is_some());
        assert!(executor.latch_map().is_empty());
    }

    #[tokio::test]
    async fn should_not_seed_watermark_for_time_evaluator() {
        let auto = automation("quiet");
        let id = auto.id;
        let evaluator = Arc::new(StubEvaluator::quiet());
        let mut registry = HookRegistry::new();
        registry.register_evaluator(
            "stub",
            "quiet",
            Arc::clone(&evaluator) as Arc<dyn ConditionEvaluator>,
        );

        let executor = executor_with(vec![auto], registry, SchedulerConfig::default());
        Arc::clone(&executor).run_cycle().await.unwrap();

        assert!(executor.automations.last_triggered(id).is_none());
    }

    #[tokio::test]
    async fn should_count_failure_when_no_evaluator_registered() {
        let executor = executor_with(
            vec![automation("unregistered")],
            HookRegistry::new(),
            SchedulerConfig::default(),
        );
        let report = Arc::clone(&executor).run_cycle().await.unwrap();
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn should_fail_item_when_evaluation_exceeds_timeout() {
        let evaluator = Arc::new(StubEvaluator::slow(std::time::Duration::from_millis(200)));
        let mut registry = HookRegistry::new();
        registry.register_evaluator(
            "stub",
            "fire",
            Arc::clone(&evaluator) as Arc<dyn ConditionEvaluator>,
        );

        let config = SchedulerConfig {
            item_timeout: std::time::Duration::from_millis(20),
            ..SchedulerConfig::default()
        };
        let executor = executor_with(vec![automation("fire")], registry, config);
        let report = Arc::clone(&executor).run_cycle().await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.triggered, 0);
    }

    #[tokio::test]
    async fn should_ignore_inactive_automations() {
        let mut auto = automation("fire");
        auto.active = false;
        let evaluator = Arc::new(StubEvaluator::firing());
        let mut registry = HookRegistry::new();
        registry.register_evaluator(
            "stub",
            "fire",
            Arc::clone(&evaluator) as Arc<dyn ConditionEvaluator>,
        );

        let executor = executor_with(vec![auto], registry, SchedulerConfig::default());
        let report = Arc::clone(&executor).run_cycle().await.unwrap();

        assert_eq!(report.evaluated, 0);
        assert_eq!(evaluator.calls(), 0);
    }

    #[tokio::test]
    async fn should_rehydrate_latch_from_durable_watermarks() {
        let mut auto = automation("fire");
        auto.last_triggered = Some(time::now());
        let evaluator = Arc::new(StubEvaluator::firing());
        let reaction = Arc::new(SpyExecutor::succeeding());
        let mut registry = HookRegistry::new();
        registry.register_evaluator(
            "stub",
            "fire",
            Arc::clone(&evaluator) as Arc<dyn ConditionEvaluator>,
        );
        registry.register_executor(
            "stub",
            "react",
            Arc::clone(&reaction) as Arc<dyn EffectExecutor>,
        );

        let executor = executor_with(vec![auto], registry, SchedulerConfig::default());
        let seeded = executor.rehydrate().await.unwrap();
        assert_eq!(seeded, 1);

        // Fired "just before restart": the rehydrated latch suppresses it.
        let report = Arc::clone(&executor).run_cycle().await.unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(reaction.executions(), 0);
    }

    #[tokio::test]
    async fn should_stop_run_loop_on_shutdown_signal() {
        let executor = executor_with(vec![], HookRegistry::new(), SchedulerConfig::default());
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(Arc::clone(&executor).run(rx));
        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
