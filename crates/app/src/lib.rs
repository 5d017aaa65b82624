//! # relayhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AutomationRepository` — the automation registry accessor
//!   - `CredentialRepository` — the credential store accessor
//!   - `TokenEndpoint` — a provider's OAuth refresh endpoint
//!   - `ConditionEvaluator` / `EffectExecutor` — per-(service, kind) hooks
//!   - `AccessTokens` — hands hooks a currently-valid access token
//!   - `TimeSource` — wall-clock in the engine's reference timezone
//! - Provide the **hook registry** resolving (service, kind) pairs once at
//!   startup
//! - Provide the **token lifecycle service** (refresh-on-expiry with
//!   per-credential single-flight)
//! - Provide the **scheduler** (hook executor) driving recurring cycles
//!
//! ## Dependency rule
//! Depends on `relayhub-domain` only (plus `tokio::sync`/`tokio::time` for
//! concurrency primitives). Never imports adapter crates. Adapters depend
//! on *this* crate, not the reverse.

pub mod ports;
pub mod registry;
pub mod scheduler;
pub mod token_service;
