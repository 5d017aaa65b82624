//! # relayhub-adapter-providers
//!
//! Outbound provider adapter using [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement the `ConditionEvaluator` / `EffectExecutor` hook ports for
//!   every (service, kind) pair in the domain catalog
//! - Implement the `TokenEndpoint` port (OAuth `refresh_token` grants)
//! - Implement the `TimeSource` port (external time service with local
//!   fallback)
//!
//! ## Dependency rule
//! Depends on `relayhub-app` (for port traits) and `relayhub-domain` (for
//! domain types). The `app` and `domain` crates must never reference this
//! adapter.

pub mod clock;
pub mod discord;
pub mod github;
pub mod gmail;
pub mod oauth;
pub mod spotify;
pub mod timer;
pub mod youtube;

mod http;
