//! # relayhub-domain
//!
//! Pure domain model for the relayhub automation engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Automations** (one action condition → one reaction effect)
//! - Define **Credentials** (per-user, per-provider OAuth state)
//! - Define the **Service catalog** (which action/reaction kinds exist)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod catalog;
pub mod credential;
