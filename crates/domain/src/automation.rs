//! Automation — one action condition bound to one reaction effect.
//!
//! An automation watches a single external service through its action
//! binding and, when the condition fires, executes a single reaction on
//! another service. Config payloads are schema-free JSON interpreted only
//! by the evaluator/executor matching the binding's (service, kind) pair.

use serde::{Deserialize, Serialize};

use crate::error::{RelayHubError, ValidationError};
use crate::id::{AutomationId, UserId};
use crate::time::Timestamp;

/// A (service, kind, config) triple naming one side of an automation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookBinding {
    /// Provider name, e.g. `"timer"`, `"gmail"`, `"github"`.
    pub service: String,
    /// Hook kind within the service, e.g. `"time_reached"`.
    pub kind: String,
    /// Free-form config interpreted by the matching evaluator/executor.
    #[serde(default)]
    pub config: serde_json::Value,
}

impl HookBinding {
    /// Build a binding from its parts.
    pub fn new(
        service: impl Into<String>,
        kind: impl Into<String>,
        config: serde_json::Value,
    ) -> Self {
        Self {
            service: service.into(),
            kind: kind.into(),
            config,
        }
    }

    fn validate(&self, role: &'static str) -> Result<(), ValidationError> {
        if self.service.is_empty() {
            return Err(ValidationError::EmptyHookField {
                role,
                field: "service",
            });
        }
        if self.kind.is_empty() {
            return Err(ValidationError::EmptyHookField {
                role,
                field: "kind",
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for HookBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.service, self.kind)
    }
}

/// A user-owned rule: when the action condition fires, run the reaction.
///
/// Exactly one action and one reaction per automation, by construction.
/// The engine mutates only `last_triggered`; everything else belongs to
/// the (out-of-scope) management API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Automation {
    pub id: AutomationId,
    pub owner_id: UserId,
    pub name: String,
    pub active: bool,
    pub action: HookBinding,
    pub reaction: HookBinding,
    /// Watermark: when the condition last fired. `None` until the first
    /// trigger (or watermark seeding for event-based actions).
    pub last_triggered: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Automation {
    /// Create a builder for constructing an [`Automation`].
    #[must_use]
    pub fn builder() -> AutomationBuilder {
        AutomationBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - either binding has an empty service or kind
    ///   ([`ValidationError::EmptyHookField`])
    pub fn validate(&self) -> Result<(), RelayHubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.action.validate("action")?;
        self.reaction.validate("reaction")?;
        Ok(())
    }
}

/// Step-by-step builder for [`Automation`].
#[derive(Debug, Default)]
pub struct AutomationBuilder {
    id: Option<AutomationId>,
    owner_id: Option<UserId>,
    name: Option<String>,
    active: Option<bool>,
    action: Option<HookBinding>,
    reaction: Option<HookBinding>,
    last_triggered: Option<Timestamp>,
}

impl AutomationBuilder {
    #[must_use]
    pub fn id(mut self, id: AutomationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn owner_id(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub fn action(mut self, action: HookBinding) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn reaction(mut self, reaction: HookBinding) -> Self {
        self.reaction = Some(reaction);
        self
    }

    #[must_use]
    pub fn last_triggered(mut self, ts: Timestamp) -> Self {
        self.last_triggered = Some(ts);
        self
    }

    /// Consume the builder, validate, and return an [`Automation`].
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Validation`] if required fields are
    /// missing or empty.
    pub fn build(self) -> Result<Automation, RelayHubError> {
        let now = crate::time::now();
        let automation = Automation {
            id: self.id.unwrap_or_default(),
            owner_id: self.owner_id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            active: self.active.unwrap_or(true),
            action: self
                .action
                .unwrap_or_else(|| HookBinding::new("", "", serde_json::Value::Null)),
            reaction: self
                .reaction
                .unwrap_or_else(|| HookBinding::new("", "", serde_json::Value::Null)),
            last_triggered: self.last_triggered,
            created_at: now,
            updated_at: now,
        };
        automation.validate()?;
        Ok(automation)
    }
}
