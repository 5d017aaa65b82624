//! Automation registry port — persistence for automations.

use std::future::Future;

use relayhub_domain::automation::Automation;
use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::AutomationId;
use relayhub_domain::time::Timestamp;

/// Repository for persisting and querying [`Automation`]s.
///
/// The engine reads the active set and writes back `last_triggered`;
/// everything else exists for the (out-of-scope) management API.
pub trait AutomationRepository {
    /// Create a new automation in storage.
    fn create(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, RelayHubError>> + Send;

    /// Get an automation by its unique identifier.
    fn get_by_id(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, RelayHubError>> + Send;

    /// Get all automations.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Automation>, RelayHubError>> + Send;

    /// Get all active automations, fully resolved.
    fn get_active(&self) -> impl Future<Output = Result<Vec<Automation>, RelayHubError>> + Send;

    /// Update an existing automation.
    fn update(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, RelayHubError>> + Send;

    /// Persist a new `last_triggered` watermark for an automation.
    fn set_last_triggered(
        &self,
        id: AutomationId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), RelayHubError>> + Send;
}
