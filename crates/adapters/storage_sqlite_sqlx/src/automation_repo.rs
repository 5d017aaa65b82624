//! `SQLite` implementation of [`AutomationRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use relayhub_app::ports::AutomationRepository;
use relayhub_domain::automation::{Automation, HookBinding};
use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::{AutomationId, UserId};
use relayhub_domain::time::Timestamp;

use crate::error::StorageError;

struct Wrapper(Automation);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Automation> {
        value.map(|w| w.0)
    }
}

fn parse_timestamp(text: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

fn binding_from_columns(
    service: String,
    kind: String,
    config_json: &str,
) -> Result<HookBinding, sqlx::Error> {
    let config: serde_json::Value =
        serde_json::from_str(config_json).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
    Ok(HookBinding {
        service,
        kind,
        config,
    })
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let owner_id: String = row.try_get("owner_id")?;
        let name: String = row.try_get("name")?;
        let active: bool = row.try_get("active")?;
        let action_service: String = row.try_get("action_service")?;
        let action_kind: String = row.try_get("action_kind")?;
        let action_config: String = row.try_get("action_config")?;
        let reaction_service: String = row.try_get("reaction_service")?;
        let reaction_kind: String = row.try_get("reaction_kind")?;
        let reaction_config: String = row.try_get("reaction_config")?;
        let last_triggered: Option<String> = row.try_get("last_triggered")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let id = AutomationId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let owner_id =
            UserId::from_str(&owner_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let action = binding_from_columns(action_service, action_kind, &action_config)?;
        let reaction = binding_from_columns(reaction_service, reaction_kind, &reaction_config)?;
        let last_triggered = last_triggered.map(|s| parse_timestamp(&s)).transpose()?;

        Ok(Self(Automation {
            id,
            owner_id,
            name,
            active,
            action,
            reaction,
            last_triggered,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

/// `SQLite`-backed automation repository.
pub struct SqliteAutomationRepository {
    pool: SqlitePool,
}

impl SqliteAutomationRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AutomationRepository for SqliteAutomationRepository {
    async fn create(&self, automation: Automation) -> Result<Automation, RelayHubError> {
        let action_config =
            serde_json::to_string(&automation.action.config).map_err(StorageError::from)?;
        let reaction_config =
            serde_json::to_string(&automation.reaction.config).map_err(StorageError::from)?;
        let last_triggered = automation.last_triggered.map(|ts| ts.to_rfc3339());

        sqlx::query(
            "INSERT INTO automations (id, owner_id, name, active, action_service, action_kind, action_config, reaction_service, reaction_kind, reaction_config, last_triggered, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(automation.id.to_string())
        .bind(automation.owner_id.to_string())
        .bind(&automation.name)
        .bind(automation.active)
        .bind(&automation.action.service)
        .bind(&automation.action.kind)
        .bind(&action_config)
        .bind(&automation.reaction.service)
        .bind(&automation.reaction.kind)
        .bind(&reaction_config)
        .bind(&last_triggered)
        .bind(automation.created_at.to_rfc3339())
        .bind(automation.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(automation)
    }

    async fn get_by_id(&self, id: AutomationId) -> Result<Option<Automation>, RelayHubError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM automations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Automation>, RelayHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as("SELECT * FROM automations ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_active(&self) -> Result<Vec<Automation>, RelayHubError> {
        let rows: Vec<Wrapper> =
            sqlx::query_as("SELECT * FROM automations WHERE active = 1 ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, automation: Automation) -> Result<Automation, RelayHubError> {
        let action_config =
            serde_json::to_string(&automation.action.config).map_err(StorageError::from)?;
        let reaction_config =
            serde_json::to_string(&automation.reaction.config).map_err(StorageError::from)?;
        let last_triggered = automation.last_triggered.map(|ts| ts.to_rfc3339());

        sqlx::query(
            "UPDATE automations SET owner_id = ?, name = ?, active = ?, action_service = ?, action_kind = ?, action_config = ?, reaction_service = ?, reaction_kind = ?, reaction_config = ?, last_triggered = ?, updated_at = ? WHERE id = ?",
        )
        .bind(automation.owner_id.to_string())
        .bind(&automation.name)
        .bind(automation.active)
        .bind(&automation.action.service)
        .bind(&automation.action.kind)
        .bind(&action_config)
        .bind(&automation.reaction.service)
        .bind(&automation.reaction.kind)
        .bind(&reaction_config)
        .bind(&last_triggered)
        .bind(automation.updated_at.to_rfc3339())
        .bind(automation.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(automation)
    }

    async fn set_last_triggered(
        &self,
        id: AutomationId,
        at: Timestamp,
    ) -> Result<(), RelayHubError> {
        sqlx::query("UPDATE automations SET last_triggered = ? WHERE id = ?")
            .bind(at.to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
