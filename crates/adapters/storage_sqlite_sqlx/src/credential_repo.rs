//! `SQLite` implementation of [`CredentialRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use relayhub_app::ports::CredentialRepository;
use relayhub_domain::credential::Credential;
use relayhub_domain::error::RelayHubError;
use relayhub_domain::id::{CredentialId, UserId};
use relayhub_domain::time::Timestamp;

use crate::error::StorageError;

struct Wrapper(Credential);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let owner_id: String = row.try_get("owner_id")?;
        let provider: String = row.try_get("provider")?;
        let provider_account_id: String = row.try_get("provider_account_id")?;
        let access_token: String = row.try_get("access_token")?;
        let refresh_token: Option<String> = row.try_get("refresh_token")?;
        let expires_at: String = row.try_get("expires_at")?;

        let id = CredentialId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let owner_id =
            UserId::from_str(&owner_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let expires_at = chrono::DateTime::parse_from_rfc3339(&expires_at)
            .map(|dt| dt.to_utc())
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Credential {
            id,
            owner_id,
            provider,
            provider_account_id,
            access_token,
            refresh_token,
            expires_at,
        }))
    }
}

/// `SQLite`-backed credential repository.
pub struct SqliteCredentialRepository {
    pool: SqlitePool,
}

impl SqliteCredentialRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CredentialRepository for SqliteCredentialRepository {
    async fn get(
        &self,
        owner: UserId,
        provider: &str,
    ) -> Result<Option<Credential>, RelayHubError> {
        let row: Option<Wrapper> =
            sqlx::query_as("SELECT * FROM credentials WHERE owner_id = ? AND provider = ?")
                .bind(owner.to_string())
                .bind(provider)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(row.map(|w| w.0))
    }

    async fn upsert(&self, credential: Credential) -> Result<Credential, RelayHubError> {
        sqlx::query(
            "INSERT INTO credentials (id, owner_id, provider, provider_account_id, access_token, refresh_token, expires_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (owner_id, provider) DO UPDATE SET \
                provider_account_id = excluded.provider_account_id, \
                access_token = excluded.access_token, \
                refresh_token = excluded.refresh_token, \
                expires_at = excluded.expires_at",
        )
        .bind(credential.id.to_string())
        .bind(credential.owner_id.to_string())
        .bind(&credential.provider)
        .bind(&credential.provider_account_id)
        .bind(&credential.access_token)
        .bind(&credential.refresh_token)
        .bind(credential.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(credential)
    }

    async fn update_tokens(
        &self,
        owner: UserId,
        provider: &str,
        access_token: &str,
        expires_at: Timestamp,
        refresh_token: Option<&str>,
    ) -> Result<(), RelayHubError> {
        // COALESCE keeps the stored refresh token when the provider did
        // not rotate it.
        sqlx::query(
            "UPDATE credentials SET access_token = ?, expires_at = ?, refresh_token = COALESCE(?, refresh_token) WHERE owner_id = ? AND provider = ?",
        )
        .bind(access_token)
        .bind(expires_at.to_rfc3339())
        .bind(refresh_token)
        .bind(owner.to_string())
        .bind(provider)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use chrono::Duration;

    async fn setup() -> SqliteCredentialRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteCredentialRepository::new(db.pool().clone())
    }

    fn credential(owner: UserId, provider: &str) -> Credential {
        Credential {
            id: CredentialId::new(),
            owner_id: owner,
            provider: provider.to_string(),
            provider_account_id: "acct-1".to_string(),
            access_token: "tok".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: relayhub_domain::time::now() + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn should_upsert_and_retrieve_credential() {
        let repo = setup().await;
        let owner = UserId::new();
        repo.upsert(credential(owner, "spotify")).await.unwrap();

        let fetched = repo.get(owner, "spotify").await.unwrap().unwrap();
        assert_eq!(fetched.owner_id, owner);
        assert_eq!(fetched.access_token, "tok");
        assert_eq!(fetched.refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn should_return_none_when_provider_not_linked() {
        let repo = setup().await;
        let result = repo.get(UserId::new(), "github").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_replace_existing_link_on_upsert() {
        let repo = setup().await;
        let owner = UserId::new();
        repo.upsert(credential(owner, "spotify")).await.unwrap();

        let mut relinked = credential(owner, "spotify");
        relinked.access_token = "tok-2".to_string();
        repo.upsert(relinked).await.unwrap();

        let fetched = repo.get(owner, "spotify").await.unwrap().unwrap();
        assert_eq!(fetched.access_token, "tok-2");
    }

    #[tokio::test]
    async fn should_update_tokens_and_keep_refresh_token_when_not_rotated() {
        let repo = setup().await;
        let owner = UserId::new();
        repo.upsert(credential(owner, "google")).await.unwrap();

        let expires_at = relayhub_domain::time::now() + Duration::minutes(30);
        repo.update_tokens(owner, "google", "fresh", expires_at, None)
            .await
            .unwrap();

        let fetched = repo.get(owner, "google").await.unwrap().unwrap();
        assert_eq!(fetched.access_token, "fresh");
        assert_eq!(fetched.refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn should_store_rotated_refresh_token() {
        let repo = setup().await;
        let owner = UserId::new();
        repo.upsert(credential(owner, "google")).await.unwrap();

        let expires_at = relayhub_domain::time::now() + Duration::minutes(30);
        repo.update_tokens(owner, "google", "fresh", expires_at, Some("rotated"))
            .await
            .unwrap();

        let fetched = repo.get(owner, "google").await.unwrap().unwrap();
        assert_eq!(fetched.refresh_token.as_deref(), Some("rotated"));
    }

    #[tokio::test]
    async fn should_keep_providers_isolated_per_user() {
        let repo = setup().await;
        let owner = UserId::new();
        repo.upsert(credential(owner, "spotify")).await.unwrap();
        repo.upsert(credential(owner, "github")).await.unwrap();
        repo.upsert(credential(UserId::new(), "spotify"))
            .await
            .unwrap();

        assert!(repo.get(owner, "spotify").await.unwrap().is_some());
        assert!(repo.get(owner, "github").await.unwrap().is_some());
        assert!(repo.get(owner, "google").await.unwrap().is_none());
    }
}
