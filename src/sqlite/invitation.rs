use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::OnboardError;
use crate::config::InvitationConfig;
use crate::crypto::{generate_token, hash_token};
use crate::db::{INVITATION_COLUMNS, InvitationRecord, map_db_error};
use crate::repository::{Invitation, InvitationStore};
use crate::validators::normalize_email;

/// Invitation store backed by the `invitations` table.
///
/// Timestamps are stored as RFC 3339 text in UTC, which orders the same as
/// the instants it encodes.
#[derive(Clone)]
pub struct SqliteInvitationStore {
    pool: SqlitePool,
    config: InvitationConfig,
}

impl SqliteInvitationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_config(pool, InvitationConfig::default())
    }

    pub fn with_config(pool: SqlitePool, config: InvitationConfig) -> Self {
        Self { pool, config }
    }

    async fn find_live(&self, token_hash: &str) -> Result<InvitationRecord, OnboardError> {
        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE token_hash = ?"
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("find_invitation"))?;

        match row {
            Some(row) if row.expires_at > Utc::now() => Ok(row),
            Some(_) => {
                sqlx::query("DELETE FROM invitations WHERE token_hash = ?")
                    .bind(token_hash)
                    .execute(&self.pool)
                    .await
                    .map_err(map_db_error("evict_invitation"))?;
                Err(OnboardError::Expired)
            }
            None => Err(OnboardError::Expired),
        }
    }
}

#[async_trait]
impl InvitationStore for SqliteInvitationStore {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, company_name), err))]
    async fn create(
        &self,
        workspace_id: i64,
        company_name: &str,
        email: &str,
    ) -> Result<Invitation, OnboardError> {
        self.config.validate().map_err(OnboardError::unexpected)?;

        let token = generate_token(self.config.token_length);
        let now = Utc::now();

        let row: InvitationRecord = sqlx::query_as(&format!(
            "INSERT INTO invitations (token_hash, workspace_id, company_name, email, issued_at, expires_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING {INVITATION_COLUMNS}"
        ))
        .bind(hash_token(&token))
        .bind(workspace_id)
        .bind(company_name)
        .bind(normalize_email(email))
        .bind(now)
        .bind(now + self.config.ttl)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("create_invitation"))?;

        Ok(row.into_invitation(&token))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn view(&self, token: &str) -> Result<Invitation, OnboardError> {
        let row = self.find_live(&hash_token(token)).await?;
        Ok(row.into_invitation(token))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn extend(&self, token: &str) -> Result<Invitation, OnboardError> {
        let token_hash = hash_token(token);
        let now = Utc::now();

        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "UPDATE invitations SET expires_at = ? WHERE token_hash = ? AND expires_at > ? RETURNING {INVITATION_COLUMNS}"
        ))
        .bind(now + self.config.ttl)
        .bind(&token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("extend_invitation"))?;

        match row {
            Some(row) => Ok(row.into_invitation(token)),
            None => {
                sqlx::query("DELETE FROM invitations WHERE token_hash = ? AND expires_at <= ?")
                    .bind(&token_hash)
                    .bind(now)
                    .execute(&self.pool)
                    .await
                    .map_err(map_db_error("evict_invitation"))?;
                Err(OnboardError::Expired)
            }
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn revoke(&self, email: &str) -> Result<(), OnboardError> {
        sqlx::query("DELETE FROM invitations WHERE email = ?")
            .bind(normalize_email(email))
            .execute(&self.pool)
            .await
            .map_err(map_db_error("revoke_invitation"))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn prune_expired(&self) -> Result<u64, OnboardError> {
        let result = sqlx::query("DELETE FROM invitations WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(map_db_error("prune_invitations"))?;

        Ok(result.rows_affected())
    }
}
