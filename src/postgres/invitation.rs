use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::OnboardError;
use crate::config::InvitationConfig;
use crate::crypto::{generate_token, hash_token};
use crate::db::{INVITATION_COLUMNS, InvitationRecord, map_db_error};
use crate::repository::{Invitation, InvitationStore};
use crate::validators::normalize_email;

#[derive(Clone)]
pub struct PostgresInvitationStore {
    pool: PgPool,
    config: InvitationConfig,
}

impl PostgresInvitationStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_config(pool, InvitationConfig::default())
    }

    pub fn with_config(pool: PgPool, config: InvitationConfig) -> Self {
        Self { pool, config }
    }
}

#[async_trait]
impl InvitationStore for PostgresInvitationStore {
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
            "INSERT INTO invitations (token_hash, workspace_id, company_name, email, issued_at, expires_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {INVITATION_COLUMNS}"
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
        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE token_hash = $1 AND expires_at > $2"
        ))
        .bind(hash_token(token))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("find_invitation"))?;

        row.map(|row| row.into_invitation(token))
            .ok_or(OnboardError::Expired)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn extend(&self, token: &str) -> Result<Invitation, OnboardError> {
        let now = Utc::now();

        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "UPDATE invitations SET expires_at = $1 WHERE token_hash = $2 AND expires_at > $3 RETURNING {INVITATION_COLUMNS}"
        ))
        .bind(now + self.config.ttl)
        .bind(hash_token(token))
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("extend_invitation"))?;

        row.map(|row| row.into_invitation(token))
            .ok_or(OnboardError::Expired)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn revoke(&self, email: &str) -> Result<(), OnboardError> {
        sqlx::query("DELETE FROM invitations WHERE email = $1")
            .bind(normalize_email(email))
            .execute(&self.pool)
            .await
            .map_err(map_db_error("revoke_invitation"))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn prune_expired(&self) -> Result<u64, OnboardError> {
        let result = sqlx::query("DELETE FROM invitations WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(map_db_error("prune_invitations"))?;

        Ok(result.rows_affected())
    }
}
