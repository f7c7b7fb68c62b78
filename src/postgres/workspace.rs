use async_trait::async_trait;
use sqlx::PgPool;

use crate::OnboardError;
use crate::db::{WORKSPACE_COLUMNS, WorkspaceRecord, map_db_error};
use crate::repository::{Workspace, WorkspaceRepository};

#[derive(Clone)]
pub struct PostgresWorkspaceRepository {
    pool: PgPool,
}

impl PostgresWorkspaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkspaceRepository for PostgresWorkspaceRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create(
        &self,
        company_name: &str,
        contact_email: &str,
    ) -> Result<Workspace, OnboardError> {
        let row: WorkspaceRecord = sqlx::query_as(&format!(
            "INSERT INTO workspaces (company_name, contact_email) VALUES ($1, $2) RETURNING {WORKSPACE_COLUMNS}"
        ))
        .bind(company_name)
        .bind(contact_email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("create_workspace"))?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Workspace>, OnboardError> {
        let row: Option<WorkspaceRecord> = sqlx::query_as(&format!(
            "SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("find_workspace"))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn change_name(&self, id: i64, company_name: &str) -> Result<Workspace, OnboardError> {
        let row: Option<WorkspaceRecord> = sqlx::query_as(&format!(
            "UPDATE workspaces SET company_name = $1 WHERE id = $2 RETURNING {WORKSPACE_COLUMNS}"
        ))
        .bind(company_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("change_workspace_name"))?;

        row.map(Into::into).ok_or(OnboardError::NotFound)
    }
}
