use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::OnboardError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub company_name: String,
    pub contact_email: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    async fn create(
        &self,
        company_name: &str,
        contact_email: &str,
    ) -> Result<Workspace, OnboardError>;

    /// `Ok(None)` when no workspace has this id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Workspace>, OnboardError>;

    /// Fails with `NotFound` when no workspace has this id.
    async fn change_name(&self, id: i64, company_name: &str) -> Result<Workspace, OnboardError>;
}
