#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use super::workspace::{Workspace, WorkspaceRepository};
use crate::OnboardError;

#[derive(Clone)]
pub struct MockWorkspaceRepository {
    workspaces: Arc<RwLock<HashMap<i64, Workspace>>>,
    next_id: Arc<AtomicI64>,
}

impl MockWorkspaceRepository {
    pub fn new() -> Self {
        Self {
            workspaces: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Removes a workspace, simulating one deleted after its users were
    /// invited.
    pub fn remove(&self, id: i64) -> Result<(), OnboardError> {
        self.workspaces
            .write()
            .map_err(|_| lock_error())?
            .remove(&id);
        Ok(())
    }
}

impl Default for MockWorkspaceRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error() -> OnboardError {
    OnboardError::unexpected("workspace store lock poisoned")
}

#[async_trait]
impl WorkspaceRepository for MockWorkspaceRepository {
    async fn create(
        &self,
        company_name: &str,
        contact_email: &str,
    ) -> Result<Workspace, OnboardError> {
        let workspace = Workspace {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            company_name: company_name.to_owned(),
            contact_email: contact_email.to_owned(),
            created_at: Utc::now(),
        };

        self.workspaces
            .write()
            .map_err(|_| lock_error())?
            .insert(workspace.id, workspace.clone());

        Ok(workspace)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Workspace>, OnboardError> {
        let workspaces = self.workspaces.read().map_err(|_| lock_error())?;
        Ok(workspaces.get(&id).cloned())
    }

    async fn change_name(&self, id: i64, company_name: &str) -> Result<Workspace, OnboardError> {
        let mut workspaces = self.workspaces.write().map_err(|_| lock_error())?;
        let workspace = workspaces.get_mut(&id).ok_or(OnboardError::NotFound)?;
        company_name.clone_into(&mut workspace.company_name);

        Ok(workspace.clone())
    }
}
