use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{OnboardError, SecretString};

/// A pending invitation. `token` is the only copy of the plain token; stores
/// keep a digest of it.
#[derive(Debug, Clone, Serialize)]
pub struct Invitation {
    pub token: SecretString,
    pub workspace_id: i64,
    /// Snapshot taken at invite time.
    pub company_name: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Ephemeral token store; the only authority on invitation liveness.
///
/// Absent and expired tokens are indistinguishable: both fail with
/// `OnboardError::Expired`.
#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Issues a fresh token for `email` that lives for the configured TTL.
    async fn create(
        &self,
        workspace_id: i64,
        company_name: &str,
        email: &str,
    ) -> Result<Invitation, OnboardError>;

    async fn view(&self, token: &str) -> Result<Invitation, OnboardError>;

    /// Restarts the TTL of a live token. Never resurrects an expired one.
    async fn extend(&self, token: &str) -> Result<Invitation, OnboardError>;

    /// Drops every invitation for `email`. Revoking nothing is not an error.
    async fn revoke(&self, email: &str) -> Result<(), OnboardError>;

    /// Deletes expired entries, returning how many were removed.
    async fn prune_expired(&self) -> Result<u64, OnboardError>;
}
