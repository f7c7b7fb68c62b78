use async_trait::async_trait;

use super::{Session, SessionData};
use crate::OnboardError;

/// Persistence for issued sessions.
///
/// Renewal and destruction are left to the host application.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores `data` and returns the new session id.
    async fn create(&self, data: SessionData) -> Result<String, OnboardError>;

    async fn find(&self, session_id: &str) -> Result<Option<Session>, OnboardError>;
}
