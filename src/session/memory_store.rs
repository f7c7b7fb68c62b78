//! In-memory session storage.
//!
//! Suitable for development, testing, and single-instance deployments.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::repository::SessionRepository;
use super::{Session, SessionData};
use crate::OnboardError;
use crate::crypto::generate_token;

/// Sessions are lost when the process restarts.
#[derive(Clone)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, data: SessionData) -> Result<String, OnboardError> {
        let session_id = generate_token(32);

        self.sessions
            .write()
            .map_err(|_| OnboardError::unexpected("session store lock poisoned"))?
            .insert(session_id.clone(), data);

        Ok(session_id)
    }

    async fn find(&self, session_id: &str) -> Result<Option<Session>, OnboardError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| OnboardError::unexpected("session store lock poisoned"))?;

        Ok(sessions.get(session_id).map(|data| Session {
            id: session_id.to_owned(),
            data: data.clone(),
        }))
    }
}
