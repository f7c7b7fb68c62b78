//! In-memory invitation store.
//!
//! Suitable for tests and single-instance deployments. Invitations are lost
//! on restart.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::invitation::{Invitation, InvitationStore};
use crate::config::InvitationConfig;
use crate::crypto::{generate_token, hash_token};
use crate::validators::normalize_email;
use crate::{OnboardError, SecretString};

const MAX_TOKEN_ATTEMPTS: usize = 8;

#[derive(Debug, Clone)]
struct Entry {
    workspace_id: i64,
    company_name: String,
    email: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn to_invitation(&self, token: &str) -> Invitation {
        Invitation {
            token: SecretString::new(token),
            workspace_id: self.workspace_id,
            company_name: self.company_name.clone(),
            email: self.email.clone(),
            issued_at: self.issued_at,
            expires_at: self.expires_at,
        }
    }
}

/// Entries are keyed by the token digest, so a dump of the map does not
/// contain usable tokens. Expired entries are evicted when touched and by
/// [`InvitationStore::prune_expired`].
#[derive(Clone)]
pub struct InMemoryInvitationStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    config: InvitationConfig,
}

impl InMemoryInvitationStore {
    pub fn new() -> Self {
        Self::with_config(InvitationConfig::default())
    }

    pub fn with_config(config: InvitationConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Number of stored entries, live or not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_error() -> OnboardError {
        OnboardError::unexpected("invitation store lock poisoned")
    }
}

impl Default for InMemoryInvitationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvitationStore for InMemoryInvitationStore {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, company_name), err))]
    async fn create(
        &self,
        workspace_id: i64,
        company_name: &str,
        email: &str,
    ) -> Result<Invitation, OnboardError> {
        self.config.validate().map_err(OnboardError::unexpected)?;

        let now = Utc::now();
        let entry = Entry {
            workspace_id,
            company_name: company_name.to_owned(),
            email: normalize_email(email),
            issued_at: now,
            expires_at: now + self.config.ttl,
        };

        let mut entries = self.entries.write().map_err(|_| Self::lock_error())?;

        let token = (0..MAX_TOKEN_ATTEMPTS)
            .map(|_| generate_token(self.config.token_length))
            .find(|candidate| !entries.contains_key(&hash_token(candidate)))
            .ok_or_else(|| OnboardError::unexpected("no unused invitation token after retries"))?;

        let invitation = entry.to_invitation(&token);
        entries.insert(hash_token(&token), entry);
        drop(entries);

        Ok(invitation)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn view(&self, token: &str) -> Result<Invitation, OnboardError> {
        let key = hash_token(token);
        let now = Utc::now();

        let mut entries = self.entries.write().map_err(|_| Self::lock_error())?;
        match entries.get(&key) {
            Some(entry) if entry.expires_at > now => Ok(entry.to_invitation(token)),
            Some(_) => {
                entries.remove(&key);
                Err(OnboardError::Expired)
            }
            None => Err(OnboardError::Expired),
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn extend(&self, token: &str) -> Result<Invitation, OnboardError> {
        let key = hash_token(token);
        let now = Utc::now();

        let mut entries = self.entries.write().map_err(|_| Self::lock_error())?;
        match entries.get_mut(&key) {
            Some(entry) if entry.expires_at > now => {
                entry.expires_at = now + self.config.ttl;
                Ok(entry.to_invitation(token))
            }
            Some(_) => {
                entries.remove(&key);
                Err(OnboardError::Expired)
            }
            None => Err(OnboardError::Expired),
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn revoke(&self, email: &str) -> Result<(), OnboardError> {
        let email = normalize_email(email);
        self.entries
            .write()
            .map_err(|_| Self::lock_error())?
            .retain(|_, entry| entry.email != email);

        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    async fn prune_expired(&self) -> Result<u64, OnboardError> {
        let now = Utc::now();
        let mut entries = self.entries.write().map_err(|_| Self::lock_error())?;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);

        Ok((before - entries.len()) as u64)
    }
}
