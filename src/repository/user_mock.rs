#![allow(clippy::significant_drop_tightening)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use super::user::{Credentials, NewUser, Registration, User, UserRepository};
use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::error::ConflictField;
use crate::validators::normalize_email;
use crate::{OnboardError, SecretString};

/// In-memory user registry that enforces the same unique constraints as the
/// SQL backends.
#[derive(Clone)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
    hasher: Argon2Hasher,
}

impl MockUserRepository {
    /// Uses deliberately cheap Argon2 parameters.
    pub fn new() -> Self {
        Self::with_hasher(Argon2Hasher::new(8, 1, 1))
    }

    pub fn with_hasher(hasher: Argon2Hasher) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            hasher,
        }
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks a password against the stored hash. Test helper.
    pub fn verify_password(&self, email: &str, password: &str) -> Result<bool, OnboardError> {
        let email = normalize_email(email);
        let hash = {
            let users = self.users.read().map_err(|_| lock_error())?;
            users
                .values()
                .find(|u| u.email == email)
                .and_then(|u| u.credentials.as_ref())
                .map(|c| c.password_hash.clone())
        };

        match hash {
            Some(hash) => self.hasher.verify(password, &hash),
            None => Ok(false),
        }
    }

    fn stub(&self, workspace_id: i64, user: NewUser) -> User {
        User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            workspace_id,
            email: normalize_email(&user.email),
            role: user.role,
            created_at: Utc::now(),
            credentials: None,
        }
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error() -> OnboardError {
    OnboardError::unexpected("user store lock poisoned")
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, workspace_id: i64, user: NewUser) -> Result<User, OnboardError> {
        let mut created = self.create_many(workspace_id, vec![user]).await?;
        created
            .pop()
            .ok_or_else(|| OnboardError::unexpected("create_many returned no rows"))
    }

    async fn create_many(
        &self,
        workspace_id: i64,
        users: Vec<NewUser>,
    ) -> Result<Vec<User>, OnboardError> {
        let mut store = self.users.write().map_err(|_| lock_error())?;

        // check the whole batch before touching the map
        let mut seen: HashSet<String> = store.values().map(|u| u.email.clone()).collect();
        for user in &users {
            if !seen.insert(normalize_email(&user.email)) {
                return Err(OnboardError::Conflict(ConflictField::Email));
            }
        }

        let created: Vec<User> = users
            .into_iter()
            .map(|user| self.stub(workspace_id, user))
            .collect();
        for user in &created {
            store.insert(user.id, user.clone());
        }

        Ok(created)
    }

    async fn register(
        &self,
        email: &str,
        registration: &Registration,
    ) -> Result<Option<User>, OnboardError> {
        let email = normalize_email(email);
        let password_hash = self.hasher.hash(registration.password.expose_secret())?;

        let mut store = self.users.write().map_err(|_| lock_error())?;

        let Some(id) = store.values().find(|u| u.email == email).map(|u| u.id) else {
            return Ok(None);
        };

        let phone_taken = store.values().any(|u| {
            u.id != id
                && u.credentials
                    .as_ref()
                    .is_some_and(|c| c.phone_number == registration.phone_number)
        });
        if phone_taken {
            return Err(OnboardError::Conflict(ConflictField::Phone));
        }

        let user = store.get_mut(&id).ok_or_else(lock_error)?;
        user.credentials = Some(Credentials {
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            phone_number: registration.phone_number.clone(),
            password_hash,
        });

        Ok(Some(user.clone()))
    }

    async fn change_password(
        &self,
        workspace_id: i64,
        user_id: i64,
        password: &SecretString,
    ) -> Result<Option<User>, OnboardError> {
        let password_hash = self.hasher.hash(password.expose_secret())?;

        let mut store = self.users.write().map_err(|_| lock_error())?;
        let Some(user) = store
            .get_mut(&user_id)
            .filter(|u| u.workspace_id == workspace_id)
        else {
            return Ok(None);
        };

        // a stub has nothing to change
        let Some(credentials) = user.credentials.as_mut() else {
            return Ok(None);
        };
        credentials.password_hash = password_hash;

        Ok(Some(user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, OnboardError> {
        let email = normalize_email(email);
        let store = self.users.read().map_err(|_| lock_error())?;
        Ok(store.values().find(|u| u.email == email).cloned())
    }
}
