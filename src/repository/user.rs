use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OnboardError, SecretString};

/// Workspace role, lowest tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
    Owner,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Anyone above the lowest tier may invite.
    pub fn can_invite(self) -> bool {
        self != Self::Member
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = OnboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            other => Err(OnboardError::unexpected(format!("unknown role: {other}"))),
        }
    }
}

/// Attached by `register`. A user without credentials is a stub waiting for
/// its invitation to be accepted.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub workspace_id: i64,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub credentials: Option<Credentials>,
}

impl User {
    pub fn is_registered(&self) -> bool {
        self.credentials.is_some()
    }

    /// "First Last", or `None` for a stub.
    pub fn full_name(&self) -> Option<String> {
        self.credentials
            .as_ref()
            .map(|c| format!("{} {}", c.first_name, c.last_name))
    }
}

/// A stub to insert: email is expected to be normalized already.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub role: Role,
}

/// Data that moves a stub to a registered user.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password: SecretString,
}

/// Per-workspace users with globally unique email and phone.
///
/// Implementations hash passwords themselves and translate their engine's
/// unique-constraint violations into `OnboardError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a stub. Fails with `Conflict(Email)` if the email exists in
    /// any workspace.
    async fn create(&self, workspace_id: i64, user: NewUser) -> Result<User, OnboardError>;

    /// All-or-nothing bulk insert of stubs.
    async fn create_many(
        &self,
        workspace_id: i64,
        users: Vec<NewUser>,
    ) -> Result<Vec<User>, OnboardError>;

    /// Attaches credentials to the user with `email`. `Ok(None)` when no row
    /// matched. Registering an already registered user overwrites its
    /// credentials.
    async fn register(
        &self,
        email: &str,
        registration: &Registration,
    ) -> Result<Option<User>, OnboardError>;

    /// `Ok(None)` when `(workspace_id, user_id)` matches nothing.
    async fn change_password(
        &self,
        workspace_id: i64,
        user_id: i64,
        password: &SecretString,
    ) -> Result<Option<User>, OnboardError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, OnboardError>;
}
