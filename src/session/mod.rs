//! Session issuance at invitation accept time.
//!
//! A session is a point-in-time snapshot of a user and their workspace. It is
//! stored through a [`SessionRepository`] and handed out as an HMAC-signed
//! session key.

mod issuer;
mod memory_store;
mod repository;
mod signing;

pub use issuer::SessionIssuer;
pub use memory_store::InMemorySessionRepository;
pub use repository::SessionRepository;
pub use signing::{sign_session_id, verify_session_key};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub workspace_id: i64,
    pub user_id: i64,
    pub role: Role,
    pub company_name: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub data: SessionData,
}

/// What the accept call returns to the new user.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub session_key: String,
    #[serde(flatten)]
    pub data: SessionData,
}
