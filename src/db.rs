//! Row types and error translation shared by the SQL backends.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::ConflictField;
use crate::repository::{Credentials, Invitation, Role, User, Workspace};
use crate::{OnboardError, SecretString};

pub(crate) const USER_COLUMNS: &str = "id, workspace_id, email, role, first_name, last_name, phone_number, password_hash, created_at";

pub(crate) const WORKSPACE_COLUMNS: &str = "id, company_name, contact_email, created_at";

pub(crate) const INVITATION_COLUMNS: &str =
    "workspace_id, company_name, email, issued_at, expires_at";

#[derive(FromRow)]
pub(crate) struct UserRecord {
    id: i64,
    workspace_id: i64,
    email: String,
    role: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = OnboardError;

    fn try_from(row: UserRecord) -> Result<Self, Self::Error> {
        let credentials = match (
            row.first_name,
            row.last_name,
            row.phone_number,
            row.password_hash,
        ) {
            (Some(first_name), Some(last_name), Some(phone_number), Some(password_hash)) => {
                Some(Credentials {
                    first_name,
                    last_name,
                    phone_number,
                    password_hash,
                })
            }
            _ => None,
        };

        Ok(User {
            id: row.id,
            workspace_id: row.workspace_id,
            email: row.email,
            role: row.role.parse::<Role>()?,
            created_at: row.created_at,
            credentials,
        })
    }
}

#[derive(FromRow)]
pub(crate) struct WorkspaceRecord {
    id: i64,
    company_name: String,
    contact_email: String,
    created_at: DateTime<Utc>,
}

impl From<WorkspaceRecord> for Workspace {
    fn from(row: WorkspaceRecord) -> Self {
        Workspace {
            id: row.id,
            company_name: row.company_name,
            contact_email: row.contact_email,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct InvitationRecord {
    workspace_id: i64,
    company_name: String,
    email: String,
    issued_at: DateTime<Utc>,
    pub(crate) expires_at: DateTime<Utc>,
}

impl InvitationRecord {
    /// Rows hold only the token digest; the caller supplies the plain token.
    pub(crate) fn into_invitation(self, token: &str) -> Invitation {
        Invitation {
            token: SecretString::new(token),
            workspace_id: self.workspace_id,
            company_name: self.company_name,
            email: self.email,
            issued_at: self.issued_at,
            expires_at: self.expires_at,
        }
    }
}

/// Translates a driver error into the domain taxonomy.
///
/// Unique violations on an email or phone column become `Conflict`; anything
/// else is logged and becomes an opaque `Unexpected`.
pub(crate) fn map_db_error(operation: &'static str) -> impl Fn(sqlx::Error) -> OnboardError {
    move |e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                let source = db.constraint().unwrap_or_else(|| db.message());
                if let Some(field) = conflict_field(source) {
                    log::debug!(
                        target: "onboard::store",
                        "msg=\"unique violation\", operation=\"{operation}\", field=\"{}\"",
                        field.as_str()
                    );
                    return OnboardError::Conflict(field);
                }
            }
        }

        log::error!(
            target: "onboard::store",
            "msg=\"database error\", operation=\"{operation}\", error=\"{e}\""
        );
        OnboardError::unexpected(e.to_string())
    }
}

/// Postgres reports the constraint name (`users_phone_number_key`), SQLite
/// the column list (`UNIQUE constraint failed: users.phone_number`).
fn conflict_field(source: &str) -> Option<ConflictField> {
    if source.contains("phone") {
        Some(ConflictField::Phone)
    } else if source.contains("email") {
        Some(ConflictField::Email)
    } else {
        None
    }
}
