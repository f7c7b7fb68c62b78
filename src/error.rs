//! Error taxonomy shared by every registry, store and workflow action.
//!
//! Storage backends translate engine-specific failures into these variants at
//! their own boundary, so nothing above the registry layer ever inspects a
//! driver error.

use serde::Serialize;
use thiserror::Error;

use crate::validators::FieldViolation;

/// Which uniqueness constraint a write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictField {
    Email,
    Phone,
}

impl ConflictField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OnboardError {
    /// A workspace (or the user a token points at) does not exist.
    #[error("not found")]
    NotFound,

    /// The invitation token is missing or past its time-to-live.
    #[error("invitation has expired")]
    Expired,

    #[error("{} already in use", .0.as_str())]
    Conflict(ConflictField),

    /// The caller's role is not allowed to perform the operation.
    #[error("not allowed")]
    Unauthorized,

    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("failed to hash password")]
    PasswordHashError,

    /// Anything unclassified. The payload is for logs only and never shown
    /// to clients.
    #[error("unexpected error")]
    Unexpected(String),
}

impl OnboardError {
    pub fn unexpected(detail: impl Into<String>) -> Self {
        Self::Unexpected(detail.into())
    }

    /// HTTP status the boundary layer answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Conflict(_) => 409,
            Self::Expired => 401,
            Self::Unauthorized => 403,
            Self::NotFound => 404,
            Self::Validation(_) => 400,
            Self::PasswordHashError | Self::Unexpected(_) => 500,
        }
    }

    /// True for errors the client can act on (resubmit, request a new invite).
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
