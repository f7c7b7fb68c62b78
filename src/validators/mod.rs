//! Explicit per-input validation.
//!
//! Each request shape has a `validate()` that walks every field and returns
//! the full list of [`FieldViolation`]s, so a client can fix everything in one
//! round trip.

pub mod email;
pub mod name;
pub mod password;
pub mod phone;
mod requests;

pub use email::{normalize_email, validate_email};
pub use name::validate_name;
pub use password::validate_password;
pub use phone::validate_phone;
pub use requests::{InviteRequest, RegistrationRequest};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Required,
    TooLong(usize),
    InvalidEmail,
    InvalidPhone,
    PasswordTooShort(usize),
    PasswordTooLong(usize),
    /// Role is not one an inviter may hand out.
    RoleNotInvitable,
}

impl ValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::TooLong(_) => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidPhone => "invalid_phone",
            Self::PasswordTooShort(_) => "password_too_short",
            Self::PasswordTooLong(_) => "password_too_long",
            Self::RoleNotInvitable => "role_not_invitable",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "This field is required"),
            Self::TooLong(max) => write!(f, "Too long (max {max} characters)"),
            Self::InvalidEmail => write!(f, "Invalid email format"),
            Self::InvalidPhone => write!(f, "Invalid phone number"),
            Self::PasswordTooShort(min) => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::PasswordTooLong(max) => {
                write!(f, "Password is too long (max {max} characters)")
            }
            Self::RoleNotInvitable => write!(f, "Role must be one of: member, admin"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// One failed rule on one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub error: ValidationError,
}

impl FieldViolation {
    pub fn new(field: &'static str, error: ValidationError) -> Self {
        Self { field, error }
    }
}

impl Serialize for FieldViolation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("FieldViolation", 3)?;
        state.serialize_field("field", self.field)?;
        state.serialize_field("code", self.error.code())?;
        state.serialize_field("message", &self.error.to_string())?;
        state.end()
    }
}

/// Runs `check` and records a violation against `field` on failure.
pub(crate) fn collect(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    check: Result<(), ValidationError>,
) {
    if let Err(error) = check {
        violations.push(FieldViolation::new(field, error));
    }
}
