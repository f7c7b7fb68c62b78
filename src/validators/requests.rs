use serde::Deserialize;

use super::{
    FieldViolation, ValidationError, collect, normalize_email, validate_email, validate_name,
    validate_password, validate_phone,
};
use crate::SecretString;
use crate::repository::{NewUser, Registration, Role};

/// One entry of a bulk invite.
#[derive(Debug, Clone, Deserialize)]
pub struct InviteRequest {
    pub email_address: String,
    pub role: String,
}

impl InviteRequest {
    pub fn new(email_address: impl Into<String>, role: Role) -> Self {
        Self {
            email_address: email_address.into(),
            role: role.as_str().to_owned(),
        }
    }

    /// Checks the entry and turns it into a stub with a case-folded email.
    ///
    /// Only `member` and `admin` may be handed out; owners are created with
    /// the workspace, never invited.
    pub fn validate(&self) -> Result<NewUser, Vec<FieldViolation>> {
        let mut violations = Vec::new();
        collect(
            &mut violations,
            "email_address",
            validate_email(&self.email_address),
        );

        let role = match self.role.trim().to_lowercase().as_str() {
            "" => {
                violations.push(FieldViolation::new("role", ValidationError::Required));
                None
            }
            raw => match raw.parse::<Role>() {
                Ok(role @ (Role::Member | Role::Admin)) => Some(role),
                _ => {
                    violations.push(FieldViolation::new(
                        "role",
                        ValidationError::RoleNotInvitable,
                    ));
                    None
                }
            },
        };

        match role {
            Some(role) if violations.is_empty() => Ok(NewUser {
                email: normalize_email(&self.email_address),
                role,
            }),
            _ => Err(violations),
        }
    }
}

/// Body of an accept call.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password: SecretString,
    /// Accepted for compatibility with older clients; the company name comes
    /// from the invitation.
    #[serde(default)]
    pub company_name: Option<String>,
}

impl RegistrationRequest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: phone_number.into(),
            password: password.into(),
            company_name: None,
        }
    }

    pub fn validate(&self) -> Result<Registration, Vec<FieldViolation>> {
        let mut violations = Vec::new();
        collect(&mut violations, "first_name", validate_name(&self.first_name));
        collect(&mut violations, "last_name", validate_name(&self.last_name));
        collect(
            &mut violations,
            "phone_number",
            validate_phone(&self.phone_number),
        );
        collect(
            &mut violations,
            "password",
            validate_password(self.password.expose_secret()),
        );

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(Registration {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            phone_number: self.phone_number.trim().to_owned(),
            password: self.password.clone(),
        })
    }
}
