use serde::Serialize;

use crate::OnboardError;
use crate::validators::FieldViolation;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldViolation>,
}

impl ErrorResponse {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }
}

impl From<&OnboardError> for ErrorResponse {
    fn from(err: &OnboardError) -> Self {
        let error = match err {
            OnboardError::Expired => "Your invitation token has expired".to_owned(),
            OnboardError::Unauthorized => "You are not allowed to invite other users".to_owned(),
            other => other.to_string(),
        };
        let fields = match err {
            OnboardError::Validation(violations) => violations.clone(),
            _ => Vec::new(),
        };

        Self { error, fields }
    }
}
