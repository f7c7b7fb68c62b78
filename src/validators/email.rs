use regex::Regex;
use std::sync::LazyLock;

use super::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254;

#[allow(clippy::expect_used)]
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Case-folded, trimmed form used as the uniqueness key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
