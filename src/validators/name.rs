use super::ValidationError;

const MAX_NAME_LENGTH: usize = 100;

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}
