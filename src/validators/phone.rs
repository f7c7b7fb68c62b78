use regex::Regex;
use std::sync::LazyLock;

use super::ValidationError;

/// Nigerian mobile numbers in local format: 0, then 7/8/9, then 0/1, then 8
/// digits.
#[allow(clippy::expect_used)]
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[789][01][0-9]{8}$").expect("valid phone regex"));

/// Surrounding whitespace is ignored.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::Required);
    }

    if !PHONE_REGEX.is_match(phone) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_phones() {
        assert!(validate_phone("08012345678").is_ok());
        assert!(validate_phone("07012345678").is_ok());
        assert!(validate_phone("09112345678").is_ok());
        assert!(validate_phone(" 08012345678\t").is_ok());
    }

    #[test]
    fn test_invalid_phones() {
        assert_eq!(validate_phone("").unwrap_err(), ValidationError::Required);
        assert_eq!(
            validate_phone("06012345678").unwrap_err(),
            ValidationError::InvalidPhone
        );
        assert_eq!(
            validate_phone("08212345678").unwrap_err(),
            ValidationError::InvalidPhone
        );
        assert_eq!(
            validate_phone("0801234567").unwrap_err(),
            ValidationError::InvalidPhone
        );
        // anchored at both ends
        assert_eq!(
            validate_phone("+2348012345678").unwrap_err(),
            ValidationError::InvalidPhone
        );
        assert_eq!(
            validate_phone("080123456789").unwrap_err(),
            ValidationError::InvalidPhone
        );
    }
}
