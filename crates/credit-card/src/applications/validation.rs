/// Number of digits in a personal ID.
pub const PERSONAL_ID_LENGTH: usize = 11;

/// Reasons a personal ID is rejected, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PersonalIdError {
    #[error("Personal ID is null or empty.")]
    Empty,
    #[error("Personal ID is not 11 characters long.")]
    Length,
    #[error("Personal ID contains non-numeric characters.")]
    NonNumeric,
}

/// Checks the personal ID format and returns it without surrounding blanks.
///
/// Emptiness is tested on the raw value; length and digits on the value with
/// leading and trailing control characters and spaces removed. Other Unicode
/// whitespace is kept and fails the checks.
pub fn validate_personal_id(id: &str) -> Result<&str, PersonalIdError> {
    if id.is_empty() {
        return Err(PersonalIdError::Empty);
    }

    let trimmed = id.trim_matches(|c: char| c <= ' ');

    if trimmed.chars().count() != PERSONAL_ID_LENGTH {
        return Err(PersonalIdError::Length);
    }

    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(PersonalIdError::NonNumeric);
    }

    Ok(trimmed)
}
