/// Input validation utilities shared by the auth and profile handlers
use validator::ValidateEmail;

/// Validates email format according to RFC 5322
pub fn validate_email(email: &str) -> bool {
    email.validate_email()
}

/// Validates password strength
/// Requirements:
/// - Minimum 8 characters
/// - At least one uppercase letter
/// - At least one lowercase letter
/// - At least one number
/// - At least one special character
pub fn validate_password(password: &str) -> bool {
    if password.len() < 8 {
        return false;
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    has_upper && has_lower && has_digit && has_special
}

/// Validates username format
/// Requirements:
/// - Length between 3 and 64 characters
/// - Only alphanumeric, underscore, and hyphen allowed
/// - Must start with alphanumeric character
pub fn validate_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 64 {
        return false;
    }

    let first_char_valid = username
        .chars()
        .next()
        .map(|c| c.is_alphanumeric())
        .unwrap_or(false);

    if !first_char_valid {
        return false;
    }

    username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
