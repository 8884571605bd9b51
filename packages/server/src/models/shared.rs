use crate::error::AppError;

/// Validate a trimmed display name (1-50 Unicode characters).
///
/// `what` names the field in the error message ("Student name", ...).
pub fn validate_display_name(name: &str, what: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 50 {
        return Err(AppError::Validation(format!(
            "{what} must be 1-50 characters"
        )));
    }
    Ok(())
}

/// Validate an email address: `local@domain` with a dotted domain, no
/// whitespace or control characters.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let invalid = || AppError::Validation(format!("'{email}' is not a valid email address"));

    if email.is_empty() || email.len() > 254 {
        return Err(invalid());
    }
    if email
        .chars()
        .any(|c| c.is_whitespace() || c.is_ascii_control())
    {
        return Err(invalid());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || domain.contains('@')
    {
        return Err(invalid());
    }
    Ok(())
}

/// Normalize an email for storage: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
