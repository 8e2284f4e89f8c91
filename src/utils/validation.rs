//! Input validation helpers
//!
//! Centralized text length limits and the checks CRUD handlers run
//! before touching the store. The store itself enforces nothing about
//! text length.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: vendor, campaign, template, form, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Template subjects
pub const MAX_SUBJECT_LEN: usize = 500;

/// Template bodies and WhatsApp content
pub const MAX_BODY_LEN: usize = 20_000;

/// Short identifiers: vendor code, phone, udyam number, slugs
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

fn too_long(field: &str, len: usize, max_len: usize) -> AppError {
    AppError::validation(format!("{field} is too long ({len} chars, max {max_len})"))
}

/// A required string: present after trimming and within the limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(too_long(field, value.len(), max_len));
    }
    Ok(())
}

/// An optional string: only the limit applies when it is present.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) if v.len() > max_len => Err(too_long(field, v.len(), max_len)),
        _ => Ok(()),
    }
}

/// Form slugs end up in public URLs: lowercase alphanumerics and
/// hyphens only, no leading/trailing hyphen.
pub fn validate_slug(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "slug", MAX_SHORT_TEXT_LEN)?;
    let well_formed = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-');
    if !well_formed {
        return Err(AppError::validation(
            "slug may only contain lowercase letters, digits and hyphens",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("ok", "name", 10).is_ok());
        assert!(validate_required_text("   ", "name", 10).is_err());
        assert!(validate_required_text("toolongvalue", "name", 5).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "email", 5).is_ok());
        assert!(validate_optional_text(&Some("ab".into()), "email", 5).is_ok());
        assert!(validate_optional_text(&Some("abcdef".into()), "email", 5).is_err());
    }

    #[test]
    fn test_slug_charset() {
        assert!(validate_slug("msme-survey-2025").is_ok());
        assert!(validate_slug("Has Spaces").is_err());
        assert!(validate_slug("UPPER").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
    }
}
