//! Email extraction heuristics
//!
//! Spreadsheet cells routinely carry several addresses separated by
//! commas, semicolons, pipes or plain whitespace. The first valid token
//! becomes the vendor's primary email; every valid token is retained and
//! invalid tokens are reported for logging.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex")
});

/// Result of scanning one spreadsheet cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailExtraction {
    /// First valid address, if any
    pub primary: Option<String>,
    /// Every valid address in cell order (primary included)
    pub valid: Vec<String>,
    /// Tokens that failed validation
    pub invalid: Vec<String>,
}

/// Check one token against the simple email pattern
pub fn is_valid_email(token: &str) -> bool {
    EMAIL_RE.is_match(token)
}

/// Split a cell on common separators and classify every token.
pub fn extract_emails(cell: &str) -> EmailExtraction {
    let mut extraction = EmailExtraction::default();

    for token in cell
        .split(|c: char| c == ',' || c == ';' || c == '|' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        if is_valid_email(token) {
            if extraction.primary.is_none() {
                extraction.primary = Some(token.to_string());
            }
            extraction.valid.push(token.to_string());
        } else {
            extraction.invalid.push(token.to_string());
        }
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_valid_becomes_primary() {
        let result = extract_emails("a@x.com, not-an-email, b@y.com");
        assert_eq!(result.primary.as_deref(), Some("a@x.com"));
        assert_eq!(result.valid, vec!["a@x.com", "b@y.com"]);
        assert_eq!(result.invalid, vec!["not-an-email"]);
    }

    #[test]
    fn test_all_separators() {
        let result = extract_emails("a@x.com;b@y.com|c@z.com d@w.com");
        assert_eq!(result.valid.len(), 4);
        assert!(result.invalid.is_empty());
    }

    #[test]
    fn test_empty_cell() {
        let result = extract_emails("   ");
        assert_eq!(result.primary, None);
        assert!(result.valid.is_empty());
        assert!(result.invalid.is_empty());
    }

    #[test]
    fn test_invalid_only() {
        let result = extract_emails("nobody, @nodomain, user@");
        assert_eq!(result.primary, None);
        assert_eq!(result.invalid.len(), 3);
    }

    #[test]
    fn test_validation_pattern() {
        assert!(is_valid_email("user.name+tag@sub.example.co"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user space@example.com"));
    }
}
