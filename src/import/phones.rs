//! Phone classification heuristics
//!
//! Import cells are split like email cells, then every token is
//! classified as a plausible mobile number, a landline, or garbage.
//! Only mobiles may become a vendor's primary phone; landlines and
//! invalid tokens are excluded and reported for logging.

/// Known landline STD prefixes (leading trunk zero included).
/// Tokens whose digits start with one of these are filtered out of the
/// primary phone field.
const LANDLINE_PREFIXES: &[&str] = &[
    "011", // Delhi
    "020", // Pune
    "022", // Mumbai
    "033", // Kolkata
    "040", // Hyderabad
    "044", // Chennai
    "079", // Ahmedabad
    "080", // Bengaluru
    "0120", "0124", "0129", "0484", "0512", "0522",
];

/// Classification of one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneClass {
    /// Normalized mobile number (national 10 digits, or `+` international)
    Mobile(String),
    /// Landline as cleaned digits
    Landline(String),
    Invalid,
}

/// Result of scanning one spreadsheet cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneExtraction {
    /// First mobile found, normalized
    pub primary: Option<String>,
    /// Landline tokens, excluded from the primary field
    pub landlines: Vec<String>,
    /// Tokens that are neither mobile nor landline
    pub invalid: Vec<String>,
}

fn digits_of(token: &str) -> String {
    token.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn distinct_digit_count(digits: &str) -> usize {
    let mut seen = [false; 10];
    for c in digits.bytes() {
        seen[(c - b'0') as usize] = true;
    }
    seen.iter().filter(|s| **s).count()
}

fn is_national_mobile(digits: &str) -> bool {
    digits.len() == 10 && digits.starts_with(['6', '7', '8', '9'])
}

/// Classify one token.
///
/// Mobile shapes:
/// - 10 digits starting 6-9
/// - 11 digits with a leading trunk `0` whose remainder is a mobile
///   (normalized by stripping the zero)
/// - `+` international, 10-15 digits with at least 2 distinct digits
pub fn classify_phone(token: &str) -> PhoneClass {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return PhoneClass::Invalid;
    }

    if let Some(rest) = trimmed.strip_prefix('+') {
        let digits = digits_of(rest);
        // Reject tokens like "+91-abc" that lost most of their content
        if digits.len() >= 10 && digits.len() <= 15 && distinct_digit_count(&digits) >= 2 {
            return PhoneClass::Mobile(format!("+{digits}"));
        }
        return PhoneClass::Invalid;
    }

    let digits = digits_of(trimmed);

    if is_national_mobile(&digits) {
        return PhoneClass::Mobile(digits);
    }
    if digits.len() == 11
        && let Some(rest) = digits.strip_prefix('0')
        && is_national_mobile(rest)
    {
        return PhoneClass::Mobile(rest.to_string());
    }

    if (10..=11).contains(&digits.len())
        && LANDLINE_PREFIXES.iter().any(|p| digits.starts_with(p))
    {
        return PhoneClass::Landline(digits);
    }

    PhoneClass::Invalid
}

/// Split a cell on common separators and classify every token.
///
/// Note: separators here exclude whitespace so that "022 12345678"
/// style landlines survive as one token; dashes and spaces inside a
/// token are stripped during digit cleaning.
pub fn extract_phones(cell: &str) -> PhoneExtraction {
    let mut extraction = PhoneExtraction::default();

    for token in cell
        .split(|c: char| c == ',' || c == ';' || c == '|' || c == '/')
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        match classify_phone(token) {
            PhoneClass::Mobile(normalized) => {
                if extraction.primary.is_none() {
                    extraction.primary = Some(normalized);
                }
            }
            PhoneClass::Landline(digits) => extraction.landlines.push(digits),
            PhoneClass::Invalid => extraction.invalid.push(token.to_string()),
        }
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_mobile() {
        assert_eq!(
            classify_phone("9876543210"),
            PhoneClass::Mobile("9876543210".to_string())
        );
    }

    #[test]
    fn test_trunk_zero_mobile_normalized() {
        assert_eq!(
            classify_phone("09876543210"),
            PhoneClass::Mobile("9876543210".to_string())
        );
    }

    #[test]
    fn test_landline_detected() {
        assert_eq!(
            classify_phone("022-12345678"),
            PhoneClass::Landline("02212345678".to_string())
        );
    }

    #[test]
    fn test_short_token_invalid() {
        assert_eq!(classify_phone("123"), PhoneClass::Invalid);
    }

    #[test]
    fn test_international_mobile() {
        assert_eq!(
            classify_phone("+1 415 555 0123"),
            PhoneClass::Mobile("+14155550123".to_string())
        );
    }

    #[test]
    fn test_international_repeated_digit_invalid() {
        // fewer than 2 distinct digits is a keyboard-mash, not a number
        assert_eq!(classify_phone("+1111111111"), PhoneClass::Invalid);
    }

    #[test]
    fn test_five_starting_ten_digits_invalid() {
        assert_eq!(classify_phone("5876543210"), PhoneClass::Invalid);
    }

    #[test]
    fn test_extraction_first_mobile_wins() {
        let result = extract_phones("022-12345678, 9876543210, 8765432109");
        assert_eq!(result.primary.as_deref(), Some("9876543210"));
        assert_eq!(result.landlines, vec!["02212345678"]);
        assert!(result.invalid.is_empty());
    }

    #[test]
    fn test_extraction_logs_garbage() {
        let result = extract_phones("123; hello");
        assert_eq!(result.primary, None);
        assert_eq!(result.invalid, vec!["123", "hello"]);
    }
}
