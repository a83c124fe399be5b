//! Free-text cleanup and placeholder detection

use once_cell::sync::Lazy;
use regex::Regex;

/// Un-filled template junk that shows up in MITC documents where a value
/// should be. Treated as absent, not as a value.
static PLACEHOLDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^[_\-.\s]{2,}$").unwrap(),
        Regex::new(r"^\[\s*\]$").unwrap(),
        Regex::new(r"(?i)^x{2,}$").unwrap(),
        Regex::new(r"(?i)^(?:not\s+specified|not\s+mentioned|not\s+available)$").unwrap(),
        Regex::new(r"(?i)^(?:to\s+be\s+(?:filled|decided|advised)|tbd|tba)$").unwrap(),
        Regex::new(r"(?i)^as\s+applicable$").unwrap(),
        Regex::new(r"(?i)^(?:n\.?\s?a\.?|n/a)$").unwrap(),
    ]
});

/// Whether a raw value is template filler rather than a real value
pub fn is_placeholder(raw: &str) -> bool {
    let trimmed = raw.trim();
    PLACEHOLDER_PATTERNS.iter().any(|p| p.is_match(trimmed))
}

/// Trim, lowercase, and collapse all whitespace runs to single spaces
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_detected() {
        for junk in [
            "____", "__", "- -", "[ ]", "[]", "xx", "XXX", "Not specified",
            "not  mentioned", "To be filled", "TBD", "as applicable", "N.A.", "n/a",
        ] {
            assert!(is_placeholder(junk), "{:?} should be a placeholder", junk);
        }
    }

    #[test]
    fn test_real_values_are_not_placeholders() {
        for value in ["NIL", "1%", "₹10,000", "no lock-in", "PAN Card"] {
            assert!(!is_placeholder(value), "{:?} is a real value", value);
        }
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  PAN Card,\n  Aadhaar  "), "pan card, aadhaar");
        assert_eq!(clean_text("Repo\tRate"), "repo rate");
    }
}
