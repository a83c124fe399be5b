//! Known-bank registry and label detection

use crate::document::BankName;

/// Short tokens and display names for lenders whose MITC documents this
/// system commonly sees. Matching is case-insensitive on word boundaries;
/// order matters where one token prefixes another.
const KNOWN_BANKS: &[(&str, &str)] = &[
    ("HDFC", "HDFC Bank"),
    ("ICICI", "ICICI Bank"),
    ("SBI", "State Bank of India"),
    ("DBS", "DBS Bank"),
    ("AXIS", "Axis Bank"),
    ("KOTAK", "Kotak Mahindra Bank"),
    ("PNB", "Punjab National Bank"),
    ("IDFC", "IDFC First Bank"),
    ("CANARA", "Canara Bank"),
    ("BARODA", "Bank of Baroda"),
    ("HSBC", "HSBC"),
];
// "Yes Bank" is deliberately absent: the bare token matches ordinary prose.

/// Detects which known lender a document belongs to
///
/// Detection order in the pipeline: caller-declared label, then filename,
/// then a scan of the leading document text, then the cleaned filename stem
/// as the fallback label.
#[derive(Debug, Clone, Copy, Default)]
pub struct BankRegistry;

impl BankRegistry {
    /// Create a registry over the built-in bank table
    pub fn new() -> Self {
        Self
    }

    /// Find a known bank token in arbitrary text (filename or document body)
    pub fn detect(&self, text: &str) -> Option<BankName> {
        let haystack = text.to_uppercase();
        for (token, display) in KNOWN_BANKS {
            if contains_word(&haystack, token) {
                return Some(BankName::new(*display));
            }
        }
        None
    }

    /// Scan only the head of a document body, where letterhead and titles
    /// name the issuing bank; avoids picking up competitor mentions deep in
    /// comparison-style boilerplate
    pub fn detect_in_text(&self, text: &str) -> Option<BankName> {
        let head: String = text.chars().take(2000).collect();
        self.detect(&head)
    }

    /// Fallback label built from a filename stem
    pub fn fallback_label(&self, filename: &str) -> BankName {
        let stem = filename
            .rsplit('/')
            .next()
            .unwrap_or(filename)
            .split('.')
            .next()
            .unwrap_or(filename);
        let cleaned = stem.replace(['_', '-'], " ");
        let trimmed = cleaned.trim();
        if trimmed.is_empty() {
            BankName::new("Unknown")
        } else {
            BankName::new(trimmed)
        }
    }

    /// Resolve a label for a document: declared name wins, then filename
    /// detection, then document text, then the filename stem
    pub fn resolve(
        &self,
        declared: Option<&str>,
        filename: &str,
        text: &str,
    ) -> BankName {
        if let Some(declared) = declared {
            let trimmed = declared.trim();
            if !trimmed.is_empty() {
                return BankName::new(trimmed);
            }
        }
        self.detect(filename)
            .or_else(|| self.detect_in_text(text))
            .unwrap_or_else(|| self.fallback_label(filename))
    }
}

/// Word-boundary containment check on an already-uppercased haystack.
/// Plain `contains` would make "DBS" match inside e.g. "FEEDBACKS".
fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let before_ok = begin == 0
            || !haystack[..begin]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        let after_ok = end == haystack.len()
            || !haystack[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = end;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_in_filename() {
        let registry = BankRegistry::new();
        assert_eq!(
            registry.detect("HDFC_MITC_Home_Loan.pdf").unwrap().as_str(),
            "HDFC Bank"
        );
        assert_eq!(
            registry.detect("sbi-mitc-2024.txt").unwrap().as_str(),
            "State Bank of India"
        );
    }

    #[test]
    fn test_detect_respects_word_boundaries() {
        let registry = BankRegistry::new();
        // "DBS" inside another word must not match
        assert!(registry.detect("feedbacks_document.pdf").is_none());
        assert!(registry.detect("dbs_home_loan.pdf").is_some());
    }

    #[test]
    fn test_detect_in_text_head() {
        let registry = BankRegistry::new();
        let text = "Most Important Terms and Conditions\nICICI Bank Home Loans\n...";
        assert_eq!(
            registry.detect_in_text(text).unwrap().as_str(),
            "ICICI Bank"
        );
    }

    #[test]
    fn test_fallback_label_cleans_stem() {
        let registry = BankRegistry::new();
        assert_eq!(
            registry.fallback_label("uploads/some_regional_bank.pdf").as_str(),
            "some regional bank"
        );
    }

    #[test]
    fn test_resolve_prefers_declared() {
        let registry = BankRegistry::new();
        let bank = registry.resolve(Some("My Co-op Bank"), "hdfc.pdf", "HDFC text");
        assert_eq!(bank.as_str(), "My Co-op Bank");
    }

    #[test]
    fn test_resolve_falls_back_to_stem() {
        let registry = BankRegistry::new();
        let bank = registry.resolve(None, "small_finance.txt", "no known names here");
        assert_eq!(bank.as_str(), "small finance");
    }
}
