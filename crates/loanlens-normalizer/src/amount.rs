//! Currency amount canonicalization

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format_decimal;

/// Indian numeric shorthand multipliers, largest first so "crore" is tried
/// before "lakh" and neither is shadowed by a plain-symbol match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AmountMultiplier {
    /// ×10⁷
    Crore,
    /// ×10⁵
    Lakh,
    /// ×10³
    Thousand,
    /// base units
    Unit,
}

impl AmountMultiplier {
    pub(crate) fn value(&self) -> f64 {
        match self {
            AmountMultiplier::Crore => 10_000_000.0,
            AmountMultiplier::Lakh => 100_000.0,
            AmountMultiplier::Thousand => 1_000.0,
            AmountMultiplier::Unit => 1.0,
        }
    }
}

/// Ordered amount patterns. Multiplier words may appear with or without a
/// currency symbol; a bare number needs a symbol to count as money at all,
/// otherwise "2% of outstanding" would turn into an amount.
static AMOUNT_PATTERNS: Lazy<Vec<(Regex, AmountMultiplier)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)\b([\d,]+(?:\.\d+)?)\s*(?:crores?|cr)\b").unwrap(),
            AmountMultiplier::Crore,
        ),
        (
            Regex::new(r"(?i)\b([\d,]+(?:\.\d+)?)\s*(?:lakhs?|lacs?|l)\b").unwrap(),
            AmountMultiplier::Lakh,
        ),
        (
            Regex::new(r"(?i)\b([\d,]+(?:\.\d+)?)\s*(?:thousand|k)\b").unwrap(),
            AmountMultiplier::Thousand,
        ),
        (
            Regex::new(r"(?i)(?:₹|`|\b(?:rs\.?|inr))\s*([\d,]+(?:\.\d+)?)").unwrap(),
            AmountMultiplier::Unit,
        ),
    ]
});

/// Canonicalize a monetary amount to `INR <base units>`
///
/// Returns `None` when no amount (symbol-anchored or multiplier-worded) is
/// present, so callers can fall through to other forms.
pub(crate) fn normalize_amount(raw: &str) -> Option<String> {
    for (pattern, multiplier) in AMOUNT_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(raw) {
            let digits = caps[1].replace(',', "");
            let parsed: f64 = match digits.parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            if parsed <= 0.0 {
                continue;
            }
            let base = parsed * multiplier.value();
            return Some(format!("INR {}", format_decimal(base)));
        }
    }
    None
}
