//! Percentage and compound fee canonicalization

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format_decimal;

/// "X% or ₹Y, whichever is higher/lower" — common fee phrasing mixing a
/// rate with an absolute floor or cap.
static COMPOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        (\d+(?:\.\d+)?)\s*%
        (?:\s*of[\w\s]{0,40}?)?
        ,?\s*or\s*
        (?:₹|`|\b(?:rs\.?|inr))?\s*
        ([\d,]+(?:\.\d+)?)\s*
        (lakhs?|lacs?|crores?|cr)?
        ,?\s*\(?whichever\s+is\s+(higher|lower)\)?",
    )
    .unwrap()
});

/// Range with an explicit percent sign somewhere: "1% to 3%", "8.5 - 9.25%"
static PERCENT_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%?\s*(?:to|–|-)\s*(\d+(?:\.\d+)?)\s*%").unwrap());

/// Already-canonical bare range, matched exactly so re-normalization is a
/// no-op
static BARE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)-(\d+(?:\.\d+)?)$").unwrap());

static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").unwrap());

/// Already-canonical bare decimal
static BARE_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)$").unwrap());

/// Canonicalize compound "rate or amount" fee phrasing
pub(crate) fn normalize_compound(raw: &str) -> Option<String> {
    let caps = COMPOUND.captures(raw)?;
    let pct: f64 = caps[1].parse().ok()?;
    let amount: f64 = caps[2].replace(',', "").parse().ok()?;
    let multiplier = match caps.get(3).map(|m| m.as_str().to_lowercase()) {
        Some(word) if word.starts_with('c') => 10_000_000.0,
        Some(word) if word.starts_with('l') => 100_000.0,
        Some(_) => 1.0,
        None => 1.0,
    };
    let which = caps[4].to_lowercase();
    Some(format!(
        "{}% or INR {} (whichever is {})",
        format_decimal(pct),
        format_decimal(amount * multiplier),
        which
    ))
}

/// Canonicalize a percentage range to `min-max`
pub(crate) fn normalize_percent_range(raw: &str) -> Option<String> {
    let caps = PERCENT_RANGE
        .captures(raw)
        .or_else(|| BARE_RANGE.captures(raw))?;
    let low: f64 = caps[1].parse().ok()?;
    let high: f64 = caps[2].parse().ok()?;
    Some(format!("{}-{}", format_decimal(low), format_decimal(high)))
}

/// Canonicalize a single percentage to a bare decimal string
pub(crate) fn normalize_percent(raw: &str) -> Option<String> {
    let caps = PERCENT
        .captures(raw)
        .or_else(|| BARE_DECIMAL.captures(raw))?;
    let value: f64 = caps[1].parse().ok()?;
    Some(format_decimal(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_percent() {
        assert_eq!(normalize_percent("2.5%").unwrap(), "2.5");
        assert_eq!(normalize_percent("2.50%").unwrap(), "2.5");
        assert_eq!(normalize_percent("2.5 %").unwrap(), "2.5");
        assert_eq!(normalize_percent("8.50% p.a.").unwrap(), "8.5");
    }

    #[test]
    fn test_bare_decimal_is_accepted() {
        assert_eq!(normalize_percent("2.5").unwrap(), "2.5");
        assert_eq!(normalize_percent("8").unwrap(), "8");
    }

    #[test]
    fn test_plain_words_are_not_percentages() {
        assert!(normalize_percent("repo rate").is_none());
        assert!(normalize_percent("nil").is_none());
    }

    #[test]
    fn test_percent_range() {
        assert_eq!(normalize_percent_range("1% to 3%").unwrap(), "1-3");
        assert_eq!(normalize_percent_range("8.50 - 9.25%").unwrap(), "8.5-9.25");
        assert_eq!(normalize_percent_range("1-3").unwrap(), "1-3");
    }

    #[test]
    fn test_compound_fee() {
        assert_eq!(
            normalize_compound("0.5% of loan amount or ₹10,000 whichever is higher").unwrap(),
            "0.5% or INR 10000 (whichever is higher)"
        );
        assert_eq!(
            normalize_compound("1% or Rs. 5000, whichever is lower").unwrap(),
            "1% or INR 5000 (whichever is lower)"
        );
    }

    #[test]
    fn test_compound_is_idempotent() {
        let once = normalize_compound("0.5% or ₹10,000 whichever is higher").unwrap();
        assert_eq!(normalize_compound(&once).unwrap(), once);
    }

    #[test]
    fn test_range_is_idempotent() {
        let once = normalize_percent_range("8.50% to 9.25%").unwrap();
        assert_eq!(normalize_percent_range(&once).unwrap(), once);
    }
}
