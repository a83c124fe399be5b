//! Duration canonicalization: everything in months, day counts in days

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format_decimal;

static YEARS_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:to|–|-)\s*(\d+(?:\.\d+)?)\s*(?:years?|yrs?)\b").unwrap()
});

static YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:years?|yrs?)\b").unwrap());

static MONTHS_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:to|–|-)\s*(\d+)\s*months?\b").unwrap());

static MONTHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*months?\b").unwrap());

/// Day counts (grievance timelines) stay in days; stretching them onto a
/// month scale would just manufacture rounding differences.
static DAYS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:working\s+|business\s+)?days?\b").unwrap());

/// Canonicalize a duration phrase
///
/// Years convert to months (`"3 to 5 years"` → `"36-60 months"`); month and
/// day forms keep their unit. Returns `None` when no duration phrasing is
/// present.
pub(crate) fn normalize_duration(raw: &str) -> Option<String> {
    if let Some(caps) = YEARS_RANGE.captures(raw) {
        let low: f64 = caps[1].parse().ok()?;
        let high: f64 = caps[2].parse().ok()?;
        return Some(format!(
            "{}-{} months",
            format_decimal(low * 12.0),
            format_decimal(high * 12.0)
        ));
    }
    if let Some(caps) = MONTHS_RANGE.captures(raw) {
        return Some(format!("{}-{} months", &caps[1], &caps[2]));
    }
    if let Some(caps) = YEARS.captures(raw) {
        let years: f64 = caps[1].parse().ok()?;
        return Some(format!("{} months", format_decimal(years * 12.0)));
    }
    if let Some(caps) = MONTHS.captures(raw) {
        return Some(format!("{} months", &caps[1]));
    }
    if let Some(caps) = DAYS.captures(raw) {
        return Some(format!("{} days", &caps[1]));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_to_months() {
        assert_eq!(normalize_duration("30 years").unwrap(), "360 months");
        assert_eq!(normalize_duration("Up to 20 yrs").unwrap(), "240 months");
        assert_eq!(normalize_duration("2.5 years").unwrap(), "30 months");
    }

    #[test]
    fn test_year_ranges() {
        assert_eq!(normalize_duration("3 to 5 years").unwrap(), "36-60 months");
        assert_eq!(normalize_duration("1-30 years").unwrap(), "12-360 months");
    }

    #[test]
    fn test_months_kept() {
        assert_eq!(normalize_duration("18 months").unwrap(), "18 months");
        assert_eq!(normalize_duration("12 to 36 months").unwrap(), "12-36 months");
    }

    #[test]
    fn test_days_kept() {
        assert_eq!(normalize_duration("30 days").unwrap(), "30 days");
        assert_eq!(normalize_duration("7 working days").unwrap(), "7 days");
    }

    #[test]
    fn test_no_duration() {
        assert!(normalize_duration("no lock-in").is_none());
        assert!(normalize_duration("as per policy").is_none());
    }

    #[test]
    fn test_canonical_forms_are_idempotent() {
        for raw in ["30 years", "3 to 5 years", "18 months", "30 days"] {
            let once = normalize_duration(raw).unwrap();
            assert_eq!(normalize_duration(&once).unwrap(), once);
        }
    }
}
