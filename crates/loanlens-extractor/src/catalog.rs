//! The static pattern catalog for rule-based extraction
//!
//! Declarative data, not control flow: each field owns an ordered list of
//! compiled patterns with a capture kind and a structural confidence band.
//! The extractor in [`crate::rules`] walks this table; the prompt builder
//! reads the field inventory from it so rule-based and model extraction
//! always agree on the taxonomy.

use once_cell::sync::Lazy;
use regex::Regex;

use loanlens_domain::{ConfidenceBand, FactCategory, FactKey};

/// How the matched text turns into a raw fact value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CaptureKind {
    /// Group 1 is a percentage figure
    Percent,
    /// Groups 1 and 2 are the ends of a percentage range
    PercentRange,
    /// Groups 1-3 are rate, rupee amount, and higher/lower
    CompoundFee,
    /// Group 1 is a rupee amount (digits, commas allowed)
    Amount,
    /// Group 1 is a year count
    Years,
    /// Group 1 is a month count
    Months,
    /// Group 1 is a day count
    Days,
    /// Groups 1 and 2 are an age range in years
    AgeRange,
    /// Group 1 is a reset frequency word
    Frequency,
    /// Group 1 is a benchmark acronym
    Benchmark,
    /// Group 1 is a bare score or count
    Score,
    /// Group 1 is free text, truncated for sanity
    Text,
    /// The whole match is the value
    Whole,
}

/// One pattern in a field's ordered list
pub(crate) struct FieldPattern {
    pub regex: Regex,
    pub kind: CaptureKind,
    pub band: ConfidenceBand,
}

/// All patterns for one catalog field
pub(crate) struct FieldRule {
    pub key: FactKey,
    pub category: FactCategory,
    /// Whether a gap in this field is worth a model call
    pub high_value: bool,
    pub patterns: Vec<FieldPattern>,
}

fn pat(pattern: &str, kind: CaptureKind, band: ConfidenceBand) -> FieldPattern {
    FieldPattern {
        regex: Regex::new(pattern).unwrap(),
        kind,
        band,
    }
}

fn rule(
    category: FactCategory,
    field: &str,
    high_value: bool,
    patterns: Vec<FieldPattern>,
) -> FieldRule {
    FieldRule {
        key: FactKey::from_parts(category.as_str(), field).unwrap(),
        category,
        high_value,
        patterns,
    }
}

/// The full catalog, in report order
///
/// `ltv.ltv_bands` carries no patterns here; tiered slab rows need a
/// multi-match scan that lives in [`crate::rules`].
pub(crate) static CATALOG: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    use CaptureKind::*;
    use ConfidenceBand::{High, Low, Medium};
    use FactCategory::*;

    vec![
        // === Fees & Charges ===
        rule(Fees, "processing_fee", true, vec![
            pat(
                r"(?i)processing\s+fees?\s*[:\-]?\s*(?:at\s+once\s+)?(?:up\s*to\s+|upto\s+)?(\d+(?:\.\d+)?)\s*%",
                Percent, High,
            ),
            pat(
                r"(?i)(?:up\s*to|upto)\s+(\d+(?:\.\d+)?)\s*%\s*of\s*(?:the\s*)?loan\s*amount\s*or\s*(?:₹|rs\.?|inr)\s*([\d,]+)\s*,?\s*whichever\s*is\s*(higher|lower)",
                CompoundFee, Medium,
            ),
            pat(
                r"(?i)processing\s*fee\s+(\d+(?:\.\d+)?)\s*%\s*to\s*(\d+(?:\.\d+)?)\s*%",
                PercentRange, Medium,
            ),
            pat(
                r"(?i)processing[^.\n]{0,50}?fee[^.\n]{0,50}?(\d+(?:\.\d+)?)\s*%",
                Percent, Low,
            ),
        ]),
        rule(Fees, "administrative_fee", true, vec![
            pat(
                r"(?i)administrative\s+fees?\s*[:\-]\s*(\d+(?:\.\d+)?)\s*%",
                Percent, High,
            ),
            pat(
                r"(?i)administrative\s+(?:fees?|charges?)\s*[:\-]\s*(?:₹|rs\.?|inr)\s*([\d,]+)",
                Amount, High,
            ),
            pat(
                r"(?i)admin(?:istrative)?\s*charges?[^.\n]{0,30}?(\d+(?:\.\d+)?)\s*%",
                Percent, Medium,
            ),
        ]),
        rule(Fees, "legal_charges", true, vec![
            pat(
                r"(?i)legal\s+(?:charges?|fees?)\s*[:\-]\s*(?:₹|rs\.?|inr)\s*([\d,]+)",
                Amount, High,
            ),
            pat(
                r"(?i)legal\s+(?:charges?|fees?)\s*[:\-]\s*(\d+(?:\.\d+)?)\s*%",
                Percent, High,
            ),
            pat(
                r"(?i)legal\s+charges?\s*[:\-]?\s*(as\s+per\s+(?:actuals|applicable\s+law))",
                Text, Medium,
            ),
        ]),
        rule(Fees, "late_payment_penalty", true, vec![
            pat(
                r"(?i)(?:late\s+payment|penal)\s+(?:charges?|interest)\s*[:@\-]?\s*@?\s*(\d+(?:\.\d+)?)\s*%",
                Percent, High,
            ),
            pat(
                r"(?i)default\s+interest\s+rate\s*[:\-]?\s*(\d+(?:\.\d+)?)\s*%",
                Percent, Medium,
            ),
            pat(
                r"(?i)(?:a\s+)?maximum\s+(?:of\s+)?(\d+(?:\.\d+)?)\s*%\s*p\.?a\.?\s*on\s+the\s+defaulted",
                Percent, Medium,
            ),
        ]),
        // === Interest Rates ===
        rule(InterestRates, "interest_rate", true, vec![
            pat(
                r"(?i)(?:rate\s+of\s+interest|interest\s+rate)\s*[:\-]\s*(\d+(?:\.\d+)?)\s*%",
                Percent, High,
            ),
            pat(
                r"(?i)interest\s+rate[^.\n]{0,30}?(\d+(?:\.\d+)?)\s*%\s*(?:to|–|-)\s*(\d+(?:\.\d+)?)\s*%",
                PercentRange, Medium,
            ),
            pat(
                r"(?i)(\d+(?:\.\d+)?)\s*%\s*(?:p\.a\.|per\s+annum)",
                Percent, Low,
            ),
        ]),
        rule(InterestRates, "benchmark_rate", true, vec![
            pat(
                r"(?i)benchmark\s+rate\s*[:\-]?\s*\(?([A-Z]{3,6})\)?",
                Benchmark, High,
            ),
            pat(r"\b(RPLR|IHPLR|EBLR|MCLR)\b", Benchmark, Medium),
            pat(r"(?i)\b(repo)\s+rate\b", Benchmark, Low),
        ]),
        rule(InterestRates, "benchmark_spread", true, vec![
            pat(
                r"(?i)(?:RPLR|IHPLR|EBLR|REPO|MCLR)\s*\+\s*(\d+(?:\.\d+)?)\s*%",
                Percent, High,
            ),
            pat(
                r"(?i)(?:spread|margin)\s*(?:of\s*)?[:\-]?\s*(\d+(?:\.\d+)?)\s*%",
                Percent, Medium,
            ),
        ]),
        rule(InterestRates, "reset_frequency", true, vec![
            pat(
                r"(?i)reset\s+(?:period|frequency)\s*[:\-]?\s*(monthly|quarterly|half-yearly|annually|yearly)",
                Frequency, High,
            ),
            pat(
                r"(?i)rate\s+(?:change|reset)\s*[:\-]?\s*(monthly|quarterly|annually|yearly)",
                Frequency, Medium,
            ),
            pat(
                r"(?i)resets?\s+with\s+(?:the\s+)?change\s+in\s+(?:the\s+)?benchmark[^.\n]{0,40}",
                Whole, Low,
            ),
        ]),
        // === Loan Amount & LTV ===
        rule(Ltv, "ltv_ratio", false, vec![
            pat(
                r"(?i)(?:ltv|loan[-\s]*to[-\s]*value(?:\s+ratio)?)\s*[:\-]?\s*(?:up\s+to\s+)?(\d{1,3})\s*%",
                Percent, High,
            ),
            pat(r"(?i)(\d{1,3})\s*%[^.\n]{0,20}?\bltv\b", Percent, Low),
        ]),
        // Slab rows are scanned separately; see rules::extract_ltv_bands.
        rule(Ltv, "ltv_bands", false, vec![]),
        // === Prepayment & Foreclosure ===
        rule(Prepayment, "prepayment_penalty", true, vec![
            pat(
                r"(?i)prepayment\s+(?:penalty|charges?)\s*[:\-]?\s*(\d+(?:\.\d+)?)\s*%",
                Percent, High,
            ),
            pat(
                r"(?i)prepayment\s+(?:penalty|charges?)\s*[:\-]?\s*(nil)\b",
                Text, High,
            ),
            pat(
                r"(?i)no\s+pre-?payment\s+penalty[^.\n]{0,60}?floating[^.\n]{0,30}",
                Whole, Medium,
            ),
        ]),
        rule(Prepayment, "foreclosure_charges", true, vec![
            pat(
                r"(?i)(?:foreclosure|pre-?closure)\s+charges?\s*[:\-]?\s*(\d+(?:\.\d+)?)\s*%",
                Percent, High,
            ),
            pat(
                r"(?i)(?:foreclosure|pre-?closure)\s+charges?\s*[:\-]?\s*(nil)\b",
                Text, High,
            ),
            pat(
                r"(?i)no\s+(?:pre-?closure|foreclosure)\s+(?:penalty|charges?)[^.\n]{0,60}",
                Whole, Medium,
            ),
        ]),
        rule(Prepayment, "lock_in_period", true, vec![
            pat(
                r"(?i)lock[-\s]*in\s*(?:period)?\s*[:\-]?\s*(\d{1,2})\s*months?",
                Months, High,
            ),
            pat(
                r"(?i)lock[-\s]*in\s*(?:period)?\s*[:\-]?\s*(?:first\s+)?\d{1,2}\s*emis?\b",
                Whole, Medium,
            ),
        ]),
        // === Eligibility ===
        rule(Eligibility, "credit_score", false, vec![
            pat(
                r"(?i)(?:cibil|credit)\s+score\s*[:\-]?\s*(?:of\s+)?(\d{3})",
                Score, High,
            ),
            pat(r"(?i)minimum[^.\n]{0,30}?score[^.\n]{0,10}?(\d{3})", Score, Medium),
        ]),
        rule(Eligibility, "minimum_income", false, vec![
            pat(
                r"(?i)minimum\s+(?:net\s+)?(?:monthly\s+)?income\s*[:\-]?\s*(?:₹|rs\.?|inr)\s*([\d,]+)",
                Amount, High,
            ),
            pat(
                r"(?i)income\s+(?:requirement|criteria)\s*[:\-]?\s*(?:₹|rs\.?|inr)\s*([\d,]+)",
                Amount, Medium,
            ),
        ]),
        rule(Eligibility, "age_range", false, vec![
            pat(
                r"(?i)age\s*(?:limit|range|of\s+borrower|criteria)?\s*[:\-]?\s*(\d{2})\s*(?:to|–|-)\s*(\d{2})\s*years?",
                AgeRange, High,
            ),
            pat(r"(?i)minimum\s+age\s*[:\-]?\s*(\d{2})\s*years?", Years, Medium),
        ]),
        // === Tenure ===
        rule(Tenure, "maximum_tenure", false, vec![
            pat(
                r"(?i)(?:maximum\s+tenure|tenure)\s*[:\-]\s*(?:up\s*to\s+|upto\s+)?(\d{1,2})\s*(?:years?|yrs?)",
                Years, High,
            ),
            pat(
                r"(?i)(?:up\s+to|upto|maximum|max\.?)\s+(\d{1,2})\s*(?:years?|yrs?)",
                Years, Medium,
            ),
            pat(
                r"(?i)(\d{1,2})\s*(?:years?|yrs?)\s*(?:tenure|term|repayment)",
                Years, Low,
            ),
        ]),
        rule(Tenure, "minimum_tenure", false, vec![
            pat(
                r"(?i)minimum\s+tenure\s*[:\-]?\s*(\d{1,2})\s*(?:years?|yrs?)",
                Years, High,
            ),
            pat(r"(?i)(?:minimum|min\.?)\s+(\d{1,2})\s*(?:years?|yrs?)", Years, Medium),
        ]),
        // === Documents ===
        rule(Documents, "required_documents", true, vec![
            pat(
                r"(?i)documents?\s+required\s*[:\-]\s*([^\n]{5,200})",
                Text, High,
            ),
            pat(
                r"(?i)(?:kyc|list\s+of)\s+documents?\s*[:\-]\s*([^\n]{5,200})",
                Text, Medium,
            ),
            pat(
                r"(?i)(?:required|mandatory)\s+documents?\s*[:\-]\s*([^\n]{5,200})",
                Text, Medium,
            ),
        ]),
        // === Grievance Redressal ===
        rule(Grievance, "escalation_process", true, vec![
            pat(
                r"(?i)grievance\s+(?:redressal|process|procedure)\s*[:\-]\s*([^\n]{5,200})",
                Text, High,
            ),
            pat(
                r"(?i)(?:escalation\s+(?:matrix|process)|complaint\s+procedure)\s*[:\-]\s*([^\n]{5,200})",
                Text, Medium,
            ),
        ]),
        rule(Grievance, "contact", true, vec![
            pat(
                r"(?i)(?:nodal\s+officer|customer\s+(?:care|service))\s*(?:contact)?\s*[:\-]\s*([^\n]{5,150})",
                Text, High,
            ),
            pat(
                r"(?i)\b([a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,})\b",
                Text, Low,
            ),
        ]),
        rule(Grievance, "resolution_timeline", true, vec![
            pat(
                r"(?i)(?:resolved?|resolution|response)\s*(?:time(?:line)?)?\s*(?:within|in|[:\-])\s*(\d{1,2})\s*(?:working\s+|business\s+)?days?",
                Days, High,
            ),
            pat(
                r"(?i)within\s+(\d{1,2})\s*(?:working\s+|business\s+)?days?",
                Days, Medium,
            ),
        ]),
    ]
});

/// Field names covered for a category, for prompt hints
pub(crate) fn fields_for(category: FactCategory) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|r| r.category == category)
        .map(|r| {
            let key: &'static FactKey = &r.key;
            key.field()
        })
        .collect()
}

/// Keys whose absence after a pattern pass is worth a model call
pub(crate) fn high_value_keys() -> impl Iterator<Item = &'static FactKey> {
    CATALOG.iter().filter(|r| r.high_value).map(|r| &r.key)
}
