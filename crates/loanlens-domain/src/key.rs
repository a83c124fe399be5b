//! Fact keys and the fixed category taxonomy

use std::fmt;

/// Section aliases seen in source documents and model responses, mapped to
/// the canonical category names. First match wins; entries are exact.
const SECTION_ALIASES: &[(&str, &str)] = &[
    ("fees_and_charges", "fees"),
    ("charges", "fees"),
    ("penal_charges", "fees"),
    ("interest", "interest_rates"),
    ("interest_rate", "interest_rates"),
    ("rates", "interest_rates"),
    ("loan_amount_and_ltv", "ltv"),
    ("loan_amount", "ltv"),
    ("ltv_bands", "ltv"),
    ("prepayment_and_foreclosure", "prepayment"),
    ("foreclosure", "prepayment"),
    ("repayment", "tenure"),
    ("eligibility_criteria", "eligibility"),
    ("documents_required", "documents"),
    ("documentation", "documents"),
    ("grievance_redressal", "grievance"),
    ("customer_service", "grievance"),
];

/// Field aliases, applied after section canonicalization.
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("cibil_score", "credit_score"),
    ("processing_fees", "processing_fee"),
    ("foreclosure_charge", "foreclosure_charges"),
    ("max_tenure", "maximum_tenure"),
    ("min_tenure", "minimum_tenure"),
];

/// Identifier for one disclosed term: dotted `<section>.<field>` form
///
/// Keys are canonicalized at construction (lowercased, spaces and hyphens
/// collapsed to underscores, legacy section/field spellings mapped to the
/// canonical taxonomy) so that pattern-derived and model-derived facts for
/// the same term land on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactKey(String);

impl FactKey {
    /// Create a canonicalized key from a raw `section.field` string
    ///
    /// # Errors
    /// Returns an error if the input is not `section.field` shaped or either
    /// component is empty or contains characters outside `a-z0-9_` after
    /// cleanup.
    pub fn new(value: &str) -> Result<Self, String> {
        let cleaned = value.trim().to_lowercase().replace([' ', '-'], "_");
        let (section, field) = cleaned
            .split_once('.')
            .ok_or_else(|| format!("Fact key must be section.field, got '{}'", value))?;
        let section = canonical_section(section);
        let field = canonical_field(field);
        if section.is_empty() || field.is_empty() {
            return Err(format!("Fact key has an empty component: '{}'", value));
        }
        for part in [section.as_str(), field.as_str()] {
            if !part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            {
                return Err(format!("Fact key contains invalid characters: '{}'", value));
            }
        }
        Ok(Self(format!("{}.{}", section, field)))
    }

    /// Build a key from already-canonical parts
    ///
    /// # Errors
    /// Same validation as [`FactKey::new`].
    pub fn from_parts(section: &str, field: &str) -> Result<Self, String> {
        Self::new(&format!("{}.{}", section, field))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The section component (before the dot)
    pub fn section(&self) -> &str {
        self.0.split_once('.').map(|(s, _)| s).unwrap_or(&self.0)
    }

    /// The field component (after the dot)
    pub fn field(&self) -> &str {
        self.0.split_once('.').map(|(_, f)| f).unwrap_or("")
    }

    /// The category this key belongs to, if the section names one
    pub fn category(&self) -> Option<FactCategory> {
        FactCategory::parse(self.section())
    }
}

impl fmt::Display for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn canonical_section(section: &str) -> String {
    for (alias, canonical) in SECTION_ALIASES {
        if section == *alias {
            return (*canonical).to_string();
        }
    }
    section.to_string()
}

fn canonical_field(field: &str) -> String {
    for (alias, canonical) in FIELD_ALIASES {
        if field == *alias {
            return (*canonical).to_string();
        }
    }
    field.to_string()
}

/// The eight disclosure categories used to group extraction fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactCategory {
    /// Processing, administrative, legal and penal charges
    Fees,
    /// Effective rate, benchmark, spread, reset terms
    InterestRates,
    /// Loan-to-value ratio and amount slabs
    Ltv,
    /// Prepayment and foreclosure terms
    Prepayment,
    /// Borrower eligibility criteria
    Eligibility,
    /// Loan duration terms
    Tenure,
    /// Required documentation
    Documents,
    /// Complaint and escalation process
    Grievance,
}

impl FactCategory {
    /// All categories, in report order
    pub const ALL: [FactCategory; 8] = [
        FactCategory::Fees,
        FactCategory::InterestRates,
        FactCategory::Ltv,
        FactCategory::Prepayment,
        FactCategory::Eligibility,
        FactCategory::Tenure,
        FactCategory::Documents,
        FactCategory::Grievance,
    ];

    /// Canonical section name used in fact keys
    pub fn as_str(&self) -> &str {
        match self {
            FactCategory::Fees => "fees",
            FactCategory::InterestRates => "interest_rates",
            FactCategory::Ltv => "ltv",
            FactCategory::Prepayment => "prepayment",
            FactCategory::Eligibility => "eligibility",
            FactCategory::Tenure => "tenure",
            FactCategory::Documents => "documents",
            FactCategory::Grievance => "grievance",
        }
    }

    /// Human-readable title used in prompts and reports
    pub fn title(&self) -> &str {
        match self {
            FactCategory::Fees => "Fees & Charges",
            FactCategory::InterestRates => "Interest Rates",
            FactCategory::Ltv => "Loan Amount & LTV",
            FactCategory::Prepayment => "Prepayment & Foreclosure",
            FactCategory::Eligibility => "Eligibility",
            FactCategory::Tenure => "Tenure",
            FactCategory::Documents => "Documents",
            FactCategory::Grievance => "Grievance Redressal",
        }
    }

    /// Parse a canonical (or aliased) section name
    pub fn parse(section: &str) -> Option<Self> {
        let canonical = canonical_section(&section.trim().to_lowercase());
        FactCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == canonical)
    }
}

impl fmt::Display for FactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn canonicalization_is_idempotent(
            section in "[a-z][a-z0-9_]{0,20}",
            field in "[a-z][a-z0-9_]{0,20}",
        ) {
            let once = FactKey::from_parts(&section, &field).unwrap();
            let twice = FactKey::new(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn display_roundtrips(
            section in "[a-z][a-z0-9_]{0,20}",
            field in "[a-z][a-z0-9_]{0,20}",
        ) {
            let key = FactKey::from_parts(&section, &field).unwrap();
            let reparsed = FactKey::new(&key.to_string()).unwrap();
            prop_assert_eq!(key, reparsed);
        }
    }
}
