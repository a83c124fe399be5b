//! Confidence scores and the discrete bands used by rule-based extraction

use std::fmt;

/// Score assigned to patterns anchored by an explicit label
pub const HIGH_BAND_SCORE: f64 = 0.9;
/// Score assigned to patterns matching contextual phrasing
pub const MEDIUM_BAND_SCORE: f64 = 0.7;
/// Score assigned to loose positional patterns
pub const LOW_BAND_SCORE: f64 = 0.5;

/// A confidence score, guaranteed finite and within `[0.0, 1.0]`
///
/// Validation happens once at construction; everything downstream
/// (coordinator, comparator, reports) can rely on the bounds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Confidence(f64);

impl Confidence {
    /// Create a confidence score
    ///
    /// # Errors
    /// Returns an error if the value is NaN, infinite, or outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, String> {
        if !value.is_finite() {
            return Err(format!("Confidence must be finite, got {}", value));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("Confidence must be in [0, 1], got {}", value));
        }
        Ok(Self(value))
    }

    /// Create a confidence score, clamping out-of-range finite values
    ///
    /// Used for derived scores (conflict penalties) where arithmetic may
    /// drift past the bounds. Non-finite input clamps to 0.
    pub fn clamped(value: f64) -> Self {
        if !value.is_finite() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw score
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether this score falls below a threshold
    pub fn is_below(&self, threshold: f64) -> bool {
        self.0 < threshold
    }

    /// The larger of two scores
    pub fn max(self, other: Confidence) -> Confidence {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Discrete confidence level assigned by rule-based extraction
///
/// Distinct from the continuous model-reported score: a pattern earns its
/// band structurally, from how strong its contextual anchor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceBand {
    /// Explicit labeled anchor, e.g. "Processing Fee:"
    High,
    /// Contextual phrasing near the value
    Medium,
    /// Loose positional match
    Low,
}

impl ConfidenceBand {
    /// The numeric score this band maps to
    pub fn score(&self) -> Confidence {
        let value = match self {
            ConfidenceBand::High => HIGH_BAND_SCORE,
            ConfidenceBand::Medium => MEDIUM_BAND_SCORE,
            ConfidenceBand::Low => LOW_BAND_SCORE,
        };
        Confidence::clamped(value)
    }

    /// Bucket a continuous score back into a band
    pub fn from_score(value: f64) -> Self {
        if value >= 0.8 {
            ConfidenceBand::High
        } else if value >= 0.6 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    /// Band name as a string
    pub fn as_str(&self) -> &str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_creation() {
        let c = Confidence::new(0.75).unwrap();
        assert_eq!(c.value(), 0.75);
    }

    #[test]
    fn test_confidence_rejects_out_of_range() {
        assert!(Confidence::new(-0.1).is_err());
        assert!(Confidence::new(1.1).is_err());
        assert!(Confidence::new(f64::NAN).is_err());
    }

    #[test]
    fn test_confidence_bounds_accepted() {
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(1.0).is_ok());
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Confidence::clamped(1.5).value(), 1.0);
        assert_eq!(Confidence::clamped(-0.2).value(), 0.0);
        assert_eq!(Confidence::clamped(f64::NAN).value(), 0.0);
    }

    #[test]
    fn test_is_below() {
        let c = Confidence::new(0.3).unwrap();
        assert!(c.is_below(0.4));
        assert!(!c.is_below(0.3));
    }

    #[test]
    fn test_band_scores() {
        assert_eq!(ConfidenceBand::High.score().value(), HIGH_BAND_SCORE);
        assert_eq!(ConfidenceBand::Medium.score().value(), MEDIUM_BAND_SCORE);
        assert_eq!(ConfidenceBand::Low.score().value(), LOW_BAND_SCORE);
    }

    #[test]
    fn test_band_from_score() {
        assert_eq!(ConfidenceBand::from_score(0.95), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(0.7), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(0.2), ConfidenceBand::Low);
    }

    #[test]
    fn test_display() {
        let c = Confidence::new(0.9).unwrap();
        assert_eq!(c.to_string(), "0.90");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn in_range_values_accepted(value in 0.0f64..=1.0) {
            let c = Confidence::new(value).unwrap();
            prop_assert_eq!(c.value(), value);
        }

        #[test]
        fn clamped_always_in_range(value in proptest::num::f64::ANY) {
            let c = Confidence::clamped(value);
            prop_assert!((0.0..=1.0).contains(&c.value()));
        }

        #[test]
        fn band_roundtrip_preserves_band(value in 0.0f64..=1.0) {
            let band = ConfidenceBand::from_score(value);
            prop_assert_eq!(ConfidenceBand::from_score(band.score().value()), band);
        }
    }
}
