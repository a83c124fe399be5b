//! Rule-based extraction over the pattern catalog
//!
//! Deterministic and instantaneous: no model calls, no I/O. For each field
//! the catalog's patterns are tried in order and the first match wins, so a
//! labeled "Processing Fee: 0.50%" always beats a loose percentage found
//! elsewhere in the document.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use loanlens_domain::{ExtractedFact, ExtractionMethod, MISSING_VALUE};
use loanlens_normalizer::{is_placeholder, normalize};

use crate::catalog::{CaptureKind, CATALOG};

/// Characters of context kept on each side of a match
const EVIDENCE_CONTEXT: usize = 60;

/// Cap on free-text values captured from running prose
const MAX_TEXT_VALUE: usize = 150;

/// Minimum slab rows for an LTV band fact; a single row is just the plain
/// LTV ratio and is covered by its own field
const MIN_LTV_SLAB_ROWS: usize = 2;

static LTV_SLAB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(up\s*to|above|over)\s*(?:₹|rs\.?|inr)\s*([\d,.]+)\s*(lakhs?|lacs?|crores?|cr)?[^\d%\n]{0,40}?(\d{1,3})\s*%",
    )
    .unwrap()
});

/// Extracts facts by walking the static pattern catalog
#[derive(Debug, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    /// Create a pattern extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract every catalog field that matches in `text`
    ///
    /// Facts that fail to shape or normalize are skipped, never fatal.
    pub fn extract(&self, text: &str) -> Vec<ExtractedFact> {
        let mut facts = Vec::new();

        for rule in CATALOG.iter() {
            for pattern in &rule.patterns {
                let Some(caps) = pattern.regex.captures(text) else {
                    continue;
                };
                let Some(matched) = caps.get(0) else {
                    continue;
                };
                let Some(raw) = shape_value(pattern.kind, &caps) else {
                    continue;
                };
                if raw.is_empty() || is_placeholder(&raw) {
                    continue;
                }

                let normalized = normalize(&rule.key, &raw);
                if normalized == MISSING_VALUE {
                    continue;
                }

                let evidence = snippet(text, matched.start(), matched.end());
                let reference = format!("~{}-{}", matched.start(), matched.end());

                match ExtractedFact::new(
                    rule.key.clone(),
                    raw,
                    normalized,
                    pattern.band.score(),
                    evidence,
                    ExtractionMethod::Pattern,
                ) {
                    Ok(fact) => {
                        facts.push(fact.with_source_reference(reference));
                        // First match wins for this field.
                        break;
                    }
                    Err(e) => {
                        debug!(key = %rule.key, error = %e, "discarding invalid pattern fact");
                    }
                }
            }
        }

        if let Some(fact) = extract_ltv_bands(text) {
            facts.push(fact);
        }

        facts
    }
}

/// Scan for tiered LTV slab rows ("Up to ₹30 lakh ... 90%") and collapse
/// them into one ordered band value
fn extract_ltv_bands(text: &str) -> Option<ExtractedFact> {
    let key = CATALOG
        .iter()
        .map(|r| &r.key)
        .find(|k| k.field() == "ltv_bands")?
        .clone();

    let mut rows = Vec::new();
    let mut span: Option<(usize, usize)> = None;

    for caps in LTV_SLAB.captures_iter(text) {
        let matched = caps.get(0)?;
        let qualifier = match caps.get(1)?.as_str().to_lowercase().replace(' ', "") {
            ref q if q == "upto" => "up to",
            _ => "above",
        };
        let amount = caps.get(2)?.as_str().trim().to_string();
        let unit = match caps.get(3).map(|m| m.as_str().to_lowercase()) {
            Some(u) if u.starts_with("lakh") || u.starts_with("lac") => " lakh",
            Some(u) if u.starts_with("cr") => " crore",
            _ => "",
        };
        let pct = caps.get(4)?.as_str();

        rows.push(format!("{} ₹{}{}: {}%", qualifier, amount, unit, pct));
        span = Some(match span {
            Some((start, _)) => (start, matched.end()),
            None => (matched.start(), matched.end()),
        });
    }

    if rows.len() < MIN_LTV_SLAB_ROWS {
        return None;
    }

    let (start, end) = span?;
    let raw = rows.join("; ");
    let normalized = normalize(&key, &raw);
    let evidence = snippet(text, start, end);

    match ExtractedFact::new(
        key,
        raw,
        normalized,
        loanlens_domain::ConfidenceBand::Medium.score(),
        evidence,
        ExtractionMethod::Pattern,
    ) {
        Ok(fact) => Some(fact.with_source_reference(format!("~{}-{}", start, end))),
        Err(e) => {
            debug!(error = %e, "discarding invalid LTV band fact");
            None
        }
    }
}

/// Turn regex captures into a raw fact value according to the capture kind
fn shape_value(kind: CaptureKind, caps: &Captures) -> Option<String> {
    let group = |i: usize| caps.get(i).map(|m| m.as_str().trim());

    Some(match kind {
        CaptureKind::Percent => format!("{}%", group(1)?),
        CaptureKind::PercentRange => format!("{}% to {}%", group(1)?, group(2)?),
        CaptureKind::CompoundFee => format!(
            "{}% of loan amount or ₹{} whichever is {}",
            group(1)?,
            group(2)?,
            group(3)?.to_lowercase()
        ),
        CaptureKind::Amount => format!("₹{}", group(1)?),
        CaptureKind::Years => format!("{} years", group(1)?),
        CaptureKind::Months => format!("{} months", group(1)?),
        CaptureKind::Days => format!("{} days", group(1)?),
        CaptureKind::AgeRange => format!("{} to {} years", group(1)?, group(2)?),
        CaptureKind::Frequency => title_case(group(1)?),
        CaptureKind::Benchmark => group(1)?.to_uppercase(),
        CaptureKind::Score => group(1)?.to_string(),
        CaptureKind::Text => truncate(group(1)?, MAX_TEXT_VALUE),
        CaptureKind::Whole => truncate(group(0)?, MAX_TEXT_VALUE),
    })
}

/// Evidence window around a match, whitespace-collapsed
///
/// Offsets are clamped to character boundaries; rupee signs and other
/// multibyte characters make byte arithmetic unsafe here.
fn snippet(text: &str, start: usize, end: usize) -> String {
    let mut from = start.saturating_sub(EVIDENCE_CONTEXT);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + EVIDENCE_CONTEXT).min(text.len());
    while to < text.len() && !text.is_char_boundary(to) {
        to += 1;
    }
    text[from..to].split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

fn title_case(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => lower,
    }
}
