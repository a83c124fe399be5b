//! Parsing of model responses into fact candidates
//!
//! Local models rarely honor "JSON only" exactly: responses arrive wrapped
//! in markdown fences, prefixed with commentary, or with the occasional
//! malformed element. The parser digs the array out and keeps every valid
//! item, skipping bad ones with a warning instead of failing the response.

use serde::Deserialize;
use tracing::warn;

use crate::error::ExtractError;

/// One candidate fact as reported by the model, pre-validation
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FactCandidate {
    pub section: String,
    pub field: String,
    pub value: String,
    #[serde(default)]
    pub source_text: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Parse a raw model response into validated candidates
///
/// # Errors
/// Returns an error if no JSON array can be located or the array itself is
/// malformed. Individual bad elements are skipped, not fatal.
pub(crate) fn parse_model_response(response: &str) -> Result<Vec<FactCandidate>, ExtractError> {
    let json = extract_json(response)?;
    let items: Vec<serde_json::Value> = serde_json::from_str(json)?;

    let mut candidates = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<FactCandidate>(item) {
            Ok(candidate) => match validate(candidate) {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => warn!(index, error = %e, "skipping invalid fact candidate"),
            },
            Err(e) => warn!(index, error = %e, "skipping malformed response element"),
        }
    }

    Ok(candidates)
}

fn validate(candidate: FactCandidate) -> Result<FactCandidate, ExtractError> {
    if candidate.section.trim().is_empty() {
        return Err(ExtractError::Validation("empty section".to_string()));
    }
    if candidate.field.trim().is_empty() {
        return Err(ExtractError::Validation("empty field".to_string()));
    }
    if candidate.value.trim().is_empty() {
        return Err(ExtractError::Validation("empty value".to_string()));
    }
    if let Some(confidence) = candidate.confidence {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(ExtractError::Validation(format!(
                "confidence {} out of range",
                confidence
            )));
        }
    }
    Ok(candidate)
}

/// Locate the JSON array inside a possibly-decorated response
fn extract_json(response: &str) -> Result<&str, ExtractError> {
    // Markdown code fence, with or without a language tag.
    if let Some(fence_start) = response.find("```") {
        let after_fence = &response[fence_start + 3..];
        let content = after_fence.strip_prefix("json").unwrap_or(after_fence);
        if let Some(fence_end) = content.find("```") {
            return Ok(content[..fence_end].trim());
        }
    }

    // Bare array, possibly surrounded by prose.
    let start = response.find('[');
    let end = response.rfind(']');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(response[start..=end].trim()),
        _ => Err(ExtractError::InvalidFormat(
            "no JSON array found in response".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = r#"[{"section": "fees", "field": "processing_fee", "value": "0.5%", "source_text": "Processing fee: 0.5%", "confidence": 0.8}]"#;

    #[test]
    fn test_plain_array() {
        let candidates = parse_model_response(PLAIN).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].section, "fees");
        assert_eq!(candidates[0].value, "0.5%");
        assert_eq!(candidates[0].confidence, Some(0.8));
    }

    #[test]
    fn test_fenced_response() {
        let response = format!("Here are the terms I found:\n```json\n{}\n```\nHope that helps!", PLAIN);
        let candidates = parse_model_response(&response).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_fence_without_language_tag() {
        let response = format!("```\n{}\n```", PLAIN);
        assert_eq!(parse_model_response(&response).unwrap().len(), 1);
    }

    #[test]
    fn test_prose_around_bare_array() {
        let response = format!("Sure! {} Let me know if you need more.", PLAIN);
        assert_eq!(parse_model_response(&response).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let response = r#"[{"section": "tenure", "field": "maximum_tenure", "value": "30 years"}]"#;
        let candidates = parse_model_response(response).unwrap();
        assert_eq!(candidates[0].source_text, "");
        assert_eq!(candidates[0].confidence, None);
    }

    #[test]
    fn test_bad_elements_are_skipped() {
        let response = r#"[
            {"section": "fees", "field": "processing_fee", "value": "0.5%"},
            {"section": "fees", "field": "legal_charges", "value": "   "},
            {"section": "fees", "value": "1%"},
            {"section": "fees", "field": "administrative_fee", "value": "1%", "confidence": 1.7}
        ]"#;
        let candidates = parse_model_response(response).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].field, "processing_fee");
    }

    #[test]
    fn test_empty_array_is_ok() {
        assert!(parse_model_response("[]").unwrap().is_empty());
    }

    #[test]
    fn test_no_json_is_an_error() {
        let result = parse_model_response("I could not find any loan terms.");
        assert!(matches!(result, Err(ExtractError::InvalidFormat(_))));
    }

    #[test]
    fn test_malformed_array_is_an_error() {
        let result = parse_model_response(r#"[{"section": "fees",]"#);
        assert!(matches!(result, Err(ExtractError::Json(_))));
    }
}
