//! Prompt construction for targeted model extraction
//!
//! The model is only ever asked about categories the pattern pass left
//! empty, with the expected field names spelled out so responses land on
//! catalog keys instead of invented ones.

use loanlens_domain::FactCategory;

use crate::catalog::fields_for;

const INSTRUCTIONS: &str = r#"You are a financial document analyst. Extract loan terms from the bank disclosure document below.

Respond with ONLY a JSON array, no prose. Each element must have this shape:
{"section": "<section>", "field": "<field>", "value": "<the exact value as stated>", "source_text": "<the sentence it came from>", "confidence": <0.0 to 1.0>}

Rules:
- Extract only terms that are explicitly stated in the document.
- Copy values verbatim; do not compute, convert, or guess.
- Omit a field entirely if the document does not state it.
- Use only the section and field names listed below."#;

const DOCUMENT_HEADER: &str = "DOCUMENT:";

/// Builds extraction prompts for a configured document window
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    window: usize,
}

impl PromptBuilder {
    /// Create a builder that sends at most `window` characters of document
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Build a targeted prompt for the given categories
    pub fn build(&self, text: &str, categories: &[FactCategory]) -> String {
        let mut prompt = String::from(INSTRUCTIONS);
        prompt.push_str("\n\nSections and fields to look for:\n");

        for category in categories {
            prompt.push_str(&format!(
                "- section \"{}\" ({}): fields {}\n",
                category.as_str(),
                category.title(),
                fields_for(*category)
                    .iter()
                    .map(|f| format!("\"{}\"", f))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        prompt.push('\n');
        prompt.push_str(DOCUMENT_HEADER);
        prompt.push('\n');
        prompt.push_str(&window(text, self.window));
        prompt
    }
}

/// Leading window of the document, cut at a character boundary
fn window(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_requested_categories_only() {
        let builder = PromptBuilder::new(8_000);
        let prompt = builder.build("some document", &[FactCategory::Fees]);

        assert!(prompt.contains("section \"fees\""));
        assert!(prompt.contains("\"processing_fee\""));
        assert!(!prompt.contains("section \"grievance\""));
    }

    #[test]
    fn test_prompt_contains_document_and_contract() {
        let builder = PromptBuilder::new(8_000);
        let prompt = builder.build("Processing fee: 1%", &[FactCategory::Fees]);

        assert!(prompt.contains("JSON array"));
        assert!(prompt.contains("DOCUMENT:"));
        assert!(prompt.ends_with("Processing fee: 1%"));
    }

    #[test]
    fn test_window_truncates_long_documents() {
        let builder = PromptBuilder::new(100);
        let text = "y".repeat(500);
        let prompt = builder.build(&text, &[FactCategory::Tenure]);

        let tail = prompt.split("DOCUMENT:\n").nth(1).unwrap();
        assert_eq!(tail.chars().count(), 100);
    }

    #[test]
    fn test_window_is_char_safe() {
        let text = "₹".repeat(200);
        let builder = PromptBuilder::new(50);
        let prompt = builder.build(&text, &[FactCategory::Fees]);
        assert!(prompt.contains(&"₹".repeat(50)));
    }
}
