//! Output formatting for the CLI.

use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

use loanlens_domain::DocumentFactSet;
use loanlens_report::ComparisonReport;

use crate::cli::CliFormat;
use crate::error::Result;

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format one document's extracted facts.
    pub fn format_fact_set(&self, facts: &DocumentFactSet) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_fact_set_json(facts),
            CliFormat::Table => Ok(self.format_fact_set_table(facts)),
            CliFormat::Quiet => Ok(self.format_fact_set_quiet(facts)),
        }
    }

    /// Format a comparison report.
    pub fn format_report(&self, report: &ComparisonReport) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            CliFormat::Table => Ok(self.format_report_table(report)),
            CliFormat::Quiet => Ok(report.comparison_id.clone()),
        }
    }

    fn format_fact_set_json(&self, facts: &DocumentFactSet) -> Result<String> {
        let json_facts: Vec<serde_json::Value> = facts
            .iter()
            .map(|f| {
                serde_json::json!({
                    "key": f.key.as_str(),
                    "raw_value": f.raw_value,
                    "normalized_value": f.normalized_value,
                    "confidence": f.confidence.value(),
                    "method": f.method.as_str(),
                    "source_text": f.source_text,
                    "source_reference": f.source_reference,
                    "conflict": f.conflict,
                    "secondary_value": f.secondary.as_ref().map(|s| s.value.clone()),
                })
            })
            .collect();

        let document = serde_json::json!({
            "document_id": facts.document_id.as_str(),
            "bank": facts.bank_name.as_str(),
            "facts": json_facts,
        });
        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn format_fact_set_table(&self, facts: &DocumentFactSet) -> String {
        if facts.is_empty() {
            return self.colorize("No facts extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Term", "Value", "Confidence", "Method"]);
        for fact in facts.iter() {
            builder.push_record([
                fact.key.as_str(),
                &fact.normalized_value,
                &format!("{:.2}", fact.confidence.value()),
                fact.method.as_str(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!(
            "{}\n{}",
            self.colorize(
                &format!(
                    "{} ({}): {} terms",
                    facts.bank_name,
                    facts.document_id,
                    facts.len()
                ),
                "blue",
            ),
            table
        )
    }

    fn format_fact_set_quiet(&self, facts: &DocumentFactSet) -> String {
        facts
            .iter()
            .map(|f| format!("{}\t{}", f.key, f.normalized_value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_report_table(&self, report: &ComparisonReport) -> String {
        if report.rows.is_empty() {
            return self.colorize("Nothing to compare: no facts extracted.", "yellow");
        }

        let mut builder = Builder::default();
        for record in report.to_records() {
            builder.push_record(record);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("{}\n{}", table, self.summary_line(report))
    }

    fn summary_line(&self, report: &ComparisonReport) -> String {
        let s = &report.summary;
        format!(
            "{} terms compared: {}, {}, {}, {}",
            s.total_terms,
            self.colorize(&format!("{} same", s.same), "green"),
            self.colorize(&format!("{} different", s.different), "red"),
            self.colorize(&format!("{} missing", s.missing), "yellow"),
            self.colorize(&format!("{} suspect", s.suspect), "magenta"),
        )
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    fn colorize(&self, message: &str, color: &str) -> String {
        if !self.color_enabled {
            return message.to_string();
        }
        match color {
            "green" => message.green().to_string(),
            "red" => message.red().to_string(),
            "yellow" => message.yellow().to_string(),
            "magenta" => message.magenta().to_string(),
            "blue" => message.blue().to_string(),
            _ => message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loanlens_domain::{
        BankName, Confidence, DocumentId, ExtractedFact, ExtractionMethod, FactKey,
    };

    fn sample_facts() -> DocumentFactSet {
        let mut set = DocumentFactSet::new(
            DocumentId::new("hdfc_mitc.txt").unwrap(),
            BankName::new("HDFC Bank"),
        );
        set.insert(
            ExtractedFact::new(
                FactKey::new("fees.processing_fee").unwrap(),
                "0.50%",
                "0.5",
                Confidence::new(0.9).unwrap(),
                "Processing Fee: 0.50%",
                ExtractionMethod::Pattern,
            )
            .unwrap(),
        );
        set
    }

    #[test]
    fn test_fact_set_json() {
        let formatter = Formatter::new(CliFormat::Json, false);
        let output = formatter.format_fact_set(&sample_facts()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["bank"], "HDFC Bank");
        assert_eq!(json["facts"][0]["key"], "fees.processing_fee");
        assert_eq!(json["facts"][0]["normalized_value"], "0.5");
    }

    #[test]
    fn test_fact_set_table_mentions_bank_and_terms() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let output = formatter.format_fact_set(&sample_facts()).unwrap();

        assert!(output.contains("HDFC Bank"));
        assert!(output.contains("fees.processing_fee"));
        assert!(output.contains("0.90"));
    }

    #[test]
    fn test_fact_set_quiet() {
        let formatter = Formatter::new(CliFormat::Quiet, false);
        let output = formatter.format_fact_set(&sample_facts()).unwrap();
        assert_eq!(output, "fees.processing_fee\t0.5");
    }

    #[test]
    fn test_no_color_emits_plain_text() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let message = formatter.success("done");
        assert_eq!(message, "✓ done");
        assert!(!message.contains('\x1b'));
    }
}
