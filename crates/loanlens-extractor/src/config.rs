//! Configuration for the extraction pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cap on raw document text length (characters)
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 200_000;

/// Default document window sent to the model (characters)
pub const DEFAULT_PROMPT_WINDOW: usize = 8_000;

/// Default deadline for one model call (seconds)
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;

/// Confidence assigned to model facts that report none
pub const DEFAULT_MODEL_CONFIDENCE: f64 = 0.6;

/// Subtracted from the surviving fact's confidence on a merge conflict
pub const DEFAULT_CONFLICT_PENALTY: f64 = 0.2;

/// A conflicted fact never drops below this confidence
pub const CONFLICT_CONFIDENCE_FLOOR: f64 = 0.05;

/// Tunable policy for the extraction pipeline
///
/// Every policy number has a named default above; nothing is hard-coded at
/// the use site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum raw document text length (characters)
    pub max_text_length: usize,

    /// Document window sent to the model (characters)
    pub prompt_window: usize,

    /// Deadline for one model call (seconds)
    pub model_timeout_secs: u64,

    /// Confidence for model facts that report none
    pub default_model_confidence: f64,

    /// Confidence subtracted when extractors disagree on a field
    pub conflict_penalty: f64,

    /// Whether to cache model responses by (content hash, categories)
    pub cache_enabled: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            prompt_window: DEFAULT_PROMPT_WINDOW,
            model_timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
            default_model_confidence: DEFAULT_MODEL_CONFIDENCE,
            conflict_penalty: DEFAULT_CONFLICT_PENALTY,
            cache_enabled: true,
        }
    }
}

impl ExtractorConfig {
    /// Fast preset: tight timeout and a small prompt window
    pub fn fast() -> Self {
        Self {
            prompt_window: 4_000,
            model_timeout_secs: 10,
            ..Self::default()
        }
    }

    /// Thorough preset: generous timeout and window for long documents
    pub fn thorough() -> Self {
        Self {
            prompt_window: 16_000,
            model_timeout_secs: 120,
            ..Self::default()
        }
    }

    /// Get the model timeout as a Duration
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.prompt_window == 0 {
            return Err("prompt_window must be greater than 0".to_string());
        }
        if self.prompt_window > self.max_text_length {
            return Err("prompt_window cannot exceed max_text_length".to_string());
        }
        if self.model_timeout_secs == 0 {
            return Err("model_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.default_model_confidence) {
            return Err("default_model_confidence must be in [0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.conflict_penalty) {
            return Err("conflict_penalty must be in [0, 1]".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
