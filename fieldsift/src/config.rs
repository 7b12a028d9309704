//! Tunable thresholds for extraction and cleaning.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Placeholder stored for fields with no recovered content.
pub const SENTINEL: &str = "No data available";

/// Default name of the field holding the verbatim model response.
pub const FULL_TEXT_FIELD: &str = "full_summary";

/// Configuration shared by the matcher, cleaner and completer.
///
/// Every field has a default, so a partial config file is valid:
///
/// ```
/// use fieldsift::config::ExtractorConfig;
///
/// let config: ExtractorConfig = serde_json::from_str(r#"{"context_window": 80}"#).unwrap();
/// assert_eq!(config.context_window, 80);
/// assert_eq!(config.min_words, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// A candidate must contain strictly more words than this.
    pub min_words: usize,
    /// Characters captured on each side of a keyword by the last-resort fallback.
    pub context_window: usize,
    /// Length of the trailing anchor used for truncation repair.
    pub repair_anchor_chars: usize,
    /// Content must be longer than this before truncation repair is attempted.
    pub repair_min_chars: usize,
    /// Value stored for fields with no content.
    pub sentinel: String,
    /// Name of the field holding the verbatim response.
    pub full_text_field: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_words: 3,
            context_window: 150,
            repair_anchor_chars: 20,
            repair_min_chars: 10,
            sentinel: SENTINEL.to_string(),
            full_text_field: FULL_TEXT_FIELD.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Creates the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum word gate.
    #[inline]
    pub fn with_min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }

    /// Sets the fallback context window.
    #[inline]
    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }

    /// Sets the truncation-repair anchor length.
    #[inline]
    pub fn with_repair_anchor_chars(mut self, chars: usize) -> Self {
        self.repair_anchor_chars = chars;
        self
    }

    /// Sets the sentinel value.
    #[inline]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Sets the name of the verbatim-response field.
    #[inline]
    pub fn with_full_text_field(mut self, field: impl Into<String>) -> Self {
        self.full_text_field = field.into();
        self
    }

    /// Checks that the configuration can produce a well-formed record.
    pub fn validate(&self) -> Result<()> {
        if self.sentinel.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "sentinel must not be blank".to_string(),
            ));
        }
        if self.full_text_field.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "full_text_field must not be blank".to_string(),
            ));
        }
        if self.repair_anchor_chars == 0 {
            return Err(ExtractError::InvalidConfig(
                "repair_anchor_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
