//! Error types for field extraction.
//!
//! Malformed model output is never an error: every extraction stage degrades
//! to the next one. Errors are reserved for contract violations (a schema
//! that cannot produce a well-formed record) and for collaborator failures
//! surfaced by the orchestration layer.

use std::fmt;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Boxed error returned by generation and persistence collaborators.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building or running an extractor.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The schema declares no fields.
    #[error("Schema must declare at least one field")]
    EmptySchema,

    /// Two field definitions share a name.
    #[error("Duplicate field name: {field}")]
    DuplicateField {
        /// The repeated field name.
        field: String,
    },

    /// A field definition has no synonym keywords.
    #[error("Field '{field}' has no synonym keywords")]
    NoSynonyms {
        /// Name of the offending field.
        field: String,
    },

    /// A synonym keyword is empty or whitespace only.
    #[error("Field '{field}' has a blank synonym keyword")]
    BlankSynonym {
        /// Name of the offending field.
        field: String,
    },

    /// A field uses a name reserved for the verbatim response.
    #[error("Field name '{field}' is reserved")]
    ReservedField {
        /// The reserved name.
        field: String,
    },

    /// A keyword pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// JSON error from serde_json (schema files, record serialization).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error from serde_yaml (schema files).
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The generation collaborator failed.
    #[error("Generation failed: {0}")]
    Generation(#[source] CollaboratorError),

    /// The persistence collaborator failed.
    #[error("Persistence failed: {0}")]
    Persistence(#[source] CollaboratorError),
}

impl ExtractError {
    /// Creates a duplicate field error.
    #[inline]
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        Self::DuplicateField {
            field: field.into(),
        }
    }

    /// Creates a missing synonyms error.
    #[inline]
    pub fn no_synonyms(field: impl Into<String>) -> Self {
        Self::NoSynonyms {
            field: field.into(),
        }
    }
}

/// Details of a JSON stage that did not produce an object.
///
/// Stage failures are expected outcomes; they are kept for logging and
/// inspection, never propagated.
#[derive(Debug, Clone, PartialEq)]
pub struct StageFailure {
    /// Name of the stage that failed.
    pub stage: &'static str,
    /// Why it failed.
    pub reason: String,
}

impl StageFailure {
    /// Creates a new stage failure.
    #[inline]
    pub fn new(stage: &'static str, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.reason)
    }
}
