//! # fieldsift
//!
//! Recovers a complete, schema-conformant field record from a free-form
//! LLM answer.
//!
//! Models asked for a JSON object answer in many shapes:
//! - A clean JSON object
//! - JSON wrapped in prose or markdown code fences
//! - JSON with trailing commas or unterminated keys
//! - Plain prose with labeled paragraphs, bullets or nothing at all
//!
//! Whatever the shape, the result always carries every schema field (with a
//! sentinel where nothing was found) plus the untouched response text.
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldsift::extract_clinical;
//!
//! let response = r#"Sure! {"efficacy": "Response rate was 40%. (Source: 2)", "safety": "Well tolerated."} Hope this helps."#;
//!
//! let record = extract_clinical(response).unwrap();
//! assert_eq!(record.get("efficacy"), Some("Response rate was 40%."));
//! assert_eq!(record.get("safety"), Some("Well tolerated."));
//! assert_eq!(record.get("conclusions"), Some("No data available"));
//! assert_eq!(record.full_text(), response);
//! ```
//!
//! ## Prose Responses
//!
//! When no JSON object can be recovered, each field is located in the prose
//! by its synonym keywords:
//!
//! ```rust
//! use fieldsift::{extract, schema::{FieldDef, Schema}};
//!
//! let schema = Schema::new(vec![
//!     FieldDef::new("dosing", ["dose", "dosing"]),
//!     FieldDef::new("outcome", ["outcome"]),
//! ])
//! .unwrap();
//!
//! let record = extract("The dose was 10 mg given twice daily.", &schema).unwrap();
//! assert_eq!(record.get("dosing"), Some("The dose was 10 mg given twice daily."));
//! assert!(record.is_sentinel("outcome"));
//! ```
//!
//! ## Reusing an Extractor
//!
//! [`extract`] compiles the keyword patterns on every call. Build a
//! [`FieldExtractor`] once to serve many responses, from any number of
//! threads.

pub mod config;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod result;
pub mod schema;

pub use config::ExtractorConfig;
use error::Result;
pub use parser::FieldExtractor;
pub use result::{ExtractionPath, ExtractionResult, FromExtraction, JsonStage};
pub use schema::{FieldDef, Schema, SchemaInfo};

#[cfg(feature = "derive")]
pub use fieldsift_derive::ExtractSchema;

/// Extracts a complete record for `schema` from an LLM response.
///
/// # Examples
///
/// ```
/// use fieldsift::{extract, Schema};
///
/// let record = extract(r#"{"safety": "No serious events."}"#, &Schema::clinical_trial()).unwrap();
/// assert_eq!(record.get("safety"), Some("No serious events."));
/// assert_eq!(record.len(), 12);
/// ```
///
/// # Errors
///
/// Returns an error only if the schema's keyword patterns cannot be
/// compiled. Extraction itself always produces a record.
pub fn extract(input: &str, schema: &Schema) -> Result<ExtractionResult> {
    let extractor = FieldExtractor::new(schema.clone(), ExtractorConfig::default())?;
    Ok(extractor.extract(input))
}

/// Extracts a record using the built-in clinical-trial questionnaire.
///
/// # Errors
///
/// See [`extract`].
pub fn extract_clinical(input: &str) -> Result<ExtractionResult> {
    extract(input, &Schema::clinical_trial())
}

/// Extracts a record shaped by a type implementing [`SchemaInfo`] and
/// builds the value from it.
///
/// # Errors
///
/// See [`extract`].
pub fn extract_into<T: SchemaInfo + FromExtraction>(input: &str) -> Result<T> {
    let record = extract(input, &T::schema())?;
    Ok(T::from_extraction(&record))
}
