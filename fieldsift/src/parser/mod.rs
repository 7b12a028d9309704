//! Extraction pipeline that coordinates the JSON stages, the section
//! matcher, the cleaner and the completer.

mod candidate;
mod cleaner;
mod completer;
pub mod sections;
pub mod strategies;

use std::collections::HashMap;

pub use candidate::{Candidate, CandidateSource};
pub use cleaner::FieldCleaner;
pub use completer::SchemaCompleter;
use sections::SectionMatcher;
use strategies::{map_fields, JsonExtractor};
use tracing::{debug, info, warn};

use crate::{
    config::ExtractorConfig,
    error::Result,
    result::{ExtractionPath, ExtractionResult},
    schema::Schema,
};

/// Recovers a complete field record from a model response.
///
/// Flow:
/// 1. Try the JSON stages (strict, embedded, repaired, fence-stripped).
///    If one yields an object, map its keys onto the schema; the section
///    matcher does not run.
/// 2. Otherwise match sections in the prose.
/// 3. Clean every recovered value against the full response text.
/// 4. Fill gaps with the sentinel and attach the verbatim response.
///
/// Building an extractor compiles every keyword pattern once; extraction
/// itself never fails and never mutates the extractor, so one instance can
/// serve many threads.
///
/// # Examples
///
/// ```
/// use fieldsift::parser::FieldExtractor;
///
/// let extractor = FieldExtractor::clinical_trial().unwrap();
/// let result = extractor.extract(r#"{"safety": "Well tolerated."}"#);
/// assert_eq!(result.get("safety"), Some("Well tolerated."));
/// assert_eq!(result.get("efficacy"), Some("No data available"));
/// assert!(result.path().is_structured());
/// ```
#[derive(Debug)]
pub struct FieldExtractor {
    schema: Schema,
    config: ExtractorConfig,
    json: JsonExtractor,
    matcher: SectionMatcher,
    cleaner: FieldCleaner,
    completer: SchemaCompleter,
}

impl FieldExtractor {
    /// Creates an extractor for `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, a schema field collides
    /// with the configured full-text field, or a keyword pattern fails to
    /// compile.
    pub fn new(schema: Schema, config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        schema.check_reserved(&config.full_text_field)?;

        let matcher = SectionMatcher::new(&schema, &config)?;
        debug!(fields = schema.len(), "compiled section patterns");

        Ok(Self {
            json: JsonExtractor::new(),
            matcher,
            cleaner: FieldCleaner::new(&config),
            completer: SchemaCompleter::new(&config),
            schema,
            config,
        })
    }

    /// Creates an extractor for the built-in clinical-trial questionnaire.
    pub fn clinical_trial() -> Result<Self> {
        Self::new(Schema::clinical_trial(), ExtractorConfig::default())
    }

    /// Extracts a complete record from `raw_text`.
    ///
    /// Identical input always yields an identical record.
    pub fn extract(&self, raw_text: &str) -> ExtractionResult {
        let (partial, path) = self.locate(raw_text);

        let cleaned: HashMap<String, String> = partial
            .into_iter()
            .map(|(field, content)| {
                let value = self.cleaner.clean(&content, raw_text);
                (field, value)
            })
            .collect();

        let result = self
            .completer
            .complete(cleaned, raw_text, &self.schema, path);

        let populated = result.populated_count();
        if populated == 0 {
            warn!(path = %path, "no field content recovered");
        } else {
            info!(path = %path, populated, total = self.schema.len(), "extracted fields");
        }

        result
    }

    /// Finds raw (uncleaned) content per field and reports how.
    fn locate(&self, raw_text: &str) -> (HashMap<String, String>, ExtractionPath) {
        match self.json.extract(raw_text) {
            Some(found) => {
                let mapped = map_fields(&self.schema, &found.object);
                (mapped, ExtractionPath::Json { stage: found.stage })
            }
            None => {
                debug!("no JSON object recovered, matching sections");
                (
                    self.matcher.extract_sections(raw_text),
                    ExtractionPath::SectionPatterns,
                )
            }
        }
    }

    /// The schema this extractor fills.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The section matcher, for inspecting candidates.
    #[inline]
    pub fn matcher(&self) -> &SectionMatcher {
        &self.matcher
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{error::ExtractError, result::JsonStage, schema::FieldDef};

    #[test]
    fn test_json_path_skips_matcher() {
        let extractor = FieldExtractor::clinical_trial().unwrap();
        let raw = r#"{"efficacy": "Response rate was 40% in the treated arm. Safety was good."}"#;
        let result = extractor.extract(raw);

        assert_eq!(result.path(), ExtractionPath::Json { stage: JsonStage::Strict });
        assert!(result.is_sentinel("safety"));
        assert_eq!(
            result.get("efficacy"),
            Some("Response rate was 40% in the treated arm. Safety was good.")
        );
    }

    #[test]
    fn test_text_path() {
        let extractor = FieldExtractor::clinical_trial().unwrap();
        let result = extractor.extract("The study design was a randomized phase 3 trial.");

        assert_eq!(result.path(), ExtractionPath::SectionPatterns);
        assert_eq!(
            result.get("study_design"),
            Some("The study design was a randomized phase 3 trial.")
        );
    }

    #[test]
    fn test_reserved_custom_full_text_field() {
        let schema = Schema::new(vec![FieldDef::new("raw", ["raw"])]).unwrap();
        let config = ExtractorConfig::new().with_full_text_field("raw");
        assert!(matches!(
            FieldExtractor::new(schema, config),
            Err(ExtractError::ReservedField { .. })
        ));
    }

    #[test]
    fn test_default_full_text_name_free_after_rename() {
        let fields = vec![FieldDef::new("full_summary", ["in summary"])];
        assert!(matches!(
            FieldExtractor::new(Schema::new(fields.clone()).unwrap(), ExtractorConfig::new()),
            Err(ExtractError::ReservedField { .. })
        ));

        let config = ExtractorConfig::new().with_full_text_field("raw_text");
        let extractor = FieldExtractor::new(Schema::new(fields).unwrap(), config).unwrap();
        let result = extractor.extract("In summary the drug worked well across every cohort studied.");
        assert!(!result.is_sentinel("full_summary"));
        assert_eq!(
            result.get("raw_text"),
            Some("In summary the drug worked well across every cohort studied.")
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExtractorConfig::new().with_sentinel("");
        assert!(FieldExtractor::new(Schema::clinical_trial(), config).is_err());
    }

    #[test]
    fn test_custom_sentinel() {
        let config = ExtractorConfig::new().with_sentinel("N/A");
        let extractor = FieldExtractor::new(Schema::clinical_trial(), config).unwrap();
        let result = extractor.extract("nothing relevant here");
        assert_eq!(result.get("efficacy"), Some("N/A"));
        assert_eq!(result.populated_count(), 0);
    }
}
