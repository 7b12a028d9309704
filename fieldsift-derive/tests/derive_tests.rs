//! Integration tests for the ExtractSchema derive macro.

use fieldsift::{
    parser::FieldExtractor,
    result::FromExtraction,
    schema::{FieldDef, SchemaInfo},
    ExtractorConfig,
};
use fieldsift_derive::ExtractSchema;

// ============================================================================
// Schema generation
// ============================================================================

#[derive(Debug, ExtractSchema)]
struct TrialSummary {
    #[extract(
        synonyms("efficacy", "effectiveness", "effective"),
        description = "findings related to the drug's effectiveness"
    )]
    efficacy: String,
    #[extract(synonyms("safety", "safe"))]
    safety: String,
    adverse_events: Option<String>,
}

#[test]
fn test_fields_in_declaration_order() {
    let schema = TrialSummary::schema();
    assert_eq!(schema.field_names(), vec!["efficacy", "safety", "adverse_events"]);
}

#[test]
fn test_explicit_synonyms_and_description() {
    let schema = TrialSummary::schema();
    assert_eq!(
        schema.fields()[0],
        FieldDef::new("efficacy", ["efficacy", "effectiveness", "effective"])
            .with_description("findings related to the drug's effectiveness")
    );
    assert_eq!(schema.fields()[1].synonyms, vec!["safety", "safe"]);
    assert_eq!(schema.fields()[1].description, None);
}

#[test]
fn test_default_synonym_from_name() {
    let schema = TrialSummary::schema();
    assert_eq!(schema.fields()[2].synonyms, vec!["adverse events"]);
}

// ============================================================================
// Building values from records
// ============================================================================

fn extract(raw: &str) -> TrialSummary {
    let extractor = FieldExtractor::new(TrialSummary::schema(), ExtractorConfig::default()).unwrap();
    TrialSummary::from_extraction(&extractor.extract(raw))
}

#[test]
fn test_from_json_response() {
    let summary = extract(
        r#"{"efficacy": "Response rate was 40%.", "adverse_events": "Mild nausea in 3 patients."}"#,
    );

    assert_eq!(summary.efficacy, "Response rate was 40%.");
    assert_eq!(summary.safety, "No data available");
    assert_eq!(summary.adverse_events.as_deref(), Some("Mild nausea in 3 patients."));
}

#[test]
fn test_optional_field_is_none_for_sentinel() {
    let summary = extract(r#"{"safety": "Well tolerated."}"#);

    assert_eq!(summary.safety, "Well tolerated.");
    assert_eq!(summary.adverse_events, None);
}

#[test]
fn test_synonym_key_matches() {
    let summary = extract(r#"{"overall effectiveness": "Strong response."}"#);
    assert_eq!(summary.efficacy, "Strong response.");
}

// ============================================================================
// Single field
// ============================================================================

#[derive(ExtractSchema)]
struct Conclusions {
    #[extract(synonyms("conclusion"))]
    conclusions: Option<String>,
}

#[test]
fn test_single_field_struct() {
    let schema = Conclusions::schema();
    assert_eq!(schema.len(), 1);
    assert_eq!(schema.fields()[0].name, "conclusions");
    assert_eq!(schema.fields()[0].synonyms, vec!["conclusion"]);
}
