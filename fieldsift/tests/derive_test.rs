//! Integration tests for #[derive(ExtractSchema)] through the main crate.

#![cfg(feature = "derive")]

use fieldsift::{extract_into, pipeline::Summarizer, prompt::DocumentScope, ExtractSchema, SchemaInfo};

#[derive(Debug, PartialEq, ExtractSchema)]
struct DrugLabel {
    #[extract(synonyms("indication", "indicated"), description = "what the drug treats")]
    indication: String,
    #[extract(synonyms("dose", "dosage"), description = "recommended dosing")]
    dosing: String,
    #[extract(synonyms("warning", "caution"))]
    warnings: Option<String>,
}

#[test]
fn test_extract_into_derived_type() {
    let label: DrugLabel = extract_into(
        r#"{"indication": "Moderate plaque psoriasis in adults.", "dosing": "80 mg every two weeks."}"#,
    )
    .unwrap();

    assert_eq!(
        label,
        DrugLabel {
            indication: "Moderate plaque psoriasis in adults.".to_string(),
            dosing: "80 mg every two weeks.".to_string(),
            warnings: None,
        }
    );
}

#[test]
fn test_derived_type_from_prose() {
    let label: DrugLabel = extract_into(
        "The drug is indicated for moderate plaque psoriasis in adults. \
         Warning: serious infections have been reported during treatment.",
    )
    .unwrap();

    assert_eq!(
        label.indication,
        "The drug is indicated for moderate plaque psoriasis in adults."
    );
    assert_eq!(label.dosing, "No data available");
    assert_eq!(
        label.warnings.as_deref(),
        Some("Warning: serious infections have been reported during treatment.")
    );
}

#[test]
fn test_derived_schema_drives_prompt() {
    let extractor =
        fieldsift::FieldExtractor::new(DrugLabel::schema(), fieldsift::ExtractorConfig::default())
            .unwrap();
    let generator = |_: &str, _: &DocumentScope| -> Result<String, fieldsift::error::CollaboratorError> {
        Ok("{}".to_string())
    };
    let summarizer = Summarizer::new(extractor, generator).with_subject("drug labels");

    let prompt = summarizer.prompt(&DocumentScope::new("u", "labels"));
    assert!(prompt.contains("- \"indication\": what the drug treats"));
    assert!(prompt.contains("- \"warnings\"\n"));
}
