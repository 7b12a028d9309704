//! Runs the clinical-trial questionnaire over a few typical model answers.
//!
//! Set `RUST_LOG=fieldsift=debug` to watch the JSON stages and the section
//! matcher at work.

use fieldsift::{
    error::CollaboratorError,
    parser::FieldExtractor,
    pipeline::Summarizer,
    prompt::DocumentScope,
};
use tracing_subscriber::EnvFilter;

const ANSWERS: &[(&str, &str)] = &[
    (
        "clean JSON",
        r#"{"efficacy": "Drug X reduced symptoms by 40%.", "safety": "Well tolerated."}"#,
    ),
    (
        "fenced JSON with a trailing comma",
        "Here is the analysis:\n```json\n{\"study_design\": \"Randomized, double-blind phase 3 trial.\",}\n```",
    ),
    (
        "labeled prose",
        "Efficacy: Drug X reduced symptoms by 40% versus placebo.\n\
         Safety: Patients tolerated the regimen well with minimal side effects (Source: 3).\n\
         Conclusions: Drug X is a promising option for moderate disease.",
    ),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fieldsift=info")),
        )
        .init();

    println!("=== Clinical Summary Example ===\n");

    let extractor = FieldExtractor::clinical_trial()?;

    for (label, answer) in ANSWERS {
        let record = extractor.extract(answer);
        println!("{label} -> {}", record.path());
        for (name, value) in record.iter().filter(|(name, _)| *name != "full_summary") {
            if !record.is_sentinel(name) {
                println!("   {name}: {value}");
            }
        }
        println!("   ({} of {} fields populated)\n", record.populated_count(), record.len() - 1);
    }

    // The same extractor behind a generator, as a job runner would use it
    let generator = |_: &str, _: &DocumentScope| -> Result<String, CollaboratorError> {
        Ok(ANSWERS[2].1.to_string())
    };
    let summarizer = Summarizer::new(extractor, generator);
    let scope = DocumentScope::new("user-1", "Testing");

    println!("Prompt sent to the generator:\n{}", summarizer.prompt(&scope));

    let outcome = summarizer.summarize(&scope)?;
    println!("Stored record:\n{}", outcome.result.to_json_string()?);

    Ok(())
}
