//! Rendering the questionnaire prompt sent to the generator.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::{config::ExtractorConfig, schema::Schema};

/// Identifies the document set a summary is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentScope {
    /// Owner of the documents.
    pub owner_id: String,
    /// Collection (folder) holding the documents.
    pub collection_id: String,
}

impl DocumentScope {
    /// Creates a scope.
    pub fn new(owner_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

/// Builds the instruction prompt asking for one JSON object per schema.
///
/// # Examples
///
/// ```
/// use fieldsift::{prompt::{DocumentScope, QuestionnairePrompt}, schema::Schema};
///
/// let schema = Schema::clinical_trial();
/// let prompt = QuestionnairePrompt::new(&schema).render(&DocumentScope::new("u-1", "Testing"));
/// assert!(prompt.contains("in the folder 'Testing'"));
/// assert!(prompt.contains("- \"efficacy\": findings related to the drug's effectiveness"));
/// ```
#[derive(Debug, Clone)]
pub struct QuestionnairePrompt<'a> {
    schema: &'a Schema,
    sentinel: String,
    subject: String,
}

impl<'a> QuestionnairePrompt<'a> {
    /// Creates a prompt for `schema` with the default sentinel.
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            sentinel: ExtractorConfig::default().sentinel,
            subject: "clinical trial documents".to_string(),
        }
    }

    /// Uses the sentinel from `config`.
    pub fn with_config(mut self, config: &ExtractorConfig) -> Self {
        self.sentinel = config.sentinel.clone();
        self
    }

    /// Sets what the documents are ("clinical trial documents" by default).
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Renders the prompt for `scope`.
    pub fn render(&self, scope: &DocumentScope) -> String {
        let mut prompt = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(
            prompt,
            "Please provide a structured analysis of all {} in the folder '{}' for user '{}'.",
            self.subject, scope.collection_id, scope.owner_id
        );
        let _ = writeln!(
            prompt,
            "Return your response as JSON with the following fields. \
             If information for a field is not available, use \"{}\" as the value:",
            self.sentinel
        );
        prompt.push('\n');

        for field in self.schema.fields() {
            match &field.description {
                Some(description) => {
                    let _ = writeln!(prompt, "- \"{}\": {}", field.name, description);
                }
                None => {
                    let _ = writeln!(prompt, "- \"{}\"", field.name);
                }
            }
        }

        prompt.push('\n');
        prompt.push_str("Format your response as a valid JSON object only, with no additional text.\n");
        prompt.push_str(
            "Do not include nested quotes within field values, \
             and ensure all content is complete without truncation.\n",
        );

        prompt
    }
}
