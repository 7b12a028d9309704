//! End-to-end summarization: prompt, generate, extract, store.
//!
//! The generator and the store are collaborators behind traits so the
//! pipeline can be driven by any model backend and any persistence layer.

use std::fmt;

use tracing::{debug, info, warn};

use crate::{
    error::{CollaboratorError, ExtractError, Result},
    parser::FieldExtractor,
    prompt::{DocumentScope, QuestionnairePrompt},
    result::{ExtractionPath, ExtractionResult},
};

/// Produces a free-form response for a prompt over a document scope.
pub trait Generator: Send + Sync {
    /// Generates a response.
    fn generate(
        &self,
        prompt: &str,
        scope: &DocumentScope,
    ) -> std::result::Result<String, CollaboratorError>;
}

/// Persists a completed record.
pub trait SummaryStore: Send + Sync {
    /// Stores `record` for `scope`.
    fn store(
        &self,
        scope: &DocumentScope,
        record: &ExtractionResult,
    ) -> std::result::Result<(), CollaboratorError>;
}

impl<F> Generator for F
where
    F: Fn(&str, &DocumentScope) -> std::result::Result<String, CollaboratorError> + Send + Sync,
{
    fn generate(
        &self,
        prompt: &str,
        scope: &DocumentScope,
    ) -> std::result::Result<String, CollaboratorError> {
        self(prompt, scope)
    }
}

/// Outcome of one summarization run.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOutcome {
    /// The completed record.
    pub result: ExtractionResult,
    /// How the fields were found.
    pub path: ExtractionPath,
}

/// Drives one generation through extraction and into storage.
///
/// # Examples
///
/// ```
/// use fieldsift::{
///     error::CollaboratorError,
///     parser::FieldExtractor,
///     pipeline::Summarizer,
///     prompt::DocumentScope,
/// };
///
/// let generator = |_: &str, _: &DocumentScope| -> Result<String, CollaboratorError> {
///     Ok(r#"{"safety": "Well tolerated."}"#.to_string())
/// };
/// let summarizer = Summarizer::new(FieldExtractor::clinical_trial().unwrap(), generator);
/// let outcome = summarizer.summarize(&DocumentScope::new("u-1", "Testing")).unwrap();
/// assert_eq!(outcome.result.get("safety"), Some("Well tolerated."));
/// ```
pub struct Summarizer<G> {
    extractor: FieldExtractor,
    generator: G,
    store: Option<Box<dyn SummaryStore>>,
    subject: Option<String>,
}

impl<G: fmt::Debug> fmt::Debug for Summarizer<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summarizer")
            .field("extractor", &self.extractor)
            .field("generator", &self.generator)
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

impl<G: Generator> Summarizer<G> {
    /// Creates a summarizer without persistence.
    pub fn new(extractor: FieldExtractor, generator: G) -> Self {
        Self {
            extractor,
            generator,
            store: None,
            subject: None,
        }
    }

    /// Persists every completed record in `store`.
    pub fn with_store(mut self, store: impl SummaryStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Sets what the documents are, for the prompt wording.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Renders the prompt this summarizer sends for `scope`.
    pub fn prompt(&self, scope: &DocumentScope) -> String {
        let prompt =
            QuestionnairePrompt::new(self.extractor.schema()).with_config(self.extractor.config());
        match &self.subject {
            Some(subject) => prompt.with_subject(subject.clone()).render(scope),
            None => prompt.render(scope),
        }
    }

    /// Generates a response for `scope`, extracts it and stores the record.
    ///
    /// Extraction itself cannot fail; only the collaborators can.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Generation`] if the generator fails and
    /// [`ExtractError::Persistence`] if the store rejects the record. There
    /// are no retries.
    pub fn summarize(&self, scope: &DocumentScope) -> Result<SummaryOutcome> {
        let prompt = self.prompt(scope);
        debug!(
            owner = %scope.owner_id,
            collection = %scope.collection_id,
            prompt_chars = prompt.len(),
            "requesting summary"
        );

        let response = self.generator.generate(&prompt, scope).map_err(|e| {
            warn!(collection = %scope.collection_id, error = %e, "generation failed");
            ExtractError::Generation(e)
        })?;

        let result = self.extractor.extract(&response);
        let path = result.path();

        if let Some(store) = &self.store {
            store
                .store(scope, &result)
                .map_err(ExtractError::Persistence)?;
        }

        info!(
            collection = %scope.collection_id,
            path = %path,
            populated = result.populated_count(),
            "summary complete"
        );

        Ok(SummaryOutcome { result, path })
    }

    /// The extractor in use.
    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }
}
