//! Section pattern matching over free-form prose.
//!
//! Used when the response holds no usable JSON object. For every field the
//! matcher runs up to three passes, stopping at the first that yields a
//! candidate:
//!
//! 1. Every strategy in [`STRATEGIES`] for every synonym; the longest
//!    substantial candidate wins, ties going to the first one found.
//! 2. A sentence scan per synonym; the longest sentence of the first synonym
//!    with any hit wins.
//! 3. A context window around the first synonym occurrence that is
//!    substantial.
//!
//! A candidate is substantial when it has more than `min_words` words.

mod patterns;

use std::collections::HashMap;

pub use patterns::{
    context_window_pattern, instantiate, CaptureEnd, CompiledStrategy, StrategyDescriptor,
    StrategyKind, Terminator, SENTENCE_SCAN_TEMPLATE, STRATEGIES,
};
use regex::Regex;
use tracing::trace;

use super::candidate::{Candidate, CandidateSource};
use crate::{config::ExtractorConfig, error::Result, schema::Schema};

/// Patterns compiled for a single synonym.
#[derive(Debug, Clone)]
struct KeywordPatterns {
    keyword: String,
    strategies: Vec<CompiledStrategy>,
    sentence_scan: Regex,
    context_window: Regex,
}

impl KeywordPatterns {
    fn compile(keyword: &str, config: &ExtractorConfig) -> Result<Self> {
        let strategies = STRATEGIES
            .iter()
            .map(|descriptor| CompiledStrategy::compile(descriptor, keyword))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            keyword: keyword.to_string(),
            strategies,
            sentence_scan: Regex::new(&instantiate(SENTENCE_SCAN_TEMPLATE, keyword))?,
            context_window: Regex::new(&context_window_pattern(keyword, config.context_window))?,
        })
    }
}

#[derive(Debug, Clone)]
struct FieldPatterns {
    name: String,
    keywords: Vec<KeywordPatterns>,
}

/// Finds field content in prose using the compiled pattern table.
///
/// Patterns are compiled once per schema; the matcher holds no mutable state
/// and can be shared across threads.
///
/// # Examples
///
/// ```
/// use fieldsift::{config::ExtractorConfig, parser::sections::SectionMatcher, schema::Schema};
///
/// let matcher = SectionMatcher::new(&Schema::clinical_trial(), &ExtractorConfig::default()).unwrap();
/// let sections = matcher.extract_sections("Safety: no serious adverse reactions were observed.");
/// // The whole labeled sentence is longer than the text after the label
/// assert_eq!(sections["safety"], "Safety: no serious adverse reactions were observed.");
/// assert!(!sections.contains_key("efficacy"));
/// ```
#[derive(Debug, Clone)]
pub struct SectionMatcher {
    fields: Vec<FieldPatterns>,
    min_words: usize,
}

impl SectionMatcher {
    /// Compiles the patterns for every synonym of every field.
    pub fn new(schema: &Schema, config: &ExtractorConfig) -> Result<Self> {
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                let keywords = field
                    .synonyms
                    .iter()
                    .map(|keyword| KeywordPatterns::compile(keyword, config))
                    .collect::<Result<Vec<_>>>()?;
                Ok(FieldPatterns {
                    name: field.name.clone(),
                    keywords,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fields,
            min_words: config.min_words,
        })
    }

    /// Returns the best content per field. Fields with no match are absent.
    pub fn extract_sections(&self, text: &str) -> HashMap<String, String> {
        self.fields
            .iter()
            .filter_map(|field| {
                self.best_for(field, text)
                    .map(|candidate| (candidate.field, candidate.content))
            })
            .collect()
    }

    /// Returns the winning candidate for `field`, if any.
    pub fn best_candidate(&self, field: &str, text: &str) -> Option<Candidate> {
        let field = self.fields.iter().find(|f| f.name == field)?;
        self.best_for(field, text)
    }

    fn best_for(&self, field: &FieldPatterns, text: &str) -> Option<Candidate> {
        let winner = self
            .strategy_pass(field, text)
            .or_else(|| self.sentence_scan(field, text))
            .or_else(|| self.context_window(field, text));

        if let Some(candidate) = &winner {
            trace!(
                field = %field.name,
                source = ?candidate.source,
                length = candidate.length,
                "selected candidate"
            );
        }

        winner
    }

    fn strategy_pass(&self, field: &FieldPatterns, text: &str) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for keyword in &field.keywords {
            for strategy in &keyword.strategies {
                for content in strategy.captures(text) {
                    let candidate = Candidate::new(
                        &field.name,
                        content,
                        CandidateSource::Strategy(strategy.kind),
                    );
                    if candidate.is_substantial(self.min_words) && candidate.beats(best.as_ref()) {
                        best = Some(candidate);
                    }
                }
            }
        }

        best
    }

    fn sentence_scan(&self, field: &FieldPatterns, text: &str) -> Option<Candidate> {
        for keyword in &field.keywords {
            let mut best: Option<Candidate> = None;

            for caps in keyword.sentence_scan.captures_iter(text) {
                let Some(sentence) = caps.get(1) else {
                    continue;
                };
                let candidate =
                    Candidate::new(&field.name, sentence.as_str(), CandidateSource::SentenceScan);
                if candidate.is_substantial(self.min_words) && candidate.beats(best.as_ref()) {
                    best = Some(candidate);
                }
            }

            if best.is_some() {
                return best;
            }
        }

        None
    }

    fn context_window(&self, field: &FieldPatterns, text: &str) -> Option<Candidate> {
        field.keywords.iter().find_map(|keyword| {
            let window = keyword.context_window.find(text)?;
            let candidate =
                Candidate::new(&field.name, window.as_str(), CandidateSource::ContextWindow);
            if candidate.is_substantial(self.min_words) {
                Some(candidate)
            } else {
                trace!(keyword = %keyword.keyword, "context window too short");
                None
            }
        })
    }
}
