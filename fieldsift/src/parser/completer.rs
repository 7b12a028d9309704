//! Filling gaps so every record has the full field set.

use std::collections::HashMap;

use crate::{
    config::ExtractorConfig,
    result::{ExtractionPath, ExtractionResult},
    schema::Schema,
};

/// Turns a partial field map into a complete [`ExtractionResult`].
///
/// This is the only place records are built, so it alone guarantees that a
/// record holds exactly the schema fields plus the full-text field.
#[derive(Debug, Clone)]
pub struct SchemaCompleter {
    sentinel: String,
    full_text_field: String,
}

impl Default for SchemaCompleter {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl SchemaCompleter {
    /// Creates a completer from the extractor configuration.
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            sentinel: config.sentinel.clone(),
            full_text_field: config.full_text_field.clone(),
        }
    }

    /// Builds the record in schema order.
    ///
    /// Absent or blank fields get the sentinel, keys outside the schema are
    /// dropped, and the full-text field is always `raw_text` verbatim.
    pub fn complete(
        &self,
        mut partial: HashMap<String, String>,
        raw_text: &str,
        schema: &Schema,
        path: ExtractionPath,
    ) -> ExtractionResult {
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                let value = partial
                    .remove(&field.name)
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| self.sentinel.clone());
                (field.name.clone(), value)
            })
            .collect();

        ExtractionResult::new(
            fields,
            self.full_text_field.clone(),
            raw_text.to_string(),
            self.sentinel.clone(),
            path,
        )
    }
}
