//! The extraction record and the path signal reported with it.

use std::fmt;

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::error::Result;

/// Which JSON stage produced the structured object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonStage {
    /// The whole response parsed as an object.
    Strict,
    /// The span from the first `{` to the last `}` parsed as an object.
    Embedded,
    /// The embedded span parsed after syntax repair.
    Repaired,
    /// The response parsed after removing markdown code fences.
    FenceStripped,
}

impl JsonStage {
    /// Stable name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            JsonStage::Strict => "strict",
            JsonStage::Embedded => "embedded",
            JsonStage::Repaired => "repaired",
            JsonStage::FenceStripped => "fence_stripped",
        }
    }
}

/// How the record was recovered.
///
/// Surfaced to status collaborators as an observability signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionPath {
    /// A JSON object was recovered; fields were mapped from its keys.
    Json {
        /// The stage that produced the object.
        stage: JsonStage,
    },
    /// No JSON object was usable; fields were matched in the prose.
    SectionPatterns,
}

impl ExtractionPath {
    /// Returns true if the structured-JSON path was used.
    #[inline]
    pub const fn is_structured(&self) -> bool {
        matches!(self, ExtractionPath::Json { .. })
    }
}

impl fmt::Display for ExtractionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionPath::Json { stage } => write!(f, "json:{}", stage.name()),
            ExtractionPath::SectionPatterns => f.write_str("section_patterns"),
        }
    }
}

/// A complete record: every schema field plus the verbatim response.
///
/// Built only by the schema completer, so the field set always matches the
/// schema it was extracted with. Serializes as a JSON object in schema order
/// followed by the full-text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    fields: Vec<(String, String)>,
    full_text_field: String,
    full_text: String,
    sentinel: String,
    path: ExtractionPath,
}

impl ExtractionResult {
    pub(crate) fn new(
        fields: Vec<(String, String)>,
        full_text_field: String,
        full_text: String,
        sentinel: String,
        path: ExtractionPath,
    ) -> Self {
        Self {
            fields,
            full_text_field,
            full_text,
            sentinel,
            path,
        }
    }

    /// Looks up a value by field name, including the full-text field.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name == self.full_text_field {
            return Some(&self.full_text);
        }
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// The verbatim model response.
    #[inline]
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// How the record was recovered.
    #[inline]
    pub fn path(&self) -> ExtractionPath {
        self.path
    }

    /// Returns true if `name` holds the sentinel.
    pub fn is_sentinel(&self, name: &str) -> bool {
        self.get(name) == Some(self.sentinel.as_str())
    }

    /// Number of schema fields holding recovered content.
    pub fn populated_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|(_, value)| *value != self.sentinel)
            .count()
    }

    /// Total number of entries: schema fields plus the full-text field.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len() + 1
    }

    /// Never true; the full-text field is always present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates entries in output order, ending with the full-text field.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(std::iter::once((
                self.full_text_field.as_str(),
                self.full_text.as_str(),
            )))
    }

    /// Serializes the record as a compact JSON object.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Types that can be built from a completed record.
///
/// Usually derived with `#[derive(ExtractSchema)]` from `fieldsift-derive`.
pub trait FromExtraction: Sized {
    /// Builds the value from the record. Missing fields become empty strings.
    fn from_extraction(result: &ExtractionResult) -> Self;
}
