//! The pattern table: named fields with ordered synonym keywords.
//!
//! A [`Schema`] is immutable configuration shared by every extraction run.
//! Field order is significant: it is the order of the output record and of
//! the generated questionnaire prompt. Synonym order is significant too: the
//! first synonym that locates content wins (see [`crate::parser`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    config::FULL_TEXT_FIELD,
    error::{ExtractError, Result},
};

/// One named slot in the output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, used as the record key and for exact JSON key matches.
    pub name: String,
    /// Keywords used to locate this field's content, in priority order.
    pub synonyms: Vec<String>,
    /// What the field should contain. Used when rendering the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    /// Creates a field definition.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldsift::schema::FieldDef;
    ///
    /// let field = FieldDef::new("safety", ["safety", "safe"]);
    /// assert_eq!(field.synonyms, vec!["safety", "safe"]);
    /// ```
    pub fn new<I, S>(name: impl Into<String>, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            synonyms: synonyms.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    /// Attaches a description.
    #[inline]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ordered, validated set of field definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

/// On-disk shape of a schema file.
#[derive(Debug, Deserialize)]
struct SchemaFile {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Creates a schema, checking that it can produce a well-formed record.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is empty, a name repeats, or a field has
    /// no (or a blank) synonym.
    ///
    /// A field named like the full-text field is rejected later, by
    /// [`FieldExtractor::new`](crate::parser::FieldExtractor::new), against
    /// the configured name.
    pub fn new(fields: Vec<FieldDef>) -> Result<Self> {
        Self::validate_shape(&fields)?;
        Ok(Self { fields })
    }

    /// Builds a schema the derive macro has already checked at compile time.
    #[doc(hidden)]
    pub fn from_derived(fields: Vec<FieldDef>) -> Self {
        debug_assert!(Self::validate_shape(&fields).is_ok());
        Self { fields }
    }

    fn validate_shape(fields: &[FieldDef]) -> Result<()> {
        if fields.is_empty() {
            return Err(ExtractError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for field in fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ExtractError::duplicate_field(&field.name));
            }
            if field.synonyms.is_empty() {
                return Err(ExtractError::no_synonyms(&field.name));
            }
            if field.synonyms.iter().any(|s| s.trim().is_empty()) {
                return Err(ExtractError::BlankSynonym {
                    field: field.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Rejects a field that would collide with the full-text field `reserved`.
    pub(crate) fn check_reserved(&self, reserved: &str) -> Result<()> {
        match self.fields.iter().find(|field| field.name == reserved) {
            Some(field) => Err(ExtractError::ReservedField {
                field: field.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Parses a schema from JSON of the form `{"fields": [{"name", "synonyms"}]}`.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let file: SchemaFile = serde_json::from_str(input)?;
        Self::new(file.fields)
    }

    /// Parses a schema from YAML with the same shape as [`Schema::from_json_str`].
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let file: SchemaFile = serde_yaml::from_str(input)?;
        Self::new(file.fields)
    }

    /// The clinical-trial questionnaire: eleven fields covering a study summary.
    pub fn clinical_trial() -> Self {
        let table: [(&str, &[&str], &str); 11] = [
            (
                "efficacy",
                &["efficacy", "effectiveness", "effective", "efficacious"],
                "findings related to the drug's effectiveness",
            ),
            (
                "safety",
                &["safety", "safe", "safety profile"],
                "information about the drug's safety profile",
            ),
            (
                "tolerability",
                &["tolerability", "tolerable", "tolerated"],
                "how well patients tolerated the treatment",
            ),
            (
                "dosage_administration",
                &["dosage", "administration", "dosing", "dose", "administered"],
                "dosing information and administration details",
            ),
            (
                "quality_of_life",
                &["quality of life", "qol", "patient quality"],
                "impact on patient quality of life",
            ),
            (
                "pharmacokinetics_pharmacodynamics",
                &["pharmacokinetics", "pharmacodynamics", "pk", "pd", "pk/pd"],
                "PK/PD information",
            ),
            (
                "study_design",
                &[
                    "study design",
                    "trial design",
                    "design of the study",
                    "designed",
                    "phase",
                    "open-label",
                    "single-arm",
                ],
                "details about how the study was designed",
            ),
            (
                "patient_population",
                &[
                    "patient population",
                    "participants",
                    "subjects",
                    "demographics",
                    "cohort",
                    "enroll",
                    "aged",
                ],
                "information about the study participants",
            ),
            (
                "endpoints",
                &[
                    "endpoints",
                    "primary endpoint",
                    "secondary endpoint",
                    "outcome measures",
                ],
                "description of primary and secondary endpoints",
            ),
            (
                "adverse_events",
                &[
                    "adverse events",
                    "adverse effects",
                    "side effects",
                    "aes",
                    "toxicity",
                ],
                "summary of adverse events",
            ),
            (
                "conclusions",
                &["conclusions", "conclusion", "summary", "overall"],
                "overall conclusions from the studies",
            ),
        ];

        let fields = table
            .iter()
            .map(|(name, synonyms, description)| {
                FieldDef::new(*name, synonyms.iter().copied()).with_description(*description)
            })
            .collect();

        Self { fields }
    }

    /// Returns the field definitions in declared order.
    #[inline]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Returns the number of declared fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed schema; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the field names in declared order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Types that describe their own extraction schema.
///
/// Usually derived with `#[derive(ExtractSchema)]` from `fieldsift-derive`.
pub trait SchemaInfo {
    /// Returns the schema for this type.
    ///
    /// Implementations must return a schema that passes [`Schema::new`].
    fn schema() -> Schema;
}
