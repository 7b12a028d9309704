//! Embedded-object isolation stage.
//!
//! Models often wrap the requested object in prose ("Here is the
//! analysis: {...} Let me know..."). This stage cuts out the widest
//! brace-delimited region and parses that.

use super::{parse_object, JsonObject, JsonStrategy};
use crate::{error::StageFailure, result::JsonStage};

/// Returns the span from the first `{` to the last `}` in `input`.
///
/// The match is greedy and deliberately not nesting-aware: with several
/// objects in the text the span covers all of them.
///
/// ```
/// use fieldsift::parser::strategies::embedded_span;
///
/// assert_eq!(embedded_span("a {b} c {d} e"), Some("{b} c {d}"));
/// assert_eq!(embedded_span("} no {"), None);
/// ```
pub fn embedded_span(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let end = input.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&input[start..=end])
}

/// Stage that parses the widest brace-delimited region of the response.
///
/// # Examples
///
/// ```
/// use fieldsift::parser::strategies::{EmbeddedObjectStrategy, JsonStrategy};
///
/// let input = r#"Sure! The data is {"safety": "Well tolerated."} hope this helps!"#;
/// let object = EmbeddedObjectStrategy.parse(input).unwrap();
/// assert!(object.contains_key("safety"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedObjectStrategy;

impl JsonStrategy for EmbeddedObjectStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "embedded_object"
    }

    #[inline]
    fn stage(&self) -> JsonStage {
        JsonStage::Embedded
    }

    fn parse(&self, input: &str) -> Result<JsonObject, StageFailure> {
        let span = embedded_span(input)
            .ok_or_else(|| StageFailure::new(self.name(), "no brace-delimited region"))?;
        parse_object(self.name(), span)
    }

    #[inline]
    fn priority(&self) -> u8 {
        2
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_span_is_greedy() {
        let input = r#"x {"a": {"b": "c"}} y"#;
        assert_eq!(embedded_span(input), Some(r#"{"a": {"b": "c"}}"#));
    }

    #[test]
    fn test_no_braces() {
        assert_eq!(embedded_span("plain prose"), None);
        assert_eq!(embedded_span("only { open"), None);
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let input = "Analysis follows.\n{\"conclusions\": \"Promising results.\"}\nEnd.";
        let object = EmbeddedObjectStrategy.parse(input).unwrap();
        assert_eq!(object["conclusions"], json!("Promising results."));
    }

    #[test]
    fn test_two_objects_fail_together() {
        let input = r#"{"a": "1"} and {"b": "2"}"#;
        assert!(EmbeddedObjectStrategy.parse(input).is_err());
    }
}
