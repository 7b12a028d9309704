//! Strict JSON parsing stage.

use super::{parse_object, JsonObject, JsonStrategy};
use crate::{error::StageFailure, result::JsonStage};

/// Stage that parses the whole response as a JSON object.
///
/// This is the fastest stage and is always tried first. It succeeds only if
/// the entire input (surrounding whitespace aside) is a well-formed object.
///
/// # Examples
///
/// ```
/// use fieldsift::parser::strategies::{DirectJsonStrategy, JsonStrategy};
///
/// let strategy = DirectJsonStrategy;
/// let object = strategy.parse(r#"{"safety": "Well tolerated."}"#).unwrap();
/// assert_eq!(object.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectJsonStrategy;

impl JsonStrategy for DirectJsonStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "direct_json"
    }

    #[inline]
    fn stage(&self) -> JsonStage {
        JsonStage::Strict
    }

    fn parse(&self, input: &str) -> Result<JsonObject, StageFailure> {
        let trimmed = input.trim();

        // Fast path: an object must open with a brace
        if !trimmed.starts_with('{') {
            return Err(StageFailure::new(self.name(), "input does not start with '{'"));
        }

        parse_object(self.name(), trimmed)
    }

    #[inline]
    fn priority(&self) -> u8 {
        1
    }
}
