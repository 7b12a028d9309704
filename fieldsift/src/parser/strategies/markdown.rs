//! Markdown fence stripping stage.

use regex::Regex;

use super::{parse_object, JsonObject, JsonStrategy};
use crate::{error::StageFailure, result::JsonStage};

/// Stage that removes markdown code-fence markers and parses the rest.
///
/// Every ` ```json ` and ` ``` ` marker is removed, wherever it appears, and
/// the trimmed remainder must be a JSON object.
///
/// # Examples
///
/// ```
/// use fieldsift::parser::strategies::{FenceStripStrategy, JsonStrategy};
///
/// let strategy = FenceStripStrategy::default();
/// let input = "```json\n{\"safety\": \"Well tolerated.\"}\n```";
/// let object = strategy.parse(input).unwrap();
/// assert!(object.contains_key("safety"));
/// ```
#[derive(Debug, Clone)]
pub struct FenceStripStrategy {
    /// Matches fence markers, with or without a `json` tag.
    fence_regex: Regex,
}

impl Default for FenceStripStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl FenceStripStrategy {
    /// Creates a new fence stripping stage.
    #[inline]
    pub fn new() -> Self {
        let fence_regex = Regex::new(r"```json|```").expect("Invalid fence regex pattern");
        Self { fence_regex }
    }

    /// Removes every fence marker and trims the result.
    pub fn strip_fences(&self, input: &str) -> String {
        self.fence_regex.replace_all(input, "").trim().to_string()
    }
}

impl JsonStrategy for FenceStripStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "fence_strip"
    }

    #[inline]
    fn stage(&self) -> JsonStage {
        JsonStage::FenceStripped
    }

    fn parse(&self, input: &str) -> Result<JsonObject, StageFailure> {
        let stripped = self.strip_fences(input);
        parse_object(self.name(), &stripped)
    }

    #[inline]
    fn priority(&self) -> u8 {
        4
    }
}
