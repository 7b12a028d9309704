//! JSON repair stage.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{embedded_span, parse_object, JsonObject, JsonStrategy};
use crate::{error::StageFailure, result::JsonStage};

/// The body of a key opened with a quote that reaches its colon unclosed.
/// Matched against the text right after the opening quote.
static UNCLOSED_KEY_BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A(?P<body>\w[\w \-/]*?)(?P<gap>\s*):")
        .expect("Invalid unclosed key regex pattern")
});

/// A key that is already closed, even if it contains a colon.
static CLOSED_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\A[^"\\]*"\s*:"#).expect("Invalid closed key regex pattern")
});

/// Fixes applied by [`JsonFixerStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFix {
    /// Inserted a closing quote before a key's colon.
    UnclosedKeys,
    /// Removed commas directly before `}` or `]`.
    TrailingCommas,
}

/// Stage that repairs the embedded object before parsing it.
///
/// Repairs, in order:
/// - Removes trailing commas: `{"a": "1",}` → `{"a": "1"}`
/// - Closes keys missing their closing quote: `{"safety: "ok"}` → `{"safety": "ok"}`
///
/// # Examples
///
/// ```
/// use fieldsift::parser::strategies::{JsonFixerStrategy, JsonStrategy};
///
/// let object = JsonFixerStrategy.parse(r#"Answer: {"safety: "Well tolerated.",}"#).unwrap();
/// assert!(object.contains_key("safety"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFixerStrategy;

impl JsonFixerStrategy {
    /// Inserts a missing closing quote before a colon.
    ///
    /// Only quotes in key position are considered: directly inside an object,
    /// after `{` or `,`, and outside any string. Array items and string
    /// values that contain `Label:` are left alone.
    fn fix_unclosed_keys(&self, input: &str) -> Option<(String, JsonFix)> {
        let mut result = String::with_capacity(input.len() + 8);
        let mut modified = false;
        let mut containers: Vec<char> = Vec::new();
        let mut last_structural: Option<char> = None;
        let mut in_string = false;
        let mut escaped = false;
        let mut pos = 0;

        while let Some(c) = input[pos..].chars().next() {
            pos += c.len_utf8();

            if in_string {
                result.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_string = false;
                    last_structural = Some('"');
                }
                continue;
            }

            match c {
                '"' => {
                    let key_position = containers.last() == Some(&'{')
                        && matches!(last_structural, Some('{') | Some(','));
                    let caps = if key_position && !CLOSED_KEY.is_match(&input[pos..]) {
                        UNCLOSED_KEY_BODY.captures(&input[pos..])
                    } else {
                        None
                    };

                    match caps {
                        Some(caps) => {
                            result.push('"');
                            result.push_str(&caps["body"]);
                            result.push('"');
                            result.push_str(&caps["gap"]);
                            result.push(':');
                            pos += caps.get(0).map_or(0, |m| m.end());
                            last_structural = Some(':');
                            modified = true;
                        }
                        None => {
                            result.push(c);
                            in_string = true;
                        }
                    }
                }
                '{' | '[' => {
                    containers.push(c);
                    last_structural = Some(c);
                    result.push(c);
                }
                '}' | ']' => {
                    containers.pop();
                    last_structural = Some(c);
                    result.push(c);
                }
                c if c.is_whitespace() => result.push(c),
                _ => {
                    last_structural = Some(c);
                    result.push(c);
                }
            }
        }

        if modified {
            Some((result, JsonFix::UnclosedKeys))
        } else {
            None
        }
    }

    /// Removes trailing commas.
    ///
    /// Converts: `{"a": 1,}` → `{"a": 1}`
    fn fix_trailing_commas(&self, input: &str) -> Option<(String, JsonFix)> {
        let mut result = String::with_capacity(input.len());
        let mut modified = false;
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            if c == ',' {
                // Look ahead past whitespace for a closing brace or bracket
                let mut lookahead = chars.clone();
                let mut is_trailing = false;

                while let Some(&next) = lookahead.peek() {
                    if next.is_whitespace() {
                        lookahead.next();
                    } else {
                        is_trailing = next == '}' || next == ']';
                        break;
                    }
                }

                if is_trailing {
                    modified = true;
                } else {
                    result.push(c);
                }
            } else {
                result.push(c);
            }
        }

        if modified {
            Some((result, JsonFix::TrailingCommas))
        } else {
            None
        }
    }

    /// Applies every repair and returns the text with the fixes made.
    pub fn repair(&self, input: &str) -> (String, Vec<JsonFix>) {
        let mut current = input.to_string();
        let mut fixes = Vec::new();

        if let Some((fixed, fix)) = self.fix_trailing_commas(&current) {
            current = fixed;
            fixes.push(fix);
        }
        if let Some((fixed, fix)) = self.fix_unclosed_keys(&current) {
            current = fixed;
            fixes.push(fix);
        }

        (current, fixes)
    }
}

impl JsonStrategy for JsonFixerStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "json_fixer"
    }

    #[inline]
    fn stage(&self) -> JsonStage {
        JsonStage::Repaired
    }

    fn parse(&self, input: &str) -> Result<JsonObject, StageFailure> {
        let span = embedded_span(input)
            .ok_or_else(|| StageFailure::new(self.name(), "no brace-delimited region"))?;

        let (repaired, fixes) = self.repair(span);
        if fixes.is_empty() {
            return Err(StageFailure::new(self.name(), "nothing to repair"));
        }

        parse_object(self.name(), &repaired)
    }

    #[inline]
    fn priority(&self) -> u8 {
        3
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_fix_trailing_commas() {
        let (fixed, fixes) = JsonFixerStrategy.repair(r#"{"a": "1", "b": ["x", "y",],}"#);
        assert_eq!(fixed, r#"{"a": "1", "b": ["x", "y"]}"#);
        assert_eq!(fixes, vec![JsonFix::TrailingCommas]);
    }

    #[test]
    fn test_fix_unclosed_key() {
        let (fixed, fixes) = JsonFixerStrategy.repair(r#"{"efficacy: "Strong response.", "safety": "ok"}"#);
        assert_eq!(fixed, r#"{"efficacy": "Strong response.", "safety": "ok"}"#);
        assert_eq!(fixes, vec![JsonFix::UnclosedKeys]);
    }

    #[test]
    fn test_unclosed_key_with_space_before_colon() {
        let (fixed, _) = JsonFixerStrategy.repair(r#"{"quality of life  : "Improved."}"#);
        assert_eq!(fixed, r#"{"quality of life"  : "Improved."}"#);
    }

    #[test]
    fn test_well_formed_keys_untouched() {
        let input = r#"{"efficacy": "Strong: 40% response."}"#;
        let (fixed, fixes) = JsonFixerStrategy.repair(input);
        assert_eq!(fixed, input);
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_parse_both_repairs() {
        let object = JsonFixerStrategy
            .parse(r#"Output: {"efficacy: "Strong response.", "safety": "Acceptable.",} done"#)
            .unwrap();
        assert_eq!(object["efficacy"], json!("Strong response."));
        assert_eq!(object["safety"], json!("Acceptable."));
    }

    #[test]
    fn test_labeled_array_items_untouched() {
        let object = JsonFixerStrategy
            .parse(r#"{"a": "x", "b": ["y", "Note: z"],}"#)
            .unwrap();
        assert_eq!(object["b"][1], json!("Note: z"));

        let (_, fixes) = JsonFixerStrategy.repair(r#"{"a": "x", "b": ["y", "Note: z"],}"#);
        assert_eq!(fixes, vec![JsonFix::TrailingCommas]);
    }

    #[test]
    fn test_labeled_string_values_untouched() {
        let input = r#"{"a": "x", "b": "Note: z", "c": "He said \"Stop: now\""}"#;
        let (fixed, fixes) = JsonFixerStrategy.repair(input);
        assert_eq!(fixed, input);
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_closed_key_with_colon_untouched() {
        let input = r#"{"Note: z": "x", "b": 1}"#;
        let (fixed, fixes) = JsonFixerStrategy.repair(input);
        assert_eq!(fixed, input);
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_unclosed_key_after_comma() {
        let object = JsonFixerStrategy
            .parse(r#"{"safety": "Acceptable.", "endpoints: ["Primary: OS", "Secondary: PFS"]}"#)
            .unwrap();
        assert_eq!(object["endpoints"], json!(["Primary: OS", "Secondary: PFS"]));
    }

    #[test]
    fn test_nothing_to_repair_fails() {
        let failure = JsonFixerStrategy.parse(r#"{"a": broken}"#).unwrap_err();
        assert_eq!(failure.reason, "nothing to repair");
    }
}
