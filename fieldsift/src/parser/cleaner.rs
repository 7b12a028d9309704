//! Normalization of extracted field content.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ExtractorConfig;

/// `"field_name": "` fragments left over from partially serialized JSON.
static JSON_KEY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[a-z_]+"\s*:\s*""#).expect("Invalid JSON key regex pattern"));

/// A closing quote, optional comma and whitespace at the very end.
static TRAILING_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"",?\s*\z"#).expect("Invalid trailing quote regex pattern"));

/// `(Source: 4)` and `(Sources: 1, 2, 3)`.
static CITATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(Sources?: \d+(?:, \d+)*\)").expect("Invalid citation regex pattern")
});

/// A literal `\n` followed by a complete `"key": "value"` pair.
static ESCAPED_KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\\n\s*"[a-z_]+"\s*:\s*"[^"]*""#).expect("Invalid escaped pair regex pattern")
});

/// A literal `\n` followed by any quoted string.
static ESCAPED_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\\n\s*"[^"]*""#).expect("Invalid escaped string regex pattern")
});

/// Ends in terminal punctuation, ignoring trailing whitespace.
static TERMINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s*\z").expect("Invalid terminal regex pattern"));

/// Any `(Source...)` parenthetical, with the whitespace before it.
static SOURCE_PAREN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\([Ss]ources?:.*?\)").expect("Invalid source parenthetical regex pattern")
});

/// An uppercase letter opening a new sentence.
static SENTENCE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+([A-Z])").expect("Invalid sentence start regex pattern"));

/// Cleans raw field content into presentable text.
///
/// Steps run unconditionally and in order; a step with nothing to do is a
/// no-op:
/// 1. Strip `"field": "` fragments
/// 2. Strip a trailing quote/comma tail
/// 3. Remove `(Source: N)` citation markers
/// 4. Remove escaped-newline JSON fragments
/// 5. Unescape `\"`
/// 6. Repair truncation from the full response text
/// 7. Remove residual `(Source...)` parentheticals
/// 8. Drop a dangling lowercase fragment at the start
/// 9. Trim
///
/// The full response text is passed in on every call; the cleaner keeps no
/// state between calls.
///
/// # Examples
///
/// ```
/// use fieldsift::parser::FieldCleaner;
///
/// let cleaner = FieldCleaner::default();
/// let cleaned = cleaner.clean(r#"Well tolerated (Source: 2)","#, "");
/// assert_eq!(cleaned, "Well tolerated");
/// ```
#[derive(Debug, Clone)]
pub struct FieldCleaner {
    sentinel: String,
    anchor_chars: usize,
    min_repair_chars: usize,
}

impl Default for FieldCleaner {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl FieldCleaner {
    /// Creates a cleaner from the extractor configuration.
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            sentinel: config.sentinel.clone(),
            anchor_chars: config.repair_anchor_chars,
            min_repair_chars: config.repair_min_chars,
        }
    }

    /// Cleans `content`, using `full_text` to repair truncation.
    ///
    /// Empty content and the sentinel are returned unchanged.
    pub fn clean(&self, content: &str, full_text: &str) -> String {
        if content.is_empty() || content == self.sentinel {
            return content.to_string();
        }

        let cleaned = self.strip_json_syntax(content);
        let cleaned = self.remove_citations(&cleaned);
        let cleaned = self.remove_escaped_fragments(&cleaned);
        let cleaned = cleaned.replace("\\\"", "\"");
        let cleaned = self.repair_truncation(&cleaned, full_text);
        let cleaned = SOURCE_PAREN.replace_all(&cleaned, "");
        let cleaned = self.drop_leading_fragment(&cleaned);

        cleaned.trim().to_string()
    }

    /// Removes `"field": "` prefixes and a trailing `",` tail.
    pub fn strip_json_syntax(&self, content: &str) -> String {
        let without_keys = JSON_KEY_PREFIX.replace_all(content, "");
        TRAILING_QUOTE.replace_all(&without_keys, "").into_owned()
    }

    /// Removes `(Source: N)` and `(Sources: N, M)` markers.
    pub fn remove_citations(&self, content: &str) -> String {
        CITATION.replace_all(content, "").into_owned()
    }

    /// Removes literal `\n"key": "value"` pairs, then any literal `\n"..."`.
    pub fn remove_escaped_fragments(&self, content: &str) -> String {
        let without_pairs = ESCAPED_KEY_VALUE.replace_all(content, "");
        ESCAPED_QUOTED.replace_all(&without_pairs, "").into_owned()
    }

    /// Completes a truncated sentence from elsewhere in the full text.
    ///
    /// If the content does not end in `.`, `!` or `?`, its last
    /// `anchor_chars` characters are looked up in `full_text`, and the text
    /// after the anchor up to and including the next terminator is appended.
    pub fn repair_truncation(&self, content: &str, full_text: &str) -> String {
        if content.is_empty()
            || TERMINAL.is_match(content)
            || content.chars().count() <= self.min_repair_chars
        {
            return content.to_string();
        }

        let anchor = last_chars(content, self.anchor_chars);
        let Some(found) = full_text.find(anchor) else {
            return content.to_string();
        };

        let rest = &full_text[found + anchor.len()..];
        match rest.find(|c: char| matches!(c, '.' | '!' | '?')) {
            // Terminators are ASCII, so `end + 1` is a char boundary
            Some(end) => {
                let mut repaired = String::with_capacity(content.len() + end + 1);
                repaired.push_str(content);
                repaired.push_str(&rest[..=end]);
                repaired
            }
            None => content.to_string(),
        }
    }

    /// Drops text before the first full sentence when content opens mid-sentence.
    pub fn drop_leading_fragment(&self, content: &str) -> String {
        let starts_lowercase = content.chars().next().is_some_and(char::is_lowercase);
        if !starts_lowercase {
            return content.to_string();
        }

        match SENTENCE_START.captures(content).and_then(|caps| caps.get(1)) {
            Some(capital) => content[capital.start()..].to_string(),
            None => content.to_string(),
        }
    }
}

/// Returns the last `n` characters of `s` (all of `s` if shorter).
fn last_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cleaner() -> FieldCleaner {
        FieldCleaner::default()
    }

    #[test]
    fn test_sentinel_passes_through() {
        assert_eq!(cleaner().clean("No data available", "anything"), "No data available");
        assert_eq!(cleaner().clean("", "anything"), "");
    }

    #[test]
    fn test_strip_json_key_prefix() {
        let cleaned = cleaner().clean(r#""efficacy": "The response rate was 40%."#, "");
        assert_eq!(cleaned, "The response rate was 40%.");
    }

    #[test]
    fn test_strip_trailing_quote_comma() {
        assert_eq!(
            cleaner().strip_json_syntax("Well tolerated overall.\",\n"),
            "Well tolerated overall."
        );
    }

    #[test]
    fn test_remove_citations() {
        let cleaned = cleaner().clean("Response improved (Sources: 1, 2, 3) in all arms.", "");
        assert_eq!(cleaned, "Response improved  in all arms.");
    }

    #[test]
    fn test_remove_escaped_fragments() {
        let input = r#"Main finding.\n"safety": "Good."\n"stray""#;
        assert_eq!(cleaner().remove_escaped_fragments(input), "Main finding.");
    }

    #[test]
    fn test_unescape_quotes() {
        let cleaned = cleaner().clean(r#"Rated \"good\" by investigators."#, "");
        assert_eq!(cleaned, r#"Rated "good" by investigators."#);
    }

    #[test]
    fn test_repair_truncation_from_full_text() {
        let full = "Efficacy: The drug reduced pain scores in the treated group, with effects lasting twelve weeks. Safety: fine.";
        let cleaned = cleaner().clean("The drug reduced pain scores in the treated group", full);
        assert_eq!(
            cleaned,
            "The drug reduced pain scores in the treated group, with effects lasting twelve weeks."
        );
    }

    #[test]
    fn test_repair_skips_short_content() {
        assert_eq!(cleaner().repair_truncation("too short", "too short text."), "too short");
    }

    #[test]
    fn test_repair_anchor_not_found() {
        let content = "The drug reduced pain scores";
        assert_eq!(cleaner().repair_truncation(content, "unrelated."), content);
    }

    #[test]
    fn test_repair_skips_terminated_content() {
        let content = "The drug reduced pain scores.  ";
        assert_eq!(cleaner().repair_truncation(content, "anything."), content);
    }

    #[test]
    fn test_residual_source_parenthetical() {
        let cleaned = cleaner().clean("Response was durable (Sources: see appendix).", "");
        assert_eq!(cleaned, "Response was durable.");
    }

    #[test]
    fn test_drop_leading_fragment() {
        let cleaned = cleaner().clean("of the patients responded. Overall the drug worked.", "");
        assert_eq!(cleaned, "Overall the drug worked.");
    }

    #[test]
    fn test_leading_fragment_kept_without_sentence_start() {
        let cleaned = cleaner().clean("mild nausea was the only event.", "");
        assert_eq!(cleaned, "mild nausea was the only event.");
    }

    #[test]
    fn test_last_chars() {
        assert_eq!(last_chars("abcdef", 3), "def");
        assert_eq!(last_chars("ab", 5), "ab");
        assert_eq!(last_chars("naïve", 3), "ïve");
        assert_eq!(last_chars("abc", 0), "");
    }
}
