//! The first-pass strategy table.
//!
//! Each strategy is a start pattern (with a `{kw}` slot for the escaped
//! keyword) plus a rule for where the captured content ends. Order in
//! [`STRATEGIES`] is the order strategies run, which also decides ties.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;

/// Slot replaced by the escaped keyword in pattern templates.
const KEYWORD_SLOT: &str = "{kw}";

/// The kind of a first-pass strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// `"keyword": "content"`
    InlineJson,
    /// `- keyword: content` or `2. keyword content`
    BulletItem,
    /// A line starting with the keyword.
    LabeledLine,
    /// `keyword:` anywhere in the text.
    LabeledParagraph,
    /// A sentence mentioning the keyword.
    SentenceContext,
}

impl StrategyKind {
    /// Stable name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            StrategyKind::InlineJson => "inline_json",
            StrategyKind::BulletItem => "bullet_item",
            StrategyKind::LabeledLine => "labeled_line",
            StrategyKind::LabeledParagraph => "labeled_paragraph",
            StrategyKind::SentenceContext => "sentence_context",
        }
    }
}

/// Where a strategy's captured content ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEnd {
    /// The pattern's first capture group is the content.
    Group,
    /// Content runs from the end of the start match up to the first match of
    /// the terminator, or to the end of the text.
    Until(Terminator),
}

/// Terminators shared by the `Until` strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// The next bulleted or numbered line.
    NextBullet,
    /// The next line that looks like a `label:`.
    NextLabel,
}

static NEXT_BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*(?:•|-|\*|\d+\.)").expect("Invalid bullet terminator regex pattern")
});

static NEXT_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\w+:").expect("Invalid label terminator regex pattern"));

impl Terminator {
    /// Returns the compiled terminator pattern.
    pub fn regex(self) -> &'static Regex {
        match self {
            Terminator::NextBullet => &NEXT_BULLET,
            Terminator::NextLabel => &NEXT_LABEL,
        }
    }
}

/// One row of the strategy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyDescriptor {
    /// What the strategy looks for.
    pub kind: StrategyKind,
    /// Start pattern; `{kw}` is replaced by the escaped keyword.
    pub template: &'static str,
    /// How the content ends.
    pub end: CaptureEnd,
}

/// First-pass strategies, in the order they run.
pub const STRATEGIES: &[StrategyDescriptor] = &[
    StrategyDescriptor {
        kind: StrategyKind::InlineJson,
        template: r#"(?is)"(?:{kw})"\s*:\s*"([^"]+)(?:"|\z)"#,
        end: CaptureEnd::Group,
    },
    StrategyDescriptor {
        kind: StrategyKind::BulletItem,
        template: r"(?is)\n\s*(?:•|-|\*|\d+\.)\s*{kw}:?\s*",
        end: CaptureEnd::Until(Terminator::NextBullet),
    },
    StrategyDescriptor {
        kind: StrategyKind::LabeledLine,
        template: r"(?is)\n\s*{kw}:?\s*",
        end: CaptureEnd::Until(Terminator::NextLabel),
    },
    StrategyDescriptor {
        kind: StrategyKind::LabeledParagraph,
        template: r"(?is){kw}:\s*",
        end: CaptureEnd::Until(Terminator::NextLabel),
    },
    // Ends at '.' only; '!' and '?' sentences are left to the sentence scan
    StrategyDescriptor {
        kind: StrategyKind::SentenceContext,
        template: r"(?is)(?:\.\s+|\n\s*|\A)([^.!?]*{kw}[^.!?]*\.)",
        end: CaptureEnd::Group,
    },
];

/// Second pass: any keyword-bearing sentence ending in `.`, `!` or `?`.
pub const SENTENCE_SCAN_TEMPLATE: &str = r"(?i)(?:[.!?]\s+|\n|\A)([^.!?]*{kw}[^.!?]*[.!?])";

/// Fills the keyword slot of `template` with the escaped keyword.
pub fn instantiate(template: &str, keyword: &str) -> String {
    template.replace(KEYWORD_SLOT, &regex::escape(keyword))
}

/// Builds the last-resort context-window pattern for a keyword.
///
/// `.` does not cross newlines here, so the window stays on one line.
pub fn context_window_pattern(keyword: &str, window: usize) -> String {
    format!(
        "(?i).{{0,{window}}}{kw}.{{0,{window}}}",
        window = window,
        kw = regex::escape(keyword)
    )
}

/// A strategy compiled for one keyword.
#[derive(Debug, Clone)]
pub struct CompiledStrategy {
    /// What the strategy looks for.
    pub kind: StrategyKind,
    /// The keyword-specific start pattern.
    pub start: Regex,
    /// How the content ends.
    pub end: CaptureEnd,
}

impl CompiledStrategy {
    /// Compiles `descriptor` for `keyword`.
    pub fn compile(descriptor: &StrategyDescriptor, keyword: &str) -> Result<Self> {
        Ok(Self {
            kind: descriptor.kind,
            start: Regex::new(&instantiate(descriptor.template, keyword))?,
            end: descriptor.end,
        })
    }

    /// Returns every captured content string, in document order.
    ///
    /// `Until` strategies resume scanning where the previous capture ended,
    /// so consecutive sections are each captured once.
    pub fn captures<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match self.end {
            CaptureEnd::Group => self
                .start
                .captures_iter(text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect(),
            CaptureEnd::Until(terminator) => {
                let mut found = Vec::new();
                let mut pos = 0;

                while pos <= text.len() {
                    let Some(start) = self.start.find_at(text, pos) else {
                        break;
                    };
                    let content_start = start.end();
                    let content_end = terminator
                        .regex()
                        .find_at(text, content_start)
                        .map_or(text.len(), |m| m.start());

                    found.push(&text[content_start..content_end]);
                    pos = content_end.max(start.start() + 1);
                }

                found
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(kind: StrategyKind, keyword: &str) -> CompiledStrategy {
        let descriptor = STRATEGIES.iter().find(|d| d.kind == kind).unwrap();
        CompiledStrategy::compile(descriptor, keyword).unwrap()
    }

    #[test]
    fn test_table_order() {
        let kinds: Vec<_> = STRATEGIES.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StrategyKind::InlineJson,
                StrategyKind::BulletItem,
                StrategyKind::LabeledLine,
                StrategyKind::LabeledParagraph,
                StrategyKind::SentenceContext,
            ]
        );
    }

    #[test]
    fn test_instantiate_escapes_keyword() {
        assert_eq!(instantiate(r"{kw}:", "pk/pd"), "pk/pd:");
        assert_eq!(instantiate(r"{kw}:", "a.b"), r"a\.b:");
    }

    #[test]
    fn test_inline_json() {
        let strategy = compiled(StrategyKind::InlineJson, "safety");
        let text = r#"{"Safety": "No serious events were seen", "x": "y"}"#;
        assert_eq!(strategy.captures(text), vec!["No serious events were seen"]);
    }

    #[test]
    fn test_inline_json_unterminated() {
        let strategy = compiled(StrategyKind::InlineJson, "safety");
        let text = r#"{"safety": "No serious events were seen in the"#;
        assert_eq!(
            strategy.captures(text),
            vec!["No serious events were seen in the"]
        );
    }

    #[test]
    fn test_bullet_items() {
        let strategy = compiled(StrategyKind::BulletItem, "safety");
        let text = "Findings:\n- Safety: no deaths were reported overall\n- Efficacy: strong\n2. safety again here";
        assert_eq!(
            strategy.captures(text),
            vec!["no deaths were reported overall", "again here"]
        );
    }

    #[test]
    fn test_labeled_line_stops_at_next_label() {
        let strategy = compiled(StrategyKind::LabeledLine, "efficacy");
        let text = "Report\nEfficacy: ORR was 40%\nacross all arms.\nSafety: fine";
        assert_eq!(strategy.captures(text), vec!["ORR was 40%\nacross all arms."]);
    }

    #[test]
    fn test_labeled_paragraph_anywhere() {
        let strategy = compiled(StrategyKind::LabeledParagraph, "efficacy");
        let text = "Efficacy: ORR was 40% in the trial. Safety: fine";
        assert_eq!(
            strategy.captures(text),
            vec!["ORR was 40% in the trial. Safety: fine"]
        );
    }

    #[test]
    fn test_sentence_context() {
        let strategy = compiled(StrategyKind::SentenceContext, "tolerated");
        let text = "Intro here. The regimen was well tolerated by most. End.";
        assert_eq!(
            strategy.captures(text),
            vec!["The regimen was well tolerated by most."]
        );
    }

    #[test]
    fn test_question_left_to_sentence_scan() {
        let strategy = compiled(StrategyKind::SentenceContext, "tolerated");
        let text = "Was the regimen well tolerated? Mostly";
        assert!(strategy.captures(text).is_empty());

        let scan = Regex::new(&instantiate(SENTENCE_SCAN_TEMPLATE, "tolerated")).unwrap();
        let sentence = scan.captures(text).unwrap().get(1).unwrap().as_str();
        assert_eq!(sentence, "Was the regimen well tolerated?");
    }

    #[test]
    fn test_context_window_stays_on_line() {
        let pattern = Regex::new(&context_window_pattern("qol", 10)).unwrap();
        let m = pattern.find("first line\nbetter QoL scores noted\nlast").unwrap();
        assert_eq!(m.as_str(), "better QoL scores no");
    }
}
