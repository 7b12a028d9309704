//! Intermediate candidate representation for section matching.

use super::sections::StrategyKind;

/// A content string considered for one field before tie-breaking.
///
/// Candidates live only while a single field is being matched; the winner's
/// content is handed to the cleaner and the rest are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Field this candidate was found for.
    pub field: String,
    /// The trimmed captured content.
    pub content: String,
    /// How this candidate was found.
    pub source: CandidateSource,
    /// Length of `content` in characters, used for tie-breaking.
    pub length: usize,
}

/// Describes how a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// One of the first-pass strategies in the pattern table.
    Strategy(StrategyKind),

    /// Second-pass scan for any keyword-bearing sentence.
    SentenceScan,

    /// Last-resort context window around a keyword occurrence.
    ContextWindow,
}

impl Candidate {
    /// Creates a candidate, trimming the content and measuring its length.
    pub fn new(field: impl Into<String>, content: &str, source: CandidateSource) -> Self {
        let content = content.trim().to_string();
        let length = content.chars().count();
        Self {
            field: field.into(),
            content,
            source,
            length,
        }
    }

    /// Number of whitespace-separated words.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// True if the candidate has strictly more than `min_words` words.
    #[inline]
    pub fn is_substantial(&self, min_words: usize) -> bool {
        self.word_count() > min_words
    }

    /// True if this candidate should replace `current` as the best one.
    ///
    /// Only a strictly longer candidate wins, so on a tie the first one
    /// encountered is kept.
    #[inline]
    pub fn beats(&self, current: Option<&Candidate>) -> bool {
        current.map_or(true, |c| self.length > c.length)
    }
}
