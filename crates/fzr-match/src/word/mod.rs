//! Fuzzy matching of single query words.
//!
//! Both matchers compile a Levenshtein-style NFA (see
//! [`create_fuzzy_nfa_template`]) to a DFA. [`FuzzyWordMatcher`] reports the
//! best occurrence of a word; [`FuzzyMultiWordMatcher`] reports every
//! occurrence.

mod alterations;
#[cfg(test)]
mod fixtures;
mod multi;
mod single;
mod template;

use serde::Serialize;

pub use multi::{FuzzyMultiWordMatcher, MultiMatchData, Occurrence};
pub use single::{FuzzyWordMatcher, WordMatch, WordMatchData};
pub use template::{FuzzyTemplate, START_STATE, create_fuzzy_nfa_template};

/// Metadata of a fuzzy NFA state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FuzzyNodeData {
    /// The whole query has been consumed.
    pub matched: bool,
    /// Edits spent so far.
    pub distance: u32,
    /// Number of query characters consumed; zero before the match started.
    pub search_index: usize,
}

/// What a fuzzy NFA transition does to the alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Query and text characters agree.
    Match,
    /// A query character is missing from the text.
    Skip,
    /// A query character was replaced by a text character.
    Replace,
    /// The text has an extra character.
    Insert,
    /// A text character outside any occurrence.
    Ignore,
    /// Return to the start after a completed occurrence.
    Restart,
}

/// Metadata of a fuzzy NFA transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FuzzyTransitionData {
    /// Alignment operation.
    pub kind: StepKind,
    /// Query character involved, if any.
    pub character: Option<char>,
    /// Query position this transition moves towards.
    pub index: usize,
}

/// Kind of a reported alignment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlterationKind {
    /// Characters agree.
    Match,
    /// The text replaces the query character.
    Replace,
    /// The text inserts a character.
    Insert,
    /// The text omits the query character.
    Skip,
    /// The text character is outside the occurrence.
    Ignore,
}

impl AlterationKind {
    /// Reported kind of a transition; restarts are not reported.
    pub const fn from_step(kind: StepKind) -> Option<Self> {
        match kind {
            StepKind::Match => Some(Self::Match),
            StepKind::Skip => Some(Self::Skip),
            StepKind::Replace => Some(Self::Replace),
            StepKind::Insert => Some(Self::Insert),
            StepKind::Ignore => Some(Self::Ignore),
            StepKind::Restart => None,
        }
    }

    /// One-letter code, as used in compact alignment strings.
    pub const fn code(self) -> char {
        match self {
            Self::Match => 'm',
            Self::Replace => 'r',
            Self::Insert => 'a',
            Self::Skip => 's',
            Self::Ignore => 'i',
        }
    }
}

/// A character position in the query or the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharSlot {
    /// Position in characters.
    pub index: usize,
    /// The character, when one is involved.
    pub character: Option<char>,
}

/// One step aligning the query with the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Alteration {
    /// What happened.
    #[serde(rename = "type")]
    pub kind: AlterationKind,
    /// The query side.
    pub query: CharSlot,
    /// The text side.
    pub target: CharSlot,
}

/// Renders alterations as their one-letter codes.
pub fn alteration_codes(alterations: &[Alteration]) -> String {
    alterations.iter().map(|a| a.kind.code()).collect()
}
