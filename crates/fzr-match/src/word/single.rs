//! Best-occurrence matching.

use fzr_automata::NfaDfa;
use serde::Serialize;
use tracing::debug;

use super::{
    Alteration, FuzzyNodeData, FuzzyTransitionData, alterations::align,
    template::create_fuzzy_nfa_template,
};
use crate::MatchError;

/// Distance of the best occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordMatch {
    /// Edits of the best occurrence; `None` when no occurrence is within range.
    pub distance: Option<u32>,
}

impl WordMatch {
    /// Whether any occurrence was found.
    pub const fn matched(&self) -> bool {
        self.distance.is_some()
    }
}

/// Best occurrence with its alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordMatchData {
    /// Edits of the best occurrence; `None` when no occurrence is within range.
    pub distance: Option<u32>,
    /// Alignment of the whole text; empty without a match.
    pub alterations: Vec<Alteration>,
}

impl WordMatchData {
    /// Whether any occurrence was found.
    pub const fn matched(&self) -> bool {
        self.distance.is_some()
    }
}

/// Finds the best fuzzy occurrence of a word in texts.
///
/// # Example
///
/// ```
/// use fzr_match::FuzzyWordMatcher;
///
/// let matcher = FuzzyWordMatcher::new("oranges", 1).unwrap();
/// assert_eq!(matcher.get_match("I like orangs").distance, Some(1));
/// assert!(!matcher.get_match("I like pears").matched());
/// ```
#[derive(Debug)]
pub struct FuzzyWordMatcher {
    /// The query word.
    word: String,
    /// Edits allowed.
    max_distance: u32,
    /// Compiled automaton.
    automaton: NfaDfa<FuzzyNodeData, FuzzyTransitionData>,
}

impl FuzzyWordMatcher {
    /// Compiles a matcher for `word` allowing `max_distance` edits.
    pub fn new(word: impl Into<String>, max_distance: u32) -> Result<Self, MatchError> {
        let word = word.into();
        let automaton = NfaDfa::new(create_fuzzy_nfa_template(&word, max_distance, false)?)?;
        debug!(
            word = %word,
            max_distance,
            dfa_states = automaton.dfa().len(),
            "built word matcher"
        );
        Ok(Self {
            word,
            max_distance,
            automaton,
        })
    }

    /// The query word.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Edits allowed.
    pub const fn max_distance(&self) -> u32 {
        self.max_distance
    }

    /// Lowest distance of any occurrence in `text`.
    pub fn get_match(&self, text: &str) -> WordMatch {
        let distance = self
            .automaton
            .execute(text)
            .into_iter()
            .filter(|state| state.matched)
            .map(|state| state.distance)
            .min();
        WordMatch { distance }
    }

    /// Best occurrence in `text` with the alignment of the whole text.
    ///
    /// Among equally good final states the first one found wins. Completed
    /// states loop instead of restarting, so the edits of every path into a
    /// final state equal its distance; the path is rebuilt with
    /// [`FirstCandidate`](fzr_automata::FirstCandidate), which prefers
    /// matching transitions.
    pub fn get_match_data(&self, text: &str) -> WordMatchData {
        let run = self.automaton.execute_traced(text);
        let traces = run.traces();
        let Some(best) = traces
            .iter()
            .filter(|trace| trace.terminal.matched)
            .min_by_key(|trace| trace.terminal.distance)
        else {
            return WordMatchData {
                distance: None,
                alterations: Vec::new(),
            };
        };
        let chars: Vec<char> = text.chars().collect();
        WordMatchData {
            distance: Some(best.terminal.distance),
            alterations: align(&best.path(), &chars).alterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{alteration_codes, fixtures::ORANGES};

    #[test]
    fn test_exact_match() {
        let matcher = FuzzyWordMatcher::new("oranges", 2).unwrap();
        assert!(matcher.get_match("I like oranges").matched());
        assert!(!matcher.get_match("Potatoes are amazing").matched());
    }

    #[test]
    fn test_distance_grid() {
        for max in 0..4 {
            let matcher = FuzzyWordMatcher::new("oranges", max).unwrap();
            for (distance, texts) in ORANGES {
                let expected = distance.filter(|&d| d <= max);
                for text in texts {
                    assert_eq!(
                        matcher.get_match(text).distance,
                        expected,
                        "{text:?} with max distance {max}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_best_match_wins() {
        let matcher = FuzzyWordMatcher::new("oranges", 2).unwrap();
        let found = matcher.get_match("I like orangs with oranges and some orans");
        assert_eq!(found, WordMatch { distance: Some(0) });
    }

    #[test]
    fn test_no_match() {
        let matcher = FuzzyWordMatcher::new("oranges", 1).unwrap();
        let data = matcher.get_match_data("I like apples");
        assert!(!data.matched());
        assert!(data.alterations.is_empty());
    }

    #[test]
    fn test_alterations_with_replace_and_skip() {
        let matcher = FuzzyWordMatcher::new("potatlers", 2).unwrap();
        let data = matcher.get_match_data("I like potatoes in germany");
        assert_eq!(data.distance, Some(2));
        assert_eq!(
            alteration_codes(&data.alterations),
            "iiiiiiimmmmmrmsmiiiiiiiiiii"
        );
    }

    #[test]
    fn test_alterations_with_insert() {
        let matcher = FuzzyWordMatcher::new("potatlers", 2).unwrap();
        let data = matcher.get_match_data("I like potaltles in germany");
        assert_eq!(
            alteration_codes(&data.alterations),
            "iiiiiiimmmmammmsmiiiiiiiiiii"
        );
    }

    #[test]
    fn test_alteration_slots() {
        let matcher = FuzzyWordMatcher::new("cat", 1).unwrap();
        let data = matcher.get_match_data("a ct");
        assert_eq!(alteration_codes(&data.alterations), "iimsm");
        let skip = data.alterations[3];
        assert_eq!(skip.query.character, Some('a'));
        assert_eq!(skip.query.index, 1);
        assert_eq!(skip.target.index, 3);
        assert_eq!(skip.target.character, None);
        let last = data.alterations[4];
        assert_eq!(last.target.character, Some('t'));
        assert_eq!(last.query.index, 2);
    }

    #[test]
    fn test_alignment_keeps_exact_occurrence() {
        let matcher = FuzzyWordMatcher::new("see", 1).unwrap();
        let data = matcher.get_match_data("seee");
        assert_eq!(data.distance, Some(0));
        assert_eq!(alteration_codes(&data.alterations), "mmmi");

        let matcher = FuzzyWordMatcher::new("cat", 1).unwrap();
        let data = matcher.get_match_data("cat cat");
        assert_eq!(data.distance, Some(0));
        assert_eq!(alteration_codes(&data.alterations), "mmmiiii");
    }
}
