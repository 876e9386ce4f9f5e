//! Rating texts against multi-word queries.
//!
//! A [`FuzzyRater`] finds every occurrence of every query word, scores how
//! well the occurrences follow the query order, and combines that with
//! penalties for missing words and bonuses for repeated ones. Lower scores
//! are better; `f64::INFINITY` means no query word was found.

mod groups;
mod query;

use std::mem;

use fzr_config::RaterConfig;
use serde::Serialize;
use tracing::trace;

pub use groups::{
    MatchGroup, MatchRelation, QueryWordRef, RelationKind, TextRange, add_alteration_data,
    split_group,
};
pub use query::{WordInput, split_query};
use query::ResolvedWord;

use crate::{
    FuzzyMultiWordMatcher, MatchError, Occurrence, OrderOccurrence, OrderWord, WordOrderMatcher,
};

/// Score of a text and its components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaterMatch {
    /// `order_cost + missing_cost - extra_bonus`.
    pub score: f64,
    /// Cost of the word order, including typo costs of the used occurrences.
    pub order_cost: f64,
    /// Penalties of query words that do not occur.
    pub missing_cost: f64,
    /// Bonus for occurrences beyond the query's own repetitions.
    pub extra_bonus: f64,
}

impl RaterMatch {
    /// The result for a text without any occurrence.
    const NONE: Self = Self {
        score: f64::INFINITY,
        order_cost: f64::INFINITY,
        missing_cost: f64::INFINITY,
        extra_bonus: 0.0,
    };
}

/// Score of a text together with highlighting groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaterMatchData {
    /// `order_cost + missing_cost - extra_bonus`.
    pub score: f64,
    /// Cost of the word order, including typo costs of the used occurrences.
    pub order_cost: f64,
    /// Penalties of query words that do not occur.
    pub missing_cost: f64,
    /// Bonus for occurrences beyond the query's own repetitions.
    pub extra_bonus: f64,
    /// Contiguous groups covering the whole text.
    pub match_groups: Vec<MatchGroup>,
}

/// A matcher for one distinct query word.
#[derive(Debug)]
struct WordEntry {
    /// Finds the word.
    matcher: FuzzyMultiWordMatcher,
    /// How often the word appears in the query.
    required: usize,
    /// Settings of the word's first appearance.
    settings: ResolvedWord,
}

/// Occurrences of all query words in one text.
#[derive(Debug, Default)]
struct Found {
    /// Occurrences ordered by start position.
    occurrences: Vec<OrderOccurrence>,
    /// Penalties of words without occurrences.
    missing_cost: f64,
    /// Bonus for extra occurrences.
    extra_bonus: f64,
}

/// Scores texts against a query.
///
/// # Example
///
/// ```
/// use fzr_config::RaterConfig;
/// use fzr_match::FuzzyRater;
///
/// let rater = FuzzyRater::new("something cool", &RaterConfig::default()).unwrap();
/// let close = rater.get_score("I like something cool");
/// let apart = rater.get_score("I like something and cool stuff");
/// assert!(close < apart);
/// assert_eq!(rater.get_score("apples and pears"), f64::INFINITY);
/// ```
#[derive(Debug)]
pub struct FuzzyRater {
    /// Query words in order.
    words: Vec<ResolvedWord>,
    /// One entry per distinct word.
    entries: Vec<WordEntry>,
    /// Entry of each query word.
    entry_of: Vec<usize>,
    /// Scores the order of occurrences.
    order: WordOrderMatcher,
}

impl FuzzyRater {
    /// A rater for the whitespace-separated words of `query`.
    pub fn new(query: &str, config: &RaterConfig) -> Result<Self, MatchError> {
        Self::from_words(split_query(query), config)
    }

    /// A rater for pre-split words with per-word overrides.
    pub fn from_words(
        words: impl IntoIterator<Item = WordInput>,
        config: &RaterConfig,
    ) -> Result<Self, MatchError> {
        let words: Vec<ResolvedWord> = words
            .into_iter()
            .map(|input| ResolvedWord::resolve(&input, config))
            .collect();
        if words.is_empty() {
            return Err(MatchError::EmptyQuery);
        }

        let mut entries: Vec<WordEntry> = Vec::new();
        let mut entry_of = Vec::with_capacity(words.len());
        for word in &words {
            if let Some(index) = entries.iter().position(|e| e.settings.word == word.word) {
                entries[index].required += 1;
                entry_of.push(index);
                continue;
            }
            entries.push(WordEntry {
                matcher: FuzzyMultiWordMatcher::new(word.word.clone(), word.max_distance)?,
                required: 1,
                settings: word.clone(),
            });
            entry_of.push(entries.len() - 1);
        }

        let order = WordOrderMatcher::from_words(
            words
                .iter()
                .map(|word| OrderWord::new(word.word.clone(), word.skip_penalty)),
        );
        Ok(Self {
            words,
            entries,
            entry_of,
            order,
        })
    }

    /// The query words in order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|word| word.word.as_str())
    }

    /// Score of `text`; lower is better.
    pub fn get_score(&self, text: &str) -> f64 {
        self.get_match(text).score
    }

    /// Score of `text` and its components.
    pub fn get_match(&self, text: &str) -> RaterMatch {
        let found = self.find(text);
        if found.occurrences.is_empty() {
            return RaterMatch::NONE;
        }
        let order_cost = self.order.get_match(&found.occurrences);
        combine(&found, order_cost)
    }

    /// Score of `text` with the groups needed to highlight it.
    pub fn get_match_data(&self, text: &str) -> RaterMatchData {
        let found = self.find(text);
        let (result, order_matches) = if found.occurrences.is_empty() {
            (RaterMatch::NONE, Vec::new())
        } else {
            let data = self.order.get_match_data(&found.occurrences);
            (combine(&found, data.distance), data.matches)
        };

        let alterations: Vec<_> = self
            .entries
            .iter()
            .map(|entry| entry.matcher.get_match_data(text).alterations)
            .collect();
        let mut match_groups = Vec::new();
        for (index, word) in self.words.iter().enumerate() {
            let query_word = QueryWordRef {
                index,
                text: word.word.clone(),
                matched_index: order_matches
                    .iter()
                    .find(|m| m.word_index == index)
                    .map(|m| m.occurrence.index),
            };
            match_groups = add_alteration_data(
                &match_groups,
                &alterations[self.entry_of[index]],
                &query_word,
            );
        }

        RaterMatchData {
            score: result.score,
            order_cost: result.order_cost,
            missing_cost: result.missing_cost,
            extra_bonus: result.extra_bonus,
            match_groups,
        }
    }

    /// Collects the occurrences of every distinct word.
    fn find(&self, text: &str) -> Found {
        let mut found = Found::default();
        for entry in &self.entries {
            let matches = entry.matcher.get_match(text);
            let settings = &entry.settings;
            if matches.is_empty() {
                found.missing_cost += settings.missing_penalty;
            }
            let extra = matches.len().saturating_sub(entry.required);
            found.extra_bonus += extra as f64 * settings.extra_bonus;

            let length = settings.word.chars().count();
            let occurrences = matches
                .iter()
                .map(|occurrence| to_order_occurrence(occurrence, settings, length))
                .collect();
            found.occurrences = merge_by_index(mem::take(&mut found.occurrences), occurrences);
        }
        found
    }
}

/// Places an occurrence for the order matcher.
///
/// The start is estimated from the end, assuming the edits were insertions.
fn to_order_occurrence(
    occurrence: &Occurrence,
    word: &ResolvedWord,
    length: usize,
) -> OrderOccurrence {
    let distance = occurrence.distance as usize;
    OrderOccurrence {
        word: word.word.clone(),
        index: (occurrence.end_index + distance).saturating_sub(length),
        end_index: occurrence.end_index,
        cost: f64::from(occurrence.distance) * word.typo_penalty,
    }
}

/// Merges two lists sorted by start; the first list wins ties.
fn merge_by_index(
    first: Vec<OrderOccurrence>,
    second: Vec<OrderOccurrence>,
) -> Vec<OrderOccurrence> {
    let mut merged = Vec::with_capacity(first.len() + second.len());
    let mut first = first.into_iter().peekable();
    let mut second = second.into_iter().peekable();
    while let (Some(a), Some(b)) = (first.peek(), second.peek()) {
        let next = if a.index <= b.index {
            first.next()
        } else {
            second.next()
        };
        merged.extend(next);
    }
    merged.extend(first);
    merged.extend(second);
    merged
}

/// Combines the score components.
fn combine(found: &Found, order_cost: f64) -> RaterMatch {
    let score = order_cost + found.missing_cost - found.extra_bonus;
    trace!(
        score,
        order_cost,
        missing_cost = found.missing_cost,
        extra_bonus = found.extra_bonus,
        occurrences = found.occurrences.len(),
        "rated text"
    );
    RaterMatch {
        score,
        order_cost,
        missing_cost: found.missing_cost,
        extra_bonus: found.extra_bonus,
    }
}
