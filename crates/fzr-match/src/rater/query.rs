//! Query words and their per-word settings.

use fzr_config::RaterConfig;
use serde::{Deserialize, Serialize};

/// A query word with optional overrides of the rater configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordInput {
    /// The word to find.
    pub word: String,
    /// Edits allowed; derived from the fuzziness table when unset.
    pub max_distance: Option<u32>,
    /// Cost of leaving the word out of the ordered sequence.
    pub skip_penalty: Option<f64>,
    /// Cost of the word not occurring at all.
    pub missing_penalty: Option<f64>,
    /// Cost per edit of an occurrence.
    pub typo_penalty: Option<f64>,
    /// Bonus per extra occurrence.
    pub extra_bonus: Option<f64>,
}

impl WordInput {
    /// A word using the configured settings.
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Self::default()
        }
    }
}

impl From<&str> for WordInput {
    fn from(word: &str) -> Self {
        Self::new(word)
    }
}

/// Splits a query at whitespace.
pub fn split_query(query: &str) -> Vec<WordInput> {
    query.split_whitespace().map(WordInput::from).collect()
}

/// A query word with every setting decided.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedWord {
    /// The word.
    pub(crate) word: String,
    /// Edits allowed.
    pub(crate) max_distance: u32,
    /// Cost of leaving the word out of the ordered sequence.
    pub(crate) skip_penalty: f64,
    /// Cost of the word not occurring at all.
    pub(crate) missing_penalty: f64,
    /// Cost per edit of an occurrence.
    pub(crate) typo_penalty: f64,
    /// Bonus per extra occurrence.
    pub(crate) extra_bonus: f64,
}

impl ResolvedWord {
    /// Fills the unset fields of `input` from `config`.
    pub(crate) fn resolve(input: &WordInput, config: &RaterConfig) -> Self {
        let length = input.word.chars().count();
        Self {
            word: input.word.clone(),
            max_distance: input
                .max_distance
                .unwrap_or_else(|| config.fuzziness.max_distance_for(length)),
            skip_penalty: input.skip_penalty.unwrap_or(config.skip_penalty),
            missing_penalty: input.missing_penalty.unwrap_or(config.missing_penalty),
            typo_penalty: input.typo_penalty.unwrap_or(config.typo_penalty),
            extra_bonus: input.extra_bonus.unwrap_or(config.extra_bonus),
        }
    }
}
