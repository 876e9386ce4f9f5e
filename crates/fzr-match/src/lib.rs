//! Fuzzy word matching and text rating.
//!
//! Matching is built from automata compiled by `fzr-automata`:
//!
//! - [`FuzzyWordMatcher`] finds the best occurrence of a word within an
//!   edit distance.
//! - [`FuzzyMultiWordMatcher`] finds every occurrence of a word in one pass.
//! - [`WordOrderMatcher`] scores how closely occurrences follow the query
//!   order.
//! - [`FuzzyRater`] combines them into a single score per text, and builds
//!   highlighting groups describing how the text relates to the query.
//!
//! # Example
//!
//! ```
//! use fzr_config::RaterConfig;
//! use fzr_match::FuzzyRater;
//!
//! let rater = FuzzyRater::new("something cool", &RaterConfig::default()).unwrap();
//! let mut texts = vec!["I like cool stuff", "I like something cool", "apples"];
//! texts.sort_by(|a, b| rater.get_score(a).total_cmp(&rater.get_score(b)));
//! assert_eq!(texts, vec!["I like something cool", "I like cool stuff", "apples"]);
//! ```

#![warn(missing_docs)]

mod error;
mod order;
mod rater;
mod word;

pub use error::MatchError;
pub use order::{
    DEFAULT_SKIP_PENALTY, OrderMatch, OrderMatchData, OrderOccurrence, OrderWord,
    WordOrderMatcher,
};
pub use rater::{
    FuzzyRater, MatchGroup, MatchRelation, QueryWordRef, RaterMatch, RaterMatchData,
    RelationKind, TextRange, WordInput, add_alteration_data, split_group, split_query,
};
pub use word::{
    Alteration, AlterationKind, CharSlot, FuzzyMultiWordMatcher, FuzzyNodeData,
    FuzzyTemplate, FuzzyTransitionData, FuzzyWordMatcher, MultiMatchData, Occurrence,
    START_STATE, StepKind, WordMatch, WordMatchData, alteration_codes, create_fuzzy_nfa_template,
};
