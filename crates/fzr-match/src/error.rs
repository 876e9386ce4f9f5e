//! Error types for matchers and raters.

use fzr_automata::AutomatonError;
use thiserror::Error;

/// Errors raised while building matchers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The underlying automaton could not be built.
    #[error("failed to build automaton: {0}")]
    Automaton(#[from] AutomatonError),

    /// The query contains no words.
    #[error("query contains no words")]
    EmptyQuery,
}
