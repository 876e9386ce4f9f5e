//! Error types for automaton construction and trace reconstruction.

use thiserror::Error;

/// Errors raised while building or interpreting an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// No state is marked initial, or the named initial state does not exist.
    #[error("initial state can't be found")]
    MissingInitialState,

    /// A transition names a target that is not part of the template.
    #[error("transition from {from} targets unknown state {to}")]
    UnknownState {
        /// ID of the state owning the transition.
        from: String,
        /// The unresolved target ID.
        to: String,
    },

    /// Two states share the same ID.
    #[error("state {id} is defined more than once")]
    DuplicateState {
        /// The repeated ID.
        id: String,
    },

    /// No provenance transition links a traced step back to its DFA state.
    #[error("no backward transition into {state} at step {step}")]
    TraceReconstruction {
        /// Index of the traced step being resolved.
        step: usize,
        /// ID of the NFA state that could not be reached.
        state: String,
    },
}

impl AutomatonError {
    /// Creates a reconstruction error for the given step and state.
    pub(crate) fn reconstruction(step: usize, state: impl Into<String>) -> Self {
        Self::TraceReconstruction {
            step,
            state: state.into(),
        }
    }
}
