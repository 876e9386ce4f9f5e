//! Automaton engines for fuzzy matching.
//!
//! This crate provides the generic machinery the fuzzy matchers are built on:
//!
//! - **Templates**: declarative NFA and DFA descriptions with caller-defined metadata
//! - **NFA execution**: simultaneous-state simulation, optionally recording paths
//! - **Subset construction**: NFA to DFA conversion that keeps the NFA states and
//!   transitions every DFA element was built from
//! - **DFA execution**: a single state walk with optional traces
//! - **NFA over DFA**: runs the DFA, then reconstructs an NFA-level path per final state
//!
//! # Example
//!
//! ```
//! use fzr_automata::{NfaDfa, NfaNode, NfaTemplate, NfaTransition};
//!
//! let template = NfaTemplate::new(vec![
//!     NfaNode::new("a", true, "start")
//!         .with_transition(NfaTransition::character("b", 'x', ())),
//!     NfaNode::new("b", false, "end"),
//! ])
//! .unwrap();
//! let automaton = NfaDfa::new(template).unwrap();
//! assert_eq!(automaton.execute("x"), vec![&"end"]);
//! ```

#![warn(missing_docs)]

mod dfa;
mod error;
mod nfa;
mod nfadfa;
mod state;
mod subset;
mod template;

pub use dfa::{Dfa, DfaStep, DfaTrace};
pub use error::AutomatonError;
pub use nfa::{Nfa, NfaStep, NfaTrace};
pub use nfadfa::{
    FirstCandidate, FnChooser, NfaDfa, NfaDfaTrace, PathStep, TracedRun, TransitionChooser,
};
pub use state::{StateId, state_set_id};
pub use subset::{
    NoMeta, NodeSources, ProvenanceMeta, ProvenanceTemplate, SourceTransition, TransitionSources,
    convert_nfa_to_dfa, convert_nfa_to_dfa_with,
};
pub use template::{
    DfaNode, DfaTemplate, DfaTransition, DfaTrigger, NfaNode, NfaTemplate, NfaTransition, Trigger,
};
