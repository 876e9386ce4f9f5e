//! NFA semantics executed through a DFA.
//!
//! [`NfaDfa`] converts its NFA once and runs the resulting DFA. Traced runs
//! can afterwards be mapped back to NFA-level paths using the provenance
//! kept by subset construction.

mod chooser;
mod trace;

pub use chooser::{FirstCandidate, FnChooser, TransitionChooser};
pub use trace::{NfaDfaTrace, PathStep, TracedRun};

use crate::{
    AutomatonError, Dfa, DfaTrace, NfaTemplate, NoMeta, NodeSources, ProvenanceMeta,
    SourceTransition, TransitionSources, convert_nfa_to_dfa_with, subset::epsilon_closure,
};

/// An NFA compiled to a provenance-carrying DFA.
#[derive(Debug)]
pub struct NfaDfa<N, T, CN = (), CT = ()> {
    /// The source NFA.
    nfa: NfaTemplate<N, T>,
    /// The compiled automaton.
    dfa: Dfa<NodeSources<CN>, TransitionSources<CT>>,
    /// Epsilon transitions of the initial closure.
    initial_links: Vec<SourceTransition>,
}

impl<N, T> NfaDfa<N, T> {
    /// Compiles `nfa` keeping provenance only.
    pub fn new(nfa: NfaTemplate<N, T>) -> Result<Self, AutomatonError> {
        Self::with_meta(nfa, &NoMeta)
    }
}

impl<N, T, CN, CT> NfaDfa<N, T, CN, CT> {
    /// Compiles `nfa`, combining metadata with `meta`.
    pub fn with_meta<M>(nfa: NfaTemplate<N, T>, meta: &M) -> Result<Self, AutomatonError>
    where
        M: ProvenanceMeta<N, T, Node = CN, Transition = CT>,
    {
        let dfa = Dfa::new(convert_nfa_to_dfa_with(&nfa, meta))?;
        let initial_links = epsilon_closure(&nfa, nfa.initial().iter().copied()).links;
        Ok(Self {
            nfa,
            dfa,
            initial_links,
        })
    }

    /// The source NFA.
    pub fn nfa(&self) -> &NfaTemplate<N, T> {
        &self.nfa
    }

    /// The compiled DFA.
    pub fn dfa(&self) -> &Dfa<NodeSources<CN>, TransitionSources<CT>> {
        &self.dfa
    }

    /// Runs the DFA and returns the metadata of the NFA states folded into
    /// the final state. Empty when the run dead-ends.
    pub fn execute(&self, text: &str) -> Vec<&N> {
        self.dfa
            .execute(text)
            .map(|state| {
                state
                    .sources
                    .iter()
                    .map(|&source| &self.nfa.node(source).metadata)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Runs the DFA and returns its raw trace.
    pub fn execute_dfa_traced(
        &self,
        text: &str,
    ) -> DfaTrace<'_, NodeSources<CN>, TransitionSources<CT>> {
        self.dfa.execute_traced(text)
    }

    /// Runs the DFA keeping what is needed to rebuild NFA paths.
    pub fn execute_traced(&self, text: &str) -> TracedRun<'_, N, T, CN, CT> {
        TracedRun::new(self, self.dfa.execute_traced(text))
    }

    /// Epsilon transitions of the initial closure.
    pub(crate) fn initial_links(&self) -> &[SourceTransition] {
        &self.initial_links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Nfa, NfaNode, NfaTransition};

    /// Two branches on `a`, one continuing on `b` through an epsilon.
    fn template() -> NfaTemplate<&'static str, &'static str> {
        NfaTemplate::new(vec![
            NfaNode::new("s", true, "s")
                .with_transition(NfaTransition::character("p", 'a', "s-a-p"))
                .with_transition(NfaTransition::character("q", 'a', "s-a-q"))
                .with_transition(NfaTransition::remaining("s", "s-*-s")),
            NfaNode::new("p", false, "p").with_transition(NfaTransition::empty("r", "p-e-r")),
            NfaNode::new("q", false, "q")
                .with_transition(NfaTransition::character("r", 'b', "q-b-r")),
            NfaNode::new("r", false, "r")
                .with_transition(NfaTransition::character("r", 'b', "r-b-r")),
        ])
        .unwrap()
    }

    fn sorted(mut states: Vec<&&'static str>) -> Vec<&'static str> {
        states.sort();
        states.into_iter().map(|s| *s).collect()
    }

    #[test]
    fn test_execute_matches_nfa() {
        let automaton = NfaDfa::new(template()).unwrap();
        let nfa = Nfa::new(template());
        for text in ["", "a", "ab", "abb", "xab", "ba", "abx"] {
            assert_eq!(
                sorted(automaton.execute(text)),
                sorted(nfa.execute(text)),
                "text {text:?}"
            );
        }
    }

    #[test]
    fn test_execute_dfa_traced_exposes_sources() {
        let automaton = NfaDfa::new(template()).unwrap();
        let trace = automaton.execute_dfa_traced("ab");
        assert!(trace.finished);
        assert_eq!(trace.path.len(), 2);
        assert_eq!(automaton.dfa().id(trace.state), "{r}");
        let first = &trace.path[0].transition.sources;
        assert_eq!(first.len(), 3);
        assert!(first[2].is_epsilon());
    }

    #[test]
    fn test_dead_end_yields_nothing() {
        let automaton = NfaDfa::new(template()).unwrap();
        assert!(automaton.execute("abx").is_empty());
    }
}
