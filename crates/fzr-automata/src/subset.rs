//! Subset construction that remembers where every DFA element came from.
//!
//! Each DFA state records the NFA states it stands for, and each DFA
//! transition records the NFA transitions that produced it: first the
//! consuming transitions, then the epsilon transitions walked while closing
//! the target set.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::{
    DfaNode, DfaTemplate, DfaTransition, DfaTrigger, NfaNode, NfaTemplate, NfaTransition,
    StateId, Trigger, state_set_id,
};

/// An NFA transition identified by its owner and position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceTransition {
    /// State the transition leaves.
    pub from: StateId,
    /// State the transition enters.
    pub to: StateId,
    /// Index into the transitions of `from`.
    pub transition: usize,
    /// The transition's trigger.
    pub trigger: Trigger,
}

impl SourceTransition {
    /// Returns true for epsilon transitions.
    pub const fn is_epsilon(&self) -> bool {
        self.trigger.is_empty()
    }

    /// Metadata of the underlying NFA transition.
    pub fn metadata<'a, N, T>(&self, nfa: &'a NfaTemplate<N, T>) -> &'a T {
        &nfa.node(self.from).transitions[self.transition].metadata
    }
}

/// Metadata of a DFA state built by subset construction.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSources<M> {
    /// NFA states folded into this DFA state, in discovery order.
    pub sources: Vec<StateId>,
    /// Caller-combined metadata.
    pub meta: M,
}

/// Metadata of a DFA transition built by subset construction.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionSources<M> {
    /// Consuming NFA transitions followed by the epsilon transitions of the target closure.
    pub sources: Vec<SourceTransition>,
    /// Caller-combined metadata.
    pub meta: M,
}

/// A DFA template carrying provenance.
pub type ProvenanceTemplate<CN, CT> = DfaTemplate<NodeSources<CN>, TransitionSources<CT>>;

/// Combines NFA metadata into DFA metadata during subset construction.
pub trait ProvenanceMeta<N, T> {
    /// Extra metadata stored on DFA states.
    type Node;
    /// Extra metadata stored on DFA transitions.
    type Transition;

    /// Combines the states folded into one DFA state.
    fn node_meta(&self, sources: &[&NfaNode<N, T>]) -> Self::Node;

    /// Combines the transitions folded into one DFA transition.
    fn transition_meta(&self, sources: &[&NfaTransition<T>]) -> Self::Transition;
}

/// Keeps provenance only.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMeta;

impl<N, T> ProvenanceMeta<N, T> for NoMeta {
    type Node = ();
    type Transition = ();

    fn node_meta(&self, _sources: &[&NfaNode<N, T>]) {}

    fn transition_meta(&self, _sources: &[&NfaTransition<T>]) {}
}

/// An epsilon closure.
#[derive(Debug, Default)]
pub(crate) struct Closure {
    /// States in discovery order, seeds first.
    pub(crate) states: Vec<StateId>,
    /// Every epsilon transition leaving a state of the closure, in closure order.
    pub(crate) links: Vec<SourceTransition>,
}

/// Computes the epsilon closure of `seeds`, deduplicating by state.
pub(crate) fn epsilon_closure<N, T>(
    nfa: &NfaTemplate<N, T>,
    seeds: impl IntoIterator<Item = StateId>,
) -> Closure {
    let mut seen = vec![false; nfa.len()];
    let mut closure = Closure::default();
    for state in seeds {
        if !seen[state.index()] {
            seen[state.index()] = true;
            closure.states.push(state);
        }
    }
    let mut cursor = 0;
    while cursor < closure.states.len() {
        let from = closure.states[cursor];
        for (transition, data, to) in nfa.transitions(from) {
            if !data.trigger.is_empty() {
                continue;
            }
            closure.links.push(SourceTransition {
                from,
                to,
                transition,
                trigger: data.trigger,
            });
            if !seen[to.index()] {
                seen[to.index()] = true;
                closure.states.push(to);
            }
        }
        cursor += 1;
    }
    closure
}

/// Composite ID of an NFA state set.
fn set_id<N, T>(nfa: &NfaTemplate<N, T>, states: &[StateId]) -> String {
    state_set_id(states.iter().map(|&state| nfa.node(state).id.as_str()))
}

/// Distinct characters with a dedicated transition out of `states`, in order of appearance.
fn available_characters<N, T>(nfa: &NfaTemplate<N, T>, states: &[StateId]) -> Vec<char> {
    let mut seen = HashSet::new();
    let mut characters = Vec::new();
    for &state in states {
        for transition in &nfa.node(state).transitions {
            if let Trigger::Character(c) = transition.trigger {
                if seen.insert(c) {
                    characters.push(c);
                }
            }
        }
    }
    characters
}

/// Converts an NFA into a DFA that keeps provenance only.
pub fn convert_nfa_to_dfa<N, T>(nfa: &NfaTemplate<N, T>) -> ProvenanceTemplate<(), ()> {
    convert_nfa_to_dfa_with(nfa, &NoMeta)
}

/// Converts an NFA into a DFA, combining metadata with `meta`.
///
/// States are materialized breadth first from the closure of the initial
/// states, which becomes the template's initial state. For a character `c`
/// every NFA state contributes its `c` transitions, or its `Remaining`
/// transitions when it has none for `c`. Each DFA state also gets a
/// `Remaining` transition gathering all `Remaining` NFA transitions; the
/// empty set `{}` therefore loops on itself.
pub fn convert_nfa_to_dfa_with<N, T, M>(
    nfa: &NfaTemplate<N, T>,
    meta: &M,
) -> ProvenanceTemplate<M::Node, M::Transition>
where
    M: ProvenanceMeta<N, T>,
{
    let initial = epsilon_closure(nfa, nfa.initial().iter().copied()).states;
    let initial_id = set_id(nfa, &initial);

    let mut materialized = HashSet::new();
    let mut nodes = Vec::new();
    let mut queue = VecDeque::from([initial]);
    while let Some(states) = queue.pop_front() {
        let id = set_id(nfa, &states);
        if !materialized.insert(id.clone()) {
            continue;
        }

        let mut transitions = Vec::new();
        for c in available_characters(nfa, &states) {
            let (transition, target) = subset_transition(nfa, &states, Some(c), meta);
            transitions.push(transition);
            queue.push_back(target);
        }
        let (transition, target) = subset_transition(nfa, &states, None, meta);
        transitions.push(transition);
        queue.push_back(target);

        let folded: Vec<&NfaNode<N, T>> = states.iter().map(|&state| nfa.node(state)).collect();
        nodes.push(DfaNode {
            id,
            transitions,
            metadata: NodeSources {
                meta: meta.node_meta(&folded),
                sources: states,
            },
        });
    }

    debug!(
        nfa_states = nfa.len(),
        dfa_states = nodes.len(),
        "subset construction finished"
    );
    DfaTemplate {
        nodes,
        initial: initial_id,
    }
}

/// Builds the DFA transition out of `states` on `character` (or the fallback
/// when `None`) and returns it together with the target set.
fn subset_transition<N, T, M>(
    nfa: &NfaTemplate<N, T>,
    states: &[StateId],
    character: Option<char>,
    meta: &M,
) -> (DfaTransition<TransitionSources<M::Transition>>, Vec<StateId>)
where
    M: ProvenanceMeta<N, T>,
{
    let mut fired = Vec::new();
    for &from in states {
        let dedicated = character.is_some_and(|c| {
            nfa.node(from)
                .transitions
                .iter()
                .any(|transition| transition.trigger == Trigger::Character(c))
        });
        let wanted = match character {
            Some(c) if dedicated => Trigger::Character(c),
            _ => Trigger::Remaining,
        };
        fired.extend(
            nfa.transitions(from)
                .filter(|(_, data, _)| data.trigger == wanted)
                .map(|(transition, data, to)| SourceTransition {
                    from,
                    to,
                    transition,
                    trigger: data.trigger,
                }),
        );
    }

    let closure = epsilon_closure(nfa, fired.iter().map(|source| source.to));
    let mut sources = fired;
    sources.extend(closure.links);

    let folded: Vec<&NfaTransition<T>> = sources
        .iter()
        .map(|source| &nfa.node(source.from).transitions[source.transition])
        .collect();
    let transition = DfaTransition {
        to: set_id(nfa, &closure.states),
        trigger: character.map_or(DfaTrigger::Remaining, DfaTrigger::Character),
        metadata: TransitionSources {
            meta: meta.transition_meta(&folded),
            sources,
        },
    };
    (transition, closure.states)
}
