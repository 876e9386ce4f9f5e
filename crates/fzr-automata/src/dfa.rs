//! Deterministic execution.

use std::collections::HashMap;

use crate::{AutomatonError, DfaTemplate, DfaTrigger, StateId};

/// A resolved DFA state.
#[derive(Debug)]
struct DfaState<N, T> {
    /// ID from the template.
    id: String,
    /// State metadata.
    metadata: N,
    /// Outgoing transitions: resolved target and metadata.
    transitions: Vec<(StateId, T)>,
    /// Character to index into `transitions`.
    by_char: HashMap<char, usize>,
    /// Index of the fallback transition, if any.
    remaining: Option<usize>,
}

/// One step of a DFA trace.
#[derive(Debug)]
pub struct DfaStep<'a, N, T> {
    /// Metadata of the state the character was read in.
    pub node: &'a N,
    /// Metadata of the transition taken.
    pub transition: &'a T,
}

/// Result of a traced DFA run.
#[derive(Debug)]
pub struct DfaTrace<'a, N, T> {
    /// False when a character had no transition and the run stopped early.
    pub finished: bool,
    /// The state the run ended in.
    pub state: StateId,
    /// Metadata of that state.
    pub terminal: &'a N,
    /// One step per consumed character.
    pub path: Vec<DfaStep<'a, N, T>>,
}

/// A deterministic automaton over `char` input.
#[derive(Debug)]
pub struct Dfa<N, T> {
    /// States in template order.
    states: Vec<DfaState<N, T>>,
    /// Initial state.
    initial: StateId,
}

impl<N, T> Dfa<N, T> {
    /// Resolves a template.
    ///
    /// When a node lists several transitions for the same trigger the first
    /// one is kept.
    pub fn new(template: DfaTemplate<N, T>) -> Result<Self, AutomatonError> {
        let mut lookup = HashMap::with_capacity(template.nodes.len());
        for (index, node) in template.nodes.iter().enumerate() {
            if lookup.insert(node.id.clone(), StateId::new(index)).is_some() {
                return Err(AutomatonError::DuplicateState {
                    id: node.id.clone(),
                });
            }
        }
        let initial = *lookup
            .get(&template.initial)
            .ok_or(AutomatonError::MissingInitialState)?;

        let mut states = Vec::with_capacity(template.nodes.len());
        for node in template.nodes {
            let mut transitions = Vec::with_capacity(node.transitions.len());
            let mut by_char = HashMap::new();
            let mut remaining = None;
            for transition in node.transitions {
                let to = *lookup.get(&transition.to).ok_or_else(|| {
                    AutomatonError::UnknownState {
                        from: node.id.clone(),
                        to: transition.to.clone(),
                    }
                })?;
                let index = transitions.len();
                match transition.trigger {
                    DfaTrigger::Character(c) => {
                        by_char.entry(c).or_insert(index);
                    }
                    DfaTrigger::Remaining => {
                        remaining.get_or_insert(index);
                    }
                }
                transitions.push((to, transition.metadata));
            }
            states.push(DfaState {
                id: node.id,
                metadata: node.metadata,
                transitions,
                by_char,
                remaining,
            });
        }
        Ok(Self { states, initial })
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the automaton has no states. Never true for a resolved DFA.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The initial state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Template ID of a state.
    pub fn id(&self, state: StateId) -> &str {
        &self.states[state.index()].id
    }

    /// Metadata of a state.
    pub fn metadata(&self, state: StateId) -> &N {
        &self.states[state.index()].metadata
    }

    /// Runs the automaton; `None` when some character has no transition.
    pub fn execute(&self, input: &str) -> Option<&N> {
        let mut state = self.initial;
        for c in input.chars() {
            let (to, _) = self.step(state, c)?;
            state = *to;
        }
        Some(&self.states[state.index()].metadata)
    }

    /// Runs the automaton recording every step.
    ///
    /// On a missing transition the trace stops with `finished` set to false
    /// and `terminal` naming the state the run got stuck in.
    pub fn execute_traced(&self, input: &str) -> DfaTrace<'_, N, T> {
        let mut state = self.initial;
        let mut path = Vec::new();
        let mut finished = true;
        for c in input.chars() {
            let Some((to, transition)) = self.step(state, c) else {
                finished = false;
                break;
            };
            path.push(DfaStep {
                node: &self.states[state.index()].metadata,
                transition,
            });
            state = *to;
        }
        DfaTrace {
            finished,
            state,
            terminal: &self.states[state.index()].metadata,
            path,
        }
    }

    /// The transition taken from `state` on `c`.
    fn step(&self, state: StateId, c: char) -> Option<&(StateId, T)> {
        let current = &self.states[state.index()];
        current
            .by_char
            .get(&c)
            .copied()
            .or(current.remaining)
            .map(|index| &current.transitions[index])
    }
}
