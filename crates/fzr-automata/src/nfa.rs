//! Direct NFA simulation.

use std::collections::HashMap;

use crate::{NfaTemplate, StateId, Trigger};

/// A transition reference: target plus index into the owner's transition list.
#[derive(Clone, Copy, Debug)]
struct Edge {
    /// Resolved target.
    to: StateId,
    /// Position in the owning node's transitions.
    transition: usize,
}

/// Outgoing edges of one state, grouped by trigger.
#[derive(Debug, Default)]
struct Edges {
    /// Character transitions.
    by_char: HashMap<char, Vec<Edge>>,
    /// Fallback transitions.
    remaining: Vec<Edge>,
    /// Epsilon transitions.
    empty: Vec<Edge>,
}

/// One consumed or epsilon step of an NFA path.
#[derive(Debug)]
pub struct NfaStep<'a, N, T> {
    /// The state the transition leaves.
    pub from: StateId,
    /// Metadata of the state the transition leaves.
    pub node: &'a N,
    /// Metadata of the transition taken.
    pub transition: &'a T,
}

/// A live state at the end of a traced NFA run, with the first path that reached it.
#[derive(Debug)]
pub struct NfaTrace<'a, N, T> {
    /// The state.
    pub state: StateId,
    /// Metadata of the state.
    pub terminal: &'a N,
    /// Steps from an initial state, epsilon steps included.
    pub path: Vec<NfaStep<'a, N, T>>,
}

/// Path under construction: `(from, transition index)` pairs.
type RawPath = Vec<(StateId, usize)>;

/// Simulates an NFA over its full set of live states.
#[derive(Debug)]
pub struct Nfa<N, T> {
    /// The validated template.
    template: NfaTemplate<N, T>,
    /// Edge index per state.
    edges: Vec<Edges>,
}

impl<N, T> Nfa<N, T> {
    /// Indexes a template for execution.
    pub fn new(template: NfaTemplate<N, T>) -> Self {
        let edges = (0..template.len())
            .map(|index| {
                let id = StateId::new(index);
                let mut edges = Edges::default();
                for (transition, data, to) in template.transitions(id) {
                    let edge = Edge { to, transition };
                    match data.trigger {
                        Trigger::Character(c) => edges.by_char.entry(c).or_default().push(edge),
                        Trigger::Remaining => edges.remaining.push(edge),
                        Trigger::Empty => edges.empty.push(edge),
                    }
                }
                edges
            })
            .collect();
        Self { template, edges }
    }

    /// The underlying template.
    pub fn template(&self) -> &NfaTemplate<N, T> {
        &self.template
    }

    /// Runs the automaton and returns the metadata of every live state, in
    /// discovery order.
    pub fn execute(&self, input: &str) -> Vec<&N> {
        let mut live = self.close(self.template.initial().to_vec());
        for c in input.chars() {
            let mut next = Vec::new();
            let mut seen = vec![false; self.template.len()];
            for &state in &live {
                for edge in self.consuming(state, c) {
                    if !seen[edge.to.index()] {
                        seen[edge.to.index()] = true;
                        next.push(edge.to);
                    }
                }
            }
            live = self.close(next);
        }
        live.into_iter()
            .map(|state| &self.template.node(state).metadata)
            .collect()
    }

    /// Runs the automaton keeping, for every live state, the first path that reached it.
    pub fn execute_traced(&self, input: &str) -> Vec<NfaTrace<'_, N, T>> {
        let initial = self
            .template
            .initial()
            .iter()
            .map(|&state| (state, RawPath::new()))
            .collect();
        let mut live = self.close_traced(initial);
        for c in input.chars() {
            let mut next: Vec<(StateId, RawPath)> = Vec::new();
            let mut seen = vec![false; self.template.len()];
            for (state, path) in &live {
                for edge in self.consuming(*state, c) {
                    if !seen[edge.to.index()] {
                        seen[edge.to.index()] = true;
                        let mut extended = path.clone();
                        extended.push((*state, edge.transition));
                        next.push((edge.to, extended));
                    }
                }
            }
            live = self.close_traced(next);
        }
        live.into_iter()
            .map(|(state, path)| NfaTrace {
                state,
                terminal: &self.template.node(state).metadata,
                path: path
                    .into_iter()
                    .map(|(from, transition)| {
                        let node = self.template.node(from);
                        NfaStep {
                            from,
                            node: &node.metadata,
                            transition: &node.transitions[transition].metadata,
                        }
                    })
                    .collect(),
            })
            .collect()
    }

    /// Edges of `state` that fire on `c`.
    fn consuming(&self, state: StateId, c: char) -> &[Edge] {
        let edges = &self.edges[state.index()];
        edges
            .by_char
            .get(&c)
            .map_or(edges.remaining.as_slice(), Vec::as_slice)
    }

    /// Extends a state list with everything reachable through epsilon transitions.
    fn close(&self, seeds: Vec<StateId>) -> Vec<StateId> {
        let mut seen = vec![false; self.template.len()];
        let mut states = Vec::with_capacity(seeds.len());
        for state in seeds {
            if !seen[state.index()] {
                seen[state.index()] = true;
                states.push(state);
            }
        }
        let mut cursor = 0;
        while cursor < states.len() {
            for edge in &self.edges[states[cursor].index()].empty {
                if !seen[edge.to.index()] {
                    seen[edge.to.index()] = true;
                    states.push(edge.to);
                }
            }
            cursor += 1;
        }
        states
    }

    /// Epsilon closure that extends paths along the way.
    fn close_traced(&self, seeds: Vec<(StateId, RawPath)>) -> Vec<(StateId, RawPath)> {
        let mut seen = vec![false; self.template.len()];
        let mut states = Vec::with_capacity(seeds.len());
        for (state, path) in seeds {
            if !seen[state.index()] {
                seen[state.index()] = true;
                states.push((state, path));
            }
        }
        let mut cursor = 0;
        while cursor < states.len() {
            let state = states[cursor].0;
            for edge in &self.edges[state.index()].empty {
                if !seen[edge.to.index()] {
                    seen[edge.to.index()] = true;
                    let mut path = states[cursor].1.clone();
                    path.push((state, edge.transition));
                    states.push((edge.to, path));
                }
            }
            cursor += 1;
        }
        states
    }
}
