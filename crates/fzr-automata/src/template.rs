//! Declarative automaton templates.
//!
//! Templates are plain data describing states and transitions by string ID.
//! [`NfaTemplate::new`] validates a node list and resolves every ID into a
//! dense [`StateId`], which the engines use from then on.

use std::collections::HashMap;

use crate::{AutomatonError, StateId};

/// What makes an NFA transition fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Consumes exactly this character.
    Character(char),
    /// Consumes any character the owning state has no `Character` transition for.
    Remaining,
    /// Fires without consuming input.
    Empty,
}

impl Trigger {
    /// Returns true for transitions that consume no input.
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A transition of an NFA template.
#[derive(Clone, Debug, PartialEq)]
pub struct NfaTransition<T> {
    /// ID of the target state.
    pub to: String,
    /// Firing condition.
    pub trigger: Trigger,
    /// Caller-defined data carried by the transition.
    pub metadata: T,
}

impl<T> NfaTransition<T> {
    /// Creates a transition consuming `character`.
    pub fn character(to: impl Into<String>, character: char, metadata: T) -> Self {
        Self {
            to: to.into(),
            trigger: Trigger::Character(character),
            metadata,
        }
    }

    /// Creates a fallback transition consuming any otherwise unhandled character.
    pub fn remaining(to: impl Into<String>, metadata: T) -> Self {
        Self {
            to: to.into(),
            trigger: Trigger::Remaining,
            metadata,
        }
    }

    /// Creates an epsilon transition.
    pub fn empty(to: impl Into<String>, metadata: T) -> Self {
        Self {
            to: to.into(),
            trigger: Trigger::Empty,
            metadata,
        }
    }
}

/// A state of an NFA template.
#[derive(Clone, Debug, PartialEq)]
pub struct NfaNode<N, T> {
    /// Unique state ID.
    pub id: String,
    /// Whether execution starts in this state.
    pub initial: bool,
    /// Outgoing transitions, in priority order.
    pub transitions: Vec<NfaTransition<T>>,
    /// Caller-defined data carried by the state.
    pub metadata: N,
}

impl<N, T> NfaNode<N, T> {
    /// Creates a state without transitions.
    pub fn new(id: impl Into<String>, initial: bool, metadata: N) -> Self {
        Self {
            id: id.into(),
            initial,
            transitions: Vec::new(),
            metadata,
        }
    }

    /// Appends a transition.
    #[must_use]
    pub fn with_transition(mut self, transition: NfaTransition<T>) -> Self {
        self.transitions.push(transition);
        self
    }
}

/// A validated NFA.
///
/// Node order is preserved; the [`StateId`] of a node is its position in the
/// list handed to [`NfaTemplate::new`].
#[derive(Clone, Debug)]
pub struct NfaTemplate<N, T> {
    /// States in declaration order.
    nodes: Vec<NfaNode<N, T>>,
    /// Resolved target of every transition, parallel to `nodes[i].transitions`.
    targets: Vec<Vec<StateId>>,
    /// String ID to arena index.
    lookup: HashMap<String, StateId>,
    /// Initial states in declaration order.
    initial: Vec<StateId>,
}

impl<N, T> NfaTemplate<N, T> {
    /// Validates a node list.
    ///
    /// Fails when IDs repeat, when a transition targets an unknown ID, or when
    /// no node is marked initial.
    pub fn new(nodes: Vec<NfaNode<N, T>>) -> Result<Self, AutomatonError> {
        let mut lookup = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if lookup.insert(node.id.clone(), StateId::new(index)).is_some() {
                return Err(AutomatonError::DuplicateState {
                    id: node.id.clone(),
                });
            }
        }

        let targets = nodes
            .iter()
            .map(|node| {
                node.transitions
                    .iter()
                    .map(|transition| {
                        lookup.get(&transition.to).copied().ok_or_else(|| {
                            AutomatonError::UnknownState {
                                from: node.id.clone(),
                                to: transition.to.clone(),
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let initial: Vec<StateId> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.initial)
            .map(|(index, _)| StateId::new(index))
            .collect();
        if initial.is_empty() {
            return Err(AutomatonError::MissingInitialState);
        }

        Ok(Self {
            nodes,
            targets,
            lookup,
            initial,
        })
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the template has no states. Never true for a validated template.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All states in declaration order.
    pub fn nodes(&self) -> &[NfaNode<N, T>] {
        &self.nodes
    }

    /// The state behind `id`.
    pub fn node(&self, id: StateId) -> &NfaNode<N, T> {
        &self.nodes[id.index()]
    }

    /// Looks up a state by its string ID.
    pub fn id_of(&self, id: &str) -> Option<StateId> {
        self.lookup.get(id).copied()
    }

    /// The initial states.
    pub fn initial(&self) -> &[StateId] {
        &self.initial
    }

    /// Resolved target of transition `transition` of state `id`.
    pub fn target(&self, id: StateId, transition: usize) -> StateId {
        self.targets[id.index()][transition]
    }

    /// Outgoing transitions of `id` together with their index and resolved target.
    pub fn transitions(
        &self,
        id: StateId,
    ) -> impl Iterator<Item = (usize, &NfaTransition<T>, StateId)> {
        self.nodes[id.index()]
            .transitions
            .iter()
            .zip(&self.targets[id.index()])
            .enumerate()
            .map(|(index, (transition, &to))| (index, transition, to))
    }
}

/// What makes a DFA transition fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DfaTrigger {
    /// Consumes exactly this character.
    Character(char),
    /// Consumes any character without a dedicated transition.
    Remaining,
}

/// A transition of a DFA template.
#[derive(Clone, Debug, PartialEq)]
pub struct DfaTransition<T> {
    /// ID of the target state.
    pub to: String,
    /// Firing condition.
    pub trigger: DfaTrigger,
    /// Caller-defined data carried by the transition.
    pub metadata: T,
}

/// A state of a DFA template.
#[derive(Clone, Debug, PartialEq)]
pub struct DfaNode<N, T> {
    /// Unique state ID.
    pub id: String,
    /// Outgoing transitions.
    pub transitions: Vec<DfaTransition<T>>,
    /// Caller-defined data carried by the state.
    pub metadata: N,
}

/// A DFA description: nodes plus the ID of the initial one.
#[derive(Clone, Debug, PartialEq)]
pub struct DfaTemplate<N, T> {
    /// All states. The first materialized state is the initial one for
    /// templates produced by subset construction.
    pub nodes: Vec<DfaNode<N, T>>,
    /// ID of the initial state.
    pub initial: String,
}

impl<N, T> DfaTemplate<N, T> {
    /// Finds a node by ID.
    pub fn node(&self, id: &str) -> Option<&DfaNode<N, T>> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, initial: bool) -> NfaNode<(), ()> {
        NfaNode::new(id, initial, ())
    }

    #[test]
    fn test_template_resolves_targets() {
        let template = NfaTemplate::new(vec![
            node("a", true)
                .with_transition(NfaTransition::character("b", 'x', ()))
                .with_transition(NfaTransition::empty("a", ())),
            node("b", false),
        ])
        .unwrap();

        let a = template.id_of("a").unwrap();
        let b = template.id_of("b").unwrap();
        assert_eq!(template.initial(), &[a]);
        assert_eq!(template.target(a, 0), b);
        assert_eq!(template.target(a, 1), a);
        let triggers: Vec<Trigger> = template.transitions(a).map(|(_, t, _)| t.trigger).collect();
        assert_eq!(triggers, vec![Trigger::Character('x'), Trigger::Empty]);
    }

    #[test]
    fn test_template_missing_initial() {
        let err = NfaTemplate::new(vec![node("a", false)]).unwrap_err();
        assert_eq!(err, AutomatonError::MissingInitialState);
        assert_eq!(err.to_string(), "initial state can't be found");
    }

    #[test]
    fn test_template_unknown_target() {
        let nodes = vec![node("a", true).with_transition(NfaTransition::remaining("z", ()))];
        let err = NfaTemplate::new(nodes).unwrap_err();
        assert_eq!(
            err,
            AutomatonError::UnknownState {
                from: "a".into(),
                to: "z".into()
            }
        );
    }

    #[test]
    fn test_template_duplicate_id() {
        let err = NfaTemplate::new(vec![node("a", true), node("a", false)]).unwrap_err();
        assert!(matches!(err, AutomatonError::DuplicateState { id } if id == "a"));
    }
}
