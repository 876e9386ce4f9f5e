//! Levenshtein NFA construction.

use fzr_automata::{AutomatonError, NfaNode, NfaTemplate, NfaTransition};

use super::{FuzzyNodeData, FuzzyTransitionData, StepKind};

/// NFA template type produced by [`create_fuzzy_nfa_template`].
pub type FuzzyTemplate = NfaTemplate<FuzzyNodeData, FuzzyTransitionData>;

/// ID of the state before any query character was consumed.
pub const START_STATE: &str = "start:0";

/// Builds the edit-distance NFA for `query`.
///
/// States form a grid of query position (after `i + 1` characters) by edits
/// spent, plus [`START_STATE`]. From every state:
///
/// - the next query character advances the position (`match`);
/// - with edits left, an epsilon (`skip`) or any other character (`replace`)
///   advances the position at the cost of one edit;
/// - inside the query, any other character costs one edit without advancing (`insert`);
/// - the start state loops on every character (`ignore`);
/// - completed states loop on every character, or with `restart_on_match`
///   return to the start through an epsilon (`restart`) instead.
pub fn create_fuzzy_nfa_template(
    query: &str,
    max_distance: u32,
    restart_on_match: bool,
) -> Result<FuzzyTemplate, AutomatonError> {
    let chars: Vec<char> = query.chars().collect();
    let builder = GridBuilder {
        chars: &chars,
        max_distance,
        restart_on_match,
    };

    let mut nodes = vec![builder.node(0, None)];
    for distance in 0..=max_distance {
        for position in 0..chars.len() {
            nodes.push(builder.node(distance, Some(position)));
        }
    }
    NfaTemplate::new(nodes)
}

/// Shared parameters of one grid.
struct GridBuilder<'a> {
    /// Query characters.
    chars: &'a [char],
    /// Highest distance row.
    max_distance: u32,
    /// Completed states return to the start instead of looping.
    restart_on_match: bool,
}

impl GridBuilder<'_> {
    /// ID of the state at `position` (`None` for start) and `distance`.
    fn id(&self, distance: u32, position: Option<usize>) -> String {
        match position {
            None => START_STATE.to_string(),
            Some(position) => {
                let prefix: String = self.chars[..=position].iter().collect();
                format!("{position}:{prefix}-{distance}")
            }
        }
    }

    /// The state at `position` and `distance` with its transitions.
    fn node(
        &self,
        distance: u32,
        position: Option<usize>,
    ) -> NfaNode<FuzzyNodeData, FuzzyTransitionData> {
        let consumed = position.map_or(0, |p| p + 1);
        let metadata = FuzzyNodeData {
            matched: consumed == self.chars.len(),
            distance,
            search_index: consumed,
        };
        NfaNode {
            id: self.id(distance, position),
            initial: position.is_none(),
            transitions: self.transitions(distance, position),
            metadata,
        }
    }

    /// Outgoing transitions, in priority order.
    fn transitions(
        &self,
        distance: u32,
        position: Option<usize>,
    ) -> Vec<NfaTransition<FuzzyTransitionData>> {
        let next = position.map_or(0, |p| p + 1);
        let next_char = self.chars.get(next).copied();
        let has_budget = distance < self.max_distance;
        let here = self.id(distance, position);
        let data = |kind, character| FuzzyTransitionData {
            kind,
            character,
            index: next,
        };

        let mut transitions = Vec::new();
        if let Some(c) = next_char {
            let advanced = self.id(distance, Some(next));
            transitions.push(NfaTransition::character(
                advanced,
                c,
                data(StepKind::Match, Some(c)),
            ));
            if has_budget {
                let edited = self.id(distance + 1, Some(next));
                transitions.push(NfaTransition::empty(
                    edited.clone(),
                    data(StepKind::Skip, Some(c)),
                ));
                transitions.push(NfaTransition::remaining(
                    edited,
                    data(StepKind::Replace, Some(c)),
                ));
            }
        }
        if let Some(p) = position {
            if has_budget && p + 1 < self.chars.len() {
                transitions.push(NfaTransition::remaining(
                    self.id(distance + 1, position),
                    data(StepKind::Insert, None),
                ));
            }
        } else {
            transitions.push(NfaTransition::remaining(
                here.clone(),
                data(StepKind::Ignore, None),
            ));
            if let Some(c) = next_char {
                transitions.push(NfaTransition::character(
                    here.clone(),
                    c,
                    data(StepKind::Ignore, None),
                ));
            }
        }
        if next == self.chars.len() {
            if self.restart_on_match {
                transitions.push(NfaTransition::empty(
                    self.id(0, None),
                    data(StepKind::Restart, None),
                ));
            } else {
                transitions.push(NfaTransition::remaining(here, data(StepKind::Ignore, None)));
            }
        }
        transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fzr_automata::{StateId, Trigger};

    fn describe(template: &FuzzyTemplate, id: &str) -> Vec<(String, Trigger, StepKind)> {
        let state: StateId = template.id_of(id).unwrap();
        template
            .transitions(state)
            .map(|(_, t, to)| (template.node(to).id.clone(), t.trigger, t.metadata.kind))
            .collect()
    }

    #[test]
    fn test_state_ids_and_metadata() {
        let template = create_fuzzy_nfa_template("ab", 1, false).unwrap();
        let ids: Vec<&str> = template.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["start:0", "0:a-0", "1:ab-0", "0:a-1", "1:ab-1"]);
        let start = &template.nodes()[0];
        assert!(start.initial);
        assert_eq!(start.metadata, FuzzyNodeData::default());
        let done = &template.nodes()[4].metadata;
        assert!(done.matched);
        assert_eq!(done.distance, 1);
        assert_eq!(done.search_index, 2);
    }

    #[test]
    fn test_start_transitions() {
        let template = create_fuzzy_nfa_template("ab", 1, false).unwrap();
        assert_eq!(
            describe(&template, "start:0"),
            vec![
                ("0:a-0".into(), Trigger::Character('a'), StepKind::Match),
                ("0:a-1".into(), Trigger::Empty, StepKind::Skip),
                ("0:a-1".into(), Trigger::Remaining, StepKind::Replace),
                ("start:0".into(), Trigger::Remaining, StepKind::Ignore),
                ("start:0".into(), Trigger::Character('a'), StepKind::Ignore),
            ]
        );
    }

    #[test]
    fn test_inner_transitions() {
        let template = create_fuzzy_nfa_template("ab", 1, false).unwrap();
        assert_eq!(
            describe(&template, "0:a-0"),
            vec![
                ("1:ab-0".into(), Trigger::Character('b'), StepKind::Match),
                ("1:ab-1".into(), Trigger::Empty, StepKind::Skip),
                ("1:ab-1".into(), Trigger::Remaining, StepKind::Replace),
                ("0:a-1".into(), Trigger::Remaining, StepKind::Insert),
            ]
        );
        // Out of budget: only the exact match remains.
        assert_eq!(
            describe(&template, "0:a-1"),
            vec![("1:ab-1".into(), Trigger::Character('b'), StepKind::Match)]
        );
    }

    #[test]
    fn test_completed_state_loops_or_restarts() {
        let looping = create_fuzzy_nfa_template("ab", 1, false).unwrap();
        assert_eq!(
            describe(&looping, "1:ab-0"),
            vec![("1:ab-0".into(), Trigger::Remaining, StepKind::Ignore)]
        );
        let restarting = create_fuzzy_nfa_template("ab", 1, true).unwrap();
        assert_eq!(
            describe(&restarting, "1:ab-1"),
            vec![("start:0".into(), Trigger::Empty, StepKind::Restart)]
        );
    }

    #[test]
    fn test_transition_indices() {
        let template = create_fuzzy_nfa_template("abc", 0, false).unwrap();
        let indices: Vec<usize> = template
            .nodes()
            .iter()
            .map(|node| node.transitions[0].metadata.index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_unicode_query() {
        let template = create_fuzzy_nfa_template("çé", 0, false).unwrap();
        assert!(template.id_of("1:çé-0").is_some());
        assert!(template.nodes()[2].metadata.matched);
    }
}
