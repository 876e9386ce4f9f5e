//! Matching every occurrence of a word.

use std::{collections::HashSet, mem};

use fzr_automata::{
    DfaTrace, NfaDfa, NfaNode, NfaTemplate, NfaTransition, NodeSources, ProvenanceMeta,
    SourceTransition, StateId, TransitionChooser, TransitionSources, Trigger,
};
use serde::Serialize;
use tracing::debug;

use super::{
    Alteration, FuzzyNodeData, FuzzyTransitionData, StepKind, alterations::align,
    template::{FuzzyTemplate, create_fuzzy_nfa_template},
};
use crate::MatchError;

/// One occurrence found by [`FuzzyMultiWordMatcher::get_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Character position just past the occurrence.
    pub end_index: usize,
    /// Edits of the occurrence.
    pub distance: u32,
}

/// Alignment of every occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MultiMatchData {
    /// Edits per occurrence, in text order.
    pub distances: Vec<u32>,
    /// Alignment of the whole text.
    pub alterations: Vec<Alteration>,
}

/// DFA state data: the best completed NFA state folded into it.
struct BestMatched;

impl ProvenanceMeta<FuzzyNodeData, FuzzyTransitionData> for BestMatched {
    type Node = FuzzyNodeData;
    type Transition = ();

    fn node_meta(
        &self,
        sources: &[&NfaNode<FuzzyNodeData, FuzzyTransitionData>],
    ) -> FuzzyNodeData {
        sources
            .iter()
            .map(|node| node.metadata)
            .filter(|data| data.matched)
            .min_by_key(|data| data.distance)
            .unwrap_or_default()
    }

    fn transition_meta(&self, _sources: &[&NfaTransition<FuzzyTransitionData>]) {}
}

/// Trace type of the compiled automaton.
type MultiTrace<'a> = DfaTrace<'a, NodeSources<FuzzyNodeData>, TransitionSources<()>>;

/// Finds every fuzzy occurrence of a word.
///
/// Consecutive text positions that complete a match belong to one
/// occurrence, reported at the position with the lowest distance (the
/// rightmost one on ties).
///
/// # Example
///
/// ```
/// use fzr_match::FuzzyMultiWordMatcher;
///
/// let matcher = FuzzyMultiWordMatcher::new("oranges", 2).unwrap();
/// let found = matcher.get_match("I like orangs with oranges");
/// let distances: Vec<u32> = found.iter().map(|o| o.distance).collect();
/// assert_eq!(distances, vec![1, 0]);
/// ```
#[derive(Debug)]
pub struct FuzzyMultiWordMatcher {
    /// The query word.
    word: String,
    /// Edits allowed.
    max_distance: u32,
    /// Compiled automaton; completed states restart.
    automaton: NfaDfa<FuzzyNodeData, FuzzyTransitionData, FuzzyNodeData, ()>,
}

impl FuzzyMultiWordMatcher {
    /// Compiles a matcher for `word` allowing `max_distance` edits.
    pub fn new(word: impl Into<String>, max_distance: u32) -> Result<Self, MatchError> {
        let word = word.into();
        let template = create_fuzzy_nfa_template(&word, max_distance, true)?;
        let automaton = NfaDfa::with_meta(template, &BestMatched)?;
        debug!(
            word = %word,
            max_distance,
            dfa_states = automaton.dfa().len(),
            "built multi-word matcher"
        );
        Ok(Self {
            word,
            max_distance,
            automaton,
        })
    }

    /// The query word.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Edits allowed.
    pub const fn max_distance(&self) -> u32 {
        self.max_distance
    }

    /// Every occurrence in `text`, in text order.
    pub fn get_match(&self, text: &str) -> Vec<Occurrence> {
        occurrences(&self.automaton.execute_dfa_traced(text))
    }

    /// Every occurrence in `text` with the alignment of the whole text.
    ///
    /// Occurrences are aligned one after the other, so `distances` follows
    /// [`Self::get_match`]. An occurrence whose best alignment overlaps the
    /// previous occurrence is aligned with the fewest edits that avoid the
    /// overlap, or left out when that exceeds the allowed edits. Without any
    /// occurrence the alignment ignores every character.
    pub fn get_match_data(&self, text: &str) -> MultiMatchData {
        let run = self.automaton.execute_traced(text);
        let chars: Vec<char> = text.chars().collect();
        let segments = segments(self.automaton.nfa(), &chars, &occurrences(run.dfa_trace()));

        // The path ends in the occurrence closing the text, or in the start
        // state when the text goes on after the last occurrence.
        let traces = run.traces();
        let closing = segments
            .last()
            .and_then(|segment| segment.closing.map(|distance| (segment, distance)));
        let best = match closing {
            Some((segment, distance)) => traces.iter().find(|trace| {
                trace.terminal.matched
                    && trace.terminal.distance == distance
                    && segment.allows(chars.len(), trace.state)
            }),
            None => traces.iter().find(|trace| trace.terminal.search_index == 0),
        };
        let Some(best) = best else {
            return MultiMatchData::default();
        };

        let mut chooser = OccurrenceBoundaries {
            current: segments.len().saturating_sub(1),
            segments,
        };
        let alignment = align(&best.path_with(&mut chooser), &chars);
        let mut distances = alignment.restarts;
        if best.terminal.matched {
            distances.push(best.terminal.distance);
        }
        MultiMatchData {
            distances,
            alterations: alignment.alterations,
        }
    }
}

/// Distance of the best completed NFA state in a DFA state.
fn completed(state: &NodeSources<FuzzyNodeData>) -> Option<u32> {
    state.meta.matched.then_some(state.meta.distance)
}

/// The best position of every run of completed positions in `trace`.
///
/// Runs are scanned backwards, so the rightmost position wins ties.
fn occurrences(trace: &MultiTrace<'_>) -> Vec<Occurrence> {
    let mut found = Vec::new();
    let mut best = completed(trace.terminal).map(|distance| Occurrence {
        end_index: trace.path.len(),
        distance,
    });
    for (end_index, step) in trace.path.iter().enumerate().rev() {
        match completed(step.node) {
            Some(distance) => {
                if best.is_none_or(|b| b.distance > distance) {
                    best = Some(Occurrence {
                        end_index,
                        distance,
                    });
                }
            }
            None => found.extend(best.take()),
        }
    }
    found.extend(best);
    found.reverse();
    found
}

/// A stretch of text ending with one occurrence, or the text after the last
/// occurrence.
#[derive(Debug)]
struct Segment {
    /// Position the segment starts at; the previous occurrence ends here.
    start: usize,
    /// NFA states live at each position from `start` on, without restarting.
    live: Vec<HashSet<StateId>>,
    /// Distance of the occurrence ending the segment.
    closing: Option<u32>,
}

impl Segment {
    /// Whether the path may be in `state` after `position` characters.
    fn allows(&self, position: usize, state: StateId) -> bool {
        position
            .checked_sub(self.start)
            .and_then(|offset| self.live.get(offset))
            .is_some_and(|live| live.contains(&state))
    }
}

/// Splits `chars` into segments, one per occurrence in `found` that can be
/// aligned after the previous one.
///
/// A segment closes with the lowest distance reachable from its start. That
/// is the occurrence's own distance unless its alignments overlap the
/// previous occurrence; an occurrence that cannot close at all is merged
/// into the next segment.
fn segments(nfa: &FuzzyTemplate, chars: &[char], found: &[Occurrence]) -> Vec<Segment> {
    let initial = closure(nfa, nfa.initial().iter().copied());
    let mut segments = Vec::new();
    let mut start = 0;
    let mut live = vec![initial.clone()];
    for occurrence in found {
        extend(nfa, chars, start, &mut live, occurrence.end_index);
        let closing = live.last().and_then(|states| {
            states
                .iter()
                .map(|&state| nfa.node(state).metadata)
                .filter(|data| data.matched)
                .map(|data| data.distance)
                .min()
        });
        if closing.is_some() {
            segments.push(Segment {
                start,
                live: mem::replace(&mut live, vec![initial.clone()]),
                closing,
            });
            start = occurrence.end_index;
        }
    }
    if segments.is_empty() || start < chars.len() {
        extend(nfa, chars, start, &mut live, chars.len());
        segments.push(Segment {
            start,
            live,
            closing: None,
        });
    }
    segments
}

/// Advances `live`, which starts at `start`, until it covers position `end`.
fn extend(
    nfa: &FuzzyTemplate,
    chars: &[char],
    start: usize,
    live: &mut Vec<HashSet<StateId>>,
    end: usize,
) {
    let from = start + live.len().saturating_sub(1);
    for &c in chars.get(from..end).unwrap_or_default() {
        let next = live
            .last()
            .map(|states| advance(nfa, states, c))
            .unwrap_or_default();
        live.push(next);
    }
}

/// States reached from `live` by consuming `c`.
fn advance(nfa: &FuzzyTemplate, live: &HashSet<StateId>, c: char) -> HashSet<StateId> {
    let mut targets = Vec::new();
    for &state in live {
        let dedicated = nfa
            .transitions(state)
            .any(|(_, transition, _)| transition.trigger == Trigger::Character(c));
        let wanted = if dedicated {
            Trigger::Character(c)
        } else {
            Trigger::Remaining
        };
        targets.extend(
            nfa.transitions(state)
                .filter(|(_, transition, _)| transition.trigger == wanted)
                .map(|(_, _, to)| to),
        );
    }
    closure(nfa, targets)
}

/// States reachable from `seeds` through epsilon transitions other than
/// `restart`.
fn closure(nfa: &FuzzyTemplate, seeds: impl IntoIterator<Item = StateId>) -> HashSet<StateId> {
    let mut stack: Vec<StateId> = seeds.into_iter().collect();
    let mut live: HashSet<StateId> = stack.iter().copied().collect();
    while let Some(state) = stack.pop() {
        for (_, transition, to) in nfa.transitions(state) {
            if transition.trigger.is_empty()
                && transition.metadata.kind != StepKind::Restart
                && live.insert(to)
            {
                stack.push(to);
            }
        }
    }
    live
}

/// Keeps the reconstructed path inside the segments, leaving each one
/// backwards through the `restart` of the previous occurrence.
struct OccurrenceBoundaries {
    /// Segments in text order.
    segments: Vec<Segment>,
    /// Segment the path is in.
    current: usize,
}

impl OccurrenceBoundaries {
    /// Whether taking `candidate` at `step` keeps the path reconstructible.
    fn accepts(&self, step: usize, candidate: &SourceTransition, nfa: &FuzzyTemplate) -> bool {
        let position = step + usize::from(candidate.is_epsilon());
        let Some(segment) = self.segments.get(self.current) else {
            return false;
        };
        if candidate.metadata(nfa).kind != StepKind::Restart {
            return segment.allows(position, candidate.from);
        }
        let previous = self
            .current
            .checked_sub(1)
            .and_then(|index| self.segments.get(index));
        previous.is_some_and(|previous| {
            position == segment.start
                && previous.closing == Some(nfa.node(candidate.from).metadata.distance)
                && previous.allows(position, candidate.from)
        })
    }
}

impl TransitionChooser<FuzzyNodeData, FuzzyTransitionData> for OccurrenceBoundaries {
    fn choose(
        &mut self,
        step: usize,
        candidates: &[SourceTransition],
        nfa: &NfaTemplate<FuzzyNodeData, FuzzyTransitionData>,
    ) -> Option<SourceTransition> {
        let Some(&chosen) = candidates
            .iter()
            .find(|candidate| self.accepts(step, candidate, nfa))
        else {
            return candidates.first().copied();
        };
        if chosen.metadata(nfa).kind == StepKind::Restart {
            self.current = self.current.saturating_sub(1);
        }
        Some(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{alteration_codes, fixtures::ORANGES};

    fn distances(matcher: &FuzzyMultiWordMatcher, text: &str) -> Vec<u32> {
        matcher.get_match(text).iter().map(|o| o.distance).collect()
    }

    #[test]
    fn test_exact_occurrences() {
        let matcher = FuzzyMultiWordMatcher::new("oranges", 2).unwrap();
        assert_eq!(
            matcher.get_match("I like oranges and all oranges"),
            vec![
                Occurrence {
                    end_index: 14,
                    distance: 0
                },
                Occurrence {
                    end_index: 30,
                    distance: 0
                },
            ]
        );
        assert!(matcher.get_match("Potatoes are amazing").is_empty());
    }

    #[test]
    fn test_distance_grid() {
        for max in 0..4 {
            let matcher = FuzzyMultiWordMatcher::new("oranges", max).unwrap();
            for (distance, texts) in ORANGES {
                let expected: Vec<u32> = distance.filter(|&d| d <= max).into_iter().collect();
                for text in texts {
                    assert_eq!(
                        distances(&matcher, text),
                        expected,
                        "{text:?} with max distance {max}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_all_occurrences() {
        let matcher = FuzzyMultiWordMatcher::new("oranges", 2).unwrap();
        assert_eq!(
            matcher.get_match("I like orangs with oranges and some orans"),
            vec![
                Occurrence {
                    end_index: 13,
                    distance: 1
                },
                Occurrence {
                    end_index: 26,
                    distance: 0
                },
                Occurrence {
                    end_index: 41,
                    distance: 2
                },
            ]
        );
    }

    #[test]
    fn test_run_keeps_lowest_distance() {
        let matcher = FuzzyMultiWordMatcher::new("stragled", 2).unwrap();
        assert_eq!(
            distances(&matcher, "where they sprawled amongst the tough stalks"),
            vec![2]
        );
        assert_eq!(
            distances(&matcher, "wedding guests straggled in pairs and groups"),
            vec![1]
        );
    }

    #[test]
    fn test_run_ties_prefer_rightmost() {
        // "li", "lik" and "like" all complete "lie" with one edit.
        let matcher = FuzzyMultiWordMatcher::new("lie", 1).unwrap();
        assert_eq!(
            matcher.get_match("I like"),
            vec![Occurrence {
                end_index: 6,
                distance: 1
            }]
        );
    }

    #[test]
    fn test_match_data_two_occurrences() {
        let matcher = FuzzyMultiWordMatcher::new("potatlers", 2).unwrap();
        let data =
            matcher.get_match_data("I like potatoes in germany are freaking potaltles you know?");
        assert_eq!(
            alteration_codes(&data.alterations),
            "iiiiiiimmmmmrmsmiiiiiiiiiiiiiiiiiiiiiiiiimmmmammmsmiiiiiiiiii"
        );
        assert_eq!(data.distances, vec![2, 2]);
    }

    #[test]
    fn test_match_data_ends_with_occurrence() {
        let matcher = FuzzyMultiWordMatcher::new("potatlers", 2).unwrap();
        let data = matcher.get_match_data("I like potatoes with poetatlers and potatlers");
        assert_eq!(
            alteration_codes(&data.alterations),
            "iiiiiiimmmmmrmsmiiiiiimmammmmmmmiiiiimmmmmmmmm"
        );
        assert_eq!(data.distances, vec![2, 1, 0]);
    }

    #[test]
    fn test_match_data_run_open_at_end() {
        let matcher = FuzzyMultiWordMatcher::new("see", 1).unwrap();
        let data = matcher.get_match_data("seee");
        assert_eq!(
            matcher.get_match("seee"),
            vec![Occurrence {
                end_index: 3,
                distance: 0
            }]
        );
        assert_eq!(data.distances, vec![0]);
        assert_eq!(alteration_codes(&data.alterations), "mmmi");

        let matcher = FuzzyMultiWordMatcher::new("aaa", 1).unwrap();
        let data = matcher.get_match_data("aaab");
        assert_eq!(distances(&matcher, "aaab"), vec![0]);
        assert_eq!(data.distances, vec![0]);
        assert_eq!(alteration_codes(&data.alterations), "mmmi");
    }

    #[test]
    fn test_match_data_aligns_after_previous_occurrence() {
        // The best alignment of the second occurrence, "bab" with one
        // replace, reuses the "b" of the first one.
        let matcher = FuzzyMultiWordMatcher::new("aab", 1).unwrap();
        let data = matcher.get_match_data("aabab");
        assert_eq!(distances(&matcher, "aabab"), vec![0, 1]);
        assert_eq!(data.distances, vec![0, 1]);
        assert_eq!(alteration_codes(&data.alterations), "mmmsmm");
    }

    #[test]
    fn test_match_data_drops_inseparable_occurrence() {
        // "aba" and "aca" share their middle "a"; only the first is aligned.
        let matcher = FuzzyMultiWordMatcher::new("aaa", 1).unwrap();
        assert_eq!(distances(&matcher, "babaca"), vec![1, 1]);
        let data = matcher.get_match_data("babaca");
        assert_eq!(data.distances, vec![1]);
        assert_eq!(alteration_codes(&data.alterations), "imrmii");
    }

    #[test]
    fn test_match_data_leading_skip() {
        let matcher = FuzzyMultiWordMatcher::new("oranne", 2).unwrap();
        let data = matcher.get_match_data("manner");
        assert_eq!(alteration_codes(&data.alterations), "srmmmmi");
    }

    #[test]
    fn test_match_data_unfinished_word() {
        let matcher = FuzzyMultiWordMatcher::new("something", 2).unwrap();
        let data = matcher.get_match_data("I like to do so");
        assert_eq!(alteration_codes(&data.alterations), "i".repeat(15));
        assert!(data.distances.is_empty());
    }

    #[test]
    fn test_match_data_empty_text() {
        let matcher = FuzzyMultiWordMatcher::new("cat", 1).unwrap();
        let data = matcher.get_match_data("");
        assert!(data.alterations.is_empty());
        assert!(data.distances.is_empty());
    }
}
