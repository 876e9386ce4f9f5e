//! Mapping DFA traces back to NFA paths.

use std::collections::HashSet;

use tracing::warn;

use super::{FirstCandidate, NfaDfa, TransitionChooser};
use crate::{AutomatonError, DfaTrace, NodeSources, SourceTransition, StateId, TransitionSources};

/// One step of a reconstructed NFA path.
#[derive(Debug)]
pub struct PathStep<'a, N, T> {
    /// The NFA transition taken.
    pub link: SourceTransition,
    /// Metadata of the state the transition leaves.
    pub node: &'a N,
    /// Metadata of the transition.
    pub transition: &'a T,
}

/// A traced DFA run together with the automaton that produced it.
#[derive(Debug)]
pub struct TracedRun<'a, N, T, CN, CT> {
    /// The automaton.
    automaton: &'a NfaDfa<N, T, CN, CT>,
    /// The raw DFA trace.
    dfa: DfaTrace<'a, NodeSources<CN>, TransitionSources<CT>>,
}

impl<'a, N, T, CN, CT> TracedRun<'a, N, T, CN, CT> {
    /// Wraps a DFA trace.
    pub(crate) const fn new(
        automaton: &'a NfaDfa<N, T, CN, CT>,
        dfa: DfaTrace<'a, NodeSources<CN>, TransitionSources<CT>>,
    ) -> Self {
        Self { automaton, dfa }
    }

    /// The raw DFA trace.
    pub fn dfa_trace(&self) -> &DfaTrace<'a, NodeSources<CN>, TransitionSources<CT>> {
        &self.dfa
    }

    /// One trace per NFA state folded into the final DFA state.
    pub fn traces(&self) -> Vec<NfaDfaTrace<'_, N, T, CN, CT>> {
        self.dfa
            .terminal
            .sources
            .iter()
            .map(|&state| NfaDfaTrace {
                run: self,
                state,
                terminal: &self.automaton.nfa().node(state).metadata,
            })
            .collect()
    }
}

/// A final NFA state of a traced run.
#[derive(Debug)]
pub struct NfaDfaTrace<'r, N, T, CN, CT> {
    /// The run this state ended.
    run: &'r TracedRun<'r, N, T, CN, CT>,
    /// The NFA state.
    pub state: StateId,
    /// Its metadata.
    pub terminal: &'r N,
}

impl<'r, N, T, CN, CT> NfaDfaTrace<'r, N, T, CN, CT> {
    /// Reconstructs the path using [`FirstCandidate`].
    pub fn path(&self) -> Vec<PathStep<'r, N, T>> {
        self.path_with(&mut FirstCandidate)
    }

    /// Reconstructs the path with a custom tie-break.
    ///
    /// A failed reconstruction is logged and yields an empty path.
    pub fn path_with<C>(&self, chooser: &mut C) -> Vec<PathStep<'r, N, T>>
    where
        C: TransitionChooser<N, T>,
    {
        self.try_path_with(chooser).unwrap_or_else(|err| {
            warn!(
                state = %self.run.automaton.nfa().node(self.state).id,
                error = %err,
                "trace reconstruction failed"
            );
            Vec::new()
        })
    }

    /// Reconstructs the path, reporting failure.
    ///
    /// Walks the DFA trace backwards. At every step the chooser picks among
    /// the provenance transitions entering the current NFA state. While it
    /// picks epsilon transitions it is asked again, with the same step index,
    /// for a transition entering the epsilon's origin, until a consuming
    /// transition leaving the step's DFA state is found. Finally the epsilon
    /// links of the initial closure lead back to an initial state, so leading
    /// epsilon steps are part of the path.
    pub fn try_path_with<C>(
        &self,
        chooser: &mut C,
    ) -> Result<Vec<PathStep<'r, N, T>>, AutomatonError>
    where
        C: TransitionChooser<N, T>,
    {
        let automaton = self.run.automaton;
        let nfa = automaton.nfa();
        let failure = |step: usize, state: StateId| {
            AutomatonError::reconstruction(step, nfa.node(state).id.as_str())
        };

        let mut links = Vec::new();
        let mut current = self.state;
        for (index, step) in self.run.dfa.path.iter().enumerate().rev() {
            let sources = &step.transition.sources;
            let candidates: Vec<SourceTransition> = sources
                .iter()
                .filter(|source| source.to == current)
                .copied()
                .collect();
            if candidates.is_empty() {
                return Err(failure(index, current));
            }
            let mut link = chooser
                .choose(index, &candidates, nfa)
                .ok_or_else(|| failure(index, current))?;

            let mut visited = HashSet::new();
            while link.is_epsilon() {
                visited.insert(link);
                links.push(link);
                let from = link.from;
                let candidates: Vec<SourceTransition> = sources
                    .iter()
                    .filter(|source| source.to == from && !visited.contains(*source))
                    .copied()
                    .collect();
                if candidates.is_empty() {
                    return Err(failure(index, from));
                }
                link = chooser
                    .choose(index, &candidates, nfa)
                    .ok_or_else(|| failure(index, from))?;
            }
            if !step.node.sources.contains(&link.from) {
                return Err(failure(index, link.from));
            }
            links.push(link);
            current = link.from;
        }

        let mut visited = HashSet::new();
        while !nfa.node(current).initial {
            let link = automaton
                .initial_links()
                .iter()
                .find(|source| source.to == current && !visited.contains(*source))
                .copied()
                .ok_or_else(|| failure(0, current))?;
            visited.insert(link);
            links.push(link);
            current = link.from;
        }

        links.reverse();
        Ok(links
            .into_iter()
            .map(|link| PathStep {
                link,
                node: &nfa.node(link.from).metadata,
                transition: link.metadata(nfa),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        AutomatonError, FnChooser, NfaDfa, NfaNode, NfaTemplate, NfaTransition, PathStep,
        SourceTransition,
    };

    type Template = NfaTemplate<&'static str, &'static str>;

    /// `s` skips to `a` for free; `a` consumes `x` into `b`, which loops on anything.
    fn template() -> Template {
        NfaTemplate::new(vec![
            NfaNode::new("s", true, "s")
                .with_transition(NfaTransition::remaining("s", "ignore"))
                .with_transition(NfaTransition::empty("a", "skip")),
            NfaNode::new("a", false, "a")
                .with_transition(NfaTransition::character("b", 'x', "x"))
                .with_transition(NfaTransition::remaining("a", "stay")),
            NfaNode::new("b", false, "b").with_transition(NfaTransition::remaining("b", "loop")),
        ])
        .unwrap()
    }

    fn transitions(steps: &[PathStep<'_, &'static str, &'static str>]) -> Vec<&'static str> {
        steps.iter().map(|step| *step.transition).collect()
    }

    #[test]
    fn test_one_trace_per_final_state() {
        let automaton = NfaDfa::new(template()).unwrap();
        let run = automaton.execute_traced("zx");
        let terminals: Vec<&str> = run.traces().iter().map(|t| *t.terminal).collect();
        assert_eq!(terminals, vec!["s", "b", "a"]);
    }

    #[test]
    fn test_path_includes_leading_epsilon() {
        let automaton = NfaDfa::new(template()).unwrap();
        let run = automaton.execute_traced("xq");
        let traces = run.traces();
        let b = traces.iter().find(|t| *t.terminal == "b").unwrap();
        assert_eq!(transitions(&b.path()), vec!["skip", "x", "loop"]);
    }

    #[test]
    fn test_path_prefers_consuming_transition() {
        let automaton = NfaDfa::new(template()).unwrap();
        let run = automaton.execute_traced("zx");
        let traces = run.traces();
        let b = traces.iter().find(|t| *t.terminal == "b").unwrap();
        // `a` is reached at step 0 both by `stay` and through `ignore` + `skip`.
        assert_eq!(transitions(&b.path()), vec!["skip", "stay", "x"]);
        let a = traces.iter().find(|t| *t.terminal == "a").unwrap();
        assert_eq!(transitions(&a.path()), vec!["ignore", "ignore", "skip"]);
    }

    #[test]
    fn test_chooser_sees_step_indices() {
        let automaton = NfaDfa::new(template()).unwrap();
        let run = automaton.execute_traced("zzx");
        let traces = run.traces();
        let b = traces.iter().find(|t| *t.terminal == "b").unwrap();
        let mut seen = Vec::new();
        let path = b.path_with(&mut FnChooser(
            |step: usize, candidates: &[SourceTransition], _: &Template| {
                seen.push(step);
                candidates.last().copied()
            },
        ));
        // Step 1 is asked twice: `skip` is an epsilon, so its origin needs a
        // transition too.
        assert_eq!(seen, vec![2, 1, 1, 0]);
        assert_eq!(transitions(&path), vec!["ignore", "ignore", "skip", "x"]);
    }

    #[test]
    fn test_failed_reconstruction_is_reported() {
        let automaton = NfaDfa::new(template()).unwrap();
        let run = automaton.execute_traced("zx");
        let traces = run.traces();
        let b = traces.iter().find(|t| *t.terminal == "b").unwrap();
        let mut refuse = FnChooser(|_: usize, _: &[SourceTransition], _: &Template| None);
        assert_eq!(
            b.try_path_with(&mut refuse).unwrap_err(),
            AutomatonError::TraceReconstruction {
                step: 1,
                state: "b".into()
            }
        );
        assert!(b.path_with(&mut refuse).is_empty());
    }
}
