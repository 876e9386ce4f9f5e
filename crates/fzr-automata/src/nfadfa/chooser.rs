//! Tie-break policies for trace reconstruction.

use crate::{NfaTemplate, SourceTransition};

/// Picks the NFA transition to follow backwards when several qualify.
///
/// `candidates` are the provenance transitions of the DFA step at `step`
/// whose target is the NFA state already chosen for the following step, or,
/// after an epsilon transition was chosen, the transitions entering its
/// origin. The list is never empty. A consuming candidate leaves a state
/// reached after `step` characters, an epsilon candidate one reached after
/// `step + 1`. Returning `None` aborts reconstruction.
pub trait TransitionChooser<N, T> {
    /// Chooses among `candidates`.
    fn choose(
        &mut self,
        step: usize,
        candidates: &[SourceTransition],
        nfa: &NfaTemplate<N, T>,
    ) -> Option<SourceTransition>;
}

/// Takes the first candidate in provenance order.
///
/// Consuming transitions precede epsilon transitions in provenance, so this
/// prefers a direct transition whenever one exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstCandidate;

impl<N, T> TransitionChooser<N, T> for FirstCandidate {
    fn choose(
        &mut self,
        _step: usize,
        candidates: &[SourceTransition],
        _nfa: &NfaTemplate<N, T>,
    ) -> Option<SourceTransition> {
        candidates.first().copied()
    }
}

/// Adapts a closure into a [`TransitionChooser`].
#[derive(Clone, Copy, Debug)]
pub struct FnChooser<F>(pub F);

impl<N, T, F> TransitionChooser<N, T> for FnChooser<F>
where
    F: FnMut(usize, &[SourceTransition], &NfaTemplate<N, T>) -> Option<SourceTransition>,
{
    fn choose(
        &mut self,
        step: usize,
        candidates: &[SourceTransition],
        nfa: &NfaTemplate<N, T>,
    ) -> Option<SourceTransition> {
        (self.0)(step, candidates, nfa)
    }
}
