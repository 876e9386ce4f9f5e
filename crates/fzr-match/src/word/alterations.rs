//! Turning reconstructed NFA paths into alterations.

use fzr_automata::PathStep;

use super::{Alteration, AlterationKind, CharSlot, FuzzyNodeData, FuzzyTransitionData};

/// Alterations of a path plus the distances of the occurrences it restarted after.
#[derive(Debug, Default)]
pub(super) struct PathAlignment {
    /// One entry per reported step.
    pub(super) alterations: Vec<Alteration>,
    /// Distance of the state left by each `restart`, in path order.
    pub(super) restarts: Vec<u32>,
}

/// Aligns `path` with `text`.
///
/// Every reported step except `skip` consumes one text character.
pub(super) fn align(
    path: &[PathStep<'_, FuzzyNodeData, FuzzyTransitionData>],
    text: &[char],
) -> PathAlignment {
    let mut alignment = PathAlignment::default();
    let mut index = 0;
    for step in path {
        let Some(kind) = AlterationKind::from_step(step.transition.kind) else {
            alignment.restarts.push(step.node.distance);
            continue;
        };
        let consumes = kind != AlterationKind::Skip;
        alignment.alterations.push(Alteration {
            kind,
            query: CharSlot {
                index: step.transition.index,
                character: step.transition.character,
            },
            target: CharSlot {
                index,
                character: if consumes { text.get(index).copied() } else { None },
            },
        });
        if consumes {
            index += 1;
        }
    }
    alignment
}
