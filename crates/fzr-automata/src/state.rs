//! State identifiers.

use std::fmt;

/// Dense index of a state inside a validated template.
///
/// IDs are only meaningful for the template that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    /// Wraps an arena index.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the arena index of this state.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Builds the composite identifier of a set of states.
///
/// The IDs are sorted and deduplicated, then joined as `{a,b,c}`, so the
/// result does not depend on the order in which states were discovered.
/// The empty set is `{}`.
pub fn state_set_id<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sorted: Vec<&str> = ids.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();
    format!("{{{}}}", sorted.join(","))
}
