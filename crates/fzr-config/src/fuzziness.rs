//! Word length to edit distance breakpoints.

use std::collections::BTreeMap;

/// Maps minimum word lengths to the number of edits allowed.
///
/// A word gets the distance of the largest breakpoint not exceeding its
/// length, or zero when it is shorter than every breakpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fuzziness(BTreeMap<usize, u32>);

impl Fuzziness {
    /// Creates a table from `(min_length, max_distance)` pairs.
    pub fn new(breakpoints: impl IntoIterator<Item = (usize, u32)>) -> Self {
        Self(breakpoints.into_iter().collect())
    }

    /// A table allowing no edits at all.
    pub fn exact() -> Self {
        Self(BTreeMap::new())
    }

    /// Edits allowed for a word of `length` characters.
    pub fn max_distance_for(&self, length: usize) -> u32 {
        self.0
            .range(..=length)
            .next_back()
            .map_or(0, |(_, &distance)| distance)
    }

    /// Breakpoints in ascending length order.
    pub fn breakpoints(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.0.iter().map(|(&length, &distance)| (length, distance))
    }
}

impl Default for Fuzziness {
    fn default() -> Self {
        Self::new([(2, 1), (5, 2)])
    }
}
