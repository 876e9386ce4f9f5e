//! Folding word alignments into highlighting groups.
//!
//! A text is described by a list of contiguous [`MatchGroup`]s. Every query
//! word refines the list: its alteration runs become new groups, inheriting
//! the relations of the groups they overlap, and the inherited groups are
//! split where a run starts inside them.

use std::collections::VecDeque;

use serde::Serialize;

use crate::word::{Alteration, AlterationKind};

/// A span of characters together with its text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextRange {
    /// First character position.
    pub start: usize,
    /// Position just past the span.
    pub end: usize,
    /// The covered characters.
    pub text: String,
}

impl TextRange {
    /// The span of a single optional character.
    fn at(index: usize, character: Option<char>) -> Self {
        Self {
            start: index,
            end: index + usize::from(character.is_some()),
            text: character.map(String::from).unwrap_or_default(),
        }
    }

    /// Whether the span covers no character.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Extends the span by an optional character at `index`.
    fn push(&mut self, index: usize, character: Option<char>) {
        if let Some(character) = character {
            self.text.push(character);
            self.end = index + 1;
        } else {
            self.end = index;
        }
    }

    /// The first `count` characters.
    fn head(&self, count: usize) -> Self {
        Self {
            start: self.start,
            end: self.start + count,
            text: self.text.chars().take(count).collect(),
        }
    }

    /// Everything after the first `count` characters.
    fn tail(&self, count: usize) -> Self {
        Self {
            start: self.start + count,
            end: self.end,
            text: self.text.chars().skip(count).collect(),
        }
    }
}

/// How a text span relates to a query word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// The text matches the query characters.
    Match,
    /// The text replaces the query characters.
    Replace,
    /// The text has characters the query lacks.
    Insert,
    /// The text lacks the query characters.
    Skip,
}

impl RelationKind {
    /// The relation an alteration produces; ignored text relates to nothing.
    pub const fn from_alteration(kind: AlterationKind) -> Option<Self> {
        match kind {
            AlterationKind::Match => Some(Self::Match),
            AlterationKind::Replace => Some(Self::Replace),
            AlterationKind::Insert => Some(Self::Insert),
            AlterationKind::Skip => Some(Self::Skip),
            AlterationKind::Ignore => None,
        }
    }

    /// Whether the query range advances with the text.
    const fn tracks_text(self) -> bool {
        matches!(self, Self::Match | Self::Replace)
    }
}

/// The query word a relation belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryWordRef {
    /// Position of the word in the query.
    pub index: usize,
    /// The word.
    pub text: String,
    /// Start of the occurrence used by the best word order, if any.
    pub matched_index: Option<usize>,
}

/// The part of a query word a group corresponds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRelation {
    /// How the text relates to the query.
    #[serde(rename = "type")]
    pub kind: RelationKind,
    /// The query word.
    pub word: QueryWordRef,
    /// Range within the query word.
    pub range: TextRange,
    /// Whether the occurrence is the one chosen by the best word order.
    pub part_of_best_order: bool,
}

/// A text span and how it relates to the query words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchGroup {
    /// The text span.
    pub range: TextRange,
    /// Relations to query words, in the order the words were added.
    pub relations: Vec<MatchRelation>,
}

/// Splits `group` at character position `index`.
///
/// Positions before the group yield only a second half, positions after it
/// only a first half. Match and replace relations are trimmed along with the
/// text; insert and skip relations are kept whole on both halves.
pub fn split_group(group: &MatchGroup, index: usize) -> (Option<MatchGroup>, Option<MatchGroup>) {
    if index < group.range.start {
        return (None, Some(group.clone()));
    }
    if index > group.range.end {
        return (Some(group.clone()), None);
    }

    let trim = index - group.range.start;
    let first = MatchGroup {
        range: group.range.head(trim),
        relations: trim_relations(&group.relations, |range| range.head(trim)),
    };
    let second = MatchGroup {
        range: group.range.tail(trim),
        relations: trim_relations(&group.relations, |range| range.tail(trim)),
    };
    (Some(first), Some(second))
}

/// Applies `trim` to the ranges of match and replace relations.
fn trim_relations(
    relations: &[MatchRelation],
    trim: impl Fn(&TextRange) -> TextRange,
) -> Vec<MatchRelation> {
    relations
        .iter()
        .map(|relation| {
            let mut relation = relation.clone();
            if relation.kind.tracks_text() {
                relation.range = trim(&relation.range);
            }
            relation
        })
        .collect()
}

/// Whether an alteration at `index` covering `width` characters lies past
/// `group`.
fn passed(group: &MatchGroup, index: usize, width: usize) -> bool {
    if group.range.is_empty() {
        group.range.end < index + width
    } else {
        group.range.end <= index
    }
}

/// Splits `group` at `index` and returns the part from `index` on.
///
/// The relations the `inheritors` in `out` took from `group` are trimmed to
/// the part before `index`.
fn split_inherited(
    group: &MatchGroup,
    index: usize,
    out: &mut [MatchGroup],
    inheritors: &[usize],
) -> Option<MatchGroup> {
    let (first, second) = split_group(group, index);
    if let Some(first) = &first {
        for &inheritor in inheritors {
            let relations = out[inheritor].relations.iter_mut();
            for (kept, trimmed) in relations.zip(&first.relations) {
                kept.range = trimmed.range.clone();
            }
        }
    }
    second.or(first)
}

/// Adds the alignment of `word` to `groups`.
///
/// `alterations` must cover the same text as `groups`. Consecutive
/// alterations of one kind within one inherited group form a single group.
/// Relations are only flagged as part of the best order for the occurrence
/// starting at `word.matched_index`.
pub fn add_alteration_data(
    groups: &[MatchGroup],
    alterations: &[Alteration],
    word: &QueryWordRef,
) -> Vec<MatchGroup> {
    if alterations.is_empty() {
        return groups.to_vec();
    }

    let mut pending: VecDeque<MatchGroup> = groups.iter().cloned().collect();
    let mut current = pending.pop_front();
    // Changes whenever `current` is replaced, so runs never span two groups.
    let mut portion = 0usize;
    // Output groups that inherited the relations of `current`.
    let mut inheritors: Vec<usize> = Vec::new();

    let mut out: Vec<MatchGroup> = Vec::new();
    let mut previous: Option<(AlterationKind, usize)> = None;
    let mut open_relation = false;

    let mut best_group_found = false;
    let mut prev_query_index = 0;

    for alteration in alterations {
        let (query, target) = (alteration.query, alteration.target);
        let width = usize::from(target.character.is_some());

        if prev_query_index > query.index
            && word.matched_index.is_some_and(|start| target.index > start)
        {
            best_group_found = true;
        }
        prev_query_index = query.index;

        while current
            .as_ref()
            .is_some_and(|group| passed(group, target.index, width))
        {
            if let Some(group) = current.take()
                && group.range.is_empty()
                && inheritors.is_empty()
            {
                out.push(group);
            }
            current = pending.pop_front();
            portion += 1;
            inheritors.clear();
        }

        if previous == Some((alteration.kind, portion)) {
            if let Some(group) = out.last_mut() {
                if open_relation && let Some(relation) = group.relations.last_mut() {
                    relation.range.push(query.index, query.character);
                }
                group.range.push(target.index, target.character);
            }
            continue;
        }

        if let Some(group) = &current
            && group.range.start < target.index
            && let Some(rest) = split_inherited(group, target.index, &mut out, &inheritors)
        {
            current = Some(rest);
            portion += 1;
            inheritors.clear();
        }

        let relation = RelationKind::from_alteration(alteration.kind).map(|kind| MatchRelation {
            kind,
            word: word.clone(),
            range: TextRange::at(query.index, query.character),
            part_of_best_order: !best_group_found
                && word.matched_index.is_some_and(|start| target.index >= start),
        });
        open_relation = relation.is_some();

        let mut relations = current
            .as_ref()
            .map(|group| group.relations.clone())
            .unwrap_or_default();
        relations.extend(relation);
        out.push(MatchGroup {
            range: TextRange::at(target.index, target.character),
            relations,
        });
        if current.is_some() {
            inheritors.push(out.len() - 1);
        }
        previous = Some((alteration.kind, portion));
    }

    out.extend(pending);
    out
}
