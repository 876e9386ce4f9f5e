//! Property tests for the word matchers.

#![allow(clippy::tests_outside_test_module)]

use fzr_match::{AlterationKind, FuzzyMultiWordMatcher, FuzzyWordMatcher};
use proptest::{prelude::*, sample::Index};

/// Lowest edit distance between `word` and any substring of `text`.
fn substring_distance(word: &str, text: &str) -> u32 {
    let word: Vec<char> = word.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let mut row = vec![0u32; text.len() + 1];
    for (i, &w) in word.iter().enumerate() {
        let mut next = vec![i as u32 + 1; text.len() + 1];
        for (j, &t) in text.iter().enumerate() {
            let replace = row[j] + u32::from(w != t);
            next[j + 1] = replace.min(row[j + 1] + 1).min(next[j] + 1);
        }
        row = next;
    }
    row.into_iter().min().unwrap_or(0)
}

/// Query characters spelled by an alignment.
fn query_text(kinds: impl Iterator<Item = (AlterationKind, Option<char>)>) -> String {
    kinds
        .filter(|(kind, _)| {
            matches!(
                kind,
                AlterationKind::Match | AlterationKind::Replace | AlterationKind::Skip
            )
        })
        .filter_map(|(_, character)| character)
        .collect()
}

/// Copies of `word` with at most `max` replaced characters each, separated
/// by runs of `c` too long to align across.
fn copies_text(
    word: &str,
    max: u32,
    copies: &[Vec<(Index, char)>],
    lead: &str,
    tail: &str,
) -> String {
    let separator = "c".repeat(max as usize + 1);
    let pieces: Vec<String> = copies
        .iter()
        .map(|edits| {
            let mut chars: Vec<char> = word.chars().collect();
            for (index, c) in edits.iter().take(max as usize) {
                let at = index.index(chars.len());
                chars[at] = *c;
            }
            chars.into_iter().collect()
        })
        .collect();
    format!("{lead}{}{tail}", pieces.join(&separator))
}

proptest! {
    #[test]
    fn single_match_data_agrees_with_match(
        word in "[ab]{3,5}",
        text in "[abc]{0,10}",
        max in 0u32..3,
    ) {
        let matcher = FuzzyWordMatcher::new(word.as_str(), max).unwrap();
        prop_assert_eq!(
            matcher.get_match(&text).distance,
            matcher.get_match_data(&text).distance
        );
    }

    #[test]
    fn multi_match_data_agrees_with_match(
        word in "[ab]{3,5}",
        max in 0u32..2,
        copies in prop::collection::vec(
            prop::collection::vec((any::<Index>(), prop::sample::select(vec!['a', 'b'])), 0..2),
            0..4,
        ),
        lead in "c{0,3}",
        tail in "[abc]?",
    ) {
        let text = copies_text(&word, max, &copies, &lead, &tail);
        let matcher = FuzzyMultiWordMatcher::new(word.as_str(), max).unwrap();
        let found: Vec<u32> = matcher.get_match(&text).iter().map(|o| o.distance).collect();
        prop_assert_eq!(found, matcher.get_match_data(&text).distances);
    }

    #[test]
    fn best_distance_is_substring_distance(
        word in "[ab]{1,4}",
        text in "[abc]{0,8}",
        max in 0u32..3,
    ) {
        let expected = Some(substring_distance(&word, &text)).filter(|&d| d <= max);
        let single = FuzzyWordMatcher::new(word.as_str(), max).unwrap();
        prop_assert_eq!(single.get_match(&text).distance, expected);

        let multi = FuzzyMultiWordMatcher::new(word.as_str(), max).unwrap();
        let best = multi.get_match(&text).iter().map(|o| o.distance).min();
        prop_assert_eq!(best, expected);
    }

    #[test]
    fn single_alignment_round_trips(
        word in "[ab]{1,4}",
        text in "[abc]{0,8}",
        max in 0u32..3,
    ) {
        let matcher = FuzzyWordMatcher::new(word.as_str(), max).unwrap();
        let data = matcher.get_match_data(&text);
        if data.matched() {
            let target: String = data
                .alterations
                .iter()
                .filter_map(|a| a.target.character)
                .collect();
            prop_assert_eq!(target, text);
            let query = query_text(data.alterations.iter().map(|a| (a.kind, a.query.character)));
            prop_assert_eq!(query, word);
        } else {
            prop_assert!(data.alterations.is_empty());
        }
    }

    #[test]
    fn multi_alignment_spells_every_occurrence(
        word in "[ab]{1,3}",
        text in "[abc]{0,10}",
        max in 0u32..2,
    ) {
        let matcher = FuzzyMultiWordMatcher::new(word.as_str(), max).unwrap();
        let data = matcher.get_match_data(&text);
        let target: String = data
            .alterations
            .iter()
            .filter_map(|a| a.target.character)
            .collect();
        prop_assert_eq!(target, text);
        let query = query_text(data.alterations.iter().map(|a| (a.kind, a.query.character)));
        prop_assert_eq!(query, word.repeat(data.distances.len()));
        prop_assert!(data.distances.iter().all(|&d| d <= max));
    }

    #[test]
    fn occurrences_are_ordered(
        word in "[ab]{1,3}",
        text in "[abc]{0,12}",
        max in 0u32..2,
    ) {
        let matcher = FuzzyMultiWordMatcher::new(word.as_str(), max).unwrap();
        let found = matcher.get_match(&text);
        prop_assert!(found.windows(2).all(|pair| pair[0].end_index < pair[1].end_index));
        let length = text.chars().count();
        prop_assert!(found.iter().all(|o| o.end_index <= length && o.distance <= max));
    }
}
