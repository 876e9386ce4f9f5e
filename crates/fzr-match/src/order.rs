//! Rating how well word occurrences follow the query order.
//!
//! [`WordOrderMatcher`] aligns the occurrences found in a text with the query
//! words using a dynamic program in the spirit of edit distance. Words may be
//! skipped at a per-word penalty, occurrences may be ignored for free, and
//! the gap between consecutive matched words adds to the cost.

use serde::Serialize;

/// Penalty for skipping a word when none is given.
pub const DEFAULT_SKIP_PENALTY: f64 = 10.0;

/// A query word and the cost of leaving it out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWord {
    /// The word.
    pub word: String,
    /// Cost of skipping the word, relative to a gap of one character.
    ///
    /// `f64::INFINITY` always prefers every word being present; `0.0` always
    /// prefers adjacent words.
    pub penalty: f64,
}

impl OrderWord {
    /// A word with the given skip penalty.
    pub fn new(word: impl Into<String>, penalty: f64) -> Self {
        Self {
            word: word.into(),
            penalty,
        }
    }
}

/// A word occurrence in a text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderOccurrence {
    /// The query word that was found.
    pub word: String,
    /// Character position of the first character.
    pub index: usize,
    /// Character position just past the occurrence.
    pub end_index: usize,
    /// Cost charged when the occurrence is used.
    pub cost: f64,
}

/// An occurrence used by the best alignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderMatch {
    /// Position of the word in the query.
    pub word_index: usize,
    /// Position of the occurrence in the input list.
    pub match_index: usize,
    /// The occurrence.
    pub occurrence: OrderOccurrence,
}

/// Cost of the best alignment and the occurrences it used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderMatchData {
    /// Cost of the alignment.
    pub distance: f64,
    /// Used occurrences, in query order.
    pub matches: Vec<OrderMatch>,
}

/// One entry of the alignment table.
#[derive(Debug, Clone, Copy)]
struct Cell {
    /// Cost so far.
    distance: f64,
    /// The word of this column was skipped, or the alignment restarted here.
    skipped_word: bool,
    /// End of the last used occurrence.
    last_index: usize,
}

/// Scores occurrence lists against an ordered word sequence.
///
/// # Example
///
/// ```
/// use fzr_match::{OrderOccurrence, WordOrderMatcher};
///
/// let matcher = WordOrderMatcher::new(["hello", "world"]);
/// let found = |word: &str, index: usize| OrderOccurrence {
///     word: word.to_owned(),
///     index,
///     end_index: index + word.len(),
///     cost: 0.0,
/// };
/// assert_eq!(matcher.get_match(&[found("hello", 0), found("world", 6)]), 0.0);
/// assert_eq!(matcher.get_match(&[found("hello", 0)]), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct WordOrderMatcher {
    /// Query words in order.
    words: Vec<OrderWord>,
    /// Costs with no occurrences considered.
    first_row: Vec<Cell>,
}

impl WordOrderMatcher {
    /// A matcher where every word has [`DEFAULT_SKIP_PENALTY`].
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_penalty(words, DEFAULT_SKIP_PENALTY)
    }

    /// A matcher where every word has the same skip penalty.
    pub fn with_penalty<I, S>(words: I, penalty: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_words(words.into_iter().map(|word| OrderWord::new(word, penalty)))
    }

    /// A matcher with a penalty per word.
    pub fn from_words(words: impl IntoIterator<Item = OrderWord>) -> Self {
        let words: Vec<OrderWord> = words.into_iter().collect();
        let mut first_row = Vec::with_capacity(words.len() + 1);
        first_row.push(Cell {
            distance: 0.0,
            skipped_word: false,
            last_index: 0,
        });
        let mut distance = 0.0;
        for word in &words {
            distance += word.penalty;
            first_row.push(Cell {
                distance,
                skipped_word: true,
                last_index: 0,
            });
        }
        Self { words, first_row }
    }

    /// The query words.
    pub fn words(&self) -> &[OrderWord] {
        &self.words
    }

    /// Cost of the best alignment of `occurrences`, which must be sorted by
    /// position.
    pub fn get_match(&self, occurrences: &[OrderOccurrence]) -> f64 {
        let table = self.fill(occurrences);
        self.best_row(&table).1
    }

    /// Cost of the best alignment and the occurrences it used.
    pub fn get_match_data(&self, occurrences: &[OrderOccurrence]) -> OrderMatchData {
        let table = self.fill(occurrences);
        let (last_row, distance) = self.best_row(&table);

        let mut matches = Vec::new();
        let (mut i, mut j) = (last_row, self.words.len());
        while i > 0 && j > 0 {
            let cell = table[i][j];
            let occurrence = &occurrences[i - 1];
            if self.words[j - 1].word == occurrence.word {
                matches.push(OrderMatch {
                    word_index: j - 1,
                    match_index: i - 1,
                    occurrence: occurrence.clone(),
                });
                if cell.skipped_word {
                    break;
                }
                i -= 1;
                j -= 1;
            } else if cell.skipped_word {
                j -= 1;
            } else {
                i -= 1;
            }
        }
        matches.reverse();
        OrderMatchData { distance, matches }
    }

    /// Row index and cost of the cheapest complete alignment. Earlier rows
    /// win ties.
    fn best_row(&self, table: &[Vec<Cell>]) -> (usize, f64) {
        let last = self.words.len();
        let mut best = (0, table[0][last].distance);
        for (i, row) in table.iter().enumerate().skip(1) {
            if row[last].distance < best.1 {
                best = (i, row[last].distance);
            }
        }
        best
    }

    /// Builds the alignment table: the precomputed row, then one per occurrence.
    fn fill(&self, occurrences: &[OrderOccurrence]) -> Vec<Vec<Cell>> {
        let mut table = Vec::with_capacity(occurrences.len() + 1);
        table.push(self.first_row.clone());

        for (i, occurrence) in occurrences.iter().enumerate() {
            let prev_row = &table[i];
            let mut row = Vec::with_capacity(self.words.len() + 1);
            row.push(Cell {
                distance: 0.0,
                skipped_word: false,
                last_index: 0,
            });
            for (j, word) in self.words.iter().enumerate() {
                let cell = if word.word == occurrence.word {
                    let prev = prev_row[j];
                    let gap = (occurrence.index as f64 - prev.last_index as f64 - 1.0).abs();
                    let extended = prev.distance + gap + occurrence.cost;
                    let restarted = self.first_row[j].distance + occurrence.cost;
                    Cell {
                        distance: restarted.min(extended),
                        skipped_word: restarted <= extended,
                        last_index: occurrence.end_index,
                    }
                } else {
                    let left = row[j];
                    let skip_word = Cell {
                        distance: word.penalty + left.distance,
                        skipped_word: true,
                        last_index: left.last_index,
                    };
                    let up = prev_row[j + 1];
                    let skip_occurrence = Cell {
                        distance: up.distance,
                        skipped_word: false,
                        last_index: up.last_index,
                    };
                    // Equal costs keep the later placement.
                    let keep_occurrence = if skip_occurrence.distance == skip_word.distance {
                        skip_occurrence.last_index >= skip_word.last_index
                    } else {
                        skip_occurrence.distance <= skip_word.distance
                    };
                    if keep_occurrence {
                        skip_occurrence
                    } else {
                        skip_word
                    }
                };
                row.push(cell);
            }
            table.push(row);
        }
        table
    }
}
