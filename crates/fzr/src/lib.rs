//! Fuzzy text rating on finite automata.
//!
//! This crate gathers the fzr workspace behind one import:
//!
//! - [`automata`]: NFA/DFA templates, subset construction with provenance,
//!   and trace reconstruction.
//! - [`config`]: rater configuration, TOML parsing and layering.
//! - Matchers and the rater from `fzr-match`, re-exported at the root.
//!
//! # Example
//!
//! ```
//! use fzr::{FuzzyRater, RaterConfig};
//!
//! let config = RaterConfig::from_toml_str("[scoring]\ntypo_penalty = 20\n").unwrap();
//! let rater = FuzzyRater::new("orange juice", &config).unwrap();
//! let exact = rater.get_score("fresh orange juice");
//! let typo = rater.get_score("fresh ornage juice");
//! assert!(exact < typo);
//! ```

#![warn(missing_docs)]

pub use fzr_automata as automata;
pub use fzr_config as config;
pub use fzr_config::RaterConfig;
pub use fzr_match::*;
