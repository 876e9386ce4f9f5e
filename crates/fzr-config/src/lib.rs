//! Configuration for fzr raters.
//!
//! A [`RaterConfig`] holds the fuzziness breakpoints that decide how many
//! edits each query word tolerates, plus the weights combined into a score.
//! Configuration can be written as TOML and layered, highest precedence first:
//!
//! ```
//! use fzr_config::{RaterConfig, merge_configs, parse_config_str};
//!
//! let user = parse_config_str("[scoring]\ntypo_penalty = 25\n").unwrap();
//! let config = merge_configs(&[user]).unwrap();
//! assert_eq!(config.typo_penalty, 25.0);
//! assert_eq!(config.skip_penalty, RaterConfig::default().skip_penalty);
//! ```

#![warn(missing_docs)]

mod error;
mod fuzziness;
mod merge;
mod parse;
mod validate;

use std::collections::BTreeMap;

pub use error::ConfigError;
pub use fuzziness::Fuzziness;
pub use merge::merge_configs;
pub use parse::{RawConfig, RawScoring, parse_config_str};
use serde::Serialize;
pub use validate::ConfigWarning;
use validate::validate_config;

/// Resolved rater configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RaterConfig {
    /// Edits allowed per word length.
    pub fuzziness: Fuzziness,
    /// Cost of leaving a query word out of the ordered sequence.
    pub skip_penalty: f64,
    /// Cost of a query word that does not occur at all.
    pub missing_penalty: f64,
    /// Cost per edit of a found occurrence.
    pub typo_penalty: f64,
    /// Bonus per occurrence beyond the number of times the word appears in the query.
    pub extra_bonus: f64,
}

impl Default for RaterConfig {
    fn default() -> Self {
        Self {
            fuzziness: Fuzziness::default(),
            skip_penalty: 10.0,
            missing_penalty: 10.0,
            typo_penalty: 10.0,
            extra_bonus: 5.0,
        }
    }
}

/// TOML shape of a resolved configuration.
#[derive(Serialize)]
struct RenderedConfig {
    /// Breakpoints keyed by minimum length.
    fuzziness: BTreeMap<String, u32>,
    /// Scoring weights.
    scoring: RenderedScoring,
}

/// TOML shape of the scoring weights.
#[derive(Serialize)]
struct RenderedScoring {
    /// See [`RaterConfig::skip_penalty`].
    skip_penalty: f64,
    /// See [`RaterConfig::missing_penalty`].
    missing_penalty: f64,
    /// See [`RaterConfig::typo_penalty`].
    typo_penalty: f64,
    /// See [`RaterConfig::extra_bonus`].
    extra_bonus: f64,
}

impl RaterConfig {
    /// Parses a single TOML layer on top of the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        merge_configs(&[parse_config_str(contents)?])
    }

    /// Reports suspicious but legal values.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Renders the configuration as TOML that parses back to an equal value.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let rendered = RenderedConfig {
            fuzziness: self
                .fuzziness
                .breakpoints()
                .map(|(length, distance)| (length.to_string(), distance))
                .collect(),
            scoring: RenderedScoring {
                skip_penalty: self.skip_penalty,
                missing_penalty: self.missing_penalty,
                typo_penalty: self.typo_penalty,
                extra_bonus: self.extra_bonus,
            },
        };
        toml::to_string_pretty(&rendered).map_err(|source| ConfigError::SerializeToml { source })
    }
}
