//! Configuration parsing.
//!
//! Parses TOML into intermediate `RawConfig` structures that preserve the
//! optional nature of all fields before merging.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::ConfigError;

/// Raw configuration as parsed directly from TOML.
///
/// All fields are optional to support partial configs that will be merged.
///
/// ```toml
/// [fuzziness]
/// 2 = 1
/// 5 = 2
///
/// [scoring]
/// skip_penalty = 10
/// missing_penalty = 10
/// typo_penalty = 10
/// extra_bonus = 5
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// Minimum word length (as a string key) to allowed edit distance.
    pub fuzziness: Option<BTreeMap<String, u32>>,
    /// Scoring weights.
    pub scoring: Option<RawScoring>,
}

/// Raw scoring weights.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawScoring {
    /// Cost of leaving a query word out of the ordered sequence.
    pub skip_penalty: Option<f64>,
    /// Cost of a query word that does not occur at all.
    pub missing_penalty: Option<f64>,
    /// Cost per edit of a found occurrence.
    pub typo_penalty: Option<f64>,
    /// Bonus per surplus occurrence.
    pub extra_bonus: Option<f64>,
}

/// Parses configuration from a TOML string.
pub fn parse_config_str(contents: &str) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml { source })
}

/// Parses fuzziness keys into word lengths.
pub(crate) fn parse_breakpoints(
    raw: &BTreeMap<String, u32>,
) -> Result<Vec<(usize, u32)>, ConfigError> {
    raw.iter()
        .map(|(key, &distance)| {
            key.trim()
                .parse::<usize>()
                .map(|length| (length, distance))
                .map_err(|_| ConfigError::InvalidBreakpoint { key: key.clone() })
        })
        .collect()
}
