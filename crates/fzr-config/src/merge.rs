//! Configuration merging.
//!
//! Merges several `RawConfig` layers into a single resolved `RaterConfig`.

use crate::{
    ConfigError, Fuzziness, RaterConfig,
    parse::{RawConfig, parse_breakpoints},
};

/// Merges configuration layers into a `RaterConfig`.
///
/// Layers are given highest precedence first. For every scoring weight the
/// first defined value wins; a fuzziness table is taken whole from the first
/// layer defining one. Anything left undefined keeps its default.
pub fn merge_configs(configs: &[RawConfig]) -> Result<RaterConfig, ConfigError> {
    let defaults = RaterConfig::default();

    let fuzziness = match configs.iter().find_map(|c| c.fuzziness.as_ref()) {
        Some(raw) => Fuzziness::new(parse_breakpoints(raw)?),
        None => defaults.fuzziness,
    };

    let scoring = || configs.iter().filter_map(|c| c.scoring.as_ref());
    Ok(RaterConfig {
        fuzziness,
        skip_penalty: scoring()
            .find_map(|s| s.skip_penalty)
            .unwrap_or(defaults.skip_penalty),
        missing_penalty: scoring()
            .find_map(|s| s.missing_penalty)
            .unwrap_or(defaults.missing_penalty),
        typo_penalty: scoring()
            .find_map(|s| s.typo_penalty)
            .unwrap_or(defaults.typo_penalty),
        extra_bonus: scoring()
            .find_map(|s| s.extra_bonus)
            .unwrap_or(defaults.extra_bonus),
    })
}
