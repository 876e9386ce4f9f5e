//! Configuration validation.
//!
//! Reports non-fatal warnings for settings that are legal but likely wrong.

use std::fmt;

use crate::RaterConfig;

/// Distances above this make automaton construction noticeably slow.
const EXPENSIVE_DISTANCE: u32 = 3;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// A weight is negative or not a number.
    InvalidWeight {
        /// Name of the weight.
        name: &'static str,
        /// Its value.
        value: f64,
    },
    /// A breakpoint allows enough edits to make matcher construction slow.
    ExpensiveDistance {
        /// Minimum word length of the breakpoint.
        min_length: usize,
        /// Edits allowed from that length on.
        max_distance: u32,
    },
    /// A breakpoint allows at least as many edits as the words it applies to have characters.
    DistanceCoversWord {
        /// Minimum word length of the breakpoint.
        min_length: usize,
        /// Edits allowed from that length on.
        max_distance: u32,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWeight { name, value } => {
                write!(f, "{name} should be a non-negative number, got {value}")
            }
            Self::ExpensiveDistance {
                min_length,
                max_distance,
            } => write!(
                f,
                "words of {min_length}+ characters allow {max_distance} edits; \
                 matchers above {EXPENSIVE_DISTANCE} edits are slow to build"
            ),
            Self::DistanceCoversWord {
                min_length,
                max_distance,
            } => write!(
                f,
                "words of {min_length} characters allow {max_distance} edits and match anywhere"
            ),
        }
    }
}

/// Checks a configuration for suspicious values.
pub(crate) fn validate_config(config: &RaterConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let weights = [
        ("skip_penalty", config.skip_penalty),
        ("missing_penalty", config.missing_penalty),
        ("typo_penalty", config.typo_penalty),
        ("extra_bonus", config.extra_bonus),
    ];
    for (name, value) in weights {
        if value.is_nan() || value < 0.0 {
            warnings.push(ConfigWarning::InvalidWeight { name, value });
        }
    }

    for (min_length, max_distance) in config.fuzziness.breakpoints() {
        if max_distance > EXPENSIVE_DISTANCE {
            warnings.push(ConfigWarning::ExpensiveDistance {
                min_length,
                max_distance,
            });
        }
        if max_distance > 0 && max_distance as usize >= min_length {
            warnings.push(ConfigWarning::DistanceCoversWord {
                min_length,
                max_distance,
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fuzziness;

    #[test]
    fn test_default_is_clean() {
        assert!(validate_config(&RaterConfig::default()).is_empty());
    }

    #[test]
    fn test_negative_and_nan_weights() {
        let config = RaterConfig {
            skip_penalty: -1.0,
            extra_bonus: f64::NAN,
            ..RaterConfig::default()
        };
        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(
            warnings[0],
            ConfigWarning::InvalidWeight { name: "skip_penalty", .. }
        ));
        assert!(matches!(
            warnings[1],
            ConfigWarning::InvalidWeight { name: "extra_bonus", .. }
        ));
    }

    #[test]
    fn test_infinite_penalty_is_allowed() {
        let config = RaterConfig {
            skip_penalty: f64::INFINITY,
            ..RaterConfig::default()
        };
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_fuzziness_warnings() {
        let config = RaterConfig {
            fuzziness: Fuzziness::new([(1, 1), (10, 4)]),
            ..RaterConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            vec![
                ConfigWarning::DistanceCoversWord {
                    min_length: 1,
                    max_distance: 1
                },
                ConfigWarning::ExpensiveDistance {
                    min_length: 10,
                    max_distance: 4
                },
            ]
        );
    }
}
