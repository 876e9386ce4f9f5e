//! Error types for rater configuration.

use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or rendering configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {source}")]
    ParseToml {
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A fuzziness key is not a word length.
    #[error("invalid fuzziness breakpoint '{key}': expected a non-negative integer length")]
    InvalidBreakpoint {
        /// The offending key.
        key: String,
    },

    /// Failed to render configuration as TOML.
    #[error("failed to serialize config: {source}")]
    SerializeToml {
        /// Underlying TOML serialization error.
        source: ser::Error,
    },
}
