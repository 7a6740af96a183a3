//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Errors that can occur when loading or validating a `weft.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed, or names an unknown key.
    #[error("failed to parse {origin}: {message}")]
    Parse {
        /// File name, or `<inline>` for configuration given as a string.
        origin: String,
        /// Parser message, including the line and column.
        message: String,
    },

    /// `[dump] indent` is outside the range the dump printer accepts.
    #[error("dump.indent must be between 1 and {max}, got {indent}")]
    InvalidIndent {
        /// Configured value.
        indent: usize,
        /// Largest accepted value.
        max: usize,
    },
}
