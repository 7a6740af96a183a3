//! Parsing and validation of `weft.toml` tool configuration files.
//!
//! Every section is optional. A directory without `weft.toml` yields
//! [`WeftConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
