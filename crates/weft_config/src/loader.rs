//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::WeftConfig;
use std::io::ErrorKind;
use std::path::Path;

/// Name of the configuration file looked up in a directory.
pub const CONFIG_FILE_NAME: &str = "weft.toml";

const MAX_INDENT: usize = 16;

/// Loads `<dir>/weft.toml`, falling back to defaults when the file is absent.
pub fn load_config(dir: &Path) -> Result<WeftConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    match std::fs::read_to_string(&path) {
        Ok(content) => parse(&path.display().to_string(), &content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(WeftConfig::default()),
        Err(source) => Err(ConfigError::Read { path, source }),
    }
}

/// Loads an explicitly named configuration file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<WeftConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&path.display().to_string(), &content)
}

/// Parses and validates a `weft.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<WeftConfig, ConfigError> {
    parse("<inline>", content)
}

fn parse(origin: &str, content: &str) -> Result<WeftConfig, ConfigError> {
    let config: WeftConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &WeftConfig) -> Result<(), ConfigError> {
    let indent = config.dump.indent;
    if indent == 0 || indent > MAX_INDENT {
        return Err(ConfigError::InvalidIndent {
            indent,
            max: MAX_INDENT,
        });
    }
    Ok(())
}
