//! Configuration types deserialized from `weft.toml`.

use serde::Deserialize;

/// Top-level contents of `weft.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeftConfig {
    /// Image reading options.
    #[serde(default)]
    pub image: ImageConfig,
    /// Debug dump presentation.
    #[serde(default)]
    pub dump: DumpConfig,
}

/// The `[image]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Reject images whose payload does not match the header checksum.
    pub verify_checksum: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            verify_checksum: true,
        }
    }
}

/// The `[dump]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DumpConfig {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Print source locations next to scopes, signals and processes.
    pub show_locations: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            show_locations: false,
        }
    }
}
