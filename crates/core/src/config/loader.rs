//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use std::path::{Path, PathBuf};

/// Standard configuration locations, searched in order
pub const CONFIG_CANDIDATES: [&str; 3] = [
    ".pannel-build.toml",
    "pannel-build.toml",
    ".config/pannel-build.toml",
];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, `None` when running on defaults
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, a standard location, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if !p.exists() => Err(Error::config_not_found(p)),
            Some(p) => Self::from_file(p),
            None => Self::discover(Path::new(".")),
        }
    }

    /// Search `root` for a configuration file, falling back to defaults
    pub fn discover(root: &Path) -> Result<Self> {
        match find_config_file(root) {
            Some(p) => Self::from_file(&p),
            None => Ok(Self::default()),
        }
    }

    /// Load and parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::from(e).with_context(format!("Failed to read config file {}", path.display()))
        })?;

        let schema: ConfigSchema = toml::from_str(&content).map_err(|e| {
            Error::new(
                ErrorCode::ConfigParseError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
            .with_source(e)
        })?;

        Ok(Self {
            schema,
            path: Some(path.to_path_buf()),
        })
    }
}

fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|p| p.is_file())
}
