//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Root configuration schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSchema {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dependency list handling
    #[serde(default)]
    pub dependencies: DependenciesConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Path of the build manifest, relative to the working directory
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("android/app/build-manifest.toml")
}

/// How repeated dependency declarations are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Accept silently
    Allow,
    /// Accept and log a warning
    #[default]
    Warn,
    /// Reject the manifest
    Deny,
}

impl DuplicatePolicy {
    /// Accepted spellings, for help text and validation messages
    pub const VARIANTS: [&'static str; 3] = ["allow", "warn", "deny"];
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DuplicatePolicy::Allow => "allow",
            DuplicatePolicy::Warn => "warn",
            DuplicatePolicy::Deny => "deny",
        };
        f.write_str(name)
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allow" => Ok(DuplicatePolicy::Allow),
            "warn" => Ok(DuplicatePolicy::Warn),
            "deny" => Ok(DuplicatePolicy::Deny),
            other => Err(format!(
                "unknown duplicate policy '{}', expected one of: {}",
                other,
                Self::VARIANTS.join(", ")
            )),
        }
    }
}

/// Dependency list configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependenciesConfig {
    /// Policy for declarations sharing a configuration and coordinate
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
