//! Build manifest document parsing
//!
//! The document mirrors the manifest file one-to-one. Required values stay
//! `Option` here so the loader can report exactly which one is missing.

use crate::error::{ManifestError, Result};
use crate::model::Configuration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Manifest as written on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestDocument {
    /// Applied plugin ids, in application order
    #[serde(default)]
    pub plugins: Vec<String>,

    #[serde(default)]
    pub identity: IdentitySection,

    #[serde(default)]
    pub sdk: SdkSection,

    #[serde(default)]
    pub toolchain: ToolchainSection,

    #[serde(default)]
    pub build_types: BTreeMap<String, BuildTypeSection>,

    #[serde(default)]
    pub packaging: PackagingSection,

    #[serde(default)]
    pub framework: Option<FrameworkSection>,

    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentitySection {
    pub application_id: Option<String>,
    pub namespace: Option<String>,
    pub version_code: Option<u32>,
    pub version_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SdkSection {
    pub min_sdk: Option<u32>,
    pub target_sdk: Option<u32>,
    pub compile_sdk: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainSection {
    pub ndk_version: Option<String>,
    pub source_compatibility: Option<String>,
    pub target_compatibility: Option<String>,
    pub jvm_target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildTypeSection {
    #[serde(default)]
    pub minify: bool,
    #[serde(default)]
    pub shrink_resources: bool,
    /// `default:<name>` for SDK-provided files, plain paths otherwise
    #[serde(default)]
    pub proguard_rules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackagingSection {
    #[serde(default)]
    pub multidex: bool,
    #[serde(default)]
    pub resource_excludes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameworkSection {
    pub source: Option<String>,
}

/// One `[[dependencies]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyEntry {
    /// `group:artifact` or `group:artifact:version`
    pub coordinate: String,
    /// Explicit version, or `platform-managed`
    #[serde(default)]
    pub version: Option<String>,
    /// Import as a platform (BOM)
    #[serde(default)]
    pub platform: bool,
    #[serde(default)]
    pub configuration: Configuration,
}

impl DependencyEntry {
    /// A plain `implementation` entry
    pub fn new(coordinate: impl Into<String>) -> Self {
        Self {
            coordinate: coordinate.into(),
            version: None,
            platform: false,
            configuration: Configuration::default(),
        }
    }
}

/// Manifest file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    /// `.json` files are JSON, anything else is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ManifestFormat::Json,
            _ => ManifestFormat::Toml,
        }
    }
}

impl ManifestDocument {
    /// Parse a TOML manifest
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, ManifestFormat::Toml, Path::new("<inline>"))
    }

    /// Parse a JSON manifest
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::parse(content, ManifestFormat::Json, Path::new("<inline>"))
    }

    /// Read and parse a manifest file, choosing the format by extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Read manifest");
        Self::parse(&content, ManifestFormat::from_path(path), path)
    }

    fn parse(content: &str, format: ManifestFormat, path: &Path) -> Result<Self> {
        let parse_error = |message: String| ManifestError::Parse {
            path: PathBuf::from(path),
            message,
        };

        match format {
            ManifestFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            ManifestFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
        }
    }
}
