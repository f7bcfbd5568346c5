//! Resolved build configuration types
//!
//! Everything here is produced once by the loader and never mutated afterwards.

use crate::error::{ManifestError, Result};
use once_cell::sync::Lazy;
use pannel_core::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

static COORDINATE_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("static coordinate regex"));

/// Marker accepted in place of a version for BOM-managed dependencies
pub const PLATFORM_MANAGED: &str = "platform-managed";

/// Application identity from `defaultConfig`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
    pub application_id: String,
    pub version_code: u32,
    pub version_name: String,
    pub namespace: String,
}

/// SDK bounds. Always `min_sdk <= target_sdk <= compile_sdk` once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConstraints {
    pub min_sdk: u32,
    pub target_sdk: u32,
    pub compile_sdk: u32,
}

/// JVM and NDK settings (`compileOptions`, `kotlinOptions`, `ndkVersion`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    pub ndk_version: Option<String>,
    pub source_compatibility: Option<String>,
    pub target_compatibility: Option<String>,
    pub jvm_target: Option<String>,
}

/// A proguard rules file, either shipped with the SDK or owned by the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ProguardFile {
    /// `getDefaultProguardFile(name)`
    Default(String),
    /// A path relative to the module
    Project(String),
}

impl ProguardFile {
    const DEFAULT_PREFIX: &'static str = "default:";

    /// Parse the manifest spelling: `default:<name>` or a plain path
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(Self::DEFAULT_PREFIX) {
            Some(name) => ProguardFile::Default(name.to_string()),
            None => ProguardFile::Project(raw.to_string()),
        }
    }

    /// The file name or path without the kind marker
    pub fn path(&self) -> &str {
        match self {
            ProguardFile::Default(p) | ProguardFile::Project(p) => p,
        }
    }
}

impl fmt::Display for ProguardFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProguardFile::Default(name) => write!(f, "{}{}", Self::DEFAULT_PREFIX, name),
            ProguardFile::Project(path) => f.write_str(path),
        }
    }
}

/// Behavior of one build type such as `release`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTypeConfig {
    pub minify: bool,
    pub shrink_resources: bool,
    pub proguard_rules: Vec<ProguardFile>,
}

/// Packaging options: resource exclusions (insertion ordered, no repeats) and multidex
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingRules {
    pub multidex: bool,
    pub resource_excludes: Vec<String>,
}

/// Location of the cross-platform UI framework project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    pub source: String,
}

/// Gradle dependency configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Configuration {
    #[default]
    Implementation,
    Api,
    CompileOnly,
    RuntimeOnly,
    TestImplementation,
    AndroidTestImplementation,
    CoreLibraryDesugaring,
}

impl Configuration {
    /// Name as written in a Gradle `dependencies` block
    pub fn as_str(&self) -> &'static str {
        match self {
            Configuration::Implementation => "implementation",
            Configuration::Api => "api",
            Configuration::CompileOnly => "compileOnly",
            Configuration::RuntimeOnly => "runtimeOnly",
            Configuration::TestImplementation => "testImplementation",
            Configuration::AndroidTestImplementation => "androidTestImplementation",
            Configuration::CoreLibraryDesugaring => "coreLibraryDesugaring",
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `group:artifact`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
}

impl Coordinate {
    /// Split `group:artifact[:version]` into a coordinate and the optional version
    pub fn parse_with_version(raw: &str) -> Result<(Self, Option<String>)> {
        let invalid = |reason: &str| ManifestError::InvalidCoordinate {
            coordinate: raw.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = raw.split(':').collect();
        let (group, artifact, version) = match parts.as_slice() {
            [group, artifact] => (*group, *artifact, None),
            [group, artifact, version] => (*group, *artifact, Some(*version)),
            _ => return Err(invalid("expected group:artifact or group:artifact:version")),
        };

        if !COORDINATE_PART.is_match(group) {
            return Err(invalid("group is empty or contains illegal characters"));
        }
        if !COORDINATE_PART.is_match(artifact) {
            return Err(invalid("artifact is empty or contains illegal characters"));
        }
        if let Some(v) = version {
            if v.trim().is_empty() || v.chars().any(char::is_whitespace) {
                return Err(invalid("version is empty or contains whitespace"));
            }
        }

        Ok((
            Self {
                group: group.to_string(),
                artifact: artifact.to_string(),
            },
            version.map(String::from),
        ))
    }
}

impl FromStr for Coordinate {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self> {
        match Self::parse_with_version(s)? {
            (coordinate, None) => Ok(coordinate),
            (_, Some(_)) => Err(ManifestError::InvalidCoordinate {
                coordinate: s.to_string(),
                reason: "unexpected version component".to_string(),
            }),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

/// One entry of the `dependencies` block, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DependencyDeclaration {
    /// A pinned artifact
    Versioned {
        configuration: Configuration,
        coordinate: Coordinate,
        version: String,
    },
    /// Version supplied by an imported platform (BOM)
    PlatformManaged {
        configuration: Configuration,
        coordinate: Coordinate,
    },
    /// The platform (BOM) import itself
    Platform {
        configuration: Configuration,
        coordinate: Coordinate,
        version: String,
    },
}

impl DependencyDeclaration {
    pub fn configuration(&self) -> Configuration {
        match self {
            DependencyDeclaration::Versioned { configuration, .. }
            | DependencyDeclaration::PlatformManaged { configuration, .. }
            | DependencyDeclaration::Platform { configuration, .. } => *configuration,
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        match self {
            DependencyDeclaration::Versioned { coordinate, .. }
            | DependencyDeclaration::PlatformManaged { coordinate, .. }
            | DependencyDeclaration::Platform { coordinate, .. } => coordinate,
        }
    }

    /// Declared version, `None` when the platform manages it
    pub fn version(&self) -> Option<&str> {
        match self {
            DependencyDeclaration::Versioned { version, .. }
            | DependencyDeclaration::Platform { version, .. } => Some(version),
            DependencyDeclaration::PlatformManaged { .. } => None,
        }
    }

    pub fn is_platform(&self) -> bool {
        matches!(self, DependencyDeclaration::Platform { .. })
    }

    /// Gradle notation, e.g. `com.google.firebase:firebase-bom:33.11.0`
    pub fn notation(&self) -> String {
        match self.version() {
            Some(v) => format!("{}:{}", self.coordinate(), v),
            None => self.coordinate().to_string(),
        }
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyDeclaration::Platform { .. } => {
                write!(f, "{}(platform(\"{}\"))", self.configuration(), self.notation())
            }
            _ => write!(f, "{}(\"{}\")", self.configuration(), self.notation()),
        }
    }
}

/// Validated, immutable representation of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub plugins: Vec<String>,
    pub identity: AppIdentity,
    pub sdk: SdkConstraints,
    pub toolchain: Toolchain,
    pub build_types: BTreeMap<String, BuildTypeConfig>,
    pub packaging: PackagingRules,
    pub framework: Option<Framework>,
    pub dependencies: Vec<DependencyDeclaration>,
    /// Non-fatal findings from validation and capability modules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationError>,
}

impl ResolvedConfig {
    pub fn build_type(&self, name: &str) -> Option<&BuildTypeConfig> {
        self.build_types.get(name)
    }

    /// Dependencies whose group matches `group` exactly
    pub fn dependencies_in_group<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = &'a DependencyDeclaration> + 'a {
        self.dependencies
            .iter()
            .filter(move |d| d.coordinate().group == group)
    }
}
