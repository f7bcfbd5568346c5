//! Build manifest loader
//!
//! Turns a [`ManifestDocument`] into a [`ResolvedConfig`]. Checks run in a
//! fixed order and the first failing check decides the error:
//!
//! 1. required fields (`application_id`, then the three SDK levels)
//! 2. `application_id` format
//! 3. SDK range (`min_sdk <= target_sdk <= compile_sdk`)
//! 4. remaining identity fields and the `min_sdk` floor
//! 5. toolchain, build types, packaging patterns
//! 6. dependencies
//! 7. plugins, followed by capability warnings

use crate::capability::{CapabilityRegistry, ANDROID_APPLICATION};
use crate::error::{ManifestError, Result};
use crate::manifest::{DependencyEntry, ManifestDocument};
use crate::model::{
    AppIdentity, BuildTypeConfig, Coordinate, DependencyDeclaration, Framework, PackagingRules,
    ProguardFile, ResolvedConfig, SdkConstraints, Toolchain, PLATFORM_MANAGED,
};
use pannel_core::config::DuplicatePolicy;
use pannel_core::validation::{ValidationError, ValidationResult, Validator};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

const REVERSE_DOMAIN: &str = r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$";
const BUILD_TYPE_NAME: &str = r"^[a-z][A-Za-z0-9]*$";
const JAVA_VERSION: &str = r"^(1\.[6-8]|[1-9][0-9]?)$";

/// Largest `versionCode` Google Play accepts
pub const MAX_VERSION_CODE: u32 = 2_100_000_000;
/// Applied when `identity.version_code` is absent
pub const DEFAULT_VERSION_CODE: u32 = 1;
/// Applied when `identity.version_name` is absent
pub const DEFAULT_VERSION_NAME: &str = "1.0";

/// Validates manifests against a capability registry
pub struct Loader {
    registry: CapabilityRegistry,
    duplicates: DuplicatePolicy,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(CapabilityRegistry::builtin())
    }
}

/// Load with the built-in capability modules and the default duplicate policy
pub fn load(document: &ManifestDocument) -> Result<ResolvedConfig> {
    Loader::default().load(document)
}

/// Hand declared dependencies to an external resolver unchanged and in order.
///
/// No version resolution happens here.
pub fn resolve_dependencies(declarations: &[DependencyDeclaration]) -> Vec<DependencyDeclaration> {
    declarations.to_vec()
}

impl Loader {
    pub fn new(registry: CapabilityRegistry) -> Self {
        Self {
            registry,
            duplicates: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Validate `document` and produce the resolved configuration
    pub fn load(&self, document: &ManifestDocument) -> Result<ResolvedConfig> {
        let mut warnings = Vec::new();

        let (identity, sdk) = resolve_core(document)?;
        debug!(application_id = %identity.application_id, ?sdk, "Identity and SDK bounds valid");

        let toolchain = resolve_toolchain(document)?;
        let build_types = resolve_build_types(document)?;
        let packaging = resolve_packaging(document, &mut warnings)?;
        let framework = resolve_framework(document);
        let dependencies = self.resolve_declarations(&document.dependencies, &mut warnings)?;
        let plugins = self.resolve_plugins(&document.plugins, &mut warnings)?;

        let mut config = ResolvedConfig {
            plugins,
            identity,
            sdk,
            toolchain,
            build_types,
            packaging,
            framework,
            dependencies,
            warnings: Vec::new(),
        };

        for plugin in &config.plugins {
            if let Some(module) = self.registry.find(plugin) {
                warnings.extend(module.check(&config).into_warnings());
            }
        }

        for warning in &warnings {
            warn!(field = %warning.field, "{}", warning.message);
        }
        config.warnings = warnings;

        debug!(
            dependencies = config.dependencies.len(),
            build_types = config.build_types.len(),
            warnings = config.warnings.len(),
            "Manifest resolved"
        );
        Ok(config)
    }

    fn resolve_declarations(
        &self,
        entries: &[DependencyEntry],
        warnings: &mut Vec<ValidationError>,
    ) -> Result<Vec<DependencyDeclaration>> {
        let mut seen = HashSet::new();
        let mut declarations = Vec::with_capacity(entries.len());

        for entry in entries {
            let declaration = declaration_from_entry(entry)?;
            let key = (declaration.configuration(), declaration.coordinate().clone());

            if !seen.insert(key) {
                match self.duplicates {
                    DuplicatePolicy::Deny => {
                        return Err(ManifestError::DuplicateDependency {
                            configuration: declaration.configuration().to_string(),
                            coordinate: declaration.coordinate().to_string(),
                        });
                    }
                    DuplicatePolicy::Warn => warnings.push(warning(
                        "dependencies",
                        format!(
                            "{} is declared more than once for {}",
                            declaration.coordinate(),
                            declaration.configuration()
                        ),
                    )),
                    DuplicatePolicy::Allow => {}
                }
            }
            declarations.push(declaration);
        }

        let has_platform = declarations.iter().any(DependencyDeclaration::is_platform);
        if !has_platform {
            for managed in declarations.iter().filter(|d| d.version().is_none()) {
                warnings.push(warning(
                    "dependencies",
                    format!(
                        "{} has no version and no platform import supplies one",
                        managed.coordinate()
                    ),
                ));
            }
        }

        Ok(declarations)
    }

    fn resolve_plugins(
        &self,
        plugins: &[String],
        warnings: &mut Vec<ValidationError>,
    ) -> Result<Vec<String>> {
        let mut resolved: Vec<String> = Vec::with_capacity(plugins.len());
        let mut modules = HashSet::new();

        for plugin in plugins {
            let module = self
                .registry
                .find(plugin)
                .ok_or_else(|| ManifestError::UnknownPlugin(plugin.clone()))?;
            // Aliases select the same module; keep the first spelling only.
            if !modules.insert(module.id().to_string()) {
                warnings.push(warning(
                    "plugins",
                    format!("{} is applied more than once (as {})", module.id(), plugin),
                ));
                continue;
            }
            resolved.push(plugin.clone());
        }

        if !resolved.iter().any(|p| p == ANDROID_APPLICATION) {
            warnings.push(warning(
                "plugins",
                format!("{} is not applied; the output is not an installable app", ANDROID_APPLICATION),
            ));
        }

        Ok(resolved)
    }
}

fn warning(field: &str, message: String) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message,
        code: "WARNING".to_string(),
        expected: None,
        actual: None,
    }
}

fn first_error(result: ValidationResult) -> Result<()> {
    match result.first_error() {
        Some(err) => Err(ManifestError::from(err)),
        None => Ok(()),
    }
}

fn resolve_core(document: &ManifestDocument) -> Result<(AppIdentity, SdkConstraints)> {
    let identity = &document.identity;
    let sdk = &document.sdk;

    first_error(
        Validator::new()
            .present("identity.application_id", &identity.application_id)
            .required(
                "identity.application_id",
                identity.application_id.as_deref().unwrap_or("-"),
            )
            .present("sdk.min_sdk", &sdk.min_sdk)
            .present("sdk.target_sdk", &sdk.target_sdk)
            .present("sdk.compile_sdk", &sdk.compile_sdk)
            .validate(),
    )?;

    // Presence was checked above.
    let application_id = identity.application_id.clone().unwrap_or_default();
    let namespace = identity
        .namespace
        .clone()
        .unwrap_or_else(|| application_id.clone());
    let version_code = identity.version_code.unwrap_or(DEFAULT_VERSION_CODE);
    let version_name = identity
        .version_name
        .clone()
        .unwrap_or_else(|| DEFAULT_VERSION_NAME.to_string());
    let constraints = SdkConstraints {
        min_sdk: sdk.min_sdk.unwrap_or_default(),
        target_sdk: sdk.target_sdk.unwrap_or_default(),
        compile_sdk: sdk.compile_sdk.unwrap_or_default(),
    };

    first_error(
        Validator::new()
            .pattern(
                "identity.application_id",
                &application_id,
                REVERSE_DOMAIN,
                "a reverse-domain name such as com.example.app",
            )
            .ordered(
                "sdk",
                ("min_sdk", constraints.min_sdk),
                ("target_sdk", constraints.target_sdk),
            )
            .ordered(
                "sdk",
                ("target_sdk", constraints.target_sdk),
                ("compile_sdk", constraints.compile_sdk),
            )
            .validate(),
    )?;

    first_error(
        Validator::new()
            .custom("sdk.min_sdk", || {
                (constraints.min_sdk == 0).then(|| "API level must be at least 1".to_string())
            })
            .pattern(
                "identity.namespace",
                &namespace,
                REVERSE_DOMAIN,
                "a reverse-domain name such as com.example.app",
            )
            .range("identity.version_code", version_code, 1, MAX_VERSION_CODE)
            .required("identity.version_name", &version_name)
            .validate(),
    )?;

    Ok((
        AppIdentity {
            application_id,
            version_code,
            version_name,
            namespace,
        },
        constraints,
    ))
}

fn resolve_toolchain(document: &ManifestDocument) -> Result<Toolchain> {
    let section = &document.toolchain;
    let mut validator = Validator::new();
    for (field, value) in [
        ("toolchain.source_compatibility", &section.source_compatibility),
        ("toolchain.target_compatibility", &section.target_compatibility),
        ("toolchain.jvm_target", &section.jvm_target),
    ] {
        if let Some(v) = value {
            validator = validator.pattern(field, v, JAVA_VERSION, "a Java version such as 17 or 1.8");
        }
    }
    if let Some(ndk) = &section.ndk_version {
        validator = validator.required("toolchain.ndk_version", ndk);
    }
    first_error(validator.validate())?;

    Ok(Toolchain {
        ndk_version: section.ndk_version.clone(),
        source_compatibility: section.source_compatibility.clone(),
        target_compatibility: section.target_compatibility.clone(),
        jvm_target: section.jvm_target.clone(),
    })
}

fn resolve_build_types(document: &ManifestDocument) -> Result<BTreeMap<String, BuildTypeConfig>> {
    let mut resolved = BTreeMap::new();

    for (name, section) in &document.build_types {
        let field = format!("build_types.{}", name);
        let mut validator = Validator::new()
            .pattern(&field, name, BUILD_TYPE_NAME, "a lowerCamelCase build type name")
            .custom(&format!("{}.shrink_resources", field), || {
                (section.shrink_resources && !section.minify)
                    .then(|| "resource shrinking requires minify = true".to_string())
            });
        for rule in &section.proguard_rules {
            validator = validator.required(&format!("{}.proguard_rules", field), rule);
        }
        first_error(validator.validate())?;

        resolved.insert(
            name.clone(),
            BuildTypeConfig {
                minify: section.minify,
                shrink_resources: section.shrink_resources,
                proguard_rules: section
                    .proguard_rules
                    .iter()
                    .map(|r| ProguardFile::parse(r))
                    .collect(),
            },
        );
    }

    Ok(resolved)
}

fn resolve_packaging(
    document: &ManifestDocument,
    warnings: &mut Vec<ValidationError>,
) -> Result<PackagingRules> {
    let section = &document.packaging;
    let mut excludes: Vec<String> = Vec::with_capacity(section.resource_excludes.len());

    for pattern in &section.resource_excludes {
        if let Err(e) = glob::Pattern::new(pattern) {
            return Err(ManifestError::InvalidValue {
                field: "packaging.resource_excludes".to_string(),
                message: format!("'{}' is not a valid glob: {}", pattern, e.msg),
            });
        }
        if excludes.contains(pattern) {
            warnings.push(warning(
                "packaging.resource_excludes",
                format!("'{}' is listed more than once", pattern),
            ));
            continue;
        }
        excludes.push(pattern.clone());
    }

    Ok(PackagingRules {
        multidex: section.multidex,
        resource_excludes: excludes,
    })
}

fn resolve_framework(document: &ManifestDocument) -> Option<Framework> {
    document
        .framework
        .as_ref()
        .and_then(|f| f.source.clone())
        .filter(|s| !s.trim().is_empty())
        .map(|source| Framework { source })
}

fn declaration_from_entry(entry: &DependencyEntry) -> Result<DependencyDeclaration> {
    let (coordinate, embedded) = Coordinate::parse_with_version(&entry.coordinate)?;
    let configuration = entry.configuration;

    let explicit = entry.version.as_deref();
    if let Some(x) = explicit {
        if x.is_empty() || x.chars().any(char::is_whitespace) {
            return Err(ManifestError::InvalidCoordinate {
                coordinate: entry.coordinate.clone(),
                reason: "version is empty or contains whitespace".to_string(),
            });
        }
    }

    let written = match (embedded.as_deref(), explicit) {
        (Some(e), Some(x)) if e != x => {
            return Err(ManifestError::InvalidValue {
                field: format!("dependencies.{}", coordinate),
                message: format!("coordinate pins {} but version says {}", e, x),
            });
        }
        (Some(e), _) => Some(e),
        (None, x) => x,
    };
    // The marker means "no version" wherever it is written.
    let version = written
        .filter(|v| *v != PLATFORM_MANAGED)
        .map(str::to_string);

    match (entry.platform, version) {
        (true, Some(version)) => Ok(DependencyDeclaration::Platform {
            configuration,
            coordinate,
            version,
        }),
        (true, None) => Err(ManifestError::InvalidCoordinate {
            coordinate: entry.coordinate.clone(),
            reason: "a platform import needs a version".to_string(),
        }),
        (false, Some(version)) => Ok(DependencyDeclaration::Versioned {
            configuration,
            coordinate,
            version,
        }),
        (false, None) => Ok(DependencyDeclaration::PlatformManaged {
            configuration,
            coordinate,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{FLUTTER, GOOGLE_SERVICES, KOTLIN_ANDROID, KOTLIN_ANDROID_QUALIFIED};
    use crate::manifest::{FrameworkSection, ManifestDocument};
    use crate::model::Configuration;
    use proptest::prelude::*;

    fn document(min: u32, target: u32, compile: u32) -> ManifestDocument {
        let mut doc = ManifestDocument::default();
        doc.plugins = vec![ANDROID_APPLICATION.to_string()];
        doc.identity.application_id = Some("com.example.admin_pannel".to_string());
        doc.sdk.min_sdk = Some(min);
        doc.sdk.target_sdk = Some(target);
        doc.sdk.compile_sdk = Some(compile);
        doc
    }

    fn coordinate(raw: &str) -> Coordinate {
        raw.parse().unwrap()
    }

    #[test]
    fn test_sdk_bounds_example() {
        let config = load(&document(23, 34, 35)).unwrap();
        assert_eq!(
            config.sdk,
            SdkConstraints {
                min_sdk: 23,
                target_sdk: 34,
                compile_sdk: 35
            }
        );
    }

    #[test]
    fn test_min_above_target_is_invalid_range() {
        let err = load(&document(30, 23, 35)).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidRange { .. }), "{err}");
    }

    #[test]
    fn test_target_above_compile_is_invalid_range() {
        let err = load(&document(23, 35, 34)).unwrap_err();
        match err {
            ManifestError::InvalidRange { message, .. } => {
                assert!(message.contains("target_sdk (35)"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_equal_bounds_are_valid() {
        assert!(load(&document(34, 34, 34)).is_ok());
    }

    #[test]
    fn test_missing_application_id() {
        let mut doc = document(23, 34, 35);
        doc.identity.application_id = None;
        match load(&doc).unwrap_err() {
            ManifestError::MissingField { field } => assert_eq!(field, "identity.application_id"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_application_id_is_missing() {
        let mut doc = document(23, 34, 35);
        doc.identity.application_id = Some("   ".to_string());
        assert!(matches!(load(&doc), Err(ManifestError::MissingField { .. })));
    }

    #[test]
    fn test_missing_sdk_field_reported_in_order() {
        let mut doc = document(23, 34, 35);
        doc.sdk.target_sdk = None;
        doc.sdk.compile_sdk = None;
        match load(&doc).unwrap_err() {
            ManifestError::MissingField { field } => assert_eq!(field, "sdk.target_sdk"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_field_wins_over_range() {
        let mut doc = document(30, 23, 35);
        doc.identity.application_id = None;
        assert!(matches!(load(&doc), Err(ManifestError::MissingField { .. })));
    }

    #[test]
    fn test_application_id_must_be_reverse_domain() {
        for id in ["admin_pannel", "com..example", "1com.example", "com.example-app"] {
            let mut doc = document(23, 34, 35);
            doc.identity.application_id = Some(id.to_string());
            assert!(
                matches!(load(&doc), Err(ManifestError::InvalidValue { .. })),
                "{id} should be rejected"
            );
        }
    }

    #[test]
    fn test_identity_defaults() {
        let config = load(&document(23, 34, 35)).unwrap();
        assert_eq!(config.identity.namespace, "com.example.admin_pannel");
        assert_eq!(config.identity.version_code, DEFAULT_VERSION_CODE);
        assert_eq!(config.identity.version_name, DEFAULT_VERSION_NAME);
    }

    #[test]
    fn test_zero_version_code_rejected() {
        let mut doc = document(23, 34, 35);
        doc.identity.version_code = Some(0);
        assert!(matches!(load(&doc), Err(ManifestError::InvalidValue { .. })));
    }

    #[test]
    fn test_zero_min_sdk_rejected() {
        assert!(matches!(
            load(&document(0, 34, 35)),
            Err(ManifestError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_shrink_without_minify_rejected() {
        let mut doc = document(23, 34, 35);
        doc.build_types.insert(
            "release".to_string(),
            crate::manifest::BuildTypeSection {
                minify: false,
                shrink_resources: true,
                proguard_rules: vec![],
            },
        );
        match load(&doc).unwrap_err() {
            ManifestError::InvalidValue { field, .. } => {
                assert_eq!(field, "build_types.release.shrink_resources")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_proguard_rules_keep_order() {
        let mut doc = document(23, 34, 35);
        doc.build_types.insert(
            "release".to_string(),
            crate::manifest::BuildTypeSection {
                minify: true,
                shrink_resources: true,
                proguard_rules: vec![
                    "default:proguard-android-optimize.txt".to_string(),
                    "proguard-rules.pro".to_string(),
                ],
            },
        );
        let config = load(&doc).unwrap();
        assert_eq!(
            config.build_type("release").unwrap().proguard_rules,
            vec![
                ProguardFile::Default("proguard-android-optimize.txt".to_string()),
                ProguardFile::Project("proguard-rules.pro".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let mut doc = document(23, 34, 35);
        doc.packaging.resource_excludes = vec!["/META-INF/[".to_string()];
        assert!(matches!(load(&doc), Err(ManifestError::InvalidValue { .. })));
    }

    #[test]
    fn test_resource_excludes_deduplicated() {
        let mut doc = document(23, 34, 35);
        doc.packaging.resource_excludes = vec![
            "/META-INF/{AL2.0,LGPL2.1}".to_string(),
            "/META-INF/*.kotlin_module".to_string(),
            "/META-INF/{AL2.0,LGPL2.1}".to_string(),
        ];
        let config = load(&doc).unwrap();
        assert_eq!(
            config.packaging.resource_excludes,
            ["/META-INF/{AL2.0,LGPL2.1}", "/META-INF/*.kotlin_module"]
        );
        assert!(config.warnings.iter().any(|w| w.field == "packaging.resource_excludes"));
    }

    #[test]
    fn test_invalid_jvm_target_rejected() {
        let mut doc = document(23, 34, 35);
        doc.toolchain.jvm_target = Some("seventeen".to_string());
        assert!(matches!(load(&doc), Err(ManifestError::InvalidValue { .. })));
    }

    #[test]
    fn test_dependency_variants() {
        let mut doc = document(23, 34, 35);
        let mut bom = DependencyEntry::new("com.google.firebase:firebase-bom:33.11.0");
        bom.platform = true;
        let mut coroutines = DependencyEntry::new("org.jetbrains.kotlinx:kotlinx-coroutines-core");
        coroutines.version = Some("1.7.3".to_string());
        let mut explicit_managed = DependencyEntry::new("com.google.firebase:firebase-database");
        explicit_managed.version = Some(PLATFORM_MANAGED.to_string());
        doc.dependencies = vec![
            bom,
            DependencyEntry::new("com.google.firebase:firebase-auth"),
            coroutines,
            explicit_managed,
        ];

        let config = load(&doc).unwrap();
        assert_eq!(
            config.dependencies,
            vec![
                DependencyDeclaration::Platform {
                    configuration: Configuration::Implementation,
                    coordinate: coordinate("com.google.firebase:firebase-bom"),
                    version: "33.11.0".to_string(),
                },
                DependencyDeclaration::PlatformManaged {
                    configuration: Configuration::Implementation,
                    coordinate: coordinate("com.google.firebase:firebase-auth"),
                },
                DependencyDeclaration::Versioned {
                    configuration: Configuration::Implementation,
                    coordinate: coordinate("org.jetbrains.kotlinx:kotlinx-coroutines-core"),
                    version: "1.7.3".to_string(),
                },
                DependencyDeclaration::PlatformManaged {
                    configuration: Configuration::Implementation,
                    coordinate: coordinate("com.google.firebase:firebase-database"),
                },
            ]
        );
        assert!(config.warnings.is_empty(), "{:?}", config.warnings);
    }

    #[test]
    fn test_platform_without_version_rejected() {
        let mut doc = document(23, 34, 35);
        let mut bom = DependencyEntry::new("com.google.firebase:firebase-bom");
        bom.platform = true;
        doc.dependencies = vec![bom];
        assert!(matches!(load(&doc), Err(ManifestError::InvalidCoordinate { .. })));
    }

    #[test]
    fn test_conflicting_versions_rejected() {
        let mut doc = document(23, 34, 35);
        let mut dep = DependencyEntry::new("androidx.multidex:multidex:2.0.1");
        dep.version = Some("2.0.0".to_string());
        doc.dependencies = vec![dep];
        assert!(matches!(load(&doc), Err(ManifestError::InvalidValue { .. })));
    }

    #[test]
    fn test_matching_versions_accepted() {
        let mut doc = document(23, 34, 35);
        let mut dep = DependencyEntry::new("androidx.multidex:multidex:2.0.1");
        dep.version = Some("2.0.1".to_string());
        doc.dependencies = vec![dep];
        let config = load(&doc).unwrap();
        assert_eq!(config.dependencies[0].version(), Some("2.0.1"));
    }

    #[test]
    fn test_versionless_without_platform_warns() {
        let mut doc = document(23, 34, 35);
        doc.dependencies = vec![DependencyEntry::new("com.google.firebase:firebase-auth")];
        let config = load(&doc).unwrap();
        assert!(config.warnings.iter().any(|w| w.message.contains("no platform import")));
    }

    fn duplicated() -> ManifestDocument {
        let mut doc = document(23, 34, 35);
        doc.dependencies = vec![
            DependencyEntry::new("androidx.multidex:multidex:2.0.1"),
            DependencyEntry::new("androidx.multidex:multidex:2.0.1"),
        ];
        doc
    }

    #[test]
    fn test_duplicates_warn_by_default() {
        let config = load(&duplicated()).unwrap();
        assert_eq!(config.dependencies.len(), 2);
        assert!(config.warnings.iter().any(|w| w.message.contains("more than once")));
    }

    #[test]
    fn test_duplicates_allowed_silently() {
        let config = Loader::default()
            .with_duplicate_policy(DuplicatePolicy::Allow)
            .load(&duplicated())
            .unwrap();
        assert_eq!(config.dependencies.len(), 2);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_duplicates_denied() {
        let err = Loader::default()
            .with_duplicate_policy(DuplicatePolicy::Deny)
            .load(&duplicated())
            .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateDependency { .. }));
    }

    #[test]
    fn test_same_coordinate_different_configuration_is_not_duplicate() {
        let mut doc = document(23, 34, 35);
        let mut test_dep = DependencyEntry::new("androidx.multidex:multidex:2.0.1");
        test_dep.configuration = Configuration::TestImplementation;
        doc.dependencies = vec![DependencyEntry::new("androidx.multidex:multidex:2.0.1"), test_dep];
        let config = Loader::default()
            .with_duplicate_policy(DuplicatePolicy::Deny)
            .load(&doc)
            .unwrap();
        assert_eq!(config.dependencies.len(), 2);
    }

    #[test]
    fn test_unknown_plugin_rejected() {
        let mut doc = document(23, 34, 35);
        doc.plugins.push("com.google.firebase.crashlytics".to_string());
        match load(&doc).unwrap_err() {
            ManifestError::UnknownPlugin(id) => assert_eq!(id, "com.google.firebase.crashlytics"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_registry_rejects_every_plugin() {
        let err = Loader::new(CapabilityRegistry::empty())
            .load(&document(23, 34, 35))
            .unwrap_err();
        assert!(matches!(err, ManifestError::UnknownPlugin(_)));
    }

    #[test]
    fn test_missing_android_application_warns() {
        let mut doc = document(23, 34, 35);
        doc.plugins.clear();
        let config = load(&doc).unwrap();
        assert!(config.warnings.iter().any(|w| w.field == "plugins"));
    }

    #[test]
    fn test_capability_warnings() {
        let mut doc = document(23, 34, 35);
        doc.plugins.extend(
            [KOTLIN_ANDROID, FLUTTER, GOOGLE_SERVICES]
                .iter()
                .map(|p| p.to_string()),
        );
        let config = load(&doc).unwrap();
        let fields: Vec<&str> = config.warnings.iter().map(|w| w.field.as_str()).collect();
        assert_eq!(
            fields,
            ["toolchain.jvm_target", "framework.source", "dependencies"]
        );
    }

    #[test]
    fn test_capability_warnings_satisfied() {
        let mut doc = document(23, 34, 35);
        doc.plugins.extend(
            [KOTLIN_ANDROID, FLUTTER, GOOGLE_SERVICES]
                .iter()
                .map(|p| p.to_string()),
        );
        doc.toolchain.jvm_target = Some("17".to_string());
        doc.framework = Some(FrameworkSection {
            source: Some("../..".to_string()),
        });
        doc.dependencies = vec![DependencyEntry::new("com.google.firebase:firebase-auth:23.2.0")];
        let config = load(&doc).unwrap();
        assert!(config.warnings.is_empty(), "{:?}", config.warnings);
        assert_eq!(config.framework.unwrap().source, "../..");
    }

    #[test]
    fn test_repeated_plugin_collapsed() {
        let mut doc = document(23, 34, 35);
        doc.plugins.push(ANDROID_APPLICATION.to_string());
        let config = load(&doc).unwrap();
        assert_eq!(config.plugins, [ANDROID_APPLICATION]);
    }

    #[test]
    fn test_resolve_dependencies_is_pass_through() {
        let declarations = vec![
            DependencyDeclaration::PlatformManaged {
                configuration: Configuration::Implementation,
                coordinate: coordinate("com.google.firebase:firebase-firestore"),
            },
            DependencyDeclaration::Versioned {
                configuration: Configuration::Implementation,
                coordinate: coordinate("androidx.multidex:multidex"),
                version: "2.0.1".to_string(),
            },
        ];
        assert_eq!(resolve_dependencies(&declarations), declarations);
    }

    #[test]
    fn test_kotlin_alias_collapsed() {
        let mut doc = document(23, 34, 35);
        doc.plugins.push(KOTLIN_ANDROID.to_string());
        doc.plugins.push(KOTLIN_ANDROID_QUALIFIED.to_string());
        let config = load(&doc).unwrap();

        assert_eq!(config.plugins, [ANDROID_APPLICATION, KOTLIN_ANDROID]);
        let jvm_warnings = config
            .warnings
            .iter()
            .filter(|w| w.field == "toolchain.jvm_target")
            .count();
        assert_eq!(jvm_warnings, 1);
        assert!(config
            .warnings
            .iter()
            .any(|w| w.field == "plugins" && w.message.contains(KOTLIN_ANDROID_QUALIFIED)));
    }

    #[test]
    fn test_embedded_platform_managed_marker() {
        let mut doc = document(23, 34, 35);
        doc.dependencies = vec![DependencyEntry::new(
            "com.google.firebase:firebase-auth:platform-managed",
        )];
        let config = load(&doc).unwrap();

        assert_eq!(
            config.dependencies,
            vec![DependencyDeclaration::PlatformManaged {
                configuration: Configuration::Implementation,
                coordinate: coordinate("com.google.firebase:firebase-auth"),
            }]
        );
        assert!(config.warnings.iter().any(|w| w.message.contains("no platform import")));
        assert!(crate::render::gradle_kts(&config)
            .contains("implementation(\"com.google.firebase:firebase-auth\")"));
    }

    #[test]
    fn test_platform_managed_marker_on_platform_import_rejected() {
        let mut explicit = DependencyEntry::new("com.google.firebase:firebase-bom");
        explicit.platform = true;
        explicit.version = Some(PLATFORM_MANAGED.to_string());
        let mut embedded = DependencyEntry::new("com.google.firebase:firebase-bom:platform-managed");
        embedded.platform = true;

        for entry in [explicit, embedded] {
            let mut doc = document(23, 34, 35);
            doc.dependencies = vec![entry];
            assert!(matches!(load(&doc), Err(ManifestError::InvalidCoordinate { .. })));
        }
    }

    #[test]
    fn test_version_with_whitespace_rejected() {
        for version in [" 2.0.1 ", "2.0.1\n", ""] {
            let mut doc = document(23, 34, 35);
            let mut dep = DependencyEntry::new("androidx.multidex:multidex");
            dep.version = Some(version.to_string());
            doc.dependencies = vec![dep];
            assert!(
                matches!(load(&doc), Err(ManifestError::InvalidCoordinate { .. })),
                "{version:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_manifest_fields_kept_verbatim() {
        let mut doc = document(21, 33, 35);
        doc.identity.namespace = Some("com.example.admin".to_string());
        doc.identity.version_code = Some(42);
        doc.identity.version_name = Some("2.3.1-beta".to_string());
        doc.toolchain.ndk_version = Some("29.0.13113456".to_string());
        doc.toolchain.source_compatibility = Some("1.8".to_string());
        doc.toolchain.target_compatibility = Some("17".to_string());
        doc.toolchain.jvm_target = Some("17".to_string());
        doc.build_types.insert(
            "release".to_string(),
            crate::manifest::BuildTypeSection {
                minify: true,
                shrink_resources: true,
                proguard_rules: vec![
                    "proguard-rules.pro".to_string(),
                    "default:proguard-android-optimize.txt".to_string(),
                    "extra-rules.pro".to_string(),
                ],
            },
        );
        doc.build_types.insert(
            "staging".to_string(),
            crate::manifest::BuildTypeSection {
                minify: false,
                shrink_resources: false,
                proguard_rules: vec![],
            },
        );

        let config = load(&doc).unwrap();

        assert_eq!(
            config.identity,
            AppIdentity {
                application_id: "com.example.admin_pannel".to_string(),
                version_code: 42,
                version_name: "2.3.1-beta".to_string(),
                namespace: "com.example.admin".to_string(),
            }
        );
        assert_eq!(
            config.toolchain,
            Toolchain {
                ndk_version: Some("29.0.13113456".to_string()),
                source_compatibility: Some("1.8".to_string()),
                target_compatibility: Some("17".to_string()),
                jvm_target: Some("17".to_string()),
            }
        );
        assert_eq!(
            config.build_type("release"),
            Some(&BuildTypeConfig {
                minify: true,
                shrink_resources: true,
                proguard_rules: vec![
                    ProguardFile::Project("proguard-rules.pro".to_string()),
                    ProguardFile::Default("proguard-android-optimize.txt".to_string()),
                    ProguardFile::Project("extra-rules.pro".to_string()),
                ],
            })
        );
        assert_eq!(
            config.build_type("staging"),
            Some(&BuildTypeConfig {
                minify: false,
                shrink_resources: false,
                proguard_rules: vec![],
            })
        );
        assert_eq!(config.build_types.len(), 2);
    }

    fn artifact_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,12}"
    }

    proptest! {
        #[test]
        fn range_violation_always_rejected(min in 1u32..60, target in 1u32..60, extra in 0u32..5) {
            let compile = target.max(min) + extra;
            let result = load(&document(min, target, compile));
            if min > target {
                let is_invalid_range = matches!(result, Err(ManifestError::InvalidRange { .. }));
                prop_assert!(is_invalid_range);
            } else {
                prop_assert!(result.is_ok());
            }
        }

        #[test]
        fn inverted_range_wins_over_identity_checks(
            target in 1u32..50,
            gap in 1u32..10,
            extra in 0u32..5,
            version_code in proptest::option::of(0u32..3),
            namespace in proptest::option::of(proptest::sample::select(vec![
                "com.example.admin_pannel",
                "admin_pannel",
                "1com.example",
            ])),
            version_name in proptest::option::of(proptest::sample::select(vec!["1.0", "", "   "])),
        ) {
            let mut doc = document(target + gap, target, target + extra);
            doc.identity.version_code = version_code;
            doc.identity.namespace = namespace.map(str::to_string);
            doc.identity.version_name = version_name.map(str::to_string);
            let result = load(&doc);
            prop_assert!(
                matches!(result, Err(ManifestError::InvalidRange { .. })),
                "{:?}",
                result
            );
        }

        #[test]
        fn valid_bounds_round_trip(mut levels in proptest::collection::vec(1u32..40, 3)) {
            levels.sort_unstable();
            let config = load(&document(levels[0], levels[1], levels[2])).unwrap();
            prop_assert_eq!(
                config.sdk,
                SdkConstraints { min_sdk: levels[0], target_sdk: levels[1], compile_sdk: levels[2] }
            );
        }

        #[test]
        fn dependency_order_preserved(names in proptest::collection::vec(artifact_name(), 0..12)) {
            let mut doc = document(23, 34, 35);
            doc.dependencies = names
                .iter()
                .map(|n| DependencyEntry::new(format!("org.example:{}:1.0", n)))
                .collect();
            let config = Loader::default()
                .with_duplicate_policy(DuplicatePolicy::Allow)
                .load(&doc)
                .unwrap();
            let artifacts: Vec<&str> = config
                .dependencies
                .iter()
                .map(|d| d.coordinate().artifact.as_str())
                .collect();
            let expected: Vec<&str> = names.iter().map(String::as_str).collect();
            prop_assert_eq!(artifacts, expected);
        }
    }
}
