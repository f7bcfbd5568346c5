//! Capability modules for applied build plugins
//!
//! Plugins are not registered globally. The loader receives a
//! [`CapabilityRegistry`] and every applied plugin id must resolve to one of
//! its modules. Modules only ever add warnings; they cannot reject a manifest.

use crate::model::ResolvedConfig;
use pannel_core::validation::{ValidationResult, Validator};

/// Plugin id of the Android application plugin
pub const ANDROID_APPLICATION: &str = "com.android.application";
/// Plugin id of the Kotlin Android plugin (short form)
pub const KOTLIN_ANDROID: &str = "kotlin-android";
/// Plugin id of the Kotlin Android plugin (fully qualified form)
pub const KOTLIN_ANDROID_QUALIFIED: &str = "org.jetbrains.kotlin.android";
/// Plugin id of the Flutter embedding plugin
pub const FLUTTER: &str = "dev.flutter.flutter-gradle-plugin";
/// Plugin id of the Google services plugin
pub const GOOGLE_SERVICES: &str = "com.google.gms.google-services";

/// Group shared by the Firebase client libraries
pub const FIREBASE_GROUP: &str = "com.google.firebase";

/// A named handler for one build plugin
pub trait Capability: Send + Sync {
    /// Primary plugin id
    fn id(&self) -> &str;

    /// Other ids that select the same module
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Inspect the resolved configuration and report non-fatal findings
    fn check(&self, _config: &ResolvedConfig) -> ValidationResult {
        ValidationResult::new()
    }

    fn matches(&self, plugin: &str) -> bool {
        self.id() == plugin || self.aliases().iter().any(|alias| *alias == plugin)
    }
}

/// `com.android.application`
pub struct AndroidApplication;

impl Capability for AndroidApplication {
    fn id(&self) -> &str {
        ANDROID_APPLICATION
    }
}

/// `kotlin-android`
pub struct KotlinAndroid;

impl Capability for KotlinAndroid {
    fn id(&self) -> &str {
        KOTLIN_ANDROID
    }

    fn aliases(&self) -> &[&str] {
        &[KOTLIN_ANDROID_QUALIFIED]
    }

    fn check(&self, config: &ResolvedConfig) -> ValidationResult {
        Validator::new()
            .warn_if(
                "toolchain.jvm_target",
                config.toolchain.jvm_target.is_none(),
                "Kotlin plugin applied without a JVM target; the Kotlin default will be used",
            )
            .validate()
    }
}

/// `dev.flutter.flutter-gradle-plugin`
pub struct FlutterEmbedding;

impl Capability for FlutterEmbedding {
    fn id(&self) -> &str {
        FLUTTER
    }

    fn check(&self, config: &ResolvedConfig) -> ValidationResult {
        Validator::new()
            .warn_if(
                "framework.source",
                config.framework.is_none(),
                "Flutter plugin applied without a framework source directory",
            )
            .validate()
    }
}

/// `com.google.gms.google-services`
pub struct GoogleServices;

impl Capability for GoogleServices {
    fn id(&self) -> &str {
        GOOGLE_SERVICES
    }

    fn check(&self, config: &ResolvedConfig) -> ValidationResult {
        Validator::new()
            .warn_if(
                "dependencies",
                config.dependencies_in_group(FIREBASE_GROUP).next().is_none(),
                "Google services plugin applied but no Firebase dependency is declared",
            )
            .validate()
    }
}

/// The set of capability modules a loader knows about
pub struct CapabilityRegistry {
    modules: Vec<Box<dyn Capability>>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CapabilityRegistry {
    /// A registry with no modules; every plugin is unknown
    pub fn empty() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Modules for the plugins an Android app with Flutter and Firebase applies
    pub fn builtin() -> Self {
        Self::empty()
            .with(AndroidApplication)
            .with(KotlinAndroid)
            .with(FlutterEmbedding)
            .with(GoogleServices)
    }

    /// Register another module
    pub fn with(mut self, module: impl Capability + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Module handling `plugin`, if any
    pub fn find(&self, plugin: &str) -> Option<&dyn Capability> {
        self.modules
            .iter()
            .find(|m| m.matches(plugin))
            .map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
