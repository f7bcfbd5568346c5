//! Gradle Kotlin DSL rendering
//!
//! Produces a `build.gradle.kts` for the app module from a resolved
//! configuration. Output is deterministic: same config, same bytes.

use crate::model::{DependencyDeclaration, ProguardFile, ResolvedConfig};

/// Build types Android defines implicitly; others must be created
const IMPLICIT_BUILD_TYPES: [&str; 2] = ["debug", "release"];

struct Kts {
    out: String,
    depth: usize,
}

impl Kts {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{} {{", header));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }
}

/// Quote a Kotlin string literal
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '$' => quoted.push_str("\\$"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// `17` -> `JavaVersion.VERSION_17`, `1.8` -> `JavaVersion.VERSION_1_8`
fn java_version(value: &str) -> String {
    format!("JavaVersion.VERSION_{}", value.replace('.', "_"))
}

fn proguard_argument(file: &ProguardFile) -> String {
    match file {
        ProguardFile::Default(name) => format!("getDefaultProguardFile({})", quote(name)),
        ProguardFile::Project(path) => quote(path),
    }
}

fn dependency_line(dependency: &DependencyDeclaration) -> String {
    let notation = quote(&dependency.notation());
    match dependency {
        DependencyDeclaration::Platform { .. } => {
            format!("{}(platform({}))", dependency.configuration(), notation)
        }
        _ => format!("{}({})", dependency.configuration(), notation),
    }
}

/// Render `config` as a Gradle Kotlin DSL module script
pub fn gradle_kts(config: &ResolvedConfig) -> String {
    let mut kts = Kts::new();

    kts.open("plugins");
    for plugin in &config.plugins {
        kts.line(&format!("id({})", quote(plugin)));
    }
    kts.close();
    kts.blank();

    kts.open("android");
    kts.line(&format!("namespace = {}", quote(&config.identity.namespace)));
    kts.line(&format!("compileSdk = {}", config.sdk.compile_sdk));
    if let Some(ndk) = &config.toolchain.ndk_version {
        kts.line(&format!("ndkVersion = {}", quote(ndk)));
    }

    let toolchain = &config.toolchain;
    if toolchain.source_compatibility.is_some() || toolchain.target_compatibility.is_some() {
        kts.blank();
        kts.open("compileOptions");
        if let Some(v) = &toolchain.source_compatibility {
            kts.line(&format!("sourceCompatibility = {}", java_version(v)));
        }
        if let Some(v) = &toolchain.target_compatibility {
            kts.line(&format!("targetCompatibility = {}", java_version(v)));
        }
        kts.close();
    }

    if let Some(jvm_target) = &toolchain.jvm_target {
        kts.blank();
        kts.open("kotlinOptions");
        kts.line(&format!("jvmTarget = {}", quote(jvm_target)));
        kts.close();
    }

    kts.blank();
    kts.open("defaultConfig");
    kts.line(&format!("applicationId = {}", quote(&config.identity.application_id)));
    kts.line(&format!("minSdk = {}", config.sdk.min_sdk));
    kts.line(&format!("targetSdk = {}", config.sdk.target_sdk));
    kts.line(&format!("versionCode = {}", config.identity.version_code));
    kts.line(&format!("versionName = {}", quote(&config.identity.version_name)));
    if config.packaging.multidex {
        kts.line("multiDexEnabled = true");
    }
    kts.close();

    if !config.build_types.is_empty() {
        kts.blank();
        kts.open("buildTypes");
        for (name, build_type) in &config.build_types {
            let accessor = if IMPLICIT_BUILD_TYPES.contains(&name.as_str()) {
                "getByName"
            } else {
                "create"
            };
            kts.open(&format!("{}({})", accessor, quote(name)));
            kts.line(&format!("isMinifyEnabled = {}", build_type.minify));
            kts.line(&format!("isShrinkResources = {}", build_type.shrink_resources));
            if !build_type.proguard_rules.is_empty() {
                kts.line("proguardFiles(");
                kts.depth += 1;
                let last = build_type.proguard_rules.len() - 1;
                for (i, rule) in build_type.proguard_rules.iter().enumerate() {
                    let separator = if i == last { "" } else { "," };
                    kts.line(&format!("{}{}", proguard_argument(rule), separator));
                }
                kts.depth -= 1;
                kts.line(")");
            }
            kts.close();
        }
        kts.close();
    }

    if !config.packaging.resource_excludes.is_empty() {
        kts.blank();
        kts.open("packaging");
        for pattern in &config.packaging.resource_excludes {
            kts.line(&format!("resources.excludes.add({})", quote(pattern)));
        }
        kts.close();
    }
    kts.close();

    if let Some(framework) = &config.framework {
        kts.blank();
        kts.open("flutter");
        kts.line(&format!("source = {}", quote(&framework.source)));
        kts.close();
    }

    kts.blank();
    kts.open("dependencies");
    for dependency in &config.dependencies {
        kts.line(&dependency_line(dependency));
    }
    kts.close();

    kts.out
}
