//! Gradle build system hand-off
//!
//! The resolved configuration is consumed by an external build tool. This
//! module maps build types to Gradle tasks and runs them through the project's
//! Gradle wrapper.

use crate::error::ManifestError;
use crate::model::ResolvedConfig;
use pannel_core::error::{Error, ErrorCode, Result};
use pannel_core::process::{run_command_in_dir, CommandResult};
use std::path::PathBuf;

/// Build type every Android module has, declared or not
pub const DEBUG: &str = "debug";

/// Kind of installable output to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// `assemble<BuildType>`
    Apk,
    /// `bundle<BuildType>`
    Bundle,
}

/// An external tool that runs named build tasks
pub trait BuildTool {
    /// Run one task and capture its output
    fn run_task(&self, task: &str) -> Result<CommandResult>;
}

/// The `gradlew` script in a project directory
#[derive(Debug, Clone)]
pub struct GradleWrapper {
    project_dir: PathBuf,
}

impl GradleWrapper {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    /// Wrapper script name for the current platform
    pub fn script() -> &'static str {
        if cfg!(windows) {
            "gradlew.bat"
        } else {
            "./gradlew"
        }
    }

    /// Whether the wrapper script exists in the project directory
    pub fn is_available(&self) -> bool {
        let name = Self::script().trim_start_matches("./");
        self.project_dir.join(name).is_file()
    }
}

impl BuildTool for GradleWrapper {
    fn run_task(&self, task: &str) -> Result<CommandResult> {
        if !self.is_available() {
            return Err(Error::new(
                ErrorCode::GradleError,
                format!("Gradle wrapper not found in {}", self.project_dir.display()),
            )
            .with_suggestion("Run `gradle wrapper` in the Android project or pass --project-dir"));
        }

        tracing::info!(task, dir = %self.project_dir.display(), "Running Gradle task");
        run_command_in_dir(Self::script(), &[task], &self.project_dir)
    }
}

/// Gradle task producing `artifact` for `build_type`
///
/// `debug` is always accepted; any other build type must be declared.
pub fn assemble_task(
    config: &ResolvedConfig,
    build_type: &str,
    artifact: Artifact,
) -> std::result::Result<String, ManifestError> {
    if build_type != DEBUG && config.build_type(build_type).is_none() {
        return Err(ManifestError::UnknownBuildType(build_type.to_string()));
    }

    let prefix = match artifact {
        Artifact::Apk => "assemble",
        Artifact::Bundle => "bundle",
    };
    Ok(format!("{}{}", prefix, capitalize(build_type)))
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Hand a validated configuration to `tool` and build `build_type`
pub fn build(
    tool: &dyn BuildTool,
    config: &ResolvedConfig,
    build_type: &str,
    artifact: Artifact,
) -> Result<CommandResult> {
    let task = assemble_task(config, build_type, artifact)?;
    let result = tool.run_task(&task)?;
    if !result.success {
        tracing::warn!(task = %task, exit_code = result.exit_code, "Gradle task failed");
    }
    Ok(result)
}
