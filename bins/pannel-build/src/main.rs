//! pannel-build CLI
//!
//! Validates the Android build manifest of the admin panel app and hands the
//! resolved configuration to Gradle.

use anyhow::Result;
use clap::{Parser, Subcommand};
use pannel_android::gradle::{self, Artifact, GradleWrapper};
use pannel_android::{
    render, resolve_dependencies, CapabilityRegistry, Loader, ManifestDocument, ResolvedConfig,
};
use pannel_cli::output::{format_count, format_duration, yes_no, Status};
use pannel_core::config::{Config, DuplicatePolicy};
use pannel_core::error::{exit_codes, Error};
use pannel_telemetry::{TelemetryConfig, Timer};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pannel-build")]
#[command(about = "Validate the Android build manifest and hand it to Gradle")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Build manifest path (overrides general.manifest)
    #[arg(short, long, global = true, env = "PANNEL_MANIFEST")]
    manifest: Option<PathBuf>,

    /// Duplicate dependency policy: allow, warn, deny (overrides config)
    #[arg(long, global = true)]
    duplicates: Option<DuplicatePolicy>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the manifest and report warnings
    Check,

    /// Print the resolved configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List dependencies in declaration order
    Deps {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the Gradle Kotlin DSL for the app module
    Render {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate, then run the Gradle wrapper
    Build {
        /// Build type to assemble
        #[arg(long, default_value = gradle::DEBUG)]
        build_type: String,
        /// Build bundle (AAB) instead of APK
        #[arg(long)]
        bundle: bool,
        /// Android project directory containing gradlew
        #[arg(long, default_value = "android")]
        project_dir: PathBuf,
    },
}

/// Settings shared by every command
struct Context {
    manifest: PathBuf,
    duplicates: DuplicatePolicy,
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&e.to_string());
            std::process::exit(e.code.exit_code());
        }
    };

    let telemetry = TelemetryConfig {
        log_level: config.schema.logging.level.clone(),
        json: cli.log_json,
        ..TelemetryConfig::default()
    }
    .with_verbosity(cli.verbose, cli.quiet);
    pannel_telemetry::init_with_config(telemetry)?;

    if let Some(path) = &config.path {
        tracing::debug!(config = %path.display(), "Loaded tool configuration");
    }

    let ctx = Context {
        manifest: cli
            .manifest
            .unwrap_or_else(|| config.schema.general.manifest.clone()),
        duplicates: cli.duplicates.unwrap_or(config.schema.dependencies.duplicates),
        quiet: cli.quiet,
    };

    let exit_code = match cli.command {
        Commands::Check => run_check(&ctx),
        Commands::Show { json } => run_show(&ctx, json),
        Commands::Deps { json } => run_deps(&ctx, json),
        Commands::Render { output } => run_render(&ctx, output.as_deref()),
        Commands::Build {
            build_type,
            bundle,
            project_dir,
        } => run_build(&ctx, &build_type, bundle, &project_dir),
    };

    std::process::exit(exit_code);
}

fn load_manifest(ctx: &Context) -> pannel_core::Result<(ResolvedConfig, Duration)> {
    let timer = Timer::start("load_manifest");
    let document = ManifestDocument::from_path(&ctx.manifest)?;
    let config = Loader::new(CapabilityRegistry::builtin())
        .with_duplicate_policy(ctx.duplicates)
        .load(&document)
        .map_err(|e| {
            Error::from(e).with_context(format!("While loading {}", ctx.manifest.display()))
        })?;
    Ok((config, timer.stop()))
}

fn fail(err: &Error) -> i32 {
    Status::error(&err.to_string());
    err.code.exit_code()
}

/// Like [`fail`], but JSON callers also get the error report on stdout
fn fail_json(err: &Error, json: bool) -> i32 {
    if json {
        match serde_json::to_string_pretty(&err.to_report()) {
            Ok(out) => println!("{}", out),
            Err(e) => tracing::error!(error = %e, "Failed to serialize error report"),
        }
    }
    fail(err)
}

fn run_check(ctx: &Context) -> i32 {
    let (config, elapsed) = match load_manifest(ctx) {
        Ok(loaded) => loaded,
        Err(e) => return fail(&e),
    };

    if !ctx.quiet {
        Status::success(&format!(
            "{} is valid: {}, {}, {} ({})",
            ctx.manifest.display(),
            config.identity.application_id,
            format_count(config.dependencies.len(), "dependency", "dependencies"),
            format_count(config.warnings.len(), "warning", "warnings"),
            format_duration(elapsed)
        ));
    }
    exit_codes::SUCCESS
}

fn run_show(ctx: &Context, json: bool) -> i32 {
    let (config, _) = match load_manifest(ctx) {
        Ok(loaded) => loaded,
        Err(e) => return fail_json(&e, json),
    };

    if json {
        return match serde_json::to_string_pretty(&config) {
            Ok(out) => {
                println!("{}", out);
                exit_codes::SUCCESS
            }
            Err(e) => fail(&Error::from(e)),
        };
    }

    Status::header("Identity");
    Status::field("application_id", &config.identity.application_id);
    Status::field("namespace", &config.identity.namespace);
    Status::field("version_code", &config.identity.version_code.to_string());
    Status::field("version_name", &config.identity.version_name);

    Status::header("SDK");
    Status::field("min_sdk", &config.sdk.min_sdk.to_string());
    Status::field("target_sdk", &config.sdk.target_sdk.to_string());
    Status::field("compile_sdk", &config.sdk.compile_sdk.to_string());

    Status::header("Build types");
    for (name, build_type) in &config.build_types {
        let rules: Vec<String> = build_type.proguard_rules.iter().map(|r| r.to_string()).collect();
        Status::field(
            name,
            &format!(
                "minify={} shrink_resources={} proguard=[{}]",
                yes_no(build_type.minify),
                yes_no(build_type.shrink_resources),
                rules.join(", ")
            ),
        );
    }

    Status::header("Packaging");
    Status::field("multidex", yes_no(config.packaging.multidex));
    for pattern in &config.packaging.resource_excludes {
        Status::item(&format!("exclude {}", pattern));
    }

    Status::header("Plugins");
    for plugin in &config.plugins {
        Status::item(plugin);
    }

    exit_codes::SUCCESS
}

fn run_deps(ctx: &Context, json: bool) -> i32 {
    let (config, _) = match load_manifest(ctx) {
        Ok(loaded) => loaded,
        Err(e) => return fail_json(&e, json),
    };
    let dependencies = resolve_dependencies(&config.dependencies);

    if json {
        return match serde_json::to_string_pretty(&dependencies) {
            Ok(out) => {
                println!("{}", out);
                exit_codes::SUCCESS
            }
            Err(e) => fail(&Error::from(e)),
        };
    }

    for dependency in &dependencies {
        println!("{}", dependency);
    }
    exit_codes::SUCCESS
}

fn run_render(ctx: &Context, output: Option<&Path>) -> i32 {
    let (config, _) = match load_manifest(ctx) {
        Ok(loaded) => loaded,
        Err(e) => return fail(&e),
    };
    let script = render::gradle_kts(&config);

    match output {
        Some(path) => match std::fs::write(path, script) {
            Ok(()) => {
                if !ctx.quiet {
                    Status::success(&format!("Wrote {}", path.display()));
                }
                exit_codes::SUCCESS
            }
            Err(e) => fail(&Error::from(e).with_context(format!("Writing {}", path.display()))),
        },
        None => {
            print!("{}", script);
            exit_codes::SUCCESS
        }
    }
}

fn run_build(ctx: &Context, build_type: &str, bundle: bool, project_dir: &Path) -> i32 {
    let (config, _) = match load_manifest(ctx) {
        Ok(loaded) => loaded,
        Err(e) => return fail(&e),
    };

    let artifact = if bundle { Artifact::Bundle } else { Artifact::Apk };
    if !ctx.quiet {
        Status::info(&format!(
            "Building {} {}...",
            build_type,
            if bundle { "bundle" } else { "APK" }
        ));
    }

    let tool = GradleWrapper::new(project_dir);
    match gradle::build(&tool, &config, build_type, artifact) {
        Ok(result) if result.success => {
            if !ctx.quiet {
                Status::success("Build succeeded");
            }
            exit_codes::SUCCESS
        }
        Ok(result) => {
            Status::error("Build failed");
            eprintln!("{}", result.stderr);
            exit_codes::FAILURE
        }
        Err(e) => fail(&e),
    }
}
