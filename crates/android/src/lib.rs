//! Android build manifest loading for the pannel tools
//!
//! This crate provides:
//! - The build manifest document and its TOML/JSON parsing
//! - Validation into an immutable [`ResolvedConfig`]
//! - Capability modules for applied build plugins
//! - Gradle Kotlin DSL rendering and the Gradle wrapper hand-off
//!
//! # Example
//!
//! ```rust
//! use pannel_android::{load, ManifestDocument};
//!
//! let doc = ManifestDocument::from_toml_str(r#"
//! plugins = ["com.android.application"]
//! [identity]
//! application_id = "com.example.admin_pannel"
//! [sdk]
//! min_sdk = 23
//! target_sdk = 34
//! compile_sdk = 35
//! "#).unwrap();
//!
//! let config = load(&doc).unwrap();
//! assert_eq!(config.sdk.min_sdk, 23);
//! ```

pub mod capability;
pub mod error;
pub mod gradle;
pub mod loader;
pub mod manifest;
pub mod model;
pub mod render;

pub use capability::{Capability, CapabilityRegistry};
pub use error::{ManifestError, Result};
pub use loader::{load, resolve_dependencies, Loader};
pub use manifest::ManifestDocument;
pub use model::{
    AppIdentity, BuildTypeConfig, Configuration, Coordinate, DependencyDeclaration,
    PackagingRules, ResolvedConfig, SdkConstraints,
};
