//! Manifest error taxonomy

use pannel_core::{Error, ErrorCode};
use pannel_core::validation::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for manifest operations
pub type Result<T> = std::result::Result<T, ManifestError>;

/// Everything that can make a manifest unusable. All variants are fatal.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("invalid range for `{field}`: {message}")]
    InvalidRange { field: String, message: String },

    #[error("invalid value for `{field}`: {message}")]
    InvalidValue { field: String, message: String },

    #[error("invalid dependency coordinate '{coordinate}': {reason}")]
    InvalidCoordinate { coordinate: String, reason: String },

    #[error("dependency '{coordinate}' is declared more than once for `{configuration}`")]
    DuplicateDependency {
        configuration: String,
        coordinate: String,
    },

    #[error("plugin '{0}' has no registered capability module")]
    UnknownPlugin(String),

    #[error("build type '{0}' is not declared in the manifest")]
    UnknownBuildType(String),

    #[error("failed to parse manifest {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Workspace error code for this variant
    pub fn code(&self) -> ErrorCode {
        match self {
            ManifestError::MissingField { .. } => ErrorCode::MissingField,
            ManifestError::InvalidRange { .. } => ErrorCode::InvalidRange,
            ManifestError::InvalidValue { .. } => ErrorCode::InvalidConfigValue,
            ManifestError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            ManifestError::DuplicateDependency { .. } => ErrorCode::DuplicateDependency,
            ManifestError::UnknownPlugin(_) => ErrorCode::UnknownPlugin,
            ManifestError::UnknownBuildType(_) => ErrorCode::UnknownBuildType,
            ManifestError::Parse { .. } => ErrorCode::ConfigParseError,
            ManifestError::Io { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
                _ => ErrorCode::IoError,
            },
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ManifestError::MissingField { field } => {
                Some(format!("Declare `{}` in the build manifest", field))
            }
            ManifestError::InvalidRange { .. } => {
                Some("SDK levels must satisfy min_sdk <= target_sdk <= compile_sdk".to_string())
            }
            ManifestError::UnknownPlugin(_) => {
                Some("Remove the plugin or register a capability module for it".to_string())
            }
            ManifestError::DuplicateDependency { .. } => Some(
                "Remove the repeated declaration or set [dependencies] duplicates = \"warn\""
                    .to_string(),
            ),
            ManifestError::Io { .. } => {
                Some("Check the path or pass --manifest to point at the build manifest".to_string())
            }
            _ => None,
        }
    }
}

impl From<&ValidationError> for ManifestError {
    fn from(err: &ValidationError) -> Self {
        match err.code.as_str() {
            "REQUIRED" => ManifestError::MissingField {
                field: err.field.clone(),
            },
            "ORDER" => ManifestError::InvalidRange {
                field: err.field.clone(),
                message: err.message.clone(),
            },
            _ => ManifestError::InvalidValue {
                field: err.field.clone(),
                message: err.message.clone(),
            },
        }
    }
}

impl From<ManifestError> for Error {
    fn from(err: ManifestError) -> Self {
        let suggestion = err.suggestion();
        let error = Error::new(err.code(), err.to_string());
        let error = match suggestion {
            Some(s) => error.with_suggestion(s),
            None => error,
        };
        error.with_source(err)
    }
}
