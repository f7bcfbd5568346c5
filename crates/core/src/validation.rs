//! Field validation
//!
//! Provides a fluent validator that collects every failed check, so a caller
//! can report the first error or all of them at once.
//!
//! # Example
//!
//! ```rust
//! use pannel_core::validation::Validator;
//!
//! let min_sdk: Option<u32> = Some(30);
//! let result = Validator::new()
//!     .present("sdk.min_sdk", &min_sdk)
//!     .ordered("sdk", ("min_sdk", 30), ("target_sdk", 23))
//!     .validate();
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].code, "ORDER");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// First error in the order the checks were declared
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Take the warnings, dropping errors
    pub fn into_warnings(self) -> Vec<ValidationError> {
        self.warnings
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a field is not empty
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate that an optional field was provided
    pub fn present<T>(mut self, field: &str, value: &Option<T>) -> Self {
        if value.is_none() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("a value".to_string()),
                actual: Some("missing".to_string()),
            });
        }
        self
    }

    /// Validate against a regex pattern
    pub fn pattern(mut self, field: &str, value: &str, pattern: &str, description: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(value) {
                    self.result.add_error(ValidationError {
                        field: field.to_string(),
                        message: format!("Must match {}", description),
                        code: "PATTERN".to_string(),
                        expected: Some(description.to_string()),
                        actual: Some(value.to_string()),
                    });
                }
            }
            Err(_) => {
                self.result.add_error(ValidationError {
                    field: field.to_string(),
                    message: "Invalid validation pattern".to_string(),
                    code: "INTERNAL".to_string(),
                    expected: None,
                    actual: None,
                });
            }
        }
        self
    }

    /// Validate a numeric range
    pub fn range<T: PartialOrd + Display>(mut self, field: &str, value: T, min: T, max: T) -> Self {
        if value < min || value > max {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be between {} and {}", min, max),
                code: "RANGE".to_string(),
                expected: Some(format!("{} - {}", min, max)),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate that `lower.1 <= upper.1`, naming both sides in the message
    pub fn ordered<T: PartialOrd + Display>(
        mut self,
        field: &str,
        lower: (&str, T),
        upper: (&str, T),
    ) -> Self {
        let (lower_name, lower_value) = lower;
        let (upper_name, upper_value) = upper;
        if lower_value > upper_value {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!(
                    "{} ({}) must not exceed {} ({})",
                    lower_name, lower_value, upper_name, upper_value
                ),
                code: "ORDER".to_string(),
                expected: Some(format!("{} <= {}", lower_name, upper_name)),
                actual: Some(format!("{} > {}", lower_value, upper_value)),
            });
        }
        self
    }

    /// Add a custom validation
    pub fn custom<F>(mut self, field: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        if let Some(message) = f() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message,
                code: "CUSTOM".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Add a warning (non-blocking)
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}
