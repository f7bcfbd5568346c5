//! Core utilities for the pannel build manifest tools
//!
//! This crate provides shared functionality used by the platform crates and the binary:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Validation**: Fluent field validation that collects errors and warnings
//! - **Configuration**: TOML-based tool configuration with defaults
//! - **Process execution**: Running the external build tool and capturing output
//!
//! # Example
//!
//! ```rust
//! use pannel_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("application_id", "com.example.admin_pannel")
//!     .ordered("sdk", ("min_sdk", 23), ("target_sdk", 34))
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;
pub mod validation;

pub use error::{Error, ErrorCode, Result};
