//! Terminal output helpers for the pannel build manifest tools
//!
//! Status lines, key/value listings, and small formatting helpers shared by
//! the binaries.

#![warn(missing_docs)]

pub mod output;
