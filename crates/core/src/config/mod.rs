//! Tool configuration loading and schema definitions
//!
//! The tool configuration is separate from the build manifest: it says where the
//! manifest lives and how strictly to treat it.

mod loader;
mod schema;

pub use loader::{Config, CONFIG_CANDIDATES};
pub use schema::*;
