//! Migrate Policy
//!
//! Lookup tables that tell the instrumentation engine how to treat each
//! method: which names were renamed, which results are not worth comparing,
//! which methods take iteration callbacks, and which live on the chain
//! wrapper.
//!
//! # Example
//!
//! ```rust
//! use migrate_policy::{MigrateConfig, PolicyTables};
//!
//! let tables = PolicyTables::default();
//! let descriptor = tables.describe("contains");
//! assert_eq!(descriptor.new_name, "includes");
//!
//! let config = MigrateConfig::from_toml_str("[messages]\ntag = \"probe\"").unwrap();
//! assert_eq!(config.messages.tag, "probe");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod defaults;
mod descriptor;
mod error;
mod lint;
mod tables;

// Re-exports
pub use config::{MessageOptions, MigrateConfig};
pub use descriptor::MethodDescriptor;
pub use error::ConfigError;
pub use lint::{PolicyIssue, Severity};
pub use migrate_value::RenderOptions;
pub use tables::PolicyTables;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
