//! Migrate Value Model
//!
//! Dynamic values exchanged between an instrumented library and its probe.
//!
//! # Core Concepts
//!
//! - [`Value`]: dynamically-typed value with reference-semantics containers
//! - [`Function`]: callable value with an explicit-return flag
//! - [`ChainWrapper`]: fluent chaining wrapper surfaced as a value
//! - [`Thrown`]: error half of every call
//! - [`inspect`] / [`truncate`]: bounded human-readable rendering
//! - [`deep_clone`]: cycle-preserving copy
//! - [`is_comparable`] / [`deep_equal`]: comparison primitives
//!
//! # Example
//!
//! ```rust
//! use migrate_value::{deep_clone, deep_equal, inspect, Value};
//!
//! let original = Value::array([1, 2]);
//! let copy = deep_clone(&original);
//!
//! assert!(deep_equal(&original, &copy));
//! assert_eq!(inspect(&copy), "[ 1, 2 ]");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod clone;
mod compare;
mod render;
mod value;

// Re-exports
pub use clone::{deep_clone, deep_clone_all};
pub use compare::{deep_equal, is_comparable};
pub use render::{format_number, inspect, inspect_args, inspect_with, truncate, RenderOptions};
pub use value::{Array, ChainWrapper, Function, NativeFn, Object, Opaque, Symbol, Thrown, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
