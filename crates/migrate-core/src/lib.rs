//! Migrate Core
//!
//! Shadow-call instrumentation: every call to an old library version also
//! probes the new version, and behavioral differences are reported once.
//!
//! # Core Concepts
//!
//! - [`Library`]: versioned method registry with static and prototype surfaces
//! - [`Migrator`]: builds instrumented libraries and owns the per-call protocol
//! - [`DedupLogger`]: emits each distinct message once through a [`MessageSink`]
//! - [`ChainOutput`]: raw or re-wrapped result of a prototype method
//! - [`sanitize_call`] / [`diverges`]: probe isolation and result judgement
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use migrate_core::{DedupLogger, Library, MemorySink, Migrator, Value};
//! use migrate_policy::MigrateConfig;
//!
//! let mut old = Library::new("3.10.1");
//! old.define_static("foo", |_, args| {
//!     Ok(Value::from(args.iter().filter_map(Value::as_f64).sum::<f64>()))
//! });
//!
//! let mut new = Library::new("4.0.0");
//! new.define_static("foo", |_, args| {
//!     Ok(Value::from(args.iter().filter_map(Value::as_f64).sum::<f64>() + 1.0))
//! });
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = Arc::new(DedupLogger::new(sink.clone()));
//! let lib = Migrator::new(new, MigrateConfig::default(), logger).wrap(old);
//!
//! let out = lib.call("foo", &[Value::from(5), Value::from(10)]).unwrap();
//! assert_eq!(out.as_f64(), Some(15.0));
//! assert_eq!(
//!     sink.messages(),
//!     vec!["lodash-migrate: _.foo(5, 10)\n  v3.10.1 => 15\n  v4.0.0 => 16\n"]
//! );
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod chain;
mod judge;
mod library;
mod logger;
mod message;
mod migrator;
mod sanitize;

// Re-exports
pub use chain::ChainOutput;
pub use judge::diverges;
pub use library::{
    ContextFactory, Library, Method, MethodFn, MixinOptions, Receiver, Surface,
};
pub use logger::{DedupLogger, MemorySink, MessageSink, StdoutSink, TracingSink};
pub use message::{Diagnostic, MessageTemplates, SideRecord};
pub use migrator::Migrator;
pub use migrate_value::{ChainWrapper, Function, Thrown, Value};
pub use sanitize::{sanitize_args, sanitize_call};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
