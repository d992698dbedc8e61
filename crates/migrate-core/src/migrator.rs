//! Instrumentation engine
//!
//! [`Migrator`] turns an old [`Library`] into an instrumented one. Every
//! instrumented call returns exactly what the old implementation returns,
//! while the equivalent call on the new implementation is attempted with
//! sanitized arguments and any divergence is reported once.
//!
//! # Per-call protocol
//!
//! 1. Render the arguments into a [`Diagnostic`]
//! 2. Announce a rename, if the method has one that is not ignored
//! 3. Ignore-result methods call the old function and return
//! 4. Sanitize arguments and receiver for the probe
//! 5. Call the old function; its error propagates as-is
//! 6. Call the new function; errors, panics and absence become `undefined`
//! 7. Report a divergence, then return the old result

use crate::chain::ChainOutput;
use crate::judge::diverges;
use crate::library::{Library, Method, MixinOptions, Receiver, Surface};
use crate::logger::DedupLogger;
use crate::message::{Diagnostic, MessageTemplates};
use crate::sanitize::sanitize_call;
use migrate_policy::{MethodDescriptor, MigrateConfig, PolicyTables, RenderOptions};
use migrate_value::{inspect_args, inspect_with, truncate, Thrown, Value};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Instruments old libraries against one new library
///
/// Cheap to clone; clones share the new library, policy and logger.
#[derive(Debug, Clone)]
pub struct Migrator {
    inner: Arc<MigratorInner>,
}

#[derive(Debug)]
struct MigratorInner {
    new: Library,
    policy: PolicyTables,
    render: RenderOptions,
    templates: MessageTemplates,
    logger: Arc<DedupLogger>,
}

impl Migrator {
    /// Create migrator probing `new`
    #[must_use]
    pub fn new(new: Library, config: MigrateConfig, logger: Arc<DedupLogger>) -> Self {
        let MigrateConfig {
            policy,
            render,
            messages,
        } = config;
        Self {
            inner: Arc::new(MigratorInner {
                new,
                policy,
                render,
                templates: MessageTemplates::new(messages),
                logger,
            }),
        }
    }

    /// Create migrator with default configuration logging to standard output
    #[must_use]
    pub fn with_defaults(new: Library) -> Self {
        Self::new(new, MigrateConfig::default(), Arc::new(DedupLogger::stdout()))
    }

    /// The shared logger
    #[inline]
    #[must_use]
    pub fn logger(&self) -> &Arc<DedupLogger> {
        &self.inner.logger
    }

    /// The policy tables
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &PolicyTables {
        &self.inner.policy
    }

    /// The library being probed
    #[inline]
    #[must_use]
    pub fn new_library(&self) -> &Library {
        &self.inner.new
    }

    /// Instrument `old`
    ///
    /// Absent names are skipped; this never fails.
    #[must_use]
    pub fn wrap(&self, old: Library) -> Library {
        let policy = &self.inner.policy;
        let mut instrumented = old.clone();
        let mut installed = 0usize;

        for name in old.static_names() {
            let descriptor = policy.describe(name);
            if let Some(method) = self.instrument_method(&old, descriptor, Surface::Static) {
                instrumented.install(Surface::Static, method);
                installed += 1;
            }
        }

        for name in old.prototype_names() {
            let descriptor = policy.describe(name);
            if !descriptor.is_sequence {
                continue;
            }
            if let Some(method) = self.instrument_method(&old, descriptor, Surface::Prototype) {
                instrumented.install(Surface::Prototype, method);
                installed += 1;
            }
        }

        for name in &policy.unwrapped {
            if let Some(method) = instrumented.static_method(name).cloned() {
                instrumented.mixin(name, method, MixinOptions::unchained());
            }
        }

        if let Some(factory) = old.context_factory().cloned() {
            let migrator = self.clone();
            instrumented.with_context_factory(move |context| {
                factory(context).map(|fresh| migrator.wrap(fresh))
            });
        }

        if let Some(name) = policy.conditional_wrap.as_deref() {
            if let Some(method) = instrumented.static_method(name).cloned() {
                instrumented.define_prototype(name, move |receiver, args| {
                    let chain_all = receiver.chain_all();
                    let count = args.first();
                    let explicit_count = count.is_some_and(|n| !n.is_nullish());

                    let mut call_args = vec![receiver.wrapped()];
                    call_args.extend(count.cloned());
                    let result = method.call_static(&call_args)?;
                    Ok(ChainOutput::select(result, chain_all, explicit_count).into())
                });
            }
        }

        for alias in &policy.value_aliases {
            let mut descriptor = policy.describe(alias);
            descriptor.is_sequence = true;
            if let Some(method) = self.instrument_method(&old, descriptor, Surface::Prototype) {
                instrumented.install(Surface::Prototype, method);
            }
        }

        tracing::info!(
            old = old.version(),
            new = self.inner.new.version(),
            installed,
            "instrumented library"
        );
        instrumented
    }

    /// Build the instrumented replacement for one method of `old`
    ///
    /// Returns `None` if `old` has no such method on `surface`.
    #[must_use]
    pub fn instrument_method(
        &self,
        old: &Library,
        descriptor: MethodDescriptor,
        surface: Surface,
    ) -> Option<Method> {
        let old_fn = old.method(surface, &descriptor.name)?.clone();
        let new_fn = self.inner.new.method(surface, &descriptor.new_name).cloned();
        tracing::trace!(
            method = %descriptor.name,
            new_name = %descriptor.new_name,
            ?surface,
            probed = new_fn.is_some(),
            "instrumenting method"
        );

        let migrator = self.clone();
        let old_version = old.version().to_string();
        let name = descriptor.name.clone();
        Some(Method::new(&name, move |receiver, args| {
            migrator.invoke(
                &descriptor,
                &old_version,
                &old_fn,
                new_fn.as_ref(),
                receiver,
                args,
            )
        }))
    }

    fn invoke(
        &self,
        descriptor: &MethodDescriptor,
        old_version: &str,
        old_fn: &Method,
        new_fn: Option<&Method>,
        receiver: &Receiver,
        args: &[Value],
    ) -> Result<Value, Thrown> {
        let inner = &*self.inner;
        let record = Diagnostic::new(
            descriptor,
            truncate(&inspect_args(args, &inner.render), &inner.render),
            old_version,
            inner.new.version(),
        );

        if descriptor.announces_rename() {
            inner.logger.log(inner.templates.rename(&record));
        }
        if descriptor.ignore_result {
            return old_fn.call(receiver, args);
        }

        let (probe_receiver, probe_args) = sanitize_call(receiver, args, descriptor);

        let old_result = old_fn.call(receiver, args)?;
        let new_result = probe(descriptor, new_fn, &probe_receiver, &probe_args);

        if diverges(&old_result, &new_result) {
            let render = |value: &Value| truncate(&inspect_with(value, &inner.render), &inner.render);
            let record = record.with_results(render(&old_result), render(&new_result));
            if inner.logger.log(inner.templates.migrate(&record)) {
                tracing::debug!(method = %descriptor.name, "reported divergence");
            }
        }
        Ok(old_result)
    }
}

/// Attempt the new call; nothing escapes
///
/// Panics are caught, but the process panic hook still runs first, so the
/// default hook prints the panic message to stderr. Hosts that want silent
/// probes install their own hook with [`std::panic::set_hook`].
fn probe(
    descriptor: &MethodDescriptor,
    new_fn: Option<&Method>,
    receiver: &Receiver,
    args: &[Value],
) -> Value {
    let Some(new_fn) = new_fn else {
        return Value::Undefined;
    };
    match panic::catch_unwind(AssertUnwindSafe(|| new_fn.call(receiver, args))) {
        Ok(Ok(value)) => value,
        Ok(Err(thrown)) => {
            tracing::debug!(method = %descriptor.new_name, error = %thrown, "probe threw");
            Value::Undefined
        }
        Err(_) => {
            tracing::debug!(method = %descriptor.new_name, "probe panicked");
            Value::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MemorySink;

    fn add(args: &[Value]) -> f64 {
        args.iter().filter_map(Value::as_f64).sum()
    }

    fn migrator(new: Library, policy: PolicyTables) -> (Migrator, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Arc::new(DedupLogger::new(sink.clone()));
        let config = MigrateConfig::default().with_policy(policy);
        (Migrator::new(new, config, logger), sink)
    }

    #[test]
    fn instrument_method_skips_absent_names() {
        let (m, _) = migrator(Library::new("4"), PolicyTables::empty());
        let old = Library::new("3");
        let d = MethodDescriptor::plain("missing");
        assert!(m.instrument_method(&old, d, Surface::Static).is_none());
    }

    #[test]
    fn instrumented_method_keeps_name() {
        let mut old = Library::new("3");
        old.define_static("add", |_, args| Ok(Value::from(add(args))));
        let (m, _) = migrator(old.clone(), PolicyTables::empty());

        let method = m
            .instrument_method(&old, MethodDescriptor::plain("add"), Surface::Static)
            .unwrap();
        assert_eq!(method.name(), "add");
    }

    #[test]
    fn probe_contains_panics() {
        let mut new = Library::new("4");
        new.define_static("boom", |_, _| panic!("probe failure"));
        let (m, sink) = migrator(new, PolicyTables::empty());

        let mut old = Library::new("3");
        old.define_static("boom", |_, _| Ok(Value::Undefined));
        let lib = m.wrap(old);

        let out = lib.call("boom", &[]).unwrap();
        assert!(matches!(out, Value::Undefined));
        assert!(sink.is_empty());
    }

    #[test]
    fn accessors_expose_shared_state() {
        let (m, _) = migrator(Library::new("4.0.0"), PolicyTables::empty());
        let clone = m.clone();
        assert!(Arc::ptr_eq(m.logger(), clone.logger()));
        assert_eq!(m.new_library().version(), "4.0.0");
        assert!(m.policy().rename.is_empty());
    }
}
