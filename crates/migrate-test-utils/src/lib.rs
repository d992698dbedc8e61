//! Testing utilities for libmigrate workspace
//!
//! Shared fixtures: a small "old" and "new" library pair with call spies, and
//! a harness that wires them to a migrator with an in-memory sink.

#![allow(missing_docs)]

use migrate_core::{DedupLogger, Library, MemorySink, Migrator, Receiver};
use migrate_policy::MigrateConfig;
use migrate_value::{deep_equal, ChainWrapper, Function, Thrown, Value};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub const OLD_VERSION: &str = "3.10.1";
pub const NEW_VERSION: &str = "4.0.0";

/// Counts calls per method name
#[derive(Debug, Default)]
pub struct CallCounter {
    calls: Mutex<HashMap<String, usize>>,
}

impl CallCounter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, name: &str) {
        *self.calls.lock().entry(name.to_string()).or_default() += 1;
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

fn numbers(args: &[Value]) -> impl Iterator<Item = f64> + '_ {
    args.iter().filter_map(Value::as_f64)
}

fn array_items(value: &Value) -> Vec<Value> {
    value.as_array().map(|a| a.items()).unwrap_or_default()
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn callback(args: &[Value], index: usize) -> Result<Function, Thrown> {
    args.get(index)
        .and_then(Value::as_function)
        .cloned()
        .ok_or_else(|| Thrown::type_error("Expected a function"))
}

/// Define a static and a spy entry for it
fn spied<F>(lib: &mut Library, spy: &Arc<CallCounter>, name: &str, body: F)
where
    F: Fn(&Receiver, &[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
{
    let spy = Arc::clone(spy);
    let key = name.to_string();
    lib.define_static(name, move |receiver, args| {
        spy.record(&key);
        body(receiver, args)
    });
}

fn spied_prototype<F>(lib: &mut Library, spy: &Arc<CallCounter>, name: &str, body: F)
where
    F: Fn(&Receiver, &[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
{
    let spy = Arc::clone(spy);
    let key = format!("#{name}");
    lib.define_prototype(name, move |receiver, args| {
        spy.record(&key);
        body(receiver, args)
    });
}

fn define_shared(lib: &mut Library, spy: &Arc<CallCounter>) {
    spied(lib, spy, "add", |_, args| Ok(Value::from(numbers(args).sum::<f64>())));

    spied(lib, spy, "forEach", |_, args| {
        let collection = arg(args, 0);
        let iteratee = callback(args, 1)?;
        for (index, item) in array_items(&collection).into_iter().enumerate() {
            iteratee.call(&[item, Value::from(index)])?;
        }
        Ok(collection)
    });

    spied(lib, spy, "times", |_, args| {
        let n = args.first().and_then(Value::as_f64).unwrap_or(0.0);
        let iteratee = callback(args, 1)?;
        let mut out = Vec::new();
        let mut index = 0usize;
        while (index as f64) < n {
            out.push(iteratee.call(&[Value::from(index)])?);
            index += 1;
        }
        Ok(Value::array(out))
    });

    spied(lib, spy, "append", |_, args| {
        let target = arg(args, 0);
        let array = target
            .as_array()
            .ok_or_else(|| Thrown::type_error("Expected an array"))?;
        array.push(arg(args, 1));
        Ok(Value::from(array.len()))
    });

    spied(lib, spy, "constant", |_, args| {
        let value = arg(args, 0);
        Ok(Function::new(move |_| Ok(value.clone())).into())
    });

    spied(lib, spy, "sample", |_, args| {
        let items = array_items(&arg(args, 0));
        match args.get(1).and_then(Value::as_f64) {
            Some(n) => Ok(Value::array(items.into_iter().take(n as usize))),
            None => Ok(items.into_iter().next().unwrap_or_default()),
        }
    });

    spied(lib, spy, "uniqueId", |_, _| Ok(Value::from("id_1")));

    spied_prototype(lib, spy, "value", |receiver, _| Ok(receiver.wrapped()));
    spied_prototype(lib, spy, "valueOf", |receiver, _| Ok(receiver.wrapped()));
    spied_prototype(lib, spy, "toJSON", |receiver, _| Ok(receiver.wrapped()));
}

fn includes(args: &[Value]) -> Value {
    let target = arg(args, 1);
    Value::from(
        array_items(&arg(args, 0))
            .iter()
            .any(|item| deep_equal(item, &target)),
    )
}

/// Old library fixture
///
/// Differs from [`new_library`] in `foo`, `max` on empty input, `flaky`,
/// `explode` and the prototype `reverse`, and uses lodash 3 names.
pub fn old_library(spy: &Arc<CallCounter>) -> Library {
    let mut lib = Library::new(OLD_VERSION);
    define_shared(&mut lib, spy);

    spied(&mut lib, spy, "foo", |_, args| Ok(Value::from(numbers(args).sum::<f64>())));
    spied(&mut lib, spy, "contains", |_, args| Ok(includes(args)));
    spied(&mut lib, spy, "first", |_, args| {
        Ok(array_items(&arg(args, 0)).into_iter().next().unwrap_or_default())
    });
    spied(&mut lib, spy, "max", |_, args| {
        Ok(Value::from(
            numbers(&array_items(&arg(args, 0))).fold(f64::NEG_INFINITY, f64::max),
        ))
    });
    spied(&mut lib, spy, "flaky", |_, _| Ok(Value::from(1)));
    spied(&mut lib, spy, "explode", |_, _| Err(Thrown::error("Error", "boom")));

    spied_prototype(&mut lib, spy, "run", |receiver, _| Ok(receiver.wrapped()));
    spied_prototype(&mut lib, spy, "reverse", |receiver, _| {
        let wrapped = receiver.wrapped();
        if let Some(array) = wrapped.as_array() {
            let mut items = array.items();
            items.reverse();
            for (index, item) in items.into_iter().enumerate() {
                array.set(index, item);
            }
        }
        Ok(ChainWrapper::new(wrapped, receiver.chain_all()).into())
    });

    let factory_spy = Arc::clone(spy);
    lib.with_context_factory(move |_| Ok(old_library(&factory_spy)));
    lib
}

/// New library fixture
pub fn new_library(spy: &Arc<CallCounter>) -> Library {
    let mut lib = Library::new(NEW_VERSION);
    define_shared(&mut lib, spy);

    spied(&mut lib, spy, "foo", |_, args| {
        Ok(Value::from(numbers(args).sum::<f64>() + 1.0))
    });
    spied(&mut lib, spy, "includes", |_, args| Ok(includes(args)));
    spied(&mut lib, spy, "head", |_, args| {
        Ok(array_items(&arg(args, 0)).into_iter().next().unwrap_or_default())
    });
    spied(&mut lib, spy, "max", |_, args| {
        Ok(numbers(&array_items(&arg(args, 0)))
            .reduce(f64::max)
            .map(Value::from)
            .unwrap_or_default())
    });
    spied(&mut lib, spy, "flaky", |_, _| Err(Thrown::error("Error", "not yet")));
    spied(&mut lib, spy, "explode", |_, _| Ok(Value::from(1)));

    // reverse forgets to reverse
    spied_prototype(&mut lib, spy, "reverse", |receiver, _| {
        Ok(ChainWrapper::new(receiver.wrapped(), receiver.chain_all()).into())
    });
    lib
}

/// Old/new fixtures wired to a migrator writing to memory
pub struct Harness {
    pub lib: Library,
    pub migrator: Migrator,
    pub sink: Arc<MemorySink>,
    pub old_calls: Arc<CallCounter>,
    pub new_calls: Arc<CallCounter>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(MigrateConfig::default())
    }

    pub fn with_config(config: MigrateConfig) -> Self {
        let old_calls = CallCounter::new();
        let new_calls = CallCounter::new();
        let sink = Arc::new(MemorySink::new());
        let logger = Arc::new(DedupLogger::new(sink.clone()));
        let migrator = Migrator::new(new_library(&new_calls), config, logger);
        let lib = migrator.wrap(old_library(&old_calls));
        Self {
            lib,
            migrator,
            sink,
            old_calls,
            new_calls,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sink.messages()
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, Thrown> {
        self.lib.call(name, args)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Uninstrumented old library with its own spy
pub fn baseline() -> Library {
    old_library(&CallCounter::new())
}
