use migrate_core::{DedupLogger, Function, Library, MemorySink, Migrator, Value};
use migrate_policy::{MessageOptions, MigrateConfig, PolicyTables};
use migrate_test_utils::{baseline, Harness, NEW_VERSION, OLD_VERSION};
use migrate_value::deep_equal;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn nums(values: &[i32]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

proptest! {
    #[test]
    fn prop_instrumented_results_match_baseline(a in -1000i32..1000, b in -1000i32..1000) {
        let h = Harness::new();
        let old = baseline();
        for name in ["add", "foo", "max"] {
            let args = vec![Value::from(a), Value::from(b)];
            let instrumented = h.call(name, &args).unwrap();
            let expected = old.call(name, &args).unwrap();
            prop_assert!(deep_equal(&instrumented, &expected));
        }
    }
}

#[test]
fn test_concrete_divergence_scenario() {
    let h = Harness::new();
    let out = h.call("foo", &nums(&[5, 10])).unwrap();

    assert_eq!(out.as_f64(), Some(15.0));
    assert_eq!(
        h.messages(),
        vec![format!(
            "lodash-migrate: _.foo(5, 10)\n  v{OLD_VERSION} => 15\n  v{NEW_VERSION} => 16\n"
        )]
    );
}

#[test]
fn test_probe_error_never_reaches_caller() {
    let h = Harness::new();
    let out = h.call("flaky", &[]).unwrap();

    assert_eq!(out.as_f64(), Some(1.0));
    assert_eq!(h.new_calls.count("flaky"), 1);
    let messages = h.sink.matching("_.flaky()");
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("v4.0.0 => undefined"));
}

#[test]
fn test_old_error_propagates_without_probe() {
    let h = Harness::new();
    let err = h.call("explode", &[]).unwrap_err();
    let expected = baseline().call("explode", &[]).unwrap_err();

    assert!(deep_equal(err.value(), expected.value()));
    assert_eq!(h.old_calls.count("explode"), 1);
    assert_eq!(h.new_calls.count("explode"), 0);
    assert!(h.messages().is_empty());
}

#[test]
fn test_identical_diagnostics_are_emitted_once() {
    let h = Harness::new();
    h.call("foo", &nums(&[5, 10])).unwrap();
    h.call("foo", &nums(&[5, 10])).unwrap();
    assert_eq!(h.messages().len(), 1);

    h.call("foo", &nums(&[1, 2])).unwrap();
    assert_eq!(h.messages().len(), 2);
    assert_eq!(h.migrator.logger().len(), 2);
}

#[test]
fn test_distinct_arguments_with_same_rendering_are_emitted_once() {
    let h = Harness::new();
    let ascending: Vec<Value> = (0..60).map(Value::from).collect();
    let mut swapped = ascending.clone();
    swapped.swap(58, 59);

    h.call("foo", &ascending).unwrap();
    h.call("foo", &swapped).unwrap();

    assert_eq!(h.old_calls.count("foo"), 2);
    assert_eq!(h.new_calls.count("foo"), 2);
    assert_eq!(h.messages().len(), 1);
    assert!(h.messages()[0].contains("...)"));
}

#[test]
fn test_sequence_named_statics_are_probed() {
    let mut old = Library::new("3.10.1");
    old.define_static("concat", |_, _| Ok(Value::array([1])));
    old.define_prototype("concat", |receiver, _| Ok(receiver.wrapped()));
    let mut new = Library::new("4.0.0");
    new.define_static("concat", |_, _| Ok(Value::array([1, 2])));
    new.define_prototype("concat", |receiver, _| Ok(receiver.wrapped()));

    let sink = Arc::new(MemorySink::new());
    let logger = Arc::new(DedupLogger::new(sink.clone()));
    let lib = Migrator::new(new, MigrateConfig::default(), logger).wrap(old);

    let out = lib.call("concat", &[]).unwrap();
    assert!(deep_equal(&out, &Value::array([1])));
    assert_eq!(
        sink.messages(),
        vec!["lodash-migrate: _.concat()\n  v3.10.1 => [ 1 ]\n  v4.0.0 => [ 1, 2 ]\n"]
    );

    // the prototype form is instrumented against the new prototype
    let wrapped = lib.call_chain(&lib.wrap(Value::array([3])), "concat", &[]).unwrap();
    assert!(deep_equal(&wrapped, &Value::array([3])));
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_rename_notice_emitted_once() {
    let h = Harness::new();
    let list = Value::array([1, 2, 3]);
    assert!(h.call("contains", &[list.clone(), Value::from(2)]).unwrap().is_truthy());
    assert!(!h.call("contains", &[list.clone(), Value::from(9)]).unwrap().is_truthy());
    h.call("contains", &[list, Value::from(3)]).unwrap();

    assert_eq!(
        h.messages(),
        vec!["lodash-migrate: Method renamed\n  v3.10.1 => _.contains\n  v4.0.0 => _.includes\n"]
    );
    assert_eq!(h.new_calls.count("includes"), 3);
}

#[test]
fn test_ignored_results_skip_probe() {
    let h = Harness::new();
    let out = h.call("sample", &[Value::array([7, 8])]).unwrap();
    assert_eq!(out.as_f64(), Some(7.0));

    let id = h.call("uniqueId", &[]).unwrap();
    assert_eq!(id.as_str(), Some("id_1"));

    assert_eq!(h.old_calls.count("sample"), 1);
    assert_eq!(h.new_calls.count("sample"), 0);
    assert_eq!(h.new_calls.count("uniqueId"), 0);
    assert!(h.messages().is_empty());
}

#[test]
fn test_iteration_callback_runs_once() {
    let h = Harness::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);
    let callback = Function::named("tally", move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Undefined)
    });

    h.call("forEach", &[Value::array([1]), callback.into()]).unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(h.new_calls.count("forEach"), 1);
    assert!(h.messages().is_empty());
}

#[test]
fn test_explicit_return_callback_reaches_probe() {
    let h = Harness::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);
    let double = Function::new(move |args| {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(Value::from(args[0].as_f64().unwrap_or(0.0) * 2.0))
    })
    .with_explicit_return();

    let out = h.call("times", &[Value::from(3), double.into()]).unwrap();

    assert!(deep_equal(&out, &Value::array([0, 2, 4])));
    assert_eq!(counter.load(Ordering::SeqCst), 6);
    assert!(h.messages().is_empty());
}

#[test]
fn test_non_comparable_results_never_reported() {
    let h = Harness::new();
    let a = h.call("constant", &nums(&[1])).unwrap();
    let b = h.call("constant", &nums(&[2])).unwrap();

    assert!(a.as_function().is_some());
    assert!(b.as_function().is_some());
    assert!(h.messages().is_empty());
}

#[test]
fn test_different_comparable_results_reported_once() {
    let mut old = Library::new("1.0.0");
    old.define_static("range", |_, _| Ok(Value::array([1, 2])));
    let mut new = Library::new("2.0.0");
    new.define_static("range", |_, _| Ok(Value::array([1, 2, 3])));

    let sink = Arc::new(MemorySink::new());
    let logger = Arc::new(DedupLogger::new(sink.clone()));
    let config = MigrateConfig::default().with_policy(PolicyTables::empty());
    let lib = Migrator::new(new, config, logger).wrap(old);

    lib.call("range", &[]).unwrap();
    lib.call("range", &[]).unwrap();

    assert_eq!(
        sink.messages(),
        vec!["lodash-migrate: _.range()\n  v1.0.0 => [ 1, 2 ]\n  v2.0.0 => [ 1, 2, 3 ]\n"]
    );
}

#[test]
fn test_empty_max_divergence() {
    let h = Harness::new();
    let out = h.call("max", &[Value::array(Vec::<Value>::new())]).unwrap();

    assert_eq!(out.as_f64(), Some(f64::NEG_INFINITY));
    assert_eq!(
        h.messages(),
        vec!["lodash-migrate: _.max([])\n  v3.10.1 => -Infinity\n  v4.0.0 => undefined\n"]
    );
}

#[test]
fn test_probe_cannot_mutate_caller_arguments() {
    let h = Harness::new();
    let list = Value::array([1, 2]);
    let out = h.call("append", &[list.clone(), Value::from(3)]).unwrap();

    assert_eq!(out.as_f64(), Some(3.0));
    assert_eq!(list.as_array().unwrap().len(), 3);
    assert!(h.messages().is_empty());
}

#[test]
fn test_missing_static_is_type_error() {
    let h = Harness::new();
    let err = h.call("nope", &[]).unwrap_err();
    let message = err.value().as_object().unwrap().get("message").unwrap();
    assert_eq!(message.as_str(), Some("nope is not a function"));
}

#[test]
fn test_run_in_context_instruments_fresh_instances() {
    let h = Harness::new();
    let fresh = h.lib.run_in_context(None).unwrap();
    assert_eq!(fresh.version(), OLD_VERSION);

    assert_eq!(fresh.call("foo", &nums(&[5, 10])).unwrap().as_f64(), Some(15.0));
    assert_eq!(h.messages().len(), 1);

    // shared logger dedups across contexts
    h.call("foo", &nums(&[5, 10])).unwrap();
    assert_eq!(h.messages().len(), 1);

    let nested = fresh.run_in_context(Some(&Value::Null)).unwrap();
    nested.call("flaky", &[]).unwrap();
    assert_eq!(h.sink.matching("_.flaky()").len(), 1);
}

#[test]
fn test_custom_message_options() {
    let config = MigrateConfig::default().with_messages(MessageOptions {
        tag: "probe".to_string(),
        namespace: "lo".to_string(),
    });
    let h = Harness::with_config(config);
    h.call("foo", &nums(&[5, 10])).unwrap();

    assert!(h.messages()[0].starts_with("probe: lo.foo(5, 10)\n"));
}

#[test]
fn test_long_arguments_are_truncated() {
    let h = Harness::new();
    let args: Vec<Value> = (0..60).map(Value::from).collect();
    h.call("foo", &args).unwrap();

    let message = &h.messages()[0];
    let first_line = message.lines().next().unwrap();
    assert!(first_line.contains("...)"));
    assert!(first_line.len() < 120);
}
