//! Probe-safe argument copies
//!
//! The probe must never observe or mutate the caller's values, and must not
//! repeat a callback's side effects.

use crate::library::Receiver;
use migrate_policy::MethodDescriptor;
use migrate_value::{deep_clone_all, ChainWrapper, Function, Value};

/// Deep-copy `args` for the probe call, neutralizing iteration callbacks
///
/// For iteration methods the callback slot is replaced with an identity
/// function, unless the method collects callback results and the caller
/// declared the callback as returning a value.
#[must_use]
pub fn sanitize_args(args: &[Value], descriptor: &MethodDescriptor) -> Vec<Value> {
    let mut cloned = deep_clone_all(args);
    neutralize(&mut cloned, args, descriptor);
    cloned
}

/// Deep-copy receiver and arguments together for the probe call
///
/// The wrapped value and the arguments are cloned as one unit, so a
/// container the caller passes both as receiver and as argument stays a
/// single container in the copy. Arguments are sanitized as in
/// [`sanitize_args`].
#[must_use]
pub fn sanitize_call(
    receiver: &Receiver,
    args: &[Value],
    descriptor: &MethodDescriptor,
) -> (Receiver, Vec<Value>) {
    let Receiver::Chain(wrapper) = receiver else {
        return (Receiver::Static, sanitize_args(args, descriptor));
    };

    let mut values = Vec::with_capacity(args.len() + 1);
    values.push(wrapper.wrapped.clone());
    values.extend_from_slice(args);

    let mut cloned = deep_clone_all(&values);
    let wrapped = cloned.remove(0);
    neutralize(&mut cloned, args, descriptor);
    (
        Receiver::Chain(ChainWrapper::new(wrapped, wrapper.chain_all)),
        cloned,
    )
}

fn neutralize(cloned: &mut [Value], args: &[Value], descriptor: &MethodDescriptor) {
    if let Some(index) = descriptor.iteration {
        if should_neutralize(args.get(index), descriptor) {
            if let Some(slot) = cloned.get_mut(index) {
                *slot = Value::Function(Function::identity());
            }
        }
    }
}

fn should_neutralize(callback: Option<&Value>, descriptor: &MethodDescriptor) -> bool {
    if !descriptor.return_sensitive {
        return true;
    }
    !matches!(callback, Some(Value::Function(f)) if f.has_explicit_return())
}
