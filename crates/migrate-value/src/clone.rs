//! Deep cloning with cycle preservation
//!
//! Containers are copied into fresh allocations. A container reached twice
//! (shared or cyclic) maps to a single copy, so the clone has the same shape
//! as the source. Functions, symbols and opaque handles are shared.

use crate::value::{Array, ChainWrapper, Object, Value};
use std::collections::HashMap;

/// Produce a reference-independent copy of `value`
#[must_use]
pub fn deep_clone(value: &Value) -> Value {
    Cloner::default().clone_value(value)
}

/// Deep-clone a list of values as one unit
///
/// Containers shared between arguments stay shared in the copy.
#[must_use]
pub fn deep_clone_all(values: &[Value]) -> Vec<Value> {
    let mut cloner = Cloner::default();
    values.iter().map(|v| cloner.clone_value(v)).collect()
}

#[derive(Default)]
struct Cloner {
    arrays: HashMap<usize, Array>,
    objects: HashMap<usize, Object>,
}

impl Cloner {
    fn clone_value(&mut self, value: &Value) -> Value {
        match value {
            Value::Array(source) => {
                if let Some(copy) = self.arrays.get(&source.id()) {
                    return Value::Array(copy.clone());
                }
                let copy = Array::new();
                self.arrays.insert(source.id(), copy.clone());
                for item in source.items() {
                    let cloned = self.clone_value(&item);
                    copy.push(cloned);
                }
                Value::Array(copy)
            }
            Value::Object(source) => {
                if let Some(copy) = self.objects.get(&source.id()) {
                    return Value::Object(copy.clone());
                }
                let copy = Object::new();
                self.objects.insert(source.id(), copy.clone());
                for (key, item) in source.entries() {
                    let cloned = self.clone_value(&item);
                    copy.insert(key, cloned);
                }
                Value::Object(copy)
            }
            Value::Wrapper(wrapper) => Value::from(ChainWrapper::new(
                self.clone_value(&wrapper.wrapped),
                wrapper.chain_all,
            )),
            other => other.clone(),
        }
    }
}
