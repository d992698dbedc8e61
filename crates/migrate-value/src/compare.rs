//! Comparability and structural equality
//!
//! A value is *comparable* when its contents can be inspected
//! deterministically. Functions, symbols and opaque host handles are not.

use crate::value::Value;

/// Whether `value` can be meaningfully compared with another result
#[inline]
#[must_use]
pub fn is_comparable(value: &Value) -> bool {
    !matches!(
        value,
        Value::Function(_) | Value::Symbol(_) | Value::Opaque(_)
    )
}

/// Structural deep equality
///
/// - `NaN` equals `NaN`, and `0` equals `-0`
/// - arrays compare element-wise, objects key-wise regardless of order
/// - wrappers compare their chain flag and wrapped value
/// - non-comparable leaves match when they are of the same kind (opaque
///   handles must also share a type label), since their contents cannot be
///   inspected
/// - cycles are handled by assuming equality for a pair already under
///   comparison
#[must_use]
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    Comparer::default().eq(a, b)
}

#[derive(Default)]
struct Comparer {
    stack: Vec<(usize, usize)>,
}

impl Comparer {
    fn eq(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            #[allow(clippy::float_cmp)]
            (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
            (Value::String(x), Value::String(y)) => x == y,
            (Value::Array(x), Value::Array(y)) => {
                if x.ptr_eq(y) {
                    return true;
                }
                let pair = (x.id(), y.id());
                if self.stack.contains(&pair) {
                    return true;
                }
                let (xs, ys) = (x.items(), y.items());
                if xs.len() != ys.len() {
                    return false;
                }
                self.stack.push(pair);
                let equal = xs.iter().zip(ys.iter()).all(|(l, r)| self.eq(l, r));
                self.stack.pop();
                equal
            }
            (Value::Object(x), Value::Object(y)) => {
                if x.ptr_eq(y) {
                    return true;
                }
                let pair = (x.id(), y.id());
                if self.stack.contains(&pair) {
                    return true;
                }
                let xs = x.entries();
                if xs.len() != y.len() {
                    return false;
                }
                self.stack.push(pair);
                let equal = xs.iter().all(|(key, l)| match y.get(key) {
                    Some(r) => self.eq(l, &r),
                    None => false,
                });
                self.stack.pop();
                equal
            }
            (Value::Wrapper(x), Value::Wrapper(y)) => {
                x.chain_all == y.chain_all && self.eq(&x.wrapped, &y.wrapped)
            }
            (Value::Function(_), Value::Function(_)) | (Value::Symbol(_), Value::Symbol(_)) => {
                true
            }
            (Value::Opaque(x), Value::Opaque(y)) => x.type_name() == y.type_name(),
            _ => false,
        }
    }
}
