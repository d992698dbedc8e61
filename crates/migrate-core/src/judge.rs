//! Result comparison
//!
//! Two results diverge only if at least one of them can be inspected and the
//! two are not structurally equal.

use migrate_value::{deep_equal, is_comparable, Value};

/// Whether `old` and `new` differ in a reportable way
#[inline]
#[must_use]
pub fn diverges(old: &Value, new: &Value) -> bool {
    if is_comparable(old) {
        !deep_equal(old, new)
    } else {
        is_comparable(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrate_value::{Function, Symbol};

    #[test]
    fn equal_comparables_agree() {
        assert!(!diverges(&Value::array([1, 2]), &Value::array([1, 2])));
    }

    #[test]
    fn different_comparables_diverge() {
        assert!(diverges(&Value::array([1, 2]), &Value::array([1, 2, 3])));
        assert!(diverges(&Value::from(15), &Value::from(16)));
    }

    #[test]
    fn two_opaque_results_are_skipped() {
        let a: Value = Function::new(|_| Ok(Value::Null)).into();
        let b: Value = Function::new(|_| Ok(Value::Null)).into();
        assert!(!diverges(&a, &b));
        assert!(!diverges(&Symbol::new("a").into(), &Function::identity().into()));
    }

    #[test]
    fn one_comparable_side_diverges() {
        let f: Value = Function::identity().into();
        assert!(diverges(&f, &Value::from(1)));
        assert!(diverges(&Value::from(1), &f));
        assert!(diverges(&Value::Undefined, &f));
    }

    #[test]
    fn absent_probe_result_against_undefined_agrees() {
        assert!(!diverges(&Value::Undefined, &Value::Undefined));
    }
}
