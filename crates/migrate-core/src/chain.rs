//! Raw-or-wrapped results of prototype methods

use migrate_value::{ChainWrapper, Value};

/// Result of a prototype method that may or may not re-wrap its output
#[derive(Debug, Clone)]
pub enum ChainOutput {
    /// Returned as-is
    Raw(Value),

    /// Re-wrapped with the caller's chain flag
    Wrapped(ChainWrapper),
}

impl ChainOutput {
    /// Wrap `result` if the receiver is chaining or the call asked for it
    #[inline]
    #[must_use]
    pub fn select(result: Value, chain_all: bool, force_wrap: bool) -> Self {
        if chain_all || force_wrap {
            Self::Wrapped(ChainWrapper::new(result, chain_all))
        } else {
            Self::Raw(result)
        }
    }

    /// Whether the output is wrapped
    #[inline]
    #[must_use]
    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::Wrapped(_))
    }
}

impl From<ChainOutput> for Value {
    fn from(output: ChainOutput) -> Self {
        match output {
            ChainOutput::Raw(value) => value,
            ChainOutput::Wrapped(wrapper) => Value::from(wrapper),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_when_neither_flag() {
        let out = ChainOutput::select(Value::from(1), false, false);
        assert!(!out.is_wrapped());
        assert_eq!(Value::from(out).as_f64(), Some(1.0));
    }

    #[test]
    fn wrapped_keeps_chain_flag() {
        let forced = ChainOutput::select(Value::from(1), false, true);
        let ChainOutput::Wrapped(w) = forced else {
            panic!("expected wrapper");
        };
        assert!(!w.chain_all);

        let chaining = ChainOutput::select(Value::from(1), true, false);
        let ChainOutput::Wrapped(w) = chaining else {
            panic!("expected wrapper");
        };
        assert!(w.chain_all);
    }
}
