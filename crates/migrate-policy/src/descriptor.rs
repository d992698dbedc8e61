//! Per-method policy view
//!
//! Provides [`MethodDescriptor`], the resolved answer to "how should calls to
//! this method be probed".

use serde::{Deserialize, Serialize};

/// Resolved policy for one method name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name on the old implementation
    pub name: String,

    /// Method name on the new implementation
    pub new_name: String,

    /// Rename is known but not worth announcing
    pub ignore_rename: bool,

    /// Result is non-deterministic; never probe
    pub ignore_result: bool,

    /// Lives on the wrapper prototype rather than the static table
    pub is_sequence: bool,

    /// Argument position of the iteration callback
    pub iteration: Option<usize>,

    /// Callback results feed the method's output
    pub return_sensitive: bool,
}

impl MethodDescriptor {
    /// Descriptor with no policy applied
    #[inline]
    #[must_use]
    pub fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            new_name: name.to_string(),
            ignore_rename: false,
            ignore_result: false,
            is_sequence: false,
            iteration: None,
            return_sensitive: false,
        }
    }

    /// Whether the new implementation uses a different name
    #[inline]
    #[must_use]
    pub fn is_renamed(&self) -> bool {
        self.name != self.new_name
    }

    /// Whether calls should surface a rename notice
    #[inline]
    #[must_use]
    pub fn announces_rename(&self) -> bool {
        self.is_renamed() && !self.ignore_rename
    }

    /// Whether the method takes an iteration callback
    #[inline]
    #[must_use]
    pub fn is_iteration(&self) -> bool {
        self.iteration.is_some()
    }
}
