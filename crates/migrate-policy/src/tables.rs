//! Policy tables
//!
//! Provides [`PolicyTables`], the read-only lookup data consulted when a
//! library is instrumented: renames, ignore lists, iteration callbacks and the
//! wrapper-prototype surface.

use crate::defaults;
use crate::descriptor::MethodDescriptor;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Method policy tables
///
/// `Default` yields the lodash 3 to 4 tables; [`PolicyTables::empty`] yields
/// tables with no entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyTables {
    /// Method whose wrapper form may return raw or wrapped results
    pub conditional_wrap: Option<String>,

    /// Renames that should not be announced
    pub ignore_rename: BTreeSet<String>,

    /// Methods whose results are never compared
    pub ignore_result: BTreeSet<String>,

    /// Iteration methods whose output collects callback results
    pub return_sensitive: BTreeSet<String>,

    /// Methods living on the wrapper prototype
    pub sequence: BTreeSet<String>,

    /// Static methods exposed on the wrapper prototype with raw results
    pub unwrapped: BTreeSet<String>,

    /// Aliases of the value-extraction method
    pub value_aliases: Vec<String>,

    /// Old name to new name
    pub rename: IndexMap<String, String>,

    /// Iteration method to callback argument position
    pub iteration: IndexMap<String, usize>,
}

impl PolicyTables {
    /// Tables with no entries
    #[must_use]
    pub fn empty() -> Self {
        Self {
            conditional_wrap: None,
            ignore_rename: BTreeSet::new(),
            ignore_result: BTreeSet::new(),
            return_sensitive: BTreeSet::new(),
            sequence: BTreeSet::new(),
            unwrapped: BTreeSet::new(),
            value_aliases: Vec::new(),
            rename: IndexMap::new(),
            iteration: IndexMap::new(),
        }
    }

    /// Built-in lodash 3 to 4 tables
    #[must_use]
    pub fn lodash_v3_to_v4() -> Self {
        fn set(names: &[&str]) -> BTreeSet<String> {
            names.iter().map(|s| (*s).to_string()).collect()
        }

        Self {
            conditional_wrap: Some(defaults::CONDITIONAL_WRAP.to_string()),
            ignore_rename: set(defaults::IGNORE_RENAME),
            ignore_result: set(defaults::IGNORE_RESULT),
            return_sensitive: set(defaults::RETURN_SENSITIVE),
            sequence: set(defaults::SEQUENCE),
            unwrapped: set(defaults::UNWRAPPED),
            value_aliases: defaults::VALUE_ALIASES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            rename: defaults::RENAME
                .iter()
                .map(|(old, new)| ((*old).to_string(), (*new).to_string()))
                .collect(),
            iteration: defaults::ITERATION
                .iter()
                .map(|(name, index)| ((*name).to_string(), *index))
                .collect(),
        }
    }

    /// Resolve the policy for `name`
    #[must_use]
    pub fn describe(&self, name: &str) -> MethodDescriptor {
        MethodDescriptor {
            name: name.to_string(),
            new_name: self.new_name(name).to_string(),
            ignore_rename: self.ignore_rename.contains(name),
            ignore_result: self.ignore_result.contains(name),
            is_sequence: self.sequence.contains(name),
            iteration: self.iteration.get(name).copied(),
            return_sensitive: self.return_sensitive.contains(name),
        }
    }

    /// Name of `name` on the new implementation
    #[inline]
    #[must_use]
    pub fn new_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.rename.get(name).map_or(name, String::as_str)
    }

    /// Whether `name` is a value-extraction alias
    #[inline]
    #[must_use]
    pub fn is_value_alias(&self, name: &str) -> bool {
        self.value_aliases.iter().any(|alias| alias == name)
    }

    /// Every method name mentioned by any table, sorted
    #[must_use]
    pub fn known_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        names.extend(self.rename.keys().cloned());
        names.extend(self.iteration.keys().cloned());
        names.extend(self.ignore_rename.iter().cloned());
        names.extend(self.ignore_result.iter().cloned());
        names.extend(self.return_sensitive.iter().cloned());
        names.extend(self.sequence.iter().cloned());
        names.extend(self.unwrapped.iter().cloned());
        names.extend(self.value_aliases.iter().cloned());
        names.extend(self.conditional_wrap.iter().cloned());
        names
    }

    /// With rename mapping
    #[must_use]
    pub fn with_rename(mut self, old: &str, new: &str) -> Self {
        self.rename.insert(old.to_string(), new.to_string());
        self
    }

    /// With silenced rename
    #[must_use]
    pub fn with_ignore_rename(mut self, name: &str) -> Self {
        self.ignore_rename.insert(name.to_string());
        self
    }

    /// With uncompared result
    #[must_use]
    pub fn with_ignore_result(mut self, name: &str) -> Self {
        self.ignore_result.insert(name.to_string());
        self
    }

    /// With iteration callback position
    #[must_use]
    pub fn with_iteration(mut self, name: &str, callback_index: usize) -> Self {
        self.iteration.insert(name.to_string(), callback_index);
        self
    }

    /// With return-sensitive iteration method
    #[must_use]
    pub fn with_return_sensitive(mut self, name: &str) -> Self {
        self.return_sensitive.insert(name.to_string());
        self
    }

    /// With prototype method
    #[must_use]
    pub fn with_sequence(mut self, name: &str) -> Self {
        self.sequence.insert(name.to_string());
        self
    }

    /// With unwrapped prototype exposure
    #[must_use]
    pub fn with_unwrapped(mut self, name: &str) -> Self {
        self.unwrapped.insert(name.to_string());
        self
    }

    /// With value-extraction alias
    #[must_use]
    pub fn with_value_alias(mut self, name: &str) -> Self {
        if !self.is_value_alias(name) {
            self.value_aliases.push(name.to_string());
        }
        self
    }

    /// With conditional-wrap method
    #[must_use]
    pub fn with_conditional_wrap(mut self, name: &str) -> Self {
        self.conditional_wrap = Some(name.to_string());
        self
    }
}

impl Default for PolicyTables {
    fn default() -> Self {
        Self::lodash_v3_to_v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tables_describe_plain_methods() {
        let tables = PolicyTables::empty();
        assert_eq!(tables.describe("foo"), MethodDescriptor::plain("foo"));
        assert!(tables.known_names().is_empty());
    }

    #[test]
    fn lodash_rename_resolves() {
        let tables = PolicyTables::default();
        let d = tables.describe("contains");
        assert_eq!(d.new_name, "includes");
        assert!(d.announces_rename());
        assert_eq!(tables.new_name("map"), "map");
    }

    #[test]
    fn lodash_callback_rename_is_silenced() {
        let d = PolicyTables::default().describe("callback");
        assert!(d.is_renamed());
        assert!(!d.announces_rename());
    }

    #[test]
    fn lodash_iteration_and_sensitivity() {
        let tables = PolicyTables::default();
        let each = tables.describe("forEach");
        assert_eq!(each.iteration, Some(1));
        assert!(!each.return_sensitive);

        let times = tables.describe("times");
        assert_eq!(times.iteration, Some(1));
        assert!(times.return_sensitive);
    }

    #[test]
    fn lodash_sample_is_conditional_and_ignored() {
        let tables = PolicyTables::default();
        assert_eq!(tables.conditional_wrap.as_deref(), Some("sample"));
        assert!(tables.describe("sample").ignore_result);
    }

    #[test]
    fn lodash_value_aliases_are_sequence_methods() {
        let tables = PolicyTables::default();
        for alias in &tables.value_aliases {
            assert!(tables.describe(alias).is_sequence, "{alias}");
        }
    }

    #[test]
    fn builders_compose() {
        let tables = PolicyTables::empty()
            .with_rename("first", "head")
            .with_iteration("each", 1)
            .with_return_sensitive("each")
            .with_value_alias("valueOf")
            .with_value_alias("valueOf");

        let d = tables.describe("each");
        assert_eq!(d.iteration, Some(1));
        assert!(d.return_sensitive);
        assert_eq!(tables.value_aliases.len(), 1);
        assert_eq!(
            tables.known_names().into_iter().collect::<Vec<_>>(),
            vec!["each", "first", "valueOf"]
        );
    }
}
