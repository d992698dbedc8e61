//! Consistency checks for policy tables

use crate::tables::PolicyTables;
use std::fmt::{self, Display, Formatter};

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Suspicious but usable
    Warning,

    /// Tables contradict themselves
    Error,
}

/// A single finding from [`PolicyTables::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyIssue {
    /// How bad it is
    pub severity: Severity,

    /// Method the issue concerns
    pub method: String,

    /// Human-readable description
    pub message: String,
}

impl PolicyIssue {
    fn warning(method: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            method: method.to_string(),
            message: message.into(),
        }
    }

    fn error(method: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            method: method.to_string(),
            message: message.into(),
        }
    }

    /// Whether this issue is an error
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for PolicyIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level}: {}: {}", self.method, self.message)
    }
}

impl PolicyTables {
    /// Check the tables for contradictions
    #[must_use]
    pub fn validate(&self) -> Vec<PolicyIssue> {
        let mut issues = Vec::new();

        if self.known_names().iter().any(String::is_empty)
            || self.rename.values().any(String::is_empty)
        {
            issues.push(PolicyIssue::error("", "empty method name"));
        }

        for (old, new) in &self.rename {
            if old == new {
                issues.push(PolicyIssue::warning(old, "renamed to itself"));
            }
        }

        for name in &self.ignore_rename {
            if !self.rename.contains_key(name) {
                issues.push(PolicyIssue::warning(
                    name,
                    "rename ignored but no rename is mapped",
                ));
            }
        }

        for name in &self.return_sensitive {
            if !self.iteration.contains_key(name) {
                issues.push(PolicyIssue::error(
                    name,
                    "return-sensitive but not an iteration method",
                ));
            }
        }

        if let Some(name) = &self.conditional_wrap {
            if !self.ignore_result.contains(name) {
                issues.push(PolicyIssue::warning(
                    name,
                    "conditional-wrap method results are compared",
                ));
            }
        }

        issues.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.method.cmp(&b.method)));
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_clean() {
        assert!(PolicyTables::default().validate().is_empty());
    }

    #[test]
    fn flags_contradictions() {
        let tables = PolicyTables::empty()
            .with_rename("same", "same")
            .with_ignore_rename("ghost")
            .with_return_sensitive("times")
            .with_conditional_wrap("sample");

        let issues = tables.validate();
        assert_eq!(issues.len(), 4);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].method, "times");

        let methods: Vec<_> = issues[1..].iter().map(|i| i.method.as_str()).collect();
        assert_eq!(methods, vec!["ghost", "same", "sample"]);
    }

    #[test]
    fn empty_names_are_errors() {
        let tables = PolicyTables::empty().with_rename("old", "");
        let issues = tables.validate();
        assert!(issues.iter().any(|i| i.is_error() && i.message == "empty method name"));
    }

    #[test]
    fn display_includes_level_and_method() {
        let issue = PolicyIssue::warning("x", "odd");
        assert_eq!(issue.to_string(), "warning: x: odd");
    }
}
