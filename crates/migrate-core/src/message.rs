//! Diagnostic records and message templates

use migrate_policy::{MessageOptions, MethodDescriptor};

/// One side of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideRecord {
    /// Method name on this side
    pub name: String,

    /// Library version label
    pub version: String,

    /// Rendered result, set once known
    pub result: Option<String>,
}

/// Per-call data used to compose messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Method name as called
    pub name: String,

    /// Rendered, truncated arguments
    pub args: String,

    /// Old implementation side
    pub old: SideRecord,

    /// New implementation side
    pub new: SideRecord,
}

impl Diagnostic {
    /// Start a record for a call
    #[must_use]
    pub fn new(
        descriptor: &MethodDescriptor,
        args: String,
        old_version: &str,
        new_version: &str,
    ) -> Self {
        Self {
            name: descriptor.name.clone(),
            args,
            old: SideRecord {
                name: descriptor.name.clone(),
                version: old_version.to_string(),
                result: None,
            },
            new: SideRecord {
                name: descriptor.new_name.clone(),
                version: new_version.to_string(),
                result: None,
            },
        }
    }

    /// Attach rendered results
    #[must_use]
    pub fn with_results(mut self, old: String, new: String) -> Self {
        self.old.result = Some(old);
        self.new.result = Some(new);
        self
    }
}

/// Renders [`Diagnostic`]s into message text
#[derive(Debug, Clone, Default)]
pub struct MessageTemplates {
    options: MessageOptions,
}

impl MessageTemplates {
    /// Create templates
    #[inline]
    #[must_use]
    pub fn new(options: MessageOptions) -> Self {
        Self { options }
    }

    /// Rename notice; depends only on names and versions
    #[must_use]
    pub fn rename(&self, record: &Diagnostic) -> String {
        let MessageOptions { tag, namespace } = &self.options;
        format!(
            "{tag}: Method renamed\n  v{} => {namespace}.{}\n  v{} => {namespace}.{}\n",
            record.old.version, record.old.name, record.new.version, record.new.name,
        )
    }

    /// Result divergence notice
    #[must_use]
    pub fn migrate(&self, record: &Diagnostic) -> String {
        let MessageOptions { tag, namespace } = &self.options;
        format!(
            "{tag}: {namespace}.{}({})\n  v{} => {}\n  v{} => {}\n",
            record.name,
            record.args,
            record.old.version,
            record.old.result.as_deref().unwrap_or("undefined"),
            record.new.version,
            record.new.result.as_deref().unwrap_or("undefined"),
        )
    }
}
