//! Migration configuration
//!
//! [`MigrateConfig`] bundles the policy tables with rendering bounds and
//! message formatting. Every section is optional in TOML; missing sections
//! and fields fall back to their defaults.
//!
//! ```toml
//! [policy]
//! ignore_result = ["random", "sample"]
//!
//! [policy.rename]
//! contains = "includes"
//!
//! [render]
//! max_length = 120
//!
//! [messages]
//! tag = "my-migrate"
//! ```

use crate::error::ConfigError;
use crate::lint::PolicyIssue;
use crate::tables::PolicyTables;
use migrate_value::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Message formatting options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageOptions {
    /// Prefix on the first line of every message
    pub tag: String,

    /// Namespace shown before method names
    pub namespace: String,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            tag: "lodash-migrate".to_string(),
            namespace: "_".to_string(),
        }
    }
}

/// Complete configuration for instrumenting a library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    /// Method policy tables
    pub policy: PolicyTables,

    /// Rendering bounds for arguments and results
    pub render: RenderOptions,

    /// Message formatting
    pub messages: MessageOptions,
}

impl MigrateConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With policy tables
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: PolicyTables) -> Self {
        self.policy = policy;
        self
    }

    /// With rendering bounds
    #[inline]
    #[must_use]
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// With message formatting
    #[inline]
    #[must_use]
    pub fn with_messages(mut self, messages: MessageOptions) -> Self {
        self.messages = messages;
        self
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML for this schema
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|source| ConfigError::io_error(path, source))?;
        Self::from_toml_str(&text)
    }

    /// Reject configuration whose policy has error-level issues
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] carrying every error-level issue
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors: Vec<_> = self
            .policy
            .validate()
            .into_iter()
            .filter(PolicyIssue::is_error)
            .collect();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Serialize configuration as TOML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
