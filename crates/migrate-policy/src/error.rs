//! Error types for configuration loading

use crate::lint::PolicyIssue;
use std::path::{Path, PathBuf};

/// Errors while loading or saving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a configuration file
    #[error("io error reading {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Policy tables contradict themselves
    #[error("invalid policy: {} error(s)", .0.len())]
    Invalid(Vec<PolicyIssue>),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
