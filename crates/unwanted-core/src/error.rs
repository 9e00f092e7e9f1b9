//! Error types for unwanted-core

use thiserror::Error;

/// Result type alias using unwanted-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for unwanted
#[derive(Error, Debug)]
pub enum Error {
    /// No policy fragment was discovered anywhere
    #[error("No extension configuration found (searched {searched})")]
    ConfigNotFound { searched: String },

    /// A policy fragment could not be parsed as structured data
    #[error("Malformed configuration in {source_name}: {message}")]
    MalformedFragment {
        source_name: String,
        message: String,
    },

    /// A policy entry carries a range that is not valid semver range syntax
    #[error("Malformed version range \"{range}\": {reason}")]
    MalformedVersionRange { range: String, reason: String },

    /// Invalid semver version
    #[error("Invalid version format: {version}")]
    InvalidVersion { version: String },

    /// A concurrent evaluation task failed to join
    #[error("Evaluation task failed: {message}")]
    EvaluationTask { message: String },

    /// Invalid tool settings
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(searched: impl Into<String>) -> Self {
        Self::ConfigNotFound {
            searched: searched.into(),
        }
    }

    /// Create a malformed fragment error
    pub fn malformed_fragment(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedFragment {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a malformed version range error
    pub fn malformed_version_range(range: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedVersionRange {
            range: range.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this is the "no configuration found" condition
    pub fn is_config_not_found(&self) -> bool {
        matches!(self, Self::ConfigNotFound { .. })
    }
}
