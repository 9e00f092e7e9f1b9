//! Merging of policy fragments
//!
//! Every discovered `extensions.json` (or workspace file) contributes one
//! fragment. Fragments are concatenated in discovery order; nothing is
//! deduplicated.

use crate::error::{Error, Result};
use crate::types::Policy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// The two policy lists a fragment may define
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unwanted_recommendations: Option<Vec<String>>,
}

impl FragmentConfig {
    /// Whether the fragment defines either list
    pub fn has_config(&self) -> bool {
        self.recommendations.is_some() || self.unwanted_recommendations.is_some()
    }
}

/// Parsed content of one fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentContent {
    /// The document parsed
    Config(FragmentConfig),
    /// The document could not be parsed; skipped during aggregation
    Malformed(String),
}

/// One discovered configuration source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment {
    /// Where the fragment came from (usually a file path)
    pub source: String,

    pub content: FragmentContent,
}

impl RawFragment {
    /// Build a fragment from an already parsed config
    pub fn new(source: impl Into<String>, config: FragmentConfig) -> Self {
        Self {
            source: source.into(),
            content: FragmentContent::Config(config),
        }
    }

    /// Parse fragment text. Comments and trailing commas are accepted.
    ///
    /// A parse failure does not fail the call: the fragment is kept as
    /// [`FragmentContent::Malformed`] so aggregation can skip it.
    pub fn parse(source: impl Into<String>, text: &str) -> Self {
        let source = source.into();
        let content = match parse_config(&source, text) {
            Ok(config) => FragmentContent::Config(config),
            Err(e) => FragmentContent::Malformed(e.to_string()),
        };
        Self { source, content }
    }

    /// The parsed config, if the document was well formed
    pub fn config(&self) -> Option<&FragmentConfig> {
        match &self.content {
            FragmentContent::Config(config) => Some(config),
            FragmentContent::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.content, FragmentContent::Malformed(_))
    }
}

/// Parse a fragment document into its policy lists.
///
/// Workspace documents nest the lists under `extensions`; when that object is
/// present the rest of the document is ignored.
pub fn parse_config(source: &str, text: &str) -> Result<FragmentConfig> {
    let document: Value =
        json5::from_str(text).map_err(|e| Error::malformed_fragment(source, e.to_string()))?;

    let section = match document {
        Value::Object(mut map) => match map.remove("extensions") {
            Some(nested @ Value::Object(_)) => nested,
            Some(_) => {
                return Err(Error::malformed_fragment(
                    source,
                    "`extensions` must be an object",
                ))
            }
            None => Value::Object(map),
        },
        _ => {
            return Err(Error::malformed_fragment(
                source,
                "document root must be an object",
            ))
        }
    };

    serde_json::from_value(section).map_err(|e| Error::malformed_fragment(source, e.to_string()))
}

/// Merge fragments into one policy.
///
/// Returns [`Error::ConfigNotFound`] when `fragments` is empty. Fragments that
/// are present but define nothing (or failed to parse) still count as found.
pub fn aggregate(fragments: &[RawFragment]) -> Result<Policy> {
    if fragments.is_empty() {
        return Err(Error::config_not_found("no configuration sources"));
    }

    let mut policy = Policy::default();

    for fragment in fragments {
        let config = match &fragment.content {
            FragmentContent::Config(config) => config,
            FragmentContent::Malformed(message) => {
                warn!(
                    "Skipping malformed configuration {}: {}",
                    fragment.source, message
                );
                continue;
            }
        };

        if config.has_config() {
            debug!("Found configuration in file: {}", fragment.source);
        } else {
            debug!("No configuration found in file: {}", fragment.source);
        }

        if let Some(recommendations) = &config.recommendations {
            policy.recommendations.extend(recommendations.iter().cloned());
        }
        if let Some(unwanted) = &config.unwanted_recommendations {
            policy
                .unwanted_recommendations
                .extend(unwanted.iter().cloned());
        }
    }

    if policy.recommendations.is_empty() {
        info!("No recommendation definitions found in the configs");
    } else {
        info!(
            "Found {} recommended extensions defined in the configuration",
            policy.recommendations.len()
        );
    }
    if policy.unwanted_recommendations.is_empty() {
        info!("No unwanted extensions defined in the configs");
    } else {
        info!(
            "Found {} unwanted extensions defined in the configuration",
            policy.unwanted_recommendations.len()
        );
    }

    Ok(policy)
}
