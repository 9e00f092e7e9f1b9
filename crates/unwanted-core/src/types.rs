//! Type definitions for policies, installed extensions, and evaluation hits

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unwanted-extension line, optionally scoped to a version range
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyEntry {
    /// Extension identifier as written in the policy (compared case-insensitively)
    pub extension_id: String,

    /// Version range expression, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_range: Option<String>,
}

impl PolicyEntry {
    /// Whether this entry targets the given extension id
    pub fn targets(&self, id: &str) -> bool {
        extension_key(&self.extension_id) == extension_key(id)
    }
}

/// Case-folded form of an extension id, used wherever ids are compared
pub fn extension_key(id: &str) -> String {
    id.to_lowercase()
}

impl fmt::Display for PolicyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version_range {
            Some(range) => write!(f, "{}@{}", self.extension_id, range),
            None => write!(f, "{}", self.extension_id),
        }
    }
}

/// Merged policy built from every discovered fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Recommended extension ids, in discovery order
    #[serde(default)]
    pub recommendations: Vec<String>,

    /// Raw unwanted entries (`id` or `id@range`), in discovery order
    #[serde(default)]
    pub unwanted_recommendations: Vec<String>,
}

impl Policy {
    /// Append another policy after this one
    pub fn merge(mut self, other: Policy) -> Self {
        self.recommendations.extend(other.recommendations);
        self.unwanted_recommendations
            .extend(other.unwanted_recommendations);
        self
    }

    /// Whether the policy declares no unwanted entries
    pub fn has_unwanted(&self) -> bool {
        !self.unwanted_recommendations.is_empty()
    }
}

/// An extension reported as installed and enabled by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledExtension {
    /// Identifier, usually `publisher.name`
    pub id: String,

    /// Installed semantic version
    pub version: String,

    /// Human readable name
    #[serde(default)]
    pub display_name: String,
}

impl InstalledExtension {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            version: version.into(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Display name, falling back to the id when the host left it empty
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}

/// How a policy entry's version range related to the installed version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionMatchKind {
    /// The entry carries no range; any installed version is unwanted
    NoRangeSpecified,
    /// The installed version falls inside the flagged range
    RangeMatched,
    /// The installed version falls outside the flagged range
    RangeNotMatched,
}

impl fmt::Display for VersionMatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoRangeSpecified => "any version",
            Self::RangeMatched => "range matched",
            Self::RangeNotMatched => "range not matched",
        };
        write!(f, "{}", s)
    }
}

/// An installed extension that violates the unwanted-extensions policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationHit {
    /// Identifier as written in the matching policy entry
    pub extension_id: String,

    /// The installed extension that matched
    pub installed: InstalledExtension,

    /// The policy entry that produced this hit
    pub entry: PolicyEntry,

    /// How the version range matched
    pub match_kind: VersionMatchKind,
}

impl EvaluationHit {
    /// Human readable reason for this hit
    pub fn reason(&self) -> String {
        let base = format!(
            "It's recommended to disable \"{}\" ({}) for this workspace",
            self.installed.label(),
            self.installed.id
        );
        match (&self.match_kind, &self.entry.version_range) {
            (VersionMatchKind::RangeMatched, Some(range)) => format!(
                "{}. Installed version {} is within the unwanted range {}",
                base, self.installed.version, range
            ),
            _ => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_folds_non_ascii_case() {
        let entry = PolicyEntry {
            extension_id: "Ünicode.Ext".to_string(),
            version_range: None,
        };
        assert!(entry.targets("ünicode.ext"));
        assert_eq!(extension_key("Ünicode.Ext"), extension_key("üNICODE.EXT"));
    }

    #[test]
    fn test_policy_entry_display() {
        let entry = PolicyEntry {
            extension_id: "ms-python.python".to_string(),
            version_range: Some("^1.2.0".to_string()),
        };
        assert_eq!(entry.to_string(), "ms-python.python@^1.2.0");

        let bare = PolicyEntry {
            extension_id: "ms-python.python".to_string(),
            version_range: None,
        };
        assert_eq!(bare.to_string(), "ms-python.python");
    }

    #[test]
    fn test_policy_entry_targets_case_insensitive() {
        let entry = PolicyEntry {
            extension_id: "Foo.Bar".to_string(),
            version_range: None,
        };
        assert!(entry.targets("foo.bar"));
        assert!(entry.targets("FOO.BAR"));
        assert!(!entry.targets("foo.baz"));
    }

    #[test]
    fn test_policy_merge_appends_in_order() {
        let a = Policy {
            recommendations: vec!["a.one".to_string()],
            unwanted_recommendations: vec!["x.one".to_string()],
        };
        let b = Policy {
            recommendations: vec!["a.one".to_string(), "a.two".to_string()],
            unwanted_recommendations: vec!["x.two@^1.0.0".to_string()],
        };

        let merged = a.merge(b);
        assert_eq!(merged.recommendations, vec!["a.one", "a.one", "a.two"]);
        assert_eq!(
            merged.unwanted_recommendations,
            vec!["x.one", "x.two@^1.0.0"]
        );
    }

    #[test]
    fn test_installed_extension_label_falls_back_to_id() {
        let ext = InstalledExtension::new("pub.ext", "1.0.0").with_display_name("");
        assert_eq!(ext.label(), "pub.ext");

        let named = InstalledExtension::new("pub.ext", "1.0.0").with_display_name("Ext");
        assert_eq!(named.label(), "Ext");
    }

    #[test]
    fn test_hit_reason_mentions_range_when_matched() {
        let hit = EvaluationHit {
            extension_id: "pub.ext".to_string(),
            installed: InstalledExtension::new("pub.ext", "1.5.0").with_display_name("Ext"),
            entry: PolicyEntry {
                extension_id: "pub.ext".to_string(),
                version_range: Some("^1.0.0".to_string()),
            },
            match_kind: VersionMatchKind::RangeMatched,
        };
        let reason = hit.reason();
        assert!(reason.starts_with("It's recommended to disable \"Ext\" (pub.ext)"));
        assert!(reason.contains("^1.0.0"));
        assert!(reason.contains("1.5.0"));
    }
}
