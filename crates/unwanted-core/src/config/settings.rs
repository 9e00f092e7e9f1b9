//! Tool settings
//!
//! These control where policy files are searched for and where the
//! installed extension set is read from. They are not part of the policy.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Complete tool settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Policy file discovery
    #[serde(default)]
    pub discovery: DiscoverySettings,

    /// Installed extension source
    #[serde(default)]
    pub installed: InstalledSettings,

    /// Persistent state
    #[serde(default)]
    pub state: StateSettings,

    /// Display and output settings
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Which files count as policy fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscoverySettings {
    /// Glob patterns, relative to the workspace root
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Glob patterns to skip
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Maximum directory depth below the workspace root
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Pick up `*.code-workspace` files in the workspace root
    #[serde(default = "default_workspace_files")]
    pub workspace_files: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: default_exclude(),
            max_depth: default_max_depth(),
            workspace_files: default_workspace_files(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstalledSettings {
    /// Editor extensions directory; `~/.vscode/extensions` when unset
    #[serde(default)]
    pub extensions_dir: Option<Utf8PathBuf>,

    /// Extension ids disabled in the editor; the extensions directory does not record them
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StateSettings {
    /// State file; `~/.unwanted/state.json` when unset
    #[serde(default)]
    pub file: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DisplaySettings {
    /// Enable colored output
    #[serde(default = "default_color_enabled")]
    pub color_enabled: bool,

    /// Enable verbose output by default
    #[serde(default)]
    pub verbose: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            color_enabled: default_color_enabled(),
            verbose: false,
        }
    }
}

fn default_include() -> Vec<String> {
    vec![
        "**/.vscode/extensions*.json".to_string(),
        "**/.vscode/extensions*.jsonc".to_string(),
    ]
}
fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}
fn default_max_depth() -> usize {
    12
}
fn default_workspace_files() -> bool {
    true
}
fn default_color_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.discovery.include.len(), 2);
        assert_eq!(settings.discovery.exclude, vec!["**/node_modules/**"]);
        assert_eq!(settings.discovery.max_depth, 12);
        assert!(settings.discovery.workspace_files);
        assert!(settings.installed.extensions_dir.is_none());
        assert!(settings.display.color_enabled);
        assert!(!settings.display.verbose);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings: Settings = serde_yaml_ng::from_str("discovery:\n  max-depth: 3\n").unwrap();
        assert_eq!(settings.discovery.max_depth, 3);
        assert_eq!(settings.discovery.exclude, vec!["**/node_modules/**"]);
        assert!(settings.display.color_enabled);
    }
}
