//! Hierarchical settings loader with precedence
//!
//! Loads settings from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.unwanted/config.yaml)
//! 3. Environment variables (UNWANTED_* prefix)
//! 4. CLI flags (handled by caller)

use super::settings::Settings;
use crate::error::{Error, Result};
use crate::utils::get_home_dir;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "defaults.yaml";
const USER_CONFIG_FILE: &str = "config.yaml";

/// Settings hierarchy loader
pub struct SettingsLoader {
    /// Base directory for the user config file
    config_dir: Utf8PathBuf,
}

impl SettingsLoader {
    /// Create a loader rooted at `~/.unwanted`
    pub fn new() -> Result<Self> {
        let home = get_home_dir()?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|_| Error::invalid_config("Home directory path is not valid UTF-8"))?;
        Ok(Self {
            config_dir: home.join(".unwanted"),
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Load settings with hierarchical precedence
    pub fn load(&self) -> Result<Settings> {
        let mut merged = Self::load_embedded_value(DEFAULTS_FILE)?;

        let user_path = self.config_dir.join(USER_CONFIG_FILE);
        if user_path.exists() {
            debug!("Loading user settings from {}", user_path);
            let overlay = Self::load_yaml_value(&user_path)?;
            merge_values(&mut merged, overlay);
        }

        let settings: Settings = serde_yaml_ng::from_value(merged)
            .map_err(|e| Error::invalid_config(format!("Failed to parse settings: {}", e)))?;

        self.apply_env_overrides(settings)
    }

    fn load_embedded_value(filename: &str) -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::invalid_config(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    fn load_yaml_value(path: &Utf8Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;
        // An empty file parses as null
        Ok(if value.is_null() {
            Value::Mapping(Default::default())
        } else {
            value
        })
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, mut settings: Settings) -> Result<Settings> {
        if let Ok(val) = env::var("UNWANTED_INCLUDE") {
            settings.discovery.include = split_list(&val);
        }

        if let Ok(val) = env::var("UNWANTED_EXCLUDE") {
            settings.discovery.exclude = split_list(&val);
        }

        if let Ok(val) = env::var("UNWANTED_MAX_DEPTH") {
            settings.discovery.max_depth = val
                .parse()
                .map_err(|_| Error::invalid_config("UNWANTED_MAX_DEPTH must be a valid number"))?;
        }

        if let Ok(val) = env::var("UNWANTED_EXTENSIONS_DIR") {
            settings.installed.extensions_dir = Some(Utf8PathBuf::from(val));
        }

        if let Ok(val) = env::var("UNWANTED_STATE_FILE") {
            settings.state.file = Some(Utf8PathBuf::from(val));
        }

        if let Ok(val) = env::var("UNWANTED_VERBOSE") {
            settings.display.verbose = val.parse().unwrap_or(false);
        }

        if let Ok(val) = env::var("UNWANTED_NO_COLOR") {
            settings.display.color_enabled = !val.parse().unwrap_or(false);
        }

        Ok(settings)
    }
}

/// Overlay `overlay` onto `base`; mappings merge key by key, anything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
