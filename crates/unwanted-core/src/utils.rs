//! Utility functions shared across crates

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over `dirs::home_dir()` so that
/// containers and test harnesses that override HOME are respected.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| Error::invalid_config("Could not determine home directory"))
}

/// Get the unwanted state directory (~/.unwanted)
pub fn get_unwanted_dir() -> Result<PathBuf> {
    Ok(get_home_dir()?.join(".unwanted"))
}

/// Default location of the editor's extensions directory (~/.vscode/extensions)
pub fn default_extensions_dir() -> Result<PathBuf> {
    Ok(get_home_dir()?.join(".vscode").join("extensions"))
}

/// Default location of the state file (~/.unwanted/state.json)
pub fn default_state_file() -> Result<PathBuf> {
    Ok(get_unwanted_dir()?.join("state.json"))
}
