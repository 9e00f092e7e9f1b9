//! Release notices shown once after an upgrade
//!
//! The last version the user ran is kept in a [`StateStore`]. When the
//! running version differs and has a notice of its own, the notice is shown
//! once, unless the previous version already carried the same text.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Key under which the last seen version is stored
pub const LAST_SEEN_VERSION_KEY: &str = "version";

const VERSIONED_RANGES_NOTICE: &str =
    "New feature: define versions per unwanted extension, e.g. \"publisher.name@^1.2.0\".";

/// A key-value persistence cell
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Notices keyed by the version that introduced them
#[derive(Debug, Clone, Default)]
pub struct ReleaseNotes {
    notes: BTreeMap<String, String>,
}

impl ReleaseNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices shipped with this build
    pub fn builtin() -> Self {
        Self::new()
            .with_note("1.1.2", format!("(pre-release) {}", VERSIONED_RANGES_NOTICE))
            .with_note("1.2.0", VERSIONED_RANGES_NOTICE)
            .with_note("1.2.1", VERSIONED_RANGES_NOTICE)
    }

    pub fn with_note(mut self, version: impl Into<String>, message: impl Into<String>) -> Self {
        self.notes.insert(version.into(), message.into());
        self
    }

    pub fn get(&self, version: &str) -> Option<&str> {
        self.notes.get(version).map(String::as_str)
    }

    /// Decide which notice, if any, to show when moving from `previous` to `current`
    pub fn notice_for(&self, previous: Option<&str>, current: &str) -> Option<&str> {
        if previous == Some(current) {
            return None;
        }

        let message = self.get(current)?;
        match previous.and_then(|p| self.get(p)) {
            Some(previous_message) if previous_message == message => None,
            _ => Some(message),
        }
    }
}

/// Check for a notice and record `current` as the last seen version.
///
/// Persistence failures are logged and never stop the caller.
pub fn check_release_notice(
    store: &dyn StateStore,
    notes: &ReleaseNotes,
    current: &str,
) -> Option<String> {
    let previous = match store.get(LAST_SEEN_VERSION_KEY) {
        Ok(previous) => previous,
        Err(e) => {
            warn!("Could not read last seen version: {}", e);
            None
        }
    };

    if previous.as_deref() == Some(current) {
        return None;
    }

    let notice = notes
        .notice_for(previous.as_deref(), current)
        .map(|message| format!("Updated to version {}: {}", current, message));

    debug!(
        "Version changed from {} to {}",
        previous.as_deref().unwrap_or("<none>"),
        current
    );
    if let Err(e) = store.set(LAST_SEEN_VERSION_KEY, current) {
        warn!("Could not record last seen version: {}", e);
    }

    notice
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
}

/// State persisted as a small JSON document
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StateFile> {
        if !self.path.exists() {
            return Ok(StateFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl StateStore for JsonStateStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // An unreadable file is overwritten
        let mut state = self.load().unwrap_or_else(|e| {
            warn!("Replacing unreadable state file {}: {}", self.path.display(), e);
            StateFile::default()
        });
        state.values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&state)?;
        fs::write(&self.path, content).map_err(Error::Io)
    }
}

/// In-memory store, used when no state file is configured
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| Error::invalid_config("state store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| Error::invalid_config("state store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn notes() -> ReleaseNotes {
        ReleaseNotes::new()
            .with_note("1.1.0", "ranges")
            .with_note("1.2.0", "ranges")
            .with_note("1.3.0", "workspace files")
    }

    #[test]
    fn test_corrupt_state_file_is_replaced() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, "{ truncated").unwrap();
        let store = JsonStateStore::new(&path);

        let first = check_release_notice(&store, &notes(), "1.2.0");
        let second = check_release_notice(&store, &notes(), "1.2.0");

        assert_eq!(first.as_deref(), Some("Updated to version 1.2.0: ranges"));
        assert_eq!(second, None);
        assert_eq!(store.get(LAST_SEEN_VERSION_KEY).unwrap().as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_first_run_shows_notice() {
        let store = MemoryStateStore::new();
        let notice = check_release_notice(&store, &notes(), "1.2.0");
        assert_eq!(notice.as_deref(), Some("Updated to version 1.2.0: ranges"));
        assert_eq!(
            store.get(LAST_SEEN_VERSION_KEY).unwrap().as_deref(),
            Some("1.2.0")
        );
    }

    #[test]
    fn test_same_version_shows_nothing() {
        let store = MemoryStateStore::new();
        store.set(LAST_SEEN_VERSION_KEY, "1.2.0").unwrap();
        assert_eq!(check_release_notice(&store, &notes(), "1.2.0"), None);
    }

    #[test]
    fn test_repeated_message_is_suppressed() {
        let store = MemoryStateStore::new();
        store.set(LAST_SEEN_VERSION_KEY, "1.1.0").unwrap();
        assert_eq!(check_release_notice(&store, &notes(), "1.2.0"), None);
        assert_eq!(
            store.get(LAST_SEEN_VERSION_KEY).unwrap().as_deref(),
            Some("1.2.0")
        );
    }

    #[test]
    fn test_version_without_notice_still_recorded() {
        let store = MemoryStateStore::new();
        store.set(LAST_SEEN_VERSION_KEY, "1.2.0").unwrap();
        assert_eq!(check_release_notice(&store, &notes(), "1.2.5"), None);
        assert_eq!(
            store.get(LAST_SEEN_VERSION_KEY).unwrap().as_deref(),
            Some("1.2.5")
        );
    }

    #[test]
    fn test_new_message_after_upgrade() {
        let store = MemoryStateStore::new();
        store.set(LAST_SEEN_VERSION_KEY, "1.2.0").unwrap();
        assert_eq!(
            check_release_notice(&store, &notes(), "1.3.0").as_deref(),
            Some("Updated to version 1.3.0: workspace files")
        );
    }

    #[test]
    fn test_json_store_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = JsonStateStore::new(temp.path().join("nested").join("state.json"));

        assert_eq!(store.get(LAST_SEEN_VERSION_KEY).unwrap(), None);
        store.set(LAST_SEEN_VERSION_KEY, "1.2.1").unwrap();
        store.set("other", "value").unwrap();

        let reopened = JsonStateStore::new(store.path());
        assert_eq!(
            reopened.get(LAST_SEEN_VERSION_KEY).unwrap().as_deref(),
            Some("1.2.1")
        );
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_builtin_notes_cover_current_release_line() {
        let notes = ReleaseNotes::builtin();
        assert!(notes.get("1.2.0").is_some());
        assert_eq!(notes.notice_for(Some("1.2.0"), "1.2.1"), None);
    }
}
