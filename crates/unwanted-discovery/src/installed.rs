//! Installed extension sources
//!
//! The evaluator only ever sees a snapshot. These sources produce one,
//! either from the editor's extensions directory or from a JSON export.

use semver::Version;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use unwanted_core::{extension_key, Error, InstalledExtension, Result};

/// Marker file listing extension folders pending removal
const OBSOLETE_FILE: &str = ".obsolete";

/// Something that can report the installed extension set
pub trait InstalledSource {
    /// Human readable description of the source
    fn describe(&self) -> String;

    /// Take a snapshot of installed extensions
    fn load(&self) -> Result<Vec<InstalledExtension>>;
}

/// The subset of an extension's `package.json` we need
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    publisher: String,
    name: String,
    version: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl PackageManifest {
    fn into_installed(self) -> InstalledExtension {
        let id = format!("{}.{}", self.publisher, self.name);
        // `%displayName%` is a localisation key, not a name
        let display_name = match self.display_name {
            Some(name) if !name.is_empty() && !name.starts_with('%') => name,
            _ => self.name,
        };
        InstalledExtension::new(id, self.version).with_display_name(display_name)
    }
}

/// Reads `<dir>/<publisher.name-version>/package.json` for every extension.
///
/// The directory holds every installed extension, enabled or not; the editor
/// keeps its disabled list elsewhere. Extensions known to be disabled are
/// passed in with [`ExtensionsDirSource::with_disabled`], anything else is
/// reported as enabled. A [`SnapshotSource`] exported from the editor is exact.
pub struct ExtensionsDirSource {
    dir: PathBuf,
    disabled: HashSet<String>,
}

impl ExtensionsDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            disabled: HashSet::new(),
        }
    }

    /// Skip these extension ids (compared case-insensitively)
    pub fn with_disabled<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.disabled = ids.into_iter().map(|id| extension_key(id.as_ref())).collect();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn obsolete_folders(&self) -> HashMap<String, bool> {
        let path = self.dir.join(OBSOLETE_FILE);
        let Ok(content) = fs::read_to_string(&path) else {
            return HashMap::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring unreadable {}: {}", path.display(), e);
            HashMap::new()
        })
    }

    fn read_manifest(path: &Path) -> Result<InstalledExtension> {
        let content = fs::read_to_string(path)?;
        let manifest: PackageManifest = serde_json::from_str(&content)?;
        Ok(manifest.into_installed())
    }
}

impl InstalledSource for ExtensionsDirSource {
    fn describe(&self) -> String {
        format!("extensions directory {}", self.dir.display())
    }

    fn load(&self) -> Result<Vec<InstalledExtension>> {
        if !self.dir.is_dir() {
            return Err(Error::invalid_config(format!(
                "Extensions directory not found: {}",
                self.dir.display()
            )));
        }

        let obsolete = self.obsolete_folders();
        // Keyed by lowercase id; the newest version of each extension wins
        let mut by_id: BTreeMap<String, InstalledExtension> = BTreeMap::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let folder = entry.file_name().to_string_lossy().into_owned();
            if folder.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            if obsolete.get(&folder).copied().unwrap_or(false) {
                debug!("Skipping obsolete extension folder {}", folder);
                continue;
            }

            let manifest_path = entry.path().join("package.json");
            if !manifest_path.exists() {
                continue;
            }

            let extension = match Self::read_manifest(&manifest_path) {
                Ok(extension) => extension,
                Err(e) => {
                    warn!("Skipping {}: {}", manifest_path.display(), e);
                    continue;
                }
            };

            let key = extension_key(&extension.id);
            if self.disabled.contains(&key) {
                debug!("Skipping disabled extension {}", extension.id);
                continue;
            }
            match by_id.get(&key) {
                Some(existing) if !is_newer(&extension.version, &existing.version) => {}
                _ => {
                    by_id.insert(key, extension);
                }
            }
        }

        debug!("Found {} installed extensions", by_id.len());
        Ok(by_id.into_values().collect())
    }
}

fn is_newer(candidate: &str, current: &str) -> bool {
    match (Version::parse(candidate), Version::parse(current)) {
        (Ok(a), Ok(b)) => a > b,
        _ => false,
    }
}

/// Reads a JSON array of `{ "id", "version", "displayName"? }`
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InstalledSource for SnapshotSource {
    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }

    fn load(&self) -> Result<Vec<InstalledExtension>> {
        let content = fs::read_to_string(&self.path)?;
        let extensions: Vec<InstalledExtension> = serde_json::from_str(&content)?;
        Ok(extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_into_installed() {
        let manifest: PackageManifest = serde_json::from_str(
            r#"{ "publisher": "esbenp", "name": "prettier-vscode", "version": "10.1.0", "displayName": "Prettier" }"#,
        )
        .unwrap();
        let ext = manifest.into_installed();
        assert_eq!(ext.id, "esbenp.prettier-vscode");
        assert_eq!(ext.version, "10.1.0");
        assert_eq!(ext.display_name, "Prettier");
    }

    #[test]
    fn test_localised_display_name_falls_back_to_name() {
        let manifest: PackageManifest = serde_json::from_str(
            r#"{ "publisher": "ms-python", "name": "python", "version": "2024.0.1", "displayName": "%displayName%" }"#,
        )
        .unwrap();
        assert_eq!(manifest.into_installed().display_name, "python");
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("1.10.0", "1.9.0"));
        assert!(!is_newer("1.9.0", "1.10.0"));
        assert!(!is_newer("garbage", "1.0.0"));
    }
}
