//! Policy fragment discovery
//!
//! Walks the workspace root for `.vscode/extensions*.json(c)` files, adds
//! workspace documents, and reads every candidate concurrently. The merged
//! policy is only built once every read has finished.

use futures::future::join_all;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use unwanted_core::config::DiscoverySettings;
use unwanted_core::{aggregate, Error, FragmentContent, Policy, RawFragment, Result};
use walkdir::WalkDir;

const WORKSPACE_FILE_EXTENSION: &str = "code-workspace";

/// Finds and reads policy fragments below a workspace root
pub struct FragmentDiscovery {
    root: PathBuf,
    settings: DiscoverySettings,
    workspace_file: Option<PathBuf>,
}

impl FragmentDiscovery {
    pub fn new(root: impl Into<PathBuf>, settings: DiscoverySettings) -> Self {
        Self {
            root: root.into(),
            settings,
            workspace_file: None,
        }
    }

    /// Use an explicit workspace document instead of scanning the root for one
    pub fn with_workspace_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.workspace_file = Some(path.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate files in discovery order: glob matches sorted by path, then
    /// workspace documents
    pub fn find_candidates(&self) -> Result<Vec<PathBuf>> {
        let include = build_globset(&self.settings.include)?;
        let exclude = build_globset(&self.settings.exclude)?;

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .max_depth(self.settings.max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                let Some(rel) = relative(&self.root, entry.path()) else {
                    return true;
                };
                if rel.is_empty() {
                    return true;
                }
                if entry.file_type().is_dir() {
                    // Probe a child path so `dir/**` patterns prune the directory itself
                    !exclude.is_match(format!("{}/_", rel))
                } else {
                    !exclude.is_match(&rel)
                }
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable path during discovery: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(rel) = relative(&self.root, entry.path()) {
                if include.is_match(&rel) {
                    files.push(entry.into_path());
                }
            }
        }
        files.sort();

        info!("Found {} extension configuration files", files.len());
        for file in &files {
            debug!("- {}", file.display());
        }

        let workspace_files = self.workspace_files()?;
        for file in &workspace_files {
            info!("Workspace file found: {}", file.display());
        }
        files.extend(workspace_files);

        Ok(files)
    }

    fn workspace_files(&self) -> Result<Vec<PathBuf>> {
        if let Some(path) = &self.workspace_file {
            return Ok(vec![path.clone()]);
        }
        if !self.settings.workspace_files || !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_workspace = path
                .extension()
                .is_some_and(|ext| ext == WORKSPACE_FILE_EXTENSION);
            if is_workspace && path.is_file() {
                found.push(path);
            }
        }
        found.sort();
        Ok(found)
    }

    /// Read every candidate concurrently.
    ///
    /// Returns [`Error::ConfigNotFound`] when there are no candidates. Files
    /// that cannot be read are kept as malformed fragments.
    pub async fn discover(&self) -> Result<Vec<RawFragment>> {
        let candidates = self.find_candidates()?;

        if candidates.is_empty() {
            return Err(Error::config_not_found(format!(
                "{} for {}",
                self.root.display(),
                self.settings.include.join(", ")
            )));
        }

        let reads = candidates.into_iter().map(|path| async move {
            let source = path.display().to_string();
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => RawFragment::parse(source, &text),
                Err(e) => RawFragment {
                    source,
                    content: FragmentContent::Malformed(format!("read failed: {}", e)),
                },
            }
        });

        Ok(join_all(reads).await)
    }

    /// Discover and merge into one policy
    pub async fn load_policy(&self) -> Result<Policy> {
        let fragments = self.discover().await?;
        aggregate(&fragments)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| Error::invalid_config(format!("Invalid glob \"{}\": {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::invalid_config(format!("Invalid glob set: {}", e)))
}

/// Path relative to `root` with `/` separators
fn relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
