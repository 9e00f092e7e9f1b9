//! Shared command plumbing: settings, discovery, installed sources

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use tracing::debug;
use unwanted_core::utils::{default_extensions_dir, default_state_file};
use unwanted_core::{
    check_release_notice, JsonStateStore, Policy, ReleaseNotes, Settings, SettingsLoader,
};
use unwanted_discovery::{ExtensionsDirSource, FragmentDiscovery, InstalledSource, SnapshotSource};

use crate::cli::WorkspaceArgs;
use crate::output;

/// Shown when no policy file exists anywhere in the workspace
pub const CONFIG_NOT_FOUND_MESSAGE: &str = "No extension configuration found. Add \"unwantedRecommendations\" to .vscode/extensions.json, or to the \"extensions\" section of a .code-workspace file.";

/// Load settings and fold in the global CLI flags
pub fn load_settings(verbose: u8, no_color: bool) -> Result<Settings> {
    let loader = SettingsLoader::new().context("Failed to locate the settings directory")?;
    let mut settings = loader
        .load()
        .with_context(|| format!("Failed to load settings from {}", loader.config_dir()))?;

    if no_color {
        settings.display.color_enabled = false;
    }
    if verbose > 0 {
        settings.display.verbose = true;
    }

    Ok(settings)
}

/// Print the release notice once per version change
pub fn show_release_notice(settings: &Settings) {
    let path = match &settings.state.file {
        Some(file) => file.clone().into_std_path_buf(),
        None => match default_state_file() {
            Ok(path) => path,
            Err(e) => {
                debug!("No state file available: {}", e);
                return;
            }
        },
    };

    let store = JsonStateStore::new(path);
    if let Some(notice) =
        check_release_notice(&store, &ReleaseNotes::builtin(), env!("CARGO_PKG_VERSION"))
    {
        output::notice(&notice);
    }
}

/// Discovery configured from the workspace flags
pub fn discovery(workspace: &WorkspaceArgs, settings: &Settings) -> FragmentDiscovery {
    let discovery = FragmentDiscovery::new(
        workspace.root.as_std_path(),
        settings.discovery.clone(),
    );
    match &workspace.workspace_file {
        Some(file) => discovery.with_workspace_file(file.as_std_path()),
        None => discovery,
    }
}

/// Discover and merge the policy.
///
/// `Ok(None)` means no configuration exists; the warning has already been shown.
pub async fn load_policy(workspace: &WorkspaceArgs, settings: &Settings) -> Result<Option<Policy>> {
    let discovery = discovery(workspace, settings);

    let spinner = output::spinner("Searching for extension configuration files...");
    let result = discovery.load_policy().await;
    spinner.finish_and_clear();

    match result {
        Ok(policy) => Ok(Some(policy)),
        Err(e) if e.is_config_not_found() => {
            debug!("{}", e);
            output::warning(CONFIG_NOT_FOUND_MESSAGE);
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| {
            format!("Failed to read extension configuration under {}", workspace.root)
        }),
    }
}

/// Pick the installed extension source.
///
/// Precedence: `--installed` snapshot, `--extensions-dir`, settings, `~/.vscode/extensions`.
pub fn installed_source(
    snapshot: Option<&Utf8PathBuf>,
    extensions_dir: Option<&Utf8PathBuf>,
    settings: &Settings,
) -> Result<Box<dyn InstalledSource>> {
    if let Some(path) = snapshot {
        return Ok(Box::new(SnapshotSource::new(path.as_std_path())));
    }

    let dir = match extensions_dir.or(settings.installed.extensions_dir.as_ref()) {
        Some(dir) => dir.clone().into_std_path_buf(),
        None => default_extensions_dir().context("Failed to locate the extensions directory")?,
    };
    Ok(Box::new(
        ExtensionsDirSource::new(dir).with_disabled(&settings.installed.disabled),
    ))
}
