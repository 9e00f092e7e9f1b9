//! Discovery for unwanted
//!
//! This crate handles:
//! - Finding policy files (`.vscode/extensions*.json`, workspace documents)
//! - Reading them concurrently into fragments
//! - Snapshotting the installed extension set

pub mod fragments;
pub mod installed;

pub use fragments::FragmentDiscovery;
pub use installed::{ExtensionsDirSource, InstalledSource, SnapshotSource};
