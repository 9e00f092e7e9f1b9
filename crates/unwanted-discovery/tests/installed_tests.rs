//! Installed extension source tests

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use unwanted_discovery::{ExtensionsDirSource, InstalledSource, SnapshotSource};

fn install(dir: &Path, folder: &str, manifest: &str) {
    let ext_dir = dir.join(folder);
    fs::create_dir_all(&ext_dir).unwrap();
    fs::write(ext_dir.join("package.json"), manifest).unwrap();
}

fn manifest(publisher: &str, name: &str, version: &str) -> String {
    format!(
        r#"{{ "publisher": "{}", "name": "{}", "version": "{}", "displayName": "{} ext" }}"#,
        publisher, name, version, name
    )
}

#[test]
fn test_extensions_dir_reads_manifests() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    install(dir, "esbenp.prettier-vscode-10.1.0", &manifest("esbenp", "prettier-vscode", "10.1.0"));
    install(dir, "hookyqr.beautify-1.5.0", &manifest("HookyQR", "beautify", "1.5.0"));

    let installed = ExtensionsDirSource::new(dir).load().unwrap();

    assert_eq!(installed.len(), 2);
    assert_eq!(installed[0].id, "esbenp.prettier-vscode");
    assert_eq!(installed[0].display_name, "prettier-vscode ext");
    assert_eq!(installed[1].id, "HookyQR.beautify");
    assert_eq!(installed[1].version, "1.5.0");
}

#[test]
fn test_extensions_dir_keeps_newest_version() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    install(dir, "a.b-1.9.0", &manifest("a", "b", "1.9.0"));
    install(dir, "a.b-1.10.0", &manifest("a", "b", "1.10.0"));

    let installed = ExtensionsDirSource::new(dir).load().unwrap();

    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].version, "1.10.0");
}

#[test]
fn test_extensions_dir_honours_obsolete_marker() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    install(dir, "a.b-1.0.0", &manifest("a", "b", "1.0.0"));
    install(dir, "c.d-2.0.0", &manifest("c", "d", "2.0.0"));
    fs::write(dir.join(".obsolete"), r#"{ "a.b-1.0.0": true }"#).unwrap();

    let installed = ExtensionsDirSource::new(dir).load().unwrap();

    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].id, "c.d");
}

#[test]
fn test_extensions_dir_skips_disabled_extensions() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    install(dir, "hookyqr.beautify-1.5.0", &manifest("HookyQR", "beautify", "1.5.0"));
    install(dir, "c.d-2.0.0", &manifest("c", "d", "2.0.0"));

    let installed = ExtensionsDirSource::new(dir)
        .with_disabled(["hookyqr.BEAUTIFY"])
        .load()
        .unwrap();

    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].id, "c.d");
}

#[test]
fn test_extensions_dir_skips_broken_manifests() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    install(dir, "broken-1.0.0", "{ not json");
    install(dir, "c.d-2.0.0", &manifest("c", "d", "2.0.0"));
    fs::create_dir_all(dir.join("no-manifest")).unwrap();

    let installed = ExtensionsDirSource::new(dir).load().unwrap();

    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].id, "c.d");
}

#[test]
fn test_missing_extensions_dir_is_error() {
    let temp = TempDir::new().unwrap();
    let source = ExtensionsDirSource::new(temp.path().join("missing"));
    assert!(source.load().is_err());
    assert!(source.describe().contains("missing"));
}

#[test]
fn test_snapshot_source() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("installed.json");
    fs::write(
        &path,
        r#"[
            { "id": "a.b", "version": "1.5.0", "displayName": "A B" },
            { "id": "c.d", "version": "2.0.0" }
        ]"#,
    )
    .unwrap();

    let installed = SnapshotSource::new(&path).load().unwrap();

    assert_eq!(installed.len(), 2);
    assert_eq!(installed[0].label(), "A B");
    assert_eq!(installed[1].label(), "c.d");
}

#[test]
fn test_snapshot_source_rejects_invalid_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("installed.json");
    fs::write(&path, r#"{ "id": "a.b" }"#).unwrap();

    assert!(SnapshotSource::new(&path).load().is_err());
}
