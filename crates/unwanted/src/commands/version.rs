//! Version command

use crate::cli::VersionArgs;
use crate::output;
use crate::version::VersionInfo;
use anyhow::Result;

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info.display());

        if let Some(commit) = &info.commit {
            output::kv("Commit", commit);
        }
        if let Some(target) = &info.target {
            output::kv("Target", target);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info_current_is_valid_semver() {
        let info = VersionInfo::current();
        let parsed = semver::Version::parse(&info.version);
        assert!(
            parsed.is_ok(),
            "version should be valid semver, got: {}",
            info.version
        );
    }

    #[test]
    fn test_version_info_display_starts_with_binary_name() {
        let info = VersionInfo::current();
        assert!(info.display().starts_with("unwanted "));
        assert!(info.display().contains(&info.version));
        assert_eq!(format!("{}", info), info.display());
    }

    #[test]
    fn test_target_is_forwarded_by_build_script() {
        let info = VersionInfo::current();
        let target = info.target.as_deref().expect("build script sets TARGET");
        assert!(!target.is_empty());
        assert!(info.display().ends_with(target));
    }

    #[test]
    fn test_version_info_json_serialization() {
        let info = VersionInfo::current();
        let json = serde_json::to_string(&info).expect("should serialize to JSON");
        assert!(json.contains(&info.version));
    }
}
