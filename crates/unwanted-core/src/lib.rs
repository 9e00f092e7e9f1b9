//! # unwanted-core
//!
//! Core library for auditing installed editor extensions against a
//! project's unwanted-extensions policy:
//! - Policy entry parsing (`publisher.name@range`)
//! - npm-style semver range matching
//! - Merging policy fragments from several configuration files
//! - Evaluation of the merged policy against installed extensions
//! - Report findings and release notices for presenters

pub mod aggregator;
pub mod config;
pub mod entry;
pub mod error;
pub mod evaluator;
pub mod matcher;
pub mod notice;
pub mod report;
pub mod types;
pub mod utils;

pub use aggregator::{aggregate, FragmentConfig, FragmentContent, RawFragment};
pub use config::{Settings, SettingsLoader};
pub use entry::parse_entry;
pub use error::{Error, Result};
pub use evaluator::{evaluate, evaluate_concurrent, Diagnostic, Evaluation};
pub use matcher::{match_version, satisfies, MatchOutcome, VersionRange};
pub use notice::{check_release_notice, JsonStateStore, MemoryStateStore, ReleaseNotes, StateStore};
pub use report::{marketplace_query, Finding, Report, ReportPresenter};
pub use types::{extension_key, EvaluationHit, InstalledExtension, Policy, PolicyEntry, VersionMatchKind};
pub use utils::get_home_dir;
