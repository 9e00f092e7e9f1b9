//! Unwanted extension evaluation
//!
//! Given a merged [`Policy`] and a snapshot of installed extensions, decide
//! which installed extensions violate the policy. Evaluation is pure apart
//! from tracing events; presentation belongs to the caller.

use crate::entry::parse_entry;
use crate::error::{Error, Result};
use crate::matcher::{match_version, MatchOutcome};
use crate::types::{extension_key, EvaluationHit, InstalledExtension, Policy, PolicyEntry, VersionMatchKind};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Problems found in the policy itself while evaluating it.
///
/// None of these abort a run; the affected entry simply produces no hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    /// The entry has nothing before `@`
    EmptyExtensionId { entry: String },

    /// The entry's range is not valid semver range syntax
    MalformedVersionRange { entry: String, reason: String },

    /// The installed version of a targeted extension is not a semantic version
    InvalidInstalledVersion {
        extension_id: String,
        version: String,
        reason: String,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyExtensionId { entry } => {
                write!(f, "Entry \"{}\" has no extension id", entry)
            }
            Self::MalformedVersionRange { entry, reason } => {
                write!(f, "Entry \"{}\" has a malformed version range: {}", entry, reason)
            }
            Self::InvalidInstalledVersion {
                extension_id,
                version,
                reason,
            } => write!(
                f,
                "Installed version \"{}\" of {} cannot be compared: {}",
                version, extension_id, reason
            ),
        }
    }
}

/// Result of evaluating a policy against installed extensions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// Installed and unwanted extensions, in policy order, one per extension
    pub hits: Vec<EvaluationHit>,

    /// Policy problems encountered along the way
    pub diagnostics: Vec<Diagnostic>,
}

impl Evaluation {
    pub fn is_clean(&self) -> bool {
        self.hits.is_empty()
    }

    /// Ids of every hit, as installed
    pub fn hit_ids(&self) -> Vec<String> {
        self.hits.iter().map(|h| h.installed.id.clone()).collect()
    }
}

/// Outcome for a single unwanted entry
#[derive(Debug, Clone, Default)]
struct EntryOutcome {
    hit: Option<EvaluationHit>,
    diagnostic: Option<Diagnostic>,
}

/// Evaluate every unwanted entry in policy order.
pub fn evaluate(policy: &Policy, installed: &[InstalledExtension]) -> Evaluation {
    let outcomes = policy
        .unwanted_recommendations
        .iter()
        .map(|raw| evaluate_entry(raw, installed));

    collect(outcomes)
}

/// Evaluate entries as independent tasks and join them in policy order.
///
/// Produces the same [`Evaluation`] as [`evaluate`] regardless of the order
/// in which tasks complete.
pub async fn evaluate_concurrent(
    policy: Arc<Policy>,
    installed: Arc<[InstalledExtension]>,
) -> Result<Evaluation> {
    let handles: Vec<_> = (0..policy.unwanted_recommendations.len())
        .map(|idx| {
            let policy = Arc::clone(&policy);
            let installed = Arc::clone(&installed);
            tokio::spawn(async move {
                evaluate_entry(&policy.unwanted_recommendations[idx], &installed)
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = handle.await.map_err(|e| Error::EvaluationTask {
            message: e.to_string(),
        })?;
        outcomes.push(outcome);
    }

    Ok(collect(outcomes))
}

/// Keep the first hit per extension id, preserving order
fn collect(outcomes: impl IntoIterator<Item = EntryOutcome>) -> Evaluation {
    let mut evaluation = Evaluation::default();
    let mut seen = HashSet::new();

    for outcome in outcomes {
        if let Some(diagnostic) = outcome.diagnostic {
            evaluation.diagnostics.push(diagnostic);
        }
        if let Some(hit) = outcome.hit {
            if seen.insert(extension_key(&hit.installed.id)) {
                evaluation.hits.push(hit);
            } else {
                debug!(
                    "{} already flagged by an earlier entry, ignoring {}",
                    hit.installed.id, hit.entry
                );
            }
        }
    }

    evaluation
}

fn evaluate_entry(raw: &str, installed: &[InstalledExtension]) -> EntryOutcome {
    let entry = parse_entry(raw);
    debug!("Checking {}", entry);

    if entry.extension_id.is_empty() {
        warn!("Ignoring unwanted entry without extension id: \"{}\"", raw);
        return EntryOutcome {
            hit: None,
            diagnostic: Some(Diagnostic::EmptyExtensionId {
                entry: raw.to_string(),
            }),
        };
    }

    let Some(extension) = find_installed(&entry, installed) else {
        debug!("{} is not installed", entry.extension_id);
        return EntryOutcome::default();
    };
    debug!("{} is enabled", entry.extension_id);

    let Some(range) = entry.version_range.as_deref() else {
        return EntryOutcome {
            hit: Some(hit(&entry, extension, VersionMatchKind::NoRangeSpecified)),
            diagnostic: None,
        };
    };

    match match_version(&extension.version, range) {
        MatchOutcome::Matched => {
            debug!(
                "Version \"{}\" matches \"{}\"",
                extension.version, range
            );
            EntryOutcome {
                hit: Some(hit(&entry, extension, VersionMatchKind::RangeMatched)),
                diagnostic: None,
            }
        }
        MatchOutcome::NotMatched => {
            debug!(
                "Version \"{}\" does NOT match \"{}\"",
                extension.version, range
            );
            EntryOutcome::default()
        }
        MatchOutcome::InvalidRange(reason) => {
            warn!("Malformed version range in \"{}\": {}", raw, reason);
            EntryOutcome {
                hit: None,
                diagnostic: Some(Diagnostic::MalformedVersionRange {
                    entry: raw.to_string(),
                    reason,
                }),
            }
        }
        MatchOutcome::InvalidVersion(reason) => {
            warn!(
                "Cannot compare installed version \"{}\" of {}: {}",
                extension.version, extension.id, reason
            );
            EntryOutcome {
                hit: None,
                diagnostic: Some(Diagnostic::InvalidInstalledVersion {
                    extension_id: extension.id.clone(),
                    version: extension.version.clone(),
                    reason,
                }),
            }
        }
    }
}

fn find_installed<'a>(
    entry: &PolicyEntry,
    installed: &'a [InstalledExtension],
) -> Option<&'a InstalledExtension> {
    installed.iter().find(|ext| entry.targets(&ext.id))
}

fn hit(entry: &PolicyEntry, installed: &InstalledExtension, kind: VersionMatchKind) -> EvaluationHit {
    EvaluationHit {
        extension_id: entry.extension_id.clone(),
        installed: installed.clone(),
        entry: entry.clone(),
        match_kind: kind,
    }
}
