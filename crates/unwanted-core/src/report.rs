//! Findings handed to a presenter
//!
//! The core never renders anything itself. It turns an [`Evaluation`] into an
//! ordered list of [`Finding`]s and leaves the rendering to a
//! [`ReportPresenter`] supplied by the host.

use crate::error::Result;
use crate::evaluator::{Diagnostic, Evaluation};
use serde::Serialize;

/// One user-facing warning about an unwanted extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Installed extension id
    pub extension_id: String,

    /// Display name of the installed extension
    pub display_name: String,

    /// Installed version
    pub version: String,

    /// Policy entry that flagged it
    pub entry: String,

    /// Recommendation text
    pub message: String,

    /// Whether the extension can be looked up in the marketplace
    pub can_show_in_marketplace: bool,

    /// Marketplace search for this extension alone
    pub marketplace_query: String,
}

/// Everything a presenter needs for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub findings: Vec<Finding>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        let findings = evaluation
            .hits
            .iter()
            .map(|hit| Finding {
                extension_id: hit.installed.id.clone(),
                display_name: hit.installed.label().to_string(),
                version: hit.installed.version.clone(),
                entry: hit.entry.to_string(),
                message: hit.reason(),
                can_show_in_marketplace: true,
                marketplace_query: marketplace_query(&[hit.installed.id.as_str()]),
            })
            .collect();

        Self {
            findings,
            diagnostics: evaluation.diagnostics.clone(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Summary line shown after the individual warnings
    pub fn summary(&self) -> String {
        match self.findings.len() {
            0 => "No enabled unwanted extensions found".to_string(),
            1 => "Found 1 enabled unwanted extension!".to_string(),
            n => format!("Found {} enabled unwanted extensions!", n),
        }
    }

    /// Marketplace search covering every finding, if there are any
    pub fn marketplace_query(&self) -> Option<String> {
        let ids: Vec<&str> = self
            .findings
            .iter()
            .filter(|f| f.can_show_in_marketplace)
            .map(|f| f.extension_id.as_str())
            .collect();

        if ids.is_empty() {
            None
        } else {
            Some(marketplace_query(&ids))
        }
    }
}

/// Build a marketplace search scoped to the given ids: `@id:a, @id:b`
pub fn marketplace_query<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter()
        .map(|id| format!("@id:{}", id.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a report to the user
pub trait ReportPresenter {
    /// Present the findings of one run
    fn present(&mut self, report: &Report) -> Result<()>;
}
