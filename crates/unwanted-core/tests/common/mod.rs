//! Common test utilities for unwanted-core
//!
//! Provides builders for policies, fragments, and installed extension
//! snapshots.

#![allow(dead_code)]

use unwanted_core::{FragmentConfig, InstalledExtension, Policy, RawFragment};

/// Builder for merged policies
#[derive(Default)]
pub struct PolicyBuilder {
    recommendations: Vec<String>,
    unwanted: Vec<String>,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recommend(mut self, id: &str) -> Self {
        self.recommendations.push(id.to_string());
        self
    }

    pub fn unwanted(mut self, entry: &str) -> Self {
        self.unwanted.push(entry.to_string());
        self
    }

    pub fn build(self) -> Policy {
        Policy {
            recommendations: self.recommendations,
            unwanted_recommendations: self.unwanted,
        }
    }
}

/// Snapshot of installed extensions from `(id, version)` pairs
pub fn installed(pairs: &[(&str, &str)]) -> Vec<InstalledExtension> {
    pairs
        .iter()
        .map(|(id, version)| InstalledExtension::new(*id, *version))
        .collect()
}

/// Fragment defining only unwanted entries
pub fn unwanted_fragment(source: &str, entries: &[&str]) -> RawFragment {
    RawFragment::new(
        source,
        FragmentConfig {
            recommendations: None,
            unwanted_recommendations: Some(entries.iter().map(|s| s.to_string()).collect()),
        },
    )
}

/// Fragment defining both lists
pub fn fragment(source: &str, recommendations: &[String], unwanted: &[String]) -> RawFragment {
    RawFragment::new(
        source,
        FragmentConfig {
            recommendations: Some(recommendations.to_vec()),
            unwanted_recommendations: Some(unwanted.to_vec()),
        },
    )
}
