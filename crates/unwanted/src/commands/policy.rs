//! Policy command

use anyhow::Result;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use unwanted_core::{parse_entry, Policy, Settings, VersionRange};

use super::common;
use crate::cli::PolicyArgs;
use crate::output;

/// How one unwanted entry reads after parsing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryView {
    entry: String,
    extension_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_range: Option<String>,
    status: String,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Extension")]
    extension_id: String,
    #[tabled(rename = "Version range")]
    version_range: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PolicyView<'a> {
    recommendations: &'a [String],
    unwanted_recommendations: Vec<EntryView>,
}

pub async fn run(args: PolicyArgs, settings: &Settings) -> Result<()> {
    let Some(policy) = common::load_policy(&args.workspace, settings).await? else {
        return Ok(());
    };

    let entries = entry_views(&policy);

    if args.json {
        let view = PolicyView {
            recommendations: &policy.recommendations,
            unwanted_recommendations: entries,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    output::header("Recommendations");
    if policy.recommendations.is_empty() {
        println!("  (none)");
    }
    for id in &policy.recommendations {
        println!("  {}", id);
    }

    output::header("Unwanted recommendations");
    if entries.is_empty() {
        output::info("No unwanted recommendations found.");
        return Ok(());
    }

    let rows: Vec<EntryRow> = entries
        .into_iter()
        .map(|view| EntryRow {
            extension_id: view.extension_id,
            version_range: view.version_range.unwrap_or_else(|| "-".to_string()),
            status: view.status,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);

    Ok(())
}

fn entry_views(policy: &Policy) -> Vec<EntryView> {
    policy
        .unwanted_recommendations
        .iter()
        .map(|raw| {
            let entry = parse_entry(raw);
            let status = if entry.extension_id.is_empty() {
                "missing extension id".to_string()
            } else {
                match &entry.version_range {
                    None => "any version".to_string(),
                    Some(range) => match VersionRange::parse(range) {
                        Ok(_) => "ok".to_string(),
                        Err(e) => format!("malformed range: {}", e),
                    },
                }
            };
            EntryView {
                entry: raw.clone(),
                extension_id: entry.extension_id,
                version_range: entry.version_range,
                status,
            }
        })
        .collect()
}
