//! Policy entry parsing
//!
//! An unwanted entry is written as `publisher.name` or `publisher.name@range`.
//! Nothing is validated here; a bad range only surfaces when it is matched.

use crate::types::PolicyEntry;

/// Split a raw policy string into extension id and optional version range.
///
/// Splits on the first `@`. An empty right-hand side is treated as "no range".
pub fn parse_entry(raw: &str) -> PolicyEntry {
    let raw = raw.trim();

    match raw.split_once('@') {
        Some((id, range)) => PolicyEntry {
            extension_id: id.to_string(),
            version_range: if range.is_empty() {
                None
            } else {
                Some(range.to_string())
            },
        },
        None => PolicyEntry {
            extension_id: raw.to_string(),
            version_range: None,
        },
    }
}
