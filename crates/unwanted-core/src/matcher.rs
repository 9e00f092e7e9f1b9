//! Version range matching
//!
//! Policy files use the npm flavour of semver ranges (`>=1.0.0 <2.0.0`,
//! `1.2.3 - 1.4.0`, `^1.x || ~2.1`). The `semver` crate speaks the Cargo
//! flavour, so each `||` alternative is rewritten into a comma separated
//! [`VersionReq`] before matching:
//!
//! - whitespace separated comparators become comma separated
//! - a bare version means an exact match (`1.2.3` is `=1.2.3`)
//! - hyphen ranges become `>=low, <=high`
//! - wildcard components are dropped so partial versions carry the meaning
//!   (`1.x` is `=1`, `>=1.2.x` is `>=1.2`)
//! - `v` and `=` prefixes are accepted on versions

use crate::error::{Error, Result};
use semver::{Version, VersionReq};
use std::fmt;
use std::str::FromStr;

const OPERATORS: &[&str] = &["<=", ">=", "~>", "<", ">", "=", "^", "~"];

/// Outcome of matching an installed version against a range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The installed version satisfies the range
    Matched,
    /// The installed version is outside the range
    NotMatched,
    /// The range expression could not be parsed
    InvalidRange(String),
    /// The installed version is not a semantic version
    InvalidVersion(String),
}

impl MatchOutcome {
    /// Collapse to a plain boolean; invalid input never matches
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// A parsed npm-style version range: a union of comparator sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    /// Parse a range expression
    pub fn parse(range: &str) -> Result<Self> {
        let alternatives = range
            .split("||")
            .map(|set| translate_set(set).and_then(|req| parse_req(range, &req)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            raw: range.trim().to_string(),
            alternatives,
        })
    }

    /// Whether the version satisfies any of the comparator sets
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }

    /// The expression as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The translated comparator sets
    pub fn requirements(&self) -> &[VersionReq] {
        &self.alternatives
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Parse an installed version string, accepting a leading `v` or `=`
pub fn parse_version(version: &str) -> Result<Version> {
    let cleaned = strip_version_prefix(version.trim().trim_start_matches('='));
    Version::parse(cleaned).map_err(|_| Error::invalid_version(version))
}

/// Match an installed version against a range, reporting why a match failed
pub fn match_version(installed: &str, range: &str) -> MatchOutcome {
    let range = match VersionRange::parse(range) {
        Ok(range) => range,
        Err(e) => return MatchOutcome::InvalidRange(e.to_string()),
    };

    let version = match parse_version(installed) {
        Ok(v) => v,
        Err(e) => return MatchOutcome::InvalidVersion(e.to_string()),
    };

    if range.matches(&version) {
        MatchOutcome::Matched
    } else {
        MatchOutcome::NotMatched
    }
}

/// Whether `installed` satisfies `range`; malformed input is a non-match
pub fn satisfies(installed: &str, range: &str) -> bool {
    match_version(installed, range).is_match()
}

fn parse_req(range: &str, req: &str) -> Result<VersionReq> {
    VersionReq::parse(req).map_err(|e| Error::malformed_version_range(range.trim(), e.to_string()))
}

/// Rewrite one npm comparator set into Cargo requirement syntax
fn translate_set(set: &str) -> Result<String> {
    let tokens: Vec<&str> = set.split_whitespace().collect();

    if tokens.is_empty() {
        return Ok("*".to_string());
    }

    if let Some(pos) = tokens.iter().position(|t| *t == "-") {
        if pos != 1 || tokens.len() != 3 {
            return Err(Error::malformed_version_range(
                set.trim(),
                "hyphen range must be written as `<low> - <high>`",
            ));
        }
        let low = translate_comparator(">=", tokens[0])?;
        let high = translate_comparator("<=", tokens[2])?;
        return Ok(join_comparators(vec![low, high]));
    }

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;

    for token in tokens {
        if let Some(op) = pending_op.take() {
            comparators.push(translate_comparator(op, token)?);
            continue;
        }

        let (op, rest) = split_operator(token);
        if rest.is_empty() {
            if op.is_empty() {
                continue;
            }
            // `>= 1.2.3` with a space after the operator
            pending_op = Some(op);
        } else {
            comparators.push(translate_comparator(op, rest)?);
        }
    }

    if let Some(op) = pending_op {
        return Err(Error::malformed_version_range(
            set.trim(),
            format!("operator `{}` is missing a version", op),
        ));
    }

    Ok(join_comparators(comparators))
}

/// Join comparators of one set. `semver` only accepts `*` on its own, and
/// next to other comparators it constrains nothing, so it is dropped there.
fn join_comparators(comparators: Vec<String>) -> String {
    let bounded: Vec<String> = comparators.into_iter().filter(|c| c != "*").collect();
    if bounded.is_empty() {
        "*".to_string()
    } else {
        bounded.join(", ")
    }
}

fn split_operator(token: &str) -> (&str, &str) {
    for op in OPERATORS {
        if let Some(rest) = token.strip_prefix(op) {
            return (op, rest);
        }
    }
    ("", token)
}

fn translate_comparator(op: &str, version: &str) -> Result<String> {
    let version = strip_version_prefix(version.trim_start_matches('='));
    let partial = strip_wildcards(version);

    if partial.is_empty() {
        return Ok("*".to_string());
    }

    let op = match op {
        "" => "=",
        "~>" => "~",
        other => other,
    };

    Ok(format!("{}{}", op, partial))
}

fn strip_version_prefix(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

/// Drop the first wildcard component and everything after it
fn strip_wildcards(version: &str) -> String {
    let (core, suffix) = match version.find(['-', '+']) {
        Some(idx) => version.split_at(idx),
        None => (version, ""),
    };

    let parts: Vec<&str> = core.split('.').collect();
    match parts.iter().position(|p| is_wildcard(p)) {
        Some(idx) => parts[..idx].join("."),
        None => format!("{}{}", core, suffix),
    }
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "x" | "X" | "*")
}
