//! Aggregation tests
//!
//! Tests cover:
//! - "No configuration found" versus "empty policy"
//! - Discovery order preservation
//! - Associativity of merging
//! - Aggregation feeding evaluation end to end

mod common;

use common::{fragment, installed, unwanted_fragment};
use proptest::prelude::*;
use unwanted_core::{aggregate, evaluate, Error, FragmentConfig, Policy, RawFragment};

#[test]
fn test_zero_fragments_is_config_not_found() {
    let result = aggregate(&[]);
    assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
}

#[test]
fn test_empty_fragments_are_not_config_not_found() {
    let fragments = vec![
        RawFragment::new("one.json", FragmentConfig::default()),
        RawFragment::parse("two.json", "{}"),
        RawFragment::parse("three.json", "{ broken"),
    ];

    let policy = aggregate(&fragments).unwrap();
    assert_eq!(policy, Policy::default());
}

#[test]
fn test_discovery_order_is_preserved() {
    let fragments = vec![
        unwanted_fragment("b/.vscode/extensions.json", &["b.one", "b.two"]),
        unwanted_fragment("a/.vscode/extensions.json", &["a.one"]),
    ];

    let policy = aggregate(&fragments).unwrap();
    assert_eq!(policy.unwanted_recommendations, vec!["b.one", "b.two", "a.one"]);
}

#[test]
fn test_workspace_and_folder_fragments_merge() {
    let fragments = vec![
        RawFragment::parse(
            ".vscode/extensions.json",
            r#"{ "recommendations": ["r.one"], "unwantedRecommendations": ["u.one"] }"#,
        ),
        RawFragment::parse(
            "project.code-workspace",
            r#"{
                "folders": [],
                "settings": { "editor.tabSize": 2 },
                "extensions": { "unwantedRecommendations": ["u.two@~1.2"] },
            }"#,
        ),
    ];

    let policy = aggregate(&fragments).unwrap();
    assert_eq!(policy.recommendations, vec!["r.one"]);
    assert_eq!(policy.unwanted_recommendations, vec!["u.one", "u.two@~1.2"]);
}

#[test]
fn test_duplicate_entries_evaluate_independently() {
    let fragments = vec![
        unwanted_fragment("one.json", &["a.b@^2.0.0"]),
        unwanted_fragment("two.json", &["a.b@^1.0.0"]),
    ];
    let policy = aggregate(&fragments).unwrap();

    let result = evaluate(&policy, &installed(&[("a.b", "1.4.0")]));
    assert_eq!(result.hits.len(), 1);
    assert_eq!(result.hits[0].entry.version_range.as_deref(), Some("^1.0.0"));
}

fn entries() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,4}\\.[a-z]{1,4}(@\\^[0-9])?", 0..4)
}

fn fragments() -> impl Strategy<Value = Vec<RawFragment>> {
    prop::collection::vec((entries(), entries()), 0..4).prop_map(|lists| {
        lists
            .into_iter()
            .enumerate()
            .map(|(i, (recs, unwanted))| fragment(&format!("f{}.json", i), &recs, &unwanted))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_aggregation_is_associative(a in fragments(), b in fragments(), c in fragments()) {
        prop_assume!(!a.is_empty() || !b.is_empty());
        prop_assume!(!c.is_empty());

        let mut ab = a.clone();
        ab.extend(b.clone());
        let mut abc = ab.clone();
        abc.extend(c.clone());

        let split = aggregate(&ab).unwrap().merge(aggregate(&c).unwrap());
        let whole = aggregate(&abc).unwrap();

        prop_assert_eq!(split, whole);
    }

    #[test]
    fn prop_config_not_found_iff_empty(frags in fragments()) {
        let result = aggregate(&frags);
        prop_assert_eq!(result.is_err(), frags.is_empty());
    }
}
