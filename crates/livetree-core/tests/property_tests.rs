#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{root_tree, sentence_tree};
use livetree_core::diff::{Change, EditScript, PathSegment};
use livetree_core::grammar::LatinGrammar;
use livetree_core::{LiveDocument, Reconciler, SnapshotTree, UpdateOutcome};
use proptest::prelude::*;

fn sentence_text() -> impl Strategy<Value = String> {
    let word = prop::sample::select(vec!["Some", "English", "words", "don't", "well-known", "42"]);
    let gap = prop::sample::select(vec![" ", ", ", " - ", "  "]);
    let end = prop::sample::select(vec!["", ".", "!", "?", "..."]);
    (prop::collection::vec((word, gap), 0..8), end).prop_map(|(parts, end)| {
        let mut text: String = parts.into_iter().map(|(w, g)| format!("{}{}", w, g)).collect();
        text.push_str(end);
        text
    })
}

fn document_text() -> impl Strategy<Value = String> {
    let sentence = prop::sample::select(vec!["Some words.", "Other words!", "One", "Two more?"]);
    let gap = prop::sample::select(vec![" ", "\n", "\n\n", "  "]);
    prop::collection::vec((sentence, gap), 0..6)
        .prop_map(|parts| parts.into_iter().map(|(s, g)| format!("{}{}", s, g)).collect())
}

fn garbage_change() -> impl Strategy<Value = Change> {
    let children = || vec![PathSegment::key("children")];
    prop_oneof![
        (0usize..8).prop_map(move |i| Change::deletion(
            children(),
            i,
            SnapshotTree::text("WhiteSpaceNode", " ")
        )),
        (0usize..8).prop_map(move |i| Change::insertion(
            children(),
            i,
            SnapshotTree::text("PunctuationNode", "#")
        )),
        (0usize..8).prop_map(|i| Change::edit(
            vec![
                PathSegment::key("children"),
                PathSegment::Index(i),
                PathSegment::key("value"),
            ],
            "~"
        )),
        (0usize..8).prop_map(|i| Change::edit(
            vec![
                PathSegment::key("children"),
                PathSegment::Index(i),
                PathSegment::key("type"),
            ],
            "WhiteSpaceNode"
        )),
        (0usize..8).prop_map(|i| Change::edit(
            vec![
                PathSegment::key("children"),
                PathSegment::Index(i),
                PathSegment::key("children"),
                PathSegment::Index(0),
                PathSegment::key("value"),
            ],
            "zzz"
        )),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_sentence_update_matches_parse(old in sentence_text(), new in sentence_text()) {
        let (mut tree, root) = sentence_tree(&old);
        let reconciler = Reconciler::new();

        let outcome = reconciler.update(&mut tree, root, new.as_str()).unwrap();

        prop_assert!(
            !matches!(outcome, UpdateOutcome::Replaced { .. }),
            "bundled differ needed fallback: {:?}",
            outcome
        );
        prop_assert_eq!(tree.value_of(root).unwrap(), LatinGrammar::parse_sentence(&new));
        prop_assert_eq!(tree.len(), LatinGrammar::parse_sentence(&new).node_count());

        let again = reconciler.update(&mut tree, root, new.as_str()).unwrap();
        prop_assert_eq!(again, UpdateOutcome::NoOp);
    }

    #[test]
    fn prop_document_update_matches_parse(old in document_text(), new in document_text()) {
        let (mut tree, root) = root_tree(&old);

        let outcome = Reconciler::new().update(&mut tree, root, new.as_str()).unwrap();

        prop_assert!(
            !matches!(outcome, UpdateOutcome::Replaced { .. }),
            "bundled differ needed fallback: {:?}",
            outcome
        );
        prop_assert_eq!(tree.value_of(root).unwrap(), LatinGrammar::parse_root(&new));
        prop_assert_eq!(tree.to_plain_string(root).unwrap(), new);
    }

    #[test]
    fn prop_data_stays_with_its_node(old in sentence_text(), new in sentence_text()) {
        let (mut tree, root) = sentence_tree(&old);
        let before = tree.descendants(root).unwrap();
        for id in &before {
            tree.data_mut(*id).unwrap().set("id", id.as_raw());
        }

        Reconciler::new().update(&mut tree, root, new.as_str()).unwrap();

        for id in tree.descendants(root).unwrap() {
            let data = tree.data(id).unwrap();
            if before.contains(&id) {
                prop_assert_eq!(data.get("id"), Some(&serde_json::json!(id.as_raw())));
            } else {
                prop_assert!(data.is_empty());
            }
        }
    }

    #[test]
    fn prop_garbage_script_still_reaches_target(
        old in sentence_text(),
        new in sentence_text(),
        changes in prop::collection::vec(garbage_change(), 0..6),
    ) {
        let (mut tree, root) = sentence_tree(&old);
        tree.data_mut(root).unwrap().set("pinned", true);
        let script = EditScript::from(changes);
        let reconciler = Reconciler::builder()
            .differ(move |_: &SnapshotTree, _: &SnapshotTree| script.clone())
            .build();

        reconciler.update(&mut tree, root, new.as_str()).unwrap();

        let target = LatinGrammar::parse_sentence(&new);
        prop_assert_eq!(tree.value_of(root).unwrap(), target.clone());
        prop_assert_eq!(tree.len(), target.node_count());
        prop_assert_eq!(tree.data(root).unwrap().get("pinned"), Some(&serde_json::json!(true)));
    }
}
