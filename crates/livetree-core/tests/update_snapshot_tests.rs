#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{children, describe, sentence_tree, word};
use livetree_core::grammar::LatinGrammar;
use livetree_core::model::LiveTree;
use livetree_core::{LiveDocument, LiveError, Reconciler, SnapshotTree, UpdateOutcome};

#[test]
fn test_text_snapshot_sets_text() {
    let mut tree = LiveTree::new();
    let space = tree.create_text("WhiteSpaceNode", " ");

    let outcome = Reconciler::new()
        .update(&mut tree, space, SnapshotTree::text("WhiteSpaceNode", "\n"))
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::TextSet);
    assert_eq!(tree.text(space).unwrap(), "\n");
}

#[test]
fn test_snapshot_for_type_without_tokenizer() {
    let (mut tree, root) = LiveTree::from_snapshot(&word("Some"));
    let text = tree.child_at(root, 0).unwrap();

    let outcome = Reconciler::new()
        .update(&mut tree, root, word("Sum"))
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::Applied { changes: 1 });
    assert_eq!(tree.child_at(root, 0).unwrap(), text);
    assert_eq!(tree.to_plain_string(root).unwrap(), "Sum");
}

#[test]
fn test_sentence_snapshot_preserves_untouched_children() {
    let (mut tree, root) = sentence_tree("Some English");
    let original = children(&tree, root);

    Reconciler::new()
        .update(
            &mut tree,
            root,
            &LatinGrammar::parse_sentence("Some English words."),
        )
        .unwrap();

    assert_eq!(&children(&tree, root)[..3], &original[..]);
}

#[test]
fn test_nested_retype_replaces_only_that_node() {
    let (mut tree, root) = sentence_tree("Hi!");
    let original = children(&tree, root);
    tree.data_mut(original[1]).unwrap().set("flag", true);

    let target = SnapshotTree::parent(
        "SentenceNode",
        vec![word("Hi"), SnapshotTree::text("WhiteSpaceNode", "!")],
    );
    let outcome = Reconciler::new().update(&mut tree, root, &target).unwrap();

    assert_eq!(outcome, UpdateOutcome::Applied { changes: 1 });
    let now = children(&tree, root);
    assert_eq!(now[0], original[0]);
    // A retyped node is a new node; its old data goes with the old one
    assert_ne!(now[1], original[1]);
    assert!(!tree.contains(original[1]));
    assert!(tree.data(now[1]).unwrap().is_empty());
    assert_eq!(
        describe(&tree, now[1]),
        ("WhiteSpaceNode".to_string(), "!".to_string())
    );
}

#[test]
fn test_snapshot_from_json_ignores_data() {
    let (mut tree, root) = sentence_tree("Hi");
    let json = r#"{
        "type": "SentenceNode",
        "data": {"ignored": true},
        "children": [
            {"type": "WordNode", "children": [{"type": "TextNode", "value": "Hi"}]},
            {"type": "PunctuationNode", "value": "!", "data": {"also": "ignored"}}
        ]
    }"#;
    let snapshot = SnapshotTree::from_json_str(json).unwrap();

    Reconciler::new().update(&mut tree, root, snapshot).unwrap();

    assert_eq!(tree.value_of(root).unwrap(), LatinGrammar::parse_sentence("Hi!"));
}

#[test]
fn test_value_of_round_trips_through_json() {
    let (tree, root) = sentence_tree("Some words.");
    let json = tree.value_of(root).unwrap().to_json_string().unwrap();

    let back = SnapshotTree::from_json_str(&json).unwrap();
    assert_eq!(back, LatinGrammar::parse_sentence("Some words."));
}

// ===== Mismatches =====

fn assert_untouched_after(
    tree: &mut LiveTree,
    target: livetree_core::NodeId,
    snapshot: SnapshotTree,
) -> LiveError {
    let before = tree.value_of(target).unwrap();
    let ids = tree.descendants(target).unwrap();

    let err = Reconciler::new()
        .update(tree, target, snapshot)
        .unwrap_err();

    assert_eq!(tree.value_of(target).unwrap(), before);
    assert_eq!(tree.descendants(target).unwrap(), ids);
    err
}

#[test]
fn test_snapshot_of_other_type_is_rejected() {
    let (mut tree, root) = LiveTree::from_snapshot(&word("Some"));

    let err = assert_untouched_after(
        &mut tree,
        root,
        LatinGrammar::parse_sentence("Some"),
    );

    assert_eq!(
        err,
        LiveError::TypeMismatch {
            expected: "WordNode".to_string(),
            found: "SentenceNode".to_string(),
        }
    );
}

#[test]
fn test_text_snapshot_of_other_type_is_rejected() {
    let mut tree = LiveTree::new();
    let space = tree.create_text("WhiteSpaceNode", " ");

    let err = assert_untouched_after(
        &mut tree,
        space,
        SnapshotTree::text("PunctuationNode", "."),
    );

    assert!(matches!(err, LiveError::TypeMismatch { .. }));
}

#[test]
fn test_container_snapshot_for_text_node_is_rejected() {
    let mut tree = LiveTree::new();
    let text = tree.create_text("TextNode", "Alfred");

    let err = assert_untouched_after(
        &mut tree,
        text,
        SnapshotTree::parent("TextNode", vec![]),
    );

    assert!(matches!(err, LiveError::TypeMismatch { .. }));
    assert_eq!(tree.text(text).unwrap(), "Alfred");
}

#[test]
fn test_text_snapshot_for_container_is_rejected() {
    let (mut tree, root) = sentence_tree("Some words.");

    let err = assert_untouched_after(
        &mut tree,
        root,
        SnapshotTree::text("SentenceNode", "Some words."),
    );

    assert!(matches!(err, LiveError::TypeMismatch { .. }));
}
