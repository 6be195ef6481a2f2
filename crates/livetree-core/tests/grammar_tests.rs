#![allow(clippy::unwrap_used, clippy::expect_used)]

use livetree_core::grammar::{tokenizer_for, GrammarTable, LatinGrammar};
use livetree_core::model::LiveTree;
use livetree_core::{Grammar, LiveDocument, LiveError, Reconciler, SnapshotTree, UpdateOutcome};
use proptest::prelude::*;

/// One `CellNode` per comma-separated field
fn parse_row(text: &str) -> SnapshotTree {
    let cells = text
        .split_inclusive(',')
        .map(|cell| SnapshotTree::text("CellNode", cell))
        .collect();
    SnapshotTree::parent("RowNode", cells)
}

fn csv_grammar() -> GrammarTable {
    GrammarTable::new().with_entry_point("Row", parse_row)
}

#[test]
fn test_custom_grammar_drives_update() {
    let reconciler = Reconciler::builder().grammar(csv_grammar()).build();
    let (mut tree, row) = LiveTree::from_snapshot(&parse_row("a,b,c"));
    let cells = tree.children(row).unwrap().to_vec();

    let outcome = reconciler.update(&mut tree, row, "a,B,c").unwrap();

    assert_eq!(outcome, UpdateOutcome::Applied { changes: 1 });
    assert_eq!(tree.children(row).unwrap(), &cells[..]);
    assert_eq!(tree.text(cells[1]).unwrap(), "B,");
}

#[test]
fn test_custom_grammar_without_entry_point() {
    let reconciler = Reconciler::builder().grammar(csv_grammar()).build();
    let (mut tree, sentence) = LiveTree::from_snapshot(&LatinGrammar::parse_sentence("Hi"));

    let err = reconciler.update(&mut tree, sentence, "Hello").unwrap_err();

    assert_eq!(
        err,
        LiveError::NoTokenizer {
            node_type: "SentenceNode".to_string()
        }
    );
}

#[test]
fn test_text_shaped_tokenizer_output_is_rejected() {
    let grammar = GrammarTable::new().with_entry_point("Sentence", |text| {
        SnapshotTree::text("SentenceNode", text)
    });
    let reconciler = Reconciler::builder().grammar(grammar).build();
    let (mut tree, sentence) =
        LiveTree::from_snapshot(&LatinGrammar::parse_sentence("Some English words."));
    let before = tree.value_of(sentence).unwrap();
    let len = tree.len();

    let err = reconciler.update(&mut tree, sentence, "Other").unwrap_err();

    assert!(matches!(err, LiveError::TypeMismatch { .. }), "got {:?}", err);
    assert!(err.is_precondition());
    assert_eq!(tree.value_of(sentence).unwrap(), before);
    assert_eq!(tree.to_plain_string(sentence).unwrap(), "Some English words.");
    assert_eq!(tree.len(), len);
}

#[test]
fn test_mistyped_tokenizer_output_is_rejected() {
    let grammar = GrammarTable::new().with_entry_point("Sentence", LatinGrammar::parse_root);
    let reconciler = Reconciler::builder().grammar(grammar).build();
    let (mut tree, sentence) = LiveTree::from_snapshot(&LatinGrammar::parse_sentence("Hi"));

    let err = reconciler.update(&mut tree, sentence, "Hello there.").unwrap_err();

    assert_eq!(
        err,
        LiveError::TypeMismatch {
            expected: "SentenceNode".to_string(),
            found: "RootNode".to_string(),
        }
    );
    assert_eq!(tree.to_plain_string(sentence).unwrap(), "Hi");
}

#[test]
fn test_grammar_entry_points_by_name() {
    assert!(LatinGrammar.entry_point("Sentence").is_some());
    assert!(LatinGrammar.entry_point("SentenceNode").is_none());
    assert!(csv_grammar().entry_point("Row").is_some());
}

#[test]
fn test_tokenizer_for_strips_node_suffix() {
    let tokenizer = tokenizer_for(&LatinGrammar, "ParagraphNode").expect("paragraph entry point");
    assert_eq!(tokenizer("One. Two."), LatinGrammar::parse_paragraph("One. Two."));
}

#[test]
fn test_empty_text_parses_to_empty_containers() {
    for tree in [
        LatinGrammar::parse_root(""),
        LatinGrammar::parse_paragraph(""),
        LatinGrammar::parse_sentence(""),
    ] {
        assert_eq!(tree.children(), Some(&[][..]));
    }
}

proptest! {
    #[test]
    fn prop_parse_keeps_every_character(text in "\\PC{0,60}") {
        prop_assert_eq!(LatinGrammar::parse_root(&text).to_plain_string(), text.clone());
        prop_assert_eq!(LatinGrammar::parse_paragraph(&text).to_plain_string(), text.clone());
        prop_assert_eq!(LatinGrammar::parse_sentence(&text).to_plain_string(), text);
    }

    #[test]
    fn prop_text_nodes_are_never_empty(text in "[a-z .,!?'\\n-]{0,40}") {
        let tree = LatinGrammar::parse_root(&text);
        let mut stack = vec![&tree];
        while let Some(node) = stack.pop() {
            match node.children() {
                Some(children) => stack.extend(children),
                None => prop_assert!(!node.value().unwrap_or_default().is_empty()),
            }
        }
    }
}
