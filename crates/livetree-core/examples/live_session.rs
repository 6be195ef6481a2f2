//! Live Editing Session Demonstration
//!
//! Feeds a sequence of keystroke-sized edits into one tree, the way an editor
//! would, and reports which nodes survived each update.
//!
//! Key concepts illustrated:
//! 1. Identity preservation across updates
//! 2. Auxiliary data riding on preserved nodes
//! 3. Update outcomes (applied, no-op, text set)
//! 4. Request correlation in logs
//!
//! Run with `RUST_LOG=livetree=debug` to see the structured log events.

use livetree_core::core_types::{RequestContext, TraceId};
use livetree_core::logging_facility::{init, Profile};
use livetree_core::model::LiveTree;
use livetree_core::{LiveDocument, NodeId, Reconciler};
use std::collections::HashSet;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);
    println!("=== LiveTree Session Demo ===\n");

    let reconciler = Reconciler::new();
    let mut tree = LiveTree::new();
    let root = tree.create_parent("RootNode");
    let session = TraceId::new();

    // ===== Part 1: Typing =====
    println!("## Part 1: Typing into an empty document\n");

    let keystrokes = [
        "Some",
        "Some English",
        "Some English words.",
        "Some English words. More",
        "Some English words. More text follows.",
        "Some English words.\n\nMore text follows.",
    ];

    for text in keystrokes {
        let before: HashSet<NodeId> = tree.descendants(root)?.into_iter().collect();
        let ctx = RequestContext::new().with_trace_id(session.clone());

        let outcome = reconciler.update_with_context(&mut tree, root, text, &ctx)?;

        let after = tree.descendants(root)?;
        let kept = after.iter().filter(|id| before.contains(id)).count();
        println!(
            "{:<45} {:<8} kept {:>2}/{:<2} nodes",
            format!("{:?}", text),
            outcome.as_str(),
            kept,
            after.len()
        );
    }

    // ===== Part 2: Auxiliary data =====
    println!("\n## Part 2: Annotations survive unrelated edits\n");

    let first_sentence = first_of_type(&tree, root, "SentenceNode")?;
    tree.data_mut(first_sentence)?.set("checked", true);

    reconciler.update(&mut tree, root, "Some English words.\n\nMore text follows!")?;

    let still_there = first_of_type(&tree, root, "SentenceNode")?;
    println!(
        "First sentence identity kept: {}, annotation: {:?}",
        still_there == first_sentence,
        tree.data(still_there)?.get("checked")
    );

    // ===== Part 3: No-op and text nodes =====
    println!("\n## Part 3: Re-submitting the same text\n");

    let current = tree.to_plain_string(root)?;
    let outcome = reconciler.update(&mut tree, root, current)?;
    println!("Outcome: {}", outcome.as_str());

    let word = first_of_type(&tree, root, "TextNode")?;
    let outcome = reconciler.update(&mut tree, word, "Many")?;
    println!("Text node update: {} -> {:?}", outcome.as_str(), tree.to_plain_string(root)?);

    Ok(())
}

fn first_of_type(
    tree: &LiveTree,
    root: NodeId,
    node_type: &str,
) -> Result<NodeId, Box<dyn std::error::Error>> {
    for id in tree.descendants(root)? {
        if tree.node_type(id)? == node_type {
            return Ok(id);
        }
    }
    Err(format!("no {} under {}", node_type, root).into())
}
