use livetree_core::grammar::LatinGrammar;
use livetree_core::model::LiveTree;
use livetree_core::{LiveDocument, NodeId, SnapshotTree};

/// Tree holding `text` parsed as a whole document
#[allow(dead_code)]
pub fn root_tree(text: &str) -> (LiveTree, NodeId) {
    LiveTree::from_snapshot(&LatinGrammar::parse_root(text))
}

/// Tree holding `text` parsed as a single sentence
#[allow(dead_code)]
pub fn sentence_tree(text: &str) -> (LiveTree, NodeId) {
    LiveTree::from_snapshot(&LatinGrammar::parse_sentence(text))
}

/// First sentence of the first paragraph of a root
#[allow(dead_code)]
pub fn first_sentence(tree: &LiveTree, root: NodeId) -> NodeId {
    let paragraph = tree.child_at(root, 0).unwrap();
    tree.child_at(paragraph, 0).unwrap()
}

/// Children of a container, copied out of the tree
#[allow(dead_code)]
pub fn children(tree: &LiveTree, id: NodeId) -> Vec<NodeId> {
    tree.children(id).unwrap().to_vec()
}

/// Type tag and rendered text of a node
#[allow(dead_code)]
pub fn describe(tree: &LiveTree, id: NodeId) -> (String, String) {
    (
        tree.node_type(id).unwrap().to_string(),
        tree.to_plain_string(id).unwrap(),
    )
}

/// Snapshot of a word node
#[allow(dead_code)]
pub fn word(text: &str) -> SnapshotTree {
    SnapshotTree::parent("WordNode", vec![SnapshotTree::text("TextNode", text)])
}
