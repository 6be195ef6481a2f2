//! Structural, identity-free tree values.
//!
//! A [`SnapshotTree`] is what the grammar produces from raw text, what the
//! differ compares, and what the live tree projects to. Its JSON form is
//! `{"type": ..., "value": ...}` for text nodes and
//! `{"type": ..., "children": [...]}` for containers; a `data` key on input is
//! ignored.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Immutable structural projection of a tree.
///
/// Equality is structural: same shape, same types, same values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotTree {
    /// Container node
    Parent {
        #[serde(rename = "type")]
        node_type: String,
        children: Vec<SnapshotTree>,
    },
    /// Text node
    Text {
        #[serde(rename = "type")]
        node_type: String,
        value: String,
    },
}

impl SnapshotTree {
    /// Build a text snapshot
    pub fn text(node_type: impl Into<String>, value: impl Into<String>) -> Self {
        SnapshotTree::Text {
            node_type: node_type.into(),
            value: value.into(),
        }
    }

    /// Build a container snapshot
    pub fn parent(node_type: impl Into<String>, children: Vec<SnapshotTree>) -> Self {
        SnapshotTree::Parent {
            node_type: node_type.into(),
            children,
        }
    }

    /// Parse a snapshot from its JSON form
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the JSON is not a snapshot.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the snapshot to its JSON form
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn node_type(&self) -> &str {
        match self {
            SnapshotTree::Parent { node_type, .. } | SnapshotTree::Text { node_type, .. } => {
                node_type
            }
        }
    }

    /// The same snapshot under a different type tag
    pub fn retyped(self, new_type: impl Into<String>) -> Self {
        match self {
            SnapshotTree::Parent { children, .. } => SnapshotTree::Parent {
                node_type: new_type.into(),
                children,
            },
            SnapshotTree::Text { value, .. } => SnapshotTree::Text {
                node_type: new_type.into(),
                value,
            },
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, SnapshotTree::Text { .. })
    }

    /// Children of a container snapshot, `None` for text
    pub fn children(&self) -> Option<&[SnapshotTree]> {
        match self {
            SnapshotTree::Parent { children, .. } => Some(children),
            SnapshotTree::Text { .. } => None,
        }
    }

    /// Value of a text snapshot, `None` for containers
    pub fn value(&self) -> Option<&str> {
        match self {
            SnapshotTree::Text { value, .. } => Some(value),
            SnapshotTree::Parent { .. } => None,
        }
    }

    /// Whether `other` has the same variant (text vs container)
    pub fn same_shape(&self, other: &SnapshotTree) -> bool {
        self.is_text() == other.is_text()
    }

    /// Concatenated text of every text node, in document order
    pub fn to_plain_string(&self) -> String {
        let mut out = String::new();
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        match self {
            SnapshotTree::Text { value, .. } => out.push_str(value),
            SnapshotTree::Parent { children, .. } => {
                for child in children {
                    child.write_plain(out);
                }
            }
        }
    }

    /// Number of nodes in this snapshot, itself included
    pub fn node_count(&self) -> usize {
        match self {
            SnapshotTree::Text { .. } => 1,
            SnapshotTree::Parent { children, .. } => {
                1 + children.iter().map(SnapshotTree::node_count).sum::<usize>()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn word(text: &str) -> SnapshotTree {
        SnapshotTree::parent("WordNode", vec![SnapshotTree::text("TextNode", text)])
    }

    #[test]
    fn test_order_agrees_with_equality() {
        let mut nodes = vec![
            word("b"),
            SnapshotTree::text("WhiteSpaceNode", " "),
            word("a"),
            word("b"),
            SnapshotTree::parent("WordNode", vec![]),
        ];

        nodes.sort();
        nodes.dedup();

        assert_eq!(nodes.len(), 4);
        assert!(nodes.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(word("a").cmp(&word("a")), std::cmp::Ordering::Equal);
        assert!(word("a") < word("b"));
    }

    #[test]
    fn test_json_shape() {
        let sentence = SnapshotTree::parent(
            "SentenceNode",
            vec![word("Hi"), SnapshotTree::text("PunctuationNode", "!")],
        );

        let value = serde_json::to_value(&sentence).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "SentenceNode",
                "children": [
                    {"type": "WordNode", "children": [{"type": "TextNode", "value": "Hi"}]},
                    {"type": "PunctuationNode", "value": "!"}
                ]
            })
        );
    }

    #[test]
    fn test_data_key_is_ignored_on_input() {
        let parsed = SnapshotTree::from_json_str(
            r#"{"type": "WordNode", "data": {"stem": "eric"}, "children": []}"#,
        )
        .unwrap();

        assert_eq!(parsed, SnapshotTree::parent("WordNode", vec![]));
    }

    #[test]
    fn test_not_a_snapshot() {
        let err = SnapshotTree::from_json_str(r#"{"kind": "WordNode"}"#).unwrap_err();
        assert!(matches!(err, crate::errors::LiveError::Serialization { .. }));
    }

    #[test]
    fn test_retyped_keeps_content() {
        let retyped = word("Hi").retyped("EmphasisNode");
        assert_eq!(retyped.node_type(), "EmphasisNode");
        assert_eq!(retyped.to_plain_string(), "Hi");
        assert_eq!(retyped.children().map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_plain_string_and_count() {
        let sentence = SnapshotTree::parent(
            "SentenceNode",
            vec![
                word("Some"),
                SnapshotTree::text("WhiteSpaceNode", " "),
                word("words"),
            ],
        );
        assert_eq!(sentence.to_plain_string(), "Some words");
        assert_eq!(sentence.node_count(), 6);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(word("a"), word("a"));
        assert_ne!(word("a"), word("b"));
        assert!(word("a").same_shape(&word("b")));
        assert!(!word("a").same_shape(&SnapshotTree::text("TextNode", "a")));
    }
}
