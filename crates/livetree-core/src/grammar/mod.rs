//! Grammar seam and tokenizer dispatch.
//!
//! A grammar exposes named entry points, each turning raw text into a
//! [`SnapshotTree`] rooted at one node type. The dispatcher maps a live node's
//! type tag to the entry point that can re-tokenize its content standalone:
//! `SentenceNode` is served by the `Sentence` entry point, and so on.

pub mod latin;

use std::collections::BTreeMap;

use crate::model::SnapshotTree;

pub use latin::LatinGrammar;

/// Entry point of a grammar: raw text in, snapshot out
pub type Tokenizer = fn(&str) -> SnapshotTree;

/// Source of tokenizers, keyed by entry-point name
pub trait Grammar {
    /// Entry point registered under `name`, if any
    fn entry_point(&self, name: &str) -> Option<Tokenizer>;
}

impl<G: Grammar + ?Sized> Grammar for &G {
    fn entry_point(&self, name: &str) -> Option<Tokenizer> {
        (**self).entry_point(name)
    }
}

impl<G: Grammar + ?Sized> Grammar for Box<G> {
    fn entry_point(&self, name: &str) -> Option<Tokenizer> {
        (**self).entry_point(name)
    }
}

/// Entry-point name for a node type: the tag without its `Node` suffix
///
/// Tags without the suffix, and the bare tag `Node`, have no entry point.
pub fn entry_point_name(node_type: &str) -> Option<&str> {
    node_type
        .strip_suffix("Node")
        .filter(|name| !name.is_empty())
}

/// Tokenizer able to parse content for a node of `node_type`
pub fn tokenizer_for<G: Grammar + ?Sized>(grammar: &G, node_type: &str) -> Option<Tokenizer> {
    entry_point_name(node_type).and_then(|name| grammar.entry_point(name))
}

/// Grammar assembled from explicitly registered entry points
///
/// Useful for host grammars and for tests that need a restricted or
/// deliberately odd tokenizer set.
#[derive(Debug, Clone, Default)]
pub struct GrammarTable {
    entry_points: BTreeMap<String, Tokenizer>,
}

impl GrammarTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tokenizer` under `name` (builder form)
    pub fn with_entry_point(mut self, name: impl Into<String>, tokenizer: Tokenizer) -> Self {
        self.insert(name, tokenizer);
        self
    }

    /// Register `tokenizer` under `name`, replacing any previous one
    pub fn insert(&mut self, name: impl Into<String>, tokenizer: Tokenizer) {
        self.entry_points.insert(name.into(), tokenizer);
    }

    /// Registered entry-point names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entry_points.keys().map(String::as_str)
    }
}

impl Grammar for GrammarTable {
    fn entry_point(&self, name: &str) -> Option<Tokenizer> {
        self.entry_points.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shout(text: &str) -> SnapshotTree {
        SnapshotTree::text("ShoutNode", text.to_uppercase())
    }

    #[test]
    fn test_entry_point_name() {
        assert_eq!(entry_point_name("SentenceNode"), Some("Sentence"));
        assert_eq!(entry_point_name("RootNode"), Some("Root"));
        assert_eq!(entry_point_name("Node"), None);
        assert_eq!(entry_point_name("Sentence"), None);
        assert_eq!(entry_point_name(""), None);
    }

    #[test]
    fn test_latin_dispatch() {
        let grammar = LatinGrammar;
        assert!(tokenizer_for(&grammar, "RootNode").is_some());
        assert!(tokenizer_for(&grammar, "ParagraphNode").is_some());
        assert!(tokenizer_for(&grammar, "SentenceNode").is_some());
        assert!(tokenizer_for(&grammar, "WordNode").is_none());
        assert!(tokenizer_for(&grammar, "SomeUnknownNode").is_none());
    }

    #[test]
    fn test_grammar_table() {
        let table = GrammarTable::new().with_entry_point("Shout", shout);

        let tokenizer = tokenizer_for(&table, "ShoutNode").expect("registered");
        assert_eq!(tokenizer("hey"), SnapshotTree::text("ShoutNode", "HEY"));
        assert!(tokenizer_for(&table, "SentenceNode").is_none());
        assert_eq!(table.names().collect::<Vec<_>>(), ["Shout"]);
    }

    #[test]
    fn test_boxed_grammar_dispatches() {
        let boxed: Box<dyn Grammar> = Box::new(LatinGrammar);
        assert!(tokenizer_for(&boxed, "SentenceNode").is_some());
    }
}
