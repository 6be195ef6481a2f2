//! Node capability contract consumed by the reconciler.
//!
//! The reconciler never reaches into a concrete tree type. It talks to any
//! host tree through [`LiveDocument`]: the mutation capability (text and
//! child-sequence operations) and the construction capability (building a
//! detached subtree from a snapshot). [`crate::model::LiveTree`] is the bundled
//! implementation.

use crate::errors::{LiveError, Result};
use crate::model::{Metadata, NodeId, SnapshotTree};

/// What a node can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Holds a string payload, no children
    Text,
    /// Holds an ordered child sequence
    Container,
    /// Holds neither
    Void,
}

/// Identity-bearing, mutable document tree
///
/// Every method that takes a [`NodeId`] returns `NotANode` when the id does
/// not name a live node of this document.
pub trait LiveDocument {
    /// Whether `id` names a live node of this document
    fn contains(&self, id: NodeId) -> bool;

    /// Type tag of the node
    fn node_type(&self, id: NodeId) -> Result<&str>;

    fn capability(&self, id: NodeId) -> Result<Capability>;

    /// Text payload of a text-capable node
    fn text(&self, id: NodeId) -> Result<&str>;

    /// Replace the text payload of a text-capable node
    fn set_text(&mut self, id: NodeId, value: &str) -> Result<()>;

    /// Ordered children of a container-capable node
    fn children(&self, id: NodeId) -> Result<&[NodeId]>;

    fn parent(&self, id: NodeId) -> Result<Option<NodeId>>;

    /// Insert a detached node as the first child of `parent`
    fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Insert a detached node as the last child of `parent`
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Insert a detached node right after `sibling`
    fn insert_after(&mut self, sibling: NodeId, node: NodeId) -> Result<()>;

    /// Unlink a node from its parent, keeping it (and its identity) alive
    fn detach(&mut self, id: NodeId) -> Result<()>;

    /// Unlink a node and drop it with its whole subtree and auxiliary data
    fn remove(&mut self, id: NodeId) -> Result<()>;

    /// Put the detached `new` where `old` is, then drop `old`'s subtree
    fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()>;

    /// Construction capability: build a detached subtree equal to `snapshot`
    fn build(&mut self, snapshot: &SnapshotTree) -> NodeId;

    /// Project a subtree to a snapshot, discarding identity and auxiliary data
    fn value_of(&self, id: NodeId) -> Result<SnapshotTree>;

    /// Auxiliary data of a node
    fn data(&self, id: NodeId) -> Result<&Metadata>;

    fn data_mut(&mut self, id: NodeId) -> Result<&mut Metadata>;

    /// Child of a container at `index`
    fn child_at(&self, id: NodeId, index: usize) -> Result<NodeId> {
        let children = self.children(id)?;
        children
            .get(index)
            .copied()
            .ok_or(LiveError::ChildIndexOutOfRange {
                node_id: id,
                index,
                len: children.len(),
            })
    }

    fn first_child(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.children(id)?.first().copied())
    }

    fn last_child(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.children(id)?.last().copied())
    }

    /// Rendered text of a subtree: every text payload, in document order
    fn to_plain_string(&self, id: NodeId) -> Result<String> {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.capability(current)? {
                Capability::Text => out.push_str(self.text(current)?),
                Capability::Container => {
                    stack.extend(self.children(current)?.iter().rev().copied());
                }
                Capability::Void => {}
            }
        }
        Ok(out)
    }

    /// Every node of a subtree in document order, the root first
    fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            if self.capability(current)? == Capability::Container {
                stack.extend(self.children(current)?.iter().rev().copied());
            }
        }
        Ok(out)
    }
}
