use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Metadata, SnapshotTree};
use crate::document::{Capability, LiveDocument};
use crate::errors::{LiveError, Result};

/// Identity of a live node
///
/// Ids are handed out by one [`LiveTree`] in increasing order and never
/// reused, so comparing ids is the identity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload of a live node; exactly one capability
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Text(String),
    Parent(Vec<NodeId>),
    /// Neither text nor children. Never produced by [`LiveTree::build`].
    Void,
}

/// A node of a [`LiveTree`]
#[derive(Debug, Clone)]
pub struct LiveNode {
    id: NodeId,
    node_type: String,
    content: NodeContent,
    parent: Option<NodeId>,
    data: Metadata,
}

impl LiveNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn data(&self) -> &Metadata {
        &self.data
    }

    pub fn capability(&self) -> Capability {
        match self.content {
            NodeContent::Text(_) => Capability::Text,
            NodeContent::Parent(_) => Capability::Container,
            NodeContent::Void => Capability::Void,
        }
    }
}

/// Arena of identity-bearing nodes
///
/// Not thread-safe (no Arc/RwLock) - designed for single-threaded use; the
/// `&mut self` receivers serialize mutation of one tree.
#[derive(Debug, Clone, Default)]
pub struct LiveTree {
    nodes: HashMap<NodeId, LiveNode>,
    next_id: u64,
}

impl LiveTree {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 0,
        }
    }

    /// Build a tree holding exactly `snapshot`, returning it with its root
    pub fn from_snapshot(snapshot: &SnapshotTree) -> (Self, NodeId) {
        let mut tree = Self::new();
        let root = tree.build(snapshot);
        (tree, root)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, node_type: impl Into<String>, value: impl Into<String>) -> NodeId {
        self.alloc(node_type.into(), NodeContent::Text(value.into()))
    }

    /// Create a detached, empty container node
    pub fn create_parent(&mut self, node_type: impl Into<String>) -> NodeId {
        self.alloc(node_type.into(), NodeContent::Parent(Vec::new()))
    }

    /// Create a detached node with neither capability
    pub fn create_void(&mut self, node_type: impl Into<String>) -> NodeId {
        self.alloc(node_type.into(), NodeContent::Void)
    }

    pub fn get(&self, id: NodeId) -> Option<&LiveNode> {
        self.nodes.get(&id)
    }

    /// Number of live nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node_type: String, content: NodeContent) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            LiveNode {
                id,
                node_type,
                content,
                parent: None,
                data: Metadata::new(),
            },
        );
        id
    }

    fn node(&self, id: NodeId) -> Result<&LiveNode> {
        self.nodes
            .get(&id)
            .ok_or(LiveError::NotANode { node_id: id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut LiveNode> {
        self.nodes
            .get_mut(&id)
            .ok_or(LiveError::NotANode { node_id: id })
    }

    fn children_mut(&mut self, id: NodeId) -> Result<&mut Vec<NodeId>> {
        let node = self.node_mut(id)?;
        match &mut node.content {
            NodeContent::Parent(children) => Ok(children),
            _ => Err(LiveError::NotParent {
                node_id: id,
                node_type: node.node_type.clone(),
            }),
        }
    }

    /// `child` may be linked under `parent`: it is detached, `parent` holds
    /// children, and `parent` is not inside `child`'s subtree.
    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if let Some(current) = self.node(child)?.parent {
            return Err(LiveError::AlreadyAttached {
                node_id: child,
                parent_id: current,
            });
        }
        self.children(parent)?;

        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(LiveError::CycleDetected { node_id: child });
            }
            cursor = self.node(id)?.parent;
        }
        Ok(())
    }

    fn position_in_parent(&self, id: NodeId) -> Result<(NodeId, usize)> {
        let parent = self
            .node(id)?
            .parent
            .ok_or(LiveError::Detached { node_id: id })?;
        let index = self
            .children(parent)?
            .iter()
            .position(|c| *c == id)
            .ok_or_else(|| LiveError::Internal {
                message: format!("{} points to parent {} which does not list it", id, parent),
            })?;
        Ok((parent, index))
    }

    fn link(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        self.children_mut(parent)?.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Drop a detached subtree from the arena
    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                if let NodeContent::Parent(children) = node.content {
                    stack.extend(children);
                }
            }
        }
    }
}

impl LiveDocument for LiveTree {
    fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn node_type(&self, id: NodeId) -> Result<&str> {
        Ok(&self.node(id)?.node_type)
    }

    fn capability(&self, id: NodeId) -> Result<Capability> {
        Ok(self.node(id)?.capability())
    }

    fn text(&self, id: NodeId) -> Result<&str> {
        let node = self.node(id)?;
        match &node.content {
            NodeContent::Text(value) => Ok(value),
            _ => Err(LiveError::NotText {
                node_id: id,
                node_type: node.node_type.clone(),
            }),
        }
    }

    fn set_text(&mut self, id: NodeId, value: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        match &mut node.content {
            NodeContent::Text(current) => {
                value.clone_into(current);
                Ok(())
            }
            _ => Err(LiveError::NotText {
                node_id: id,
                node_type: node.node_type.clone(),
            }),
        }
    }

    fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        let node = self.node(id)?;
        match &node.content {
            NodeContent::Parent(children) => Ok(children),
            _ => Err(LiveError::NotParent {
                node_id: id,
                node_type: node.node_type.clone(),
            }),
        }
    }

    fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_attachable(parent, child)?;
        self.link(parent, child, 0)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_attachable(parent, child)?;
        let end = self.children(parent)?.len();
        self.link(parent, child, end)
    }

    fn insert_after(&mut self, sibling: NodeId, node: NodeId) -> Result<()> {
        let (parent, index) = self.position_in_parent(sibling)?;
        self.check_attachable(parent, node)?;
        self.link(parent, node, index + 1)
    }

    fn detach(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        self.children_mut(parent)?.retain(|c| *c != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    fn remove(&mut self, id: NodeId) -> Result<()> {
        self.detach(id)?;
        self.drop_subtree(id);
        Ok(())
    }

    fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        let (parent, index) = self.position_in_parent(old)?;
        self.check_attachable(parent, new)?;

        self.children_mut(parent)?[index] = new;
        self.node_mut(new)?.parent = Some(parent);
        self.node_mut(old)?.parent = None;
        self.drop_subtree(old);
        Ok(())
    }

    fn build(&mut self, snapshot: &SnapshotTree) -> NodeId {
        match snapshot {
            SnapshotTree::Text { node_type, value } => self.create_text(node_type, value),
            SnapshotTree::Parent {
                node_type,
                children,
            } => {
                let child_ids: Vec<NodeId> = children.iter().map(|c| self.build(c)).collect();
                let id = self.alloc(node_type.clone(), NodeContent::Parent(child_ids.clone()));
                for child in child_ids {
                    if let Some(node) = self.nodes.get_mut(&child) {
                        node.parent = Some(id);
                    }
                }
                id
            }
        }
    }

    fn value_of(&self, id: NodeId) -> Result<SnapshotTree> {
        let node = self.node(id)?;
        Ok(match &node.content {
            NodeContent::Text(value) => SnapshotTree::text(&node.node_type, value),
            NodeContent::Parent(children) => SnapshotTree::parent(
                &node.node_type,
                children
                    .iter()
                    .map(|c| self.value_of(*c))
                    .collect::<Result<Vec<_>>>()?,
            ),
            // Void nodes project as empty containers
            NodeContent::Void => SnapshotTree::parent(&node.node_type, Vec::new()),
        })
    }

    fn data(&self, id: NodeId) -> Result<&Metadata> {
        Ok(&self.node(id)?.data)
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut Metadata> {
        Ok(&mut self.node_mut(id)?.data)
    }
}
