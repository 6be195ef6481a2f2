//! Edit script types.
//!
//! An [`EditScript`] is the ordered list of [`Change`]s turning one snapshot
//! into another. Paths alternate structural wrapper keys (`children`, `value`)
//! with child indices and field names, e.g. `children[0].children[2].value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::SnapshotTree;

/// Wrapper key in front of a child index
pub const KEY_CHILDREN: &str = "children";
/// Text payload field
pub const KEY_VALUE: &str = "value";
/// Type tag field
pub const KEY_TYPE: &str = "type";
/// Auxiliary data namespace; changes below it are never applied
pub const KEY_DATA: &str = "data";

/// One step of a change path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(index) => Some(*index),
            PathSegment::Key(_) => None,
        }
    }
}

/// Render a path as `children[0].value`
pub fn format_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Index(index) => out.push_str(&format!("[{}]", index)),
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
        }
    }
    if out.is_empty() {
        out.push_str("<root>");
    }
    out
}

/// What a change does at its path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ChangeKind {
    /// Replace the field at the path with `new_value`
    Edit { new_value: Value },
    /// Insert `item` into the `children` sequence at the path
    ArrayInsertion { index: usize, item: SnapshotTree },
    /// Delete the child at `index` of the `children` sequence at the path
    ArrayDeletion { index: usize, item: SnapshotTree },
}

/// One entry of an edit script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub path: Vec<PathSegment>,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

impl Change {
    pub fn edit(path: Vec<PathSegment>, new_value: impl Into<Value>) -> Self {
        Self {
            path,
            kind: ChangeKind::Edit {
                new_value: new_value.into(),
            },
        }
    }

    pub fn insertion(path: Vec<PathSegment>, index: usize, item: SnapshotTree) -> Self {
        Self {
            path,
            kind: ChangeKind::ArrayInsertion { index, item },
        }
    }

    pub fn deletion(path: Vec<PathSegment>, index: usize, item: SnapshotTree) -> Self {
        Self {
            path,
            kind: ChangeKind::ArrayDeletion { index, item },
        }
    }

    /// Whether any segment of the path enters the auxiliary data namespace
    pub fn touches_data(&self) -> bool {
        self.path.iter().any(|s| s.as_key() == Some(KEY_DATA))
    }

    /// Last path segment, `None` for the empty path
    pub fn terminal(&self) -> Option<&PathSegment> {
        self.path.last()
    }

    pub fn path_string(&self) -> String {
        format_path(&self.path)
    }
}

/// Ordered list of changes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript {
    changes: Vec<Change>,
}

impl EditScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn into_changes(self) -> Vec<Change> {
        self.changes
    }
}

impl From<Vec<Change>> for EditScript {
    fn from(changes: Vec<Change>) -> Self {
        Self { changes }
    }
}

impl FromIterator<Change> for EditScript {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for EditScript {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
