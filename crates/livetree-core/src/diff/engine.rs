//! Snapshot diff computation engine.
//!
//! [`SequenceDiffer`] compares child sequences with an LCS diff (`similar`)
//! and recurses into children that were paired up but differ. The emitted
//! script follows the index conventions the edit applicator relies on:
//!
//! - a deletion carries the child's index before the container changed;
//! - an insertion carries the position the new child takes when it is
//!   applied, counting children whose deletion is still pending;
//! - per container, nested changes and deletions come before insertions,
//!   and insertions are in ascending index order;
//! - a `type` edit comes before the changes nested under the same node.

use serde_json::Value;
use similar::{capture_diff_slices, Algorithm, DiffOp};

use crate::diff::model::{Change, EditScript, PathSegment, KEY_CHILDREN, KEY_TYPE, KEY_VALUE};
use crate::model::SnapshotTree;

/// Structural diff primitive
pub trait Differ {
    /// Edit script turning `old` into `new`; empty when they are equal
    fn diff(&self, old: &SnapshotTree, new: &SnapshotTree) -> EditScript;
}

impl<F> Differ for F
where
    F: Fn(&SnapshotTree, &SnapshotTree) -> EditScript,
{
    fn diff(&self, old: &SnapshotTree, new: &SnapshotTree) -> EditScript {
        self(old, new)
    }
}

/// Bundled differ: LCS over children, positional pairing inside replaced runs
#[derive(Debug, Clone, Copy)]
pub struct SequenceDiffer {
    algorithm: Algorithm,
}

impl Default for SequenceDiffer {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Myers,
        }
    }
}

impl SequenceDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different sequence diff algorithm (Myers by default)
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    fn diff_node(
        &self,
        old: &SnapshotTree,
        new: &SnapshotTree,
        path: &mut Vec<PathSegment>,
        out: &mut Vec<Change>,
    ) {
        if old == new {
            return;
        }

        match (old, new) {
            (
                SnapshotTree::Text {
                    node_type: old_type,
                    value: old_value,
                },
                SnapshotTree::Text {
                    node_type: new_type,
                    value: new_value,
                },
            ) => {
                if old_type != new_type {
                    out.push(Change::edit(with_key(path, KEY_TYPE), new_type.as_str()));
                }
                if old_value != new_value {
                    out.push(Change::edit(with_key(path, KEY_VALUE), new_value.as_str()));
                }
            }
            (
                SnapshotTree::Parent {
                    node_type: old_type,
                    children: old_children,
                },
                SnapshotTree::Parent {
                    node_type: new_type,
                    children: new_children,
                },
            ) => {
                if old_type != new_type {
                    out.push(Change::edit(with_key(path, KEY_TYPE), new_type.as_str()));
                }
                self.diff_children(old_children, new_children, path, out);
            }
            // Only reachable for the top-level pair; children of differing
            // shape are swapped by deletion and insertion instead.
            _ => out.push(Change::edit(
                path.clone(),
                serde_json::to_value(new).unwrap_or(Value::Null),
            )),
        }
    }

    fn diff_children(
        &self,
        old: &[SnapshotTree],
        new: &[SnapshotTree],
        path: &mut Vec<PathSegment>,
        out: &mut Vec<Change>,
    ) {
        let container = with_key(path, KEY_CHILDREN);
        let mut nested = Vec::new();
        let mut deletions = Vec::new();
        let mut insertions = Vec::new();
        // Position in the live sequence, where pending deletions still count
        let mut cursor = 0;

        for op in capture_diff_slices(self.algorithm, old, new) {
            match op {
                DiffOp::Equal { len, .. } => cursor += len,
                DiffOp::Delete {
                    old_index, old_len, ..
                } => {
                    for k in old_index..old_index + old_len {
                        deletions.push(Change::deletion(container.clone(), k, old[k].clone()));
                    }
                    cursor += old_len;
                }
                DiffOp::Insert {
                    new_index, new_len, ..
                } => {
                    for item in &new[new_index..new_index + new_len] {
                        insertions.push(Change::insertion(container.clone(), cursor, item.clone()));
                        cursor += 1;
                    }
                }
                DiffOp::Replace {
                    old_index,
                    old_len,
                    new_index,
                    new_len,
                } => {
                    let paired = old_len.min(new_len);
                    for k in 0..paired {
                        let (o, n) = (&old[old_index + k], &new[new_index + k]);
                        if o.same_shape(n) {
                            path.push(PathSegment::key(KEY_CHILDREN));
                            path.push(PathSegment::Index(old_index + k));
                            self.diff_node(o, n, path, &mut nested);
                            path.truncate(path.len() - 2);
                            cursor += 1;
                        } else {
                            deletions.push(Change::deletion(
                                container.clone(),
                                old_index + k,
                                o.clone(),
                            ));
                            cursor += 1;
                            insertions.push(Change::insertion(container.clone(), cursor, n.clone()));
                            cursor += 1;
                        }
                    }
                    for k in old_index + paired..old_index + old_len {
                        deletions.push(Change::deletion(container.clone(), k, old[k].clone()));
                        cursor += 1;
                    }
                    for item in &new[new_index + paired..new_index + new_len] {
                        insertions.push(Change::insertion(container.clone(), cursor, item.clone()));
                        cursor += 1;
                    }
                }
            }
        }

        out.append(&mut nested);
        out.append(&mut deletions);
        out.append(&mut insertions);
    }
}

impl Differ for SequenceDiffer {
    fn diff(&self, old: &SnapshotTree, new: &SnapshotTree) -> EditScript {
        let mut out = Vec::new();
        self.diff_node(old, new, &mut Vec::new(), &mut out);
        EditScript::from(out)
    }
}

/// Diff two snapshots with the default [`SequenceDiffer`]
pub fn compute_edit_script(old: &SnapshotTree, new: &SnapshotTree) -> EditScript {
    SequenceDiffer::default().diff(old, new)
}

fn with_key(path: &[PathSegment], key: &str) -> Vec<PathSegment> {
    let mut out = Vec::with_capacity(path.len() + 1);
    out.extend_from_slice(path);
    out.push(PathSegment::key(key));
    out
}
