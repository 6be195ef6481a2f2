//! Edit applicator
//!
//! Replays an [`EditScript`] against a live subtree, mutating nodes in place
//! so that everything the script does not touch keeps its identity.
//!
//! ## Ordering contract
//!
//! - Deletions are staged while scanning and committed after the last
//!   change, so indices in later changes still see the deleted children.
//! - Paths are resolved when their change is applied, against the tree as
//!   earlier changes left it.
//! - Any inconsistency aborts with a [`ReconcileFailure`]; the tree may be
//!   partially edited at that point and the caller is expected to fall back.

use serde_json::Value;

use super::resolve::resolve;
use crate::diff::model::{
    format_path, Change, ChangeKind, EditScript, PathSegment, KEY_TYPE, KEY_VALUE,
};
use crate::document::LiveDocument;
use crate::errors::ReconcileFailure;
use crate::model::{NodeId, SnapshotTree};

/// Counts of what an applied script did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Text values set in place
    pub edited: usize,
    /// Nodes rebuilt under a new type
    pub retyped: usize,
    pub inserted: usize,
    pub deleted: usize,
    /// Changes ignored because they address auxiliary data
    pub skipped: usize,
}

impl ApplyStats {
    /// Changes that mutated the tree
    pub fn applied(&self) -> usize {
        self.edited + self.retyped + self.inserted + self.deleted
    }
}

/// Apply `script` to the subtree rooted at `root`
///
/// # Errors
///
/// Returns the first inconsistency met: an unresolvable path, a change the
/// applicator does not interpret, a non-string edit value, a type edit on
/// `root`, a node staged for deletion twice, or a rejected tree operation.
pub fn apply_edit_script<D: LiveDocument + ?Sized>(
    doc: &mut D,
    root: NodeId,
    script: &EditScript,
) -> Result<ApplyStats, ReconcileFailure> {
    let mut stats = ApplyStats::default();
    let mut staged: Vec<NodeId> = Vec::new();

    for change in script {
        if change.touches_data() {
            stats.skipped += 1;
            continue;
        }

        match &change.kind {
            ChangeKind::ArrayDeletion { index, .. } => {
                let container = resolve(doc, root, &change.path)?;
                let node = doc.child_at(container, *index)?;
                if staged.contains(&node) {
                    return Err(ReconcileFailure::DuplicateDeletion { node_id: node });
                }
                staged.push(node);
            }
            ChangeKind::ArrayInsertion { index, item } => {
                let container = resolve(doc, root, &change.path)?;
                insert_child(doc, container, *index, item)?;
                stats.inserted += 1;
            }
            ChangeKind::Edit { new_value } => {
                apply_edit(doc, root, change, new_value, &mut stats)?;
            }
        }
    }

    for node in &staged {
        doc.remove(*node)?;
    }
    stats.deleted = staged.len();

    Ok(stats)
}

fn insert_child<D: LiveDocument + ?Sized>(
    doc: &mut D,
    container: NodeId,
    index: usize,
    item: &SnapshotTree,
) -> Result<(), ReconcileFailure> {
    // Anchor is looked up before building so a bad index leaves no orphan
    let anchor = match index.checked_sub(1) {
        Some(previous) => Some(doc.child_at(container, previous)?),
        None => None,
    };

    let node = doc.build(item);
    let linked = match anchor {
        Some(anchor) => doc.insert_after(anchor, node),
        None => doc.prepend_child(container, node),
    };
    if let Err(err) = linked {
        let _ = doc.remove(node);
        return Err(err.into());
    }
    Ok(())
}

fn apply_edit<D: LiveDocument + ?Sized>(
    doc: &mut D,
    root: NodeId,
    change: &Change,
    new_value: &Value,
    stats: &mut ApplyStats,
) -> Result<(), ReconcileFailure> {
    let Some(PathSegment::Key(field)) = change.terminal() else {
        return Err(ReconcileFailure::UnsupportedChange {
            path: format_path(&change.path),
        });
    };
    if field != KEY_VALUE && field != KEY_TYPE {
        return Err(ReconcileFailure::UnsupportedChange {
            path: format_path(&change.path),
        });
    }
    let Some(value) = new_value.as_str() else {
        return Err(ReconcileFailure::InvalidValue {
            path: format_path(&change.path),
        });
    };

    let node = resolve(doc, root, &change.path)?;
    if field == KEY_VALUE {
        doc.set_text(node, value)?;
        stats.edited += 1;
        return Ok(());
    }

    if node == root {
        return Err(ReconcileFailure::RetypeRoot);
    }
    let retyped = doc.value_of(node)?.retyped(value);
    let fresh = doc.build(&retyped);
    if let Err(err) = doc.replace(node, fresh) {
        let _ = doc.remove(fresh);
        return Err(err.into());
    }
    stats.retyped += 1;
    Ok(())
}
