//! Reconciliation of a live subtree with a target snapshot.
//!
//! [`reconcile`] replays an edit script through the applicator and, unless
//! disabled, checks that the subtree now projects to the target. The update
//! operation answers any [`ReconcileFailure`] with
//! [`fallback::replace_children`].

pub mod apply;
pub mod fallback;
pub mod resolve;

pub use apply::{apply_edit_script, ApplyStats};
pub use fallback::replace_children;
pub use resolve::resolve;

use crate::diff::EditScript;
use crate::document::LiveDocument;
use crate::errors::ReconcileFailure;
use crate::model::{NodeId, SnapshotTree};

/// Apply `script` to `root`, then optionally verify the result equals `target`
///
/// # Errors
///
/// Any applicator failure, or `Diverged` when verification is on and the
/// subtree does not project to `target` afterwards.
pub fn reconcile<D: LiveDocument + ?Sized>(
    doc: &mut D,
    root: NodeId,
    target: &SnapshotTree,
    script: &EditScript,
    verify: bool,
) -> Result<ApplyStats, ReconcileFailure> {
    let stats = apply_edit_script(doc, root, script)?;
    if verify && doc.value_of(root)? != *target {
        return Err(ReconcileFailure::Diverged);
    }
    Ok(stats)
}
