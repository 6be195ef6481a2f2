use crate::diff::model::{format_path, PathSegment, KEY_CHILDREN, KEY_VALUE};
use crate::document::LiveDocument;
use crate::errors::ReconcileFailure;
use crate::model::NodeId;

/// Walk a change path from `root` to the live node it addresses
///
/// Wrapper keys (`children`, `value`) are stepped over, indices descend into
/// the matching child, and the final segment is left for the caller to
/// interpret: it names the field or sequence the change acts on.
///
/// # Errors
///
/// `Unresolved` for an index past the end of a container, an index into a
/// node without children, or an unknown key before the final segment.
pub fn resolve<D: LiveDocument + ?Sized>(
    doc: &D,
    root: NodeId,
    path: &[PathSegment],
) -> Result<NodeId, ReconcileFailure> {
    let mut current = root;
    let mut rest = path;

    while let [segment, tail @ ..] = rest {
        if tail.is_empty() {
            break;
        }
        match segment {
            PathSegment::Key(key) if key == KEY_CHILDREN || key == KEY_VALUE => {}
            PathSegment::Index(index) => {
                current = doc
                    .child_at(current, *index)
                    .map_err(|err| unresolved(path, err.to_string()))?;
            }
            PathSegment::Key(key) => {
                return Err(unresolved(path, format!("unexpected key `{}`", key)));
            }
        }
        rest = tail;
    }

    Ok(current)
}

fn unresolved(path: &[PathSegment], reason: String) -> ReconcileFailure {
    ReconcileFailure::Unresolved {
        path: format_path(path),
        reason,
    }
}
