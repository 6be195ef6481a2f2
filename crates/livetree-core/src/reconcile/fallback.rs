use crate::document::LiveDocument;
use crate::errors::Result;
use crate::model::{NodeId, SnapshotTree};

/// Rebuild every child of `root` from `snapshot`
///
/// The root keeps its identity and its auxiliary data; all of its former
/// descendants are dropped. Used when an edit script could not be applied
/// consistently, so it only relies on operations that cannot disagree with
/// the snapshot.
///
/// # Errors
///
/// `NotParent` if `root` or `snapshot` is not a container, plus whatever the
/// document reports for a stale `root`. Both are detected before the old
/// children are touched.
pub fn replace_children<D: LiveDocument + ?Sized>(
    doc: &mut D,
    root: NodeId,
    snapshot: &SnapshotTree,
) -> Result<()> {
    let old_children = doc.children(root)?.to_vec();

    let fresh = doc.build(snapshot);
    if let Err(err) = doc.children(fresh).map(|_| ()) {
        doc.remove(fresh)?;
        return Err(err);
    }

    for child in old_children {
        doc.remove(child)?;
    }
    let moved = move_children(doc, fresh, root);
    doc.remove(fresh)?;
    moved
}

fn move_children<D: LiveDocument + ?Sized>(doc: &mut D, from: NodeId, to: NodeId) -> Result<()> {
    for child in doc.children(from)?.to_vec() {
        doc.detach(child)?;
        doc.append_child(to, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::LatinGrammar;
    use crate::model::LiveTree;

    #[test]
    fn test_root_identity_and_data_survive() {
        let (mut tree, root) = LiveTree::from_snapshot(&LatinGrammar::parse_sentence("Old text"));
        tree.data_mut(root).unwrap().set("bound", true);
        let old_children = tree.children(root).unwrap().to_vec();

        let target = LatinGrammar::parse_sentence("Brand new text!");
        replace_children(&mut tree, root, &target).unwrap();

        assert_eq!(tree.value_of(root).unwrap(), target);
        assert_eq!(tree.data(root).unwrap().get("bound"), Some(&serde_json::json!(true)));
        assert!(old_children.iter().all(|c| !tree.contains(*c)));
        // Old children, the fresh scaffold and nothing else are gone
        assert_eq!(tree.len(), target.node_count());
    }

    #[test]
    fn test_clear_to_empty() {
        let (mut tree, root) = LiveTree::from_snapshot(&LatinGrammar::parse_sentence("Old text"));

        replace_children(&mut tree, root, &LatinGrammar::parse_sentence("")).unwrap();

        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_text_snapshot_is_rejected_before_clearing() {
        let (mut tree, root) = LiveTree::from_snapshot(&LatinGrammar::parse_sentence("Old words"));
        let before = tree.value_of(root).unwrap();
        let old_children = tree.children(root).unwrap().to_vec();
        let len = tree.len();

        let err = replace_children(&mut tree, root, &SnapshotTree::text("SentenceNode", "x"))
            .unwrap_err();

        assert!(matches!(err, crate::errors::LiveError::NotParent { .. }));
        assert_eq!(tree.children(root).unwrap(), &old_children[..]);
        assert_eq!(tree.value_of(root).unwrap(), before);
        // No orphaned scaffold left behind
        assert_eq!(tree.len(), len);
    }

    #[test]
    fn test_text_root_is_rejected() {
        let mut tree = LiveTree::new();
        let word = tree.create_text("TextNode", "a");

        let err = replace_children(&mut tree, word, &LatinGrammar::parse_sentence("b")).unwrap_err();

        assert!(matches!(err, crate::errors::LiveError::NotParent { .. }));
        assert_eq!(tree.text(word).unwrap(), "a");
        assert_eq!(tree.len(), 1);
    }
}
