//! Structural diff of snapshot trees.
//!
//! Compares two [`SnapshotTree`](crate::model::SnapshotTree)s and produces an
//! [`EditScript`] the reconciler can replay against a live tree.
//!
//! ## Entry point
//!
//! ```
//! use livetree_core::diff::compute_edit_script;
//! use livetree_core::grammar::LatinGrammar;
//!
//! let old = LatinGrammar::parse_sentence("Some English");
//! let new = LatinGrammar::parse_sentence("Some English words.");
//! let script = compute_edit_script(&old, &new);
//! assert_eq!(script.len(), 3);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical scripts.
//! - **Identity fast path**: equal snapshots produce an empty script.
//! - **No data paths**: the auxiliary data namespace never appears in a path.

pub mod engine;
pub mod model;

pub use engine::{compute_edit_script, Differ, SequenceDiffer};
pub use model::{Change, ChangeKind, EditScript, PathSegment};
