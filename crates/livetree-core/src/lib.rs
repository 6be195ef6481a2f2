//! LiveTree Core - incremental reconciliation of live document trees
//!
//! This crate keeps a mutable, identity-bearing document tree in step with
//! new content while preserving the identity (and the caller-attached
//! auxiliary data) of every node the change does not reach:
//! - Live tree arena and the node capability contract (`LiveDocument`)
//! - Structural snapshots and their JSON form
//! - Grammar seam with a bundled Latin-script tokenizer (logos)
//! - Structural diff producing edit scripts (similar)
//! - Edit-script replay with deferred deletions and full-replacement fallback
//! - The `update` operation and the `Reconciler` service
//!
//! # Example
//!
//! ```
//! use livetree_core::model::LiveTree;
//! use livetree_core::{LiveDocument, Reconciler};
//!
//! let reconciler = Reconciler::new();
//! let mut tree = LiveTree::new();
//! let root = tree.create_parent("RootNode");
//!
//! reconciler.update(&mut tree, root, "Some English").unwrap();
//! let paragraph = tree.child_at(root, 0).unwrap();
//!
//! reconciler.update(&mut tree, root, "Some English words.").unwrap();
//! assert_eq!(tree.child_at(root, 0).unwrap(), paragraph);
//! ```

pub mod diff;
pub mod document;
pub mod errors;
pub mod grammar;
pub mod logging_facility;
pub mod model;
pub mod reconcile;
pub mod update;

// Re-export commonly used types
pub use diff::{compute_edit_script, Differ, EditScript, SequenceDiffer};
pub use document::{Capability, LiveDocument};
pub use errors::{ExError, ExErrorKind, LiveError, ReconcileFailure, Result};
pub use grammar::{Grammar, GrammarTable, LatinGrammar, Tokenizer};
pub use model::{LiveTree, Metadata, NodeId, SnapshotTree};
pub use update::{update, Content, Reconciler, ReconcilerBuilder, UpdateOutcome};

pub use livetree_core_types as core_types;

// Used by the exported logging macros
#[doc(hidden)]
pub use tracing;
