pub mod live_tree;
pub mod metadata;
pub mod snapshot;

pub use live_tree::{LiveNode, LiveTree, NodeContent, NodeId};
pub use metadata::Metadata;
pub use snapshot::SnapshotTree;
