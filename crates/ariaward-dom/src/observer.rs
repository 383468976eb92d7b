//! Child-list mutation observation.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Identifier of an observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(pub(crate) u64);

/// One child-list change, as delivered to an observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// The parent whose child list changed.
    pub target: NodeId,
    /// Nodes inserted into `target`.
    pub added_nodes: Vec<NodeId>,
    /// Nodes removed from `target`.
    pub removed_nodes: Vec<NodeId>,
}

impl MutationRecord {
    pub(crate) fn added(target: NodeId, node: NodeId) -> Self {
        Self {
            target,
            added_nodes: vec![node],
            removed_nodes: Vec::new(),
        }
    }

    pub(crate) fn removed(target: NodeId, node: NodeId) -> Self {
        Self {
            target,
            added_nodes: Vec::new(),
            removed_nodes: vec![node],
        }
    }
}

/// A subtree-wide observer and its undelivered records.
#[derive(Debug)]
pub(crate) struct Registration {
    pub(crate) id: ObserverId,
    pub(crate) target: NodeId,
    pub(crate) queue: Vec<MutationRecord>,
}
