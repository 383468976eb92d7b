//! Error types for document operations.

use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by document mutations.
///
/// Callers in the engine treat every one of these as "skip this write";
/// none of them is fatal to the host document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    /// The handle refers to a freed or reused slot.
    #[error("Stale node handle: {0}")]
    StaleNode(NodeId),

    /// The operation needs an element but got a text or document node.
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    /// The insertion would create a cycle or target a leaf.
    #[error("Hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}

/// Result type for document operations.
pub type DomResult<T> = Result<T, DomError>;
