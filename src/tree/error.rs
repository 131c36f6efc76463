//! Tree validation error types.

use super::NodeId;

/// Errors raised when a node or a tree would break one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Node titles must never be empty
    #[error("Node title must not be empty")]
    EmptyTitle,

    /// Child does not point back at the node it is being added to
    #[error("Node {child} does not belong under node {parent}")]
    ForeignChild { parent: NodeId, child: NodeId },

    /// Node root reference does not match its top-level ancestor
    #[error("Node {id} has root {found} but belongs to root {expected}")]
    BrokenRoot {
        id: NodeId,
        expected: NodeId,
        found: NodeId,
    },

    /// Two nodes of one forest share an id
    #[error("Node id {0} is used more than once")]
    DuplicateId(NodeId),

    /// No id is left to allocate after the given one
    #[error("No node ids left after {0}")]
    IdsExhausted(NodeId),
}
