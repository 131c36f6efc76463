//! Interaction state machine.

use crate::tree::NodeId;

/// Specifying how the next committed label is applied.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A new node is being labelled. Both ids are absent for a new root.
    Add {
        parent_id: Option<NodeId>,
        root_id: Option<NodeId>,
    },
    /// An existing node is being renamed.
    Modify { target_id: NodeId, root_id: NodeId },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }
}
