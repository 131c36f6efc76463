//! Surface-specific error types.

use super::Handle;

/// Errors that can occur while attaching surface elements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// Handle does not name a live element
    #[error("Unknown surface element {0:?}")]
    UnknownHandle(Handle),

    /// Reference element is not attached anywhere
    #[error("Surface element {0:?} is detached")]
    Detached(Handle),

    /// Attaching would put an element inside its own subtree
    #[error("Surface element {0:?} cannot contain itself")]
    Cycle(Handle),
}
