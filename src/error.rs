//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::config::ConfigError;
pub use crate::store::StoreError;
pub use crate::surface::SurfaceError;
pub use crate::tree::{NodeId, ValidationError};

/// Main application error type.
///
/// This is the top-level error type that encompasses all error types
/// in the application. It uses `thiserror` for automatic error derivation
/// and conversion.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Node or tree invariant violations
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Key-value store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Rendering surface errors
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    /// Stored forest could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A node expected in the schema is missing
    #[error("Node {id} not found under root {root_id}")]
    NodeNotFound { id: NodeId, root_id: NodeId },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
