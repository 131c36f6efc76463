//! Outline tree model.
//!
//! This module contains the single composite node type used for every level
//! of the outline, along with the validation errors raised while building or
//! reading back a tree.

mod error;
mod node;

pub use error::ValidationError;
pub use node::{NodeId, TreeNode};
