//! Interaction state module.
//!
//! This module contains the transient state the controller keeps between
//! input events:
//! - `InteractionState`, deciding how the next label commit is interpreted
//! - `Direction`, the step used when moving the selection

mod interaction;
mod navigation;

pub use interaction::InteractionState;
pub use navigation::Direction;
