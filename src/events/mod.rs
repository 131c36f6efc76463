//! Event handling module.
//!
//! This module contains the handler for terminal events: key presses are
//! polled on a helper thread and applied to the session on the main loop.

pub mod terminal;
