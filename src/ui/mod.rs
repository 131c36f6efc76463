//! User interface module.
//!
//! This module handles all UI rendering using the `ratatui` library:
//! the outline view drawn from the surface, the shortcut footer and the
//! log pane.

type Frame<'a> = ratatui::Frame<'a>;

mod render;
mod widgets;

pub use render::render;
