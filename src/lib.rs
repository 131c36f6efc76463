//! Keyboard-driven hierarchical outline editor.
//!
//! The outline is a forest of [`tree::TreeNode`] values kept in a
//! [`schema::SchemaStore`]. A [`controller::Controller`] mirrors the forest
//! onto a [`surface::Surface`], turns key presses into edits and saves the
//! forest to a [`store::PersistenceStore`] after every change.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod logger;
pub mod schema;
pub mod session;
pub mod state;
pub mod store;
pub mod surface;
pub mod tree;
pub mod ui;
