//! Editing session of the terminal front end.
//!
//! A terminal has no text inputs of its own, so the session keeps the text
//! typed into the open label field and mirrors it onto the surface. Key
//! presses outside of editing are forwarded to the controller as key codes.

use crate::controller::keys::{KeyAction, KeyCodeValue};
use crate::controller::Controller;
use crate::error::AppResult;
use crate::store::PersistenceStore;
use crate::surface::{Handle, MemorySurface, Surface};
use log::*;

/// Couples a controller with the text of the field being edited.
///
pub struct Session<P: PersistenceStore> {
    controller: Controller<MemorySurface, P>,
    input: String,
    editing: Option<Handle>,
}

impl<P: PersistenceStore> Session<P> {
    pub fn new(controller: Controller<MemorySurface, P>) -> Self {
        let mut session = Session {
            controller,
            input: String::new(),
            editing: None,
        };
        session.sync_input();
        session
    }

    pub fn controller(&self) -> &Controller<MemorySurface, P> {
        &self.controller
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Press the given key codes in order, as one chord, then release them
    /// in reverse order.
    ///
    pub fn press(&mut self, codes: &[KeyCodeValue]) -> AppResult<Option<KeyAction>> {
        let mut outcome = Ok(None);
        for code in codes {
            match self.controller.dispatch_key(*code) {
                Ok(Some(action)) => outcome = Ok(Some(action)),
                Ok(None) => {}
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        for code in codes.iter().rev() {
            self.controller.release_key(*code);
        }
        self.finish();
        outcome
    }

    pub fn type_char(&mut self, c: char) {
        if self.editing.is_some() {
            self.input.push(c);
            self.mirror_input();
        }
    }

    pub fn backspace(&mut self) {
        if self.editing.is_some() {
            self.input.pop();
            self.mirror_input();
        }
    }

    /// Commit the typed text. Blank text keeps the field open.
    ///
    pub fn submit(&mut self) -> AppResult<bool> {
        let result = self.controller.commit_pending(&self.input);
        self.finish();
        result
    }

    pub fn cancel(&mut self) {
        self.controller.cancel_edit();
        self.finish();
    }

    /// Rename the selected node, as a double click on its label would.
    ///
    pub fn rename_selected(&mut self) -> AppResult<bool> {
        let done = match self.controller.selected() {
            Some(handle) => self.controller.begin_modify(handle).map(|_| true)?,
            None => false,
        };
        self.finish();
        Ok(done)
    }

    /// Start a child under the selected node, as its add button would.
    ///
    pub fn add_child_selected(&mut self) -> AppResult<bool> {
        let done = match self.controller.selected() {
            Some(handle) => self.controller.add_child(handle).map(|_| true)?,
            None => false,
        };
        self.finish();
        Ok(done)
    }

    pub fn toggle_fold_selected(&mut self) -> Option<bool> {
        let handle = self.controller.selected()?;
        self.controller.toggle_fold(handle)
    }

    fn finish(&mut self) {
        self.sync_input();
        self.controller.settle();
    }

    /// Follow the controller's open field: load its text when a different
    /// field opens, forget it when editing ends.
    ///
    fn sync_input(&mut self) {
        match self.controller.pending() {
            Some(context) if self.editing != Some(context.handle) => {
                self.input = self
                    .controller
                    .surface()
                    .item(context.handle)
                    .map(|attrs| attrs.value.clone())
                    .unwrap_or_default();
                self.editing = Some(context.handle);
                debug!("Editing field of node {}", context.id);
            }
            Some(_) => {}
            None => {
                self.input.clear();
                self.editing = None;
            }
        }
    }

    fn mirror_input(&mut self) {
        if let Some(handle) = self.editing {
            let input = self.input.clone();
            self.controller.surface_mut().set_value(handle, &input);
        }
    }
}
