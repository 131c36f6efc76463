//! Outline controller.
//!
//! The controller owns the schema, the id counter, the interaction state
//! and the navigation cache of one rendered outline. It turns gestures into
//! model mutations, mirrors them onto the surface and saves the forest
//! after every committed change.

pub mod keys;

#[cfg(test)]
mod tests;

use crate::error::{AppError, AppResult};
use crate::schema::{SchemaStore, INITIAL_ID};
use crate::state::{Direction, InteractionState};
use crate::store::PersistenceStore;
use crate::surface::{Element, Handle, ItemAttrs, Selector, Surface, SurfaceError};
use crate::tree::{NodeId, TreeNode, ValidationError};
use keys::{HeldKeys, KeyAction, KeyAlias, KeyCodeValue};
use log::*;
use std::collections::HashMap;

/// Editable label field opened by a placeholder or a rename.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingContext {
    pub handle: Handle,
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub root_id: Option<NodeId>,
}

/// Item built during a render pass, waiting to be attached. `slot` holds
/// the child list it goes into and the item owning that list.
///
struct BuiltItem {
    item: Handle,
    slot: Option<(Handle, Handle)>,
}

/// Keeps one outline's model, surface and store in step.
///
pub struct Controller<S: Surface, P: PersistenceStore> {
    surface: S,
    store: P,
    storage_key: String,
    schema: SchemaStore,
    next_id: NodeId,
    state: InteractionState,
    pending: Option<PendingContext>,
    handles: Vec<Handle>,
    offset: Option<usize>,
    held: HeldKeys,
    refresh_scheduled: bool,
    advance_scheduled: bool,
}

impl<S: Surface, P: PersistenceStore> Controller<S, P> {
    /// Return a new controller drawing onto an emptied `surface` and saving
    /// under `storage_key` in `store`.
    ///
    pub fn new(mut surface: S, store: P, storage_key: impl Into<String>) -> Self {
        surface.clear();
        Controller {
            surface,
            store,
            storage_key: storage_key.into(),
            schema: SchemaStore::new(),
            next_id: INITIAL_ID,
            state: InteractionState::Idle,
            pending: None,
            handles: vec![],
            offset: None,
            held: HeldKeys::default(),
            refresh_scheduled: false,
            advance_scheduled: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable surface access for hosts mirroring typed text into the open
    /// label field.
    ///
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn schema(&self) -> &SchemaStore {
        &self.schema
    }

    pub fn forest(&self) -> &[TreeNode] {
        self.schema.roots()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn pending(&self) -> Option<PendingContext> {
        self.pending
    }

    pub fn next_id(&self) -> NodeId {
        self.next_id
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn selected(&self) -> Option<Handle> {
        self.offset.and_then(|offset| self.handles.get(offset).copied())
    }

    /// Load the forest saved under the storage key and render it. An empty
    /// store renders an empty outline.
    ///
    pub fn restore(&mut self) -> AppResult<()> {
        let forest: Vec<TreeNode> = match self.store.get(&self.storage_key)? {
            Some(value) => serde_json::from_value(value)?,
            None => vec![],
        };
        for root in &forest {
            if let Some(parent) = root.parent_id() {
                return Err(ValidationError::ForeignChild {
                    parent,
                    child: root.id(),
                }
                .into());
            }
            root.validate()?;
        }
        info!("Restored outline with {} roots", forest.len());
        self.render(Some(forest))
    }

    /// Build an editable placeholder for a node that does not exist yet,
    /// under the item of `parent_id` or at the top level. The placeholder
    /// becomes a node only once a label is committed for it.
    ///
    pub fn create_placeholder(
        &mut self,
        parent_id: Option<NodeId>,
        root_id: Option<NodeId>,
    ) -> AppResult<PendingContext> {
        let id = self.next_id;
        let next_id = id
            .checked_add(1)
            .ok_or(ValidationError::IdsExhausted(id))?;
        let container = match parent_id {
            Some(parent) => {
                let owner = self
                    .item_handle(parent)
                    .ok_or(AppError::NodeNotFound {
                        id: parent,
                        root_id: root_id.unwrap_or(parent),
                    })?;
                let list = self.child_list(owner)?;
                if self.surface.is_folded(list) {
                    self.surface.toggle_fold(list);
                }
                Some(list)
            }
            None => None,
        };

        let item = self
            .surface
            .build(Element::Item(ItemAttrs::placeholder(id, parent_id, root_id)));
        self.surface.append(container, item)?;
        self.surface.focus(item);
        self.schedule_refresh();
        self.next_id = next_id;

        let context = PendingContext {
            handle: item,
            id,
            parent_id,
            root_id,
        };
        self.pending = Some(context);
        debug!("Created placeholder {} under {:?}", id, parent_id);
        Ok(context)
    }

    /// Start adding a child below the node rendered at `handle`.
    ///
    pub fn add_child(&mut self, handle: Handle) -> AppResult<PendingContext> {
        let attrs = self.committed_item(handle)?;
        self.start_add(Some(attrs.id), Some(attrs.root_id))
    }

    /// Start adding a new top-level node.
    ///
    pub fn new_root(&mut self) -> AppResult<PendingContext> {
        self.start_add(None, None)
    }

    fn start_add(
        &mut self,
        parent_id: Option<NodeId>,
        root_id: Option<NodeId>,
    ) -> AppResult<PendingContext> {
        self.abandon_pending();
        self.state = InteractionState::Add { parent_id, root_id };
        let result = self.create_placeholder(parent_id, root_id);
        if result.is_err() {
            self.reset_interaction();
        }
        result
    }

    /// Start renaming the node rendered at `handle`.
    ///
    pub fn begin_modify(&mut self, handle: Handle) -> AppResult<PendingContext> {
        let attrs = self.committed_item(handle)?;
        self.abandon_pending();
        self.state = InteractionState::Modify {
            target_id: attrs.id,
            root_id: attrs.root_id,
        };
        self.surface.set_read_only(handle, false);
        self.surface.focus(handle);

        let context = PendingContext {
            handle,
            id: attrs.id,
            parent_id: attrs.parent_id,
            root_id: Some(attrs.root_id),
        };
        self.pending = Some(context);
        debug!("Renaming node {}", attrs.id);
        Ok(context)
    }

    /// Apply a label typed into the field of `context` according to the
    /// current interaction state. Returns false when nothing was committed:
    /// blank text, or `context` is not the field currently open.
    ///
    pub fn commit_label(&mut self, context: PendingContext, raw_text: &str) -> AppResult<bool> {
        let title = raw_text.trim();
        if title.is_empty() {
            return Ok(false);
        }
        if self.state.is_idle() || self.pending != Some(context) {
            warn!("Ignoring label for node {}: its field is not open", context.id);
            return Ok(false);
        }

        match self.state {
            InteractionState::Idle => return Ok(false),
            InteractionState::Add { .. } => match context.parent_id {
                None => {
                    let root = TreeNode::new(title, context.id, None, None)?;
                    self.schema.register(root);
                }
                Some(parent_id) => {
                    let root_id = context.root_id.unwrap_or(parent_id);
                    let child = TreeNode::new(title, context.id, Some(root_id), Some(parent_id))?;
                    match self.schema.find_mut(context.id, root_id, Some(parent_id)) {
                        Some(parent) => {
                            parent.add(child)?;
                        }
                        None => {
                            self.reset_interaction();
                            return Err(AppError::NodeNotFound {
                                id: parent_id,
                                root_id,
                            });
                        }
                    }
                }
            },
            InteractionState::Modify { target_id, root_id } => {
                match self.schema.find_mut(target_id, root_id, None) {
                    Some(node) => node.set_title(title)?,
                    None => {
                        self.reset_interaction();
                        return Err(AppError::NodeNotFound {
                            id: target_id,
                            root_id,
                        });
                    }
                }
            }
        }

        self.surface.set_value(context.handle, title);
        self.surface.set_read_only(context.handle, true);
        self.reset_interaction();
        self.persist();
        self.schedule_refresh();
        self.advance_scheduled = true;
        info!("Committed node {} '{}'", context.id, title);
        Ok(true)
    }

    /// Commit the field currently open for editing, if any.
    ///
    pub fn commit_pending(&mut self, raw_text: &str) -> AppResult<bool> {
        match self.pending {
            Some(context) => self.commit_label(context, raw_text),
            None => Ok(false),
        }
    }

    /// Drop the add or rename in progress and return to idle.
    ///
    pub fn cancel_edit(&mut self) {
        self.abandon_pending();
        self.state = InteractionState::Idle;
    }

    /// Redraw the whole outline. A supplied forest replaces the schema and
    /// resets the id counter past its largest id; otherwise the current
    /// schema is redrawn.
    ///
    pub fn render(&mut self, forest: Option<Vec<TreeNode>>) -> AppResult<()> {
        if let Some(forest) = forest {
            self.next_id = self.schema.rebuild_from_forest(forest)?;
        }
        self.reset_interaction();
        self.offset = None;
        self.advance_scheduled = false;
        self.surface.clear();

        let mut built = vec![];
        for root in self.schema.roots() {
            build_subtree(&mut self.surface, root, None, &mut built);
        }

        // Last item attached to each container, top level included.
        let mut last_attached: HashMap<Option<Handle>, Handle> = HashMap::new();
        for BuiltItem { item, slot } in built {
            let container = slot.map(|(list, _)| list);
            match last_attached.insert(container, item) {
                Some(previous) => self.surface.insert_after(item, previous)?,
                None => {
                    self.surface.append(container, item)?;
                    if let Some((list, owner)) = slot {
                        self.surface.append(Some(owner), list)?;
                    }
                }
            }
        }

        self.refresh_handles();
        self.persist();
        debug!("Rendered {} items", self.handles.len());
        Ok(())
    }

    /// Fold or unfold the children of the item at `handle`. Returns the new
    /// fold flag, or `None` when the item has no child list. Folded items
    /// leave the navigation order; a selection folded away moves to `handle`.
    ///
    pub fn toggle_fold(&mut self, handle: Handle) -> Option<bool> {
        let list = self.direct_child_list(handle)?;
        let folded = self.surface.toggle_fold(list)?;

        let hidden = self.selected().filter(|selected| self.is_hidden(*selected));
        if let Some(selected) = hidden {
            self.surface.set_selected(selected, false);
            self.offset = None;
        }
        self.refresh_handles();
        if hidden.is_some() {
            self.offset = self.handles.iter().position(|h| *h == handle);
            self.surface.set_selected(handle, true);
        }
        Some(folded)
    }

    /// Move the selection one item up or down, wrapping at both ends.
    /// Returns the newly selected handle; nothing moves with fewer than two
    /// items.
    ///
    pub fn navigate(&mut self, direction: Direction) -> Option<Handle> {
        let len = self.handles.len();
        if len < 2 {
            return None;
        }
        let next = match self.offset {
            Some(offset) if offset < len => direction.step(offset, len),
            _ => direction.entry(len),
        };
        if let Some(previous) = self.selected() {
            self.surface.set_selected(previous, false);
        }
        let handle = self.handles[next];
        self.surface.set_selected(handle, true);
        self.offset = Some(next);
        Some(handle)
    }

    /// Remove the item at `handle` from the model, the surface and the
    /// navigation cache. Returns whether the model held a node for it;
    /// uncommitted placeholders are only dropped from the surface.
    ///
    pub fn remove_node(&mut self, handle: Handle) -> AppResult<bool> {
        let attrs = self
            .surface
            .item(handle)
            .cloned()
            .ok_or(SurfaceError::UnknownHandle(handle))?;

        let removed = match attrs.parent_id {
            None => self.schema.unregister(attrs.id),
            Some(parent_id) => self
                .schema
                .find_mut(attrs.id, attrs.root_id, Some(parent_id))
                .and_then(|parent| parent.remove(attrs.id)),
        };

        self.surface.remove(handle);
        if let Some(context) = self.pending {
            if self.surface.item(context.handle).is_none() {
                self.reset_interaction();
            }
        }
        self.refresh_handles();
        self.persist();
        info!("Removed node {} ({} remaining items)", attrs.id, self.handles.len());
        Ok(removed.is_some())
    }

    /// Handle a key going down. Returns the action that was carried out,
    /// if the key (or chord) meant anything and applied to the outline.
    ///
    pub fn dispatch_key(&mut self, code: KeyCodeValue) -> AppResult<Option<KeyAction>> {
        if !self.held.press(code) {
            return Ok(None);
        }
        let Some(alias) = KeyAlias::from_code(code) else {
            return Ok(None);
        };
        let Some(action) = self.held.resolve(alias) else {
            return Ok(None);
        };
        debug!("Key '{}' resolved to {:?}", alias.name(), action);

        let done = match action {
            KeyAction::Rename => match self.selected() {
                Some(handle) => self.begin_modify(handle).map(|_| true)?,
                None => false,
            },
            KeyAction::Remove => match self.selected() {
                Some(handle) => {
                    self.remove_node(handle)?;
                    true
                }
                None => false,
            },
            KeyAction::AddChild => match self.selected() {
                Some(handle) => self.add_child(handle).map(|_| true)?,
                None => false,
            },
            KeyAction::NavigatePrev => self.navigate(Direction::Prev).is_some(),
            KeyAction::NavigateNext => self.navigate(Direction::Next).is_some(),
            KeyAction::NewRoot => self.new_root().map(|_| true)?,
        };
        Ok(done.then_some(action))
    }

    /// Handle a key going up.
    ///
    pub fn release_key(&mut self, code: KeyCodeValue) {
        self.held.release(code);
    }

    /// Run the navigation cache refresh requested since the last call, once,
    /// however many mutations requested it. A commit since the last call
    /// then moves the selection one item forward.
    ///
    pub fn settle(&mut self) {
        if self.refresh_scheduled {
            self.refresh_handles();
        }
        if std::mem::take(&mut self.advance_scheduled) {
            self.navigate(Direction::Next);
        }
    }

    fn schedule_refresh(&mut self) {
        self.refresh_scheduled = true;
    }

    /// Rebuild the navigation cache from the items not folded away, keeping
    /// the selected item selected when it survived and clamping the offset
    /// otherwise.
    ///
    fn refresh_handles(&mut self) {
        let selected = self.selected();
        let previous_offset = self.offset;
        let handles: Vec<Handle> = self
            .surface
            .query(Selector::Item, None)
            .into_iter()
            .filter(|handle| !self.is_hidden(*handle))
            .collect();
        self.handles = handles;
        self.refresh_scheduled = false;

        let kept = selected.and_then(|h| self.handles.iter().position(|x| *x == h));
        self.offset = match (kept, previous_offset) {
            (Some(offset), _) => Some(offset),
            (None, Some(_)) if self.handles.is_empty() => None,
            (None, Some(offset)) => Some(offset.min(self.handles.len() - 1)),
            (None, None) => None,
        };
        if let Some(handle) = self.selected() {
            self.surface.set_selected(handle, true);
        }
    }

    /// Save the forest under the storage key. Failures are logged only.
    ///
    fn persist(&mut self) {
        let value = match serde_json::to_value(self.schema.roots()) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to serialize outline: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.storage_key, value) {
            warn!("Failed to persist outline: {}", e);
        }
    }

    fn reset_interaction(&mut self) {
        self.state = InteractionState::Idle;
        self.pending = None;
    }

    /// Undo the visible side of an unfinished add or rename: an added
    /// placeholder disappears, a renamed field gets its title back.
    ///
    fn abandon_pending(&mut self) {
        let Some(context) = self.pending.take() else {
            return;
        };
        match self.state {
            InteractionState::Add { .. } => {
                debug!("Discarding placeholder {}", context.id);
                self.surface.remove(context.handle);
                self.schedule_refresh();
            }
            InteractionState::Modify { target_id, root_id } => {
                if let Some(node) = self.schema.find(target_id, root_id, None) {
                    let title = node.title().to_string();
                    self.surface.set_value(context.handle, &title);
                }
                self.surface.set_read_only(context.handle, true);
            }
            InteractionState::Idle => {}
        }
    }

    /// Attributes of the item at `handle`, which must stand for a node
    /// present in the schema.
    ///
    fn committed_item(&self, handle: Handle) -> AppResult<ItemAttrs> {
        let attrs = self
            .surface
            .item(handle)
            .cloned()
            .ok_or(SurfaceError::UnknownHandle(handle))?;
        if self.schema.find(attrs.id, attrs.root_id, None).is_none() {
            return Err(AppError::NodeNotFound {
                id: attrs.id,
                root_id: attrs.root_id,
            });
        }
        Ok(attrs)
    }

    /// Whether some list above `handle` is folded.
    ///
    fn is_hidden(&self, handle: Handle) -> bool {
        let mut cursor = self.surface.parent(handle);
        while let Some(current) = cursor {
            if self.surface.is_folded(current) {
                return true;
            }
            cursor = self.surface.parent(current);
        }
        false
    }

    fn item_handle(&self, id: NodeId) -> Option<Handle> {
        self.surface
            .query(Selector::Item, None)
            .into_iter()
            .find(|h| self.surface.item(*h).map_or(false, |attrs| attrs.id == id))
    }

    fn direct_child_list(&self, owner: Handle) -> Option<Handle> {
        self.surface
            .query(Selector::List, Some(owner))
            .into_iter()
            .find(|list| self.surface.parent(*list) == Some(owner))
    }

    /// Child list of `owner`, built and attached on first use.
    ///
    fn child_list(&mut self, owner: Handle) -> AppResult<Handle> {
        if let Some(list) = self.direct_child_list(owner) {
            return Ok(list);
        }
        let list = self.surface.build(Element::List);
        self.surface.append(Some(owner), list)?;
        Ok(list)
    }
}

/// Build the items of `node`'s subtree depth-first without attaching them,
/// recording where each one belongs.
///
fn build_subtree<S: Surface>(
    surface: &mut S,
    node: &TreeNode,
    slot: Option<(Handle, Handle)>,
    built: &mut Vec<BuiltItem>,
) {
    let item = surface.build(Element::Item(ItemAttrs::committed(
        node.id(),
        node.parent_id(),
        node.root_id(),
        node.title(),
    )));
    built.push(BuiltItem { item, slot });

    if !node.children().is_empty() {
        let list = surface.build(Element::List);
        for child in node.children() {
            build_subtree(surface, child, Some((list, item)), built);
        }
    }
}
