//! Rendering surface abstraction.
//!
//! The controller never touches concrete elements. It asks a [`Surface`] to
//! build items and child lists, attach them, and flip their presentation
//! flags, and it refers to what was built only through opaque [`Handle`]s.

mod error;
mod memory;

pub use error::SurfaceError;
pub use memory::{MemorySurface, VisibleItem};

use crate::tree::NodeId;

/// Opaque reference to an element built by a surface.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    pub fn new(raw: u64) -> Handle {
        Handle(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Data carried by a rendered outline item: the node it stands for and the
/// state of its editable label field.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAttrs {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub root_id: NodeId,
    pub value: String,
    pub read_only: bool,
    pub selected: bool,
}

impl ItemAttrs {
    /// Attributes of a fresh, editable placeholder.
    ///
    pub fn placeholder(id: NodeId, parent_id: Option<NodeId>, root_id: Option<NodeId>) -> Self {
        ItemAttrs {
            id,
            parent_id,
            root_id: root_id.unwrap_or(id),
            value: String::new(),
            read_only: false,
            selected: false,
        }
    }

    /// Attributes of an already committed node.
    ///
    pub fn committed(
        id: NodeId,
        parent_id: Option<NodeId>,
        root_id: NodeId,
        title: &str,
    ) -> Self {
        ItemAttrs {
            id,
            parent_id,
            root_id,
            value: title.to_string(),
            read_only: true,
            selected: false,
        }
    }
}

/// Specifying the kinds of element a surface builds.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// One outline node with its label field.
    Item(ItemAttrs),
    /// Container holding the child items of one node.
    List,
}

/// Specifying which elements a query returns.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Item,
    List,
}

/// Capabilities the controller needs from a rendering target.
///
pub trait Surface {
    /// Drop every element, leaving an empty top-level container.
    fn clear(&mut self);

    /// Build a detached element.
    fn build(&mut self, element: Element) -> Handle;

    /// Attach `child` as the last child of `parent`, or of the top-level
    /// container when `parent` is `None`.
    fn append(&mut self, parent: Option<Handle>, child: Handle) -> Result<(), SurfaceError>;

    /// Attach `node` right after `reference`, under the same parent.
    fn insert_after(&mut self, node: Handle, reference: Handle) -> Result<(), SurfaceError>;

    /// Attached elements matching `selector` in document order, below
    /// `scope` or below the top-level container.
    fn query(&self, selector: Selector, scope: Option<Handle>) -> Vec<Handle>;

    /// Element directly containing `handle`, if attached below another element.
    fn parent(&self, handle: Handle) -> Option<Handle>;

    fn item(&self, handle: Handle) -> Option<&ItemAttrs>;

    fn set_value(&mut self, handle: Handle, value: &str);

    fn set_read_only(&mut self, handle: Handle, read_only: bool);

    fn set_selected(&mut self, handle: Handle, selected: bool);

    fn focus(&mut self, handle: Handle);

    /// Flip the fold flag of a list, returning the new flag.
    fn toggle_fold(&mut self, list: Handle) -> Option<bool>;

    /// Whether `handle` is a folded list. Items are never folded.
    fn is_folded(&self, handle: Handle) -> bool;

    /// Detach and drop an element together with everything below it.
    fn remove(&mut self, handle: Handle);
}
