use super::{Element, Handle, ItemAttrs, Selector, Surface, SurfaceError};
use std::collections::HashMap;

/// One element held by a [`MemorySurface`].
///
#[derive(Debug, Clone)]
struct Slot {
    element: Element,
    folded: bool,
    parent: Option<Handle>,
    children: Vec<Handle>,
}

/// One visible line of the outline, as drawn by a terminal front end.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleItem {
    pub handle: Handle,
    pub depth: usize,
    pub attrs: ItemAttrs,
    pub focused: bool,
    pub has_children: bool,
    pub folded: bool,
}

/// Element tree kept in memory. Used as the rendering target of the
/// terminal front end and of the controller tests.
///
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    slots: HashMap<Handle, Slot>,
    top: Vec<Handle>,
    next: u64,
    focused: Option<Handle>,
}

impl MemorySurface {
    pub fn new() -> MemorySurface {
        MemorySurface::default()
    }

    pub fn focused(&self) -> Option<Handle> {
        self.focused
    }

    /// Number of live elements, attached or not.
    ///
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Items that are not hidden inside a folded list, in document order,
    /// with their nesting depth.
    ///
    pub fn visible_items(&self) -> Vec<VisibleItem> {
        let mut out = vec![];
        self.collect_visible(&self.top, 0, &mut out);
        out
    }

    fn collect_visible(&self, handles: &[Handle], depth: usize, out: &mut Vec<VisibleItem>) {
        for handle in handles {
            let Some(slot) = self.slots.get(handle) else {
                continue;
            };
            match &slot.element {
                Element::Item(attrs) => {
                    let lists: Vec<&Slot> = slot
                        .children
                        .iter()
                        .filter_map(|h| self.slots.get(h))
                        .filter(|s| matches!(s.element, Element::List))
                        .collect();
                    let has_children = lists.iter().any(|s| !s.children.is_empty());
                    let folded = lists.iter().any(|s| s.folded);
                    out.push(VisibleItem {
                        handle: *handle,
                        depth,
                        attrs: attrs.clone(),
                        focused: self.focused == Some(*handle),
                        has_children,
                        folded,
                    });
                    self.collect_visible(&slot.children, depth, out);
                }
                Element::List => {
                    if !slot.folded {
                        self.collect_visible(&slot.children, depth + 1, out);
                    }
                }
            }
        }
    }

    fn item_mut(&mut self, handle: Handle) -> Option<&mut ItemAttrs> {
        match self.slots.get_mut(&handle) {
            Some(Slot {
                element: Element::Item(attrs),
                ..
            }) => Some(attrs),
            _ => None,
        }
    }

    fn is_attached(&self, handle: Handle) -> bool {
        self.slots
            .get(&handle)
            .map_or(false, |slot| slot.parent.is_some() || self.top.contains(&handle))
    }

    /// Whether `candidate` is `ancestor` or lies below it.
    ///
    fn is_within(&self, candidate: Handle, ancestor: Handle) -> bool {
        let mut cursor = Some(candidate);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.slots.get(&current).and_then(|slot| slot.parent);
        }
        false
    }

    fn detach(&mut self, handle: Handle) {
        let parent = self.slots.get_mut(&handle).and_then(|slot| slot.parent.take());
        match parent {
            Some(parent) => {
                if let Some(slot) = self.slots.get_mut(&parent) {
                    slot.children.retain(|h| *h != handle);
                }
            }
            None => self.top.retain(|h| *h != handle),
        }
    }

    fn collect(&self, selector: Selector, handles: &[Handle], out: &mut Vec<Handle>) {
        for handle in handles {
            if let Some(slot) = self.slots.get(handle) {
                let matched = matches!(
                    (&slot.element, selector),
                    (Element::Item(_), Selector::Item) | (Element::List, Selector::List)
                );
                if matched {
                    out.push(*handle);
                }
                self.collect(selector, &slot.children, out);
            }
        }
    }
}

impl Surface for MemorySurface {
    fn clear(&mut self) {
        self.slots.clear();
        self.top.clear();
        self.focused = None;
    }

    fn build(&mut self, element: Element) -> Handle {
        let handle = Handle::new(self.next);
        self.next += 1;
        self.slots.insert(
            handle,
            Slot {
                element,
                folded: false,
                parent: None,
                children: vec![],
            },
        );
        handle
    }

    fn append(&mut self, parent: Option<Handle>, child: Handle) -> Result<(), SurfaceError> {
        if !self.slots.contains_key(&child) {
            return Err(SurfaceError::UnknownHandle(child));
        }
        if let Some(parent) = parent {
            if !self.slots.contains_key(&parent) {
                return Err(SurfaceError::UnknownHandle(parent));
            }
            if self.is_within(parent, child) {
                return Err(SurfaceError::Cycle(child));
            }
        }
        self.detach(child);
        match parent {
            Some(parent) => {
                if let Some(slot) = self.slots.get_mut(&parent) {
                    slot.children.push(child);
                }
                if let Some(slot) = self.slots.get_mut(&child) {
                    slot.parent = Some(parent);
                }
            }
            None => self.top.push(child),
        }
        Ok(())
    }

    fn insert_after(&mut self, node: Handle, reference: Handle) -> Result<(), SurfaceError> {
        if !self.slots.contains_key(&node) {
            return Err(SurfaceError::UnknownHandle(node));
        }
        if !self.is_attached(reference) {
            return Err(SurfaceError::Detached(reference));
        }
        let parent = self.slots.get(&reference).and_then(|slot| slot.parent);
        if let Some(parent) = parent {
            if self.is_within(parent, node) {
                return Err(SurfaceError::Cycle(node));
            }
        }
        self.detach(node);
        let siblings = match parent {
            Some(parent) => match self.slots.get_mut(&parent) {
                Some(slot) => &mut slot.children,
                None => return Err(SurfaceError::UnknownHandle(parent)),
            },
            None => &mut self.top,
        };
        let index = siblings
            .iter()
            .position(|h| *h == reference)
            .map_or(siblings.len(), |i| i + 1);
        siblings.insert(index, node);
        if let Some(slot) = self.slots.get_mut(&node) {
            slot.parent = parent;
        }
        Ok(())
    }

    fn query(&self, selector: Selector, scope: Option<Handle>) -> Vec<Handle> {
        let mut out = vec![];
        match scope {
            Some(scope) => {
                if let Some(slot) = self.slots.get(&scope) {
                    self.collect(selector, &slot.children, &mut out);
                }
            }
            None => self.collect(selector, &self.top, &mut out),
        }
        out
    }

    fn parent(&self, handle: Handle) -> Option<Handle> {
        self.slots.get(&handle).and_then(|slot| slot.parent)
    }

    fn item(&self, handle: Handle) -> Option<&ItemAttrs> {
        match self.slots.get(&handle) {
            Some(Slot {
                element: Element::Item(attrs),
                ..
            }) => Some(attrs),
            _ => None,
        }
    }

    fn set_value(&mut self, handle: Handle, value: &str) {
        if let Some(attrs) = self.item_mut(handle) {
            attrs.value = value.to_string();
        }
    }

    fn set_read_only(&mut self, handle: Handle, read_only: bool) {
        if let Some(attrs) = self.item_mut(handle) {
            attrs.read_only = read_only;
        }
    }

    fn set_selected(&mut self, handle: Handle, selected: bool) {
        if let Some(attrs) = self.item_mut(handle) {
            attrs.selected = selected;
        }
    }

    fn focus(&mut self, handle: Handle) {
        if self.slots.contains_key(&handle) {
            self.focused = Some(handle);
        }
    }

    fn toggle_fold(&mut self, list: Handle) -> Option<bool> {
        match self.slots.get_mut(&list) {
            Some(slot) if matches!(slot.element, Element::List) => {
                slot.folded = !slot.folded;
                Some(slot.folded)
            }
            _ => None,
        }
    }

    fn is_folded(&self, handle: Handle) -> bool {
        self.slots.get(&handle).map_or(false, |slot| slot.folded)
    }

    fn remove(&mut self, handle: Handle) {
        if !self.slots.contains_key(&handle) {
            return;
        }
        self.detach(handle);
        let mut pending = vec![handle];
        while let Some(current) = pending.pop() {
            if let Some(slot) = self.slots.remove(&current) {
                pending.extend(slot.children);
            }
            if self.focused == Some(current) {
                self.focused = None;
            }
        }
    }
}
