//! Index of the outline's root nodes.
//!
//! Roots are kept in insertion order, which is also the order in which they
//! are displayed and persisted. Every lookup starts from a registered root
//! and walks its subtree.

use crate::tree::{NodeId, TreeNode, ValidationError};
use log::*;
use std::collections::HashSet;

/// Id handed out when nothing has been allocated yet.
///
pub const INITIAL_ID: NodeId = 0;

/// Houses the ordered set of root nodes.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaStore {
    roots: Vec<TreeNode>,
}

impl SchemaStore {
    pub fn new() -> SchemaStore {
        SchemaStore::default()
    }

    /// Replace the index with the given forest and return the next free id:
    /// one past the largest id found anywhere in the forest, or
    /// [`INITIAL_ID`] when the forest is empty. A forest reusing an id, or
    /// holding the largest possible id, is refused and the index is left
    /// unchanged.
    ///
    pub fn rebuild_from_forest(
        &mut self,
        nodes: Vec<TreeNode>,
    ) -> Result<NodeId, ValidationError> {
        let mut seen = HashSet::new();
        for root in &nodes {
            root.claim_ids(&mut seen)?;
        }
        let next = match nodes.iter().map(TreeNode::max_id).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or(ValidationError::IdsExhausted(max))?,
            None => INITIAL_ID,
        };
        self.roots = nodes;
        debug!(
            "Rebuilt schema with {} roots, next id {}",
            self.roots.len(),
            next
        );
        Ok(next)
    }

    /// Look up a node under the root registered as `root_id`. When a parent
    /// hint is given, as it is while adding a child, the hinted node is
    /// returned instead of `target_id`.
    ///
    pub fn find(
        &self,
        target_id: NodeId,
        root_id: NodeId,
        parent_hint: Option<NodeId>,
    ) -> Option<&TreeNode> {
        let wanted = parent_hint.unwrap_or(target_id);
        self.root(root_id)?.find(wanted)
    }

    /// Mutable variant of [`SchemaStore::find`].
    ///
    pub fn find_mut(
        &mut self,
        target_id: NodeId,
        root_id: NodeId,
        parent_hint: Option<NodeId>,
    ) -> Option<&mut TreeNode> {
        let wanted = parent_hint.unwrap_or(target_id);
        self.roots
            .iter_mut()
            .find(|root| root.id() == root_id)?
            .find_mut(wanted)
    }

    pub fn root(&self, id: NodeId) -> Option<&TreeNode> {
        self.roots.iter().find(|root| root.id() == id)
    }

    /// Roots in insertion order.
    ///
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Register a root at the end of the index, replacing any root already
    /// registered under the same id in place.
    ///
    pub fn register(&mut self, root: TreeNode) {
        match self.roots.iter_mut().find(|r| r.id() == root.id()) {
            Some(existing) => *existing = root,
            None => self.roots.push(root),
        }
    }

    pub fn unregister(&mut self, id: NodeId) -> Option<TreeNode> {
        let index = self.roots.iter().position(|root| root.id() == id)?;
        Some(self.roots.remove(index))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.root(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
