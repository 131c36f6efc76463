use super::ValidationError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of a node, unique within a session.
///
pub type NodeId = u64;

/// One node of the outline. Roots and nested items share this type; a root
/// is simply a node without a parent whose root reference is its own id.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    id: NodeId,
    title: String,
    created_at: i64,
    #[serde(rename = "parentId")]
    parent_id: Option<NodeId>,
    #[serde(rename = "rootId")]
    root_id: NodeId,
    #[serde(default)]
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Return a new childless node stamped with the current time. A node
    /// created without a root reference is its own root.
    ///
    pub fn new(
        title: impl Into<String>,
        id: NodeId,
        root_id: Option<NodeId>,
        parent_id: Option<NodeId>,
    ) -> Result<TreeNode, ValidationError> {
        TreeNode::with_created_at(
            title,
            id,
            root_id,
            parent_id,
            Utc::now().timestamp_millis(),
        )
    }

    /// Return a new childless node keeping the given creation timestamp.
    ///
    pub fn with_created_at(
        title: impl Into<String>,
        id: NodeId,
        root_id: Option<NodeId>,
        parent_id: Option<NodeId>,
        created_at: i64,
    ) -> Result<TreeNode, ValidationError> {
        let title = title.into();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(TreeNode {
            id,
            title,
            created_at,
            parent_id,
            root_id: root_id.unwrap_or(id),
            children: vec![],
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Overwrite the title, refusing an empty one.
    ///
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.title = title;
        Ok(())
    }

    /// Append a child. The child must already reference this node as its
    /// parent and share its root.
    ///
    pub fn add(&mut self, child: TreeNode) -> Result<&mut TreeNode, ValidationError> {
        if child.parent_id != Some(self.id) || child.root_id != self.root_id {
            return Err(ValidationError::ForeignChild {
                parent: self.id,
                child: child.id,
            });
        }
        self.children.push(child);
        Ok(self)
    }

    /// Detach the first direct child with the given id. Returns `None` when
    /// no such child exists.
    ///
    pub fn remove(&mut self, child_id: NodeId) -> Option<TreeNode> {
        let index = self.children.iter().position(|c| c.id == child_id)?;
        Some(self.children.remove(index))
    }

    /// Depth-first search of this subtree, this node included.
    ///
    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable variant of [`TreeNode::find`].
    ///
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Largest id anywhere in this subtree.
    ///
    pub fn max_id(&self) -> NodeId {
        self.children
            .iter()
            .map(TreeNode::max_id)
            .fold(self.id, NodeId::max)
    }

    /// Add every id of this subtree to `seen`, failing on the first id that
    /// is already there.
    ///
    pub fn claim_ids(&self, seen: &mut HashSet<NodeId>) -> Result<(), ValidationError> {
        if !seen.insert(self.id) {
            return Err(ValidationError::DuplicateId(self.id));
        }
        self.children
            .iter()
            .try_for_each(|child| child.claim_ids(seen))
    }

    /// Re-check every invariant of this subtree, as needed for trees read
    /// back from storage rather than built through [`TreeNode::add`].
    ///
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.parent_id.is_none() && self.root_id != self.id {
            return Err(ValidationError::BrokenRoot {
                id: self.id,
                expected: self.id,
                found: self.root_id,
            });
        }
        self.validate_subtree()
    }

    fn validate_subtree(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        for child in &self.children {
            if child.parent_id != Some(self.id) {
                return Err(ValidationError::ForeignChild {
                    parent: self.id,
                    child: child.id,
                });
            }
            if child.root_id != self.root_id {
                return Err(ValidationError::BrokenRoot {
                    id: child.id,
                    expected: self.root_id,
                    found: child.root_id,
                });
            }
            child.validate_subtree()?;
        }
        Ok(())
    }
}
