//! Structural tree operations.
//!
//! appendChild/insertBefore/removeChild/replaceChild plus text and attribute
//! mutation. Every mutation runs invalidation propagation so the owning
//! host's renderer picks the change up on the next flush.

use crate::{Document, NodeData, NodeId};

/// Result type for tree operations
pub type DomResult<T> = Result<T, DomError>;

/// Structural API misuse, recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node not found")]
    NotFound,

    #[error("hierarchy request error")]
    HierarchyRequest,

    #[error("operation not valid for this node type")]
    InvalidNodeType,

    #[error("node is not a child of the given parent")]
    NotAChild,
}

impl Document {
    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference` (append when `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.check_insertion(parent, child)?;
        if let Some(r) = reference {
            if self.parent_of(r) != parent {
                return Err(DomError::NotFound);
            }
            if r == child {
                return Ok(child);
            }
        }

        let old_parent = self.parent_of(child);
        self.detach(child);

        match reference {
            Some(r) => self.link_before(parent, child, r),
            None => self.link_last(parent, child),
        }

        if old_parent.is_valid() && old_parent != parent {
            self.invalidate_renderer(old_parent);
        }
        self.invalidate_renderer(parent);
        Ok(child)
    }

    /// Remove `child` from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return Err(DomError::NotFound);
        }
        if self.parent_of(child) != parent {
            return Err(DomError::NotAChild);
        }
        self.detach(child);
        self.invalidate_renderer(parent);
        Ok(child)
    }

    /// Replace `old` with `new` under `parent`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> DomResult<NodeId> {
        if self.parent_of(old) != parent {
            return Err(DomError::NotAChild);
        }
        if new == old {
            return Ok(old);
        }
        self.check_insertion(parent, new)?;

        let mut next = self.tree.node(old).next_sibling;
        if next == new {
            next = self.tree.node(new).next_sibling;
        }
        let old_parent = self.parent_of(new);
        self.detach(new);
        self.detach(old);
        if next.is_valid() {
            self.link_before(parent, new, next);
        } else {
            self.link_last(parent, new);
        }

        if old_parent.is_valid() && old_parent != parent {
            self.invalidate_renderer(old_parent);
        }
        self.invalidate_renderer(parent);
        Ok(old)
    }

    /// Replace a node's subtree (or a text node's data) with a single run of
    /// text.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> DomResult<()> {
        let is_text = match &self.get(node).ok_or(DomError::NotFound)?.data {
            NodeData::Text(_) => true,
            NodeData::Element(_) | NodeData::ShadowRoot(_) => false,
            _ => return Err(DomError::InvalidNodeType),
        };
        if is_text {
            if let NodeData::Text(t) = &mut self.tree.node_mut(node).data {
                t.content = text.to_string();
            }
        } else {
            for child in self.children_of(node) {
                self.detach(child);
            }
            if !text.is_empty() {
                let t = self.create_text(text);
                self.link_last(node, t);
            }
        }
        self.invalidate_renderer(node);
        Ok(())
    }

    /// Set an attribute on an element.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let elem = self
            .tree
            .get_mut(node)
            .ok_or(DomError::NotFound)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        elem.set_attr(name, value);
        self.invalidate_renderer(node);
        Ok(())
    }

    /// Remove an attribute from an element.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<()> {
        let elem = self
            .tree
            .get_mut(node)
            .ok_or(DomError::NotFound)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        if elem.remove_attr(name) {
            self.invalidate_renderer(node);
        }
        Ok(())
    }

    /// Get an attribute value from an element.
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.as_element()?.get_attr(name)
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return Err(DomError::NotFound);
        }
        match self.tree.node(parent).data {
            NodeData::Element(_) | NodeData::Document | NodeData::ShadowRoot(_) => {}
            _ => return Err(DomError::HierarchyRequest),
        }
        match self.tree.node(child).data {
            NodeData::Document | NodeData::Window | NodeData::ShadowRoot(_) => {
                return Err(DomError::HierarchyRequest);
            }
            _ => {}
        }
        // A node must not be inserted into itself or its own subtree.
        let mut cur = parent;
        while cur.is_valid() {
            if cur == child {
                return Err(DomError::HierarchyRequest);
            }
            cur = self.parent_of(cur);
        }
        Ok(())
    }

    /// Unlink a node from its parent and siblings.
    pub(crate) fn detach(&mut self, node: NodeId) {
        let (parent, prev, next) = {
            let n = self.tree.node(node);
            (n.parent, n.prev_sibling, n.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.tree.node_mut(prev).next_sibling = next;
        } else {
            self.tree.node_mut(parent).first_child = next;
        }
        if next.is_valid() {
            self.tree.node_mut(next).prev_sibling = prev;
        } else {
            self.tree.node_mut(parent).last_child = prev;
        }

        let n = self.tree.node_mut(node);
        n.parent = NodeId::NONE;
        n.prev_sibling = NodeId::NONE;
        n.next_sibling = NodeId::NONE;
    }

    pub(crate) fn link_last(&mut self, parent: NodeId, child: NodeId) {
        let last = self.tree.node(parent).last_child;
        {
            let c = self.tree.node_mut(child);
            c.parent = parent;
            c.prev_sibling = last;
            c.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.tree.node_mut(last).next_sibling = child;
        } else {
            self.tree.node_mut(parent).first_child = child;
        }
        self.tree.node_mut(parent).last_child = child;
    }

    fn link_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let prev = self.tree.node(reference).prev_sibling;
        {
            let c = self.tree.node_mut(child);
            c.parent = parent;
            c.prev_sibling = prev;
            c.next_sibling = reference;
        }
        self.tree.node_mut(reference).prev_sibling = child;
        if prev.is_valid() {
            self.tree.node_mut(prev).next_sibling = child;
        } else {
            self.tree.node_mut(parent).first_child = child;
        }
    }
}
