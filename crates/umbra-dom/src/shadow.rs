//! Shadow roots and insertion points.
//!
//! A host owns exactly one current shadow root; previously attached roots
//! stay reachable through the older-tree chain and render only where the
//! current tree places a `<shadow>` insertion point.

use crate::node::{CONTENT_TAG, SHADOW_TAG};
use crate::{Document, DomError, DomResult, Node, NodeId};

impl Document {
    /// Attach a new shadow root to `host`.
    ///
    /// A previously attached root is pushed onto the older-tree chain. The
    /// host is invalidated so the first flush renders the new tree.
    pub fn create_shadow_root(&mut self, host: NodeId) -> DomResult<NodeId> {
        let older = {
            let elem = self
                .tree
                .get(host)
                .ok_or(DomError::NotFound)?
                .as_element()
                .ok_or(DomError::InvalidNodeType)?;
            elem.shadow_root
        };

        let root = self.tree.alloc(Node::shadow_root(host, older));
        if let Some(elem) = self.tree.node_mut(host).as_element_mut() {
            elem.shadow_root = root;
        }
        tracing::debug!("attached shadow root {:?} to host {:?}", root, host);
        self.invalidate_renderer(host);
        Ok(root)
    }

    /// Current shadow root of `host`, NONE if it is not a host
    pub fn shadow_root_of(&self, host: NodeId) -> NodeId {
        self.get(host)
            .and_then(Node::as_element)
            .map_or(NodeId::NONE, |e| e.shadow_root)
    }

    /// True if `node` is an element with a shadow root attached
    pub fn is_shadow_host(&self, node: NodeId) -> bool {
        self.shadow_root_of(node).is_valid()
    }

    /// Older shadow tree of `root`, NONE at the end of the chain
    pub fn older_shadow_root(&self, root: NodeId) -> NodeId {
        self.get(root)
            .and_then(Node::as_shadow_root)
            .map_or(NodeId::NONE, |s| s.older)
    }

    /// Host of a shadow root
    pub fn host_of(&self, root: NodeId) -> NodeId {
        self.get(root)
            .and_then(Node::as_shadow_root)
            .map_or(NodeId::NONE, |s| s.host)
    }

    /// Shadow roots of `host`, newest first
    pub fn shadow_root_chain(&self, host: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut root = self.shadow_root_of(host);
        while root.is_valid() {
            chain.push(root);
            root = self.older_shadow_root(root);
        }
        chain
    }

    /// True for `<content>` and `<shadow>` elements
    pub fn is_insertion_point(&self, node: NodeId) -> bool {
        self.get(node)
            .and_then(Node::as_element)
            .is_some_and(|e| e.is_insertion_point())
    }

    /// An insertion point is active unless it is nested inside another
    /// insertion point (in which case it is that point's fallback content).
    pub fn is_active_insertion_point(&self, node: NodeId) -> bool {
        if !self.is_insertion_point(node) {
            return false;
        }
        let mut cur = self.parent_of(node);
        while cur.is_valid() {
            if self.is_insertion_point(cur) {
                return false;
            }
            cur = self.parent_of(cur);
        }
        true
    }

    pub(crate) fn is_content_element(&self, node: NodeId) -> bool {
        self.get(node)
            .and_then(Node::as_element)
            .is_some_and(|e| e.tag == CONTENT_TAG)
    }

    pub(crate) fn is_shadow_element(&self, node: NodeId) -> bool {
        self.get(node)
            .and_then(Node::as_element)
            .is_some_and(|e| e.tag == SHADOW_TAG)
    }

    /// The `select` attribute of a `<content>` element, if any
    pub fn select_of(&self, content: NodeId) -> Option<&str> {
        self.get_attribute(content, "select")
    }

    /// Active insertion points of a shadow tree, in tree order.
    ///
    /// The walk stays inside the given tree scope: it descends through the
    /// light children of nested hosts (their own shadow trees are not
    /// children and are never entered) but skips the subtree of every
    /// insertion point it finds, so fallback content is excluded and nested
    /// insertion points stay inactive.
    pub fn active_insertion_points(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_insertion_points(root, &mut out);
        out
    }

    fn collect_insertion_points(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children_of(node) {
            if self.is_insertion_point(child) {
                out.push(child);
            } else {
                self.collect_insertion_points(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    #[test]
    fn test_older_chain() {
        let mut doc = Document::new();
        let host = doc.create_element("x-panel");

        let r1 = doc.create_shadow_root(host).unwrap();
        let r2 = doc.create_shadow_root(host).unwrap();

        assert_eq!(doc.shadow_root_of(host), r2);
        assert_eq!(doc.older_shadow_root(r2), r1);
        assert!(!doc.older_shadow_root(r1).is_valid());
        assert_eq!(doc.shadow_root_chain(host), vec![r2, r1]);
        assert_eq!(doc.host_of(r1), host);
    }

    #[test]
    fn test_create_shadow_root_requires_element() {
        let mut doc = Document::new();
        let text = doc.create_text("hi");
        assert_eq!(doc.create_shadow_root(text), Err(DomError::InvalidNodeType));
    }

    #[test]
    fn test_active_insertion_points_skip_fallback() {
        let mut doc = Document::new();
        let host = doc.create_element("x-panel");
        let root = doc.create_shadow_root(host).unwrap();

        let outer = doc.create_element("content");
        let nested = doc.create_element("content");
        let div = doc.create_element("div");
        let inner = doc.create_element("content");

        doc.append_child(root, outer).unwrap();
        doc.append_child(outer, nested).unwrap();
        doc.append_child(root, div).unwrap();
        doc.append_child(div, inner).unwrap();

        assert_eq!(doc.active_insertion_points(root), vec![outer, inner]);
        assert!(doc.is_active_insertion_point(outer));
        assert!(!doc.is_active_insertion_point(nested));
    }
}
