//! Logical tree storage (arena-based allocation)

use crate::{Node, NodeId};

/// Arena holding every node of a document, addressed by [`NodeId`].
#[derive(Debug, Default)]
pub(crate) struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocate a node and return its id
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_valid() {
            self.nodes.get(id.index())
        } else {
            None
        }
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_valid() {
            self.nodes.get_mut(id.index())
        } else {
            None
        }
    }

    /// Direct access; `id` must be a live id from this arena
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Direct mutable access; `id` must be a live id from this arena
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_get() {
        let mut tree = DomTree::new();
        let a = tree.alloc(Node::element("div"));
        let b = tree.alloc(Node::text("hi"));

        assert_eq!(tree.len(), 2);
        assert!(tree.node(a).is_element());
        assert_eq!(tree.node(b).as_text(), Some("hi"));
        assert!(tree.get(NodeId::NONE).is_none());
    }
}
