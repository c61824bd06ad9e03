//! Document - the per-document context object.
//!
//! Owns the node arena, the wrapper registry, the distribution side tables,
//! the visual tree, and the render scheduler. Nothing in this crate lives in
//! ambient globals; tests construct isolated documents.

use std::collections::HashMap;

use umbra_css::ElementContext;

use crate::distribution::PassRecord;
use crate::render::{RenderScheduler, VisualTree};
use crate::tree::DomTree;
use crate::{Node, NodeData, NodeId};

/// Identity of a native (platform) node, as supplied by the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// A document: one logical tree, its shadow trees, and the derived state.
pub struct Document {
    pub(crate) tree: DomTree,
    document: NodeId,
    window: NodeId,
    /// Identity map: native node -> wrapper node. Same handle, same node.
    wrappers: HashMap<NativeHandle, NodeId>,
    natives: HashMap<NodeId, NativeHandle>,
    /// Current distribution: insertion point -> assigned nodes, in order.
    pub(crate) assignments: HashMap<NodeId, Vec<NodeId>>,
    /// Per-node chain of insertion points crossed by reprojection, in order.
    pub(crate) destinations: HashMap<NodeId, Vec<NodeId>>,
    /// What each host's last distribution pass wrote, for the next reset.
    pub(crate) pass_records: HashMap<NodeId, PassRecord>,
    pub(crate) visual: VisualTree,
    pub(crate) scheduler: RenderScheduler,
}

impl Document {
    /// Create a document with its window node.
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let document = tree.alloc(Node::document());
        let window = tree.alloc(Node::window());
        Self {
            tree,
            document,
            window,
            wrappers: HashMap::new(),
            natives: HashMap::new(),
            assignments: HashMap::new(),
            destinations: HashMap::new(),
            pass_records: HashMap::new(),
            visual: VisualTree::new(),
            scheduler: RenderScheduler::new(),
        }
    }

    /// The document node
    pub fn document_node(&self) -> NodeId {
        self.document
    }

    /// The window node (the document's default view)
    pub fn window(&self) -> NodeId {
        self.window
    }

    /// Create an element node
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.tree.alloc(Node::element(tag))
    }

    /// Create a text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.tree.alloc(Node::text(content))
    }

    /// Create a comment node
    pub fn create_comment(&mut self, content: impl Into<String>) -> NodeId {
        self.tree.alloc(Node::comment(content))
    }

    /// Get the wrapper for a native node, creating it on first sight.
    ///
    /// Identity-preserving: the same handle always yields the same node.
    pub fn wrap(&mut self, handle: NativeHandle, make: impl FnOnce() -> NodeData) -> NodeId {
        if let Some(&id) = self.wrappers.get(&handle) {
            return id;
        }
        let id = self.tree.alloc(Node::new(make()));
        self.wrappers.insert(handle, id);
        self.natives.insert(id, handle);
        id
    }

    /// Native handle for a wrapped node, if it came in through [`Self::wrap`].
    pub fn unwrap_native(&self, node: NodeId) -> Option<NativeHandle> {
        self.natives.get(&node).copied()
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    /// Logical parent of a node
    pub fn parent_of(&self, node: NodeId) -> NodeId {
        self.tree.get(node).map_or(NodeId::NONE, |n| n.parent)
    }

    /// Insertion point `node` is currently distributed into, if any
    pub fn insertion_parent_of(&self, node: NodeId) -> NodeId {
        self.tree
            .get(node)
            .map_or(NodeId::NONE, |n| n.insertion_parent)
    }

    /// Logical children of a node, in order
    pub fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(n) = self.tree.get(node) else {
            return out;
        };
        let mut cur = n.first_child;
        while cur.is_valid() {
            out.push(cur);
            cur = self.tree.node(cur).next_sibling;
        }
        out
    }

    /// Text content of a node's subtree
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.tree.get(node) else { return };
        if let Some(text) = n.as_text() {
            out.push_str(text);
            return;
        }
        for child in self.children_of(node) {
            self.collect_text(child, out);
        }
    }

    pub fn is_document(&self, node: NodeId) -> bool {
        matches!(
            self.tree.get(node).map(|n| &n.data),
            Some(NodeData::Document)
        )
    }

    pub fn is_window(&self, node: NodeId) -> bool {
        matches!(self.tree.get(node).map(|n| &n.data), Some(NodeData::Window))
    }

    /// Match an element against a selector, failing closed.
    ///
    /// Non-elements never match; invalid selector text matches nothing.
    pub fn matches(&self, node: NodeId, selector: &str) -> bool {
        let Some(elem) = self.tree.get(node).and_then(Node::as_element) else {
            return false;
        };
        let ctx = ElementContext {
            tag: &elem.tag,
            id: elem.id.as_deref(),
            classes: &elem.classes,
            attrs: &elem.attrs,
        };
        umbra_css::matches_selector(selector, &ctx)
    }

    /// Root of a node's tree scope, following logical parents only.
    ///
    /// For nodes inside a shadow tree this is the shadow root node.
    pub fn tree_root_of(&self, node: NodeId) -> NodeId {
        let mut cur = node;
        loop {
            let parent = self.parent_of(cur);
            if !parent.is_valid() {
                return cur;
            }
            cur = parent;
        }
    }

    /// Nodes currently distributed into a `<content>` insertion point.
    ///
    /// Flushes pending renders first; the result is a snapshot, not a live
    /// view.
    pub fn distributed_nodes(&mut self, content: NodeId) -> Vec<NodeId> {
        self.render_all_pending();
        self.assignments.get(&content).cloned().unwrap_or_default()
    }

    /// The ordered chain of insertion points a node was distributed through.
    ///
    /// Flushes pending renders first.
    pub fn destination_insertion_points(&mut self, node: NodeId) -> Vec<NodeId> {
        self.render_all_pending();
        self.destinations.get(&node).cloned().unwrap_or_default()
    }

    /// Chain of insertion points for `node` as of the last completed render.
    pub fn destination_chain(&self, node: NodeId) -> &[NodeId] {
        self.destinations
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The visual (composed) tree
    pub fn visual(&self) -> &VisualTree {
        &self.visual
    }

    /// Install the scheduler wake hook; called once when a batch is armed.
    pub fn set_wake_hook(&mut self, hook: impl FnMut() + 'static) {
        self.scheduler.set_wake_hook(hook);
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.tree.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
