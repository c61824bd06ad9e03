//! Renderer: the visual tree and the coalescing scheduler.
//!
//! Mutations never recompose synchronously. They mark the owning host dirty,
//! the scheduler arms a one-shot wake hook, and the embedder flushes with
//! [`Document::render_all_pending`]. A clean host's render is a guaranteed
//! no-op, so spurious flushes are harmless.

use std::collections::{HashMap, HashSet};

use crate::{Document, Node, NodeId};

/// The composed tree actually rendered, maintained by full-replace writes.
#[derive(Debug, Default)]
pub struct VisualTree {
    children: HashMap<NodeId, Vec<NodeId>>,
    parents: HashMap<NodeId, NodeId>,
    writes: u64,
}

impl VisualTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visual children of a node
    pub fn children_of(&self, node: NodeId) -> &[NodeId] {
        self.children.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Visual parent of a node, NONE if it is not composed anywhere
    pub fn parent_of(&self, node: NodeId) -> NodeId {
        self.parents.get(&node).copied().unwrap_or(NodeId::NONE)
    }

    /// Number of child-list writes performed since construction.
    ///
    /// Lets callers observe that a clean render performs no work.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Full replace: drop all current children, then adopt `kids` in order.
    pub(crate) fn set_children(&mut self, parent: NodeId, kids: Vec<NodeId>) {
        self.writes += 1;
        if let Some(old) = self.children.get(&parent) {
            let old = old.clone();
            for c in old {
                if self.parents.get(&c) == Some(&parent) {
                    self.parents.remove(&c);
                }
            }
        }
        for &c in &kids {
            self.parents.insert(c, parent);
        }
        self.children.insert(parent, kids);
    }
}

/// Coalescing render scheduler: dirty hosts, enqueue order, one-shot wake.
pub struct RenderScheduler {
    pending: Vec<NodeId>,
    dirty: HashSet<NodeId>,
    armed: bool,
    wake: Option<Box<dyn FnMut()>>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            dirty: HashSet::new(),
            armed: false,
            wake: None,
        }
    }

    /// Install the hook fired when the first host of a batch is enqueued.
    pub fn set_wake_hook(&mut self, hook: impl FnMut() + 'static) {
        self.wake = Some(Box::new(hook));
    }

    /// Mark `host` dirty, enqueueing it at most once per batch.
    pub(crate) fn invalidate(&mut self, host: NodeId) {
        if self.dirty.insert(host) {
            self.pending.push(host);
        }
        if !self.armed {
            self.armed = true;
            if let Some(wake) = &mut self.wake {
                wake();
            }
        }
    }

    /// True if `host` has a recompose pending
    pub fn is_dirty(&self, host: NodeId) -> bool {
        self.dirty.contains(&host)
    }

    /// True if any host is awaiting a flush
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take the current batch; invalidations after this roll into the next
    /// one.
    pub(crate) fn take_batch(&mut self) -> Vec<NodeId> {
        self.armed = false;
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn clear_dirty(&mut self, host: NodeId) -> bool {
        self.dirty.remove(&host)
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("pending", &self.pending)
            .field("armed", &self.armed)
            .finish()
    }
}

impl Document {
    /// Invalidation propagation: find the nearest shadow host owning the
    /// mutated node and mark it dirty. Mutations with no shadow ancestry are
    /// no-ops for the renderer.
    pub(crate) fn invalidate_renderer(&mut self, node: NodeId) {
        let mut cur = node;
        while cur.is_valid() {
            if self.is_shadow_host(cur) {
                self.scheduler.invalidate(cur);
                return;
            }
            if let Some(root) = self.get(cur).and_then(Node::as_shadow_root) {
                let host = root.host;
                self.scheduler.invalidate(host);
                return;
            }
            cur = self.parent_of(cur);
        }
    }

    /// Render every host invalidated since the last flush, in enqueue order.
    ///
    /// Re-entrant invalidations (beyond the nested renders composition forces
    /// itself) are picked up by the next flush.
    pub fn render_all_pending(&mut self) {
        let batch = self.scheduler.take_batch();
        if batch.is_empty() {
            return;
        }
        tracing::debug!("rendering {} pending host(s)", batch.len());
        for host in batch {
            self.render_host(host);
        }
    }

    /// Render one host: distribute, compose, replace its visual children.
    /// No-op when the host is clean.
    pub(crate) fn render_host(&mut self, host: NodeId) {
        if !self.scheduler.clear_dirty(host) {
            return;
        }
        self.render_host_now(host);
    }

    /// Render a host regardless of its dirty state. Composition uses this for
    /// nested hosts, whose distributions depend on the enclosing pass and may
    /// be stale even when the scheduler considers them clean.
    pub(crate) fn render_host_now(&mut self, host: NodeId) {
        let root = self.shadow_root_of(host);
        if !root.is_valid() {
            return;
        }
        self.distribute(host);
        let kids = self.compose_tree(root);
        self.visual.set_children(host, kids);
    }

    /// The scheduler, for inspection
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }
}
