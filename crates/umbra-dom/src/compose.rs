//! Tree composition: deriving the visual tree from a shadow tree.
//!
//! A depth-first walk over the current shadow tree that splices distributed
//! nodes in at `<content>`, older trees in at `<shadow>`, and forces nested
//! hosts to render themselves before their subtree is used.

use crate::{Document, NodeId};

impl Document {
    /// Compose the children of one shadow-tree level, streaming visual
    /// children of interior nodes into the visual tree as it goes.
    pub(crate) fn compose_tree(&mut self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut shadow_taken = false;
        for child in self.children_of(root) {
            self.compose_node(child, root, &mut shadow_taken, &mut out);
        }
        out
    }

    fn compose_node(
        &mut self,
        node: NodeId,
        current_root: NodeId,
        shadow_taken: &mut bool,
        out: &mut Vec<NodeId>,
    ) {
        if self.is_active_insertion_point(node) {
            if self.is_content_element(node) {
                let assigned = self.assignments.get(&node).cloned().unwrap_or_default();
                if assigned.is_empty() {
                    // fallback content; the insertion point itself is not
                    // emitted
                    for c in self.children_of(node) {
                        self.compose_node(c, current_root, shadow_taken, out);
                    }
                } else {
                    for n in assigned {
                        self.compose_node(n, current_root, shadow_taken, out);
                    }
                }
            } else {
                let older = self.older_shadow_root(current_root);
                if older.is_valid() && !*shadow_taken {
                    *shadow_taken = true;
                    // retargeting reaches the older tree through this link
                    self.tree.node_mut(older).insertion_parent = node;
                    let spliced = self.compose_tree(older);
                    out.extend(spliced);
                } else {
                    for c in self.children_of(node) {
                        self.compose_node(c, current_root, shadow_taken, out);
                    }
                }
            }
            return;
        }

        out.push(node);
        if self.is_shadow_host(node) {
            // a nested component renders itself; its visual children must be
            // complete before anything above consumes them, and its inputs
            // may have just changed even if it was already clean
            self.scheduler.clear_dirty(node);
            self.render_host_now(node);
        } else {
            let mut kids = Vec::new();
            for c in self.children_of(node) {
                self.compose_node(c, current_root, shadow_taken, &mut kids);
            }
            self.visual.set_children(node, kids);
        }
    }
}
