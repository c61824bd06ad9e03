//! Event retargeting across shadow boundaries.
//!
//! An event path is the visual ancestor chain of the original target, with a
//! per-entry target adjusted so listeners outside a shadow tree never see
//! nodes inside it. The walk keeps a stack of candidate targets: entering an
//! insertion point duplicates the top, leaving a shadow root pops it.

use std::collections::VecDeque;

use umbra_dom::{Document, Node, NodeId};

/// One step of an event path: where the listener sits and what it sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPathEntry {
    /// The retargeted event target for listeners at this node
    pub target: NodeId,
    /// The node whose listeners run at this step
    pub current_target: NodeId,
}

/// Ancestor iteration in the composed tree.
///
/// Distributed nodes do not reach their insertion point through `parent`, so
/// the walk follows each node's recorded destination insertion points, one
/// per step, before resuming plain parents.
struct AdjustedParentWalk {
    queued: VecDeque<NodeId>,
}

impl AdjustedParentWalk {
    fn new() -> Self {
        Self {
            queued: VecDeque::new(),
        }
    }

    fn next(&mut self, doc: &Document, node: NodeId, context: NodeId) -> NodeId {
        // a shadow root continues where composition spliced it: the <shadow>
        // point that consumed it, or its host when it is the current tree
        if let Some(root) = doc.get(node).and_then(Node::as_shadow_root) {
            let spliced_at = doc.insertion_parent_of(node);
            return if spliced_at.is_valid() {
                spliced_at
            } else {
                root.host
            };
        }

        if let Some(queued) = self.queued.pop_front() {
            return queued;
        }

        let chain = doc.destination_chain(node);
        if let Some(&first) = chain.first() {
            self.queued.extend(chain[1..].iter().copied());
            return first;
        }

        // an insertion point sitting in a host's light tree belongs to the
        // composed path of whichever inner point the context reached
        if context.is_valid() && doc.is_active_insertion_point(node) {
            let host = doc.parent_of(node);
            if doc.is_shadow_host(host) {
                let inner = insertion_point_containing(doc, host, context);
                if inner.is_valid() {
                    return inner;
                }
            }
        }

        if doc.is_document(node) {
            return doc.window();
        }
        doc.parent_of(node)
    }
}

/// The insertion point among `host`'s shadow trees that `context` was
/// distributed into, NONE if there is none.
fn insertion_point_containing(doc: &Document, host: NodeId, context: NodeId) -> NodeId {
    let chain = doc.destination_chain(context);
    for root in doc.shadow_root_chain(host) {
        for ip in doc.active_insertion_points(root) {
            if chain.contains(&ip) {
                return ip;
            }
        }
    }
    NodeId::NONE
}

fn topmost_non_insertion_point(doc: &Document, stack: &[NodeId]) -> NodeId {
    stack
        .iter()
        .rev()
        .copied()
        .find(|&n| !doc.is_insertion_point(n))
        .unwrap_or(NodeId::NONE)
}

/// Build the full event path for an event targeted at `node`.
///
/// Entries run from the target outward; the last entry is the window when the
/// node is attached to the document.
pub fn retarget(doc: &Document, node: NodeId) -> Vec<EventPathEntry> {
    let mut stack: Vec<NodeId> = Vec::new();
    let mut path = Vec::new();
    let mut walk = AdjustedParentWalk::new();

    let mut ancestor = node;
    while ancestor.is_valid() {
        let mut context = NodeId::NONE;
        if doc.is_active_insertion_point(ancestor) {
            context = topmost_non_insertion_point(doc, &stack);
            let top = stack.last().copied().unwrap_or(ancestor);
            stack.push(top);
        } else if stack.is_empty() {
            stack.push(ancestor);
        }

        let target = stack.last().copied().unwrap_or(ancestor);
        path.push(EventPathEntry {
            target,
            current_target: ancestor,
        });

        if doc.get(ancestor).is_some_and(Node::is_shadow_root) {
            stack.pop();
        }
        ancestor = walk.next(doc, ancestor, context);
    }
    path
}

/// True if both nodes live in the same tree scope (document, detached
/// subtree, or one shadow tree).
pub fn in_same_tree(doc: &Document, a: NodeId, b: NodeId) -> bool {
    doc.tree_root_of(a) == doc.tree_root_of(b)
}

/// What a listener at `reference` should see as the related target.
///
/// Walks outward from `related` with the same stack discipline as
/// [`retarget`] and stops at the first ancestor sharing `reference`'s tree.
/// NONE when the walk exhausts without ever entering that tree.
pub fn adjust_related_target(doc: &Document, reference: NodeId, related: NodeId) -> NodeId {
    let mut stack: Vec<NodeId> = Vec::new();
    let mut walk = AdjustedParentWalk::new();

    let mut ancestor = related;
    while ancestor.is_valid() {
        let mut context = NodeId::NONE;
        if doc.is_active_insertion_point(ancestor) {
            context = topmost_non_insertion_point(doc, &stack);
            let top = stack.last().copied().unwrap_or(ancestor);
            stack.push(top);
        } else if stack.is_empty() {
            stack.push(ancestor);
        }

        if in_same_tree(doc, ancestor, reference) {
            return stack.last().copied().unwrap_or(ancestor);
        }

        if doc.get(ancestor).is_some_and(Node::is_shadow_root) {
            stack.pop();
        }
        ancestor = walk.next(doc, ancestor, context);
    }
    NodeId::NONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_dom::Document;

    #[test]
    fn test_plain_tree_path_is_ancestor_chain() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let span = doc.create_element("span");
        doc.append_child(doc.document_node(), div).unwrap();
        doc.append_child(div, span).unwrap();

        let path = retarget(&doc, span);
        let steps: Vec<_> = path.iter().map(|e| e.current_target).collect();
        assert_eq!(steps, vec![span, div, doc.document_node(), doc.window()]);
        assert!(path.iter().all(|e| e.target == span));
    }

    #[test]
    fn test_shadow_internal_target_hidden_outside() {
        let mut doc = Document::new();
        let host = doc.create_element("x-panel");
        doc.append_child(doc.document_node(), host).unwrap();
        let root = doc.create_shadow_root(host).unwrap();
        let inner = doc.create_element("div");
        doc.append_child(root, inner).unwrap();
        doc.render_all_pending();

        let path = retarget(&doc, inner);
        let by_current = |n: NodeId| {
            path.iter()
                .find(|e| e.current_target == n)
                .map(|e| e.target)
        };

        assert_eq!(by_current(inner), Some(inner));
        assert_eq!(by_current(root), Some(inner));
        assert_eq!(by_current(host), Some(host));
        assert_eq!(by_current(doc.window()), Some(host));
    }

    #[test]
    fn test_distributed_node_path_passes_insertion_point() {
        let mut doc = Document::new();
        let host = doc.create_element("x-panel");
        doc.append_child(doc.document_node(), host).unwrap();
        let root = doc.create_shadow_root(host).unwrap();
        let wrapper = doc.create_element("div");
        let cp = doc.create_element("content");
        doc.append_child(root, wrapper).unwrap();
        doc.append_child(wrapper, cp).unwrap();

        let light = doc.create_element("span");
        doc.append_child(host, light).unwrap();
        doc.render_all_pending();

        let path = retarget(&doc, light);
        let steps: Vec<_> = path.iter().map(|e| e.current_target).collect();
        assert_eq!(
            steps,
            vec![
                light,
                cp,
                wrapper,
                root,
                host,
                doc.document_node(),
                doc.window()
            ]
        );
        // a light child is visible everywhere; no entry hides it
        assert!(path.iter().all(|e| e.target == light));
    }

    #[test]
    fn test_adjust_related_target_to_host() {
        let mut doc = Document::new();
        let host = doc.create_element("x-panel");
        let outside = doc.create_element("p");
        doc.append_child(doc.document_node(), host).unwrap();
        doc.append_child(doc.document_node(), outside).unwrap();
        let root = doc.create_shadow_root(host).unwrap();
        let inner = doc.create_element("div");
        doc.append_child(root, inner).unwrap();
        doc.render_all_pending();

        assert_eq!(adjust_related_target(&doc, outside, inner), host);
        // within one tree nothing changes
        assert_eq!(adjust_related_target(&doc, outside, outside), outside);
    }

    #[test]
    fn test_related_target_unreachable_tree_is_none() {
        let mut doc = Document::new();
        let attached = doc.create_element("div");
        doc.append_child(doc.document_node(), attached).unwrap();
        let detached = doc.create_element("span");

        assert!(!adjust_related_target(&doc, attached, detached).is_valid());
    }
}
