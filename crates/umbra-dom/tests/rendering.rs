//! End-to-end distribution and rendering scenarios.

use umbra_dom::{Document, NodeId};

fn attached_host(doc: &mut Document) -> (NodeId, NodeId) {
    let host = doc.create_element("x-panel");
    doc.append_child(doc.document_node(), host).unwrap();
    let root = doc.create_shadow_root(host).unwrap();
    (host, root)
}

#[test]
fn test_selected_distribution_renders_matching_child() {
    let mut doc = Document::new();
    let (host, root) = attached_host(&mut doc);

    let a = doc.create_element("span");
    doc.set_attribute(a, "class", "x").unwrap();
    let b = doc.create_element("div");
    doc.append_child(host, a).unwrap();
    doc.append_child(host, b).unwrap();

    let cp = doc.create_element("content");
    doc.set_attribute(cp, "select", ".x").unwrap();
    doc.append_child(root, cp).unwrap();

    doc.render_all_pending();

    assert_eq!(doc.visual().children_of(host), &[a]);
    assert!(!doc.visual().parent_of(b).is_valid());
    // logical structure is untouched
    assert_eq!(doc.children_of(host), vec![a, b]);
}

#[test]
fn test_fallback_when_nothing_matches() {
    let mut doc = Document::new();
    let (host, root) = attached_host(&mut doc);

    let span = doc.create_element("span");
    doc.append_child(host, span).unwrap();

    let cp = doc.create_element("content");
    doc.set_attribute(cp, "select", "strong").unwrap();
    let fallback = doc.create_element("em");
    doc.append_child(root, cp).unwrap();
    doc.append_child(cp, fallback).unwrap();

    doc.render_all_pending();

    assert_eq!(doc.visual().children_of(host), &[fallback]);
    assert!(!doc.visual().parent_of(span).is_valid());
}

#[test]
fn test_invalid_selector_falls_back() {
    let mut doc = Document::new();
    let (host, root) = attached_host(&mut doc);

    let span = doc.create_element("span");
    doc.append_child(host, span).unwrap();

    let cp = doc.create_element("content");
    doc.set_attribute(cp, "select", "div > span").unwrap();
    let fallback = doc.create_element("em");
    doc.append_child(root, cp).unwrap();
    doc.append_child(cp, fallback).unwrap();

    doc.render_all_pending();

    assert_eq!(doc.visual().children_of(host), &[fallback]);
    assert!(!doc.insertion_parent_of(span).is_valid());
}

#[test]
fn test_older_tree_rendered_through_shadow_point() {
    let mut doc = Document::new();
    let host = doc.create_element("x-panel");
    doc.append_child(doc.document_node(), host).unwrap();

    let r1 = doc.create_shadow_root(host).unwrap();
    let old_cp = doc.create_element("content");
    doc.append_child(r1, old_cp).unwrap();

    let r2 = doc.create_shadow_root(host).unwrap();
    let frame = doc.create_element("div");
    let sh = doc.create_element("shadow");
    doc.append_child(r2, frame).unwrap();
    doc.append_child(frame, sh).unwrap();

    let p = doc.create_element("p");
    doc.append_child(host, p).unwrap();

    doc.render_all_pending();

    assert_eq!(doc.visual().children_of(host), &[frame]);
    assert_eq!(doc.visual().children_of(frame), &[p]);
    assert_eq!(doc.distributed_nodes(old_cp), vec![p]);
}

#[test]
fn test_reprojection_through_nested_host() {
    let mut doc = Document::new();
    let outer = doc.create_element("x-outer");
    doc.append_child(doc.document_node(), outer).unwrap();
    let outer_root = doc.create_shadow_root(outer).unwrap();

    let inner = doc.create_element("x-inner");
    let c1 = doc.create_element("content");
    doc.append_child(outer_root, inner).unwrap();
    doc.append_child(inner, c1).unwrap();

    let inner_root = doc.create_shadow_root(inner).unwrap();
    let pane = doc.create_element("div");
    let c2 = doc.create_element("content");
    doc.append_child(inner_root, pane).unwrap();
    doc.append_child(pane, c2).unwrap();

    let item = doc.create_element("span");
    doc.append_child(outer, item).unwrap();

    doc.render_all_pending();

    assert_eq!(doc.visual().children_of(outer), &[inner]);
    assert_eq!(doc.visual().children_of(inner), &[pane]);
    assert_eq!(doc.visual().children_of(pane), &[item]);
    assert_eq!(doc.destination_insertion_points(item), vec![c1, c2]);
    assert_eq!(doc.distributed_nodes(c2), vec![item]);
}

#[test]
fn test_clean_flush_performs_no_writes() {
    let mut doc = Document::new();
    let (host, root) = attached_host(&mut doc);
    let cp = doc.create_element("content");
    doc.append_child(root, cp).unwrap();
    let span = doc.create_element("span");
    doc.append_child(host, span).unwrap();

    doc.render_all_pending();
    let writes = doc.visual().write_count();

    doc.render_all_pending();
    assert_eq!(doc.visual().write_count(), writes);
    assert!(!doc.scheduler().has_pending());
}

#[test]
fn test_distributed_nodes_reflect_pending_mutations() {
    let mut doc = Document::new();
    let (host, root) = attached_host(&mut doc);
    let cp = doc.create_element("content");
    doc.append_child(root, cp).unwrap();

    doc.render_all_pending();
    assert_eq!(doc.distributed_nodes(cp), Vec::<NodeId>::new());

    let late = doc.create_element("span");
    doc.append_child(host, late).unwrap();
    // the query itself flushes the pending recompose
    assert_eq!(doc.distributed_nodes(cp), vec![late]);
    assert_eq!(doc.visual().children_of(host), &[late]);
}

#[test]
fn test_wake_hook_rearms_after_flush() {
    use std::cell::Cell;
    use std::rc::Rc;

    let mut doc = Document::new();
    let wakes = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&wakes);
    doc.set_wake_hook(move || counter.set(counter.get() + 1));

    let (host, root) = attached_host(&mut doc);
    let cp = doc.create_element("content");
    doc.append_child(root, cp).unwrap();
    assert_eq!(wakes.get(), 1);

    doc.render_all_pending();
    let span = doc.create_element("span");
    doc.append_child(host, span).unwrap();
    assert_eq!(wakes.get(), 2);
}

#[test]
fn test_removed_insertion_point_forgets_its_assignment() {
    let mut doc = Document::new();
    let (host, root) = attached_host(&mut doc);
    let cp = doc.create_element("content");
    doc.append_child(root, cp).unwrap();
    let span = doc.create_element("span");
    doc.append_child(host, span).unwrap();

    assert_eq!(doc.distributed_nodes(cp), vec![span]);

    doc.remove_child(root, cp).unwrap();

    assert_eq!(doc.distributed_nodes(cp), Vec::<NodeId>::new());
    assert!(!doc.insertion_parent_of(span).is_valid());
    assert_eq!(doc.destination_insertion_points(span), Vec::<NodeId>::new());
    assert_eq!(doc.visual().children_of(host), &[] as &[NodeId]);
}

#[test]
fn test_removed_light_child_forgets_destinations() {
    let mut doc = Document::new();
    let (host, root) = attached_host(&mut doc);
    let cp = doc.create_element("content");
    doc.append_child(root, cp).unwrap();
    let span = doc.create_element("span");
    doc.append_child(host, span).unwrap();

    assert_eq!(doc.destination_insertion_points(span), vec![cp]);

    doc.remove_child(host, span).unwrap();

    assert_eq!(doc.destination_insertion_points(span), Vec::<NodeId>::new());
    assert!(!doc.insertion_parent_of(span).is_valid());
    assert_eq!(doc.distributed_nodes(cp), Vec::<NodeId>::new());
}

#[test]
fn test_removal_returns_node_to_host() {
    let mut doc = Document::new();
    let (host, root) = attached_host(&mut doc);
    let cp = doc.create_element("content");
    doc.append_child(root, cp).unwrap();
    let span = doc.create_element("span");
    doc.append_child(host, span).unwrap();

    doc.render_all_pending();
    assert_eq!(doc.visual().children_of(host), &[span]);

    doc.remove_child(host, span).unwrap();
    doc.render_all_pending();
    assert_eq!(doc.visual().children_of(host), &[] as &[NodeId]);
    assert!(!doc.insertion_parent_of(span).is_valid());
}
