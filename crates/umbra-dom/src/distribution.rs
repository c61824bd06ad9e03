//! Distribution: assigning light children to insertion points.
//!
//! One pass per host covers its whole shadow-tree chain. The pool starts as
//! the host's light children (with reprojection splicing) and whatever the
//! newer tree leaves unmatched carries over to the older tree reached through
//! `<shadow>`, so a node lands in at most one insertion point per pass.

use std::collections::HashSet;

use crate::{Document, NodeId};

/// Side-table writes of one distribution pass, kept per host so the next
/// pass can undo them even when the tree has changed since. Resetting from
/// the current tree is not enough: an insertion point or light child removed
/// between passes would keep its recorded state forever.
#[derive(Debug, Default)]
pub(crate) struct PassRecord {
    /// Content insertion points scanned in the host's shadow trees
    points: Vec<NodeId>,
    /// Nodes assigned into those insertion points
    assigned: Vec<NodeId>,
    /// Fallback children pooled from a light-tree insertion point; their
    /// whole destination chain was written by this pass
    fallback: Vec<NodeId>,
}

impl Document {
    /// Recompute the distribution for every tree in `host`'s shadow chain.
    pub(crate) fn distribute(&mut self, host: NodeId) {
        let roots = self.shadow_root_chain(host);
        if roots.is_empty() {
            return;
        }

        self.reset_distribution(host, &roots);

        let mut record = PassRecord::default();
        let mut pool = self.build_pool(host, &mut record);
        tracing::debug!(
            "distribute host {:?}: pool of {} across {} tree(s)",
            host,
            pool.len(),
            roots.len()
        );

        let mut assigned = HashSet::new();
        let mut current = roots[0];
        loop {
            let mut shadow_point = NodeId::NONE;
            for ip in self.active_insertion_points(current) {
                if self.is_content_element(ip) {
                    record.points.push(ip);
                    self.distribute_into(ip, &mut pool, &mut assigned);
                } else if self.is_shadow_element(ip) && !shadow_point.is_valid() {
                    // only the first <shadow> of a tree is honored
                    shadow_point = ip;
                }
            }

            let older = self.older_shadow_root(current);
            if shadow_point.is_valid() && older.is_valid() {
                current = older;
            } else {
                break;
            }
        }

        record.assigned = assigned.into_iter().collect();
        self.pass_records.insert(host, record);
    }

    /// Undo the side-table writes of the previous pass over this host.
    ///
    /// Driven by the recorded pass, not the current tree, so assignments and
    /// destination chains of since-removed insertion points or light
    /// children are cleared too. Chain entries appended by other hosts'
    /// passes (reprojection) are left alone.
    fn reset_distribution(&mut self, host: NodeId, roots: &[NodeId]) {
        for &root in roots {
            self.tree.node_mut(root).insertion_parent = NodeId::NONE;
        }
        let Some(prior) = self.pass_records.remove(&host) else {
            return;
        };

        let points: HashSet<NodeId> = prior.points.iter().copied().collect();
        for &ip in &prior.points {
            self.assignments.remove(&ip);
        }
        for n in prior.assigned {
            if points.contains(&self.tree.node(n).insertion_parent) {
                self.tree.node_mut(n).insertion_parent = NodeId::NONE;
            }
            if let Some(chain) = self.destinations.get_mut(&n) {
                chain.retain(|ip| !points.contains(ip));
                if chain.is_empty() {
                    self.destinations.remove(&n);
                }
            }
        }
        for n in prior.fallback {
            self.destinations.remove(&n);
        }
    }

    /// Build the distribution pool from a host's light children.
    ///
    /// A light child that is itself an active insertion point is replaced by
    /// its current distributed nodes (reprojection), or by its own light
    /// children when nothing is distributed into it.
    fn build_pool(&mut self, host: NodeId, record: &mut PassRecord) -> Vec<NodeId> {
        let mut pool = Vec::new();
        for child in self.children_of(host) {
            if self.is_active_insertion_point(child) {
                let spliced = self.assignments.get(&child).cloned().unwrap_or_default();
                if spliced.is_empty() {
                    for c in self.children_of(child) {
                        self.destinations.insert(c, vec![child]);
                        record.fallback.push(c);
                        pool.push(c);
                    }
                } else {
                    for n in spliced {
                        // drop chain entries below the reprojecting point;
                        // this pass rebuilds them
                        if let Some(chain) = self.destinations.get_mut(&n) {
                            if let Some(i) = chain.iter().position(|&x| x == child) {
                                chain.truncate(i + 1);
                            }
                        }
                        pool.push(n);
                    }
                }
            } else {
                self.destinations.remove(&child);
                pool.push(child);
            }
        }
        pool
    }

    /// Scan the pool left to right and move every match into `ip`.
    fn distribute_into(
        &mut self,
        ip: NodeId,
        pool: &mut Vec<NodeId>,
        assigned: &mut HashSet<NodeId>,
    ) {
        let select = self.select_of(ip).map(str::to_string);
        let select = select.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let mut rest = Vec::with_capacity(pool.len());
        for n in pool.drain(..) {
            if self.pool_node_matches(n, select) {
                self.assign(n, ip, assigned);
            } else {
                rest.push(n);
            }
        }
        *pool = rest;
    }

    /// An empty or missing `select` matches every pool node; otherwise only
    /// elements satisfying the selector match. Invalid selector text matches
    /// nothing.
    fn pool_node_matches(&self, node: NodeId, select: Option<&str>) -> bool {
        match select {
            None => true,
            Some(selector) => self.matches(node, selector),
        }
    }

    fn assign(&mut self, node: NodeId, ip: NodeId, assigned: &mut HashSet<NodeId>) {
        let first_time = assigned.insert(node);
        debug_assert!(
            first_time,
            "node {node:?} distributed into two insertion points in one pass"
        );
        self.assignments.entry(ip).or_default().push(node);
        self.tree.node_mut(node).insertion_parent = ip;
        self.destinations.entry(node).or_default().push(ip);
    }
}
