//! Structural comparison of two graphs.
//!
//! Node ids and array order are producer details, so two graphs are equal
//! when walking both from their roots visits the same packages with the same
//! node info, regardless of how nodes are named or dependencies ordered.

use std::collections::HashSet;

use super::dependency_graph::DepGraph;
use super::types::{Node, NodeInfo};

impl DepGraph {
    /// Compares two indexed graphs structurally.
    ///
    /// Dependencies are matched after sorting by package id. When
    /// `compare_root` is false the root nodes' own package and info are not
    /// compared, only what hangs below them.
    ///
    /// # Panics
    ///
    /// Panics if either graph has not been indexed.
    pub fn equals(&self, other: &DepGraph, compare_root: bool) -> bool {
        let (ours, theirs) = (self.indexed_nodes(), other.indexed_nodes());
        match (ours.root, theirs.root) {
            (Some(a), Some(b)) => graphs_equal(self, a, other, b, compare_root),
            (None, None) => self.graph.nodes.is_empty() && other.graph.nodes.is_empty(),
            _ => false,
        }
    }
}

/// Walks both graphs in lockstep from `(root_a, root_b)`. Each pair of slots
/// is compared at most once.
fn graphs_equal(
    graph_a: &DepGraph,
    root_a: usize,
    graph_b: &DepGraph,
    root_b: usize,
    compare_root: bool,
) -> bool {
    let lookup_a = graph_a.indexed_nodes();
    let lookup_b = graph_b.indexed_nodes();

    let mut traversed = HashSet::from([(root_a, root_b)]);
    let mut pending = vec![(root_a, root_b)];

    while let Some((slot_a, slot_b)) = pending.pop() {
        let is_root = slot_a == root_a || slot_b == root_b;

        if compare_root || !is_root {
            let pkg_a = &graph_a.pkgs[lookup_a.node_pkg[slot_a]];
            let pkg_b = &graph_b.pkgs[lookup_b.node_pkg[slot_b]];
            if pkg_a.info != pkg_b.info {
                return false;
            }

            if !same_info(&graph_a.graph.nodes[slot_a], &graph_b.graph.nodes[slot_b]) {
                return false;
            }
        }

        let deps_a = sorted_deps(graph_a, slot_a);
        let deps_b = sorted_deps(graph_b, slot_b);
        if deps_a.len() != deps_b.len() {
            return false;
        }

        // Reversed so the first dependency is compared first.
        for pair in deps_a.into_iter().zip(deps_b).rev() {
            if traversed.insert(pair) {
                pending.push(pair);
            }
        }
    }

    true
}

fn sorted_deps(graph: &DepGraph, slot: usize) -> Vec<usize> {
    let lookup = graph.indexed_nodes();
    let mut deps = lookup.deps[slot].clone();
    deps.sort_by(|&a, &b| {
        let id_a = &graph.pkgs[lookup.node_pkg[a]].id;
        let id_b = &graph.pkgs[lookup.node_pkg[b]].id;
        id_a.cmp(id_b)
    });
    deps
}

/// Absent info, absent labels and empty labels all compare equal.
fn same_info(a: &Node, b: &Node) -> bool {
    let empty = NodeInfo::default();
    let info_a = a.info.as_ref().unwrap_or(&empty);
    let info_b = b.info.as_ref().unwrap_or(&empty);

    let labels_a = info_a.labels.as_ref().filter(|labels| !labels.is_empty());
    let labels_b = info_b.labels.as_ref().filter(|labels| !labels.is_empty());

    info_a.version_provenance == info_b.version_provenance && labels_a == labels_b
}

#[cfg(test)]
mod tests {
    use crate::codec::json::decode_str;
    use crate::graph::{NodeInfo, PkgInfo};
    use crate::{Builder, DepGraph, PkgManager};

    const SHARED: &str = include_str!("../../testdata/dep_graph_shared_dep.json");
    const CYCLIC: &str = include_str!("../../testdata/dep_graph_cyclic.json");

    fn graph_with(order: &[&str], root: PkgInfo) -> DepGraph {
        let mut builder = Builder::new(Some(PkgManager::new("npm")), Some(root)).unwrap();
        for name in order {
            builder
                .add_node(format!("{name}-node"), PkgInfo::new(*name, "1.0.0"))
                .unwrap();
            builder
                .connect_nodes("root-node", &format!("{name}-node"))
                .unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_graph_equals_itself() {
        let graph = decode_str(SHARED).unwrap();
        assert!(graph.equals(&graph.clone(), true));
    }

    #[test]
    fn test_equals_ignores_dependency_order() {
        let a = graph_with(&["a", "b"], PkgInfo::new("app", "1"));
        let b = graph_with(&["b", "a"], PkgInfo::new("app", "1"));
        assert!(a.equals(&b, true));
    }

    #[test]
    fn test_equals_detects_different_packages() {
        let a = graph_with(&["a", "b"], PkgInfo::new("app", "1"));
        let b = graph_with(&["a", "c"], PkgInfo::new("app", "1"));
        assert!(!a.equals(&b, true));

        let c = graph_with(&["a"], PkgInfo::new("app", "1"));
        assert!(!a.equals(&c, true));
    }

    #[test]
    fn test_equals_compare_root_flag() {
        let a = graph_with(&["a"], PkgInfo::new("app", "1"));
        let b = graph_with(&["a"], PkgInfo::new("app", "2"));
        assert!(!a.equals(&b, true));
        assert!(a.equals(&b, false));
    }

    #[test]
    fn test_equals_detects_node_info_changes() {
        let a = graph_with(&["a"], PkgInfo::new("app", "1"));
        let mut b = graph_with(&["a"], PkgInfo::new("app", "1"));
        b.graph.nodes[1].info = Some(NodeInfo::default().with_label("scope", "dev"));
        b.build_graph().unwrap();
        assert!(!a.equals(&b, true));

        b.graph.nodes[1].info = Some(NodeInfo::default());
        b.build_graph().unwrap();
        assert!(a.equals(&b, true));
    }

    #[test]
    fn test_equals_terminates_on_cycles() {
        let a = decode_str(CYCLIC).unwrap();
        let b = decode_str(CYCLIC).unwrap();
        assert!(a.equals(&b, true));
        assert!(!a.equals(&decode_str(SHARED).unwrap(), true));
    }

    fn chain(len: usize, version: &str) -> DepGraph {
        let mut builder = Builder::new(Some(PkgManager::new("npm")), None).unwrap();
        let mut parent = "root-node".to_string();
        for i in 0..len {
            let node_id = format!("n{i}");
            builder
                .add_node(node_id.clone(), PkgInfo::new(format!("n{i}"), version))
                .unwrap();
            builder.connect_nodes(&parent, &node_id).unwrap();
            parent = node_id;
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_equals_on_deep_chains() {
        let a = chain(20_000, "1");
        assert!(a.equals(&chain(20_000, "1"), true));
        assert!(!a.equals(&chain(20_000, "2"), true));
        assert!(!a.equals(&chain(19_999, "1"), true));
    }
}
