//! Graph-to-graph transformations.
//!
//! Each transformation reads an indexed graph and writes a new one through a
//! [`Builder`], so the result is indexed and the source is left untouched.
//! Results keep the source's package manager, schema version, root node id,
//! root package and root node info. Edges are written at most once per
//! parent and child pair.

use std::collections::HashSet;

use tracing::debug;

use super::dependency_graph::DepGraph;
use super::types::{NodeInfo, PkgInfo, PRUNED_LABEL};
use crate::builder::{Builder, NodeOption};
use crate::config::{BuilderConfig, ConflictPolicy};
use crate::error::Result;

/// Suffix appended to the node id of a pruned duplicate.
pub const PRUNED_SUFFIX: &str = "_pruned";

/// Selects dependency packages by name, or by name and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PkgFilter {
    /// Every version of the named package.
    Name(String),
    /// The package with this name and version; other fields are ignored.
    Pkg(PkgInfo),
}

impl PkgFilter {
    fn matches(&self, info: &PkgInfo) -> bool {
        match self {
            PkgFilter::Name(name) => info.name == *name,
            PkgFilter::Pkg(pkg) => info.name == pkg.name && info.version == pkg.version,
        }
    }
}

impl From<&str> for PkgFilter {
    fn from(name: &str) -> Self {
        PkgFilter::Name(name.to_string())
    }
}

impl From<String> for PkgFilter {
    fn from(name: String) -> Self {
        PkgFilter::Name(name)
    }
}

impl From<PkgInfo> for PkgFilter {
    fn from(info: PkgInfo) -> Self {
        PkgFilter::Pkg(info)
    }
}

/// Copies nodes of `source`, addressed by slot, into a fresh builder.
struct Rewriter<'a> {
    source: &'a DepGraph,
    builder: Builder,
    edges: HashSet<(String, String)>,
}

impl<'a> Rewriter<'a> {
    fn new(source: &'a DepGraph) -> Result<Self> {
        let lookup = source.indexed_nodes();
        let root = source.require_root(lookup)?;
        let root_node = &source.graph.nodes[root];
        let root_pkg = source.pkgs[lookup.node_pkg[root]].info.clone();

        let config = BuilderConfig {
            schema_version: source.schema_version.clone(),
            root_node_id: root_node.node_id.clone(),
            root_pkg: root_pkg.clone(),
            conflict_policy: ConflictPolicy::Reject,
        };
        let mut builder =
            Builder::with_config(Some(source.pkg_manager.clone()), Some(root_pkg), config)?;
        if let Some(info) = non_empty_info(root_node.info.as_ref()) {
            builder.set_node_info(&root_node.node_id, info.clone())?;
        }

        Ok(Self {
            source,
            builder,
            edges: HashSet::new(),
        })
    }

    fn node_id(&self, slot: usize) -> &'a str {
        &self.source.graph.nodes[slot].node_id
    }

    fn add_node(&mut self, slot: usize, node_id: String, info: Option<NodeInfo>) -> Result<()> {
        let lookup = self.source.indexed_nodes();
        let pkg_info = self.source.pkgs[lookup.node_pkg[slot]].info.clone();
        self.builder
            .add_node_with_options(node_id, pkg_info, info.map(NodeOption::Info))?;
        Ok(())
    }

    /// Adds the node at `slot` under its own id with its own info.
    fn copy_node(&mut self, slot: usize) -> Result<()> {
        let source = self.source;
        let node = &source.graph.nodes[slot];
        let info = non_empty_info(node.info.as_ref()).cloned();
        self.add_node(slot, node.node_id.clone(), info)
    }

    fn connect(&mut self, parent: &str, child: &str) -> Result<()> {
        if self.edges.insert((parent.to_string(), child.to_string())) {
            self.builder.connect_nodes(parent, child)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<DepGraph> {
        self.builder.build()
    }
}

/// Info with neither provenance nor labels is treated as absent. An empty
/// label map still counts as present.
fn non_empty_info(info: Option<&NodeInfo>) -> Option<&NodeInfo> {
    info.filter(|info| info.version_provenance.is_some() || info.labels.is_some())
}

enum PruneStep {
    Enter { slot: usize, parent: usize },
    Exit(usize),
}

impl DepGraph {
    /// Returns a copy in which repeated subtrees are cut.
    ///
    /// The walk starts over for each direct dependency of the root. Within
    /// one such walk, a node reached a second time is replaced by a childless
    /// `<node_id>_pruned` node labelled `pruned=true`, and an edge back to an
    /// ancestor is kept as is. Nodes unreachable from the root are dropped.
    ///
    /// # Errors
    ///
    /// [`DepGraphError::RootNotFound`](crate::DepGraphError::RootNotFound)
    /// if the root node id matched no node.
    ///
    /// # Example
    ///
    /// ```
    /// use depgraph::{Builder, PkgInfo, PkgManager};
    ///
    /// let mut builder = Builder::new(Some(PkgManager::new("npm")), None).unwrap();
    /// for name in ["a", "b", "c"] {
    ///     builder.add_node(format!("{name}@1"), PkgInfo::new(name, "1")).unwrap();
    /// }
    /// builder.connect_nodes("root-node", "a@1").unwrap();
    /// builder.connect_nodes("a@1", "b@1").unwrap();
    /// builder.connect_nodes("a@1", "c@1").unwrap();
    /// builder.connect_nodes("b@1", "c@1").unwrap();
    ///
    /// let pruned = builder.build().unwrap().pruned().unwrap();
    /// assert!(pruned.get_node("c@1_pruned").unwrap().is_pruned());
    /// ```
    pub fn pruned(&self) -> Result<DepGraph> {
        let lookup = self.indexed_nodes();
        let root = self.require_root(lookup)?;
        let mut out = Rewriter::new(self)?;

        let mut on_path = vec![false; self.graph.nodes.len()];
        on_path[root] = true;
        // Generation in which each node was last entered; 0 is never.
        let mut seen = vec![0usize; self.graph.nodes.len()];
        let mut pruned = 0usize;

        for (generation, &top) in lookup.deps[root].iter().enumerate() {
            let generation = generation + 1;
            let mut stack = vec![PruneStep::Enter {
                slot: top,
                parent: root,
            }];

            while let Some(step) = stack.pop() {
                let (slot, parent) = match step {
                    PruneStep::Exit(slot) => {
                        on_path[slot] = false;
                        continue;
                    }
                    PruneStep::Enter { slot, parent } => (slot, parent),
                };
                let parent_id = out.node_id(parent);

                if on_path[slot] {
                    out.connect(parent_id, out.node_id(slot))?;
                    continue;
                }

                if seen[slot] == generation {
                    let node = &self.graph.nodes[slot];
                    let pruned_id = format!("{}{PRUNED_SUFFIX}", node.node_id);
                    let info = node
                        .info
                        .clone()
                        .unwrap_or_default()
                        .with_label(PRUNED_LABEL, "true");
                    out.add_node(slot, pruned_id.clone(), Some(info))?;
                    out.connect(parent_id, &pruned_id)?;
                    pruned += 1;
                    continue;
                }

                seen[slot] = generation;
                out.copy_node(slot)?;
                out.connect(parent_id, out.node_id(slot))?;

                on_path[slot] = true;
                stack.push(PruneStep::Exit(slot));
                stack.extend(
                    lookup.deps[slot]
                        .iter()
                        .rev()
                        .map(|&dep| PruneStep::Enter { slot: dep, parent: slot }),
                );
            }
        }

        let graph = out.finish()?;
        debug!(
            nodes = self.node_count(),
            kept = graph.node_count(),
            pruned,
            "pruned dependency graph"
        );
        Ok(graph)
    }

    /// Returns a copy without the given nodes and whatever becomes
    /// unreachable once they are gone.
    ///
    /// Ids that match no node are ignored. When none match, the result is a
    /// plain copy of the graph.
    pub fn filter_nodes(&self, node_ids: &[&str]) -> Result<DepGraph> {
        let lookup = self.indexed_nodes();
        let mut removed = vec![false; self.graph.nodes.len()];
        let mut any = false;
        for slot in node_ids.iter().filter_map(|id| self.node_slot(id)) {
            removed[slot] = true;
            any = true;
        }
        if !any {
            return Ok(self.clone());
        }

        let root = self.require_root(lookup)?;
        let mut out = Rewriter::new(self)?;
        let mut expanded = vec![false; self.graph.nodes.len()];
        let mut stack: Vec<(usize, Option<usize>)> = vec![(root, None)];

        while let Some((slot, parent)) = stack.pop() {
            if removed[slot] {
                continue;
            }
            if let Some(parent) = parent {
                out.copy_node(slot)?;
                out.connect(out.node_id(parent), out.node_id(slot))?;
            }
            if std::mem::replace(&mut expanded[slot], true) {
                continue;
            }
            stack.extend(lookup.deps[slot].iter().rev().map(|&dep| (dep, Some(slot))));
        }

        let graph = out.finish()?;
        debug!(
            nodes = self.node_count(),
            kept = graph.node_count(),
            "filtered nodes from dependency graph"
        );
        Ok(graph)
    }

    /// Returns a copy without every node of the matching dependency
    /// packages. See [`DepGraph::filter_nodes`].
    ///
    /// The root package never matches.
    ///
    /// # Arguments
    ///
    /// * `filters` - Package names or `name@version` pairs to drop
    ///
    /// # Example
    ///
    /// ```
    /// use depgraph::graph::PkgFilter;
    /// use depgraph::{Builder, PkgInfo, PkgManager};
    ///
    /// let mut builder = Builder::new(Some(PkgManager::new("npm")), None).unwrap();
    /// builder.add_node("a@1", PkgInfo::new("a", "1")).unwrap();
    /// builder.add_node("b@1", PkgInfo::new("b", "1")).unwrap();
    /// builder.connect_nodes("root-node", "a@1").unwrap();
    /// builder.connect_nodes("a@1", "b@1").unwrap();
    ///
    /// let filtered = builder.build().unwrap().filter_pkgs(&[PkgFilter::from("b")]).unwrap();
    /// assert!(filtered.get_pkg("b@1").is_none());
    /// assert!(filtered.get_pkg("a@1").is_some());
    /// ```
    pub fn filter_pkgs(&self, filters: &[PkgFilter]) -> Result<DepGraph> {
        if filters.is_empty() {
            return Ok(self.clone());
        }

        let lookup = self.indexed_nodes();
        let mut node_ids = Vec::new();
        for info in self.get_dep_pkgs() {
            if !filters.iter().any(|filter| filter.matches(info)) {
                continue;
            }
            if let Some(pkg_slot) = self.pkg_slot(&info.id()) {
                node_ids.extend(
                    lookup.pkg_nodes[pkg_slot]
                        .iter()
                        .map(|&slot| self.graph.nodes[slot].node_id.as_str()),
                );
            }
        }

        self.filter_nodes(&node_ids)
    }
}

/// Builds the part of `current` that is new relative to `previous`.
///
/// A package is changed when its `name@version` is not among the dependency
/// packages of `previous`. The result holds every node of a changed package
/// in `current`, plus every node on a path from the root down to one, with
/// the edges of `current` between them.
///
/// # Arguments
///
/// * `previous` - The baseline graph; only its package ids are read
/// * `current` - The graph whose changes are extracted
///
/// # Errors
///
/// [`DepGraphError::RootNotFound`](crate::DepGraphError::RootNotFound) if
/// `current` has no resolvable root.
pub fn changed_packages_graph(previous: &DepGraph, current: &DepGraph) -> Result<DepGraph> {
    let known: HashSet<String> = previous
        .get_dep_pkgs()
        .into_iter()
        .map(PkgInfo::id)
        .collect();

    let lookup = current.indexed_nodes();
    let root = current.require_root(lookup)?;
    let mut out = Rewriter::new(current)?;

    // (parent, child) edges still to be walked towards the root
    let mut pending: Vec<(usize, usize)> = Vec::new();
    let mut changed = 0usize;
    for info in current.get_dep_pkgs() {
        let pkg_id = info.id();
        if known.contains(&pkg_id) {
            continue;
        }
        let Some(pkg_slot) = current.pkg_slot(&pkg_id) else {
            continue;
        };
        changed += 1;
        for &slot in &lookup.pkg_nodes[pkg_slot] {
            out.copy_node(slot)?;
            pending.extend(current.parent_slots(slot).into_iter().map(|parent| (parent, slot)));
        }
    }

    let mut visited = vec![false; current.graph.nodes.len()];
    visited[root] = true;
    while let Some((parent, child)) = pending.pop() {
        if !std::mem::replace(&mut visited[parent], true) {
            out.copy_node(parent)?;
            pending.extend(
                current
                    .parent_slots(parent)
                    .into_iter()
                    .map(|grandparent| (grandparent, parent)),
            );
        }
        out.connect(out.node_id(parent), out.node_id(child))?;
    }

    let graph = out.finish()?;
    debug!(changed, nodes = graph.node_count(), "built changed packages graph");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::json::decode_str;
    use crate::error::DepGraphError;
    use crate::PkgManager;

    const FIXTURE: &str = include_str!("../../testdata/dep_graph.json");
    const SHARED: &str = include_str!("../../testdata/dep_graph_shared_dep.json");
    const CYCLIC: &str = include_str!("../../testdata/dep_graph_cyclic.json");

    /// Builds a graph from `parent -> child` pairs of `name@1` nodes.
    fn graph_from_edges(edges: &[(&str, &str)]) -> DepGraph {
        let mut builder =
            Builder::new(Some(PkgManager::new("npm")), Some(PkgInfo::new("app", "1"))).unwrap();
        for &(parent, child) in edges {
            for id in [parent, child] {
                if id != "root-node" {
                    let (name, version) = id.split_once('@').unwrap();
                    builder.add_node(id, PkgInfo::new(name, version)).unwrap();
                }
            }
            builder.connect_nodes(parent, child).unwrap();
        }
        builder.build().unwrap()
    }

    fn dep_pkg_ids(graph: &DepGraph) -> Vec<String> {
        let mut ids: Vec<String> = graph.get_dep_pkgs().into_iter().map(PkgInfo::id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_prune_repeated_subtree() {
        let graph = graph_from_edges(&[
            ("root-node", "a@1"),
            ("a@1", "b@1"),
            ("a@1", "c@1"),
            ("b@1", "d@1"),
            ("c@1", "d@1"),
            ("d@1", "e@1"),
        ]);
        let pruned = graph.pruned().unwrap();

        assert_eq!(pruned.node_count(), 7);
        let cut = pruned.get_node("d@1_pruned").unwrap();
        assert!(cut.is_pruned());
        assert_eq!(cut.pkg_id, "d@1");
        assert!(cut.deps.is_empty());

        let c_deps: Vec<&str> = pruned
            .get_node_deps("c@1")
            .unwrap()
            .iter()
            .map(|node| node.node_id.as_str())
            .collect();
        assert_eq!(c_deps, vec!["d@1_pruned"]);
        assert_eq!(pruned.get_pkg_nodes("e@1").unwrap().len(), 1);
        assert!(pruned.validate().is_ok());
    }

    #[test]
    fn test_prune_shared_fixture() {
        let graph = decode_str(SHARED).unwrap();
        let pruned = graph.pruned().unwrap();

        assert!(pruned.get_node("esprima@2.7.3_pruned").unwrap().is_pruned());
        assert_eq!(pruned.get_paths_to_pkg("esprima@2.7.3").unwrap().len(), 2);
        assert_eq!(graph.get_paths_to_pkg("esprima@2.7.3").unwrap().len(), 1);
        assert!(!pruned.equals(&graph, true));
        assert_eq!(pruned.graph.root_node_id, graph.graph.root_node_id);
        assert_eq!(pruned.schema_version, graph.schema_version);
        assert_eq!(pruned.get_root_pkg(), graph.get_root_pkg());
    }

    #[test]
    fn test_prune_restarts_for_each_top_level_dep() {
        let graph = graph_from_edges(&[
            ("root-node", "a@1"),
            ("root-node", "b@1"),
            ("a@1", "c@1"),
            ("b@1", "c@1"),
            ("c@1", "d@1"),
        ]);
        let pruned = graph.pruned().unwrap();

        assert!(pruned.get_node("c@1_pruned").is_none());
        assert_eq!(pruned.get_node("c@1").unwrap().deps.len(), 1);
        assert!(pruned.equals(&graph, true));
    }

    #[test]
    fn test_prune_keeps_cycles() {
        let graph = decode_str(CYCLIC).unwrap();
        let pruned = graph.pruned().unwrap();

        assert!(pruned.equals(&graph, true));
        assert!(pruned.has_cycles());
        assert!(pruned.get_node("term-ng@3.0.4|1").unwrap().is_pruned());
    }

    #[test]
    fn test_prune_keeps_edges_back_to_root() {
        let graph = graph_from_edges(&[("root-node", "a@1"), ("a@1", "root-node")]);
        let pruned = graph.pruned().unwrap();

        assert_eq!(pruned.node_count(), 2);
        let parents: Vec<&str> = pruned
            .get_node_parents("root-node")
            .unwrap()
            .iter()
            .map(|node| node.node_id.as_str())
            .collect();
        assert_eq!(parents, vec!["a@1"]);
    }

    #[test]
    fn test_prune_deep_chain() {
        let mut edges = Vec::new();
        let ids: Vec<String> = (0..20_000).map(|i| format!("n{i}@1")).collect();
        edges.push(("root-node", ids[0].as_str()));
        for pair in ids.windows(2) {
            edges.push((pair[0].as_str(), pair[1].as_str()));
        }
        let graph = graph_from_edges(&edges);

        let pruned = graph.pruned().unwrap();
        assert_eq!(pruned.node_count(), 20_001);
        assert!(pruned.equals(&graph, true));
    }

    #[test]
    fn test_prune_without_root() {
        let mut graph: DepGraph = serde_json::from_str(SHARED).unwrap();
        graph.graph.root_node_id = "gone".to_string();
        graph.build_graph().unwrap();
        assert!(matches!(graph.pruned(), Err(DepGraphError::RootNotFound(_))));
    }

    #[test]
    fn test_filter_nodes_removes_direct_dep() {
        let graph = decode_str(FIXTURE).unwrap();
        let filtered = graph.filter_nodes(&["express@4.4.0"]).unwrap();

        assert_eq!(dep_pkg_ids(&filtered), vec!["ws@1.0.0"]);
        assert_eq!(filtered.node_count(), 2);
        assert_eq!(filtered.get_root_pkg().unwrap().id, "demo-app-for-test@1.1.1");
        assert_eq!(filtered.pkg_manager, graph.pkg_manager);
        assert!(filtered.validate().is_ok());
    }

    #[test]
    fn test_filter_nodes_does_not_mutate_source() {
        let graph = decode_str(FIXTURE).unwrap();
        let before = graph.clone();
        graph.filter_nodes(&["express@4.4.0"]).unwrap();
        assert!(graph.equals(&before, true));
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_filter_nodes_unknown_ids() {
        let graph = decode_str(FIXTURE).unwrap();
        let filtered = graph.filter_nodes(&["left-pad@1.0.0"]).unwrap();
        assert!(filtered.equals(&graph, true));
        assert_eq!(filtered.node_count(), graph.node_count());

        let filtered = graph.filter_nodes(&[]).unwrap();
        assert!(filtered.equals(&graph, true));
    }

    #[test]
    fn test_filter_nodes_keeps_node_info() {
        let graph = decode_str(FIXTURE).unwrap();
        let filtered = graph.filter_nodes(&["ws@1.0.0"]).unwrap();
        let express = filtered.get_node("express@4.4.0").unwrap();
        assert_eq!(express.label("scope"), Some("prod"));
    }

    #[test]
    fn test_filter_nodes_on_cycles() {
        let graph = decode_str(CYCLIC).unwrap();
        let filtered = graph.filter_nodes(&["yargs@17.7.2"]).unwrap();

        assert_eq!(
            dep_pkg_ids(&filtered),
            vec![
                "color-convert@2.0.1",
                "color-name@1.1.4",
                "term-ng@3.0.4",
                "trucolor@4.0.4",
            ]
        );
        assert!(filtered.get_node("term-ng@3.0.4").unwrap().deps.is_empty());
        assert!(filtered.has_cycles());
    }

    #[test]
    fn test_filter_pkgs_by_name_or_info() {
        let graph = decode_str(FIXTURE).unwrap();

        let by_name = graph.filter_pkgs(&[PkgFilter::from("express")]).unwrap();
        let by_info = graph
            .filter_pkgs(&[PkgFilter::from(PkgInfo::new("express", "4.4.0"))])
            .unwrap();
        assert_eq!(dep_pkg_ids(&by_name), vec!["ws@1.0.0"]);
        assert!(by_name.equals(&by_info, true));

        let other_version = graph
            .filter_pkgs(&[PkgFilter::from(PkgInfo::new("express", "5.0.0"))])
            .unwrap();
        assert_eq!(dep_pkg_ids(&other_version), dep_pkg_ids(&graph));

        let both = graph
            .filter_pkgs(&[PkgFilter::from("express"), PkgFilter::from("ws")])
            .unwrap();
        assert!(dep_pkg_ids(&both).is_empty());
    }

    #[test]
    fn test_filter_pkgs_drops_every_occurrence() {
        let graph = decode_str(SHARED).unwrap();
        let filtered = graph.filter_pkgs(&[PkgFilter::from("js-yaml")]).unwrap();

        assert_eq!(
            dep_pkg_ids(&filtered),
            vec![
                "coveralls@2.13.3",
                "istanbul@0.4.3",
                "nyc@6.6.1",
                "tap@5.8.0",
            ]
        );
    }

    #[test]
    fn test_filter_pkgs_all_dep_pkgs() {
        let graph = decode_str(SHARED).unwrap();
        let filters: Vec<PkgFilter> = graph
            .get_dep_pkgs()
            .into_iter()
            .map(|info| PkgFilter::from(info.clone()))
            .collect();
        let filtered = graph.filter_pkgs(&filters).unwrap();

        assert!(filtered.get_dep_pkgs().is_empty());
        assert_eq!(filtered.node_count(), 1);
        assert_eq!(filtered.get_root_pkg().unwrap().id, "goof@1.0.1");
    }

    #[test]
    fn test_filter_pkgs_never_matches_root() {
        let graph = decode_str(FIXTURE).unwrap();
        let filtered = graph
            .filter_pkgs(&[PkgFilter::Name("demo-app-for-test".to_string())])
            .unwrap();
        assert!(filtered.equals(&graph, true));
    }

    #[test]
    fn test_changed_packages_against_empty_graph() {
        for fixture in [SHARED, CYCLIC] {
            let current = decode_str(fixture).unwrap();
            let previous = Builder::new(
                Some(current.pkg_manager.clone()),
                Some(current.get_root_pkg().unwrap().info.clone()),
            )
            .unwrap()
            .build()
            .unwrap();

            let changed = changed_packages_graph(&previous, &current).unwrap();
            assert!(current.equals(&changed, true));
        }
    }

    #[test]
    fn test_changed_transitive_dep() {
        let previous = graph_from_edges(&[
            ("root-node", "a@1"),
            ("root-node", "c@1"),
            ("a@1", "b@1"),
        ]);
        let current = graph_from_edges(&[
            ("root-node", "a@1"),
            ("root-node", "c@1"),
            ("a@1", "b@2"),
        ]);
        let expected = graph_from_edges(&[("root-node", "a@1"), ("a@1", "b@2")]);

        let changed = changed_packages_graph(&previous, &current).unwrap();
        assert!(expected.equals(&changed, true));
    }

    #[test]
    fn test_changed_direct_dep_added() {
        let previous = graph_from_edges(&[("root-node", "a@1"), ("a@1", "b@1")]);
        let current = graph_from_edges(&[
            ("root-node", "a@1"),
            ("a@1", "b@1"),
            ("root-node", "d@1"),
        ]);
        let expected = graph_from_edges(&[("root-node", "d@1")]);

        let changed = changed_packages_graph(&previous, &current).unwrap();
        assert!(expected.equals(&changed, true));
    }

    #[test]
    fn test_changed_node_reached_from_two_parents() {
        let previous = graph_from_edges(&[("root-node", "a@1"), ("root-node", "b@1")]);
        let current = graph_from_edges(&[
            ("root-node", "a@1"),
            ("root-node", "b@1"),
            ("a@1", "x@1"),
            ("b@1", "x@1"),
        ]);

        let changed = changed_packages_graph(&previous, &current).unwrap();
        assert!(current.equals(&changed, true));
        assert_eq!(changed.get_node_parents("x@1").unwrap().len(), 2);
    }

    #[test]
    fn test_no_changes_leaves_only_root() {
        let graph = decode_str(SHARED).unwrap();
        let changed = changed_packages_graph(&graph, &graph).unwrap();
        assert_eq!(changed.node_count(), 1);
        assert_eq!(changed.get_root_pkg(), graph.get_root_pkg());
    }
}
