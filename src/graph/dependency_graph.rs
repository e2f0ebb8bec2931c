//! Finalized dependency graph and its lookup indices.
//!
//! The serialized state is four plain fields mirroring the JSON document. On
//! top of that, [`DepGraph::build_graph`] derives an arena index: packages and
//! nodes are addressed by their position ("slot") in the ordered vectors, and
//! every reference is resolved once into slots. A petgraph `DiGraph` mirrors
//! the edges so that `NodeIndex::new(slot)` is the node at that slot.

use once_cell::sync::OnceCell;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::types::{Graph, Node, Pkg, PkgInfo, PkgManager};
use crate::error::{DepGraphError, IndexError, Result};

const NOT_INDEXED: &str = "prior call to DepGraph::build_graph required";

/// Resolved node references, addressed by slot.
#[derive(Debug, Clone)]
pub(crate) struct NodeLookup {
    pub(crate) by_id: HashMap<String, usize>,
    /// Slot of the node matching `graph.root_node_id`, if any.
    pub(crate) root: Option<usize>,
    /// Package slot owning each node.
    pub(crate) node_pkg: Vec<usize>,
    /// Node slots of every occurrence of each package, in node order.
    pub(crate) pkg_nodes: Vec<Vec<usize>>,
    /// Resolved dependency slots of each node, in declared order.
    pub(crate) deps: Vec<Vec<usize>>,
    pub(crate) edges: DiGraph<(), ()>,
}

/// A rooted, possibly cyclic package dependency graph.
///
/// Built either by [`crate::Builder::build`] or by decoding a JSON document
/// with [`crate::codec::json::decode`]. Both paths index the graph; a graph
/// assembled by hand must call [`DepGraph::build_graph`] before any indexed
/// query.
///
/// # Example
///
/// ```
/// use depgraph::{Builder, PkgInfo, PkgManager};
///
/// let mut builder = Builder::new(Some(PkgManager::new("npm")), None).unwrap();
/// builder.add_node("dep@1.0.0", PkgInfo::new("dep", "1.0.0")).unwrap();
/// builder.connect_nodes("root-node", "dep@1.0.0").unwrap();
///
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.get_root_pkg().unwrap().id, "_root@unknown");
/// assert!(graph.get_pkg("dep@1.0.0").is_some());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct DepGraph {
    pub schema_version: String,
    pub pkg_manager: PkgManager,
    pub pkgs: Vec<Pkg>,
    pub graph: Graph,

    #[serde(skip)]
    pkg_index: Option<HashMap<String, usize>>,
    #[serde(skip)]
    node_index: Option<NodeLookup>,
    #[serde(skip)]
    root_pkg: OnceCell<Option<usize>>,
}

impl DepGraph {
    /// Creates an empty, un-indexed graph.
    ///
    /// # Example
    ///
    /// ```
    /// use depgraph::DepGraph;
    ///
    /// let graph = DepGraph::new();
    /// assert!(graph.pkgs.is_empty());
    /// assert!(graph.graph.nodes.is_empty());
    /// assert!(!graph.is_indexed());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the package and node indices.
    ///
    /// The package index is built once; calling this again only rebuilds the
    /// node index. A root node id that matches no node leaves the root unset
    /// rather than failing. On error every node-derived index is cleared.
    pub fn build_graph(&mut self) -> std::result::Result<(), IndexError> {
        let pkgs = &self.pkgs;
        let pkg_index = self.pkg_index.get_or_insert_with(|| index_pkgs(pkgs));

        self.root_pkg = OnceCell::new();
        match index_nodes(&self.graph, self.pkgs.len(), pkg_index) {
            Ok(lookup) => {
                debug!(
                    pkgs = self.pkgs.len(),
                    nodes = self.graph.nodes.len(),
                    root_resolved = lookup.root.is_some(),
                    "indexed dependency graph"
                );
                self.node_index = Some(lookup);
                Ok(())
            }
            Err(err) => {
                self.node_index = None;
                Err(err)
            }
        }
    }

    /// Returns true once [`DepGraph::build_graph`] has succeeded.
    pub fn is_indexed(&self) -> bool {
        self.pkg_index.is_some() && self.node_index.is_some()
    }

    /// Returns the root package.
    ///
    /// Available without indexing: when no cached value exists the root is
    /// resolved from the node index, or by a linear scan over the nodes and
    /// packages, and the result is cached. Returns `None` when the root node
    /// id matches no node or the node's package is missing.
    pub fn get_root_pkg(&self) -> Option<&Pkg> {
        let slot = *self.root_pkg.get_or_init(|| self.resolve_root_pkg());
        slot.and_then(|slot| self.pkgs.get(slot))
    }

    fn resolve_root_pkg(&self) -> Option<usize> {
        if let Some(root) = self.node_index.as_ref().and_then(|lookup| lookup.root) {
            return self.node_index.as_ref().map(|lookup| lookup.node_pkg[root]);
        }

        let root = self
            .graph
            .nodes
            .iter()
            .find(|node| node.node_id == self.graph.root_node_id)?;
        self.pkgs.iter().position(|pkg| pkg.id == root.pkg_id)
    }

    pub(crate) fn cache_root_pkg(&self, slot: usize) {
        let _ = self.root_pkg.set(Some(slot));
    }

    /// Looks up a package by its `name@version` identity.
    ///
    /// # Panics
    ///
    /// Panics if the graph has not been indexed.
    pub fn get_pkg(&self, pkg_id: &str) -> Option<&Pkg> {
        self.pkg_slot(pkg_id).map(|slot| &self.pkgs[slot])
    }

    /// Returns every package's info in registration order.
    pub fn get_pkgs(&self) -> Vec<&PkgInfo> {
        self.pkgs.iter().map(|pkg| &pkg.info).collect()
    }

    /// Returns every package except the root package.
    pub fn get_dep_pkgs(&self) -> Vec<&PkgInfo> {
        let root_id = self.get_root_pkg().map(|pkg| pkg.id.as_str());
        self.pkgs
            .iter()
            .filter(|pkg| Some(pkg.id.as_str()) != root_id)
            .map(|pkg| &pkg.info)
            .collect()
    }

    /// Looks up a node by its identity.
    ///
    /// # Panics
    ///
    /// Panics if the graph has not been indexed.
    pub fn get_node(&self, node_id: &str) -> Option<&Node> {
        self.node_slot(node_id).map(|slot| &self.graph.nodes[slot])
    }

    /// Returns the root node resolved during indexing.
    pub fn get_root_node(&self) -> Option<&Node> {
        self.indexed_nodes()
            .root
            .map(|slot| &self.graph.nodes[slot])
    }

    /// Returns the package a node refers to.
    pub fn get_node_pkg(&self, node_id: &str) -> Option<&Pkg> {
        let lookup = self.indexed_nodes();
        self.node_slot(node_id)
            .map(|slot| &self.pkgs[lookup.node_pkg[slot]])
    }

    /// Returns every node occurrence of a package, in node order.
    pub fn get_pkg_nodes(&self, pkg_id: &str) -> Result<Vec<&Node>> {
        let lookup = self.indexed_nodes();
        let pkg_slot = self.require_pkg(pkg_id)?;
        Ok(lookup.pkg_nodes[pkg_slot]
            .iter()
            .map(|&slot| &self.graph.nodes[slot])
            .collect())
    }

    /// Returns the direct dependencies of a node, in declared order.
    pub fn get_node_deps(&self, node_id: &str) -> Result<Vec<&Node>> {
        let lookup = self.indexed_nodes();
        let slot = self.require_node(node_id)?;
        Ok(lookup.deps[slot]
            .iter()
            .map(|&dep| &self.graph.nodes[dep])
            .collect())
    }

    /// Returns the nodes that depend directly on a node, in node order.
    pub fn get_node_parents(&self, node_id: &str) -> Result<Vec<&Node>> {
        let slot = self.require_node(node_id)?;
        Ok(self
            .parent_slots(slot)
            .into_iter()
            .map(|parent| &self.graph.nodes[parent])
            .collect())
    }

    /// Checks if any dependency edges form a cycle.
    ///
    /// Pruned nodes break cycles at production time, so this only reports
    /// cycles that are present in the edge data itself.
    pub fn has_cycles(&self) -> bool {
        // toposort is iterative; is_cyclic_directed recurses once per node
        toposort(&self.indexed_nodes().edges, None).is_err()
    }

    /// Returns the number of packages, including the root package.
    pub fn pkg_count(&self) -> usize {
        self.pkgs.len()
    }

    /// Returns the number of nodes, including the root node and any pruned
    /// or unreachable ones.
    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub(crate) fn indexed_nodes(&self) -> &NodeLookup {
        match &self.node_index {
            Some(lookup) => lookup,
            None => panic!("{NOT_INDEXED}"),
        }
    }

    pub(crate) fn pkg_slot(&self, pkg_id: &str) -> Option<usize> {
        match &self.pkg_index {
            Some(index) => index.get(pkg_id).copied(),
            None => panic!("{NOT_INDEXED}"),
        }
    }

    pub(crate) fn node_slot(&self, node_id: &str) -> Option<usize> {
        self.indexed_nodes().by_id.get(node_id).copied()
    }

    pub(crate) fn require_pkg(&self, pkg_id: &str) -> Result<usize> {
        self.pkg_slot(pkg_id)
            .ok_or_else(|| DepGraphError::UnknownPkg(pkg_id.to_string()))
    }

    pub(crate) fn require_node(&self, node_id: &str) -> Result<usize> {
        self.node_slot(node_id)
            .ok_or_else(|| DepGraphError::UnknownNode(node_id.to_string()))
    }

    /// Parent slots of a node, sorted and without duplicates.
    pub(crate) fn parent_slots(&self, slot: usize) -> Vec<usize> {
        let mut parents: Vec<usize> = self
            .indexed_nodes()
            .edges
            .neighbors_directed(NodeIndex::new(slot), Direction::Incoming)
            .map(|parent| parent.index())
            .collect();
        parents.sort_unstable();
        parents.dedup();
        parents
    }
}

fn index_pkgs(pkgs: &[Pkg]) -> HashMap<String, usize> {
    pkgs.iter()
        .enumerate()
        .map(|(slot, pkg)| (pkg.id.clone(), slot))
        .collect()
}

fn index_nodes(
    graph: &Graph,
    pkg_count: usize,
    pkg_index: &HashMap<String, usize>,
) -> std::result::Result<NodeLookup, IndexError> {
    let node_count = graph.nodes.len();
    let mut lookup = NodeLookup {
        by_id: HashMap::with_capacity(node_count),
        root: None,
        node_pkg: Vec::with_capacity(node_count),
        pkg_nodes: vec![Vec::new(); pkg_count],
        deps: Vec::with_capacity(node_count),
        edges: DiGraph::with_capacity(node_count, node_count),
    };

    for (slot, node) in graph.nodes.iter().enumerate() {
        if lookup.by_id.insert(node.node_id.clone(), slot).is_some() {
            return Err(IndexError::DuplicateNode(node.node_id.clone()));
        }

        if node.node_id == graph.root_node_id {
            lookup.root = Some(slot);
        }

        let pkg_slot = *pkg_index
            .get(&node.pkg_id)
            .ok_or_else(|| IndexError::DanglingPkg {
                node_id: node.node_id.clone(),
                pkg_id: node.pkg_id.clone(),
            })?;
        lookup.node_pkg.push(pkg_slot);
        lookup.pkg_nodes[pkg_slot].push(slot);
        lookup.edges.add_node(());
    }

    for (slot, node) in graph.nodes.iter().enumerate() {
        let mut resolved = Vec::with_capacity(node.deps.len());
        for dep in &node.deps {
            let dep_slot = *lookup
                .by_id
                .get(&dep.node_id)
                .ok_or_else(|| IndexError::DanglingDep {
                    node_id: node.node_id.clone(),
                    dep_id: dep.node_id.clone(),
                })?;
            resolved.push(dep_slot);
            lookup
                .edges
                .add_edge(NodeIndex::new(slot), NodeIndex::new(dep_slot), ());
        }
        lookup.deps.push(resolved);
    }

    Ok(lookup)
}
