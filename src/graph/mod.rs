//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`DepGraph`] struct, the wire types it is made
//! of, and the queries that run over its index: package and node lookup,
//! root resolution, root-to-package paths, validation, equality, and the
//! transformations that derive one graph from another (pruning, filtering and
//! changed-package extraction).
//!
//! # Example
//!
//! ```rust
//! use depgraph::graph::{DepGraph, Dependency, Graph, Node, Pkg, PkgInfo};
//!
//! let mut graph = DepGraph::new();
//! graph.pkgs.push(Pkg::new(PkgInfo::new("app", "1.0.0")));
//! graph.pkgs.push(Pkg::new(PkgInfo::new("lib", "2.0.0")));
//!
//! let mut root = Node::new("root-node", "app@1.0.0");
//! root.deps.push(Dependency::new("lib@2.0.0"));
//! graph.graph = Graph {
//!     root_node_id: "root-node".into(),
//!     nodes: vec![root, Node::new("lib@2.0.0", "lib@2.0.0")],
//! };
//!
//! graph.build_graph().unwrap();
//! assert_eq!(
//!     graph.get_paths_to_pkg("lib@2.0.0").unwrap(),
//!     vec![vec!["app@1.0.0", "lib@2.0.0"]]
//! );
//! ```

mod dependency_graph;
mod equality;
mod identity;
mod paths;
mod transform;
mod types;
mod validation;

pub use dependency_graph::DepGraph;
pub use identity::pkg_id;
pub use transform::{changed_packages_graph, PkgFilter, PRUNED_SUFFIX};
pub use types::{
    Dependency, Graph, Node, NodeInfo, Pkg, PkgInfo, PkgManager, Property, Repository,
    VersionProvenance, PRUNED_LABEL,
};
pub use validation::ValidationError;
