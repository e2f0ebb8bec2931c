//! depgraph - rooted package dependency graphs with a strict JSON wire format
//!
//! This crate models the dependency graph of a project as packages (unique by
//! `name@version`) and nodes (occurrences of a package in the graph), built
//! incrementally with a [`Builder`] or decoded from JSON with
//! [`codec::json::decode`]. Once indexed, a [`DepGraph`] answers package and
//! node lookups, finds the dependency paths leading from the root to any
//! package, and derives pruned, filtered or changed-package graphs.
//!
//! # Example
//!
//! ```
//! use depgraph::{Builder, PkgInfo, PkgManager};
//!
//! let mut builder = Builder::new(Some(PkgManager::new("npm")), Some(PkgInfo::new("app", "1.0.0")))?;
//! builder.add_node("express@4.4.0", PkgInfo::new("express", "4.4.0"))?;
//! builder.add_node("ws@1.0.0", PkgInfo::new("ws", "1.0.0"))?;
//! builder.connect_nodes("root-node", "express@4.4.0")?;
//! builder.connect_nodes("express@4.4.0", "ws@1.0.0")?;
//!
//! let graph = builder.build()?;
//! assert_eq!(
//!     graph.get_paths_to_pkg("ws@1.0.0")?,
//!     vec![vec!["app@1.0.0", "express@4.4.0", "ws@1.0.0"]]
//! );
//!
//! let json = depgraph::codec::json::encode_string(&graph)?;
//! let decoded = depgraph::codec::json::decode_str(&json)?;
//! assert!(decoded.equals(&graph, true));
//! # Ok::<(), depgraph::DepGraphError>(())
//! ```

pub mod builder;
pub mod codec;
pub mod config;
pub mod error;
pub mod graph;

pub use builder::{with_node_info, Builder, NodeOption};
pub use config::{BuilderConfig, ConflictPolicy};
pub use error::{DepGraphError, IndexError, Result};
pub use graph::{
    changed_packages_graph, pkg_id, DepGraph, Dependency, Graph, Node, NodeInfo, Pkg, PkgFilter,
    PkgInfo, PkgManager, ValidationError,
};
