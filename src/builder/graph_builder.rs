//! Incremental, append-only graph construction.

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::config::{BuilderConfig, ConflictPolicy};
use crate::error::{DepGraphError, Result};
use crate::graph::{DepGraph, Dependency, Graph, Node, NodeInfo, Pkg, PkgInfo, PkgManager};

/// Extra data attached to a node when it is first created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOption {
    Info(NodeInfo),
}

impl NodeOption {
    fn apply(self, node: &mut Node) {
        match self {
            NodeOption::Info(info) => node.info = Some(info),
        }
    }
}

/// Shorthand for [`NodeOption::Info`].
pub fn with_node_info(info: NodeInfo) -> NodeOption {
    NodeOption::Info(info)
}

/// Accumulates packages, nodes and edges, then emits an indexed [`DepGraph`].
///
/// The root package and root node are registered on construction, so the
/// root node is always the first node and the root package the first
/// package of the built graph.
///
/// # Example
///
/// ```
/// use depgraph::{Builder, PkgInfo, PkgManager};
///
/// let mut builder = Builder::new(Some(PkgManager::new("cargo")), None).unwrap();
/// builder.add_node("serde@1.0.0", PkgInfo::new("serde", "1.0.0")).unwrap();
/// builder.connect_nodes("root-node", "serde@1.0.0").unwrap();
///
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.pkg_count(), 2);
/// assert_eq!(graph.graph.nodes[0].deps[0].node_id, "serde@1.0.0");
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    config: BuilderConfig,
    pkg_manager: PkgManager,
    root_node_id: String,
    root_pkg_id: String,
    pkgs: IndexMap<String, Pkg>,
    nodes: IndexMap<String, Node>,
}

impl Builder {
    /// Creates a builder with the default configuration.
    ///
    /// When `root_pkg` is `None` the configured synthetic root package
    /// (`_root@unknown` by default) is used.
    pub fn new(pkg_manager: Option<PkgManager>, root_pkg: Option<PkgInfo>) -> Result<Self> {
        Self::with_config(pkg_manager, root_pkg, BuilderConfig::default())
    }

    /// Creates a builder from an explicit configuration.
    ///
    /// # Arguments
    ///
    /// * `pkg_manager` - Package manager recorded in the graph; required
    /// * `root_pkg` - Root package, or `None` for `config.root_pkg`
    /// * `config` - Schema version, root node id and conflict policy
    ///
    /// # Returns
    ///
    /// A builder holding the root package and root node, or
    /// [`DepGraphError::MissingPkgManager`] when `pkg_manager` is `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use depgraph::{Builder, BuilderConfig, ConflictPolicy, PkgManager};
    ///
    /// let config = BuilderConfig {
    ///     root_node_id: "top".into(),
    ///     conflict_policy: ConflictPolicy::KeepFirst,
    ///     ..BuilderConfig::default()
    /// };
    /// let builder = Builder::with_config(Some(PkgManager::new("pip")), None, config).unwrap();
    /// assert_eq!(builder.get_root_node().node_id, "top");
    /// ```
    pub fn with_config(
        pkg_manager: Option<PkgManager>,
        root_pkg: Option<PkgInfo>,
        config: BuilderConfig,
    ) -> Result<Self> {
        let pkg_manager = pkg_manager.ok_or(DepGraphError::MissingPkgManager)?;
        let root_pkg = root_pkg.unwrap_or_else(|| config.root_pkg.clone());

        let mut builder = Self {
            root_node_id: config.root_node_id.clone(),
            root_pkg_id: root_pkg.id(),
            config,
            pkg_manager,
            pkgs: IndexMap::new(),
            nodes: IndexMap::new(),
        };

        let root_node_id = builder.root_node_id.clone();
        builder.add_node(root_node_id, root_pkg)?;

        debug!(
            pkg_manager = %builder.pkg_manager.name,
            root_pkg = %builder.root_pkg_id,
            "created graph builder"
        );
        Ok(builder)
    }

    /// Returns the package manager the builder was created with.
    pub fn get_pkg_manager(&self) -> &PkgManager {
        &self.pkg_manager
    }

    /// Returns every registered package's info in registration order.
    pub fn get_pkgs(&self) -> Vec<&PkgInfo> {
        self.pkgs.values().map(|pkg| &pkg.info).collect()
    }

    /// Returns the root node registered by the constructor.
    pub fn get_root_node(&self) -> &Node {
        // registered first by the constructor
        &self.nodes[0]
    }

    /// Returns the root package registered by the constructor.
    pub fn get_root_pkg(&self) -> &Pkg {
        &self.pkgs[0]
    }

    /// Looks up a registered node by id.
    pub fn get_node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Registers a node and returns it.
    ///
    /// Adding an id that already exists returns the existing node unchanged.
    /// Node info is attached with [`Builder::add_node_with_options`] or
    /// [`Builder::set_node_info`].
    pub fn add_node(&mut self, node_id: impl Into<String>, pkg_info: PkgInfo) -> Result<&Node> {
        self.add_node_with_options(node_id, pkg_info, std::iter::empty())
    }

    /// Registers a node and applies `options` if the node is new.
    ///
    /// The package is registered on first use. Re-registering a node id for
    /// another package, or a package id with different info, is a conflict
    /// handled per [`ConflictPolicy`].
    ///
    /// # Arguments
    ///
    /// * `node_id` - Unique id of the node within the graph
    /// * `pkg_info` - Package the node is an occurrence of
    /// * `options` - Applied only when the node is created by this call
    pub fn add_node_with_options(
        &mut self,
        node_id: impl Into<String>,
        pkg_info: PkgInfo,
        options: impl IntoIterator<Item = NodeOption>,
    ) -> Result<&Node> {
        let node_id = node_id.into();
        let pkg_id = pkg_info.id();

        if let Some(index) = self.nodes.get_index_of(&node_id) {
            let existing = &self.nodes[index].pkg_id;
            if *existing == pkg_id {
                self.register_pkg(pkg_info)?;
            } else {
                self.resolve_conflict(DepGraphError::NodeConflict {
                    node_id: node_id.clone(),
                    existing: existing.clone(),
                    requested: pkg_id,
                })?;
            }
            trace!(node_id = %node_id, "node already registered");
            return Ok(&self.nodes[index]);
        }

        self.register_pkg(pkg_info)?;

        let mut node = Node::new(node_id.clone(), pkg_id);
        for option in options {
            option.apply(&mut node);
        }
        trace!(node_id = %node_id, pkg_id = %node.pkg_id, "registered node");

        let (index, _) = self.nodes.insert_full(node_id, node);
        Ok(&self.nodes[index])
    }

    /// Replaces the info of a registered node.
    ///
    /// Identity fields and edges are not reachable through this call.
    pub fn set_node_info(&mut self, node_id: &str, info: NodeInfo) -> Result<()> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| DepGraphError::UnknownNode(node_id.to_string()))?;
        node.info = Some(info);
        trace!(node_id, "set node info");
        Ok(())
    }

    /// Appends an edge from `parent_node_id` to `child_node_id`.
    ///
    /// Edges are not deduplicated and cycles are not checked.
    ///
    /// # Arguments
    ///
    /// * `parent_node_id` - Node that gains the dependency
    /// * `child_node_id` - Node depended upon; must already be registered
    pub fn connect_nodes(&mut self, parent_node_id: &str, child_node_id: &str) -> Result<()> {
        let parent = self
            .nodes
            .get_index_of(parent_node_id)
            .ok_or_else(|| DepGraphError::ParentNodeNotFound(parent_node_id.to_string()))?;
        if !self.nodes.contains_key(child_node_id) {
            return Err(DepGraphError::ChildNodeNotFound(child_node_id.to_string()));
        }

        self.nodes[parent].deps.push(Dependency::new(child_node_id));
        trace!(parent = parent_node_id, child = child_node_id, "connected nodes");
        Ok(())
    }

    /// Emits an indexed graph from the current registrations.
    ///
    /// The builder is left untouched and may keep growing.
    pub fn build(&self) -> Result<DepGraph> {
        let mut graph = DepGraph::new();
        graph.schema_version = self.config.schema_version.clone();
        graph.pkg_manager = self.pkg_manager.clone();
        graph.pkgs = self.pkgs.values().cloned().collect();
        graph.graph = Graph {
            root_node_id: self.root_node_id.clone(),
            nodes: self.nodes.values().cloned().collect(),
        };

        graph.build_graph()?;
        if let Some(slot) = self.pkgs.get_index_of(&self.root_pkg_id) {
            graph.cache_root_pkg(slot);
        }

        debug!(
            pkgs = graph.pkg_count(),
            nodes = graph.node_count(),
            "built dependency graph"
        );
        Ok(graph)
    }

    fn register_pkg(&mut self, pkg_info: PkgInfo) -> Result<()> {
        let pkg_id = pkg_info.id();
        if let Some(existing) = self.pkgs.get(&pkg_id) {
            if existing.info != pkg_info {
                return self.resolve_conflict(DepGraphError::PkgConflict { pkg_id });
            }
            return Ok(());
        }

        self.pkgs.insert(pkg_id, Pkg::new(pkg_info));
        Ok(())
    }

    fn resolve_conflict(&self, conflict: DepGraphError) -> Result<()> {
        match self.config.conflict_policy {
            ConflictPolicy::Reject => Err(conflict),
            ConflictPolicy::KeepFirst => {
                warn!(%conflict, "keeping first registration");
                Ok(())
            }
        }
    }
}
