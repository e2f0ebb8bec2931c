//! Wire-level types shared by the builder, the graph and the JSON codec.
//!
//! Field names follow the JSON document format exactly. Every struct rejects
//! unknown fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::identity::pkg_id;

/// Label key marking a node as a cut point for a cycle or re-visited subtree.
pub const PRUNED_LABEL: &str = "pruned";

/// The ecosystem or tool that produced the graph.
///
/// # Example
///
/// ```
/// use depgraph::graph::PkgManager;
///
/// let pm = PkgManager::new("npm").with_version("10.2.0");
/// assert_eq!(pm.name, "npm");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PkgManager {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Registry aliases the packages were resolved against.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<Repository>,
}

impl PkgManager {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_repository(mut self, alias: impl Into<String>) -> Self {
        self.repositories.push(Repository {
            alias: alias.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Repository {
    pub alias: String,
}

/// Identity-bearing attributes of a package.
///
/// An empty `version` or `package_url` is treated as absent and is left out
/// of the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PkgInfo {
    /// The package name (e.g., "express", "github.com/pkg/errors").
    pub name: String,

    /// The resolved version (e.g., "4.4.0").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Package URL (purl) of the package.
    #[serde(rename = "purl", default, skip_serializing_if = "String::is_empty")]
    pub package_url: String,
}

impl PkgInfo {
    /// Creates package info from a name and version.
    ///
    /// # Example
    ///
    /// ```
    /// use depgraph::graph::PkgInfo;
    ///
    /// let info = PkgInfo::new("express", "4.4.0");
    /// assert_eq!(info.id(), "express@4.4.0");
    /// ```
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            package_url: String::new(),
        }
    }

    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.package_url = purl.into();
        self
    }

    /// Returns the canonical `name@version` identity of this package.
    pub fn id(&self) -> String {
        pkg_id(self)
    }
}

impl fmt::Display for PkgInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A package record keyed by its canonical identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pkg {
    pub id: String,
    pub info: PkgInfo,
}

impl Pkg {
    /// Creates a package record, deriving its identity from `info`.
    pub fn new(info: PkgInfo) -> Self {
        Self {
            id: info.id(),
            info,
        }
    }
}

/// The root pointer plus every node, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Graph {
    pub root_node_id: String,
    pub nodes: Vec<Node>,
}

/// A position in the dependency graph.
///
/// Several nodes may point at the same package: diamonds keep one node per
/// occurrence, and cycles are cut by a pruned duplicate node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Node {
    pub node_id: String,
    pub pkg_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<NodeInfo>,

    /// Outgoing edges in declared order.
    #[serde(default)]
    pub deps: Vec<Dependency>,
}

impl Node {
    /// Creates a node with no info and no outgoing edges.
    pub fn new(node_id: impl Into<String>, pkg_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            pkg_id: pkg_id.into(),
            info: None,
            deps: Vec::new(),
        }
    }

    /// Looks up a label on this node.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.info
            .as_ref()
            .and_then(|info| info.labels.as_ref())
            .and_then(|labels| labels.get(key))
            .map(String::as_str)
    }

    /// Returns true if this node marks where a cycle or repeated subtree was cut.
    ///
    /// # Example
    ///
    /// ```
    /// use depgraph::graph::{Node, NodeInfo};
    ///
    /// let mut node = Node::new("foobar@1.2.3|2", "foobar@1.2.3");
    /// assert!(!node.is_pruned());
    ///
    /// node.info = Some(NodeInfo::default().with_label("pruned", "true"));
    /// assert!(node.is_pruned());
    /// ```
    pub fn is_pruned(&self) -> bool {
        self.label(PRUNED_LABEL) == Some("true")
    }
}

/// Out-of-band metadata attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NodeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_provenance: Option<VersionProvenance>,

    /// Free-form labels such as `scope` or `pruned`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

impl NodeInfo {
    pub fn with_version_provenance(mut self, provenance: VersionProvenance) -> Self {
        self.version_provenance = Some(provenance);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// A directed edge to another node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Dependency {
    pub node_id: String,
}

impl Dependency {
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
        }
    }
}

/// Describes how a package version was determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionProvenance {
    /// Source kind, e.g. "file" or "lockfile".
    #[serde(rename = "type")]
    pub kind: String,

    /// Where the version was read from (e.g., "go.mod").
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<Property>,
}

impl VersionProvenance {
    pub fn new(kind: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            location: location.into(),
            property: None,
        }
    }

    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.property = Some(Property { name: name.into() });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Property {
    pub name: String,
}
