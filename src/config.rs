//! Builder configuration.
//!
//! Defaults reproduce the canonical document layout: schema `1.3.0`, a root
//! node called `root-node`, and a synthetic `_root@unknown` package when the
//! producer has no project package to offer. Every field is optional when
//! deserializing so producers can embed this in their own config files.

use serde::{Deserialize, Serialize};

use crate::graph::PkgInfo;

pub const SCHEMA_VERSION: &str = "1.3.0";
pub const ROOT_NODE_ID: &str = "root-node";
pub const ROOT_PKG_NAME: &str = "_root";
pub const ROOT_PKG_VERSION: &str = "unknown";

/// What the builder does when a package or node id is registered twice with
/// different data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Fail the registration.
    #[default]
    Reject,
    /// Keep the first registration and log a warning.
    KeepFirst,
}

/// Settings applied by [`crate::Builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Written to `schemaVersion` of built graphs.
    pub schema_version: String,
    /// Identity given to the root node.
    pub root_node_id: String,
    /// Root package used when the caller supplies none.
    pub root_pkg: PkgInfo,
    pub conflict_policy: ConflictPolicy,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            root_node_id: ROOT_NODE_ID.to_string(),
            root_pkg: PkgInfo::new(ROOT_PKG_NAME, ROOT_PKG_VERSION),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}
