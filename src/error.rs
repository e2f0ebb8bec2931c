//! Error types for building, indexing, validating and transcoding graphs.

use crate::graph::ValidationError;

/// Errors raised while resolving references during graph indexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Two nodes share the same identity.
    #[error("duplicate node {0:?}")]
    DuplicateNode(String),

    /// A node references a package missing from the package list.
    #[error("node {node_id:?} references unknown package {pkg_id:?}")]
    DanglingPkg { node_id: String, pkg_id: String },

    /// A dependency edge targets a node missing from the node list.
    #[error("node {node_id:?} depends on unknown node {dep_id:?}")]
    DanglingDep { node_id: String, dep_id: String },
}

/// Errors that can occur while working with a dependency graph.
#[derive(Debug, thiserror::Error)]
pub enum DepGraphError {
    /// The builder was created without a package manager.
    #[error("cannot create builder without a package manager")]
    MissingPkgManager,

    #[error("could not find parent node {0}")]
    ParentNodeNotFound(String),

    #[error("could not find child node {0}")]
    ChildNodeNotFound(String),

    #[error("unknown package {0:?}")]
    UnknownPkg(String),

    #[error("unknown node {0:?}")]
    UnknownNode(String),

    /// The declared root node id did not match any node during indexing.
    #[error("root node {0:?} is not present in the graph")]
    RootNotFound(String),

    /// The number of paths to a package does not fit in a `usize`.
    #[error("too many paths to package {0:?} to count")]
    PathCountOverflow(String),

    /// A package id was registered again with different package info.
    #[error("package {pkg_id:?} is already registered with different info")]
    PkgConflict { pkg_id: String },

    /// A node id was registered again for a different package.
    #[error("node {node_id:?} already exists for package {existing:?}, not {requested:?}")]
    NodeConflict {
        node_id: String,
        existing: String,
        requested: String,
    },

    /// Finalizing a builder produced a graph that failed to index.
    #[error("failed to build graph: {0}")]
    Index(#[from] IndexError),

    /// A decoded document has dangling or duplicate references.
    #[error("invalid graph: {0}")]
    InvalidGraph(#[source] IndexError),

    /// Malformed JSON or unknown fields.
    #[error("could not decode DepGraph: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("could not encode DepGraph: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write DepGraph: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, DepGraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_messages() {
        let err = IndexError::DanglingPkg {
            node_id: "a@1".into(),
            pkg_id: "b@2".into(),
        };
        assert_eq!(
            err.to_string(),
            r#"node "a@1" references unknown package "b@2""#
        );

        let wrapped = DepGraphError::InvalidGraph(IndexError::DuplicateNode("x".into()));
        assert_eq!(wrapped.to_string(), r#"invalid graph: duplicate node "x""#);
    }

    #[test]
    fn test_index_error_converts_into_build_failure() {
        let err: DepGraphError = IndexError::DanglingDep {
            node_id: "a".into(),
            dep_id: "b".into(),
        }
        .into();
        assert!(matches!(err, DepGraphError::Index(_)));
        assert!(err.to_string().starts_with("failed to build graph:"));
    }
}
