//! Structural checks beyond referential integrity.

use petgraph::graph::NodeIndex;
use petgraph::visit::Dfs;

use super::dependency_graph::DepGraph;

/// A well-formedness rule violated by an indexed graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("root node {0:?} is not present in the graph")]
    MissingRoot(String),

    #[error("{0:?} is not really the root")]
    RootHasParents(String),

    #[error("not all graph nodes are reachable from root: {}", .0.join(", "))]
    UnreachableNodes(Vec<String>),

    #[error("not all pkgs have instance nodes: {}", .0.join(", "))]
    PkgsWithoutNodes(Vec<String>),

    #[error("root pkg {0:?} should have exactly one instance node")]
    RootPkgNotUnique(String),
}

impl DepGraph {
    /// Checks that the graph is a proper rooted graph.
    ///
    /// The root node must exist and have no parents, every node must be
    /// reachable from it, every package must have at least one node, and the
    /// root package must have exactly one node.
    ///
    /// # Panics
    ///
    /// Panics if the graph has not been indexed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let lookup = self.indexed_nodes();
        let root_id = &self.graph.root_node_id;
        let root = lookup
            .root
            .ok_or_else(|| ValidationError::MissingRoot(root_id.clone()))?;

        if !self.parent_slots(root).is_empty() {
            return Err(ValidationError::RootHasParents(root_id.clone()));
        }

        let mut reached = vec![false; self.graph.nodes.len()];
        let mut dfs = Dfs::new(&lookup.edges, NodeIndex::new(root));
        while let Some(next) = dfs.next(&lookup.edges) {
            reached[next.index()] = true;
        }
        let unreachable: Vec<String> = self
            .graph
            .nodes
            .iter()
            .zip(&reached)
            .filter(|(_, seen)| !**seen)
            .map(|(node, _)| node.node_id.clone())
            .collect();
        if !unreachable.is_empty() {
            return Err(ValidationError::UnreachableNodes(unreachable));
        }

        let orphans: Vec<String> = self
            .pkgs
            .iter()
            .zip(&lookup.pkg_nodes)
            .filter(|(_, nodes)| nodes.is_empty())
            .map(|(pkg, _)| pkg.id.clone())
            .collect();
        if !orphans.is_empty() {
            return Err(ValidationError::PkgsWithoutNodes(orphans));
        }

        let root_pkg = lookup.node_pkg[root];
        if lookup.pkg_nodes[root_pkg].len() != 1 {
            return Err(ValidationError::RootPkgNotUnique(
                self.pkgs[root_pkg].id.clone(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::json::{decode, decode_str, encode};
    use crate::graph::{Pkg, PkgInfo};
    use crate::{Builder, DepGraphError, PkgManager};

    fn builder() -> Builder {
        Builder::new(Some(PkgManager::new("npm")), None).unwrap()
    }

    #[test]
    fn test_fixtures_are_valid() {
        for json in [
            include_str!("../../testdata/dep_graph.json"),
            include_str!("../../testdata/dep_graph_shared_dep.json"),
            include_str!("../../testdata/dep_graph_cyclic.json"),
        ] {
            assert_eq!(decode_str(json).unwrap().validate(), Ok(()));
        }
    }

    #[test]
    fn test_missing_root() {
        let mut graph = builder().build().unwrap();
        graph.graph.root_node_id = "elsewhere".into();
        graph.build_graph().unwrap();

        assert_eq!(
            graph.validate(),
            Err(ValidationError::MissingRoot("elsewhere".into()))
        );
    }

    #[test]
    fn test_root_with_parents() {
        let mut b = builder();
        b.add_node("a@1", PkgInfo::new("a", "1")).unwrap();
        b.connect_nodes("root-node", "a@1").unwrap();
        b.connect_nodes("a@1", "root-node").unwrap();
        let graph = b.build().unwrap();

        assert_eq!(
            graph.validate(),
            Err(ValidationError::RootHasParents("root-node".into()))
        );
    }

    #[test]
    fn test_unreachable_nodes() {
        let mut b = builder();
        b.add_node("a@1", PkgInfo::new("a", "1")).unwrap();
        b.add_node("b@1", PkgInfo::new("b", "1")).unwrap();
        b.connect_nodes("root-node", "a@1").unwrap();
        let graph = b.build().unwrap();

        let err = graph.validate().unwrap_err();
        assert_eq!(err, ValidationError::UnreachableNodes(vec!["b@1".into()]));
        assert_eq!(
            err.to_string(),
            "not all graph nodes are reachable from root: b@1"
        );
    }

    #[test]
    fn test_pkg_without_nodes() {
        let mut graph = builder().build().unwrap();
        graph.pkgs.push(Pkg::new(PkgInfo::new("lonely", "1.0.0")));
        let graph = decode(&encode(&graph).unwrap()).unwrap();

        assert_eq!(
            graph.validate(),
            Err(ValidationError::PkgsWithoutNodes(vec!["lonely@1.0.0".into()]))
        );
    }

    #[test]
    fn test_root_pkg_with_several_nodes() {
        let mut b = builder();
        b.add_node("root-copy", PkgInfo::new("_root", "unknown")).unwrap();
        b.connect_nodes("root-node", "root-copy").unwrap();
        let graph = b.build().unwrap();

        assert_eq!(
            graph.validate(),
            Err(ValidationError::RootPkgNotUnique("_root@unknown".into()))
        );
    }

    #[test]
    fn test_validation_error_converts() {
        let err: DepGraphError = ValidationError::RootHasParents("r".into()).into();
        assert_eq!(err.to_string(), r#""r" is not really the root"#);
    }
}
