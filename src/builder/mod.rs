//! Builder module for assembling dependency graphs one node at a time.
//!
//! Producers register packages and nodes with [`Builder::add_node`], wire
//! them with [`Builder::connect_nodes`] and finish with [`Builder::build`],
//! which yields an indexed [`crate::DepGraph`].

mod graph_builder;

pub use graph_builder::{with_node_info, Builder, NodeOption};
