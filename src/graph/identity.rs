//! Canonical package identity.

use super::types::PkgInfo;

/// Derives the identity binding nodes to packages: `name@version`.
///
/// An empty version is allowed and yields `name@`.
///
/// # Example
///
/// ```
/// use depgraph::graph::{pkg_id, PkgInfo};
///
/// assert_eq!(pkg_id(&PkgInfo::new("ws", "1.0.0")), "ws@1.0.0");
/// assert_eq!(pkg_id(&PkgInfo::new("ws", "")), "ws@");
/// ```
pub fn pkg_id(info: &PkgInfo) -> String {
    format!("{}@{}", info.name, info.version)
}
