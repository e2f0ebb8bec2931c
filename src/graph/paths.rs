//! Root-to-package path queries.
//!
//! [`DepGraph::get_paths_to_pkg`] returns at most one path per node
//! occurrence of a package, found depth-first in declared edge order.
//! [`DepGraph::all_paths_to_pkg`] and [`DepGraph::count_paths_to_root`] walk
//! parent edges instead and consider every simple path.
//!
//! Every traversal keeps its own stack on the heap, so graph depth is bounded
//! by memory rather than by the thread's call stack.

use petgraph::algo::has_path_connecting;
use petgraph::graph::NodeIndex;
use tracing::trace;

use super::dependency_graph::{DepGraph, NodeLookup};
use super::types::Pkg;
use crate::error::{DepGraphError, Result};

impl DepGraph {
    /// Finds one path from the root to each node occurrence of a package.
    ///
    /// Paths are package ids, root first, ordered like the package's node
    /// occurrences. The search for one occurrence shares a single visited set
    /// across sibling branches, so a node reached once is never expanded
    /// again, and a package reachable only through an already expanded node
    /// yields no second path. Use [`DepGraph::all_paths_to_pkg`] for every
    /// path.
    ///
    /// # Arguments
    ///
    /// * `pkg_id` - Canonical `name@version` identity of the target package
    ///
    /// # Errors
    ///
    /// [`DepGraphError::UnknownPkg`] if the package is not in the graph and
    /// [`DepGraphError::RootNotFound`] if no node matched the root node id.
    ///
    /// # Panics
    ///
    /// Panics if the graph has not been indexed.
    ///
    /// # Example
    ///
    /// ```
    /// use depgraph::{Builder, PkgInfo, PkgManager};
    ///
    /// let mut builder = Builder::new(Some(PkgManager::new("npm")), None).unwrap();
    /// builder.add_node("a@1", PkgInfo::new("a", "1")).unwrap();
    /// builder.add_node("b@1", PkgInfo::new("b", "1")).unwrap();
    /// builder.connect_nodes("root-node", "a@1").unwrap();
    /// builder.connect_nodes("a@1", "b@1").unwrap();
    /// builder.connect_nodes("b@1", "a@1").unwrap();
    ///
    /// let graph = builder.build().unwrap();
    /// let paths = graph.get_paths_to_pkg("b@1").unwrap();
    /// assert_eq!(paths, vec![vec!["_root@unknown", "a@1", "b@1"]]);
    /// ```
    pub fn get_paths_to_pkg(&self, pkg_id: &str) -> Result<Vec<Vec<String>>> {
        let lookup = self.indexed_nodes();
        let pkg_slot = self.require_pkg(pkg_id)?;
        let root = self.require_root(lookup)?;

        let mut paths = Vec::new();
        for &target in &lookup.pkg_nodes[pkg_slot] {
            let mut visited = vec![false; self.graph.nodes.len()];
            if let Some(path) = find_path(lookup, root, target, &mut visited) {
                paths.push(self.slots_to_pkg_ids(&path));
            }
        }

        trace!(pkg_id, paths = paths.len(), "resolved paths to package");
        Ok(paths)
    }

    /// Enumerates every simple path from the root to occurrences of a package.
    ///
    /// Paths are package ids, root first, shortest first. Enumeration stops
    /// once `limit` paths have been collected.
    pub fn all_paths_to_pkg(
        &self,
        pkg_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Vec<String>>> {
        let lookup = self.indexed_nodes();
        let pkg_slot = self.require_pkg(pkg_id)?;
        let root = self.require_root(lookup)?;
        let limit = limit.unwrap_or(usize::MAX);

        let mut found = Vec::new();
        let mut on_path = vec![false; self.graph.nodes.len()];
        for &target in &lookup.pkg_nodes[pkg_slot] {
            if found.len() >= limit {
                break;
            }
            self.walk_to_root(root, target, &mut on_path, |path| {
                found.push(path);
                found.len() < limit
            });
        }

        // Stable sort keeps occurrence order among paths of equal length.
        found.sort_by_key(|path: &Vec<usize>| path.len());
        Ok(found
            .iter()
            .map(|path| self.slots_to_pkg_ids(path))
            .collect())
    }

    /// Counts the simple paths from the root to occurrences of a package.
    ///
    /// Acyclic graphs are counted with per-node memoization; graphs whose
    /// edges contain a cycle fall back to exhaustive enumeration.
    ///
    /// # Errors
    ///
    /// Besides the lookup errors of [`DepGraph::get_paths_to_pkg`], returns
    /// [`DepGraphError::PathCountOverflow`] when the count exceeds `usize`.
    pub fn count_paths_to_root(&self, pkg_id: &str) -> Result<usize> {
        let lookup = self.indexed_nodes();
        let pkg_slot = self.require_pkg(pkg_id)?;
        let root = self.require_root(lookup)?;
        let overflow = || DepGraphError::PathCountOverflow(pkg_id.to_string());

        let mut total: usize = 0;
        if self.has_cycles() {
            let mut on_path = vec![false; self.graph.nodes.len()];
            for &target in &lookup.pkg_nodes[pkg_slot] {
                let mut overflowed = false;
                self.walk_to_root(root, target, &mut on_path, |_| {
                    match total.checked_add(1) {
                        Some(next) => total = next,
                        None => overflowed = true,
                    }
                    !overflowed
                });
                if overflowed {
                    return Err(overflow());
                }
            }
            return Ok(total);
        }

        let mut memo = vec![None; self.graph.nodes.len()];
        for &target in &lookup.pkg_nodes[pkg_slot] {
            let count = self
                .count_acyclic_paths(root, target, &mut memo)
                .ok_or_else(overflow)?;
            total = total.checked_add(count).ok_or_else(overflow)?;
        }
        Ok(total)
    }

    /// Returns the root's direct dependencies through which the package is reachable.
    ///
    /// One entry per direct dependency node, in declared order.
    pub fn direct_deps_leading_to(&self, pkg_id: &str) -> Result<Vec<&Pkg>> {
        let lookup = self.indexed_nodes();
        let pkg_slot = self.require_pkg(pkg_id)?;
        let root = self.require_root(lookup)?;
        let occurrences = &lookup.pkg_nodes[pkg_slot];

        let mut seen = vec![false; self.graph.nodes.len()];
        Ok(lookup.deps[root]
            .iter()
            .copied()
            .filter(|&dep| !std::mem::replace(&mut seen[dep], true))
            .filter(|&dep| {
                occurrences.iter().any(|&target| {
                    has_path_connecting(
                        &lookup.edges,
                        NodeIndex::new(dep),
                        NodeIndex::new(target),
                        None,
                    )
                })
            })
            .map(|dep| &self.pkgs[lookup.node_pkg[dep]])
            .collect())
    }

    pub(crate) fn require_root(&self, lookup: &NodeLookup) -> Result<usize> {
        lookup
            .root
            .ok_or_else(|| DepGraphError::RootNotFound(self.graph.root_node_id.clone()))
    }

    fn slots_to_pkg_ids(&self, path: &[usize]) -> Vec<String> {
        path.iter()
            .map(|&slot| self.graph.nodes[slot].pkg_id.clone())
            .collect()
    }

    /// Backtracking walk up parent edges from `target`, handing every simple
    /// path that reaches `root` (root first) to `visit`. The walk stops as
    /// soon as `visit` returns false.
    fn walk_to_root<F>(&self, root: usize, target: usize, on_path: &mut [bool], mut visit: F)
    where
        F: FnMut(Vec<usize>) -> bool,
    {
        if target == root {
            visit(vec![root]);
            return;
        }

        on_path[target] = true;
        let mut stack = vec![ParentFrame::new(target, self.parent_slots(target))];
        let mut keep_going = true;

        while keep_going {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let next = frame.parents.get(frame.next).copied();
            frame.next += 1;

            match next {
                Some(parent) if on_path[parent] => {}
                Some(parent) if parent == root => {
                    let path = std::iter::once(root)
                        .chain(stack.iter().rev().map(|frame| frame.slot))
                        .collect();
                    keep_going = visit(path);
                }
                Some(parent) => {
                    on_path[parent] = true;
                    stack.push(ParentFrame::new(parent, self.parent_slots(parent)));
                }
                None => {
                    if let Some(done) = stack.pop() {
                        on_path[done.slot] = false;
                    }
                }
            }
        }

        for frame in stack {
            on_path[frame.slot] = false;
        }
    }

    /// Post-order count over parent edges; `None` on overflow.
    fn count_acyclic_paths(
        &self,
        root: usize,
        target: usize,
        memo: &mut [Option<usize>],
    ) -> Option<usize> {
        let mut stack = vec![target];
        while let Some(&slot) = stack.last() {
            if memo[slot].is_some() {
                stack.pop();
                continue;
            }
            if slot == root {
                memo[slot] = Some(1);
                stack.pop();
                continue;
            }

            let parents = self.parent_slots(slot);
            let pending: Vec<usize> = parents
                .iter()
                .copied()
                .filter(|&parent| memo[parent].is_none())
                .collect();
            if !pending.is_empty() {
                stack.extend(pending);
                continue;
            }

            let mut count: usize = 0;
            for parent in parents {
                count = count.checked_add(memo[parent].unwrap_or(0))?;
            }
            memo[slot] = Some(count);
            stack.pop();
        }
        memo[target]
    }
}

struct ParentFrame {
    slot: usize,
    parents: Vec<usize>,
    next: usize,
}

impl ParentFrame {
    fn new(slot: usize, parents: Vec<usize>) -> Self {
        Self {
            slot,
            parents,
            next: 0,
        }
    }
}

/// Depth-first search from `root` to `target` over resolved edges, in
/// declared edge order. Returns the path root first.
fn find_path(
    lookup: &NodeLookup,
    root: usize,
    target: usize,
    visited: &mut [bool],
) -> Option<Vec<usize>> {
    if root == target {
        return Some(vec![root]);
    }

    visited[root] = true;
    // (node, index of the next dependency to try)
    let mut stack = vec![(root, 0usize)];
    while let Some(frame) = stack.last_mut() {
        let (slot, next) = *frame;
        let Some(&dep) = lookup.deps[slot].get(next) else {
            stack.pop();
            continue;
        };
        frame.1 += 1;

        if dep == target {
            let mut path: Vec<usize> = stack.iter().map(|&(slot, _)| slot).collect();
            path.push(target);
            return Some(path);
        }
        if !visited[dep] {
            visited[dep] = true;
            stack.push((dep, 0));
        }
    }

    None
}
