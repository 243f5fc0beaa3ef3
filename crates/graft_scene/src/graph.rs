//! Scene graph arena.
//!
//! [`SceneGraph`] owns every node and every geometry payload. Edges are
//! stored as handle lists on both ends (children on the parent, parent
//! entries on the child) and are only edited through the methods here, which
//! keep the two sides in sync.
//!
//! The graph must stay acyclic: [`SceneGraph::add_child`] and
//! [`SceneGraph::replace_child`] reject edges that would close a cycle.

use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::geometry::Geometry;
use crate::node::{Node, NodeKind};
use crate::path::NodePath;
use crate::{GeometryKey, GraftError, NodeHandle, Result};

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeHandle, Node>,
    geometries: SlotMap<GeometryKey, Geometry>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Geometry Pool
    // ========================================================================

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryKey {
        self.geometries.insert(geometry)
    }

    #[must_use]
    pub fn geometry(&self, key: GeometryKey) -> Option<&Geometry> {
        self.geometries.get(key)
    }

    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    // ========================================================================
    // Node Creation
    // ========================================================================

    /// Inserts a detached node. Any edges carried by `node` are dropped.
    pub fn add_node(&mut self, mut node: Node) -> NodeHandle {
        node.parents.clear();
        node.children.clear();
        self.nodes.insert(node)
    }

    pub fn create_group(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::group(name))
    }

    pub fn create_geode(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::geode(name))
    }

    pub fn create_drawable(&mut self, name: &str, geometry: GeometryKey) -> NodeHandle {
        self.add_node(Node::drawable(name, geometry))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Number of live nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    /// Mutable access to per-instance state. Edges stay read-only.
    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    /// Like [`get_node`](Self::get_node) but reports stale handles as errors.
    pub fn node(&self, handle: NodeHandle) -> Result<&Node> {
        self.nodes.get(handle).ok_or(GraftError::NodeNotFound(handle))
    }

    pub fn children(&self, handle: NodeHandle) -> Result<&[NodeHandle]> {
        self.node(handle).map(Node::children)
    }

    pub fn parents(&self, handle: NodeHandle) -> Result<&[NodeHandle]> {
        self.node(handle).map(Node::parents)
    }

    pub fn distinct_parents(&self, handle: NodeHandle) -> Result<SmallVec<[NodeHandle; 2]>> {
        self.node(handle).map(Node::distinct_parents)
    }

    pub fn num_parents(&self, handle: NodeHandle) -> Result<usize> {
        self.node(handle).map(Node::num_parents)
    }

    /// Returns `true` if `candidate` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, candidate: NodeHandle, node: NodeHandle) -> bool {
        let mut seen = FxHashSet::default();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if current == candidate {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(n) = self.nodes.get(current) {
                stack.extend(n.parents.iter().copied());
            }
        }
        false
    }

    // ========================================================================
    // Edge Editing
    // ========================================================================

    /// Appends `child` to `parent`'s child list.
    ///
    /// Multiparenting is allowed, as is listing the same child more than
    /// once under one parent.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        self.check_attachable(parent, child)?;

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parents.push(parent);
        }
        Ok(())
    }

    /// Removes every slot of `child` under `parent`. Returns the number of
    /// slots removed.
    pub fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<usize> {
        let removed = self.count_slots(parent, child)?;

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parents.retain(|p| *p != parent);
        }
        Ok(removed)
    }

    /// Rewrites every slot of `old` under `parent` to `new`, keeping slot
    /// positions. Returns the number of slots rewritten.
    ///
    /// Nothing is modified when an error is returned.
    pub fn replace_child(
        &mut self,
        parent: NodeHandle,
        old: NodeHandle,
        new: NodeHandle,
    ) -> Result<usize> {
        let replaced = self.count_slots(parent, old)?;
        if old == new {
            return Ok(replaced);
        }
        self.check_attachable(parent, new)?;

        if let Some(p) = self.nodes.get_mut(parent) {
            for slot in p.children.iter_mut().filter(|slot| **slot == old) {
                *slot = new;
            }
        }
        if let Some(o) = self.nodes.get_mut(old) {
            o.parents.retain(|p| *p != parent);
        }
        if let Some(n) = self.nodes.get_mut(new) {
            n.parents.extend(std::iter::repeat_n(parent, replaced));
        }
        Ok(replaced)
    }

    /// Creates a shallow copy of `handle`.
    ///
    /// The copy has a new identity and no parents. It carries the same name,
    /// kind, transform, visibility and child list; every child gains the copy
    /// as an additional parent. Geometry keys are copied, not the payload.
    pub fn shallow_clone(&mut self, handle: NodeHandle) -> Result<NodeHandle> {
        let copy = self.node(handle)?.detached_copy();

        let children = copy.children.clone();
        let new_handle = self.nodes.insert(copy);
        for child in children {
            if let Some(c) = self.nodes.get_mut(child) {
                c.parents.push(new_handle);
            }
        }
        Ok(new_handle)
    }

    /// Gives each of `parents` its own shallow copy of `handle`.
    ///
    /// Every slot of `handle` under a listed parent is rewritten to that
    /// parent's copy, keeping slot positions, and the listed parents are
    /// dropped from `handle` in one sweep. Repeated entries in `parents` are
    /// ignored. Returns the copies in the order of `parents`.
    ///
    /// Every parent is checked before anything is modified.
    pub fn clone_for_parents(
        &mut self,
        handle: NodeHandle,
        parents: &[NodeHandle],
    ) -> Result<Vec<NodeHandle>> {
        let mut rewired = FxHashSet::default();
        let mut targets = Vec::with_capacity(parents.len());
        for &parent in parents {
            let slots = self.count_slots(parent, handle)?;
            if rewired.insert(parent) {
                targets.push((parent, slots));
            }
        }

        // A copy lists the same children as `handle` under a parent that
        // already reaches them, so no cycle check is needed.
        let template = self.node(handle)?.detached_copy();
        let mut copies = Vec::with_capacity(targets.len());
        for (parent, slots) in targets {
            let mut copy = template.clone();
            copy.parents.extend(std::iter::repeat_n(parent, slots));
            let copy = self.nodes.insert(copy);

            for &child in &template.children {
                if let Some(c) = self.nodes.get_mut(child) {
                    c.parents.push(copy);
                }
            }
            if let Some(p) = self.nodes.get_mut(parent) {
                for slot in p.children.iter_mut().filter(|slot| **slot == handle) {
                    *slot = copy;
                }
            }
            copies.push(copy);
        }

        if let Some(o) = self.nodes.get_mut(handle) {
            o.parents.retain(|p| !rewired.contains(p));
        }
        Ok(copies)
    }

    /// Number of slots of `child` under `parent`.
    ///
    /// Zero slots is reported as [`GraftError::NotAChild`].
    pub fn count_slots(&self, parent: NodeHandle, child: NodeHandle) -> Result<usize> {
        let p = self.node(parent)?;
        self.node(child)?;

        if !p.is_group_like() {
            return Err(GraftError::NotAGroup(parent));
        }
        match p.children.iter().filter(|&&c| c == child).count() {
            0 => Err(GraftError::NotAChild { child, parent }),
            n => Ok(n),
        }
    }

    /// Removes a parentless node, then every child left without parents,
    /// recursively. Returns the number of nodes removed.
    ///
    /// Geometry is never removed. Fails with
    /// [`GraftError::StillReferenced`] if `handle` still has a parent.
    pub fn release(&mut self, handle: NodeHandle) -> Result<usize> {
        if !self.node(handle)?.parents.is_empty() {
            return Err(GraftError::StillReferenced(handle));
        }

        let mut removed = 0;
        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            removed += 1;
            for child in node.children {
                if let Some(c) = self.nodes.get_mut(child) {
                    c.parents.retain(|p| *p != current);
                    if c.parents.is_empty() {
                        stack.push(child);
                    }
                }
            }
        }
        log::trace!("released {removed} node(s) starting at {handle:?}");
        Ok(removed)
    }

    // ========================================================================
    // Paths & Reachability
    // ========================================================================

    /// Every path from a parentless ancestor down to `handle`.
    ///
    /// Paths are produced depth-first in distinct-parent order, so the first
    /// path always follows each node's first parent.
    pub fn parental_node_paths(&self, handle: NodeHandle) -> Result<Vec<NodePath>> {
        self.node(handle)?;

        let mut paths = Vec::new();
        // Chains run from `handle` upward and are reversed once complete.
        let mut stack: Vec<Vec<NodeHandle>> = vec![vec![handle]];
        while let Some(mut chain) = stack.pop() {
            let Some(&top) = chain.last() else {
                continue;
            };
            let parents = self
                .nodes
                .get(top)
                .map(Node::distinct_parents)
                .unwrap_or_default();

            if parents.is_empty() {
                chain.reverse();
                paths.push(NodePath::from(chain));
                continue;
            }
            for &parent in parents.iter().rev() {
                let mut next = chain.clone();
                next.push(parent);
                stack.push(next);
            }
        }
        Ok(paths)
    }

    /// All nodes reachable from `root` through child edges, `root` included.
    pub fn reachable_from(&self, root: NodeHandle) -> Result<FxHashSet<NodeHandle>> {
        self.node(root)?;

        let mut seen = FxHashSet::default();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(n) = self.nodes.get(current) {
                stack.extend(n.children.iter().copied());
            }
        }
        Ok(seen)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn check_attachable(&self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        let p = self.node(parent)?;
        let c = self.node(child)?;

        if !p.is_group_like() {
            return Err(GraftError::NotAGroup(parent));
        }
        if p.kind == NodeKind::Geode && !c.is_drawable() {
            return Err(GraftError::InvalidChild { parent, child });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(GraftError::CycleDetected { parent, child });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(graph: &mut SceneGraph) -> GeometryKey {
        graph.add_geometry(Geometry::new("cube"))
    }

    #[test]
    fn add_child_links_both_sides() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root");
        let a = graph.create_group("a");

        graph.add_child(root, a).unwrap();

        assert_eq!(graph.children(root).unwrap(), &[a]);
        assert_eq!(graph.parents(a).unwrap(), &[root]);
    }

    #[test]
    fn add_child_rejects_self_and_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.create_group("a");
        let b = graph.create_group("b");
        graph.add_child(a, b).unwrap();

        assert_eq!(
            graph.add_child(a, a),
            Err(GraftError::CycleDetected { parent: a, child: a })
        );
        assert_eq!(
            graph.add_child(b, a),
            Err(GraftError::CycleDetected { parent: b, child: a })
        );
    }

    #[test]
    fn drawables_hold_no_children() {
        let mut graph = SceneGraph::new();
        let key = cube(&mut graph);
        let leaf = graph.create_drawable("leaf", key);
        let group = graph.create_group("g");

        assert_eq!(graph.add_child(leaf, group), Err(GraftError::NotAGroup(leaf)));
    }

    #[test]
    fn geodes_only_hold_drawables() {
        let mut graph = SceneGraph::new();
        let geode = graph.create_geode("geode");
        let group = graph.create_group("g");

        assert_eq!(
            graph.add_child(geode, group),
            Err(GraftError::InvalidChild { parent: geode, child: group })
        );

        let key = cube(&mut graph);
        let leaf = graph.create_drawable("leaf", key);
        assert!(graph.add_child(geode, leaf).is_ok());
    }

    #[test]
    fn repeated_slots_count_as_one_parent() {
        let mut graph = SceneGraph::new();
        let p = graph.create_group("p");
        let c = graph.create_group("c");
        graph.add_child(p, c).unwrap();
        graph.add_child(p, c).unwrap();

        assert_eq!(graph.parents(c).unwrap().len(), 2);
        assert_eq!(graph.num_parents(c).unwrap(), 1);
    }

    #[test]
    fn remove_child_drops_every_slot() {
        let mut graph = SceneGraph::new();
        let p = graph.create_group("p");
        let c = graph.create_group("c");
        let d = graph.create_group("d");
        graph.add_child(p, c).unwrap();
        graph.add_child(p, d).unwrap();
        graph.add_child(p, c).unwrap();

        assert_eq!(graph.remove_child(p, c), Ok(2));
        assert_eq!(graph.children(p).unwrap(), &[d]);
        assert!(graph.parents(c).unwrap().is_empty());
        assert_eq!(
            graph.remove_child(p, c),
            Err(GraftError::NotAChild { child: c, parent: p })
        );
    }

    #[test]
    fn replace_child_keeps_positions() {
        let mut graph = SceneGraph::new();
        let p = graph.create_group("p");
        let a = graph.create_group("a");
        let b = graph.create_group("b");
        let n = graph.create_group("n");
        graph.add_child(p, a).unwrap();
        graph.add_child(p, b).unwrap();
        graph.add_child(p, a).unwrap();

        assert_eq!(graph.replace_child(p, a, n), Ok(2));
        assert_eq!(graph.children(p).unwrap(), &[n, b, n]);
        assert_eq!(graph.parents(n).unwrap(), &[p, p]);
        assert!(graph.parents(a).unwrap().is_empty());
    }

    #[test]
    fn release_cascades_to_orphaned_children() {
        let mut graph = SceneGraph::new();
        let top = graph.create_group("top");
        let kept = graph.create_group("kept");
        let a = graph.create_group("a");
        let b = graph.create_group("b");
        graph.add_child(top, a).unwrap();
        graph.add_child(top, b).unwrap();
        graph.add_child(kept, b).unwrap();

        assert_eq!(graph.release(a), Err(GraftError::StillReferenced(a)));
        assert_eq!(graph.release(top), Ok(2));
        assert!(graph.contains(b));
        assert_eq!(graph.parents(b).unwrap(), &[kept]);
    }

    #[test]
    fn shallow_clone_shares_children_and_geometry() {
        let mut graph = SceneGraph::new();
        let key = cube(&mut graph);
        let geode = graph.create_geode("geode");
        let leaf = graph.create_drawable("leaf", key);
        graph.add_child(geode, leaf).unwrap();

        let copy = graph.shallow_clone(geode).unwrap();
        assert_ne!(copy, geode);
        assert_eq!(graph.children(copy).unwrap(), &[leaf]);
        assert_eq!(graph.distinct_parents(leaf).unwrap().as_slice(), &[geode, copy]);
        assert!(graph.parents(copy).unwrap().is_empty());

        let leaf_copy = graph.shallow_clone(leaf).unwrap();
        assert_eq!(graph.get_node(leaf_copy).unwrap().geometry(), Some(key));
        assert_eq!(graph.geometry_count(), 1);
    }

    #[test]
    fn clone_for_parents_rewires_each_listed_parent() {
        let mut graph = SceneGraph::new();
        let p = graph.create_group("p");
        let q = graph.create_group("q");
        let r = graph.create_group("r");
        let s = graph.create_group("s");
        let leaf = graph.create_group("leaf");
        graph.add_child(s, leaf).unwrap();
        graph.add_child(p, s).unwrap();
        graph.add_child(p, s).unwrap();
        graph.add_child(q, s).unwrap();
        graph.add_child(r, s).unwrap();

        let copies = graph.clone_for_parents(s, &[p, r, p]).unwrap();

        assert_eq!(copies.len(), 2);
        let (sp, sr) = (copies[0], copies[1]);
        assert_eq!(graph.children(p).unwrap(), &[sp, sp]);
        assert_eq!(graph.children(r).unwrap(), &[sr]);
        assert_eq!(graph.parents(sp).unwrap(), &[p, p]);
        assert_eq!(graph.parents(sr).unwrap(), &[r]);
        assert_eq!(graph.parents(s).unwrap(), &[q]);
        assert_eq!(graph.parents(leaf).unwrap(), &[s, sp, sr]);
    }

    #[test]
    fn clone_for_parents_checks_every_parent_first() {
        let mut graph = SceneGraph::new();
        let p = graph.create_group("p");
        let stranger = graph.create_group("stranger");
        let s = graph.create_group("s");
        graph.add_child(p, s).unwrap();
        let before = graph.len();

        assert_eq!(
            graph.clone_for_parents(s, &[p, stranger]),
            Err(GraftError::NotAChild { child: s, parent: stranger })
        );
        assert_eq!(graph.len(), before);
        assert_eq!(graph.children(p).unwrap(), &[s]);
    }

    #[test]
    fn num_parents_counts_distinct_entries() {
        let mut graph = SceneGraph::new();
        let p = graph.create_group("p");
        let q = graph.create_group("q");
        let s = graph.create_group("s");
        assert_eq!(graph.num_parents(s).unwrap(), 0);

        graph.add_child(p, s).unwrap();
        graph.add_child(p, s).unwrap();
        assert_eq!(graph.num_parents(s).unwrap(), 1);

        graph.add_child(q, s).unwrap();
        graph.add_child(p, s).unwrap();
        assert_eq!(graph.num_parents(s).unwrap(), 2);
        assert_eq!(graph.distinct_parents(s).unwrap().as_slice(), &[p, q]);
    }

    #[test]
    fn iter_visits_every_live_node() {
        let mut graph = SceneGraph::new();
        let key = cube(&mut graph);
        let root = graph.create_group("root");
        let leaf = graph.create_drawable("leaf", key);
        graph.add_child(root, leaf).unwrap();
        let orphan = graph.create_group("orphan");
        graph.release(orphan).unwrap();

        let mut names: Vec<&str> = graph.iter().map(|(_, node)| node.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["leaf", "root"]);
        assert!(graph.iter().any(|(h, n)| h == leaf && n.is_drawable()));
    }
}
