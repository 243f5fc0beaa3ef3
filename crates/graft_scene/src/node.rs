use glam::Affine3A;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{GeometryKey, NodeHandle};

/// The structural role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Structural node with an ordered child list.
    Group,
    /// Geometry container. Behaves as a group whose children are drawables.
    Geode,
    /// Leaf referencing shared geometry. Holds no children.
    Drawable(GeometryKey),
}

/// A scene node.
///
/// # Hierarchy
///
/// Unlike a strict tree, a node may be listed by several parents:
/// - `parents`: one entry per child slot that references this node, so a
///   parent listing the node twice appears twice
/// - `children`: ordered child handles (empty for drawables)
///
/// Both lists are kept in sync by [`SceneGraph`](crate::SceneGraph); they are
/// read-only from outside the crate.
///
/// # Copies
///
/// `Clone` duplicates per-instance state (name, transform, visibility) and
/// the child handle list. Geometry is referenced by key and stays shared.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub(crate) kind: NodeKind,
    /// Local transform relative to the parent.
    pub transform: Affine3A,
    /// Followed by `TraversalMode::ActiveChildren` only when set.
    pub visible: bool,

    pub(crate) parents: SmallVec<[NodeHandle; 2]>,
    pub(crate) children: Vec<NodeHandle>,
}

impl Node {
    #[must_use]
    pub fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            transform: Affine3A::IDENTITY,
            visible: true,
            parents: SmallVec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn group(name: &str) -> Self {
        Self::new(name, NodeKind::Group)
    }

    #[must_use]
    pub fn geode(name: &str) -> Self {
        Self::new(name, NodeKind::Geode)
    }

    #[must_use]
    pub fn drawable(name: &str, geometry: GeometryKey) -> Self {
        Self::new(name, NodeKind::Drawable(geometry))
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Affine3A) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns `true` for nodes that may hold children.
    #[inline]
    #[must_use]
    pub fn is_group_like(&self) -> bool {
        matches!(self.kind, NodeKind::Group | NodeKind::Geode)
    }

    #[inline]
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        matches!(self.kind, NodeKind::Drawable(_))
    }

    /// Returns the geometry key for drawables.
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> Option<GeometryKey> {
        match self.kind {
            NodeKind::Drawable(key) => Some(key),
            _ => None,
        }
    }

    /// Child slots, in order. A handle may appear more than once.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Parent entries, one per referencing child slot.
    #[inline]
    #[must_use]
    pub fn parents(&self) -> &[NodeHandle] {
        &self.parents
    }

    /// Parents in first-seen order with repeats removed.
    #[must_use]
    pub fn distinct_parents(&self) -> SmallVec<[NodeHandle; 2]> {
        let mut seen = FxHashSet::default();
        self.parents.iter().copied().filter(|p| seen.insert(*p)).collect()
    }

    /// Number of distinct parents.
    #[must_use]
    pub fn num_parents(&self) -> usize {
        match self.parents.split_first() {
            None => 0,
            Some((first, rest)) if rest.iter().all(|p| p == first) => 1,
            Some(_) => self.distinct_parents().len(),
        }
    }

    /// Per-instance state and child list without any parent entries.
    pub(crate) fn detached_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            transform: self.transform,
            visible: self.visible,
            parents: SmallVec::new(),
            children: self.children.clone(),
        }
    }
}
