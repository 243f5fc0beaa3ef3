use std::ops::Index;

use glam::Affine3A;

use crate::graph::SceneGraph;
use crate::{GraftError, NodeHandle, Result};

/// An ordered chain of handles from an ancestor down to a target node.
///
/// A valid path has `path[i + 1]` among the children of `path[i]` for every
/// consecutive pair. Paths are plain values: editing the graph may make a
/// previously valid path stale, so call [`NodePath::validate`] before relying
/// on one that outlived a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    nodes: Vec<NodeHandle>,
}

impl NodePath {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: NodeHandle) {
        self.nodes.push(handle);
    }

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
    pub fn first(&self) -> Option<NodeHandle> {
        self.nodes.first().copied()
    }

    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<NodeHandle> {
        self.nodes.last().copied()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeHandle> {
        self.nodes.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.nodes.iter().copied()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[NodeHandle] {
        &self.nodes
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<NodeHandle> {
        self.nodes
    }

    /// Checks that the path is non-empty, that every handle is live and that
    /// each entry is a child of its predecessor.
    pub fn validate(&self, graph: &SceneGraph) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(GraftError::EmptyPath);
        }
        for &handle in &self.nodes {
            graph.node(handle)?;
        }
        for (index, pair) in self.nodes.windows(2).enumerate() {
            let (parent, child) = (pair[0], pair[1]);
            if !graph.children(parent)?.contains(&child) {
                return Err(GraftError::BrokenPath {
                    index: index + 1,
                    parent,
                    child,
                });
            }
        }
        Ok(())
    }

    /// Accumulated local transforms from the first entry to the last.
    ///
    /// Stale handles contribute the identity.
    #[must_use]
    pub fn local_to_world(&self, graph: &SceneGraph) -> Affine3A {
        self.nodes
            .iter()
            .filter_map(|&handle| graph.get_node(handle))
            .fold(Affine3A::IDENTITY, |world, node| world * node.transform)
    }
}

impl From<Vec<NodeHandle>> for NodePath {
    fn from(nodes: Vec<NodeHandle>) -> Self {
        Self { nodes }
    }
}

impl From<&[NodeHandle]> for NodePath {
    fn from(nodes: &[NodeHandle]) -> Self {
        Self {
            nodes: nodes.to_vec(),
        }
    }
}

impl FromIterator<NodeHandle> for NodePath {
    fn from_iter<I: IntoIterator<Item = NodeHandle>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for NodePath {
    type Output = NodeHandle;

    fn index(&self, index: usize) -> &NodeHandle {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a NodePath {
    type Item = NodeHandle;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeHandle>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}
