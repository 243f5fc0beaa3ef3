//! Depth-first traversal engine.
//!
//! [`traverse`] walks the graph below a root with an explicit stack and
//! dispatches every reached node to a [`NodeVisitor`] hook chosen by the
//! node's kind. Hooks receive `&mut SceneGraph` and may rewrite child slots
//! while the traversal is running.
//!
//! # Slots
//!
//! The stack holds child SLOTS (`parent`, `index`) rather than handles. A slot
//! is resolved when it is popped, so if a hook replaced the occupant of a slot
//! after it was pushed, the traversal visits the replacement.
//!
//! There is no visited guard at this level: a node listed by several reached
//! parents is dispatched once per slot. Visitors that need once-per-node
//! semantics keep their own set.

use serde::{Deserialize, Serialize};

use crate::graph::SceneGraph;
use crate::node::{Node, NodeKind};
use crate::{GraftError, NodeHandle, Result};

/// Which child edges a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    /// Visit the root only.
    None,
    /// Follow every child slot.
    #[default]
    AllChildren,
    /// Follow only children whose `visible` flag is set.
    ActiveChildren,
}

impl TraversalMode {
    #[inline]
    #[must_use]
    pub fn follows(self, child: &Node) -> bool {
        match self {
            Self::None => false,
            Self::AllChildren => true,
            Self::ActiveChildren => child.visible,
        }
    }
}

/// What the traversal does after a hook returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's current children.
    Continue,
    /// Skip the node's subtree.
    Prune,
}

/// Where a node was reached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitContext {
    /// The parent whose slot led here; `None` for the traversal root.
    pub parent: Option<NodeHandle>,
    /// Distance from the root.
    pub depth: usize,
}

/// Per-kind hooks invoked by [`traverse`].
///
/// The defaults chain drawable → node and geode → group → node, with
/// `apply_node` continuing into children. Override the narrowest hook that
/// covers the behaviour you need.
pub trait NodeVisitor {
    fn traversal_mode(&self) -> TraversalMode {
        TraversalMode::AllChildren
    }

    fn apply_node(
        &mut self,
        _graph: &mut SceneGraph,
        _node: NodeHandle,
        _ctx: VisitContext,
    ) -> Result<Visit> {
        Ok(Visit::Continue)
    }

    fn apply_group(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeHandle,
        ctx: VisitContext,
    ) -> Result<Visit> {
        self.apply_node(graph, node, ctx)
    }

    fn apply_geode(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeHandle,
        ctx: VisitContext,
    ) -> Result<Visit> {
        self.apply_group(graph, node, ctx)
    }

    fn apply_drawable(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeHandle,
        ctx: VisitContext,
    ) -> Result<Visit> {
        self.apply_node(graph, node, ctx)
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    parent: NodeHandle,
    index: usize,
    depth: usize,
}

/// Runs `visitor` over every node reachable from `root`, depth-first, with
/// children in list order.
///
/// The first error returned by a hook aborts the traversal and is returned.
pub fn traverse<V: NodeVisitor + ?Sized>(
    graph: &mut SceneGraph,
    root: NodeHandle,
    visitor: &mut V,
) -> Result<()> {
    graph.node(root)?;

    let mode = visitor.traversal_mode();
    let mut stack: Vec<Slot> = Vec::with_capacity(64);

    let root_ctx = VisitContext {
        parent: None,
        depth: 0,
    };
    if dispatch(graph, visitor, root, root_ctx)? == Visit::Continue {
        push_children(graph, root, 0, mode, &mut stack);
    }

    while let Some(Slot { parent, index, depth }) = stack.pop() {
        // Hooks may shrink a child list; vanished slots are skipped.
        let Some(&node) = graph.get_node(parent).and_then(|p| p.children().get(index)) else {
            continue;
        };
        if !graph.get_node(node).is_some_and(|n| mode.follows(n)) {
            continue;
        }

        let ctx = VisitContext {
            parent: Some(parent),
            depth,
        };
        if dispatch(graph, visitor, node, ctx)? == Visit::Continue {
            push_children(graph, node, depth, mode, &mut stack);
        }
    }
    Ok(())
}

fn dispatch<V: NodeVisitor + ?Sized>(
    graph: &mut SceneGraph,
    visitor: &mut V,
    node: NodeHandle,
    ctx: VisitContext,
) -> Result<Visit> {
    let kind = graph
        .get_node(node)
        .map(Node::kind)
        .ok_or(GraftError::NodeNotFound(node))?;

    match kind {
        NodeKind::Group => visitor.apply_group(graph, node, ctx),
        NodeKind::Geode => visitor.apply_geode(graph, node, ctx),
        NodeKind::Drawable(_) => visitor.apply_drawable(graph, node, ctx),
    }
}

fn push_children(
    graph: &SceneGraph,
    node: NodeHandle,
    depth: usize,
    mode: TraversalMode,
    stack: &mut Vec<Slot>,
) {
    if mode == TraversalMode::None {
        return;
    }
    let count = graph.get_node(node).map_or(0, |n| n.children().len());
    // Reversed so the first child is popped first.
    stack.extend((0..count).rev().map(|index| Slot {
        parent: node,
        index,
        depth: depth + 1,
    }));
}
