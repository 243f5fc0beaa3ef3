//! Whole-graph uniquification.
//!
//! [`Uniquifier`] is a [`NodeVisitor`] that removes multiparenting below a
//! root in one pass. Every reachable node is entered once; when it has more
//! than one distinct parent, the parent through which the traversal reached
//! it keeps the original and each other parent, in parent-list order, gets
//! its own shallow copy from [`uniquify_parents`].
//!
//! A copy carries the original's child list, so its children pick up an
//! extra parent. They are resolved in turn when the traversal reaches them.
//! The arrival parent has already been entered and owns a single parent of
//! its own, so an entered node never gains parents later in the pass. Once
//! the pass returns, every reachable node other than the root has exactly one
//! distinct parent and a second pass makes no copies.
//!
//! # Graph models
//!
//! Under [`GraphModel::Unified`] drawables are nodes like any other and are
//! copied when shared. [`GraphModel::Legacy`] treats drawables as payload of
//! their geode: geodes are uniquified but their drawables are neither
//! traversed nor copied, so a drawable shared by several geodes stays shared.

use graft_core::{NodeHandle, Result};
use graft_scene::{NodeVisitor, SceneGraph, TraversalMode, Visit, VisitContext, traverse};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::uniquify::uniquify_parents;

/// How drawable leaves take part in a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphModel {
    /// Drawables are nodes and are copied when shared.
    #[default]
    Unified,
    /// Drawables are geode payload and stay shared.
    Legacy,
}

/// Configuration for a [`Uniquifier`].
///
/// ```rust,ignore
/// let settings: UniquifierSettings =
///     serde_json::from_str(r#"{ "mode": "active_children", "model": "legacy" }"#)?;
/// let mut uniquifier = Uniquifier::with_settings(settings);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UniquifierSettings {
    pub mode: TraversalMode,
    pub model: GraphModel,
}

/// Counters for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UniquifyReport {
    /// Distinct nodes entered. Drawables are never entered under
    /// [`GraphModel::Legacy`], wherever they sit.
    pub visited: usize,
    /// Entered nodes that had more than one parent.
    pub shared: usize,
    /// Shallow copies created.
    pub copies: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassState {
    #[default]
    NotStarted,
    Visiting,
    Done,
}

#[derive(Debug, Default)]
pub struct Uniquifier {
    settings: UniquifierSettings,
    state: PassState,
    visited: FxHashSet<NodeHandle>,
    report: UniquifyReport,
}

impl Uniquifier {
    #[must_use]
    pub fn new(mode: TraversalMode) -> Self {
        Self::with_settings(UniquifierSettings {
            mode,
            ..Default::default()
        })
    }

    #[must_use]
    pub fn with_settings(settings: UniquifierSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &UniquifierSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PassState {
        self.state
    }

    /// Counters of the most recent pass.
    #[inline]
    #[must_use]
    pub fn report(&self) -> UniquifyReport {
        self.report
    }

    /// Runs one pass below `root`.
    ///
    /// The root itself is never copied, even if it has parents of its own.
    /// Errors from the graph abort the pass and are returned as is; copies
    /// made before the error remain in place.
    pub fn run(&mut self, graph: &mut SceneGraph, root: NodeHandle) -> Result<UniquifyReport> {
        let root_parents = graph.num_parents(root)?;

        self.visited.clear();
        self.report = UniquifyReport::default();
        self.state = PassState::Visiting;

        if root_parents > 0 {
            log::warn!("Uniquifier root {root:?} has {root_parents} parent(s); the root is left shared");
        }
        log::debug!(
            "Uniquifier pass started at {root:?} (mode: {:?}, model: {:?})",
            self.settings.mode,
            self.settings.model
        );

        let result = traverse(graph, root, self);
        self.state = PassState::Done;
        result?;

        log::debug!(
            "Uniquifier pass done: {} visited, {} shared, {} copies",
            self.report.visited,
            self.report.shared,
            self.report.copies
        );
        Ok(self.report)
    }

    /// Marks `node` entered and resolves its parents. Nodes already entered
    /// in this pass are pruned.
    fn enter(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeHandle,
        ctx: VisitContext,
    ) -> Result<Visit> {
        if !self.visited.insert(node) {
            return Ok(Visit::Prune);
        }
        self.report.visited += 1;

        if let Some(arrival) = ctx.parent {
            self.resolve_parents(graph, node, arrival)?;
        }
        Ok(Visit::Continue)
    }

    fn resolve_parents(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeHandle,
        arrival: NodeHandle,
    ) -> Result<()> {
        let parents = graph.distinct_parents(node)?;
        if parents.len() <= 1 {
            return Ok(());
        }
        self.report.shared += 1;

        let others: Vec<NodeHandle> = parents.into_iter().filter(|&p| p != arrival).collect();
        self.report.copies += uniquify_parents(graph, node, &others)?.len();
        Ok(())
    }
}

impl NodeVisitor for Uniquifier {
    fn traversal_mode(&self) -> TraversalMode {
        self.settings.mode
    }

    fn apply_node(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeHandle,
        ctx: VisitContext,
    ) -> Result<Visit> {
        self.enter(graph, node, ctx)
    }

    fn apply_geode(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeHandle,
        ctx: VisitContext,
    ) -> Result<Visit> {
        let visit = self.enter(graph, node, ctx)?;
        match self.settings.model {
            GraphModel::Unified => Ok(visit),
            GraphModel::Legacy => Ok(Visit::Prune),
        }
    }

    fn apply_drawable(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeHandle,
        ctx: VisitContext,
    ) -> Result<Visit> {
        match self.settings.model {
            GraphModel::Unified => self.enter(graph, node, ctx),
            // Payload, not a node of the pass.
            GraphModel::Legacy => Ok(Visit::Prune),
        }
    }
}

/// Runs a default [`Uniquifier`] pass (all children, unified model) below `root`.
pub fn uniquify_graph(graph: &mut SceneGraph, root: NodeHandle) -> Result<UniquifyReport> {
    Uniquifier::default().run(graph, root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_missing_fields() {
        let settings: UniquifierSettings =
            serde_json::from_str(r#"{ "model": "legacy" }"#).unwrap();
        assert_eq!(settings.mode, TraversalMode::AllChildren);
        assert_eq!(settings.model, GraphModel::Legacy);
    }

    #[test]
    fn state_moves_to_done() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root");

        let mut uniquifier = Uniquifier::default();
        assert_eq!(uniquifier.state(), PassState::NotStarted);

        uniquifier.run(&mut graph, root).unwrap();
        assert_eq!(uniquifier.state(), PassState::Done);
        assert_eq!(uniquifier.report().visited, 1);
    }

    #[test]
    fn stale_root_fails_pass() {
        let mut graph = SceneGraph::new();
        let mut other = SceneGraph::new();
        let foreign = other.create_group("x");

        let mut uniquifier = Uniquifier::default();
        assert_eq!(
            uniquifier.run(&mut graph, foreign),
            Err(graft_core::GraftError::NodeNotFound(foreign))
        );
        assert_eq!(uniquifier.state(), PassState::NotStarted);
    }
}
