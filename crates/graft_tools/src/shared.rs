use graft_core::{NodeHandle, Result};
use graft_scene::{SceneGraph, TraversalMode};
use rustc_hash::FxHashSet;

/// Reachable nodes below `root` that have more than one distinct parent.
///
/// Children are followed according to `mode`. Each node is reported at most
/// once, in depth-first order; the root is never reported.
pub fn find_shared_nodes(
    graph: &SceneGraph,
    root: NodeHandle,
    mode: TraversalMode,
) -> Result<Vec<NodeHandle>> {
    graph.node(root)?;

    let mut shared = Vec::new();
    let mut seen = FxHashSet::default();
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        let node = graph.node(current)?;
        if current != root && node.num_parents() > 1 {
            shared.push(current);
        }
        if mode == TraversalMode::None {
            continue;
        }
        for &child in node.children().iter().rev() {
            if graph.get_node(child).is_some_and(|c| mode.follows(c)) {
                stack.push(child);
            }
        }
    }
    Ok(shared)
}

/// Returns `true` when no node reachable from `root` is multiply parented.
pub fn is_tree(graph: &SceneGraph, root: NodeHandle, mode: TraversalMode) -> Result<bool> {
    find_shared_nodes(graph, root, mode).map(|shared| shared.is_empty())
}
