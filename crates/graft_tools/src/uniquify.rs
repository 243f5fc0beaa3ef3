use graft_core::{GraftError, NodeHandle, Result};
use graft_scene::{NodePath, SceneGraph};

/// Gives `parent` its own shallow copy of `child`.
///
/// Every slot of `child` under `parent` is rewritten to one new copy, so a
/// parent that lists the child twice ends up listing the copy twice. Other
/// parents of `child` are untouched and keep the original.
///
/// Returns the handle of the copy. Fails with
/// [`GraftError::NotAChild`] when `parent` does not list `child`; the graph
/// is left unmodified on any error.
pub fn uniquify(graph: &mut SceneGraph, child: NodeHandle, parent: NodeHandle) -> Result<NodeHandle> {
    uniquify_parents(graph, child, &[parent])?
        .pop()
        .ok_or(GraftError::NotAChild { child, parent })
}

/// Gives each of `parents` its own shallow copy of `child`, in order.
///
/// Same as calling [`uniquify`] once per parent, but the original's parent
/// list is swept once, so the cost grows linearly with the number of
/// parents. Repeated entries in `parents` get a single copy.
pub fn uniquify_parents(
    graph: &mut SceneGraph,
    child: NodeHandle,
    parents: &[NodeHandle],
) -> Result<Vec<NodeHandle>> {
    let copies = graph.clone_for_parents(child, parents)?;
    log::trace!("uniquify: {child:?} -> {} copy(ies) for {} parent(s)", copies.len(), parents.len());
    Ok(copies)
}

/// Makes every node of `path` after the first unique to this path.
///
/// Each entry from index 1 is replaced by a copy attached under the already
/// rewritten predecessor, so the returned path is a fresh chain of copies
/// hanging off the original first node. The input path must be discarded.
///
/// The whole path is validated first; a malformed path changes nothing.
pub fn uniquify_path(graph: &mut SceneGraph, path: &NodePath) -> Result<NodePath> {
    path.validate(graph)?;

    let mut nodes = path.iter();
    let Some(first) = nodes.next() else {
        return Ok(NodePath::new());
    };

    let mut out = NodePath::new();
    out.push(first);
    let mut parent = first;
    for child in nodes {
        let copy = uniquify(graph, child, parent)?;
        out.push(copy);
        parent = copy;
    }
    Ok(out)
}
