//! # Graft
//!
//! Shallow-copy uniquification for multi-parent scene graphs.
//!
//! A scene that instances a subgraph lists the same nodes under several
//! parents. Graft turns such shared nodes into per-instance copies, either
//! for a single parent link, along one node path, or for everything below a
//! root, while geometry payload stays shared between the copies.
//!
//! ```rust,ignore
//! use graft::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.create_group("root");
//! let left = graph.create_group("left");
//! let right = graph.create_group("right");
//! let wheel = graph.create_group("wheel");
//! graph.add_child(root, left)?;
//! graph.add_child(root, right)?;
//! graph.add_child(left, wheel)?;
//! graph.add_child(right, wheel)?;
//!
//! let report = Uniquifier::default().run(&mut graph, root)?;
//! assert_eq!(report.copies, 1);
//! ```

pub use glam;

pub use graft_core::{GeometryKey, GraftError, NodeHandle, Result, errors};
pub use graft_scene as scene;
pub use graft_tools as tools;

pub use graft_scene::{
    Geometry, Node, NodeKind, NodePath, NodeVisitor, SceneGraph, TraversalMode, Visit,
    VisitContext, traverse,
};
pub use graft_tools::{
    GraphModel, PassState, Uniquifier, UniquifierSettings, UniquifyReport, find_shared_nodes,
    is_tree, uniquify, uniquify_graph, uniquify_parents, uniquify_path,
};

pub mod prelude {
    pub use crate::{
        Geometry, GraftError, GraphModel, NodeHandle, NodePath, SceneGraph, TraversalMode,
        Uniquifier, UniquifierSettings, uniquify, uniquify_graph, uniquify_parents, uniquify_path,
    };
}
