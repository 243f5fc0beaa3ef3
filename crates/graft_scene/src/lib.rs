//! Graft Scene
//!
//! A multi-parent scene graph and its traversal engine:
//! - [`Node`] / [`NodeKind`]: group, geode and drawable nodes
//! - [`Geometry`]: shared leaf payload, never duplicated
//! - [`SceneGraph`]: the arena owning nodes and geometry
//! - [`NodePath`]: a root-to-target chain of handles
//! - [`NodeVisitor`] / [`traverse`]: explicit-stack depth-first dispatch

pub mod geometry;
pub mod graph;
pub mod node;
pub mod path;
pub mod visitor;

pub use geometry::Geometry;
pub use graph::SceneGraph;
pub use node::{Node, NodeKind};
pub use path::NodePath;
pub use visitor::{NodeVisitor, TraversalMode, Visit, VisitContext, traverse};

pub use graft_core::{GeometryKey, GraftError, NodeHandle, Result};
