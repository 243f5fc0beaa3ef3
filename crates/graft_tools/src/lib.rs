//! Graft Tools
//!
//! Node uniquification: shallow copies that remove multiparenting while
//! leaving geometry shared.
//!
//! These tools are useful when a scene instances a subgraph but one instance
//! needs its own transform, visibility or name, and wrapping the instance is
//! not an option.
//!
//! - [`uniquify`]: give one parent its own copy of a shared child
//! - [`uniquify_parents`]: the same for several parents at once
//! - [`uniquify_path`]: make every node along a [`NodePath`](graft_scene::NodePath) unique
//! - [`Uniquifier`] / [`uniquify_graph`]: remove multiparenting from everything below a root
//! - [`find_shared_nodes`] / [`is_tree`]: inspect a graph before or after a pass

pub mod shared;
pub mod uniquifier;
pub mod uniquify;

pub use shared::{find_shared_nodes, is_tree};
pub use uniquifier::{
    GraphModel, PassState, Uniquifier, UniquifierSettings, UniquifyReport, uniquify_graph,
};
pub use uniquify::{uniquify, uniquify_parents, uniquify_path};
