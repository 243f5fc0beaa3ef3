//! Error Types
//!
//! This module defines the error types used throughout the Graft crates.
//!
//! # Overview
//!
//! [`GraftError`] covers the precondition violations a caller can trigger:
//! - Stale handles and wrong node kinds
//! - Child/parent relations that do not hold
//! - Edges that would turn the graph cyclic
//! - Malformed node paths
//!
//! All fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, GraftError>`. An operation that fails leaves the
//! graph exactly as it found it.

use thiserror::Error;

use crate::NodeHandle;

/// The main error type for the Graft crates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraftError {
    // ========================================================================
    // Handle & Kind Errors
    // ========================================================================
    /// The handle does not name a live node in this graph.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// The node cannot hold children.
    #[error("Node {0:?} is not a group")]
    NotAGroup(NodeHandle),

    /// The parent does not accept this kind of child (geodes only hold drawables).
    #[error("Node {child:?} cannot be a child of {parent:?}")]
    InvalidChild {
        /// The container that rejected the child
        parent: NodeHandle,
        /// The rejected child
        child: NodeHandle,
    },

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// `parent` does not list `child` among its children.
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The node that was expected under `parent`
        child: NodeHandle,
        /// The group that was searched
        parent: NodeHandle,
    },

    /// The node is still listed by a parent and cannot be released.
    #[error("Node {0:?} is still referenced by a parent")]
    StillReferenced(NodeHandle),

    /// Attaching `child` under `parent` would create a cycle.
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// The group that would receive the child
        parent: NodeHandle,
        /// The node that is already an ancestor of `parent`
        child: NodeHandle,
    },

    // ========================================================================
    // Node Path Errors
    // ========================================================================
    /// The node path contains no nodes.
    #[error("Node path is empty")]
    EmptyPath,

    /// `path[index]` is not a child of `path[index - 1]`.
    #[error("Node path broken at index {index}: {child:?} is not a child of {parent:?}")]
    BrokenPath {
        /// Position of the offending entry
        index: usize,
        /// The entry at `index - 1`
        parent: NodeHandle,
        /// The entry at `index`
        child: NodeHandle,
    },
}

/// Alias for `Result<T, GraftError>`.
pub type Result<T> = std::result::Result<T, GraftError>;

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn handle(n: u64) -> NodeHandle {
        NodeHandle::from(KeyData::from_ffi(n))
    }

    #[test]
    fn broken_path_message_names_index() {
        let err = GraftError::BrokenPath {
            index: 2,
            parent: handle(1),
            child: handle(2),
        };
        assert!(err.to_string().contains("index 2"));
    }

    #[test]
    fn errors_compare_by_value() {
        let a = GraftError::NotAChild { child: handle(3), parent: handle(4) };
        let b = GraftError::NotAChild { child: handle(3), parent: handle(4) };
        assert_eq!(a, b);
        assert_ne!(a, GraftError::EmptyPath);
    }
}
