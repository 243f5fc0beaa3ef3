//! Graft Core
//!
//! Foundational types shared by every Graft crate:
//! - [`NodeHandle`] / [`GeometryKey`]: stable arena keys
//! - [`GraftError`] / [`Result`]: the error taxonomy

pub mod errors;

use slotmap::new_key_type;

new_key_type! {
    /// Identity of a scene node. A shallow copy always receives a fresh handle.
    pub struct NodeHandle;
    /// Key of a shared geometry payload.
    pub struct GeometryKey;
}

pub use errors::{GraftError, Result};
