//! FFI (Foreign Function Interface) layer for C bindings.
//!
//! This module provides C-compatible functions that can be called from
//! Python via cffi, or from any other language that supports C FFI.
//! Positional parameter arrays follow the order of
//! [`crate::model::ModelKind::parameter_names`].

pub mod curve;
pub mod model;
pub mod runtime;
pub mod types;

pub use curve::*;
pub use model::*;
pub use runtime::*;
pub use types::*;
