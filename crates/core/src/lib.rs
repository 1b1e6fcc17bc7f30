//! Core types for quadra
//!
//! This crate provides the pieces shared by every other quadra crate:
//! the 3-vector helpers, the triangular surface panel type, and the common
//! error type.

pub mod errors;
pub mod geometry;

pub use errors::{Error, Result};
pub use geometry::{
    vec_cross, vec_distance, vec_norm, vec_scale_add, vec_sub, Panel, Vec3,
};
