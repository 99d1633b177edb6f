//! Physics module for ray-based hit detection
//!
//! Provides the geometric primitives used by the hit volume system.

pub mod collision;

pub use collision::{BoundingBox, Ray};
