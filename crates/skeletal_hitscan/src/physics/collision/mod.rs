//! Collision primitives for hitscan tests
//!
//! # Architecture
//!
//! Bounding volumes are stored in the space they were authored in
//! (character-local or bind space) and rays are carried into that space
//! for testing, rather than moving the volumes into world space.
//!
//! - [`Ray`] - origin plus normalized direction
//! - [`BoundingBox`] - axis-aligned box with slab intersection

pub mod primitives;

pub use primitives::{BoundingBox, Ray};
