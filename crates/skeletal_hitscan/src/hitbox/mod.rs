//! Hit volumes for animated characters
//!
//! - [`region`] - body region identities
//! - [`bounds_builder`] - binds the region table to a skeleton
//! - [`bind_cache`] - per-step inverse joint transforms
//! - [`volume_set`] - broad and narrow phase ray tests

pub mod bind_cache;
pub mod bounds_builder;
pub mod region;
pub mod volume_set;

#[cfg(test)]
mod tests;

pub use bind_cache::{BindSpaceCache, JointSpace};
pub use bounds_builder::{default_region_shapes, BoundsBuilder, InnerHitboxSpec, RegionShape};
pub use region::{BodyRegion, RegionSet};
pub use volume_set::{
    HitTestStats, HitVolumeMode, HitVolumeSet, HitVolumes, InnerHitbox, OuterHitbox, RayHit,
};
