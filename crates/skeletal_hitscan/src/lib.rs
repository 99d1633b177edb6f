//! # Skeletal Hitscan
//!
//! Ray tests against animated characters, reporting which body region was
//! hit.
//!
//! ## Features
//!
//! - **Two-phase testing**: one outer box per character culls most rays
//! - **Bone-attached volumes**: boxes follow joints without being moved
//! - **Rig-agnostic binding**: joint names from Mixamo, Unreal, Biped and
//!   hand-made rigs resolve onto the same body regions
//! - **Graceful degradation**: partial or missing skeletons still get hit
//!   volumes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skeletal_hitscan::prelude::*;
//!
//! let rig = HumanoidRig::default();
//! let character = RiggedCharacter::from_rig(&rig, Transform::identity()).unwrap();
//! let mut volumes = HitVolumeSet::build(&character, &HitboxConfig::default());
//!
//! let mut clock = StepClock::new(1.0 / 60.0);
//! let step = clock.advance();
//! volumes.update(&character);
//!
//! let ray = Ray::new(Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
//! if let Some(hit) = volumes.intersect_ray(&character, &ray, step) {
//!     println!("hit {} at {:?}", hit.region, hit.point);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod character;
pub mod config;
pub mod debug;
pub mod error;
pub mod foundation;
pub mod hitbox;
pub mod physics;
pub mod skeleton;

pub use error::HitboxError;

/// Common imports for users of the crate
pub mod prelude {
    pub use crate::{
        character::{Character, RiggedCharacter},
        config::{Config, ConfigError, HitboxConfig},
        debug::{HitboxDebugVisualizer, RegionReport},
        error::HitboxError,
        foundation::{
            math::{Mat4, Transform, Vec3},
            time::{SimulationStep, StepClock},
        },
        hitbox::{BodyRegion, HitVolumeMode, HitVolumeSet, RayHit},
        physics::{BoundingBox, Ray},
        skeleton::{HumanoidRig, RigNaming, Skeleton},
    };
}
