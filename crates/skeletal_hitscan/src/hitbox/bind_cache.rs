//! Per-step cache of inverse joint world transforms
//!
//! Every inner hitbox test needs the inverse of its joint's current world
//! transform. Inverting a 4x4 is the expensive part of a narrow-phase test,
//! and several rays can hit the same character in one step, so the inverse
//! is computed at most once per joint per simulation step.

use std::collections::HashMap;

use crate::error::HitboxError;
use crate::foundation::math::Mat4;
use crate::foundation::time::SimulationStep;
use crate::skeleton::{JointRef, Skeleton};

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    step: SimulationStep,
    space: JointSpace,
}

/// A joint's world transform for one step, paired with its inverse
///
/// For a non-invertible transform both matrices are the identity, so a
/// point carried through `inverse_world` and back through `world` always
/// lands where it started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSpace {
    /// Joint to world
    pub world: Mat4,
    /// World to joint
    pub inverse_world: Mat4,
}

/// Inverse world matrices keyed by joint, valid for one step each
#[derive(Debug, Default)]
pub struct BindSpaceCache {
    entries: HashMap<JointRef, CacheEntry>,
    inversions: u64,
    degenerate: u64,
}

impl BindSpaceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Inverse of the joint's world transform for `step`
    ///
    /// The first request for a joint in a step inverts the skeleton's
    /// current world transform and overwrites whatever was cached for an
    /// earlier step; later requests in the same step return the cached
    /// matrix untouched. A non-invertible transform caches the identity for
    /// the step and logs a warning. Returns `None` if the reference is stale.
    pub fn inverse_world(
        &mut self,
        skeleton: &Skeleton,
        joint: JointRef,
        step: SimulationStep,
    ) -> Option<Mat4> {
        self.joint_space(skeleton, joint, step)
            .map(|space| space.inverse_world)
    }

    /// World transform and inverse used for the joint during `step`
    ///
    /// Same caching as [`Self::inverse_world`]. When the transform is
    /// degenerate, `world` is the identity as well.
    pub fn joint_space(
        &mut self,
        skeleton: &Skeleton,
        joint: JointRef,
        step: SimulationStep,
    ) -> Option<JointSpace> {
        if let Some(entry) = self.entries.get(&joint) {
            if entry.step == step {
                return Some(entry.space);
            }
        }

        let world = skeleton.world_transform(joint)?;
        self.inversions += 1;
        let space = match world.try_inverse() {
            Some(inverse_world) => JointSpace { world, inverse_world },
            None => {
                self.degenerate += 1;
                let err = HitboxError::DegenerateTransform {
                    joint: skeleton.joint_name(joint).unwrap_or("<unnamed>").to_string(),
                };
                log::warn!("{err} ({step})");
                JointSpace {
                    world: Mat4::identity(),
                    inverse_world: Mat4::identity(),
                }
            }
        };

        self.entries.insert(joint, CacheEntry { step, space });
        Some(space)
    }

    /// Step for which a joint's inverse is currently cached
    pub fn cached_step(&self, joint: JointRef) -> Option<SimulationStep> {
        self.entries.get(&joint).map(|entry| entry.step)
    }

    /// Number of matrix inversions performed since creation or [`Self::clear`]
    pub fn inversions(&self) -> u64 {
        self.inversions
    }

    /// Number of inversions that hit a non-invertible transform
    pub fn degenerate_inversions(&self) -> u64 {
        self.degenerate
    }

    /// Number of joints with a cached entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.inversions = 0;
        self.degenerate = 0;
    }
}
