//! Characters that can be shot
//!
//! The hit volume system only reads two things from a character: where it
//! stands and, if it has one, its animated skeleton. Game code implements
//! [`Character`] on whatever entity type it already has.

use crate::foundation::math::{Mat4, Transform};
use crate::skeleton::{HumanoidRig, Skeleton, SkeletonError};

/// A world-placed entity that may carry a skeleton
pub trait Character {
    /// Current world transform
    fn world_transform(&self) -> Mat4;

    /// Animated skeleton, `None` for characters without one
    fn skeleton(&self) -> Option<&Skeleton>;
}

/// Character with a transform and an optional owned skeleton
#[derive(Debug, Default)]
pub struct RiggedCharacter {
    /// Placement in the world
    pub transform: Transform,
    skeleton: Option<Skeleton>,
}

impl RiggedCharacter {
    /// Create a character, optionally with a skeleton
    pub fn new(transform: Transform, skeleton: Option<Skeleton>) -> Self {
        Self { transform, skeleton }
    }

    /// Create a character whose skeleton is generated from a rig description
    pub fn from_rig(rig: &HumanoidRig, transform: Transform) -> Result<Self, SkeletonError> {
        let skeleton = rig.build(&transform.to_matrix())?;
        Ok(Self::new(transform, Some(skeleton)))
    }

    /// Mutable access for the animation system
    pub fn skeleton_mut(&mut self) -> Option<&mut Skeleton> {
        self.skeleton.as_mut()
    }

    /// Swap the skeleton, returning the previous one
    pub fn replace_skeleton(&mut self, skeleton: Option<Skeleton>) -> Option<Skeleton> {
        std::mem::replace(&mut self.skeleton, skeleton)
    }

    /// Re-evaluate joint world transforms from the current character transform
    pub fn sync_skeleton(&mut self) {
        let root_world = self.transform.to_matrix();
        if let Some(skeleton) = self.skeleton.as_mut() {
            skeleton.propagate(&root_world);
        }
    }
}

impl Character for RiggedCharacter {
    fn world_transform(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use crate::skeleton::HumanoidBone;
    use approx::assert_relative_eq;

    #[test]
    fn test_sync_skeleton_follows_character() {
        let rig = HumanoidRig::default();
        let mut character = RiggedCharacter::from_rig(&rig, Transform::identity()).unwrap();

        character.transform.position = Vec3::new(2.0, 0.0, 1.0);
        character.sync_skeleton();

        let skeleton = character.skeleton().unwrap();
        let head = rig.joint_id(skeleton, HumanoidBone::Head).unwrap();
        let position = skeleton.joint(head).unwrap().world_transform().translation_part();
        assert_relative_eq!(position, Vec3::new(2.0, 1.6, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_replace_skeleton() {
        let mut character = RiggedCharacter::new(Transform::identity(), None);
        assert!(character.skeleton().is_none());

        let previous = character.replace_skeleton(Some(Skeleton::new()));
        assert!(previous.is_none());
        assert!(character.skeleton().is_some());
    }
}
