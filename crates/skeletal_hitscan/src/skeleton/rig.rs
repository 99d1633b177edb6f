//! Procedural reference humanoid
//!
//! A ~1.8 m humanoid standing at the origin, facing +Z, arms hanging at its
//! sides. Its left side is +X. Joint names follow one of several rigging
//! pipeline conventions so resolver behaviour can be exercised against
//! realistic skeletons.

use crate::foundation::math::{Mat4, Vec3};

use super::{JointId, Skeleton, SkeletonError};

/// Naming convention used for generated joints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigNaming {
    /// Bare names such as `LeftForeArm`
    Plain,
    /// Mixamo export names such as `mixamorig:LeftForeArm`
    Mixamo,
    /// Unreal mannequin names such as `lowerarm_l`
    Unreal,
    /// 3ds Max biped names such as `Bip01 L Forearm`
    Biped,
}

/// Bones of the reference humanoid
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HumanoidBone {
    Hips,
    Spine,
    Spine1,
    Spine2,
    Neck,
    Head,
    LeftShoulder,
    LeftArm,
    LeftForeArm,
    LeftHand,
    RightShoulder,
    RightArm,
    RightForeArm,
    RightHand,
    LeftUpLeg,
    LeftLeg,
    LeftFoot,
    RightUpLeg,
    RightLeg,
    RightFoot,
}

/// Bone, parent and offset from the parent joint (metres)
const BONES: [(HumanoidBone, Option<HumanoidBone>, [f32; 3]); 20] = {
    use HumanoidBone::*;
    [
        (Hips, None, [0.0, 0.95, 0.0]),
        (Spine, Some(Hips), [0.0, 0.10, 0.0]),
        (Spine1, Some(Spine), [0.0, 0.15, 0.0]),
        (Spine2, Some(Spine1), [0.0, 0.15, 0.0]),
        (Neck, Some(Spine2), [0.0, 0.15, 0.0]),
        (Head, Some(Neck), [0.0, 0.10, 0.0]),
        (LeftShoulder, Some(Spine2), [0.06, 0.07, 0.0]),
        (LeftArm, Some(LeftShoulder), [0.16, 0.0, 0.0]),
        (LeftForeArm, Some(LeftArm), [0.0, -0.28, 0.0]),
        (LeftHand, Some(LeftForeArm), [0.0, -0.26, 0.0]),
        (RightShoulder, Some(Spine2), [-0.06, 0.07, 0.0]),
        (RightArm, Some(RightShoulder), [-0.16, 0.0, 0.0]),
        (RightForeArm, Some(RightArm), [0.0, -0.28, 0.0]),
        (RightHand, Some(RightForeArm), [0.0, -0.26, 0.0]),
        (LeftUpLeg, Some(Hips), [0.10, -0.05, 0.0]),
        (LeftLeg, Some(LeftUpLeg), [0.0, -0.43, 0.0]),
        (LeftFoot, Some(LeftLeg), [0.0, -0.40, 0.0]),
        (RightUpLeg, Some(Hips), [-0.10, -0.05, 0.0]),
        (RightLeg, Some(RightUpLeg), [0.0, -0.43, 0.0]),
        (RightFoot, Some(RightLeg), [0.0, -0.40, 0.0]),
    ]
};

impl HumanoidBone {
    fn plain_name(self) -> &'static str {
        match self {
            Self::Hips => "Hips",
            Self::Spine => "Spine",
            Self::Spine1 => "Spine1",
            Self::Spine2 => "Spine2",
            Self::Neck => "Neck",
            Self::Head => "Head",
            Self::LeftShoulder => "LeftShoulder",
            Self::LeftArm => "LeftArm",
            Self::LeftForeArm => "LeftForeArm",
            Self::LeftHand => "LeftHand",
            Self::RightShoulder => "RightShoulder",
            Self::RightArm => "RightArm",
            Self::RightForeArm => "RightForeArm",
            Self::RightHand => "RightHand",
            Self::LeftUpLeg => "LeftUpLeg",
            Self::LeftLeg => "LeftLeg",
            Self::LeftFoot => "LeftFoot",
            Self::RightUpLeg => "RightUpLeg",
            Self::RightLeg => "RightLeg",
            Self::RightFoot => "RightFoot",
        }
    }

    fn unreal_name(self) -> &'static str {
        match self {
            Self::Hips => "pelvis",
            Self::Spine => "spine_01",
            Self::Spine1 => "spine_02",
            Self::Spine2 => "spine_03",
            Self::Neck => "neck_01",
            Self::Head => "head",
            Self::LeftShoulder => "clavicle_l",
            Self::LeftArm => "upperarm_l",
            Self::LeftForeArm => "lowerarm_l",
            Self::LeftHand => "hand_l",
            Self::RightShoulder => "clavicle_r",
            Self::RightArm => "upperarm_r",
            Self::RightForeArm => "lowerarm_r",
            Self::RightHand => "hand_r",
            Self::LeftUpLeg => "thigh_l",
            Self::LeftLeg => "calf_l",
            Self::LeftFoot => "foot_l",
            Self::RightUpLeg => "thigh_r",
            Self::RightLeg => "calf_r",
            Self::RightFoot => "foot_r",
        }
    }

    fn biped_name(self) -> &'static str {
        match self {
            Self::Hips => "Bip01 Pelvis",
            Self::Spine => "Bip01 Spine",
            Self::Spine1 => "Bip01 Spine1",
            Self::Spine2 => "Bip01 Spine2",
            Self::Neck => "Bip01 Neck",
            Self::Head => "Bip01 Head",
            Self::LeftShoulder => "Bip01 L Clavicle",
            Self::LeftArm => "Bip01 L UpperArm",
            Self::LeftForeArm => "Bip01 L Forearm",
            Self::LeftHand => "Bip01 L Hand",
            Self::RightShoulder => "Bip01 R Clavicle",
            Self::RightArm => "Bip01 R UpperArm",
            Self::RightForeArm => "Bip01 R Forearm",
            Self::RightHand => "Bip01 R Hand",
            Self::LeftUpLeg => "Bip01 L Thigh",
            Self::LeftLeg => "Bip01 L Calf",
            Self::LeftFoot => "Bip01 L Foot",
            Self::RightUpLeg => "Bip01 R Thigh",
            Self::RightLeg => "Bip01 R Calf",
            Self::RightFoot => "Bip01 R Foot",
        }
    }
}

/// Builder for the reference humanoid skeleton
#[derive(Debug, Clone)]
pub struct HumanoidRig {
    naming: RigNaming,
    omitted: Vec<HumanoidBone>,
}

impl HumanoidRig {
    /// Create a rig description using the given naming convention
    pub fn new(naming: RigNaming) -> Self {
        Self {
            naming,
            omitted: Vec::new(),
        }
    }

    /// Leave a bone (and everything below it) out of the generated skeleton
    pub fn without(mut self, bone: HumanoidBone) -> Self {
        self.omitted.push(bone);
        self
    }

    /// Naming convention of this rig
    pub fn naming(&self) -> RigNaming {
        self.naming
    }

    /// Joint name this rig gives to `bone`
    pub fn joint_name(&self, bone: HumanoidBone) -> String {
        match self.naming {
            RigNaming::Plain => bone.plain_name().to_string(),
            RigNaming::Mixamo => format!("mixamorig:{}", bone.plain_name()),
            RigNaming::Unreal => bone.unreal_name().to_string(),
            RigNaming::Biped => bone.biped_name().to_string(),
        }
    }

    /// Key of `bone` within a skeleton built by this rig
    pub fn joint_id(&self, skeleton: &Skeleton, bone: HumanoidBone) -> Option<JointId> {
        skeleton.find_by_name(&self.joint_name(bone))
    }

    /// Generate the skeleton in its bind pose, placed by `root_world`
    pub fn build(&self, root_world: &Mat4) -> Result<Skeleton, SkeletonError> {
        let mut skeleton = Skeleton::new();
        let mut created: Vec<(HumanoidBone, JointId)> = Vec::with_capacity(BONES.len());

        for (bone, parent, offset) in BONES {
            if self.omitted.contains(&bone) {
                continue;
            }
            let parent_id = match parent {
                Some(parent) => match created.iter().find(|(b, _)| *b == parent) {
                    Some((_, id)) => Some(*id),
                    // Parent was omitted, so the whole branch is
                    None => continue,
                },
                None => None,
            };
            let local = Mat4::new_translation(&Vec3::new(offset[0], offset[1], offset[2]));
            let id = skeleton.add_joint(self.joint_name(bone), parent_id, local)?;
            created.push((bone, id));
        }

        skeleton.propagate(root_world);
        Ok(skeleton)
    }
}

impl Default for HumanoidRig {
    fn default() -> Self {
        Self::new(RigNaming::Mixamo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4Ext;
    use approx::assert_relative_eq;

    #[test]
    fn test_full_rig_has_every_bone() {
        let skeleton = HumanoidRig::default().build(&Mat4::identity()).unwrap();
        assert_eq!(skeleton.len(), BONES.len());
        assert!(skeleton.find_by_name("mixamorig:RightForeArm").is_some());
    }

    #[test]
    fn test_head_sits_near_character_height() {
        let rig = HumanoidRig::new(RigNaming::Plain);
        let skeleton = rig.build(&Mat4::identity()).unwrap();
        let head = rig.joint_id(&skeleton, HumanoidBone::Head).unwrap();
        let position = skeleton.joint(head).unwrap().world_transform().translation_part();
        assert_relative_eq!(position, Vec3::new(0.0, 1.6, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_omitting_bone_drops_its_branch() {
        let rig = HumanoidRig::new(RigNaming::Unreal).without(HumanoidBone::LeftArm);
        let skeleton = rig.build(&Mat4::identity()).unwrap();

        assert!(skeleton.find_by_name("upperarm_l").is_none());
        assert!(skeleton.find_by_name("lowerarm_l").is_none());
        assert!(skeleton.find_by_name("hand_l").is_none());
        assert!(skeleton.find_by_name("clavicle_l").is_some());
        assert_eq!(skeleton.len(), BONES.len() - 3);
    }
}
