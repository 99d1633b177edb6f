//! Region table and per-joint volume construction
//!
//! Region boxes are authored in the character's local frame, relative to the
//! bind-pose position of the joint they follow, so the table reads the same
//! way for every rig (`+Y` up, `+Z` forward, `+X` the character's left).
//! At build time each box is carried into the joint's bind space, which is
//! world space as it stood when the hit volumes were built.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::physics::BoundingBox;
use crate::skeleton::{JointRef, JointResolver, MatchStrategy, Skeleton};

use super::region::BodyRegion;

/// Authored shape of one body region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionShape {
    /// Region this box reports
    pub region: BodyRegion,
    /// Canonical joint name the box follows
    pub canonical: String,
    /// Alternate joint names used by other rigging pipelines
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Box centre relative to the joint, in the character frame (metres)
    pub offset: Vec3,
    /// Box half extents in the character frame (metres)
    pub half_extents: Vec3,
}

impl RegionShape {
    /// Create a region shape with no aliases
    pub fn new(
        region: BodyRegion,
        canonical: impl Into<String>,
        offset: Vec3,
        half_extents: Vec3,
    ) -> Self {
        Self {
            region,
            canonical: canonical.into(),
            aliases: Vec::new(),
            offset,
            half_extents,
        }
    }

    /// Add alternate joint names
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases
            .extend(aliases.iter().map(|alias| (*alias).to_string()));
        self
    }
}

/// Region table for a ~1.8 m humanoid, in narrow-phase test order
pub fn default_region_shapes() -> Vec<RegionShape> {
    let upper_arm_offset = Vec3::new(0.0, -0.14, 0.0);
    let upper_arm_extents = Vec3::new(0.06, 0.14, 0.06);
    let forearm_offset = Vec3::new(0.0, -0.13, 0.0);
    let forearm_extents = Vec3::new(0.05, 0.13, 0.05);
    let thigh_offset = Vec3::new(0.0, -0.215, 0.0);
    let thigh_extents = Vec3::new(0.08, 0.215, 0.08);
    let shin_offset = Vec3::new(0.0, -0.2, 0.0);
    let shin_extents = Vec3::new(0.06, 0.2, 0.06);

    vec![
        RegionShape::new(
            BodyRegion::Head,
            "Head",
            Vec3::new(0.0, 0.09, 0.0),
            Vec3::new(0.1, 0.11, 0.11),
        )
        .with_aliases(&["head", "Bip01 Head", "Head_M"]),
        RegionShape::new(
            BodyRegion::Torso,
            "Spine",
            Vec3::new(0.0, 0.15, 0.0),
            Vec3::new(0.16, 0.3, 0.12),
        )
        .with_aliases(&["spine_01", "Bip01 Spine", "Spine_M", "Chest"]),
        RegionShape::new(
            BodyRegion::RightUpperArm,
            "RightArm",
            upper_arm_offset,
            upper_arm_extents,
        )
        .with_aliases(&["upperarm_r", "Bip01 R UpperArm", "RightUpperArm", "Shoulder_R"]),
        RegionShape::new(
            BodyRegion::RightForearm,
            "RightForeArm",
            forearm_offset,
            forearm_extents,
        )
        .with_aliases(&["lowerarm_r", "Bip01 R Forearm", "RightLowerArm", "Elbow_R"]),
        RegionShape::new(
            BodyRegion::LeftUpperArm,
            "LeftArm",
            upper_arm_offset,
            upper_arm_extents,
        )
        .with_aliases(&["upperarm_l", "Bip01 L UpperArm", "LeftUpperArm", "Shoulder_L"]),
        RegionShape::new(
            BodyRegion::LeftForearm,
            "LeftForeArm",
            forearm_offset,
            forearm_extents,
        )
        .with_aliases(&["lowerarm_l", "Bip01 L Forearm", "LeftLowerArm", "Elbow_L"]),
        RegionShape::new(BodyRegion::RightThigh, "RightUpLeg", thigh_offset, thigh_extents)
            .with_aliases(&["thigh_r", "Bip01 R Thigh", "RightUpperLeg", "Hip_R"]),
        RegionShape::new(BodyRegion::RightShin, "RightLeg", shin_offset, shin_extents)
            .with_aliases(&["calf_r", "Bip01 R Calf", "RightLowerLeg", "Knee_R"]),
        RegionShape::new(BodyRegion::LeftThigh, "LeftUpLeg", thigh_offset, thigh_extents)
            .with_aliases(&["thigh_l", "Bip01 L Thigh", "LeftUpperLeg", "Hip_L"]),
        RegionShape::new(BodyRegion::LeftShin, "LeftLeg", shin_offset, shin_extents)
            .with_aliases(&["calf_l", "Bip01 L Calf", "LeftLowerLeg", "Knee_L"]),
    ]
}

/// A bound region: box in bind space plus the joint it follows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InnerHitboxSpec {
    /// Region reported on hit
    pub region: BodyRegion,
    /// Box in the joint's bind space
    pub volume: BoundingBox,
    /// Joint the box follows
    pub joint: JointRef,
    /// The joint's world transform when the skeleton was in its bind pose
    pub bind_matrix: Mat4,
}

/// How one region of the table was (or was not) bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionBinding {
    /// Region from the table
    pub region: BodyRegion,
    /// Canonical joint name searched for
    pub canonical: String,
    /// Name of the joint it resolved to
    pub joint_name: Option<String>,
    /// Strategy that resolved it
    pub strategy: Option<MatchStrategy>,
}

impl RegionBinding {
    /// Whether a joint was found for the region
    pub fn is_resolved(&self) -> bool {
        self.joint_name.is_some()
    }
}

/// Output of one [`BoundsBuilder::build`] run
#[derive(Debug, Clone, Default)]
pub struct BoundsBuild {
    /// Boxes for every region that resolved, in table order
    pub specs: Vec<InnerHitboxSpec>,
    /// One binding per table entry, resolved or not
    pub bindings: Vec<RegionBinding>,
}

/// Binds the region table to a concrete skeleton
#[derive(Debug, Clone)]
pub struct BoundsBuilder {
    resolver: JointResolver,
    shapes: Vec<RegionShape>,
}

impl BoundsBuilder {
    /// Create a builder for a region table
    pub fn new(resolver: JointResolver, shapes: Vec<RegionShape>) -> Self {
        Self { resolver, shapes }
    }

    /// Region table in test order
    pub fn shapes(&self) -> &[RegionShape] {
        &self.shapes
    }

    /// Resolve every region and size its box
    ///
    /// `character_world` is the character's world transform at build time;
    /// the skeleton is assumed to be in its bind pose. Unresolved regions
    /// produce a binding without a spec and never fail the build.
    pub fn build(&self, skeleton: &Skeleton, character_world: &Mat4) -> BoundsBuild {
        let mut output = BoundsBuild::default();

        for shape in &self.shapes {
            let resolution = self
                .resolver
                .resolve(skeleton, &shape.canonical, &shape.aliases);

            let mut binding = RegionBinding {
                region: shape.region,
                canonical: shape.canonical.clone(),
                joint_name: None,
                strategy: None,
            };

            if let Some(resolution) = resolution {
                let joint = skeleton
                    .joint_ref(resolution.joint)
                    .and_then(|joint| Some((joint, skeleton.world_transform(joint)?)));
                if let Some((joint, bind_matrix)) = joint {
                    binding.joint_name = skeleton.joint_name(joint).map(str::to_string);
                    binding.strategy = Some(resolution.strategy);
                    output.specs.push(InnerHitboxSpec {
                        region: shape.region,
                        volume: bind_space_volume(shape, &bind_matrix, character_world),
                        joint,
                        bind_matrix,
                    });
                }
            }

            output.bindings.push(binding);
        }

        output
    }
}

impl Default for BoundsBuilder {
    fn default() -> Self {
        Self::new(JointResolver::default(), default_region_shapes())
    }
}

/// Place a region's box around its joint and express it in bind space
fn bind_space_volume(shape: &RegionShape, bind_matrix: &Mat4, character_world: &Mat4) -> BoundingBox {
    let character_local = character_world.try_inverse().unwrap_or_else(Mat4::identity);
    let joint_local = character_local.transform_point3(&bind_matrix.translation_part());
    BoundingBox::from_center_extents(joint_local + shape.offset, shape.half_extents)
        .transformed(character_world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{HumanoidBone, HumanoidRig, RigNaming};
    use approx::assert_relative_eq;

    #[test]
    fn test_mixamo_rig_binds_every_region() {
        let skeleton = HumanoidRig::new(RigNaming::Mixamo)
            .build(&Mat4::identity())
            .unwrap();
        let build = BoundsBuilder::default().build(&skeleton, &Mat4::identity());

        assert_eq!(build.specs.len(), 10);
        assert!(build.bindings.iter().all(RegionBinding::is_resolved));
        let regions: Vec<BodyRegion> = build.specs.iter().map(|spec| spec.region).collect();
        assert_eq!(regions, BodyRegion::CANONICAL.to_vec());
    }

    #[test]
    fn test_unreal_and_biped_rigs_bind_every_region() {
        for naming in [RigNaming::Unreal, RigNaming::Biped, RigNaming::Plain] {
            let skeleton = HumanoidRig::new(naming).build(&Mat4::identity()).unwrap();
            let build = BoundsBuilder::default().build(&skeleton, &Mat4::identity());
            assert_eq!(build.specs.len(), 10, "{naming:?}");
        }
    }

    #[test]
    fn test_torso_box_spans_hips_to_neck() {
        let skeleton = HumanoidRig::default().build(&Mat4::identity()).unwrap();
        let build = BoundsBuilder::default().build(&skeleton, &Mat4::identity());
        let torso = build
            .specs
            .iter()
            .find(|spec| spec.region == BodyRegion::Torso)
            .unwrap();

        assert_relative_eq!(torso.volume.min(), Vec3::new(-0.16, 0.9, -0.12), epsilon = 1e-5);
        assert_relative_eq!(torso.volume.max(), Vec3::new(0.16, 1.5, 0.12), epsilon = 1e-5);
    }

    #[test]
    fn test_bind_volume_follows_character_placement() {
        let world = Mat4::new_translation(&Vec3::new(3.0, 0.0, -2.0));
        let skeleton = HumanoidRig::default().build(&world).unwrap();
        let build = BoundsBuilder::default().build(&skeleton, &world);
        let head = build
            .specs
            .iter()
            .find(|spec| spec.region == BodyRegion::Head)
            .unwrap();

        assert_relative_eq!(head.volume.center(), Vec3::new(3.0, 1.69, -2.0), epsilon = 1e-5);
        assert_relative_eq!(head.bind_matrix.translation_part(), Vec3::new(3.0, 1.6, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_missing_joints_leave_unresolved_bindings() {
        let rig = HumanoidRig::new(RigNaming::Plain)
            .without(HumanoidBone::LeftArm)
            .without(HumanoidBone::RightUpLeg);
        let skeleton = rig.build(&Mat4::identity()).unwrap();
        let build = BoundsBuilder::default().build(&skeleton, &Mat4::identity());

        let unresolved: Vec<BodyRegion> = build
            .bindings
            .iter()
            .filter(|binding| !binding.is_resolved())
            .map(|binding| binding.region)
            .collect();
        assert_eq!(
            unresolved,
            vec![
                BodyRegion::LeftUpperArm,
                BodyRegion::LeftForearm,
                BodyRegion::RightThigh,
                BodyRegion::RightShin,
            ]
        );
        assert_eq!(build.specs.len(), 6);
    }
}
