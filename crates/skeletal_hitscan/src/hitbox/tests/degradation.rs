//! Partial skeletons, missing skeletons and broken transforms

use approx::assert_relative_eq;

use super::{humanoid, shot_at};
use crate::character::{Character, RiggedCharacter};
use crate::config::HitboxConfig;
use crate::error::HitboxError;
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::foundation::time::SimulationStep;
use crate::hitbox::{BodyRegion, HitVolumeMode, HitVolumeSet, RegionSet};
use crate::skeleton::{HumanoidBone, RigNaming, Skeleton};

fn character_with_joints(joints: &[(&str, Vec3)]) -> RiggedCharacter {
    let mut skeleton = Skeleton::new();
    let mut parent = None;
    for (name, offset) in joints {
        parent = Some(
            skeleton
                .add_joint(*name, parent, Mat4::new_translation(offset))
                .unwrap(),
        );
    }
    RiggedCharacter::new(Transform::identity(), Some(skeleton))
}

#[test]
fn test_head_only_skeleton_keeps_head_region() {
    let character = character_with_joints(&[("Head", Vec3::new(0.0, 1.6, 0.0))]);
    let mut volumes = HitVolumeSet::build(&character, &HitboxConfig::default());

    assert_eq!(volumes.mode(), HitVolumeMode::Full);
    assert_eq!(volumes.hitboxes().len(), 1);

    let report = volumes.region_report();
    assert_eq!(report.resolved(), RegionSet::HEAD);
    assert_eq!(report.unresolved().count(), 9);
    assert!(report.diagnostics.contains(&HitboxError::MissingJoint {
        region: BodyRegion::Torso,
        canonical: "Spine".to_string(),
    }));

    let step = SimulationStep::new(1);
    let head = volumes.intersect_ray(&character, &shot_at(0.0, 1.7), step).unwrap();
    assert_eq!(head.region, BodyRegion::Head);
    assert!(volumes.intersect_ray(&character, &shot_at(0.0, 1.0), step).is_none());
}

#[test]
fn test_unrecognizable_skeleton_falls_back_to_root_volume() {
    let character = character_with_joints(&[
        ("Bone", Vec3::zeros()),
        ("Bone.001", Vec3::new(0.0, 1.0, 0.0)),
    ]);
    let mut volumes = HitVolumeSet::build(&character, &HitboxConfig::default());

    assert_eq!(volumes.mode(), HitVolumeMode::SimplifiedRoot);
    assert_eq!(volumes.region_report().resolved(), RegionSet::empty());

    let hit = volumes
        .intersect_ray(&character, &shot_at(0.0, 1.0), SimulationStep::new(1))
        .unwrap();
    assert_eq!(hit.region, BodyRegion::Body);
    assert_relative_eq!(hit.point, Vec3::new(0.0, 1.0, -0.5), epsilon = 1e-5);
}

#[test]
fn test_missing_skeleton_uses_outer_box() {
    let character = RiggedCharacter::new(Transform::from_position(Vec3::new(0.0, 0.0, 2.0)), None);
    let mut volumes = HitVolumeSet::build(&character, &HitboxConfig::default());

    assert_eq!(volumes.mode(), HitVolumeMode::SimplifiedOuter);
    assert_eq!(
        volumes.region_report().diagnostics,
        vec![HitboxError::MissingSkeleton]
    );

    let hit = volumes
        .intersect_ray(&character, &shot_at(0.0, 1.0), SimulationStep::new(1))
        .unwrap();
    assert_eq!(hit.region, BodyRegion::Body);
    assert_relative_eq!(hit.point, Vec3::new(0.0, 1.0, 1.5), epsilon = 1e-5);
    assert_relative_eq!(hit.distance, 6.5, epsilon = 1e-5);
}

#[test]
fn test_forced_and_runtime_simplified_mode() {
    let (character, _) = humanoid(RigNaming::Mixamo);
    let config = HitboxConfig::default().with_force_simplified(true);
    let mut forced = HitVolumeSet::build(&character, &config);
    assert_eq!(forced.mode(), HitVolumeMode::SimplifiedRoot);

    let hit = forced
        .intersect_ray(&character, &shot_at(0.0, 1.0), SimulationStep::new(1))
        .unwrap();
    assert_eq!(hit.region, BodyRegion::Body);
    assert_relative_eq!(hit.point.z, -0.5, epsilon = 1e-5);

    let mut switched = HitVolumeSet::build(&character, &HitboxConfig::default());
    switched.intersect_ray(&character, &shot_at(0.0, 1.0), SimulationStep::new(1));
    switched.set_simplified_mode(&character);

    assert_eq!(switched.mode(), HitVolumeMode::SimplifiedRoot);
    assert_eq!(switched.region_report().mode, HitVolumeMode::SimplifiedRoot);
    assert!(switched.bind_cache().is_empty());
    let hit = switched
        .intersect_ray(&character, &shot_at(0.0, 1.7), SimulationStep::new(2))
        .unwrap();
    assert_eq!(hit.region, BodyRegion::Body);
}

#[test]
fn test_removed_joints_are_skipped() {
    let (mut character, rig) = humanoid(RigNaming::Mixamo);
    let mut volumes = HitVolumeSet::build(&character, &HitboxConfig::default());

    // Drops the spine chain: head, torso and both arms
    let skeleton = character.skeleton_mut().unwrap();
    let spine = rig.joint_id(skeleton, HumanoidBone::Spine).unwrap();
    skeleton.remove_joint(spine).unwrap();

    let step = SimulationStep::new(1);
    assert!(volumes.intersect_ray(&character, &shot_at(0.0, 1.0), step).is_none());
    assert_eq!(volumes.stats().stale_skips, 6);

    let leg = volumes.intersect_ray(&character, &shot_at(0.1, 0.7), step).unwrap();
    assert_eq!(leg.region, BodyRegion::LeftThigh);
    assert_relative_eq!(leg.point, Vec3::new(0.1, 0.7, -0.08), epsilon = 1e-4);
}

#[test]
fn test_replaced_skeleton_falls_back_to_outer_box() {
    let (mut character, _) = humanoid(RigNaming::Mixamo);
    let mut volumes = HitVolumeSet::build(&character, &HitboxConfig::default());

    let rebuilt = crate::skeleton::HumanoidRig::default()
        .build(&character.world_transform())
        .unwrap();
    character.replace_skeleton(Some(rebuilt));

    let step = SimulationStep::new(1);
    let hit = volumes.intersect_ray(&character, &shot_at(0.0, 1.0), step).unwrap();
    assert_eq!(hit.region, BodyRegion::Body);
    assert_relative_eq!(hit.point, Vec3::new(0.0, 1.0, -0.5), epsilon = 1e-5);
    assert_relative_eq!(hit.distance, 4.5, epsilon = 1e-5);

    let stats = volumes.stats();
    assert_eq!(stats.stale_skips, 10);
    assert_eq!(stats.narrow_phase_tests, 0);
    assert_eq!(stats.hits, 1);

    // A rebuild binds to the new skeleton
    let mut volumes = HitVolumeSet::build(&character, &HitboxConfig::default());
    let hit = volumes.intersect_ray(&character, &shot_at(0.0, 1.0), step).unwrap();
    assert_eq!(hit.region, BodyRegion::Torso);
}

#[test]
fn test_stale_root_volume_falls_back_to_outer_box() {
    let (mut character, _) = humanoid(RigNaming::Mixamo);
    let config = HitboxConfig::default().with_force_simplified(true);
    let mut volumes = HitVolumeSet::build(&character, &config);
    assert_eq!(volumes.mode(), HitVolumeMode::SimplifiedRoot);

    character.replace_skeleton(None);

    let hit = volumes
        .intersect_ray(&character, &shot_at(0.0, 1.5), SimulationStep::new(1))
        .unwrap();
    assert_eq!(hit.region, BodyRegion::Body);
    assert_relative_eq!(hit.point, Vec3::new(0.0, 1.5, -0.5), epsilon = 1e-5);
    assert_eq!(volumes.stats().stale_skips, 1);
}

#[test]
fn test_degenerate_joint_transform_does_not_abort_test() {
    let (mut character, rig) = humanoid(RigNaming::Mixamo);
    let mut volumes = HitVolumeSet::build(&character, &HitboxConfig::default());

    let skeleton = character.skeleton_mut().unwrap();
    let spine = rig.joint_id(skeleton, HumanoidBone::Spine).unwrap();
    skeleton.set_world_transform(spine, Mat4::zeros()).unwrap();

    let step = SimulationStep::new(1);
    assert!(volumes.intersect_ray(&character, &shot_at(0.0, 1.0), step).is_none());
    assert_eq!(volumes.bind_cache().degenerate_inversions(), 1);

    let head = volumes.intersect_ray(&character, &shot_at(0.0, 1.7), step).unwrap();
    assert_eq!(head.region, BodyRegion::Head);
}

#[test]
fn test_degenerate_joint_hit_stays_on_ray() {
    let (mut character, rig) = humanoid(RigNaming::Mixamo);
    let mut volumes = HitVolumeSet::build(&character, &HitboxConfig::default());

    let skeleton = character.skeleton_mut().unwrap();
    let head = rig.joint_id(skeleton, HumanoidBone::Head).unwrap();
    skeleton.set_world_transform(head, Mat4::zeros()).unwrap();

    // With an identity stand-in the head box sits 1.6 m lower than bound
    let ray = shot_at(0.0, 0.09);
    let hit = volumes.intersect_ray(&character, &ray, SimulationStep::new(1)).unwrap();

    assert_eq!(hit.region, BodyRegion::Head);
    assert_relative_eq!(hit.point, ray.point_at(hit.distance), epsilon = 1e-4);
    assert_relative_eq!(hit.point, Vec3::new(0.0, 0.09, -0.11), epsilon = 1e-4);
    assert_eq!(volumes.bind_cache().degenerate_inversions(), 1);
}

#[test]
fn test_degenerate_bind_pose_drops_region() {
    let mut skeleton = Skeleton::new();
    let spine = skeleton.add_joint("Spine", None, Mat4::zeros()).unwrap();
    skeleton
        .add_joint("Head", Some(spine), Mat4::new_translation(&Vec3::new(0.0, 1.6, 0.0)))
        .unwrap();
    // Head hangs off a collapsed parent, so give it a usable world transform
    let head = skeleton.find_by_name("Head").unwrap();
    skeleton
        .set_world_transform(head, Mat4::new_translation(&Vec3::new(0.0, 1.6, 0.0)))
        .unwrap();
    let character = RiggedCharacter::new(Transform::identity(), Some(skeleton));

    let volumes = HitVolumeSet::build(&character, &HitboxConfig::default());

    assert_eq!(volumes.mode(), HitVolumeMode::Full);
    assert_eq!(volumes.hitboxes().len(), 1);
    assert_eq!(volumes.hitboxes()[0].region(), BodyRegion::Head);
    assert!(volumes
        .region_report()
        .diagnostics
        .contains(&HitboxError::DegenerateTransform {
            joint: "Spine".to_string()
        }));
}
