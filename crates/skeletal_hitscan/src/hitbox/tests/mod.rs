//! Hit volume scenarios against the reference humanoid

mod degradation;

use crate::character::RiggedCharacter;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::Ray;
use crate::skeleton::{HumanoidRig, RigNaming};

/// Reference humanoid standing at the origin
fn humanoid(naming: RigNaming) -> (RiggedCharacter, HumanoidRig) {
    placed_humanoid(naming, Transform::identity())
}

fn placed_humanoid(naming: RigNaming, transform: Transform) -> (RiggedCharacter, HumanoidRig) {
    let rig = HumanoidRig::new(naming);
    let character = RiggedCharacter::from_rig(&rig, transform).unwrap();
    (character, rig)
}

/// Ray fired along +Z from five metres behind the character
fn shot_at(x: f32, y: f32) -> Ray {
    Ray::new(Vec3::new(x, y, -5.0), Vec3::new(0.0, 0.0, 1.0))
}
