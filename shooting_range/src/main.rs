//! Shooting range demo
//!
//! Fires a spread of hitscan rays at a row of animated characters rigged
//! with different naming conventions, then logs where the shots landed.
//! Pass a `.toml` or `.ron` hit volume config as the first argument to
//! override the defaults.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skeletal_hitscan::debug::HitboxDebugVisualizer;
use skeletal_hitscan::foundation::logging;
use skeletal_hitscan::foundation::math::{Mat4, Mat4Ext, Transform, Vec3};
use skeletal_hitscan::prelude::*;
use skeletal_hitscan::skeleton::{HumanoidBone, JointId};

// Range configuration
const FIXED_DELTA: f32 = 1.0 / 60.0;
const SIMULATED_STEPS: u64 = 600; // Ten seconds of simulation
const SHOTS_PER_STEP: usize = 4;
const AIM_SPREAD: f32 = 0.6; // Metres around a target's centre
const SPINE_TWIST: f32 = 0.5; // Radians of idle torso sway
const LIMB_SWING: f32 = 0.6; // Radians of arm and leg swing
const CYCLE_SPEED: f32 = 1.7; // Radians per second of the idle cycle
const STRAFE_DISTANCE: f32 = 0.75; // Metres of side-to-side movement
const SHOOTER_POSITION: [f32; 3] = [0.0, 1.5, -12.0];

/// A joint driven by the idle animation
#[derive(Clone, Copy)]
struct AnimatedJoint {
    id: JointId,
    bind_local: Mat4,
    rotation: fn(f32) -> Mat4,
    amplitude: f32,
    offset: f32,
}

// Bone, rotation axis, amplitude (radians), cycle offset
const ANIMATED_BONES: [(HumanoidBone, fn(f32) -> Mat4, f32, f32); 7] = [
    (HumanoidBone::Spine, <Mat4 as Mat4Ext>::rotation_y, SPINE_TWIST, 0.0),
    (HumanoidBone::LeftArm, <Mat4 as Mat4Ext>::rotation_x, LIMB_SWING, 0.0),
    (HumanoidBone::RightArm, <Mat4 as Mat4Ext>::rotation_x, LIMB_SWING, std::f32::consts::PI),
    (HumanoidBone::LeftForeArm, <Mat4 as Mat4Ext>::rotation_x, LIMB_SWING * 0.5, 0.3),
    (HumanoidBone::RightForeArm, <Mat4 as Mat4Ext>::rotation_x, LIMB_SWING * 0.5, 3.4),
    (HumanoidBone::LeftUpLeg, <Mat4 as Mat4Ext>::rotation_x, LIMB_SWING, std::f32::consts::PI),
    (HumanoidBone::RightUpLeg, <Mat4 as Mat4Ext>::rotation_x, LIMB_SWING, 0.0),
];

struct Target {
    name: &'static str,
    home: Vec3,
    phase: f32,
    character: RiggedCharacter,
    volumes: HitVolumeSet,
    joints: Vec<AnimatedJoint>,
}

impl Target {
    fn new(
        name: &'static str,
        rig: Option<HumanoidRig>,
        transform: Transform,
        phase: f32,
        config: &HitboxConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let home = transform.position;
        let character = match &rig {
            Some(rig) => RiggedCharacter::from_rig(rig, transform)?,
            None => RiggedCharacter::new(transform, None),
        };

        let joints = match (&rig, character.skeleton()) {
            (Some(rig), Some(skeleton)) => ANIMATED_BONES
                .iter()
                .filter_map(|&(bone, rotation, amplitude, offset)| {
                    let id = rig.joint_id(skeleton, bone)?;
                    Some(AnimatedJoint {
                        id,
                        bind_local: *skeleton.joint(id)?.local_transform(),
                        rotation,
                        amplitude,
                        offset,
                    })
                })
                .collect(),
            _ => Vec::new(),
        };

        log::info!("Building hit volumes for {name}");
        let volumes = HitVolumeSet::build(&character, config);

        Ok(Self {
            name,
            home,
            phase,
            character,
            volumes,
            joints,
        })
    }

    /// Idle animation: strafe, sway the torso and swing the limbs
    fn animate(&mut self, time: f32) {
        let t = time + self.phase;
        self.character.transform.position =
            self.home + Vec3::new(t.sin() * STRAFE_DISTANCE, 0.0, 0.0);

        if let Some(skeleton) = self.character.skeleton_mut() {
            for joint in &self.joints {
                let angle = (t * CYCLE_SPEED + joint.offset).sin() * joint.amplitude;
                let local = joint.bind_local * (joint.rotation)(angle);
                if let Err(e) = skeleton.set_local_transform(joint.id, local) {
                    log::warn!("{}: could not pose joint: {e}", self.name);
                }
            }
        }

        self.character.sync_skeleton();
        self.volumes.update(&self.character);
    }
}

struct ShootingRangeApp {
    targets: Vec<Target>,
    clock: StepClock,
    rng: StdRng,
    visualizer: HitboxDebugVisualizer,
    tally: HashMap<BodyRegion, u32>,
    shots_fired: u32,
}

impl ShootingRangeApp {
    fn new(config: &HitboxConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let targets = vec![
            Target::new(
                "mixamo",
                Some(HumanoidRig::new(RigNaming::Mixamo)),
                Transform::from_position(Vec3::new(-3.0, 0.0, 0.0)),
                0.0,
                config,
            )?,
            Target::new(
                "unreal",
                Some(HumanoidRig::new(RigNaming::Unreal)),
                Transform::from_position_yaw(Vec3::new(-1.0, 0.0, 1.0), 0.4),
                1.0,
                config,
            )?,
            Target::new(
                "biped",
                Some(HumanoidRig::new(RigNaming::Biped)),
                Transform::from_position_yaw(Vec3::new(1.0, 0.0, 2.0), std::f32::consts::PI),
                2.0,
                config,
            )?,
            Target::new(
                "one-armed",
                Some(HumanoidRig::new(RigNaming::Plain).without(HumanoidBone::LeftArm)),
                Transform::from_position(Vec3::new(3.0, 0.0, 0.5)),
                3.0,
                config,
            )?,
            Target::new(
                "crate",
                None,
                Transform::from_position(Vec3::new(5.0, 0.0, 3.0)),
                4.0,
                config,
            )?,
        ];

        Ok(Self {
            targets,
            clock: StepClock::new(FIXED_DELTA),
            rng: StdRng::seed_from_u64(0x5EED),
            visualizer: HitboxDebugVisualizer::new(),
            tally: HashMap::new(),
            shots_fired: 0,
        })
    }

    fn run(&mut self) {
        for _ in 0..SIMULATED_STEPS {
            self.step();
        }
        self.report();
    }

    fn step(&mut self) {
        let step = self.clock.advance();
        let time = self.clock.total_time();
        let shooter = Vec3::from(SHOOTER_POSITION);

        for target in &mut self.targets {
            target.animate(time);
        }

        for _ in 0..SHOTS_PER_STEP {
            let index = self.rng.gen_range(0..self.targets.len());
            let target = &self.targets[index];
            let aim = target.volumes.center()
                + Vec3::new(
                    self.rng.gen_range(-AIM_SPREAD..AIM_SPREAD),
                    self.rng.gen_range(-AIM_SPREAD * 1.5..AIM_SPREAD * 1.5),
                    0.0,
                );
            let Some(ray) = Ray::try_new(shooter, aim - shooter) else {
                continue;
            };

            // Nearest character along the ray wins
            let hit = self
                .targets
                .iter_mut()
                .filter_map(|t| {
                    t.volumes
                        .intersect_ray(&t.character, &ray, step)
                        .map(|hit| (t.name, hit))
                })
                .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance));

            self.shots_fired += 1;
            self.visualizer.draw_shot(&ray, hit.as_ref().map(|(_, hit)| hit));
            if let Some((name, hit)) = hit {
                log::debug!("{step}: hit {name} in the {} at {:?}", hit.region, hit.point);
                *self.tally.entry(hit.region).or_default() += 1;
            }
        }

        self.visualizer.update(self.clock.fixed_delta());
    }

    fn report(&self) {
        let hits: u32 = self.tally.values().sum();
        log::info!(
            "{} shots over {} steps, {} hits",
            self.shots_fired,
            self.clock.current().value(),
            hits
        );

        let mut regions: Vec<_> = self.tally.iter().collect();
        regions.sort_by(|a, b| b.1.cmp(a.1));
        for (region, count) in regions {
            log::info!("  {region:<16} {count}");
        }

        for target in &self.targets {
            let stats = target.volumes.stats();
            log::info!(
                "{:<10} {:?}: {} rays, {} past broad phase, {} narrow tests, {} hits, {} inversions",
                target.name,
                target.volumes.mode(),
                stats.rays_tested,
                stats.broad_phase_hits,
                stats.narrow_phase_tests,
                stats.hits,
                target.volumes.bind_cache().inversions()
            );
        }

        log::info!("{} debug shapes still live", self.visualizer.get_shapes().len());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("info");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading hit volume config from {path}");
            HitboxConfig::load(&path)?
        }
        None => HitboxConfig::default().with_report_regions(true),
    };

    log::info!("Starting shooting range");
    let mut app = ShootingRangeApp::new(&config)?;
    app.run();
    log::info!("Shooting range completed");
    Ok(())
}
