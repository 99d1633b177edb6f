//! Per-character hit volumes
//!
//! A [`HitVolumeSet`] pairs a cheap outer box (broad phase) with boxes that
//! follow individual joints (narrow phase). Inner boxes never move: each
//! test carries the ray into the joint's bind space instead,
//!
//! ```text
//! ray_bind = bind_matrix * inverse(current_joint_world) * ray_world
//! ```
//!
//! and the hit point is carried back with
//! `current_joint_world * inverse(bind_matrix)`.

use crate::character::Character;
use crate::config::HitboxConfig;
use crate::debug::region_report::RegionReport;
use crate::error::HitboxError;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::foundation::time::SimulationStep;
use crate::physics::{BoundingBox, Ray};
use crate::skeleton::{JointRef, JointResolver, Skeleton};

use super::bind_cache::BindSpaceCache;
use super::bounds_builder::{BoundsBuilder, InnerHitboxSpec};
use super::region::BodyRegion;

/// Box attached to one joint, stored in that joint's bind space
#[derive(Debug, Clone, PartialEq)]
pub struct InnerHitbox {
    region: BodyRegion,
    volume: BoundingBox,
    joint: JointRef,
    bind_matrix: Mat4,
    bind_matrix_inverse: Mat4,
}

impl InnerHitbox {
    /// Create from a builder spec, `None` if the bind matrix is not invertible
    pub fn from_spec(spec: InnerHitboxSpec) -> Option<Self> {
        let bind_matrix_inverse = spec.bind_matrix.try_inverse()?;
        Some(Self {
            region: spec.region,
            volume: spec.volume,
            joint: spec.joint,
            bind_matrix: spec.bind_matrix,
            bind_matrix_inverse,
        })
    }

    /// Region reported on hit
    pub fn region(&self) -> BodyRegion {
        self.region
    }

    /// Box in bind space
    pub fn volume(&self) -> &BoundingBox {
        &self.volume
    }

    /// Joint the box follows
    pub fn joint(&self) -> JointRef {
        self.joint
    }

    /// Joint world transform at bind time
    pub fn bind_matrix(&self) -> &Mat4 {
        &self.bind_matrix
    }

    /// Inverse of [`Self::bind_matrix`], computed once at build
    pub fn bind_matrix_inverse(&self) -> &Mat4 {
        &self.bind_matrix_inverse
    }

    /// Map from bind space to world space for a given joint pose
    pub fn bind_to_world(&self, current_joint_world: &Mat4) -> Mat4 {
        current_joint_world * self.bind_matrix_inverse
    }

    /// Box corners in world space for the skeleton's current pose
    pub fn world_corners(&self, skeleton: &Skeleton) -> Option<[Vec3; 8]> {
        let to_world = self.bind_to_world(&skeleton.world_transform(self.joint)?);
        Some(self.volume.corners().map(|corner| to_world.transform_point3(&corner)))
    }
}

/// Broad-phase box around the whole character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OuterHitbox {
    definition: BoundingBox,
    current: BoundingBox,
}

impl OuterHitbox {
    /// Place a character-local box with a world transform
    pub fn new(definition: BoundingBox, world: &Mat4) -> Self {
        Self {
            definition,
            current: definition.transformed(world),
        }
    }

    /// Recompute the world box
    pub fn update(&mut self, world: &Mat4) {
        self.current = self.definition.transformed(world);
    }

    /// Box in the character's local frame
    pub fn definition(&self) -> &BoundingBox {
        &self.definition
    }

    /// Box in world space as of the last update
    pub fn current(&self) -> &BoundingBox {
        &self.current
    }
}

/// Volume layout a build settled on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitVolumeMode {
    /// One box per bound body region
    Full,
    /// A single box on the skeleton root
    SimplifiedRoot,
    /// No skeleton; the outer box is the only volume
    SimplifiedOuter,
}

/// Inner volumes of a set
#[derive(Debug, Clone, PartialEq)]
pub enum HitVolumes {
    /// Per-region boxes, tested in order, first hit wins
    Full {
        /// Boxes in test order
        hitboxes: Vec<InnerHitbox>,
    },
    /// Whole-body volume reported as [`BodyRegion::Body`]
    Simplified {
        /// Box on the skeleton root, `None` when there is no skeleton
        root: Option<InnerHitbox>,
    },
}

impl HitVolumes {
    /// Layout of these volumes
    pub fn mode(&self) -> HitVolumeMode {
        match self {
            Self::Full { .. } => HitVolumeMode::Full,
            Self::Simplified { root: Some(_) } => HitVolumeMode::SimplifiedRoot,
            Self::Simplified { root: None } => HitVolumeMode::SimplifiedOuter,
        }
    }

    /// Inner boxes in test order
    pub fn hitboxes(&self) -> &[InnerHitbox] {
        match self {
            Self::Full { hitboxes } => hitboxes.as_slice(),
            Self::Simplified { root: Some(root) } => std::slice::from_ref(root),
            Self::Simplified { root: None } => &[],
        }
    }
}

/// A ray hit on a character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point
    pub point: Vec3,
    /// Region that was hit
    pub region: BodyRegion,
    /// Distance from the ray origin to `point`
    pub distance: f32,
}

/// Counters for hit tests since the last reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitTestStats {
    /// Rays tested against the outer box
    pub rays_tested: u64,
    /// Rays that passed the broad phase
    pub broad_phase_hits: u64,
    /// Ray tests against inner boxes
    pub narrow_phase_tests: u64,
    /// Inner boxes skipped because their joint no longer resolved
    pub stale_skips: u64,
    /// Rays that produced a hit
    pub hits: u64,
}

/// Hit volumes for one character
#[derive(Debug)]
pub struct HitVolumeSet {
    outer: OuterHitbox,
    volumes: HitVolumes,
    cache: BindSpaceCache,
    report: RegionReport,
    stats: HitTestStats,
}

impl HitVolumeSet {
    /// Build volumes for a character whose skeleton is in its bind pose
    ///
    /// Never fails. Regions without a matching joint are left out; with no
    /// regions at all the set falls back to a single root volume, and with
    /// no skeleton to the outer box alone. What happened is recorded in
    /// [`Self::region_report`].
    pub fn build<C: Character + ?Sized>(character: &C, config: &HitboxConfig) -> Self {
        let world = character.world_transform();
        let outer = OuterHitbox::new(config.outer_box(), &world);
        let mut report = RegionReport::new(HitVolumeMode::SimplifiedOuter);

        let volumes = match character.skeleton() {
            None => {
                let err = HitboxError::MissingSkeleton;
                log::warn!("{err}");
                report.diagnostics.push(err);
                HitVolumes::Simplified { root: None }
            }
            Some(skeleton) if config.force_simplified => HitVolumes::Simplified {
                root: root_hitbox(skeleton, &outer, &world),
            },
            Some(skeleton) => {
                let builder = BoundsBuilder::new(
                    JointResolver::new(config.resolver.clone()),
                    config.regions.clone(),
                );
                let build = builder.build(skeleton, &world);

                for binding in build.bindings.iter().filter(|b| !b.is_resolved()) {
                    let err = HitboxError::MissingJoint {
                        region: binding.region,
                        canonical: binding.canonical.clone(),
                    };
                    log::debug!("{err}");
                    report.diagnostics.push(err);
                }

                let mut hitboxes = Vec::with_capacity(build.specs.len());
                for spec in build.specs {
                    if let Some(hitbox) = InnerHitbox::from_spec(spec) {
                        hitboxes.push(hitbox);
                    } else {
                        let err = HitboxError::DegenerateTransform {
                            joint: skeleton.joint_name(spec.joint).unwrap_or_default().to_string(),
                        };
                        log::warn!("{err}; dropping {} hitbox", spec.region);
                        report.diagnostics.push(err);
                    }
                }
                report.bindings = build.bindings;

                if hitboxes.is_empty() {
                    log::warn!("no body region could be bound; using a single root volume");
                    HitVolumes::Simplified {
                        root: root_hitbox(skeleton, &outer, &world),
                    }
                } else {
                    HitVolumes::Full { hitboxes }
                }
            }
        };

        report.mode = volumes.mode();
        if config.report_regions {
            report.log();
        }

        Self {
            outer,
            volumes,
            cache: BindSpaceCache::new(),
            report,
            stats: HitTestStats::default(),
        }
    }

    /// Replace the inner volumes with a single root volume
    ///
    /// The root joint's current pose is taken as its bind pose. Characters
    /// without a skeleton keep only the outer box.
    pub fn set_simplified_mode<C: Character + ?Sized>(&mut self, character: &C) {
        let world = character.world_transform();
        let root = character
            .skeleton()
            .and_then(|skeleton| root_hitbox(skeleton, &self.outer, &world));

        self.volumes = HitVolumes::Simplified { root };
        self.cache.clear();
        self.report.mode = self.volumes.mode();
        log::debug!("hit volumes switched to {:?}", self.report.mode);
    }

    /// Move the outer box to the character's current world transform
    pub fn update<C: Character + ?Sized>(&mut self, character: &C) {
        self.outer.update(&character.world_transform());
    }

    /// Test a world-space ray against this character
    ///
    /// Rays that miss the outer box cost one slab test. Otherwise the inner
    /// boxes are tested in order and the first hit wins. A hit on the outer
    /// box alone is not a hit, unless no inner volume could be tested: with
    /// no skeleton, or with every joint reference stale, the outer box hit
    /// is reported as [`BodyRegion::Body`].
    pub fn intersect_ray<C: Character + ?Sized>(
        &mut self,
        character: &C,
        ray: &Ray,
        step: SimulationStep,
    ) -> Option<RayHit> {
        self.stats.rays_tested += 1;
        let (outer_distance, outer_point) = self.outer.current.intersect_ray(ray)?;
        self.stats.broad_phase_hits += 1;

        let Self {
            volumes,
            cache,
            stats,
            ..
        } = self;
        let skeleton = character.skeleton();
        let tested_before = stats.narrow_phase_tests;

        let inner = match volumes {
            HitVolumes::Full { hitboxes } => hitboxes
                .iter()
                .find_map(|hitbox| narrow_phase(hitbox, skeleton, ray, step, cache, stats)),
            HitVolumes::Simplified { root: Some(root) } => {
                narrow_phase(root, skeleton, ray, step, cache, stats)
            }
            HitVolumes::Simplified { root: None } => None,
        };

        let hit = inner.or_else(|| {
            (stats.narrow_phase_tests == tested_before).then(|| {
                if !volumes.hitboxes().is_empty() {
                    log::debug!("no inner volume could be tested; reporting the outer box hit");
                }
                RayHit {
                    point: outer_point,
                    region: BodyRegion::Body,
                    distance: outer_distance,
                }
            })
        });

        if hit.is_some() {
            stats.hits += 1;
        }
        hit
    }

    /// Centre of the outer box in world space
    pub fn center(&self) -> Vec3 {
        self.outer.current.center()
    }

    /// Broad-phase box
    pub fn outer(&self) -> &OuterHitbox {
        &self.outer
    }

    /// Inner volumes
    pub fn volumes(&self) -> &HitVolumes {
        &self.volumes
    }

    /// Current volume layout
    pub fn mode(&self) -> HitVolumeMode {
        self.volumes.mode()
    }

    /// Inner boxes in test order
    pub fn hitboxes(&self) -> &[InnerHitbox] {
        self.volumes.hitboxes()
    }

    /// Outcome of the last build
    pub fn region_report(&self) -> &RegionReport {
        &self.report
    }

    /// Per-step inverse transform cache
    pub fn bind_cache(&self) -> &BindSpaceCache {
        &self.cache
    }

    /// Hit test counters since the last reset
    pub fn stats(&self) -> HitTestStats {
        self.stats
    }

    /// Zero the hit test counters
    pub fn reset_stats(&mut self) {
        self.stats = HitTestStats::default();
    }
}

/// Whole-body box on the skeleton root, snapshotting the current pose
fn root_hitbox(skeleton: &Skeleton, outer: &OuterHitbox, world: &Mat4) -> Option<InnerHitbox> {
    let joint = skeleton.root().and_then(|id| skeleton.joint_ref(id))?;
    let bind_matrix = skeleton.world_transform(joint)?;
    InnerHitbox::from_spec(InnerHitboxSpec {
        region: BodyRegion::Body,
        volume: outer.definition.transformed(world),
        joint,
        bind_matrix,
    })
}

fn narrow_phase(
    hitbox: &InnerHitbox,
    skeleton: Option<&Skeleton>,
    ray: &Ray,
    step: SimulationStep,
    cache: &mut BindSpaceCache,
    stats: &mut HitTestStats,
) -> Option<RayHit> {
    let Some(skeleton) = skeleton.filter(|s| s.world_transform(hitbox.joint).is_some()) else {
        stats.stale_skips += 1;
        log::warn!("{}", HitboxError::StaleJointReference { region: hitbox.region });
        return None;
    };

    let space = cache.joint_space(skeleton, hitbox.joint, step)?;
    stats.narrow_phase_tests += 1;

    // The hit point goes back through the same pair the ray came in with
    let bind_ray = ray.transformed(&(hitbox.bind_matrix * space.inverse_world));
    let (_, bind_point) = hitbox.volume.intersect_ray(&bind_ray)?;
    let point = hitbox.bind_to_world(&space.world).transform_point3(&bind_point);

    Some(RayHit {
        point,
        region: hitbox.region,
        distance: (point - ray.origin).norm(),
    })
}
