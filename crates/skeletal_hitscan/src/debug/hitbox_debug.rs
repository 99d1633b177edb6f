//! Hit volume visualization
//!
//! Turns a character's hit volumes and the outcome of ray tests into
//! [`DebugShape`]s: the outer box, every inner box at its current pose,
//! shot rays and hit points.

use crate::character::Character;
use crate::foundation::math::{Vec3, Vec4};
use crate::hitbox::{HitVolumeSet, RayHit};
use crate::physics::Ray;

use super::draw::{DebugDrawSystem, DebugShape};

/// Colour scheme for hit volume visualization
#[derive(Clone, Debug)]
pub struct HitboxDebugColors {
    /// Outer (broad-phase) box
    pub outer: Vec4,
    /// Inner (per-region) boxes
    pub inner: Vec4,
    /// Rays that hit
    pub ray_hit: Vec4,
    /// Rays that missed
    pub ray_miss: Vec4,
    /// Hit point markers
    pub hit_point: Vec4,
}

impl Default for HitboxDebugColors {
    fn default() -> Self {
        Self {
            outer: Vec4::new(0.5, 0.8, 1.0, 0.3),
            inner: Vec4::new(0.0, 1.0, 0.0, 0.6),
            ray_hit: Vec4::new(1.0, 0.0, 0.0, 1.0),
            ray_miss: Vec4::new(0.6, 0.6, 0.6, 0.5),
            hit_point: Vec4::new(1.0, 1.0, 0.0, 1.0),
        }
    }
}

/// Hit volume debug visualizer
#[derive(Debug)]
pub struct HitboxDebugVisualizer {
    debug_draw: DebugDrawSystem,
    colors: HitboxDebugColors,

    /// Show the outer box
    pub show_outer: bool,

    /// Show inner boxes
    pub show_inner: bool,

    /// Show rays and hit points
    pub show_shots: bool,

    /// How long shot markers stay visible, in seconds
    pub shot_duration: f32,

    /// Length of a drawn ray that missed
    pub miss_length: f32,
}

impl HitboxDebugVisualizer {
    /// Create a visualizer with everything enabled
    pub fn new() -> Self {
        Self {
            debug_draw: DebugDrawSystem::new(),
            colors: HitboxDebugColors::default(),
            show_outer: true,
            show_inner: true,
            show_shots: true,
            shot_duration: 1.0,
            miss_length: 50.0,
        }
    }

    /// Set custom colour scheme
    pub fn with_colors(mut self, colors: HitboxDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Draw a character's volumes for the current frame
    ///
    /// Inner boxes whose joint no longer resolves are not drawn.
    pub fn draw_volumes<C: Character + ?Sized>(&mut self, volumes: &HitVolumeSet, character: &C) {
        if self.show_outer {
            self.debug_draw.draw(DebugShape::WireBox {
                corners: volumes.outer().current().corners(),
                color: self.colors.outer,
                duration: 0.0,
            });
        }

        if !self.show_inner {
            return;
        }
        let Some(skeleton) = character.skeleton() else {
            return;
        };
        for hitbox in volumes.hitboxes() {
            if let Some(corners) = hitbox.world_corners(skeleton) {
                self.debug_draw.draw(DebugShape::WireBox {
                    corners,
                    color: self.colors.inner,
                    duration: 0.0,
                });
            }
        }
    }

    /// Draw a shot and its outcome
    pub fn draw_shot(&mut self, ray: &Ray, hit: Option<&RayHit>) {
        if !self.show_shots {
            return;
        }

        let (end, color) = match hit {
            Some(hit) => (hit.point, self.colors.ray_hit),
            None => (ray.point_at(self.miss_length), self.colors.ray_miss),
        };
        self.debug_draw.draw(DebugShape::Line {
            start: ray.origin,
            end,
            color,
            duration: self.shot_duration,
        });

        if let Some(hit) = hit {
            self.draw_hit_point(hit.point);
        }
    }

    fn draw_hit_point(&mut self, position: Vec3) {
        self.debug_draw.draw(DebugShape::Point {
            position,
            color: self.colors.hit_point,
            size: 0.03,
            duration: self.shot_duration,
        });
    }

    /// Expire temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        self.debug_draw.update(delta_time);
    }

    /// Get all debug shapes for rendering
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        self.debug_draw.get_shapes()
    }

    /// Clear all visualization
    pub fn clear(&mut self) {
        self.debug_draw.clear();
    }

    /// Enable/disable the entire debug system
    pub fn set_enabled(&mut self, enabled: bool) {
        self.debug_draw.enabled = enabled;
    }

    /// Check if debug system is enabled
    pub fn is_enabled(&self) -> bool {
        self.debug_draw.enabled
    }
}

impl Default for HitboxDebugVisualizer {
    fn default() -> Self {
        Self::new()
    }
}
