//! Debug drawing primitives
//!
//! Shapes are plain data for whatever renderer the game uses. Temporary
//! shapes expire after their duration; persistent shapes stay until removed.

use std::collections::HashMap;

use crate::foundation::math::{Vec3, Vec4};

/// Debug shape primitives
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        /// Segment start
        start: Vec3,
        /// Segment end
        end: Vec3,
        /// RGBA colour
        color: Vec4,
        /// Remaining lifetime in seconds
        duration: f32,
    },

    /// Oriented box given by its eight world-space corners
    ///
    /// Corner order follows [`BoundingBox::corners`](crate::physics::BoundingBox::corners).
    WireBox {
        /// World-space corners
        corners: [Vec3; 8],
        /// RGBA colour
        color: Vec4,
        /// Remaining lifetime in seconds
        duration: f32,
    },

    /// Point marker
    Point {
        /// Position
        position: Vec3,
        /// RGBA colour
        color: Vec4,
        /// Marker size
        size: f32,
        /// Remaining lifetime in seconds
        duration: f32,
    },
}

impl DebugShape {
    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            Self::Line { duration, .. }
            | Self::WireBox { duration, .. }
            | Self::Point { duration, .. } => *duration,
        }
    }

    /// Decrease duration by `delta_time`, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        match self {
            Self::Line { duration, .. }
            | Self::WireBox { duration, .. }
            | Self::Point { duration, .. } => {
                *duration -= delta_time;
                *duration <= 0.0
            }
        }
    }

    /// Line segments making up this shape
    pub fn edges(&self) -> Vec<(Vec3, Vec3)> {
        match self {
            Self::Line { start, end, .. } => vec![(*start, *end)],
            Self::WireBox { corners, .. } => BOX_EDGES
                .iter()
                .map(|&(a, b)| (corners[a], corners[b]))
                .collect(),
            Self::Point { .. } => Vec::new(),
        }
    }
}

/// Corner index pairs of the twelve box edges
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Collects debug shapes for rendering
#[derive(Debug)]
pub struct DebugDrawSystem {
    temporary_shapes: Vec<DebugShape>,
    persistent_shapes: HashMap<String, DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: HashMap::new(),
            enabled: true,
        }
    }

    /// Queue a temporary shape
    pub fn draw(&mut self, shape: DebugShape) {
        if self.enabled {
            self.temporary_shapes.push(shape);
        }
    }

    /// Draw a shape that remains until explicitly removed
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape) {
        if self.enabled {
            self.persistent_shapes.insert(id.into(), shape);
        }
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent_shapes.remove(id);
    }

    /// Remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }
        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Get all shapes for rendering (both temporary and persistent)
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }
        self.temporary_shapes
            .iter()
            .chain(self.persistent_shapes.values())
            .collect()
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }

    /// Clear all shapes (temporary and persistent)
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.persistent_shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}
