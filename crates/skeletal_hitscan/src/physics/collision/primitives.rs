//! Primitive collision shapes and intersection algorithms
//!
//! Provides the ray and axis-aligned box used by every hit test, with
//! slab-based ray/box intersection and matrix transformation of both.

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Directions shorter than this on an axis are treated as parallel to that slab
const PARALLEL_EPSILON: f32 = 1.0e-8;

/// A ray for hitscan tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// The direction is normalized and must not be zero: a zero direction
    /// leaves NaN components and the ray misses every box. Use
    /// [`Self::try_new`] for directions that come from untrusted input.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Creates a new ray, or `None` if `direction` is too short to normalize
    pub fn try_new(origin: Vec3, direction: Vec3) -> Option<Self> {
        Some(Self {
            origin,
            direction: direction.try_normalize(PARALLEL_EPSILON)?,
        })
    }

    /// Creates a ray from `origin` aimed through `target`
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Re-express this ray in another coordinate space
    ///
    /// The origin is transformed as a point and the direction as a vector,
    /// then renormalized so distances stay meaningful in the new space.
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self::new(
            matrix.transform_point3(&self.origin),
            matrix.transform_vector3(&self.direction),
        )
    }
}

/// Axis-aligned bounding box in some local coordinate space
///
/// Invariant: `min <= max` component-wise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    /// Create a box spanning two opposite corners (in any order)
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Create a box centered at a point with given half extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        let extents = extents.abs();
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the box
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this box contains a point (boundary inclusive)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Box enclosing all eight corners of this box after `matrix`
    ///
    /// Transforming only min/max would be wrong as soon as the matrix
    /// rotates, so every corner is carried through.
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self.corners();
        let first = matrix.transform_point3(&corners[0]);
        let (min, max) = corners[1..]
            .iter()
            .map(|corner| matrix.transform_point3(corner))
            .fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p)));
        Self { min, max }
    }

    /// Test ray intersection with this box using the slab method
    ///
    /// Returns `(distance, point)` of the first intersection along the ray,
    /// or `None` if the ray misses. A ray starting inside the box hits at
    /// its own origin (distance 0). Intersections behind the origin are
    /// not reported.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        let mut t_enter = 0.0_f32;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (slab_min, slab_max) = (self.min[axis], self.max[axis]);

            if direction.abs() < PARALLEL_EPSILON {
                // Parallel to this slab: hit only if already between its planes
                if origin < slab_min || origin > slab_max {
                    return None;
                }
                continue;
            }

            let inv_dir = 1.0 / direction;
            let t1 = (slab_min - origin) * inv_dir;
            let t2 = (slab_max - origin) * inv_dir;
            let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);

            if t_enter > t_exit {
                return None;
            }
        }

        Some((t_enter, ray.point_at(t_enter)))
    }
}
