//! Closed-form ray/primitive intersection and surface normals.
//!
//! Everything here works in an object's model space: the ray origin has
//! already been translated by the object's position, so every primitive is
//! centered on (or passes through) the local origin.

use duet_core::Shape;
use duet_math::{Interval, Ray, Vec3};

/// Rays closer than this to parallel with a plane are treated as misses.
pub const PARALLEL_EPSILON: f32 = 1e-4;

/// Quadratic denominators smaller than this are treated as misses.
const QUADRATIC_EPSILON: f32 = 1e-12;

/// Signed distances at which a ray enters and leaves a primitive.
///
/// The two distances are not necessarily ordered; a miss is `(+inf, +inf)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub t0: f32,
    pub t1: f32,
}

impl Crossing {
    pub const MISS: Crossing = Crossing {
        t0: f32::INFINITY,
        t1: f32::INFINITY,
    };

    pub fn new(t0: f32, t1: f32) -> Self {
        Self { t0, t1 }
    }

    pub fn is_miss(&self) -> bool {
        self.t0 == f32::INFINITY && self.t1 == f32::INFINITY
    }

    /// The same crossing with `t0 <= t1`.
    pub fn ordered(&self) -> Crossing {
        if self.t0 > self.t1 {
            Crossing::new(self.t1, self.t0)
        } else {
            *self
        }
    }

    /// Nearest non-negative distance along the ray.
    ///
    /// When the ray starts inside the primitive the entry distance is
    /// negative and the exit distance is used instead.
    pub fn nearest(&self) -> Option<f32> {
        let Crossing { t0, t1 } = self.ordered();
        let t = if t0 < 0.0 { t1 } else { t0 };
        (t >= 0.0 && t.is_finite()).then_some(t)
    }
}

/// A primitive that can be intersected in its own model space.
pub trait Surface {
    /// Intersect a model-space ray with the primitive.
    fn intersect(&self, local_ray: &Ray) -> Crossing;

    /// Outward surface normal at a model-space point on the surface.
    fn normal_at(&self, local_point: Vec3) -> Vec3;
}

impl Surface for Shape {
    fn intersect(&self, local_ray: &Ray) -> Crossing {
        match *self {
            Shape::Sphere { radius } => intersect_sphere(local_ray, radius),
            Shape::Cube { size } => intersect_cube(local_ray, size),
            Shape::Plane { normal } => intersect_plane(local_ray, normal),
        }
    }

    fn normal_at(&self, local_point: Vec3) -> Vec3 {
        match *self {
            Shape::Sphere { .. } => local_point.normalize_or_zero(),
            Shape::Cube { size } => cube_normal(local_point, size),
            Shape::Plane { normal } => normal,
        }
    }
}

/// Sphere of `radius` centered on the origin.
///
/// Uses the numerically stable form of the quadratic formula: `q` takes the
/// sign of `b` so the two roots never come from subtracting nearly equal values.
pub fn intersect_sphere(ray: &Ray, radius: f32) -> Crossing {
    let a = ray.direction.length_squared();
    let b = 2.0 * ray.direction.dot(ray.origin);
    let c = ray.origin.length_squared() - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || a < QUADRATIC_EPSILON {
        return Crossing::MISS;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let q = if b < 0.0 {
        -0.5 * (b - sqrt_discriminant)
    } else {
        -0.5 * (b + sqrt_discriminant)
    };
    if q.abs() < QUADRATIC_EPSILON {
        return Crossing::MISS;
    }

    Crossing::new(q / a, c / q)
}

/// Plane through the origin with the given normal.
///
/// Planes have no far side, so both distances are the same.
pub fn intersect_plane(ray: &Ray, normal: Vec3) -> Crossing {
    let denominator = normal.dot(ray.direction);
    if denominator.abs() < PARALLEL_EPSILON {
        return Crossing::MISS;
    }

    let t = -ray.origin.dot(normal) / denominator;
    Crossing::new(t, t)
}

/// Axis-aligned box centered on the origin with full extents `size`.
///
/// Slab method: the running `[near, far]` span is narrowed axis by axis.
pub fn intersect_cube(ray: &Ray, size: Vec3) -> Crossing {
    let half = size / 2.0;
    let mut span = Interval::UNIVERSE;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];

        if direction == 0.0 {
            // Parallel to this slab: inside it or never
            if origin < -half[axis] || origin > half[axis] {
                return Crossing::MISS;
            }
            continue;
        }

        let t1 = (-half[axis] - origin) / direction;
        let t2 = (half[axis] - origin) / direction;
        span = span.intersect(Interval::new(t1.min(t2), t1.max(t2)));

        if span.is_empty() || span.max < 0.0 {
            return Crossing::MISS;
        }
    }

    Crossing::new(span.min, span.max)
}

/// Signed unit axis of the face containing `p`.
///
/// Ties go to the earlier axis (x, then y, then z).
fn cube_normal(p: Vec3, size: Vec3) -> Vec3 {
    let scaled = p / size;
    let magnitude = scaled.abs();

    if magnitude.x >= magnitude.y && magnitude.x >= magnitude.z {
        Vec3::new(scaled.x.signum(), 0.0, 0.0)
    } else if magnitude.y >= magnitude.z {
        Vec3::new(0.0, scaled.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, scaled.z.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn test_sphere_entry_and_exit() {
        for (d, r) in [(1.0, 1.0), (2.5, 0.5), (10.0, 3.0)] {
            let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0 * d), Vec3::Z);
            let crossing = intersect_sphere(&ray, r).ordered();

            assert_approx(crossing.t0, 2.0 * d - r);
            assert_approx(crossing.t1, 2.0 * d + r);
        }
    }

    #[test]
    fn test_sphere_miss() {
        // Passes beside the sphere
        let ray = Ray::new(Vec3::new(2.0, 0.0, -5.0), Vec3::Z);
        assert!(intersect_sphere(&ray, 1.0).is_miss());

        // Degenerate direction
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO);
        assert!(intersect_sphere(&ray, 1.0).is_miss());
    }

    #[test]
    fn test_sphere_behind_origin() {
        // Sphere entirely behind the ray: both distances negative
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        let crossing = intersect_sphere(&ray, 1.0);

        assert!(!crossing.is_miss());
        assert_eq!(crossing.nearest(), None);
    }

    #[test]
    fn test_plane_hit() {
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let crossing = intersect_plane(&ray, Vec3::Y);

        assert_approx(crossing.t0, 3.0);
        assert_eq!(crossing.t0, crossing.t1);
    }

    #[test]
    fn test_plane_parallel_miss() {
        for origin in [Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), Vec3::new(-3.0, -2.0, 7.0)] {
            let ray = Ray::new(origin, Vec3::new(1.0, 0.00001, 0.0).normalize());
            assert!(intersect_plane(&ray, Vec3::Y).is_miss());
        }
    }

    #[test]
    fn test_cube_from_outside() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let crossing = intersect_cube(&ray, Vec3::new(2.0, 2.0, 2.0));

        assert_approx(crossing.t0, 4.0);
        assert_approx(crossing.t1, 6.0);
    }

    #[test]
    fn test_cube_containment() {
        let ray = Ray::new(Vec3::new(0.25, -0.1, 0.3), Vec3::X);
        let crossing = intersect_cube(&ray, Vec3::new(1.0, 1.0, 1.0));

        assert!(crossing.t0 < 0.0);
        assert!(crossing.t1 > 0.0);
        assert_approx(crossing.nearest().unwrap(), 0.25);
    }

    #[test]
    fn test_cube_axis_parallel_outside_slab() {
        // Direction has no y component and the origin is above the slab
        let ray = Ray::new(Vec3::new(-5.0, 2.0, 0.0), Vec3::X);
        assert!(intersect_cube(&ray, Vec3::ONE).is_miss());
    }

    #[test]
    fn test_cube_behind() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X);
        assert!(intersect_cube(&ray, Vec3::ONE).is_miss());
    }

    #[test]
    fn test_normals() {
        let sphere = Shape::Sphere { radius: 2.0 };
        assert_eq!(sphere.normal_at(Vec3::new(0.0, 2.0, 0.0)), Vec3::Y);

        let plane = Shape::Plane { normal: Vec3::Y };
        assert_eq!(plane.normal_at(Vec3::new(4.0, 0.0, -3.0)), Vec3::Y);

        let cube = Shape::Cube {
            size: Vec3::new(2.0, 4.0, 2.0),
        };
        assert_eq!(cube.normal_at(Vec3::new(1.0, 0.5, 0.2)), Vec3::X);
        assert_eq!(cube.normal_at(Vec3::new(0.1, -2.0, 0.2)), Vec3::NEG_Y);
        assert_eq!(cube.normal_at(Vec3::new(0.1, 0.3, -1.0)), Vec3::NEG_Z);
    }

    #[test]
    fn test_cube_normal_tie_prefers_x() {
        let cube = Shape::Cube { size: Vec3::ONE };
        assert_eq!(cube.normal_at(Vec3::new(0.5, 0.5, 0.5)), Vec3::X);
        assert_eq!(cube.normal_at(Vec3::new(0.0, -0.5, 0.5)), Vec3::NEG_Y);
    }

    #[test]
    fn test_shape_dispatch() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);
        let sphere = Shape::Sphere { radius: 1.0 };

        assert_approx(sphere.intersect(&ray).nearest().unwrap(), 2.0);
    }
}
