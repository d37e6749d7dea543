use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// Rays are used for ray casting - they represent a half-line starting at
/// `origin` and traveling along `direction`. The direction is not required to
/// be normalized, but every caller in the tracer normalizes before casting so
/// that the parameter `t` is a world-space distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray expressed relative to `center`, i.e. with the origin
    /// translated by `-center`. Directions are unaffected by translation.
    #[inline]
    pub fn relative_to(&self, center: Vec3) -> Ray {
        Ray::new(self.origin - center, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_relative_to() {
        let ray = Ray::new(Vec3::new(1.0, 1.0, 1.0), Vec3::Y);
        let local = ray.relative_to(Vec3::new(1.0, 0.0, -1.0));

        assert_eq!(local.origin, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(local.direction, Vec3::Y);
    }
}
