//! Primary ray generation.

use duet_math::{Camera, Mat4, Projection, Ray, Vec2, Vec4};

/// Map a window position to normalized device coordinates in `[-1, 1]`.
///
/// Window y grows upwards, the same way as clip space, so pixel row 0 is the
/// bottom of the image.
#[inline]
pub fn viewport_to_ndc(position: Vec2, viewport_size: Vec2) -> Vec2 {
    (position / viewport_size - Vec2::splat(0.5)) * 2.0
}

/// Generates one world-space ray through the center of each pixel.
///
/// Pixel centers are unprojected through the inverse viewport, inverse
/// projection and inverse view transforms onto the near plane.
#[derive(Debug, Clone)]
pub struct PrimaryRays {
    view_inverse: Mat4,
    projection_inverse: Mat4,
    viewport_size: Vec2,
}

impl PrimaryRays {
    pub fn new(camera: &Camera, projection: &Projection, width: u32, height: u32) -> Self {
        Self {
            view_inverse: camera.view_matrix().inverse(),
            projection_inverse: projection.matrix().inverse(),
            viewport_size: Vec2::new(width as f32, height as f32),
        }
    }

    /// Generate the ray for pixel (x, y).
    pub fn ray(&self, x: u32, y: u32) -> Ray {
        let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        let ndc = viewport_to_ndc(pixel_center, self.viewport_size);

        let clip = Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let view_point = self.projection_inverse * clip;
        let world_point = self.view_inverse * view_point;
        let origin = world_point.truncate() / world_point.w;

        // w = 0 keeps the view translation out of the direction
        let view_direction = view_point.truncate().extend(0.0);
        let direction = (self.view_inverse * view_direction)
            .truncate()
            .normalize_or_zero();

        Ray::new(origin, direction)
    }
}
