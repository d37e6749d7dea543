use glam::{Mat4, Vec3};

/// Camera pose: where the eye is and where it looks.
///
/// `direction` and `target` are kept loosely consistent by the movement
/// helpers; view matrices are built from `position`, `direction` and `up` only.
///
/// Movement helpers never mutate in place. Each returns a transformed copy so
/// a scene can swap cameras atomically through `Scene::set_camera`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub target: Vec3,
}

impl Camera {
    /// Create a camera at `position` looking towards `target`.
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            direction: (target - position).normalize_or_zero(),
            up,
            target,
        }
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.direction, self.up)
    }

    /// Translate position and target by `delta`.
    fn translated(&self, delta: Vec3) -> Self {
        Self {
            position: self.position + delta,
            target: self.target + delta,
            ..*self
        }
    }

    /// Unit vector pointing to the camera's right.
    fn right(&self) -> Vec3 {
        self.direction.cross(self.up).normalize_or_zero()
    }

    pub fn moved_forwards(&self, distance: f32) -> Self {
        self.translated(self.direction * distance)
    }

    pub fn moved_backwards(&self, distance: f32) -> Self {
        self.translated(self.direction * -distance)
    }

    pub fn moved_left(&self, distance: f32) -> Self {
        self.translated(self.right() * -distance)
    }

    pub fn moved_right(&self, distance: f32) -> Self {
        self.translated(self.right() * distance)
    }

    /// Rotate the view direction by `delta_phi` around the Y axis and
    /// `delta_theta` around the X axis, keeping the position fixed.
    pub fn rotated(&self, delta_phi: f32, delta_theta: f32) -> Self {
        let rotation = Mat4::from_rotation_y(delta_phi) * Mat4::from_rotation_x(delta_theta);
        let direction = rotation.transform_vector3(self.direction);
        Self {
            direction,
            target: self.position + direction,
            ..*self
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO, Vec3::Y)
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y,
            aspect,
            near,
            far,
        }
    }

    /// Get the projection matrix (camera → clip space).
    ///
    /// Uses the OpenGL depth convention: the near plane maps to clip z = -1.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(45.0_f32.to_radians(), 4.0 / 3.0, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_looking_at() {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO, Vec3::Y);

        assert_eq!(camera.direction, Vec3::Z);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);

        let view = camera.view_matrix();
        // The target ends up straight ahead, down the -Z view axis
        let target_view = view.transform_point3(Vec3::ZERO);
        assert_close(target_view, Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_movement_copies() {
        let camera = Camera::default();
        let moved = camera.moved_forwards(1.0);

        // Input untouched
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, -2.0));
        assert_close(moved.position, Vec3::new(0.0, 0.0, -1.0));
        assert_close(moved.target, Vec3::new(0.0, 0.0, 1.0));

        let back = moved.moved_backwards(1.0);
        assert_close(back.position, camera.position);
    }

    #[test]
    fn test_strafe() {
        // Looking down +Z with Y up, right is -X
        let camera = Camera::default();
        assert_close(camera.moved_right(1.0).position, Vec3::new(-1.0, 0.0, -2.0));
        assert_close(camera.moved_left(1.0).position, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_rotated_keeps_position() {
        let camera = Camera::default();
        let turned = camera.rotated(std::f32::consts::FRAC_PI_2, 0.0);

        assert_eq!(turned.position, camera.position);
        assert_close(turned.direction, Vec3::X);
        assert_close(turned.target, camera.position + Vec3::X);
    }

    #[test]
    fn test_projection_matrix() {
        let projection = Projection::default();
        let proj = projection.matrix();

        // A point on the near plane lands on clip z = -1
        let near_point = proj.project_point3(Vec3::new(0.0, 0.0, -projection.near));
        assert!((near_point.z + 1.0).abs() < 1e-4);
    }
}
