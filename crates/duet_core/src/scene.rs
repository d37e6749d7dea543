//! Scene types for Duet.
//!
//! A scene is a bounded, append-only collection of analytic objects and
//! lights plus one camera. Both renderers read it; only the caller mutates it.

use duet_math::{Camera, Color, Vec3, Vec4};
use serde::Deserialize;
use thiserror::Error;

/// Maximum number of objects a scene can hold.
pub const MAX_OBJECT_COUNT: usize = 512;

/// Maximum number of lights a scene can hold.
///
/// Per-light sample caches are sized by this constant.
pub const MAX_LIGHT_COUNT: usize = 8;

/// Errors that can occur while building a scene.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("Object capacity exceeded (max {})", MAX_OBJECT_COUNT)]
    ObjectCapacity,

    #[error("Light capacity exceeded (max {})", MAX_LIGHT_COUNT)]
    LightCapacity,
}

/// Blinn-Phong surface description.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Diffuse color (RGB, nominally 0-1)
    pub base_color: Color,

    /// Specular coefficient
    pub specular: f32,

    /// Blinn-Phong exponent
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Color::splat(0.8),
            specular: 0.5,
            shininess: 32.0,
        }
    }
}

impl Material {
    /// Create a new material.
    pub fn new(base_color: Color, specular: f32, shininess: f32) -> Self {
        Self {
            base_color,
            specular,
            shininess,
        }
    }

    /// A purely diffuse material.
    pub fn matte(base_color: Color) -> Self {
        Self::new(base_color, 0.0, 1.0)
    }
}

/// Geometric shape of an object, in the object's model space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere {
        radius: f32,
    },
    /// Axis-aligned box centered on the object position.
    Cube {
        /// Full extents along each axis (not half-extents)
        size: Vec3,
    },
    /// Infinite plane through the object position.
    Plane {
        /// Unit normal
        normal: Vec3,
    },
}

/// An object placed in the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Object {
    /// World-space position (origin of the object's model space)
    pub position: Vec3,
    pub material: Material,
    pub shape: Shape,
}

impl Object {
    pub fn sphere(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            position: center,
            material,
            shape: Shape::Sphere { radius },
        }
    }

    pub fn cube(center: Vec3, size: Vec3, material: Material) -> Self {
        Self {
            position: center,
            material,
            shape: Shape::Cube { size },
        }
    }

    /// Create a plane through `position`. The normal is normalized.
    pub fn plane(position: Vec3, normal: Vec3, material: Material) -> Self {
        Self {
            position,
            material,
            shape: Shape::Plane {
                normal: normal.normalize_or_zero(),
            },
        }
    }
}

/// Kind of light, derived from the homogeneous `w` of its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    /// `w == 0`: xyz is the direction from surfaces towards the light
    Directional,
    /// `w == 1`: xyz is a world-space position
    Point,
}

/// A point or directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    /// Homogeneous position; `w` is the sole discriminant of the light kind.
    /// Only set by the constructors, so `w` is always exactly 0 or 1.
    position: Vec4,

    pub color: Color,

    /// Carried for scene descriptions; shading uses `color` directly
    pub intensity: f32,

    /// Jitter radius of a point light's sample position (world units)
    pub radius: f32,

    /// Jitter magnitude of a directional light's sample direction
    pub angular_radius: f32,
}

impl Light {
    /// Create a point light at `position`.
    pub fn point(position: Vec3, color: Color, intensity: f32, radius: f32) -> Self {
        Self {
            position: position.extend(1.0),
            color,
            intensity,
            radius,
            angular_radius: 0.0,
        }
    }

    /// Create a directional light shining from `direction` (surface → light).
    /// The direction is normalized.
    pub fn directional(direction: Vec3, color: Color, intensity: f32, angular_radius: f32) -> Self {
        Self {
            position: direction.normalize_or_zero().extend(0.0),
            color,
            intensity,
            radius: 0.0,
            angular_radius,
        }
    }

    pub fn kind(&self) -> LightKind {
        if self.position.w == 0.0 {
            LightKind::Directional
        } else {
            LightKind::Point
        }
    }

    /// Homogeneous position: `w == 1` for point lights, `w == 0` for
    /// directional ones.
    #[inline]
    pub fn position(&self) -> Vec4 {
        self.position
    }

    /// Position of a point light, or direction of a directional one.
    #[inline]
    pub fn xyz(&self) -> Vec3 {
        self.position.truncate()
    }
}

/// A complete scene: objects, lights, and the camera viewing them.
///
/// The `id` advances every time the camera is replaced through
/// [`Scene::set_camera`]. Renderers key their temporal caches on it, so
/// appending objects or lights after the first frame does not invalidate
/// accumulated samples.
#[derive(Clone, Debug)]
pub struct Scene {
    objects: Vec<Object>,
    lights: Vec<Light>,
    camera: Camera,
    id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Camera::default())
    }
}

impl Scene {
    /// Create an empty scene viewed from `camera`.
    pub fn new(camera: Camera) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            camera,
            id: 0,
        }
    }

    /// Add an object and return its index.
    pub fn add_object(&mut self, object: Object) -> Result<usize, SceneError> {
        if self.objects.len() >= MAX_OBJECT_COUNT {
            return Err(SceneError::ObjectCapacity);
        }
        self.objects.push(object);
        Ok(self.objects.len() - 1)
    }

    /// Add a light and return its index.
    pub fn add_light(&mut self, light: Light) -> Result<usize, SceneError> {
        if self.lights.len() >= MAX_LIGHT_COUNT {
            return Err(SceneError::LightCapacity);
        }
        self.lights.push(light);
        Ok(self.lights.len() - 1)
    }

    pub fn add_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        material: Material,
    ) -> Result<usize, SceneError> {
        self.add_object(Object::sphere(center, radius, material))
    }

    pub fn add_cube(
        &mut self,
        center: Vec3,
        size: Vec3,
        material: Material,
    ) -> Result<usize, SceneError> {
        self.add_object(Object::cube(center, size, material))
    }

    pub fn add_plane(
        &mut self,
        position: Vec3,
        normal: Vec3,
        material: Material,
    ) -> Result<usize, SceneError> {
        self.add_object(Object::plane(position, normal, material))
    }

    pub fn add_point_light(
        &mut self,
        position: Vec3,
        color: Color,
        radius: f32,
    ) -> Result<usize, SceneError> {
        self.add_light(Light::point(position, color, 1.0, radius))
    }

    pub fn add_directional_light(
        &mut self,
        direction: Vec3,
        color: Color,
        angular_radius: f32,
    ) -> Result<usize, SceneError> {
        self.add_light(Light::directional(direction, color, 1.0, angular_radius))
    }

    /// Replace the camera. This is the only way to move the view, and the
    /// only operation that advances the scene id.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.id += 1;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Identity counter, incremented on every camera replacement.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Lights in insertion order.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// The scene shown when the viewer starts without a scene file.
    pub fn demo() -> Self {
        let camera = Camera::looking_at(Vec3::new(0.0, 1.0, -5.0), Vec3::ZERO, Vec3::Y);
        let mut scene = Self::new(camera);

        scene.objects = vec![
            Object::plane(
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::Y,
                Material::new(Color::new(0.9, 0.9, 0.9), 0.1, 8.0),
            ),
            Object::sphere(
                Vec3::new(-1.2, 0.0, 0.5),
                1.0,
                Material::new(Color::new(0.9, 0.2, 0.2), 0.6, 64.0),
            ),
            Object::sphere(
                Vec3::new(1.3, -0.4, -0.3),
                0.6,
                Material::new(Color::new(0.2, 0.4, 0.9), 0.8, 128.0),
            ),
            Object::cube(
                Vec3::new(0.2, -0.6, 2.0),
                Vec3::new(0.8, 0.8, 0.8),
                Material::new(Color::new(0.2, 0.8, 0.3), 0.3, 16.0),
            ),
        ];
        scene.lights = vec![
            Light::point(Vec3::new(2.0, 4.0, -2.0), Color::new(0.9, 0.85, 0.8), 1.0, 0.4),
            Light::directional(Vec3::new(-0.5, 1.0, -0.3), Color::splat(0.3), 1.0, 0.05),
        ];

        scene
    }
}
