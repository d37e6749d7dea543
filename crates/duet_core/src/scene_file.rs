//! JSON scene descriptions.
//!
//! ```json
//! {
//!   "camera": { "position": [0, 0, -2], "target": [0, 0, 0] },
//!   "objects": [
//!     { "plane": { "position": [0, -1, 0], "normal": [0, 1, 0] } },
//!     { "sphere": { "position": [0, 0, 1], "radius": 0.5,
//!                   "material": { "base_color": [1, 0, 0] } } }
//!   ],
//!   "lights": [
//!     { "point": { "position": [0, 5, 0], "color": [1, 1, 1], "radius": 0.2 } }
//!   ]
//! }
//! ```

use std::path::Path;

use duet_math::{Camera, Color, Vec3};
use serde::Deserialize;
use thiserror::Error;

use crate::scene::{Light, Material, Object, Scene, SceneError};

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum SceneFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

fn default_up() -> Vec3 {
    Vec3::Y
}

fn default_intensity() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraDescription {
    pub position: Vec3,
    pub target: Vec3,
    #[serde(default = "default_up")]
    pub up: Vec3,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        position: Vec3,
        radius: f32,
        #[serde(default)]
        material: Material,
    },
    Cube {
        position: Vec3,
        size: Vec3,
        #[serde(default)]
        material: Material,
    },
    Plane {
        position: Vec3,
        normal: Vec3,
        #[serde(default)]
        material: Material,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightDescription {
    Point {
        position: Vec3,
        color: Color,
        #[serde(default = "default_intensity")]
        intensity: f32,
        #[serde(default)]
        radius: f32,
    },
    Directional {
        direction: Vec3,
        color: Color,
        #[serde(default = "default_intensity")]
        intensity: f32,
        #[serde(default)]
        angular_radius: f32,
    },
}

/// A scene as written in a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
    #[serde(default)]
    pub lights: Vec<LightDescription>,
}

impl SceneDescription {
    /// Parse a description from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SceneFileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the scene, appending objects and lights in file order.
    pub fn into_scene(self) -> Result<Scene, SceneError> {
        let camera = Camera::looking_at(self.camera.position, self.camera.target, self.camera.up);
        let mut scene = Scene::new(camera);

        for object in self.objects {
            let object = match object {
                ObjectDescription::Sphere {
                    position,
                    radius,
                    material,
                } => Object::sphere(position, radius, material),
                ObjectDescription::Cube {
                    position,
                    size,
                    material,
                } => Object::cube(position, size, material),
                ObjectDescription::Plane {
                    position,
                    normal,
                    material,
                } => Object::plane(position, normal, material),
            };
            scene.add_object(object)?;
        }

        for light in self.lights {
            let light = match light {
                LightDescription::Point {
                    position,
                    color,
                    intensity,
                    radius,
                } => Light::point(position, color, intensity, radius),
                LightDescription::Directional {
                    direction,
                    color,
                    intensity,
                    angular_radius,
                } => Light::directional(direction, color, intensity, angular_radius),
            };
            scene.add_light(light)?;
        }

        Ok(scene)
    }
}

/// Load a JSON scene file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneFileError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let scene = SceneDescription::from_json_str(&json)?.into_scene()?;

    log::info!(
        "Loaded {:?}: {} objects, {} lights",
        path,
        scene.objects().len(),
        scene.lights().len()
    );

    Ok(scene)
}
