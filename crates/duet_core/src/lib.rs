//! Duet Core - Scene model shared by the ray tracing and rasterization back ends.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Object`, `Shape`, `Material`, `Light`
//! - **Scene files**: JSON scene descriptions loaded into a `Scene`
//!
//! # Example
//!
//! ```ignore
//! use duet_core::load_scene;
//!
//! let scene = load_scene("assets/room.json")?;
//! println!("Loaded {} objects, {} lights",
//!     scene.objects().len(),
//!     scene.lights().len());
//! ```

pub mod scene;
pub mod scene_file;

// Re-export commonly used types
pub use scene::{
    Light, LightKind, Material, Object, Scene, SceneError, Shape, MAX_LIGHT_COUNT,
    MAX_OBJECT_COUNT,
};
pub use scene_file::{load_scene, SceneDescription, SceneFileError};
