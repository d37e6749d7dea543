// Re-export glam for convenience
pub use glam::*;

// Duet math types
mod camera;
mod interval;
mod ray;

pub use camera::{Camera, Projection};
pub use interval::Interval;
pub use ray::Ray;

/// RGB color, components nominally in [0, 1] but unbounded until written to an image.
pub type Color = Vec3;
