//! Duet Tracer - CPU ray tracing with temporal sample accumulation
//!
//! Renders a [`duet_core::Scene`] one frame at a time. Each frame casts one
//! primary ray per pixel plus a few stochastic shadow and bounce rays, and
//! folds those samples into a per-pixel cache so soft shadows and indirect
//! light converge while the camera holds still.

mod cache;
mod camera;
mod config;
mod geometry;
mod hit;
mod image;
mod renderer;
mod sampling;
mod shading;

pub use cache::{BounceSamples, SampleCache, ShadowSamples};
pub use camera::{viewport_to_ndc, PrimaryRays};
pub use config::{ConfigError, RenderConfig, Threading};
pub use geometry::{Crossing, Surface};
pub use hit::{cast, Hit};
pub use image::{color_to_rgb, ImageBuffer};
pub use renderer::FrameRenderer;
pub use shading::blinn_phong;

/// Re-export common math types from duet_math
pub use duet_math::{Color, Vec3};
