//! Duet Viewport - puts rendered scenes on screen with wgpu.
//!
//! A [`SceneRenderer`] owns whatever GPU resources its back end needs and
//! draws one frame per call. The viewer holds it as a trait object so the
//! back end can be swapped at runtime.

use anyhow::Result;
use duet_core::Scene;

mod gpu;
mod ray_tracing;

pub use gpu::Gpu;
pub use ray_tracing::{frame_texture_format, QuadVertex, RayTracingRenderer, QUAD_VERTICES};

/// A back end that draws a [`Scene`] into the window surface.
pub trait SceneRenderer {
    /// Short human readable name, used in logs and the window title
    fn name(&self) -> &'static str;

    /// Draw one frame and present it.
    ///
    /// Surface errors (`wgpu::SurfaceError`) are returned inside the
    /// `anyhow::Error` so the caller can reconfigure and retry.
    fn render(&mut self, gpu: &Gpu, scene: &Scene) -> Result<()>;

    /// Release GPU resources explicitly.
    fn destroy(self: Box<Self>);
}
