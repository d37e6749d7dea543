//! Render configuration.

use duet_math::{Color, Projection};
use thiserror::Error;

/// How a frame's rows are distributed across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Threading {
    /// Every pixel on the calling thread.
    #[default]
    Single,
    /// Rows rendered in parallel with rayon. Each row owns disjoint slices of
    /// the image and sample cache and its own random stream.
    Rows,
}

/// Errors reported by [`RenderConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid resolution: {width}x{height}")]
    Resolution { width: u32, height: u32 },

    #[error("Sample counts per frame must be at least 1")]
    SampleCount,

    #[error("Invalid depth range: near={near}, far={far}")]
    DepthRange { near: f32, far: f32 },

    #[error("Invalid vertical field of view: {0} degrees")]
    FieldOfView(f32),

    #[error("Invalid surface bias: {0}")]
    SurfaceBias(f32),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Color written when the primary ray hits nothing
    pub background: Color,
    /// Distance secondary rays start off the surface to avoid self-hits
    pub surface_bias: f32,
    /// Shadow samples per pixel, per light, per frame
    pub shadow_samples_per_frame: u32,
    /// Indirect bounce samples per pixel per frame
    pub bounce_samples_per_frame: u32,
    pub threading: Threading,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov_y_degrees: 45.0,
            z_near: 0.1,
            z_far: 100.0,
            background: Color::ZERO,
            surface_bias: 1e-4,
            shadow_samples_per_frame: 1,
            bounce_samples_per_frame: 1,
            threading: Threading::Single,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set per-frame sample counts.
    pub fn with_samples(mut self, shadow: u32, bounce: u32) -> Self {
        self.shadow_samples_per_frame = shadow;
        self.bounce_samples_per_frame = bounce;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_threading(mut self, threading: Threading) -> Self {
        self.threading = threading;
        self
    }

    /// Projection for the configured resolution.
    pub fn projection(&self) -> Projection {
        Projection::new(
            self.fov_y_degrees.to_radians(),
            self.width as f32 / self.height as f32,
            self.z_near,
            self.z_far,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Resolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.shadow_samples_per_frame == 0 || self.bounce_samples_per_frame == 0 {
            return Err(ConfigError::SampleCount);
        }
        if !(self.z_near > 0.0 && self.z_far > self.z_near) {
            return Err(ConfigError::DepthRange {
                near: self.z_near,
                far: self.z_far,
            });
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_y_degrees));
        }
        if !(self.surface_bias.is_finite() && self.surface_bias >= 0.0) {
            return Err(ConfigError::SurfaceBias(self.surface_bias));
        }
        Ok(())
    }
}
