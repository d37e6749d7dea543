//! RGB8 image buffer produced by the frame renderer.

use duet_math::{Color, Interval};

/// Bytes per pixel in an [`ImageBuffer`].
pub const CHANNELS: usize = 3;

/// Convert a linear color to 8-bit RGB, clamping each channel to [0, 1].
#[inline]
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        (255.0 * Interval::UNIT.clamp(color.x)) as u8,
        (255.0 * Interval::UNIT.clamp(color.y)) as u8,
        (255.0 * Interval::UNIT.clamp(color.z)) as u8,
    ]
}

/// Densely packed row-major RGB image, 3 bytes per pixel.
///
/// Row 0 is the bottom row of the picture, matching texture uploads where the
/// first row lands at texture coordinate v = 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    /// Bytes in one row.
    pub fn row_len(&self) -> usize {
        self.width as usize * CHANNELS
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Get the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Set the pixel at (x, y), clamping the color.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&color_to_rgb(color));
    }

    /// Expand to RGBA with opaque alpha (for GPU formats without RGB8).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() / CHANNELS * 4);
        for rgb in self.data.chunks_exact(CHANNELS) {
            bytes.extend_from_slice(rgb);
            bytes.push(255);
        }
        bytes
    }
}
