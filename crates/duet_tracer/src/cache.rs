//! Temporal sample accumulation.
//!
//! Each frame adds a few stochastic samples per pixel; the cache keeps the
//! running totals so soft shadows and indirect light converge while the
//! camera stays still. The whole cache is cleared when the scene id changes.

use duet_math::Color;

/// Running shadow-ray statistics for one pixel and one light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShadowSamples {
    /// Shadow rays cast
    pub total: u32,
    /// Shadow rays that reached the light
    pub unoccluded: u32,
}

impl ShadowSamples {
    pub fn record(&mut self, occluded: bool) {
        self.total += 1;
        if !occluded {
            self.unoccluded += 1;
        }
    }

    /// Fraction of samples that reached the light, or `None` if the light
    /// has never been seen from this pixel.
    pub fn visibility(&self) -> Option<f32> {
        (self.unoccluded > 0).then(|| self.unoccluded as f32 / self.total as f32)
    }
}

/// Running indirect-light statistics for one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BounceSamples {
    /// Bounce rays cast
    pub total: u32,
    /// Sum of all bounce contributions
    pub sum: Color,
}

impl BounceSamples {
    /// Add the summed contribution of `count` new samples.
    pub fn record(&mut self, contribution: Color, count: u32) {
        self.sum += contribution;
        self.total += count;
    }

    pub fn mean(&self) -> Color {
        if self.total == 0 {
            Color::ZERO
        } else {
            self.sum / self.total as f32
        }
    }
}

/// Per-pixel sample accumulators, sized once for a resolution and a maximum
/// light count.
///
/// Storage is row-major: shadow samples at `(y * width + x) * light_slots + light`,
/// bounce samples at `y * width + x`.
#[derive(Debug, Clone)]
pub struct SampleCache {
    width: u32,
    height: u32,
    light_slots: usize,
    scene_id: Option<u64>,
    shadow: Vec<ShadowSamples>,
    bounce: Vec<BounceSamples>,
}

impl SampleCache {
    pub fn new(width: u32, height: u32, light_slots: usize) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            light_slots,
            scene_id: None,
            shadow: vec![ShadowSamples::default(); pixels * light_slots],
            bounce: vec![BounceSamples::default(); pixels],
        }
    }

    /// Clear everything if `scene_id` differs from the last one seen.
    ///
    /// Returns true when the cache was reset.
    pub fn sync(&mut self, scene_id: u64) -> bool {
        if self.scene_id == Some(scene_id) {
            return false;
        }
        self.reset();
        self.scene_id = Some(scene_id);
        true
    }

    /// Zero every accumulator.
    pub fn reset(&mut self) {
        self.shadow.fill(ShadowSamples::default());
        self.bounce.fill(BounceSamples::default());
    }

    /// The scene id the cache currently holds samples for.
    pub fn scene_id(&self) -> Option<u64> {
        self.scene_id
    }

    pub fn light_slots(&self) -> usize {
        self.light_slots
    }

    pub fn shadow(&self, x: u32, y: u32, light: usize) -> ShadowSamples {
        self.shadow[self.pixel_index(x, y) * self.light_slots + light]
    }

    pub fn bounce(&self, x: u32, y: u32) -> BounceSamples {
        self.bounce[self.pixel_index(x, y)]
    }

    /// Mutable views of both accumulators, for splitting into rows.
    pub(crate) fn slices_mut(&mut self) -> (&mut [ShadowSamples], &mut [BounceSamples]) {
        (&mut self.shadow, &mut self.bounce)
    }

    fn pixel_index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }
}
