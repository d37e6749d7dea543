//! Frame renderer.
//!
//! Per pixel:
//! - One primary ray through the pixel center, nearest hit over the scene
//! - Per light, stochastic shadow samples accumulated across frames (soft shadows)
//! - One random indirect bounce, accumulated as a running average
//!
//! Accumulated samples persist until the scene's camera is replaced.

use std::time::Instant;

use crate::cache::{BounceSamples, SampleCache, ShadowSamples};
use crate::camera::PrimaryRays;
use crate::config::{ConfigError, RenderConfig, Threading};
use crate::hit::{cast, Hit};
use crate::image::{color_to_rgb, ImageBuffer, CHANNELS};
use crate::sampling::random_in_cube;
use crate::shading::blinn_phong;
use duet_core::{Light, LightKind, Scene, MAX_LIGHT_COUNT};
use duet_math::{Color, Ray, Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Light position in the model space of an object at `object_position`.
///
/// Directional lights have no position and pass through unchanged.
fn light_in_model_space(light: &Light, object_position: Vec3) -> Vec4 {
    match light.kind() {
        LightKind::Point => (light.xyz() - object_position).extend(1.0),
        LightKind::Directional => light.position(),
    }
}

/// Ray tracer that renders whole frames and accumulates samples over time.
pub struct FrameRenderer {
    config: RenderConfig,
    cache: SampleCache,
    image: ImageBuffer,
    rng: StdRng,
}

impl FrameRenderer {
    /// Create a renderer seeded from system entropy.
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_rng(config, StdRng::from_entropy()))
    }

    /// Create a renderer with a reproducible random stream.
    pub fn with_seed(config: RenderConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_rng(config, StdRng::seed_from_u64(seed)))
    }

    fn with_rng(config: RenderConfig, rng: StdRng) -> Self {
        Self {
            cache: SampleCache::new(config.width, config.height, MAX_LIGHT_COUNT),
            image: ImageBuffer::new(config.width, config.height),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn cache(&self) -> &SampleCache {
        &self.cache
    }

    /// The most recently rendered frame.
    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    /// Render one frame into the renderer's own image buffer.
    pub fn render(&mut self, scene: &Scene) -> &ImageBuffer {
        let mut image = std::mem::take(&mut self.image);
        self.render_into(scene, &mut image);
        self.image = image;
        &self.image
    }

    /// Render one frame into `image`, reallocating it if the size differs
    /// from the configured resolution.
    pub fn render_into(&mut self, scene: &Scene, image: &mut ImageBuffer) {
        let start = Instant::now();
        let (width, height) = (self.config.width, self.config.height);

        if image.width != width || image.height != height {
            *image = ImageBuffer::new(width, height);
        }

        // Must happen before any pixel of the new frame touches the cache
        if self.cache.sync(scene.id()) {
            log::debug!("Scene id {} - sample cache cleared", scene.id());
        }

        let rays = PrimaryRays::new(scene.camera(), &self.config.projection(), width, height);
        let frame = Frame {
            scene,
            rays: &rays,
            config: &self.config,
        };

        let light_slots = self.cache.light_slots();
        let row_len = image.row_len();
        let shadow_row_len = width as usize * light_slots;
        let bounce_row_len = width as usize;
        let (shadow, bounce) = self.cache.slices_mut();

        match self.config.threading {
            Threading::Single => {
                let rows = image
                    .data
                    .chunks_mut(row_len)
                    .zip(shadow.chunks_mut(shadow_row_len))
                    .zip(bounce.chunks_mut(bounce_row_len))
                    .enumerate();
                for (y, ((pixels, shadow), bounce)) in rows {
                    frame.render_row(y as u32, pixels, shadow, bounce, light_slots, &mut self.rng);
                }
            }
            Threading::Rows => {
                let seeds: Vec<u64> = (0..height).map(|_| self.rng.next_u64()).collect();
                image
                    .data
                    .par_chunks_mut(row_len)
                    .zip(shadow.par_chunks_mut(shadow_row_len))
                    .zip(bounce.par_chunks_mut(bounce_row_len))
                    .zip(seeds.par_iter())
                    .enumerate()
                    .for_each(|(y, (((pixels, shadow), bounce), &seed))| {
                        let mut rng = StdRng::seed_from_u64(seed);
                        frame.render_row(y as u32, pixels, shadow, bounce, light_slots, &mut rng);
                    });
            }
        }

        log::trace!(
            "Rendered {}x{} frame (scene id {}) in {:?}",
            width,
            height,
            scene.id(),
            start.elapsed()
        );
    }
}

/// Everything a pixel needs that stays fixed for the whole frame.
struct Frame<'a> {
    scene: &'a Scene,
    rays: &'a PrimaryRays,
    config: &'a RenderConfig,
}

impl Frame<'_> {
    fn render_row(
        &self,
        y: u32,
        pixels: &mut [u8],
        shadow: &mut [ShadowSamples],
        bounce: &mut [BounceSamples],
        light_slots: usize,
        rng: &mut dyn RngCore,
    ) {
        let cells = pixels
            .chunks_exact_mut(CHANNELS)
            .zip(shadow.chunks_exact_mut(light_slots))
            .zip(bounce.iter_mut())
            .enumerate();

        for (x, ((pixel, shadow), bounce)) in cells {
            let color = self.render_pixel(x as u32, y, shadow, bounce, rng);
            pixel.copy_from_slice(&color_to_rgb(color));
        }
    }

    fn render_pixel(
        &self,
        x: u32,
        y: u32,
        shadow: &mut [ShadowSamples],
        bounce: &mut BounceSamples,
        rng: &mut dyn RngCore,
    ) -> Color {
        let ray = self.rays.ray(x, y);
        let Some(hit) = cast(&ray, self.scene, f32::INFINITY) else {
            return self.config.background;
        };

        let object = hit.object;
        let hit_position = hit.local_position();
        let camera_position = self.scene.camera().position - object.position;
        let normal = hit.normal();

        let mut color = Color::ZERO;

        for (light, samples) in self.scene.lights().iter().zip(shadow.iter_mut()) {
            for _ in 0..self.config.shadow_samples_per_frame {
                samples.record(self.sample_shadow(&hit, light, rng));
            }

            // Never seen from here: no contribution
            let Some(visibility) = samples.visibility() else {
                continue;
            };

            color += blinn_phong(
                hit_position,
                normal,
                light_in_model_space(light, object.position),
                camera_position,
                light.color,
                &object.material,
            ) * visibility;
        }

        let mut contribution = Color::ZERO;
        for _ in 0..self.config.bounce_samples_per_frame {
            contribution += self.sample_bounce(&hit, normal, camera_position, rng);
        }
        bounce.record(contribution, self.config.bounce_samples_per_frame);
        color += bounce.mean();

        color
    }

    /// Cast one jittered shadow ray towards `light`. Returns true if occluded.
    fn sample_shadow(&self, hit: &Hit, light: &Light, rng: &mut dyn RngCore) -> bool {
        let offset = random_in_cube(rng);

        let (direction, distance) = match light.kind() {
            LightKind::Directional => (
                (light.xyz() + offset * light.angular_radius).normalize_or_zero(),
                f32::INFINITY,
            ),
            LightKind::Point => {
                let sample_position = light.xyz() + offset * light.radius;
                let to_light = sample_position - hit.position;
                (to_light.normalize_or_zero(), to_light.length())
            }
        };

        self.occluded(hit.position, direction, distance)
    }

    /// Whether anything lies within `distance` of `from` along `direction`.
    fn occluded(&self, from: Vec3, direction: Vec3, distance: f32) -> bool {
        let origin = from + direction * self.config.surface_bias;
        cast(&Ray::new(origin, direction), self.scene, distance).is_some()
    }

    /// One indirect sample: light reflected towards `hit` by whatever a random
    /// ray from it strikes first.
    fn sample_bounce(
        &self,
        hit: &Hit,
        normal: Vec3,
        camera_position: Vec3,
        rng: &mut dyn RngCore,
    ) -> Color {
        let direction = random_in_cube(rng).normalize_or_zero();
        let origin = hit.position + direction * self.config.surface_bias;

        let Some(bounce_hit) = cast(&Ray::new(origin, direction), self.scene, f32::INFINITY) else {
            return Color::ZERO;
        };
        if bounce_hit.index == hit.index {
            return Color::ZERO;
        }

        let bounce_light = self.direct_light(&bounce_hit, hit.position);
        let object_position = hit.object.position;

        blinn_phong(
            hit.local_position(),
            normal,
            (bounce_hit.position - object_position).extend(1.0),
            camera_position,
            bounce_light,
            &hit.object.material,
        )
    }

    /// Unjittered, uncached direct light at `hit` as seen from `viewer`.
    fn direct_light(&self, hit: &Hit, viewer: Vec3) -> Color {
        let object = hit.object;
        let hit_position = hit.local_position();
        let viewer_position = viewer - object.position;
        let normal = hit.normal();

        let mut color = Color::ZERO;
        for light in self.scene.lights() {
            let (direction, distance) = match light.kind() {
                LightKind::Directional => (light.xyz().normalize_or_zero(), f32::INFINITY),
                LightKind::Point => {
                    let to_light = light.xyz() - hit.position;
                    (to_light.normalize_or_zero(), to_light.length())
                }
            };
            if self.occluded(hit.position, direction, distance) {
                continue;
            }

            color += blinn_phong(
                hit_position,
                normal,
                light_in_model_space(light, object.position),
                viewer_position,
                light.color,
                &object.material,
            );
        }
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_core::Material;
    use duet_math::Camera;

    const WIDTH: u32 = 32;
    const HEIGHT: u32 = 24;

    /// Floor at y = -1, white point light overhead, camera at (0, 0, -2).
    fn floor_scene(light_radius: f32) -> Scene {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO, Vec3::Y);
        let mut scene = Scene::new(camera);
        scene
            .add_plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Material::matte(Color::ONE))
            .unwrap();
        scene
            .add_point_light(Vec3::new(0.0, 5.0, 0.0), Color::ONE, light_radius)
            .unwrap();
        scene
    }

    fn renderer(config: RenderConfig) -> FrameRenderer {
        FrameRenderer::with_seed(config.with_resolution(WIDTH, HEIGHT), 42).unwrap()
    }

    #[test]
    fn test_invalid_config() {
        let result = FrameRenderer::new(RenderConfig::default().with_resolution(0, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_floor_scene_end_to_end() {
        let scene = floor_scene(0.0);
        let mut renderer = renderer(RenderConfig::default());
        let image = renderer.render(&scene);

        assert_eq!(image.data.len(), (WIDTH * HEIGHT * 3) as usize);

        // Bottom center looks at the lit floor
        let floor = image.pixel(WIDTH / 2, 0);
        assert!(floor.iter().all(|&c| c > 200), "floor pixel {floor:?}");

        // The whole upper half looks at the sky
        for y in HEIGHT / 2..HEIGHT {
            for x in 0..WIDTH {
                assert_eq!(image.pixel(x, y), [0, 0, 0], "pixel ({x}, {y})");
            }
        }

        // A lone plane cannot bounce light onto itself
        assert_eq!(renderer.cache().bounce(WIDTH / 2, 0).mean(), Color::ZERO);
    }

    #[test]
    fn test_background_color_on_miss() {
        let scene = floor_scene(0.0);
        let mut renderer = renderer(RenderConfig::default().with_background(Color::new(0.0, 0.0, 1.0)));
        let image = renderer.render(&scene);

        assert_eq!(image.pixel(0, HEIGHT - 1), [0, 0, 255]);
        assert_ne!(image.pixel(WIDTH / 2, 0), [0, 0, 255]);
    }

    #[test]
    fn test_cache_invalidated_by_camera_change() {
        let mut scene = floor_scene(0.2);
        let mut renderer = renderer(RenderConfig::default());
        let (x, y) = (WIDTH / 2, 0);

        renderer.render(&scene);
        renderer.render(&scene);
        assert_eq!(renderer.cache().shadow(x, y, 0).total, 2);
        assert_eq!(renderer.cache().bounce(x, y).total, 2);

        let moved = scene.camera().moved_forwards(0.1);
        scene.set_camera(moved);
        renderer.render(&scene);

        assert_eq!(renderer.cache().scene_id(), Some(scene.id()));
        assert_eq!(renderer.cache().shadow(x, y, 0).total, 1);
        assert_eq!(renderer.cache().bounce(x, y).total, 1);

        // Sky pixels never sample anything
        assert_eq!(renderer.cache().shadow(x, HEIGHT - 1, 0).total, 0);
        assert_eq!(renderer.cache().bounce(x, HEIGHT - 1).total, 0);
    }

    #[test]
    fn test_adding_objects_keeps_cache() {
        let mut scene = floor_scene(0.2);
        let mut renderer = renderer(RenderConfig::default());
        let (x, y) = (WIDTH / 2, 0);

        renderer.render(&scene);
        scene
            .add_sphere(Vec3::new(5.0, 0.0, 5.0), 0.5, Material::default())
            .unwrap();
        renderer.render(&scene);

        assert_eq!(renderer.cache().shadow(x, y, 0).total, 2);
    }

    #[test]
    fn test_soft_shadow_converges_when_unoccluded() {
        let scene = floor_scene(0.5);
        let mut renderer = renderer(RenderConfig::default());
        let (x, y) = (WIDTH / 2, 0);

        for _ in 0..50 {
            renderer.render(&scene);
        }

        let samples = renderer.cache().shadow(x, y, 0);
        assert_eq!(samples.total, 50);
        assert!(samples.visibility().unwrap() > 0.9);
    }

    #[test]
    fn test_fully_occluded_light_contributes_nothing() {
        let mut scene = floor_scene(0.5);
        // Slab between the floor and the light, above the camera
        scene
            .add_cube(
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::new(20.0, 1.0, 20.0),
                Material::matte(Color::ONE),
            )
            .unwrap();
        let mut renderer = renderer(RenderConfig::default());
        let (x, y) = (WIDTH / 2, 0);

        for _ in 0..5 {
            renderer.render(&scene);
        }

        let samples = renderer.cache().shadow(x, y, 0);
        assert_eq!(samples.total, 5);
        assert_eq!(samples.visibility(), None);
        assert_eq!(renderer.image().pixel(x, y), [0, 0, 0]);
    }

    #[test]
    fn test_indirect_light_from_neighbor() {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO, Vec3::Y);
        let mut scene = Scene::new(camera);
        scene
            .add_plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Material::matte(Color::ONE))
            .unwrap();
        scene
            .add_sphere(Vec3::new(0.0, 0.0, 0.5), 0.5, Material::matte(Color::ONE))
            .unwrap();
        // Grazing the floor: no direct light there, only on the sphere's side
        scene
            .add_directional_light(Vec3::NEG_X, Color::ONE, 0.0)
            .unwrap();

        let config = RenderConfig::default().with_resolution(8, 6);
        let mut renderer = FrameRenderer::with_seed(config, 7).unwrap();
        for _ in 0..400 {
            renderer.render(&scene);
        }

        let bounce = renderer.cache().bounce(4, 0);
        assert_eq!(bounce.total, 400);
        assert!(bounce.mean().max_element() > 0.0);
    }

    #[test]
    fn test_parallel_rows() {
        let scene = floor_scene(0.5);
        let mut renderer = renderer(RenderConfig::default().with_threading(Threading::Rows));

        for _ in 0..3 {
            renderer.render(&scene);
        }

        let image = renderer.image();
        assert!(image.pixel(WIDTH / 2, 0).iter().all(|&c| c > 200));
        assert_eq!(image.pixel(WIDTH / 2, HEIGHT - 1), [0, 0, 0]);
        assert_eq!(renderer.cache().shadow(WIDTH / 2, 0, 0).total, 3);
    }

    #[test]
    fn test_render_into_resizes() {
        let scene = floor_scene(0.0);
        let mut renderer = renderer(RenderConfig::default());
        let mut image = ImageBuffer::new(1, 1);

        renderer.render_into(&scene, &mut image);
        assert_eq!((image.width, image.height), (WIDTH, HEIGHT));
    }

    /// Floor at y = -1 lit by a soft directional light from straight above.
    fn directional_floor_scene() -> Scene {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO, Vec3::Y);
        let mut scene = Scene::new(camera);
        scene
            .add_plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Material::matte(Color::ONE))
            .unwrap();
        scene
            .add_directional_light(Vec3::Y, Color::ONE, 0.1)
            .unwrap();
        scene
    }

    #[test]
    fn test_directional_light_unblocked() {
        let scene = directional_floor_scene();
        let mut renderer = renderer(RenderConfig::default());
        let (x, y) = (WIDTH / 2, 0);

        for _ in 0..20 {
            renderer.render(&scene);
        }

        // Jittered directions stay well above the floor and never return
        let samples = renderer.cache().shadow(x, y, 0);
        assert_eq!(samples.total, 20);
        assert_eq!(samples.unoccluded, samples.total);
        assert_eq!(renderer.image().pixel(x, y), [255, 255, 255]);
    }

    #[test]
    fn test_directional_light_blocked_by_slab() {
        let mut scene = directional_floor_scene();
        // Directional shadow rays are unbounded, so a slab far above still blocks
        scene
            .add_cube(
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::new(20.0, 1.0, 20.0),
                Material::matte(Color::ONE),
            )
            .unwrap();
        let mut renderer = renderer(RenderConfig::default());
        let (x, y) = (WIDTH / 2, 0);

        for _ in 0..20 {
            renderer.render(&scene);
        }

        let samples = renderer.cache().shadow(x, y, 0);
        assert_eq!(samples.total, 20);
        assert_eq!(samples.unoccluded, 0);
        assert_eq!(samples.visibility(), None);
        assert_eq!(renderer.image().pixel(x, y), [0, 0, 0]);
    }
}
