use anyhow::Result;
use duet_core::{load_scene, Scene};
use duet_math::Camera;
use duet_tracer::{RenderConfig, Threading};
use duet_viewport::{Gpu, RayTracingRenderer, SceneRenderer};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Camera translation speed in world units per second
const MOVE_SPEED: f32 = 2.0;
/// Camera rotation speed in radians per second
const ROTATE_SPEED: f32 = 1.0;

/// Keys that move the camera, in the order they are applied each frame.
/// Translations come before rotations.
const CAMERA_KEYS: [KeyCode; 8] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::ArrowLeft,
    KeyCode::ArrowRight,
    KeyCode::ArrowUp,
    KeyCode::ArrowDown,
];

/// Camera after applying the held keys for `delta_time` seconds, or `None`
/// if no movement key is held.
fn camera_for_keys(camera: &Camera, keys: &HashSet<KeyCode>, delta_time: f32) -> Option<Camera> {
    let step = MOVE_SPEED * delta_time;
    let turn = ROTATE_SPEED * delta_time;
    let mut moved = *camera;
    let mut changed = false;

    for key in CAMERA_KEYS {
        if !keys.contains(&key) {
            continue;
        }
        moved = match key {
            KeyCode::KeyW => moved.moved_forwards(step),
            KeyCode::KeyS => moved.moved_backwards(step),
            KeyCode::KeyA => moved.moved_left(step),
            KeyCode::KeyD => moved.moved_right(step),
            KeyCode::ArrowLeft => moved.rotated(turn, 0.0),
            KeyCode::ArrowRight => moved.rotated(-turn, 0.0),
            KeyCode::ArrowUp => moved.rotated(0.0, turn),
            KeyCode::ArrowDown => moved.rotated(0.0, -turn),
            _ => continue,
        };
        changed = true;
    }

    changed.then_some(moved)
}

/// Application state
struct App {
    scene: Scene,
    config: RenderConfig,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    renderer: Option<Box<dyn SceneRenderer>>,

    // Input state
    keys_pressed: HashSet<KeyCode>,
    last_frame_time: Instant,
}

impl App {
    fn new(scene: Scene, config: RenderConfig) -> Self {
        Self {
            scene,
            config,
            window: None,
            gpu: None,
            renderer: None,
            keys_pressed: HashSet::new(),
            last_frame_time: Instant::now(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Duet Viewer")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = pollster::block_on(Gpu::new(window.clone()))?;
        let renderer = RayTracingRenderer::create(&gpu, self.config.clone())?;

        window.set_title(&format!("Duet Viewer - {}", renderer.name()));

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(Box::new(renderer));
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.destroy();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("Failed to initialize viewer: {:#}", e);
                event_loop.exit();
                return;
            }
            log::info!("Window and renderer initialized");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize((physical_size.width, physical_size.height));
                    log::info!("Resized to {}x{}", physical_size.width, physical_size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key, state, .. },
                ..
            } => {
                if let PhysicalKey::Code(keycode) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            self.keys_pressed.insert(keycode);
                        }
                        ElementState::Released => {
                            self.keys_pressed.remove(&keycode);
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = (now - self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                // Moving the camera discards the accumulated samples
                if let Some(camera) =
                    camera_for_keys(self.scene.camera(), &self.keys_pressed, delta_time)
                {
                    self.scene.set_camera(camera);
                }

                let mut out_of_memory = false;
                if let (Some(renderer), Some(gpu)) = (&mut self.renderer, &mut self.gpu) {
                    if let Err(e) = renderer.render(gpu, &self.scene) {
                        if let Some(surface_err) = e.downcast_ref::<wgpu::SurfaceError>() {
                            match surface_err {
                                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                                    gpu.reconfigure();
                                }
                                wgpu::SurfaceError::OutOfMemory => {
                                    log::error!("Out of memory!");
                                    out_of_memory = true;
                                }
                                _ => {
                                    log::error!("Surface error: {:?}", surface_err);
                                }
                            }
                        } else {
                            log::error!("Render error: {:?}", e);
                        }
                    }
                }

                if out_of_memory {
                    self.shutdown();
                    event_loop.exit();
                    return;
                }

                // Keep accumulating samples
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("Starting Duet Viewer");

    let scene = match std::env::args().nth(1) {
        Some(path) => load_scene(&path)?,
        None => {
            log::info!("No scene file given, using the demo scene");
            Scene::demo()
        }
    };

    let config = RenderConfig::default().with_threading(Threading::Rows);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scene, config);

    log::info!("Running event loop");
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_math::Vec3;

    fn camera() -> Camera {
        Camera::looking_at(Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn test_no_keys_no_movement() {
        let keys = HashSet::from([KeyCode::KeyQ]);
        assert!(camera_for_keys(&camera(), &keys, 0.1).is_none());
        assert!(camera_for_keys(&camera(), &HashSet::new(), 0.1).is_none());
    }

    #[test]
    fn test_forward_key() {
        let keys = HashSet::from([KeyCode::KeyW]);
        let moved = camera_for_keys(&camera(), &keys, 0.5).unwrap();

        assert!((moved.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert!((moved.direction - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_arrow_rotates_in_place() {
        let keys = HashSet::from([KeyCode::ArrowLeft]);
        let moved = camera_for_keys(&camera(), &keys, 0.5).unwrap();

        assert_eq!(moved.position, camera().position);
        assert!((moved.direction - camera().direction).length() > 0.1);
    }

    #[test]
    fn test_moves_apply_before_rotations() {
        let delta_time = 0.25;
        let step = MOVE_SPEED * delta_time;
        let turn = ROTATE_SPEED * delta_time;

        let expected = camera()
            .moved_forwards(step)
            .rotated(turn, 0.0)
            .rotated(0.0, turn);

        // Each set gets its own hasher state, so iteration order varies
        for _ in 0..8 {
            let keys = HashSet::from([KeyCode::ArrowLeft, KeyCode::KeyW, KeyCode::ArrowUp]);
            let moved = camera_for_keys(&camera(), &keys, delta_time).unwrap();
            assert_eq!(moved.position, expected.position);
            assert_eq!(moved.direction, expected.direction);
        }
    }
}
