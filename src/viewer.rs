use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use glam::{Mat4, Vec2, Vec3};
use log::info;
use pollster::block_on;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::ControlFlow;
use winit::window::Window;

use crate::assets::PendingTexture;
use crate::config::GlobeConfig;
use crate::debounce::ResizeDebouncer;
use crate::input::DragTracker;
use crate::render::{CameraParams, LightParams, Renderer};
use crate::rotation::Rotation;
use crate::scene::{GlobeScene, TextureKind};

/// Owns the scene/renderer pair and drives the render loop.
///
/// `state` is the whole-scene invariant: either `None` (torn down, nothing
/// draws, no redraws are requested) or a fully built scene. The debounced
/// resize path swaps one for the other in a single event-loop turn, so an
/// old and a new renderer never coexist.
pub struct GlobeViewer {
    config: GlobeConfig,
    window: Arc<Window>,
    state: Option<ViewerState>,
    debounce: ResizeDebouncer,
    cursor: Vec2,
}

struct ViewerState {
    scene: GlobeScene,
    renderer: Renderer,
    drag: DragTracker,
    /// Captured at build time; a mid-life surface reconfigure does not
    /// touch it. Only the debounced rebuild recomputes the aspect.
    aspect: f32,
    land_texture: PendingTexture,
    background_texture: PendingTexture,
}

impl ViewerState {
    fn create(config: &GlobeConfig, window: Arc<Window>) -> Result<Self> {
        let scene = GlobeScene::build(config)?;
        let renderer = block_on(Renderer::new(Arc::clone(&window), &scene))?;
        let size = window.inner_size();
        let aspect = if size.height == 0 {
            1.0
        } else {
            size.width as f32 / size.height as f32
        };
        Ok(Self {
            scene,
            renderer,
            drag: DragTracker::new(),
            aspect,
            land_texture: PendingTexture::load(config.land.texture.clone()),
            background_texture: PendingTexture::load(config.background.texture.clone()),
        })
    }
}

impl GlobeViewer {
    /// Builds the initial scene for the window and starts the texture
    /// loads. The render loop begins with the first `RedrawRequested`.
    pub fn new(config: GlobeConfig, window: Arc<Window>) -> Result<Self> {
        let debounce = ResizeDebouncer::new(config.debounce());
        let state = ViewerState::create(&config, Arc::clone(&window))?;
        Ok(Self {
            config,
            window,
            state: Some(state),
            debounce,
            cursor: Vec2::ZERO,
        })
    }

    /// Feeds one winit event through the viewer.
    pub fn process_event(&mut self, event: &Event<()>, control_flow: &mut ControlFlow) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.window.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        control_flow.set_exit();
                    }
                    WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                        // Every event of a burst re-arms the same deadline.
                        self.debounce.arm(Instant::now());
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        if *button == MouseButton::Left {
                            self.handle_primary_button(*state);
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        let position = Vec2::new(position.x as f32, position.y as f32);
                        self.cursor = position;
                        if let Some(state) = self.state.as_mut() {
                            apply_motion(
                                &mut state.drag,
                                &mut state.scene.land.rotation,
                                position,
                                self.config.motion.drag_divisor,
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::RedrawRequested(window_id) if *window_id == self.window.id() => {
                self.redraw()?;
            }
            Event::MainEventsCleared => {
                if self.debounce.fire(Instant::now()) {
                    self.rebuild()?;
                }
                if self.state.is_some() {
                    self.window.request_redraw();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_primary_button(&mut self, state: ElementState) {
        let Some(viewer_state) = self.state.as_mut() else {
            return;
        };
        match state {
            ElementState::Pressed => viewer_state.drag.press(self.cursor),
            ElementState::Released => {
                finish_drag(&mut viewer_state.drag, &mut viewer_state.scene.land.rotation)
            }
        }
    }

    /// One frame: advance the spin, install any finished texture loads,
    /// then draw.
    fn redraw(&mut self) -> Result<()> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };

        state.scene.land.rotation.advance(self.config.motion.spin);

        if let Some(image) = state.land_texture.poll() {
            state.renderer.install_texture(TextureKind::Land, image);
        }
        if let Some(image) = state.background_texture.poll() {
            state
                .renderer
                .install_texture(TextureKind::Background, image);
        }

        let camera = camera_params(&self.config, state.aspect);
        let light = light_params(&self.config);
        state.renderer.update_globals(&camera, &light);

        if let Err(err) = state.renderer.render(&state.scene) {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    let size = self.window.inner_size();
                    state.renderer.resize(size);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    info!("surface timeout; retrying next frame");
                }
            }
        }
        Ok(())
    }

    /// The debounced resize handler: tear everything down, then build a
    /// fresh scene against the new window size. Accumulated rotation is
    /// discarded with the old scene.
    fn rebuild(&mut self) -> Result<()> {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            info!("skipping rebuild while the window has zero area");
            return Ok(());
        }

        self.state = None;
        self.state = Some(ViewerState::create(&self.config, Arc::clone(&self.window))?);
        info!("rebuilt globe scene at {}x{}", size.width, size.height);
        Ok(())
    }
}

/// Derives the frame camera from the configured position and tilt.
pub fn camera_params(config: &GlobeConfig, aspect: f32) -> CameraParams {
    let tilt = Mat4::from_rotation_x(config.camera.tilt.to_radians());
    let forward = (tilt * Vec3::NEG_Z.extend(0.0)).truncate();
    let up = (tilt * Vec3::Y.extend(0.0)).truncate();
    let position = config.camera.position;
    let view = Mat4::look_at_rh(position, position + forward, up);
    let projection = Mat4::perspective_rh(
        config.camera.fov.to_radians(),
        aspect.max(0.01),
        config.camera.near,
        config.camera.far,
    );
    CameraParams {
        view_proj: projection * view,
        position,
    }
}

pub fn light_params(config: &GlobeConfig) -> LightParams {
    LightParams {
        direction: config.light.direction,
        color: config.light.color,
        intensity: config.light.intensity,
        ambient: config.light.ambient,
    }
}

fn apply_motion(drag: &mut DragTracker, rotation: &mut Rotation, position: Vec2, divisor: f32) {
    if let Some(delta) = drag.motion(position) {
        rotation.apply_drag(delta.x, delta.y, divisor);
    }
}

fn finish_drag(drag: &mut DragTracker, rotation: &mut Rotation) {
    if drag.release() {
        rotation.end_drag();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_full_drag_session_accumulates_and_resets_pitch() {
        let mut drag = DragTracker::new();
        let mut rotation = Rotation::default();

        drag.press(Vec2::new(200.0, 200.0));
        apply_motion(&mut drag, &mut rotation, Vec2::new(230.0, 215.0), 1500.0);
        apply_motion(&mut drag, &mut rotation, Vec2::new(275.0, 245.0), 1500.0);

        assert!((rotation.yaw - 75.0 / 1500.0).abs() < 1e-6);
        assert!((rotation.pitch - 45.0 / 1500.0).abs() < 1e-6);

        finish_drag(&mut drag, &mut rotation);
        assert_eq!(rotation.pitch, 0.0);
        assert!((rotation.yaw - 75.0 / 1500.0).abs() < 1e-6);
    }

    #[test]
    fn motion_without_a_press_never_rotates() {
        let mut drag = DragTracker::new();
        let mut rotation = Rotation::default();
        apply_motion(&mut drag, &mut rotation, Vec2::new(400.0, 400.0), 1500.0);
        assert_eq!(rotation, Rotation::default());
    }

    #[test]
    fn a_release_without_a_session_leaves_rotation_alone() {
        let mut drag = DragTracker::new();
        let mut rotation = Rotation::new(1.0, 0.5);
        finish_drag(&mut drag, &mut rotation);
        assert_eq!(rotation, Rotation::new(1.0, 0.5));
    }

    #[test]
    fn an_untilted_camera_looks_down_negative_z() {
        let mut config = GlobeConfig::default();
        config.camera.tilt = 0.0;
        config.camera.position = Vec3::ZERO;
        let camera = camera_params(&config, 1.0);
        let projected = camera.view_proj.project_point3(Vec3::new(0.0, 0.0, -1.0));
        assert!(projected.x.abs() < 1e-5);
        assert!(projected.y.abs() < 1e-5);
        assert!(projected.z > 0.0 && projected.z < 1.0);
    }

    #[test]
    fn camera_position_passes_through() {
        let config = GlobeConfig::default();
        let camera = camera_params(&config, 1.5);
        assert_eq!(camera.position, Vec3::new(-0.2, 0.8, 1.0));
    }
}
