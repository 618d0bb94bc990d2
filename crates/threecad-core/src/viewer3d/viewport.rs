//! Viewport lifecycle: one scene, camera, renderer and controls bundle per mount.

use std::sync::Arc;

use egui::{Painter, Rect, Vec2};
use nalgebra::Point3;

use super::camera::{Camera3D, DEFAULT_HOME};
use super::controls::OrbitControls;
use super::renderer::Renderer3D;
use super::scene::{ModelPlacement, Scene, setup_scene};
use crate::model::Mesh3D;
use crate::tasks::CancellationToken;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ViewportError {
    #[error("Viewport is not mounted")]
    NotMounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportState {
    Unmounted,
    /// Bundle built, first frame not drawn yet
    Initializing,
    Running,
}

/// Self-rescheduling frame loop. Each tick reports whether another frame should be requested.
#[derive(Debug)]
pub struct RenderLoop {
    token: CancellationToken,
    frames: u64,
}

impl RenderLoop {
    pub fn start() -> Self {
        Self {
            token: CancellationToken::new(),
            frames: 0,
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn tick(&mut self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.frames += 1;
        true
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stop(&self) {
        self.token.cancel();
    }
}

/// Everything that only exists while the viewport is mounted
#[derive(Debug)]
pub struct ViewportBundle {
    pub scene: Scene,
    pub camera: Camera3D,
    pub renderer: Renderer3D,
    pub controls: OrbitControls,
    pub render_loop: RenderLoop,
}

#[derive(Debug)]
pub struct Viewport {
    state: ViewportState,
    bundle: Option<ViewportBundle>,
    /// Survives remounts
    home: Point3<f32>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            state: ViewportState::Unmounted,
            bundle: None,
            home: Point3::from(DEFAULT_HOME),
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.bundle.is_some()
    }

    pub fn home(&self) -> Point3<f32> {
        self.home
    }

    pub fn bundle(&self) -> Option<&ViewportBundle> {
        self.bundle.as_ref()
    }

    /// Build the bundle for a surface of `size`. Mounting twice is a no-op.
    pub fn mount(&mut self, size: Vec2) {
        if self.bundle.is_some() {
            return;
        }
        let mut camera = Camera3D::new(1.0);
        camera.update_aspect(size.x, size.y);
        camera.eye = self.home;

        let mut controls = OrbitControls::new();
        controls.update(&mut camera);

        self.bundle = Some(ViewportBundle {
            scene: setup_scene(),
            camera,
            renderer: Renderer3D::new(size),
            controls,
            render_loop: RenderLoop::start(),
        });
        self.state = ViewportState::Initializing;
        log::debug!("Viewport mounted at {:.0}x{:.0}", size.x, size.y);
    }

    /// Follow a surface size change. Does not change state.
    pub fn resize(&mut self, size: Vec2) {
        let Some(bundle) = self.bundle.as_mut() else {
            return;
        };
        if size.x <= 0.0 || size.y <= 0.0 || bundle.renderer.size() == size {
            return;
        }
        bundle.camera.update_aspect(size.x, size.y);
        bundle.renderer.set_size(size);
    }

    /// Draw one frame. Returns true when another frame should be scheduled.
    pub fn frame(&mut self, painter: &Painter, rect: Rect) -> bool {
        let Some(bundle) = self.bundle.as_mut() else {
            return false;
        };
        if !bundle.render_loop.tick() {
            return false;
        }
        bundle.renderer.set_pixel_ratio(painter.ctx().pixels_per_point());
        bundle.controls.update(&mut bundle.camera);
        bundle.renderer.render(painter, rect, &bundle.scene, &bundle.camera);
        self.state = ViewportState::Running;
        true
    }

    /// Tear the bundle down and stop the frame loop
    pub fn unmount(&mut self) {
        if let Some(bundle) = self.bundle.take() {
            bundle.render_loop.stop();
            log::debug!("Viewport unmounted after {} frames", bundle.render_loop.frames());
        }
        self.state = ViewportState::Unmounted;
    }

    /// Swap the displayed model and move the camera to the model's home
    pub fn show_model(&mut self, name: &str, geometry: Arc<Mesh3D>) -> Result<ModelPlacement, ViewportError> {
        let bundle = self.bundle.as_mut().ok_or(ViewportError::NotMounted)?;
        let placement = bundle.scene.swap_model(name, geometry);
        self.home = placement.home;
        bundle.camera.eye = placement.home;
        Ok(placement)
    }

    /// Camera back to home, target back to the origin
    pub fn reset_home(&mut self) {
        if let Some(bundle) = self.bundle.as_mut() {
            bundle.controls.reset(&mut bundle.camera, self.home);
        }
    }

    pub fn rotate(&mut self, delta: Vec2, surface_height: f32) {
        if let Some(bundle) = self.bundle.as_mut() {
            bundle.controls.rotate(delta.x, delta.y, surface_height);
        }
    }

    pub fn pan(&mut self, delta: Vec2, surface_height: f32) {
        if let Some(bundle) = self.bundle.as_mut() {
            bundle.controls.pan(&bundle.camera, delta.x, delta.y, surface_height);
        }
    }

    pub fn dolly(&mut self, scroll_delta: f32) {
        if let Some(bundle) = self.bundle.as_mut() {
            bundle.controls.dolly(scroll_delta);
        }
    }
}
