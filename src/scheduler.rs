// scheduler.rs — per-frame tick: inertia, resize detection, redraw-on-stale

use crate::camera::{CameraState, Contact};
use crate::error::RendererError;
use crate::mat4::Mat4;
use crate::mesh::{build_sphere, SphereMesh};
use crate::options::ViewOptions;
use crate::projection::{camera_transform, orbit_radius, Viewport};
use glam::Vec2;
use std::time::Instant;

/// What the frame loop needs from a rendering backend. The mesh and the
/// texture are handed over out of band; a redraw only supplies the transform.
pub trait RenderBackend {
    fn draw(&mut self, transform: &Mat4) -> Result<(), RendererError>;
}

/// Owns the dirty flag and the last observed viewport.
#[derive(Debug)]
pub struct FrameScheduler {
    last_tick: Option<Instant>,
    viewport: Viewport,
    valid: bool,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            last_tick: None,
            viewport: Viewport::default(),
            valid: false,
        }
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_stale(&self) -> bool {
        !self.valid
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// One frame. Inertia first, then resize detection, then the redraw if
    /// anything went stale. Returns whether a draw was issued and completed.
    ///
    /// A failed draw leaves the scene stale so the next tick tries again.
    pub fn tick<B: RenderBackend>(
        &mut self,
        now: Instant,
        viewport: Viewport,
        camera: &mut CameraState,
        options: &ViewOptions,
        backend: &mut B,
    ) -> Result<bool, RendererError> {
        if let Some(prev) = self.last_tick {
            let dt_ms = now.saturating_duration_since(prev).as_secs_f32() * 1000.0;
            let radius = orbit_radius(self.viewport.width as f32, camera.zoom());
            if camera.coast(dt_ms, radius, options) {
                self.invalidate();
            }
        }
        self.last_tick = Some(now);

        if viewport != self.viewport {
            log::debug!("viewport resized to {}x{}", viewport.width, viewport.height);
            self.viewport = viewport;
            self.invalidate();
        }

        if self.valid || self.viewport.is_empty() {
            return Ok(false);
        }

        let transform = camera_transform(camera, self.viewport, options.p_rate);
        backend.draw(&transform)?;
        self.valid = true;
        Ok(true)
    }
}

/// One panorama view: options, camera, static mesh and the frame scheduler.
///
/// Input handlers mutate the camera completely before returning and mark the
/// scene stale whenever it moved.
#[derive(Debug)]
pub struct Viewer {
    options: ViewOptions,
    camera: CameraState,
    scheduler: FrameScheduler,
    mesh: SphereMesh,
}

impl Viewer {
    pub fn new(options: ViewOptions) -> Self {
        let mesh = build_sphere(options.h_div, options.v_div);
        log::debug!(
            "sphere mesh {}x{} -> {} strip vertices",
            options.h_div,
            options.v_div,
            mesh.vertex_count()
        );
        Self {
            camera: CameraState::new(&options),
            scheduler: FrameScheduler::new(),
            mesh,
            options,
        }
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }

    pub fn is_stale(&self) -> bool {
        self.scheduler.is_stale()
    }

    pub fn viewport(&self) -> Viewport {
        self.scheduler.viewport()
    }

    fn radius(&self) -> f32 {
        orbit_radius(self.scheduler.viewport().width as f32, self.camera.zoom())
    }

    fn mark(&mut self, moved: bool) {
        if moved {
            self.scheduler.invalidate();
        }
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.camera.press(Contact::Single(position));
    }

    pub fn pointer_move(&mut self, position: Vec2, now: Instant) {
        let radius = self.radius();
        let moved = self
            .camera
            .drag_to(Contact::Single(position), now, radius, &self.options);
        self.mark(moved);
    }

    pub fn pointer_up(&mut self) {
        self.camera.release();
    }

    pub fn touch_start(&mut self, points: &[Vec2]) {
        if let Some(contact) = Contact::from_points(points) {
            self.camera.touch_start(contact);
        }
    }

    pub fn touch_move(&mut self, points: &[Vec2], now: Instant) {
        let Some(contact) = Contact::from_points(points) else {
            return;
        };
        let radius = self.radius();
        let moved = self.camera.drag_to(contact, now, radius, &self.options);
        self.mark(moved);
    }

    /// `remaining` are the contacts still down after the lifted one.
    pub fn touch_end(&mut self, remaining: &[Vec2]) {
        self.camera.touch_end(remaining.len());
    }

    pub fn wheel(&mut self, delta_y: f32, now: Instant) {
        let radius = self.radius();
        let moved = self.camera.wheel(delta_y, now, radius, &self.options);
        self.mark(moved);
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
        self.scheduler.invalidate();
    }

    /// A new texture was uploaded to the backend.
    pub fn texture_loaded(&mut self) {
        self.scheduler.invalidate();
    }

    pub fn frame<B: RenderBackend>(
        &mut self,
        now: Instant,
        viewport: Viewport,
        backend: &mut B,
    ) -> Result<bool, RendererError> {
        self.scheduler
            .tick(now, viewport, &mut self.camera, &self.options, backend)
    }
}
