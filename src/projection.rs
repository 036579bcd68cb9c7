// projection.rs — combine camera, pseudo-perspective, zoom and viewport into one transform

use crate::camera::CameraState;
use crate::mat4::Mat4;
use serde::{Deserialize, Serialize};

/// Each zoom unit scales the orbit radius by this factor.
pub const ZOOM_BASE: f32 = 1.5;
/// Pushes the sphere slightly off the eye so the origin never degenerates.
const EYE_OFFSET: f32 = -0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// `width · 1.5^zoom`
pub fn orbit_radius(viewport_width: f32, zoom: f32) -> f32 {
    viewport_width * (ZOOM_BASE.ln() * zoom).exp()
}

/// Identity with `w` picking up `p_rate · z`: a cheap depth divide, not a
/// real projection.
pub fn pseudo_perspective(p_rate: f32) -> Mat4 {
    Mat4::IDENTITY.with_entry(2, 3, p_rate)
}

/// `orientation · P · S(r) · S(-1/w, 1/h, 1/r) · T(0, 0, -0.1)`
pub fn compose_view(orientation: &Mat4, zoom: f32, viewport: Viewport, p_rate: f32) -> Mat4 {
    let w = viewport.width as f32;
    let h = viewport.height as f32;
    let r = orbit_radius(w, zoom);

    Mat4::IDENTITY
        .compose(orientation)
        .compose(&pseudo_perspective(p_rate))
        .scale_uniform(r)
        .scale(-1.0 / w, 1.0 / h, 1.0 / r)
        .translate_z(EYE_OFFSET)
}

pub fn camera_transform(camera: &CameraState, viewport: Viewport, p_rate: f32) -> Mat4 {
    compose_view(&camera.orientation(), camera.zoom(), viewport, p_rate)
}
