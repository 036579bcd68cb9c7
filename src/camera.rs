// camera.rs — orbit orientation, exponential zoom and inertial coasting

use crate::mat4::Mat4;
use crate::options::ViewOptions;
use glam::{Vec2, Vec3};
use std::time::Instant;

/// Below this speed a coasting camera snaps to rest.
pub const REST_SPEED: f32 = 0.01;
/// Zoom deltas are damped relative to rotation deltas.
const ZOOM_SCALE: f32 = 0.1;
/// Pinch distances are amplified to feel like wheel pixels.
const PINCH_SCALE: f32 = 10.0;

/// The contact points of one pointer/touch sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Single(Vec2),
    Pair(Vec2, Vec2),
    /// Three or more fingers: tracked, never turned into motion.
    Crowd,
}

impl Contact {
    pub fn from_points(points: &[Vec2]) -> Option<Contact> {
        match points {
            [] => None,
            [p] => Some(Contact::Single(*p)),
            [a, b] => Some(Contact::Pair(*a, *b)),
            _ => Some(Contact::Crowd),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { reference: Contact },
}

/// Orientation, zoom and velocity of the orbit camera.
///
/// Velocity is kept in the same axes as a drag delta: `x` is the screen-space
/// vertical movement (rotation about X), `y` the horizontal movement
/// (rotation about -Y) and `z` the zoom delta, all per millisecond.
#[derive(Debug, Clone)]
pub struct CameraState {
    orientation: Mat4,
    zoom: f32,
    velocity: Vec3,
    drag: DragState,
    /// Time of the last sampled move; starts at construction so the very
    /// first move already yields a velocity.
    last_sample: Instant,
}

impl CameraState {
    pub fn new(options: &ViewOptions) -> Self {
        Self {
            orientation: Mat4::IDENTITY,
            zoom: 0.0,
            velocity: Vec3::from_array(options.initial_velocity),
            drag: DragState::Idle,
            last_sample: Instant::now(),
        }
    }

    pub fn orientation(&self) -> Mat4 {
        self.orientation
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Back to identity orientation, zero zoom, at rest.
    pub fn reset(&mut self) {
        self.orientation = Mat4::IDENTITY;
        self.zoom = 0.0;
        self.velocity = Vec3::ZERO;
    }

    /// Pointer press. Always (re)captures the reference point.
    pub fn press(&mut self, contact: Contact) {
        self.drag = DragState::Dragging { reference: contact };
    }

    /// Touch start. Extra fingers landing mid-drag do not reset the reference;
    /// the next move picks them up.
    pub fn touch_start(&mut self, contact: Contact) {
        if !self.is_dragging() {
            self.drag = DragState::Dragging { reference: contact };
        }
    }

    /// Move the active drag to `contact`. Returns whether the camera moved.
    ///
    /// One point rotates, two points pinch-zoom; a change in the number of
    /// points only re-anchors the reference.
    pub fn drag_to(
        &mut self,
        contact: Contact,
        now: Instant,
        radius: f32,
        options: &ViewOptions,
    ) -> bool {
        let reference = match self.drag {
            DragState::Dragging { reference } => reference,
            DragState::Idle => return false,
        };

        let moved = match (reference, contact) {
            (Contact::Single(from), Contact::Single(to)) => {
                let d = to - from;
                self.move_sampled(Vec3::new(d.y, d.x, 0.0), now, radius, options)
            }
            (Contact::Pair(a0, a1), Contact::Pair(b0, b1)) => {
                let dz = PINCH_SCALE * (b0.distance(b1) - a0.distance(a1));
                self.move_sampled(Vec3::new(0.0, 0.0, dz), now, radius, options)
            }
            _ => false,
        };

        self.drag = DragState::Dragging { reference: contact };
        moved
    }

    /// Pointer release. The last sampled velocity carries on as inertia.
    pub fn release(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Touch end; the drag only ends once no finger is left.
    pub fn touch_end(&mut self, remaining: usize) {
        if remaining == 0 {
            self.release();
        }
    }

    /// Wheel scroll, `delta_y` in pixels with browser sign (positive pulls back).
    pub fn wheel(&mut self, delta_y: f32, now: Instant, radius: f32, options: &ViewOptions) -> bool {
        self.move_sampled(Vec3::new(0.0, 0.0, delta_y), now, radius, options)
    }

    /// Advance inertia by `dt_ms` milliseconds. Does nothing while dragging.
    /// Returns whether the camera moved.
    pub fn coast(&mut self, dt_ms: f32, radius: f32, options: &ViewOptions) -> bool {
        if self.is_dragging() {
            return false;
        }
        if self.velocity.length() < REST_SPEED {
            self.velocity = Vec3::ZERO;
            return false;
        }

        let moved = self.apply(self.velocity * dt_ms, radius, options);
        self.velocity *= options.att;
        moved
    }

    fn move_sampled(&mut self, delta: Vec3, now: Instant, radius: f32, options: &ViewOptions) -> bool {
        if !self.apply(delta, radius, options) {
            return false;
        }

        let t = now.saturating_duration_since(self.last_sample).as_secs_f32() * 1000.0;
        if t > 0.0 {
            self.velocity = delta / t;
            self.last_sample = now;
        }
        true
    }

    fn apply(&mut self, delta: Vec3, radius: f32, options: &ViewOptions) -> bool {
        if !(radius > 0.0 && radius.is_finite()) {
            return false;
        }

        let rate = options.rate();
        self.orientation = self
            .orientation
            .rotate_x(delta.x / radius * rate)
            .rotate_y(-delta.y / radius * rate);
        self.zoom = (self.zoom + delta.z / radius * ZOOM_SCALE * rate)
            .min(options.z_max)
            .max(options.z_min);
        true
    }
}
