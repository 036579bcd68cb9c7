//! Equirectangular panorama viewer: a textured unit sphere seen from its
//! centre, orbited by drag/pinch/wheel with inertial coasting after release.
//!
//! The math and motion core (`mat4`, `mesh`, `camera`, `projection`,
//! `scheduler`) is GPU-free; `renderer` is the wgpu backend the binary plugs
//! into [`scheduler::RenderBackend`].

pub mod camera;
pub mod error;
pub mod mat4;
pub mod mesh;
pub mod options;
pub mod projection;
pub mod renderer;
pub mod scheduler;
pub mod texture;

pub use camera::{CameraState, Contact, DragState};
pub use error::{ConfigError, RendererError, TextureError};
pub use mat4::Mat4;
pub use mesh::{build_sphere, SphereMesh};
pub use options::ViewOptions;
pub use projection::{compose_view, orbit_radius, Viewport};
pub use scheduler::{FrameScheduler, RenderBackend, Viewer};
