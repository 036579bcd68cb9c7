// main.rs — window, input routing and frame clock around the viewer core

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // no console window in release builds

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use spherical_viewer::renderer::Renderer;
use spherical_viewer::texture::{self, LoadedPanorama};
use spherical_viewer::{RendererError, TextureError, ViewOptions, Viewer, Viewport};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

const APP_TITLE: &str = "Spherical Viewer";
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// One wheel notch, in browser-style pixels.
const WHEEL_LINE_PIXELS: f32 = 100.0;

type LoadResult = Result<LoadedPanorama, TextureError>;

#[derive(Parser)]
#[command(name = "spherical_viewer", about = "Interactive equirectangular panorama viewer")]
struct Cli {
    /// Equirectangular panorama to show
    #[arg(default_value = "snap.jpg")]
    image: PathBuf,

    /// JSON file with view options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 768)]
    height: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Host-side pointer bookkeeping: winit reports presses without a position
/// and touches one finger at a time.
#[derive(Default)]
struct Pointers {
    /// Unknown until the first `CursorMoved`.
    cursor: Option<Vec2>,
    touches: BTreeMap<u64, Vec2>,
}

impl Pointers {
    fn touch_points(&self) -> Vec<Vec2> {
        self.touches.values().copied().collect()
    }

    fn cursor_moved(&mut self, cursor: Vec2, viewer: &mut Viewer, now: Instant) {
        self.cursor = Some(cursor);
        viewer.pointer_move(cursor, now);
    }

    /// A press before any cursor position is known is dropped.
    fn button_pressed(&self, viewer: &mut Viewer) {
        if let Some(cursor) = self.cursor {
            viewer.pointer_down(cursor);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let options = match &cli.config {
        Some(path) => ViewOptions::load_from_path(path)
            .with_context(|| format!("loading view options from {}", path.display()))?,
        None => ViewOptions::default(),
    };
    let mut viewer = Viewer::new(options);

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(APP_TITLE)
            .with_inner_size(LogicalSize::new(cli.width, cli.height))
            .build(&event_loop)
            .context("creating window")?,
    );

    let placeholder = texture::placeholder(viewer.options().placeholder_color);
    let mut renderer = pollster::block_on(Renderer::new(
        window.clone(),
        viewer.mesh(),
        &placeholder,
    ))
    .context("initialising rendering backend")?;
    let texture_limit = renderer
        .max_texture_size()
        .min(viewer.options().max_texture_size);

    let (tx, rx): (Sender<LoadResult>, Receiver<LoadResult>) = channel();
    texture::spawn_loader(cli.image.clone(), texture_limit, tx.clone());

    let mut pointers = Pointers::default();
    let mut next_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        match rx.try_recv() {
            Ok(Ok(loaded)) => {
                renderer.load_panorama(&loaded.image);
                viewer.texture_loaded();
                let (w, h) = renderer.texture_extent();
                log::info!("panorama {} uploaded as {}x{}", loaded.path.display(), w, h);
                let name = loaded
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                window.set_title(&format!("{APP_TITLE} - {name}"));
            }
            Ok(Err(e)) => log::error!("failed to load panorama: {e}"),
            Err(_) => {}
        }

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }

                WindowEvent::Resized(size) => {
                    renderer.resize(Viewport::new(size.width, size.height));
                }

                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    renderer.resize(Viewport::new(new_inner_size.width, new_inner_size.height));
                }

                WindowEvent::KeyboardInput { input, .. } if input.state == ElementState::Pressed => {
                    match input.virtual_keycode {
                        Some(VirtualKeyCode::O) => {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("Images", &["jpg", "jpeg", "png", "bmp"])
                                .pick_file()
                            {
                                texture::spawn_loader(path, texture_limit, tx.clone());
                            }
                        }
                        Some(VirtualKeyCode::R) => viewer.reset_camera(),
                        _ => {}
                    }
                }

                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => pointers.button_pressed(&mut viewer),
                    ElementState::Released => viewer.pointer_up(),
                },

                WindowEvent::CursorMoved { position, .. } => {
                    let cursor = Vec2::new(position.x as f32, position.y as f32);
                    pointers.cursor_moved(cursor, &mut viewer, Instant::now());
                }

                WindowEvent::MouseWheel { delta, .. } => {
                    // Browser convention: positive delta scrolls down and pulls the view back.
                    let delta_y = match delta {
                        MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_PIXELS,
                        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                    };
                    viewer.wheel(delta_y, Instant::now());
                }

                WindowEvent::Touch(touch) => {
                    let point = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                    match touch.phase {
                        TouchPhase::Started => {
                            pointers.touches.insert(touch.id, point);
                            viewer.touch_start(&pointers.touch_points());
                        }
                        TouchPhase::Moved => {
                            pointers.touches.insert(touch.id, point);
                            viewer.touch_move(&pointers.touch_points(), Instant::now());
                        }
                        TouchPhase::Ended | TouchPhase::Cancelled => {
                            pointers.touches.remove(&touch.id);
                            viewer.touch_end(&pointers.touch_points());
                        }
                    }
                }

                WindowEvent::DroppedFile(path) => {
                    texture::spawn_loader(path, texture_limit, tx.clone());
                }

                _ => {}
            },

            Event::RedrawRequested(_) => {
                match viewer.frame(Instant::now(), renderer.size(), &mut renderer) {
                    Ok(_) => {}
                    Err(RendererError::Surface(wgpu::SurfaceError::Lost)) => renderer.reconfigure(),
                    Err(RendererError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("GPU out of memory, exiting");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::warn!("render error: {e}"),
                }
            }

            Event::MainEventsCleared => {
                // The frame clock: one tick per interval, whether or not it draws.
                let now = Instant::now();
                if now >= next_frame {
                    window.request_redraw();
                    next_frame = now + FRAME_INTERVAL;
                }
                if !matches!(*control_flow, ControlFlow::ExitWithCode(_)) {
                    *control_flow = ControlFlow::WaitUntil(next_frame);
                }
            }

            _ => {}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spherical_viewer::{Mat4, RenderBackend};

    struct NullBackend;

    impl RenderBackend for NullBackend {
        fn draw(&mut self, _: &Mat4) -> Result<(), RendererError> {
            Ok(())
        }
    }

    fn ready_viewer(now: Instant) -> Viewer {
        let mut viewer = Viewer::new(ViewOptions::default());
        viewer
            .frame(now, Viewport::new(800, 600), &mut NullBackend)
            .unwrap();
        viewer
    }

    #[test]
    fn press_before_any_cursor_position_is_ignored() {
        let now = Instant::now();
        let mut viewer = ready_viewer(now);
        let mut pointers = Pointers::default();

        pointers.button_pressed(&mut viewer);
        assert!(!viewer.camera().is_dragging());

        // The first reported position does not turn into a jump from the origin.
        pointers.cursor_moved(Vec2::new(400.0, 300.0), &mut viewer, now);
        assert_eq!(viewer.camera().orientation(), Mat4::IDENTITY);
    }

    #[test]
    fn press_drags_from_the_last_cursor_position() {
        let now = Instant::now();
        let mut viewer = ready_viewer(now);
        let mut pointers = Pointers::default();

        pointers.cursor_moved(Vec2::new(400.0, 300.0), &mut viewer, now);
        pointers.button_pressed(&mut viewer);
        assert!(viewer.camera().is_dragging());

        pointers.cursor_moved(Vec2::new(400.0, 310.0), &mut viewer, now);
        let expected = Mat4::IDENTITY.rotate_x(10.0 / 800.0 * 2.0).rotate_y(-0.0);
        assert!(viewer.camera().orientation().approx_eq(&expected, 1e-6));
    }
}
