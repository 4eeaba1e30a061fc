use std::collections::HashSet;
use std::num::NonZeroU32;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, anyhow, bail};
use clap::Parser;
use log::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::Camera;
use crate::config::{CELL_SIZE, Config};
use crate::grid::{Cell, Grid};
use crate::scaler::{ScaleLut, blit_nearest};
use crate::texture::Textures;

mod camera;
mod config;
mod grid;
mod input;
mod projector;
mod raycaster;
mod renderer;
mod scaler;
mod texture;

type Surface = softbuffer::Surface<Rc<Window>, Rc<Window>>;

struct App {
    window: Option<Rc<Window>>,
    surface: Option<Surface>,
    grid: Grid,
    camera: Camera,
    textures: Textures,

    // First failure to create or present to the window; reported after the loop exits
    fatal_error: Option<anyhow::Error>,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Fixed-size frame, stretched to the window on present
    frame: Vec<u32>,
    frame_w: usize,
    frame_h: usize,

    scale_lut: ScaleLut,

    keys_down: HashSet<KeyCode>,
}

impl App {
    fn new(config: &Config, grid: Grid, textures: Textures) -> Self {
        let (frame_w, frame_h) = (config.width as usize, config.height as usize);
        Self {
            window: None,
            surface: None,
            grid,
            camera: Camera::new(config.move_speed, config.rot_speed),
            textures,
            fatal_error: None,

            frame_counter: 0,
            last_fps_print: Instant::now(),

            frame: vec![0; frame_w * frame_h],
            frame_w,
            frame_h,

            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
        }
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<(Rc<Window>, Surface)> {
        let attributes = Window::default_attributes()
            .with_title("3D Maze Game")
            .with_inner_size(LogicalSize::new(self.frame_w as f64, self.frame_h as f64));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .context("window could not be created")?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("renderer could not be created: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("render surface could not be created: {e}"))?;
        Ok((window, surface))
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        let (dw, dh) = (size.width as usize, size.height as usize);

        surface
            .resize(nw, nh)
            .map_err(|e| anyhow!("failed to resize surface: {e}"))?;
        if !self.scale_lut.matches(dw, dh) {
            self.scale_lut = ScaleLut::new(dw, dh, self.frame_w, self.frame_h);
        }

        renderer::render_frame(
            &mut self.frame,
            self.frame_w,
            self.frame_h,
            &self.grid,
            &self.camera,
            &self.textures.wall,
        );

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow!("failed to map surface buffer: {e}"))?;
        blit_nearest(&mut buf, dw, &self.frame, self.frame_w, &self.scale_lut);
        buf.present()
            .map_err(|e| anyhow!("failed to present frame: {e}"))?;
        Ok(())
    }

    fn record_failure(&mut self, e: anyhow::Error) {
        if self.fatal_error.is_none() {
            self.fatal_error = Some(e);
        }
    }

    fn into_result(self) -> anyhow::Result<()> {
        match self.fatal_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn count_frame(&mut self) {
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            debug!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match self.create_window(event_loop) {
            Ok((window, surface)) => {
                window.request_redraw();
                self.surface = Some(surface);
                self.window = Some(window);
            }
            Err(e) => {
                self.record_failure(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().is_none_or(|w| w.id() != id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                info!("window closed; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed if code == KeyCode::Escape => {
                    info!("escape pressed; stopping");
                    event_loop.exit();
                }
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            // Input is applied once per presented frame
            WindowEvent::RedrawRequested => {
                input::tick(&mut self.camera, &self.grid, &self.keys_down);
                if let Err(e) = self.redraw() {
                    self.record_failure(e);
                    event_loop.exit();
                    return;
                }
                self.count_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::Focused(false) => self.keys_down.clear(),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn run(config: Config) -> anyhow::Result<()> {
    let grid = match &config.maze {
        Some(path) => Grid::load(path)?,
        None => Grid::default(),
    };
    info!(
        "maze {}x{} cells ({}x{} px at cell size {CELL_SIZE})",
        grid.width(),
        grid.height(),
        grid.width() as u32 * CELL_SIZE,
        grid.height() as u32 * CELL_SIZE
    );

    let start = Camera::new(config.move_speed, config.rot_speed);
    let [sx, sy] = start.cell();
    if grid.get(sx as i64, sy as i64) != Some(Cell::Empty) {
        bail!("start position {:?} is not an empty cell of the maze", start.pos);
    }

    let textures = Textures::load(&config)?;

    let event_loop = EventLoop::new().context("video subsystem could not initialize")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(&config, grid, textures);
    event_loop.run_app(&mut app).context("event loop failed")?;

    app.into_result()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
