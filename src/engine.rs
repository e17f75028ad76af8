//! Engine lifecycle and the rendering facade.
//!
//! At most one engine exists per process. [`EngineHandle::create`] claims the
//! slot and fails while another handle or [`Engine`] is alive; the slot is
//! released when that value is dropped. Only a successfully initialized
//! [`Engine`] exposes rendering operations, so a failed
//! [`EngineHandle::initialize`] leaves nothing to draw with.

use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::color::Color;
use crate::config::{ConfigError, EngineConfig};
use crate::gl::{self, Gl, LoadError};
use crate::input::{self, Event};
use crate::math::mat2x3::Mat2x3;
use crate::render::{Pipeline, ShaderError};
use crate::texture::{Texture, TextureError};
use crate::triangle::{Tri0, Tri1, Tri2};
use crate::window::{Window, MIN_GL_VERSION};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("an engine instance already exists")]
    AlreadyExists,
    #[error("invalid engine config: {0}")]
    Config(#[from] ConfigError),
    #[error("window or context creation failed: {0}")]
    Window(String),
    #[error("OpenGL {major}.{minor} context, need at least {}.{}", MIN_GL_VERSION.0, MIN_GL_VERSION.1)]
    UnsupportedGlVersion { major: u8, minor: u8 },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Texture(#[from] TextureError),
}

static INSTANCE: AtomicBool = AtomicBool::new(false);

/// Holds the process-wide engine slot until dropped.
#[derive(Debug)]
struct InstanceGuard(());

impl InstanceGuard {
    fn acquire() -> Result<Self, EngineError> {
        INSTANCE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(()))
            .map_err(|_| EngineError::AlreadyExists)
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        INSTANCE.store(false, Ordering::Release);
    }
}

/// An engine that has not been initialized yet.
#[derive(Debug)]
pub struct EngineHandle {
    guard: InstanceGuard,
}

impl EngineHandle {
    pub fn create() -> Result<Self, EngineError> {
        Ok(Self {
            guard: InstanceGuard::acquire()?,
        })
    }

    /// Opens the window, loads OpenGL and builds the built-in programs.
    ///
    /// On failure the handle is consumed and the instance slot released.
    pub fn initialize(self, config: &EngineConfig) -> Result<Engine, EngineError> {
        config.validate()?;

        let window = Window::new(config).map_err(EngineError::Window)?;
        check_context_version(window.context_version())?;

        let gl = Rc::new(Gl::load_with(|name| window.proc_address(name))?);
        for (label, name) in [
            ("OpenGL", gl::VERSION),
            ("vendor", gl::VENDOR),
            ("renderer", gl::RENDERER),
            ("GLSL", gl::SHADING_LANGUAGE_VERSION),
        ] {
            if let Some(value) = gl.string(name) {
                log::info!("{label}: {value}");
            }
        }

        let pipeline = Pipeline::new(gl, config.clear_color)?;
        log::info!(
            "engine initialized: {:?} {}x{}",
            config.title,
            config.width,
            config.height
        );

        Ok(Engine {
            pipeline,
            window,
            _guard: self.guard,
        })
    }
}

fn check_context_version((major, minor): (u8, u8)) -> Result<(), EngineError> {
    if (major, minor) < MIN_GL_VERSION {
        log::error!("OpenGL {major}.{minor} context is too old");
        return Err(EngineError::UnsupportedGlVersion { major, minor });
    }
    Ok(())
}

/// An initialized engine: window, context and the three built-in programs.
///
/// Not `Send`; all calls happen on the thread that created it.
pub struct Engine {
    // Programs are deleted while the context is still alive.
    pipeline: Pipeline,
    window: Window,
    _guard: InstanceGuard,
}

impl Engine {
    /// Claims the instance slot and initializes in one step.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        EngineHandle::create()?.initialize(config)
    }

    /// Next input event, or `None` once the queue is drained. Never blocks.
    pub fn read_input(&mut self) -> Option<Event> {
        let window = &mut self.window;
        input::next_event(|| window.poll_raw())
    }

    /// Seconds elapsed since initialization.
    pub fn get_time_from_init(&self) -> f32 {
        self.window.seconds_since_start()
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window.size()
    }

    pub fn create_texture<P: AsRef<Path>>(&self, path: P) -> Result<Texture, EngineError> {
        Ok(Texture::load(self.pipeline.gl(), path)?)
    }

    pub fn destroy_texture(&self, texture: Texture) {
        texture.release(self.pipeline.gl());
    }

    pub fn render_flat(&self, tri: &Tri0, color: Color) -> Result<(), EngineError> {
        Ok(self.pipeline.draw_flat(tri, color)?)
    }

    pub fn render_colored(&self, tri: &Tri1) {
        self.pipeline.draw_colored(tri);
    }

    pub fn render_textured(
        &self,
        tri: &Tri2,
        texture: &Texture,
        matrix: &Mat2x3,
    ) -> Result<(), EngineError> {
        Ok(self.pipeline.draw_textured(tri, texture, matrix)?)
    }

    /// Presents the frame, then clears the back buffer for the next one.
    pub fn swap_buffers(&self) {
        self.window.swap();
        self.pipeline.clear_frame();
    }

    /// Destroys the programs, context and window and frees the instance slot.
    pub fn uninitialize(self) {
        drop(self);
        log::info!("engine uninitialized");
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("pipeline", &self.pipeline)
            .field("window_size", &self.window.size())
            .finish_non_exhaustive()
    }
}
