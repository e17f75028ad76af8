use std::ffi::c_void;

use sdl2::video::{GLContext, GLProfile, SwapInterval};

use crate::config::EngineConfig;
use crate::input::RawEvent;

/// Oldest context version the renderer's shaders run on.
pub const MIN_GL_VERSION: (u8, u8) = (2, 1);

/// SDL window with a current OpenGL context, event queue and clock.
pub struct Window {
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    // The context must go before the window it was created on.
    _gl_context: GLContext,
    window: sdl2::video::Window,
    video_subsystem: sdl2::VideoSubsystem,
    _sdl_context: sdl2::Sdl,
    start_ticks: u64,
}

impl Window {
    pub fn new(config: &EngineConfig) -> Result<Self, String> {
        log::info!("SDL version {}", sdl2::version::version());

        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(GLProfile::Compatibility);
        gl_attr.set_context_version(MIN_GL_VERSION.0, MIN_GL_VERSION.1);

        let window = video_subsystem
            .window(&config.title, config.width, config.height)
            .opengl()
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let gl_context = window.gl_create_context()?;
        window.gl_make_current(&gl_context)?;

        if config.vsync {
            if let Err(e) = video_subsystem.gl_set_swap_interval(SwapInterval::VSync) {
                log::warn!("vsync unavailable: {e}");
            }
        }

        let event_pump = sdl_context.event_pump()?;
        let start_ticks = timer_subsystem.ticks64();

        Ok(Self {
            event_pump,
            timer_subsystem,
            _gl_context: gl_context,
            window,
            video_subsystem,
            _sdl_context: sdl_context,
            start_ticks,
        })
    }

    /// Version of the context actually created, which may differ from the
    /// one requested.
    pub fn context_version(&self) -> (u8, u8) {
        self.video_subsystem.gl_attr().context_version()
    }

    /// Looks up a GL entry point in the current context; null if unknown.
    pub fn proc_address(&self, name: &str) -> *const c_void {
        self.video_subsystem.gl_get_proc_address(name).cast()
    }

    /// Next queued event, without blocking.
    pub fn poll_raw(&mut self) -> Option<RawEvent> {
        self.event_pump.poll_event().map(|e| RawEvent::from(&e))
    }

    /// Seconds since the window was created.
    pub fn seconds_since_start(&self) -> f32 {
        (self.timer_subsystem.ticks64() - self.start_ticks) as f32 * 0.001
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    pub fn size(&self) -> (u32, u32) {
        self.window.size()
    }
}
