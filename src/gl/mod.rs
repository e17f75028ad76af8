//! Minimal OpenGL 2.1 binding: scalar types, the enum values the renderer
//! uses, and the [`Gl`] entry-point table.

mod loader;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;

use std::ffi::CStr;

pub use loader::{Gl, LoadError};
use types::*;

pub const FALSE: GLboolean = 0;
pub const TRUE: GLboolean = 1;

// errors
pub const NO_ERROR: GLenum = 0;
pub const INVALID_ENUM: GLenum = 0x0500;
pub const INVALID_VALUE: GLenum = 0x0501;
pub const INVALID_OPERATION: GLenum = 0x0502;
pub const STACK_OVERFLOW: GLenum = 0x0503;
pub const STACK_UNDERFLOW: GLenum = 0x0504;
pub const OUT_OF_MEMORY: GLenum = 0x0505;
pub const INVALID_FRAMEBUFFER_OPERATION: GLenum = 0x0506;

// shaders
pub const FRAGMENT_SHADER: GLenum = 0x8B30;
pub const VERTEX_SHADER: GLenum = 0x8B31;
pub const COMPILE_STATUS: GLenum = 0x8B81;
pub const LINK_STATUS: GLenum = 0x8B82;
pub const INFO_LOG_LENGTH: GLenum = 0x8B84;

// data types and primitives
pub const UNSIGNED_BYTE: GLenum = 0x1401;
pub const FLOAT: GLenum = 0x1406;
pub const TRIANGLES: GLenum = 0x0004;

// textures
pub const TEXTURE_2D: GLenum = 0x0DE1;
pub const TEXTURE0: GLenum = 0x84C0;
pub const TEXTURE_MAG_FILTER: GLenum = 0x2800;
pub const TEXTURE_MIN_FILTER: GLenum = 0x2801;
pub const NEAREST: GLenum = 0x2600;
pub const RGBA: GLenum = 0x1908;

// blending and framebuffer
pub const BLEND: GLenum = 0x0BE2;
pub const SRC_ALPHA: GLenum = 0x0302;
pub const ONE_MINUS_SRC_ALPHA: GLenum = 0x0303;
pub const COLOR_BUFFER_BIT: GLbitfield = 0x4000;

// strings
pub const VENDOR: GLenum = 0x1F00;
pub const RENDERER: GLenum = 0x1F01;
pub const VERSION: GLenum = 0x1F02;
pub const SHADING_LANGUAGE_VERSION: GLenum = 0x8B8C;

/// Upper bound on codes drained per check; `glGetError` can keep reporting
/// without a current context.
const MAX_QUEUED_ERRORS: usize = 8;

pub fn error_name(code: GLenum) -> &'static str {
    match code {
        NO_ERROR => "GL_NO_ERROR",
        INVALID_ENUM => "GL_INVALID_ENUM",
        INVALID_VALUE => "GL_INVALID_VALUE",
        INVALID_OPERATION => "GL_INVALID_OPERATION",
        STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => "unknown GL error",
    }
}

impl Gl {
    /// Drains the error queue and logs every code against `call`.
    ///
    /// Only active in debug builds; returns the number of errors seen.
    pub fn check(&self, call: &str) -> usize {
        if !cfg!(debug_assertions) {
            return 0;
        }
        let mut seen = 0;
        while seen < MAX_QUEUED_ERRORS {
            // SAFETY: glGetError takes no arguments and only reads context state.
            let code = unsafe { self.get_error() };
            if code == NO_ERROR {
                break;
            }
            log::error!("{call}: {} (0x{code:04X})", error_name(code));
            seen += 1;
        }
        seen
    }

    /// Reads a `glGetString` value, e.g. [`VERSION`].
    pub fn string(&self, name: GLenum) -> Option<String> {
        // SAFETY: glGetString returns null or a static NUL-terminated string
        // owned by the driver.
        unsafe {
            let ptr = self.get_string(name);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned())
            }
        }
    }
}
