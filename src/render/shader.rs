//! Two-stage GLSL programs with caller-assigned attribute slots.

use std::ffi::CString;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::color::Color;
use crate::gl::types::*;
use crate::gl::{self, Gl};
use crate::math::mat2x3::Mat2x3;
use crate::texture::Texture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    #[error("failed to compile {stage} shader:\n{log}\nsource:\n{code}")]
    Compile {
        stage: ShaderStage,
        log: String,
        code: String,
    },
    #[error("failed to link shader program:\n{log}")]
    Link { log: String },
    #[error("uniform `{name}` not found in shader program")]
    UniformNotFound { name: String },
    #[error("invalid GLSL identifier {0:?}")]
    InvalidName(String),
}

/// A linked vertex + fragment program.
///
/// Owns both shader objects and the program object; all three are deleted on
/// drop. Uniform setters act on the currently active program, so callers
/// activate it with [`ShaderProgram::use_program`] first.
pub struct ShaderProgram {
    gl: Rc<Gl>,
    vertex: GLuint,
    fragment: GLuint,
    program: GLuint,
}

impl ShaderProgram {
    /// Compiles both stages, binds every `(slot, name)` attribute pair and links.
    ///
    /// Attribute slots are bound before linking so the caller's slot
    /// assignment is the one the linked program uses.
    pub fn new(
        gl: Rc<Gl>,
        vertex_src: &str,
        fragment_src: &str,
        attributes: &[(GLuint, &str)],
    ) -> Result<Self, ShaderError> {
        let vertex = compile_shader(&gl, ShaderStage::Vertex, vertex_src)?;
        let fragment = match compile_shader(&gl, ShaderStage::Fragment, fragment_src) {
            Ok(id) => id,
            Err(e) => {
                // SAFETY: `vertex` was created above and is not attached anywhere.
                unsafe { gl.delete_shader(vertex) };
                return Err(e);
            }
        };

        match link_program(&gl, vertex, fragment, attributes) {
            Ok(program) => {
                log::debug!("linked shader program {program} ({} attributes)", attributes.len());
                Ok(Self {
                    gl,
                    vertex,
                    fragment,
                    program,
                })
            }
            Err(e) => {
                // SAFETY: both shaders were created above; the failed program
                // has already been deleted.
                unsafe {
                    gl.delete_shader(vertex);
                    gl.delete_shader(fragment);
                }
                Err(e)
            }
        }
    }

    pub fn id(&self) -> GLuint {
        self.program
    }

    /// Makes this program current for subsequent uniform and draw calls.
    pub fn use_program(&self) {
        // SAFETY: `program` is a live, linked program object.
        unsafe { self.gl.use_program(self.program) };
        self.gl.check("glUseProgram");
    }

    /// Binds `texture` to unit 0 and points the sampler uniform at it.
    pub fn set_uniform_texture(&self, name: &str, texture: &Texture) -> Result<(), ShaderError> {
        let location = self.uniform_location(name)?;
        let texture_unit: GLuint = 0;
        // SAFETY: the unit is within the guaranteed minimum of texture units.
        unsafe { self.gl.active_texture(gl::TEXTURE0 + texture_unit) };
        self.gl.check("glActiveTexture");

        texture.bind(&self.gl);

        // SAFETY: `location` was returned by glGetUniformLocation for the
        // active program.
        unsafe { self.gl.uniform_1i(location, texture_unit as GLint) };
        self.gl.check("glUniform1i");
        Ok(())
    }

    /// Uploads `color` as a `vec4`.
    pub fn set_uniform_color(&self, name: &str, color: Color) -> Result<(), ShaderError> {
        let location = self.uniform_location(name)?;
        let values = color.to_array();
        // SAFETY: `values` holds the 4 floats one vec4 element needs.
        unsafe { self.gl.uniform_4fv(location, 1, values.as_ptr()) };
        self.gl.check("glUniform4fv");
        Ok(())
    }

    /// Uploads `matrix` as a `mat3` in column-major order, bottom row `(0, 0, 1)`.
    pub fn set_uniform_matrix(&self, name: &str, matrix: &Mat2x3) -> Result<(), ShaderError> {
        let location = self.uniform_location(name)?;
        let values = matrix.to_column_major();
        // SAFETY: `values` holds the 9 floats one mat3 element needs.
        unsafe {
            self.gl
                .uniform_matrix_3fv(location, 1, gl::FALSE, values.as_ptr())
        };
        self.gl.check("glUniformMatrix3fv");
        Ok(())
    }

    fn uniform_location(&self, name: &str) -> Result<GLint, ShaderError> {
        let c_name = CString::new(name).map_err(|_| ShaderError::InvalidName(name.to_string()))?;
        // SAFETY: `c_name` is NUL-terminated and outlives the call.
        let location = unsafe { self.gl.get_uniform_location(self.program, c_name.as_ptr()) };
        self.gl.check("glGetUniformLocation");
        if location == -1 {
            log::error!("uniform `{name}` not found in program {}", self.program);
            return Err(ShaderError::UniformNotFound {
                name: name.to_string(),
            });
        }
        Ok(location)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        // SAFETY: the three objects are owned by this value and deleted once.
        unsafe {
            self.gl.delete_program(self.program);
            self.gl.delete_shader(self.vertex);
            self.gl.delete_shader(self.fragment);
        }
        log::debug!("deleted shader program {}", self.program);
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("program", &self.program)
            .field("vertex", &self.vertex)
            .field("fragment", &self.fragment)
            .finish()
    }
}

fn compile_shader(gl: &Gl, stage: ShaderStage, source: &str) -> Result<GLuint, ShaderError> {
    let ptr = source.as_ptr().cast::<GLchar>();
    let len = source.len() as GLint;
    let mut status: GLint = 0;

    // SAFETY: the source is passed with an explicit length, so it need not be
    // NUL-terminated; all out pointers reference live locals.
    let shader = unsafe {
        let shader = gl.create_shader(stage.gl_enum());
        gl.shader_source(shader, 1, &ptr, &len);
        gl.compile_shader(shader);
        gl.get_shader_iv(shader, gl::COMPILE_STATUS, &mut status);
        shader
    };
    gl.check("glCompileShader");

    if status == 0 {
        let log = info_log(
            |len| unsafe { gl.get_shader_iv(shader, gl::INFO_LOG_LENGTH, len) },
            |size, written, buf| unsafe { gl.get_shader_info_log(shader, size, written, buf) },
        );
        // SAFETY: `shader` was created above and is not referenced elsewhere.
        unsafe { gl.delete_shader(shader) };
        log::error!("error compiling {stage} shader:\n{source}\n{log}");
        return Err(ShaderError::Compile {
            stage,
            log,
            code: source.to_string(),
        });
    }
    Ok(shader)
}

fn link_program(
    gl: &Gl,
    vertex: GLuint,
    fragment: GLuint,
    attributes: &[(GLuint, &str)],
) -> Result<GLuint, ShaderError> {
    // Validate every name before creating the program so nothing leaks.
    let names = attributes
        .iter()
        .map(|&(slot, name)| {
            CString::new(name)
                .map(|c| (slot, c))
                .map_err(|_| ShaderError::InvalidName(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // SAFETY: glCreateProgram has no preconditions beyond a current context.
    let program = unsafe { gl.create_program() };
    gl.check("glCreateProgram");
    if program == 0 {
        return Err(ShaderError::Link {
            log: "glCreateProgram returned 0".to_string(),
        });
    }

    let mut status: GLint = 0;
    // SAFETY: `program`, `vertex` and `fragment` are live objects; attribute
    // names are NUL-terminated and outlive the calls.
    unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        for (slot, name) in &names {
            gl.bind_attrib_location(program, *slot, name.as_ptr());
        }
        gl.link_program(program);
        gl.get_program_iv(program, gl::LINK_STATUS, &mut status);
    }
    gl.check("glLinkProgram");

    if status == 0 {
        let log = info_log(
            |len| unsafe { gl.get_program_iv(program, gl::INFO_LOG_LENGTH, len) },
            |size, written, buf| unsafe { gl.get_program_info_log(program, size, written, buf) },
        );
        // SAFETY: the program was created above and is not referenced elsewhere.
        unsafe { gl.delete_program(program) };
        log::error!("error linking program:\n{log}");
        return Err(ShaderError::Link { log });
    }
    Ok(program)
}

/// Reads a shader or program info log through the matching pair of queries.
fn info_log(
    length: impl FnOnce(*mut GLint),
    read: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    let mut len: GLint = 0;
    length(&mut len);
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u8; len as usize];
    let mut written: GLsizei = 0;
    read(len, &mut written, buf.as_mut_ptr().cast());
    buf.truncate(written.clamp(0, len) as usize);
    String::from_utf8_lossy(&buf).into_owned()
}
