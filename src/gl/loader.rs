//! Entry-point table resolved from the active context.
//!
//! Nothing is linked against a system GL library: every function the renderer
//! calls is looked up by name through the windowing backend once, right after
//! the context is created. A single missing symbol fails the whole load, and
//! the error lists every symbol that could not be resolved.

use std::ffi::c_void;
use std::fmt;

use thiserror::Error;

use super::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing OpenGL entry points: {}", missing.join(", "))]
pub struct LoadError {
    pub missing: Vec<&'static str>,
}

macro_rules! entry_points {
    ($( fn $name:ident = $symbol:literal ($($arg:ident: $ty:ty),*) $(-> $ret:ty)?; )*) => {
        /// Resolved OpenGL entry points for one context.
        ///
        /// Calling any method is `unsafe`: the context the table was loaded
        /// from must be current on the calling thread, and pointer arguments
        /// must satisfy the GL specification for that call.
        pub struct Gl {
            $( $name: unsafe extern "system" fn($($ty),*) $(-> $ret)?, )*
        }

        impl Gl {
            /// Every symbol the renderer needs, in resolution order.
            pub const REQUIRED: &'static [&'static str] = &[$($symbol),*];

            /// Resolves every entry point through `resolve`, which returns null
            /// for unknown names.
            pub fn load_with<F>(mut resolve: F) -> Result<Self, LoadError>
            where
                F: FnMut(&str) -> *const c_void,
            {
                let mut missing = Vec::new();
                $(
                    let $name = resolve($symbol);
                    if $name.is_null() {
                        missing.push($symbol);
                    }
                )*
                if !missing.is_empty() {
                    return Err(LoadError { missing });
                }

                // SAFETY: each pointer is non-null and was resolved by its GL
                // name, so it has the signature declared for that name.
                unsafe {
                    Ok(Self {
                        $(
                            $name: std::mem::transmute::<
                                *const c_void,
                                unsafe extern "system" fn($($ty),*) $(-> $ret)?,
                            >($name),
                        )*
                    })
                }
            }

            $(
                #[inline]
                pub unsafe fn $name(&self, $($arg: $ty),*) $(-> $ret)? {
                    (self.$name)($($arg),*)
                }
            )*
        }
    };
}

entry_points! {
    // shaders and programs
    fn create_shader = "glCreateShader"(kind: GLenum) -> GLuint;
    fn shader_source = "glShaderSource"(shader: GLuint, count: GLsizei, strings: *const *const GLchar, lengths: *const GLint);
    fn compile_shader = "glCompileShader"(shader: GLuint);
    fn get_shader_iv = "glGetShaderiv"(shader: GLuint, pname: GLenum, params: *mut GLint);
    fn get_shader_info_log = "glGetShaderInfoLog"(shader: GLuint, buf_size: GLsizei, length: *mut GLsizei, log: *mut GLchar);
    fn delete_shader = "glDeleteShader"(shader: GLuint);
    fn create_program = "glCreateProgram"() -> GLuint;
    fn attach_shader = "glAttachShader"(program: GLuint, shader: GLuint);
    fn bind_attrib_location = "glBindAttribLocation"(program: GLuint, index: GLuint, name: *const GLchar);
    fn link_program = "glLinkProgram"(program: GLuint);
    fn get_program_iv = "glGetProgramiv"(program: GLuint, pname: GLenum, params: *mut GLint);
    fn get_program_info_log = "glGetProgramInfoLog"(program: GLuint, buf_size: GLsizei, length: *mut GLsizei, log: *mut GLchar);
    fn delete_program = "glDeleteProgram"(program: GLuint);
    fn use_program = "glUseProgram"(program: GLuint);

    // vertex attributes
    fn vertex_attrib_pointer = "glVertexAttribPointer"(index: GLuint, size: GLint, kind: GLenum, normalized: GLboolean, stride: GLsizei, pointer: *const c_void);
    fn enable_vertex_attrib_array = "glEnableVertexAttribArray"(index: GLuint);
    fn disable_vertex_attrib_array = "glDisableVertexAttribArray"(index: GLuint);

    // uniforms
    fn get_uniform_location = "glGetUniformLocation"(program: GLuint, name: *const GLchar) -> GLint;
    fn uniform_1i = "glUniform1i"(location: GLint, v0: GLint);
    fn uniform_4fv = "glUniform4fv"(location: GLint, count: GLsizei, value: *const GLfloat);
    fn uniform_matrix_3fv = "glUniformMatrix3fv"(location: GLint, count: GLsizei, transpose: GLboolean, value: *const GLfloat);

    // textures
    fn active_texture = "glActiveTexture"(unit: GLenum);
    fn gen_textures = "glGenTextures"(n: GLsizei, textures: *mut GLuint);
    fn delete_textures = "glDeleteTextures"(n: GLsizei, textures: *const GLuint);
    fn bind_texture = "glBindTexture"(target: GLenum, texture: GLuint);
    fn tex_image_2d = "glTexImage2D"(target: GLenum, level: GLint, internal_format: GLint, width: GLsizei, height: GLsizei, border: GLint, format: GLenum, kind: GLenum, pixels: *const c_void);
    fn tex_parameter_i = "glTexParameteri"(target: GLenum, pname: GLenum, param: GLint);

    // drawing and frame state
    fn draw_arrays = "glDrawArrays"(mode: GLenum, first: GLint, count: GLsizei);
    fn enable = "glEnable"(cap: GLenum);
    fn blend_func = "glBlendFunc"(src: GLenum, dst: GLenum);
    fn clear_color = "glClearColor"(r: GLfloat, g: GLfloat, b: GLfloat, a: GLfloat);
    fn clear = "glClear"(mask: GLbitfield);

    // queries
    fn get_error = "glGetError"() -> GLenum;
    fn get_string = "glGetString"(name: GLenum) -> *const GLubyte;
}

impl fmt::Debug for Gl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gl")
            .field("entry_points", &Self::REQUIRED.len())
            .finish_non_exhaustive()
    }
}
