//! OpenGL scalar types, as defined by the GL 2.1 headers.

#![allow(clippy::upper_case_acronyms)]

pub type GLenum = u32;
pub type GLboolean = u8;
pub type GLbitfield = u32;
pub type GLint = i32;
pub type GLuint = u32;
pub type GLsizei = i32;
pub type GLfloat = f32;
pub type GLchar = std::ffi::c_char;
pub type GLubyte = u8;
