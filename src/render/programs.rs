//! GLSL sources for the three built-in programs and their attribute slots.
//!
//! The sources target GLSL 1.20 (the GL 2.1 default), so they carry no
//! `#version` line and use `attribute`/`varying`.

use crate::gl::types::GLuint;

/// Vertex position, shared by every program.
pub const POSITION: GLuint = 0;
pub const COLOR: GLuint = 1;
pub const TEX_COORD: GLuint = 2;

pub const FLAT_VERTEX: &str = "
attribute vec2 a_position;
void main()
{
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

pub const FLAT_FRAGMENT: &str = "
uniform vec4 u_color;
void main()
{
    gl_FragColor = u_color;
}
";

pub const FLAT_ATTRIBUTES: &[(GLuint, &str)] = &[(POSITION, "a_position")];

pub const COLORED_VERTEX: &str = "
attribute vec2 a_position;
attribute vec4 a_color;
varying vec4 v_color;
void main()
{
    v_color = a_color;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

pub const COLORED_FRAGMENT: &str = "
varying vec4 v_color;
void main()
{
    gl_FragColor = v_color;
}
";

pub const COLORED_ATTRIBUTES: &[(GLuint, &str)] = &[(POSITION, "a_position"), (COLOR, "a_color")];

// Row vector times matrix, matching Mat2x3's composition order.
pub const TEXTURED_VERTEX: &str = "
uniform mat3 u_matrix;
attribute vec2 a_position;
attribute vec2 a_tex_coord;
attribute vec4 a_color;
varying vec4 v_color;
varying vec2 v_tex_coord;
void main()
{
    v_tex_coord = a_tex_coord;
    v_color = a_color;
    vec3 position = vec3(a_position, 1.0) * u_matrix;
    gl_Position = vec4(position, 1.0);
}
";

pub const TEXTURED_FRAGMENT: &str = "
varying vec2 v_tex_coord;
varying vec4 v_color;
uniform sampler2D s_texture;
void main()
{
    gl_FragColor = texture2D(s_texture, v_tex_coord) * v_color;
}
";

pub const TEXTURED_ATTRIBUTES: &[(GLuint, &str)] = &[
    (POSITION, "a_position"),
    (COLOR, "a_color"),
    (TEX_COORD, "a_tex_coord"),
];
