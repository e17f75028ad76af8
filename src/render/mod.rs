//! The fixed rendering pipeline: three built-in programs and the draw calls
//! that feed them client-side vertex arrays.

pub mod programs;
pub mod shader;

use std::ffi::c_void;
use std::mem::{offset_of, size_of};
use std::rc::Rc;

use crate::color::Color;
use crate::gl::types::*;
use crate::gl::{self, Gl};
use crate::math::mat2x3::Mat2x3;
use crate::texture::Texture;
use crate::triangle::{Tri0, Tri1, Tri2, V0, V1, V2};

pub use shader::{ShaderError, ShaderProgram, ShaderStage};

pub struct Pipeline {
    flat: ShaderProgram,
    colored: ShaderProgram,
    textured: ShaderProgram,
    gl: Rc<Gl>,
}

impl Pipeline {
    /// Builds the three programs and sets up blending and the clear color.
    ///
    /// The flat program is left active with `u_color` set to opaque red.
    pub fn new(gl: Rc<Gl>, clear_color: Color) -> Result<Self, ShaderError> {
        let flat = ShaderProgram::new(
            Rc::clone(&gl),
            programs::FLAT_VERTEX,
            programs::FLAT_FRAGMENT,
            programs::FLAT_ATTRIBUTES,
        )?;
        flat.use_program();
        flat.set_uniform_color("u_color", Color::RED)?;

        let colored = ShaderProgram::new(
            Rc::clone(&gl),
            programs::COLORED_VERTEX,
            programs::COLORED_FRAGMENT,
            programs::COLORED_ATTRIBUTES,
        )?;
        let textured = ShaderProgram::new(
            Rc::clone(&gl),
            programs::TEXTURED_VERTEX,
            programs::TEXTURED_FRAGMENT,
            programs::TEXTURED_ATTRIBUTES,
        )?;

        let [r, g, b, a] = clear_color.to_array();
        // SAFETY: plain state setters with valid enum arguments.
        unsafe {
            gl.enable(gl::BLEND);
            gl.blend_func(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
            gl.clear_color(r, g, b, a);
        }
        gl.check("pipeline setup");

        Ok(Self {
            flat,
            colored,
            textured,
            gl,
        })
    }

    pub fn gl(&self) -> &Rc<Gl> {
        &self.gl
    }

    /// Draws `tri` filled with a single color.
    pub fn draw_flat(&self, tri: &Tri0, color: Color) -> Result<(), ShaderError> {
        self.flat.use_program();
        self.flat.set_uniform_color("u_color", color)?;

        let base = tri.vertices.as_ptr().cast::<u8>();
        // SAFETY: `tri` is borrowed for the whole call, which ends with the
        // draw that reads the array.
        unsafe {
            self.point_attribute::<V0>(programs::POSITION, 2, gl::FLOAT, gl::FALSE, base);
            self.gl.enable_vertex_attrib_array(programs::POSITION);
        }
        self.draw_triangle();
        Ok(())
    }

    /// Draws `tri` with per-vertex colors interpolated across it.
    pub fn draw_colored(&self, tri: &Tri1) {
        self.colored.use_program();

        let base = tri.vertices.as_ptr().cast::<u8>();
        // SAFETY: see `draw_flat`; the color offset lies inside each V1.
        unsafe {
            self.point_attribute::<V1>(programs::POSITION, 2, gl::FLOAT, gl::FALSE, base);
            self.gl.enable_vertex_attrib_array(programs::POSITION);
            self.point_attribute::<V1>(
                programs::COLOR,
                4,
                gl::UNSIGNED_BYTE,
                gl::TRUE,
                base.add(offset_of!(V1, color)),
            );
            self.gl.enable_vertex_attrib_array(programs::COLOR);
        }
        self.draw_triangle();

        // SAFETY: disabling an index this call enabled.
        unsafe { self.gl.disable_vertex_attrib_array(programs::COLOR) };
    }

    /// Draws `tri` sampling `texture`, transformed by `matrix` and modulated
    /// by the vertex colors.
    pub fn draw_textured(
        &self,
        tri: &Tri2,
        texture: &Texture,
        matrix: &Mat2x3,
    ) -> Result<(), ShaderError> {
        self.textured.use_program();
        self.textured.set_uniform_texture("s_texture", texture)?;
        self.textured.set_uniform_matrix("u_matrix", matrix)?;

        let base = tri.vertices.as_ptr().cast::<u8>();
        // SAFETY: see `draw_flat`; both offsets lie inside each V2.
        unsafe {
            self.point_attribute::<V2>(programs::POSITION, 2, gl::FLOAT, gl::FALSE, base);
            self.gl.enable_vertex_attrib_array(programs::POSITION);
            self.point_attribute::<V2>(
                programs::COLOR,
                4,
                gl::UNSIGNED_BYTE,
                gl::TRUE,
                base.add(offset_of!(V2, color)),
            );
            self.gl.enable_vertex_attrib_array(programs::COLOR);
            self.point_attribute::<V2>(
                programs::TEX_COORD,
                2,
                gl::FLOAT,
                gl::FALSE,
                base.add(offset_of!(V2, tex_coord)),
            );
            self.gl.enable_vertex_attrib_array(programs::TEX_COORD);
        }
        self.draw_triangle();

        // SAFETY: disabling indices this call enabled.
        unsafe {
            self.gl.disable_vertex_attrib_array(programs::COLOR);
            self.gl.disable_vertex_attrib_array(programs::TEX_COORD);
        }
        Ok(())
    }

    /// Clears the color buffer to the configured clear color.
    pub fn clear_frame(&self) {
        // SAFETY: COLOR_BUFFER_BIT is a valid clear mask.
        unsafe { self.gl.clear(gl::COLOR_BUFFER_BIT) };
        self.gl.check("glClear");
    }

    /// Points `slot` at an interleaved array of `V`, starting at `ptr`.
    ///
    /// # Safety
    /// `ptr` must stay valid for three vertices of `V` until the next draw.
    unsafe fn point_attribute<V>(
        &self,
        slot: GLuint,
        size: GLint,
        kind: GLenum,
        normalized: GLboolean,
        ptr: *const u8,
    ) {
        self.gl.vertex_attrib_pointer(
            slot,
            size,
            kind,
            normalized,
            size_of::<V>() as GLsizei,
            ptr.cast::<c_void>(),
        );
        self.gl.check("glVertexAttribPointer");
    }

    fn draw_triangle(&self) {
        // SAFETY: every enabled attribute points at a live three-vertex array.
        unsafe { self.gl.draw_arrays(gl::TRIANGLES, 0, 3) };
        self.gl.check("glDrawArrays");
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("flat", &self.flat.id())
            .field("colored", &self.colored.id())
            .field("textured", &self.textured.id())
            .finish()
    }
}
