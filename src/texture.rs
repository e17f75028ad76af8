use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::gl::types::*;
use crate::gl::{self, Gl};

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// A 2D texture living on the GPU.
///
/// Created through [`Engine::create_texture`](crate::Engine::create_texture)
/// and released by handing it back to
/// [`Engine::destroy_texture`](crate::Engine::destroy_texture). The value is
/// neither `Clone` nor released on drop, so a texture that is simply dropped
/// keeps its GPU storage until the context goes away.
#[derive(Debug)]
pub struct Texture {
    handle: GLuint,
    width: u32,
    height: u32,
    path: PathBuf,
}

impl Texture {
    /// Reads and decodes `path` as RGBA, then uploads it with nearest
    /// filtering and no mipmaps.
    ///
    /// The file is fully decoded before any GL object is created, so a
    /// failed load allocates nothing.
    pub fn load<P: AsRef<Path>>(gl: &Gl, path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let img = image::load_from_memory(&bytes)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();

        let mut handle: GLuint = 0;
        // SAFETY: `img` holds width * height tightly packed RGBA8 pixels and
        // outlives the upload; `handle` is a live out pointer.
        unsafe {
            gl.gen_textures(1, &mut handle);
            gl.bind_texture(gl::TEXTURE_2D, handle);
            gl.tex_image_2d(
                gl::TEXTURE_2D,
                0,
                gl::RGBA as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                img.as_raw().as_ptr().cast(),
            );
            gl.tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::NEAREST as GLint);
            gl.tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as GLint);
        }
        gl.check("glTexImage2D");

        log::debug!(
            "loaded texture {} ({width}x{height}) as {handle}",
            path.display()
        );
        Ok(Self {
            handle,
            width,
            height,
            path: path.to_path_buf(),
        })
    }

    /// Makes this texture current on the active texture unit.
    pub fn bind(&self, gl: &Gl) {
        // SAFETY: `handle` names a texture created by `load` and not yet released.
        unsafe { gl.bind_texture(gl::TEXTURE_2D, self.handle) };
        gl.check("glBindTexture");
    }

    pub(crate) fn release(self, gl: &Gl) {
        // SAFETY: consuming `self` guarantees the name is deleted once.
        unsafe { gl.delete_textures(1, &self.handle) };
        gl.check("glDeleteTextures");
        log::debug!("released texture {} ({})", self.handle, self.path.display());
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// File the texture was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn handle(&self) -> GLuint {
        self.handle
    }
}
