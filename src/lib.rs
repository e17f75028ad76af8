//! A small 2D rendering engine on SDL2 and OpenGL 2.1.
//!
//! The engine opens one window with an OpenGL context and draws triangles
//! through three built-in programs: a flat single-color one, a per-vertex
//! colored one, and a textured one with a 2×3 affine transform. Input is
//! reduced to a fixed set of virtual-button [`Event`]s.
//!
//! # Quick Start
//!
//! ```ignore
//! use eng2d::prelude::*;
//!
//! let mut engine = Engine::new(&EngineConfig::default())?;
//! let tri: Tri0 = "0.0 0.0 1.0 0.0 0.5 1.0".parse()?;
//! 'main: loop {
//!     while let Some(event) = engine.read_input() {
//!         if event == Event::TurnOff {
//!             break 'main;
//!         }
//!     }
//!     engine.render_flat(&tri, Color::GREEN)?;
//!     engine.swap_buffers();
//! }
//! engine.uninitialize();
//! ```

// Public API - exposed to library consumers
pub mod color;
pub mod config;
pub mod engine;
pub mod input;
pub mod logging;
pub mod math;
pub mod texture;
pub mod triangle;
pub mod window;

// GL bindings and the draw pipeline
pub mod gl;
pub mod render;

pub use color::{Color, ColorError};
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineError, EngineHandle};
pub use input::Event;
pub use texture::{Texture, TextureError};
pub use triangle::{parse_triangles, ParseError, Tri0, Tri1, Tri2, V0, V1, V2};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use eng2d::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use crate::config::EngineConfig;
    pub use crate::engine::{Engine, EngineError, EngineHandle};
    pub use crate::texture::Texture;

    // Geometry
    pub use crate::color::Color;
    pub use crate::triangle::{parse_triangles, Tri0, Tri1, Tri2, V0, V1, V2};

    // Math
    pub use crate::math::mat2x3::Mat2x3;
    pub use crate::math::vec2::Vec2;

    // Input
    pub use crate::input::Event;
}
