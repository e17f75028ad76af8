//! 2D affine math: [`vec2::Vec2`] and [`mat2x3::Mat2x3`].

pub mod mat2x3;
pub mod vec2;

pub use mat2x3::Mat2x3;
pub use vec2::Vec2;
